// --- Helpers ---

/// Convert a char index to a byte offset within the string.
pub fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
  s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}

/// Compute the display width of the first `n` chars (accounting for double-width CJK).
pub fn display_width(s: &str, n: usize) -> usize {
  use unicode_width::UnicodeWidthChar;
  s.chars().take(n).map(|c| c.width().unwrap_or(0)).sum()
}

/// Truncate a string to `max_width` characters, appending "…" if truncated.
pub fn truncate_str(s: &str, max_width: usize) -> String {
  if s.chars().count() <= max_width {
    s.to_string()
  } else {
    let truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
    format!("{}…", truncated)
  }
}

// --- Single-line editor ---

/// Editable line of text with a char-indexed cursor and horizontal scroll.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
  value: String,
  cursor: usize,
  scroll: usize,
}

impl TextInput {
  pub fn value(&self) -> &str {
    &self.value
  }

  #[cfg(test)]
  pub fn cursor(&self) -> usize {
    self.cursor
  }

  pub fn is_empty(&self) -> bool {
    self.value.is_empty()
  }

  #[cfg(test)]
  pub fn set(&mut self, value: &str) {
    self.value = value.to_string();
    self.cursor = self.value.chars().count();
    self.scroll = 0;
  }

  #[cfg(test)]
  pub fn clear(&mut self) {
    self.value.clear();
    self.cursor = 0;
    self.scroll = 0;
  }

  pub fn insert(&mut self, c: char) {
    let byte_idx = char_to_byte_index(&self.value, self.cursor);
    self.value.insert(byte_idx, c);
    self.cursor += 1;
  }

  /// Returns whether anything was removed.
  pub fn backspace(&mut self) -> bool {
    if self.cursor == 0 {
      return false;
    }
    self.cursor -= 1;
    let byte_idx = char_to_byte_index(&self.value, self.cursor);
    self.value.remove(byte_idx);
    true
  }

  /// Returns whether anything was removed.
  pub fn delete(&mut self) -> bool {
    if self.cursor >= self.value.chars().count() {
      return false;
    }
    let byte_idx = char_to_byte_index(&self.value, self.cursor);
    self.value.remove(byte_idx);
    true
  }

  pub fn left(&mut self) {
    self.cursor = self.cursor.saturating_sub(1);
  }

  pub fn right(&mut self) {
    if self.cursor < self.value.chars().count() {
      self.cursor += 1;
    }
  }

  pub fn home(&mut self) {
    self.cursor = 0;
  }

  pub fn end(&mut self) {
    self.cursor = self.value.chars().count();
  }

  /// Slice of the value visible in `width` columns, keeping the cursor in view.
  /// Returns the visible text and the cursor column relative to it.
  pub fn visible(&mut self, width: usize) -> (String, usize) {
    let cursor_col = display_width(&self.value, self.cursor);
    if cursor_col < self.scroll {
      self.scroll = cursor_col;
    } else if width > 0 && cursor_col >= self.scroll + width {
      self.scroll = cursor_col.saturating_sub(width) + 1;
    }

    let scroll = self.scroll;
    let visible: String = self
      .value
      .chars()
      .scan(0usize, |col, c| {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        let start = *col;
        *col += w;
        Some((start, *col, c))
      })
      .skip_while(|(_, end, _)| *end <= scroll)
      .take_while(|(start, _, _)| *start < scroll + width)
      .map(|(_, _, c)| c)
      .collect();
    (visible, cursor_col - scroll)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  // --- char_to_byte_index ---

  #[test]
  fn char_to_byte_ascii() {
    assert_eq!(char_to_byte_index("hello", 0), 0);
    assert_eq!(char_to_byte_index("hello", 3), 3);
    assert_eq!(char_to_byte_index("hello", 5), 5); // past end
  }

  #[test]
  fn char_to_byte_multibyte() {
    let s = "aé日"; // a=1 byte, é=2 bytes, 日=3 bytes
    assert_eq!(char_to_byte_index(s, 0), 0);
    assert_eq!(char_to_byte_index(s, 1), 1);
    assert_eq!(char_to_byte_index(s, 2), 3);
    assert_eq!(char_to_byte_index(s, 3), 6);
  }

  // --- truncate_str ---

  #[test]
  fn truncate_keeps_short_strings() {
    assert_eq!(truncate_str("abc", 5), "abc");
    assert_eq!(truncate_str("abcdef", 4), "abc…");
  }

  // --- TextInput ---

  #[test]
  fn editing_at_cursor() {
    let mut input = TextInput::default();
    for c in "nva".chars() {
      input.insert(c);
    }
    input.left();
    input.left();
    input.insert('o');
    assert_eq!(input.value(), "nova");
    assert!(input.backspace());
    assert_eq!(input.value(), "nva");
    input.end();
    assert!(!input.delete());
    input.home();
    assert!(!input.backspace());
    assert!(input.delete());
    assert_eq!(input.value(), "va");
  }

  #[test]
  fn multibyte_editing() {
    let mut input = TextInput::default();
    input.set("日本");
    assert_eq!(input.cursor(), 2);
    input.backspace();
    assert_eq!(input.value(), "日");
  }

  #[test]
  fn visible_scrolls_to_cursor() {
    let mut input = TextInput::default();
    input.set("abcdefghij");
    let (text, col) = input.visible(4);
    assert_eq!(text, "hij");
    assert_eq!(col, 3);
    input.home();
    let (text, col) = input.visible(4);
    assert_eq!(text, "abcd");
    assert_eq!(col, 0);
  }
}
