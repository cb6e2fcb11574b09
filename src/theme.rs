use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::Color;
use tracing::{debug, info};

use crate::constants::constants;
use crate::storage::Storage;

// --- Palettes ---

/// Colors used to draw every region of the screen.
pub struct Theme {
  pub name: &'static str,
  pub bg: Color,
  pub fg: Color,
  pub accent: Color,
  pub muted: Color,
  pub border: Color,
  pub highlight_fg: Color,
  pub highlight_bg: Color,
  pub stripe_bg: Color,
  pub overlay_bg: Color,
  pub status: Color,
  pub ok: Color,
  pub error: Color,
  pub key_fg: Color,
  pub key_bg: Color,
}

pub static DARK: Theme = Theme {
  name: "dark",
  bg: Color::Rgb(14, 15, 20),
  fg: Color::Rgb(226, 228, 236),
  accent: Color::Rgb(255, 94, 138),
  muted: Color::Rgb(120, 124, 140),
  border: Color::Rgb(54, 57, 70),
  highlight_fg: Color::Rgb(14, 15, 20),
  highlight_bg: Color::Rgb(255, 94, 138),
  stripe_bg: Color::Rgb(20, 21, 28),
  overlay_bg: Color::Rgb(24, 25, 33),
  status: Color::Rgb(124, 196, 255),
  ok: Color::Rgb(112, 214, 145),
  error: Color::Rgb(255, 110, 110),
  key_fg: Color::Rgb(14, 15, 20),
  key_bg: Color::Rgb(120, 124, 140),
};

pub static LIGHT: Theme = Theme {
  name: "light",
  bg: Color::Rgb(248, 247, 244),
  fg: Color::Rgb(30, 31, 38),
  accent: Color::Rgb(214, 40, 92),
  muted: Color::Rgb(128, 128, 136),
  border: Color::Rgb(210, 208, 204),
  highlight_fg: Color::Rgb(255, 255, 255),
  highlight_bg: Color::Rgb(214, 40, 92),
  stripe_bg: Color::Rgb(240, 238, 234),
  overlay_bg: Color::Rgb(255, 255, 255),
  status: Color::Rgb(30, 110, 190),
  ok: Color::Rgb(34, 140, 70),
  error: Color::Rgb(200, 40, 40),
  key_fg: Color::Rgb(255, 255, 255),
  key_bg: Color::Rgb(128, 128, 136),
};

// --- Theme attribute ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeName {
  Light,
  Dark,
}

impl ThemeName {
  pub fn as_str(self) -> &'static str {
    match self {
      ThemeName::Light => "light",
      ThemeName::Dark => "dark",
    }
  }

  /// Only the exact stored spellings are accepted.
  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "light" => Some(ThemeName::Light),
      "dark" => Some(ThemeName::Dark),
      _ => None,
    }
  }

  pub fn toggled(self) -> Self {
    match self {
      ThemeName::Light => ThemeName::Dark,
      ThemeName::Dark => ThemeName::Light,
    }
  }

  pub fn palette(self) -> &'static Theme {
    match self {
      ThemeName::Light => &LIGHT,
      ThemeName::Dark => &DARK,
    }
  }
}

/// Key bindings that act as theme toggle controls.
const TOGGLE_KEYS: [(KeyCode, KeyModifiers); 2] =
  [(KeyCode::Char('t'), KeyModifiers::CONTROL), (KeyCode::F(2), KeyModifiers::NONE)];

/// Owns the root theme attribute and its persisted preference.
pub struct ThemeController {
  storage: Box<dyn Storage>,
  attribute: Option<ThemeName>,
}

impl ThemeController {
  pub fn new(storage: Box<dyn Storage>) -> Self {
    Self { storage, attribute: None }
  }

  pub fn setup(&mut self) {
    self.apply_stored_theme();
    info!(theme = self.current().as_str(), "theme: applied stored preference");
  }

  pub fn apply_stored_theme(&mut self) {
    let stored = self.storage.get(&constants().theme_storage_key);
    self.attribute = Some(stored.as_deref().and_then(ThemeName::parse).unwrap_or(ThemeName::Dark));
  }

  pub fn toggle_theme(&mut self) {
    let next = self.current().toggled();
    self.attribute = Some(next);
    self.storage.set(&constants().theme_storage_key, next.as_str());
    debug!(theme = next.as_str(), "theme: toggled");
  }

  /// The root attribute, `dark` when unset.
  pub fn current(&self) -> ThemeName {
    self.attribute.unwrap_or(ThemeName::Dark)
  }

  #[cfg(test)]
  pub fn attribute(&self) -> Option<ThemeName> {
    self.attribute
  }

  pub fn palette(&self) -> &'static Theme {
    self.current().palette()
  }

  pub fn is_toggle_key(key: &KeyEvent) -> bool {
    TOGGLE_KEYS.iter().any(|(code, mods)| key.code == *code && key.modifiers == *mods)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::storage::MemoryStorage;

  fn controller_with(value: Option<&str>) -> ThemeController {
    let storage = match value {
      Some(v) => MemoryStorage::with("studio-theme", v),
      None => MemoryStorage::default(),
    };
    ThemeController::new(Box::new(storage))
  }

  // --- apply_stored_theme ---

  #[test]
  fn stored_light_is_applied() {
    let mut theme = controller_with(Some("light"));
    theme.apply_stored_theme();
    assert_eq!(theme.attribute(), Some(ThemeName::Light));
  }

  #[test]
  fn invalid_or_missing_values_default_to_dark() {
    for value in [None, Some(""), Some("Light"), Some("blue"), Some(" dark")] {
      let mut theme = controller_with(value);
      theme.apply_stored_theme();
      assert_eq!(theme.attribute(), Some(ThemeName::Dark), "stored value {:?}", value);
    }
  }

  #[test]
  fn apply_is_idempotent() {
    let mut theme = controller_with(Some("light"));
    theme.apply_stored_theme();
    theme.apply_stored_theme();
    assert_eq!(theme.current(), ThemeName::Light);
  }

  // --- toggle_theme ---

  #[test]
  fn toggle_from_unset_goes_light_and_persists() {
    let mut theme = controller_with(None);
    theme.toggle_theme();
    assert_eq!(theme.current(), ThemeName::Light);

    // A fresh apply reads the persisted value back.
    theme.apply_stored_theme();
    assert_eq!(theme.current(), ThemeName::Light);
  }

  #[test]
  fn double_toggle_is_identity() {
    let mut theme = controller_with(Some("light"));
    theme.setup();
    let before = theme.current();
    theme.toggle_theme();
    theme.toggle_theme();
    assert_eq!(theme.current(), before);
  }

  #[test]
  fn palette_follows_attribute() {
    let mut theme = controller_with(Some("light"));
    theme.setup();
    assert_eq!(theme.palette().name, "light");
    theme.toggle_theme();
    assert_eq!(theme.palette().name, "dark");
  }

  // --- is_toggle_key ---

  #[test]
  fn both_toggle_bindings_are_recognised() {
    assert!(ThemeController::is_toggle_key(&KeyEvent::new(KeyCode::Char('t'), KeyModifiers::CONTROL)));
    assert!(ThemeController::is_toggle_key(&KeyEvent::new(KeyCode::F(2), KeyModifiers::NONE)));
    assert!(!ThemeController::is_toggle_key(&KeyEvent::new(KeyCode::Char('t'), KeyModifiers::NONE)));
  }
}
