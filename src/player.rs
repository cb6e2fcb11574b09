use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::constants::constants;
use crate::youtube::to_embed_url;

/// What a click inside an open modal landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalClick {
  /// The backdrop itself (outside the content panel).
  Backdrop,
  /// A `[x]` close control.
  Close,
  /// Anything inside the content panel.
  Content,
}

/// Modal that holds the embedded video for the selected project.
#[derive(Debug, Default)]
pub struct PlayerModal {
  visible: bool,
  frame_src: String,
  title: String,
}

impl PlayerModal {
  pub fn new() -> Self {
    Self::default()
  }

  /// Reveal the modal with the normalised embed URL for `link`.
  /// Returns `false` (and leaves the modal alone) when there is nothing to embed.
  pub fn open_player(&mut self, link: &str, title: Option<&str>) -> bool {
    let embed = to_embed_url(link);
    if embed.is_empty() {
      return false;
    }
    self.title = match title {
      Some(t) if !t.is_empty() => t.to_string(),
      _ => constants().default_player_title.clone(),
    };
    info!(embed = %embed, title = %self.title, "player: open");
    self.frame_src = embed;
    self.visible = true;
    true
  }

  /// Hide the modal and unload the embedded resource.
  pub fn close_player(&mut self) {
    if self.visible {
      debug!("player: close");
    }
    self.visible = false;
    self.frame_src.clear();
  }

  pub fn on_click(&mut self, click: ModalClick) {
    match click {
      ModalClick::Backdrop | ModalClick::Close => self.close_player(),
      ModalClick::Content => {}
    }
  }

  pub fn is_visible(&self) -> bool {
    self.visible
  }

  pub fn frame_src(&self) -> &str {
    &self.frame_src
  }

  pub fn title(&self) -> &str {
    &self.title
  }

  /// Hand the current embed URL to the system browser.
  pub fn launch(&self) -> Result<()> {
    if self.frame_src.is_empty() {
      return Ok(());
    }
    #[cfg(target_os = "macos")]
    let cmd = "open";
    #[cfg(not(target_os = "macos"))]
    let cmd = "xdg-open";
    let mut child = std::process::Command::new(cmd)
      .arg(&self.frame_src)
      .stdin(std::process::Stdio::null())
      .stdout(std::process::Stdio::null())
      .stderr(std::process::Stdio::null())
      .spawn()
      .with_context(|| format!("Failed to open browser with {}", cmd))?;
    // Reap the child in a background thread to avoid zombie processes.
    std::thread::spawn(move || {
      let _ = child.wait();
    });
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn open_sets_embed_and_title() {
    let mut player = PlayerModal::new();
    assert!(player.open_player("https://youtu.be/abc123", Some("Song A")));
    assert!(player.is_visible());
    assert_eq!(player.frame_src(), "https://www.youtube.com/embed/abc123?autoplay=1");
    assert_eq!(player.title(), "Song A");
  }

  #[test]
  fn missing_or_empty_title_uses_default() {
    let mut player = PlayerModal::new();
    player.open_player("https://youtu.be/abc123", None);
    assert_eq!(player.title(), "Now Playing");
    player.open_player("https://youtu.be/abc123", Some(""));
    assert_eq!(player.title(), "Now Playing");
  }

  #[test]
  fn empty_link_is_a_no_op() {
    let mut player = PlayerModal::new();
    assert!(!player.open_player("", Some("Nothing")));
    assert!(!player.is_visible());
    assert_eq!(player.frame_src(), "");
  }

  #[test]
  fn close_clears_frame() {
    let mut player = PlayerModal::new();
    player.open_player("https://www.youtube.com/watch?v=xyz789", None);
    player.close_player();
    assert!(!player.is_visible());
    assert_eq!(player.frame_src(), "");
  }

  #[test]
  fn backdrop_and_close_control_close_content_does_not() {
    let mut player = PlayerModal::new();
    player.open_player("https://youtu.be/a", None);
    player.on_click(ModalClick::Content);
    assert!(player.is_visible());
    player.on_click(ModalClick::Backdrop);
    assert!(!player.is_visible());

    player.open_player("https://youtu.be/a", None);
    player.on_click(ModalClick::Close);
    assert!(!player.is_visible());
  }
}
