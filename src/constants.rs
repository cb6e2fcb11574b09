//! Tunables for timers, endpoints and the player, read from `constants.ron`.
//!
//! The file is embedded with `include_str!` and parsed on first access.

use serde::Deserialize;
use std::sync::LazyLock;
use std::time::Duration;

/// Values from `constants.ron`.
#[derive(Debug, Deserialize)]
pub struct Constants {
  pub theme_storage_key: String,

  // Timers
  pub loader_delay_ms: u64,
  pub search_debounce_ms: u64,
  pub tick_ms: u64,
  pub error_dismiss_secs: u64,

  // Backend
  pub default_server: String,
  pub search_path: String,
  pub insert_path: String,
  pub delete_path: String,
  pub login_path: String,

  // Player
  pub embed_base: String,
  pub autoplay_query: String,
  pub default_player_title: String,
}

impl Constants {
  pub fn loader_delay(&self) -> Duration {
    Duration::from_millis(self.loader_delay_ms)
  }

  pub fn search_debounce(&self) -> Duration {
    Duration::from_millis(self.search_debounce_ms)
  }

  pub fn tick(&self) -> Duration {
    Duration::from_millis(self.tick_ms)
  }
}

static CONSTANTS: LazyLock<Constants> = LazyLock::new(|| {
  ron::from_str(include_str!("../constants.ron")).expect("constants.ron must be valid RON (embedded at compile time)")
});

/// Returns a reference to the parsed application constants.
pub fn constants() -> &'static Constants {
  &CONSTANTS
}
