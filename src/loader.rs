use std::time::{Duration, Instant};

use tracing::debug;

/// Full-screen loading overlay, hidden a fixed delay after the page loads.
pub struct Loader {
  present: bool,
  hidden: bool,
  delay: Duration,
  hide_at: Option<Instant>,
}

impl Loader {
  /// `present == false` models a page without an overlay: every call is a no-op.
  pub fn new(present: bool, delay: Duration) -> Self {
    Self { present, hidden: false, delay, hide_at: None }
  }

  /// Schedule the hide. Only the first load counts.
  pub fn on_page_load(&mut self, now: Instant) {
    if !self.present || self.hide_at.is_some() {
      return;
    }
    self.hide_at = Some(now + self.delay);
  }

  pub fn tick(&mut self, now: Instant) {
    if let Some(at) = self.hide_at
      && !self.hidden
      && now >= at
    {
      self.hidden = true;
      debug!("loader: hidden");
    }
  }

  pub fn is_visible(&self) -> bool {
    self.present && !self.hidden
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const DELAY: Duration = Duration::from_millis(600);

  #[test]
  fn hides_only_after_delay() {
    let start = Instant::now();
    let mut loader = Loader::new(true, DELAY);
    assert!(loader.is_visible());

    loader.on_page_load(start);
    loader.tick(start + Duration::from_millis(599));
    assert!(loader.is_visible());

    loader.tick(start + DELAY);
    assert!(!loader.is_visible());
  }

  #[test]
  fn stays_visible_until_page_loads() {
    let start = Instant::now();
    let mut loader = Loader::new(true, DELAY);
    loader.tick(start + Duration::from_secs(10));
    assert!(loader.is_visible());
  }

  #[test]
  fn second_load_does_not_reschedule() {
    let start = Instant::now();
    let mut loader = Loader::new(true, DELAY);
    loader.on_page_load(start);
    loader.on_page_load(start + Duration::from_millis(500));
    loader.tick(start + DELAY);
    assert!(!loader.is_visible());
  }

  #[test]
  fn absent_overlay_is_a_no_op() {
    let start = Instant::now();
    let mut loader = Loader::new(false, DELAY);
    loader.on_page_load(start);
    loader.tick(start + DELAY);
    assert!(!loader.is_visible());
  }
}
