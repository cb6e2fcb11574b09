use std::time::{Duration, Instant};

use ratatui::widgets::ListState;
use tracing::debug;

use crate::models::{ResultKind, SearchItem};
use crate::page::SectionId;
use crate::text::TextInput;

// --- Debounce ---

/// A cancellable delayed task, polled from the tick loop.
#[derive(Debug)]
pub struct Debounce {
  delay: Duration,
  due: Option<Instant>,
}

impl Debounce {
  pub fn new(delay: Duration) -> Self {
    Self { delay, due: None }
  }

  /// Cancel anything pending and schedule a fresh deadline.
  pub fn schedule(&mut self, now: Instant) {
    self.due = Some(now + self.delay);
  }

  pub fn cancel(&mut self) {
    self.due = None;
  }

  #[cfg(test)]
  pub fn is_pending(&self) -> bool {
    self.due.is_some()
  }

  /// Fires at most once per schedule.
  pub fn fire(&mut self, now: Instant) -> bool {
    match self.due {
      Some(due) if now >= due => {
        self.due = None;
        true
      }
      _ => false,
    }
  }
}

// --- Search box ---

/// A query whose quiet period elapsed and should go to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
  pub seq: u64,
  pub term: String,
}

/// What choosing a result asks the rest of the app to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
  ScrollTo(SectionId),
  OpenPlayer { link: String, title: String },
  Stay,
}

/// Where a click landed, from the search box's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchClick {
  Input,
  Results,
  Elsewhere,
}

pub struct SearchBox {
  pub input: TextInput,
  debounce: Debounce,
  pending_term: Option<String>,
  results: Vec<SearchItem>,
  visible: bool,
  pub list_state: ListState,
  /// Sequence number of the last query handed out.
  issued: u64,
  /// Responses at or below this sequence number are stale.
  settled: u64,
}

impl SearchBox {
  pub fn new(delay: Duration) -> Self {
    Self {
      input: TextInput::default(),
      debounce: Debounce::new(delay),
      pending_term: None,
      results: Vec::new(),
      visible: false,
      list_state: ListState::default(),
      issued: 0,
      settled: 0,
    }
  }

  /// React to a change of the input value.
  pub fn on_input(&mut self, now: Instant) {
    let term = self.input.value().trim().to_string();
    self.debounce.cancel();
    if term.is_empty() {
      self.pending_term = None;
      // Anything still in flight belongs to text that no longer exists.
      self.settled = self.issued;
      self.hide_results();
      return;
    }
    self.pending_term = Some(term);
    self.debounce.schedule(now);
  }

  /// Hand out the pending query once its quiet period has elapsed.
  pub fn poll(&mut self, now: Instant) -> Option<SearchQuery> {
    if !self.debounce.fire(now) {
      return None;
    }
    let term = self.pending_term.take()?;
    self.issued += 1;
    debug!(seq = self.issued, term = %term, "search: query due");
    Some(SearchQuery { seq: self.issued, term })
  }

  #[cfg(test)]
  pub fn is_pending(&self) -> bool {
    self.debounce.is_pending()
  }

  /// Apply a backend response. Returns `false` when it was stale and dropped.
  pub fn apply_results(&mut self, seq: u64, items: Vec<SearchItem>) -> bool {
    if seq <= self.settled {
      debug!(seq, settled = self.settled, "search: dropping stale response");
      return false;
    }
    self.settled = seq;
    if items.is_empty() {
      self.hide_results();
      return true;
    }
    self.results = items;
    self.visible = true;
    self.list_state.select(Some(0));
    true
  }

  pub fn hide_results(&mut self) {
    self.visible = false;
    self.results.clear();
    self.list_state.select(None);
  }

  pub fn is_visible(&self) -> bool {
    self.visible
  }

  pub fn results(&self) -> &[SearchItem] {
    &self.results
  }

  /// Document-level click handling: anything outside the box and the input dismisses.
  pub fn on_document_click(&mut self, click: SearchClick) {
    if click == SearchClick::Elsewhere && self.visible {
      self.hide_results();
    }
  }

  pub fn select_next(&mut self) {
    let count = self.results.len();
    if count > 0 {
      let i = self.list_state.selected().map_or(0, |i| (i + 1) % count);
      self.list_state.select(Some(i));
    }
  }

  pub fn select_prev(&mut self) {
    let count = self.results.len();
    if count > 0 {
      let i = self.list_state.selected().map_or(0, |i| if i == 0 { count - 1 } else { i - 1 });
      self.list_state.select(Some(i));
    }
  }

  pub fn select_highlighted(&mut self) -> Navigation {
    match self.list_state.selected() {
      Some(i) => self.select(i),
      None => Navigation::Stay,
    }
  }

  /// Dispatch on the chosen result's type. The dropdown is always dismissed.
  pub fn select(&mut self, index: usize) -> Navigation {
    let nav = match self.results.get(index) {
      Some(item) => match item.kind {
        ResultKind::Artist => Navigation::ScrollTo(SectionId::Artists),
        ResultKind::Production => Navigation::ScrollTo(SectionId::Productions),
        ResultKind::Distributor => Navigation::ScrollTo(SectionId::Distributors),
        ResultKind::Project => match item.link() {
          Some(link) => Navigation::OpenPlayer { link: link.to_string(), title: item.label.trim().to_string() },
          None => Navigation::Stay,
        },
        ResultKind::Other => Navigation::Stay,
      },
      None => Navigation::Stay,
    };
    debug!(index, ?nav, "search: result selected");
    self.hide_results();
    nav
  }
}
