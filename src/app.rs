use anyhow::Result;
use ratatui::layout::Rect;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::api::StudioClient;
use crate::config::Settings;
use crate::constants::constants;
use crate::loader::Loader;
use crate::manage::{ManageModal, Mode, Submission};
use crate::models::{ApiReply, Entity, SearchItem};
use crate::page::Page;
use crate::player::PlayerModal;
use crate::search::{Navigation, SearchBox, SearchQuery};
use crate::storage::Storage;
use crate::theme::{Theme, ThemeController};

// --- Types ---

/// Which non-modal region receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
  Page,
  Search,
  Results,
}

/// Screen regions recorded at draw time, used to resolve mouse clicks to targets.
#[derive(Default, Debug)]
pub struct Hitboxes {
  pub theme_toggle: Option<Rect>,
  pub open_insert: Option<Rect>,
  pub open_delete: Option<Rect>,
  /// Rows area of the page, first row at `y`.
  pub page: Option<Rect>,
  pub search_input: Option<Rect>,
  /// Whole dropdown including its border.
  pub results_box: Option<Rect>,
  /// Rows area of the dropdown, first row at `y`.
  pub results_rows: Option<Rect>,
  pub player_content: Option<Rect>,
  pub player_close: Option<Rect>,
  pub manage_content: Option<Rect>,
  pub manage_close: Option<Rect>,
  pub manage_submit: Option<Rect>,
  pub manage_tabs: Vec<(Rect, Entity)>,
  pub manage_fields: Vec<(Rect, usize)>,
}

impl Hitboxes {
  pub fn clear(&mut self) {
    *self = Self::default();
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
  Anonymous,
  SigningIn,
  SignedIn(String),
  Rejected,
}

struct PendingSearch {
  seq: u64,
  rx: oneshot::Receiver<Result<Vec<SearchItem>>>,
}

/// In-flight async task receivers.
#[derive(Default)]
pub(crate) struct AsyncTasks {
  searches: Vec<PendingSearch>,
  submit_rx: Option<oneshot::Receiver<(Mode, Result<ApiReply>)>>,
  login_rx: Option<oneshot::Receiver<Result<bool>>>,
}

pub struct App {
  pub theme: ThemeController,
  pub loader: Loader,
  pub player: PlayerModal,
  pub search: SearchBox,
  pub manage: ManageModal,
  pub page: Page,
  pub focus: Focus,
  pub session: Session,
  pub hitboxes: Hitboxes,
  pub last_error: Option<String>,
  pub status_message: Option<String>,
  pub should_quit: bool,
  client: StudioClient,
  credentials: Option<(String, String)>,
  pub(crate) tasks: AsyncTasks,
  /// When the last error was set, for auto-dismiss.
  error_time: Option<Instant>,
}

impl App {
  pub fn new(settings: &Settings, storage: Box<dyn Storage>) -> Result<Self> {
    let c = constants();
    Ok(Self {
      theme: ThemeController::new(storage),
      loader: Loader::new(settings.loader, c.loader_delay()),
      player: PlayerModal::new(),
      search: SearchBox::new(c.search_debounce()),
      manage: ManageModal::new(),
      page: Page::new(settings.catalog.clone()),
      focus: Focus::Page,
      session: Session::Anonymous,
      hitboxes: Hitboxes::default(),
      last_error: None,
      status_message: None,
      should_quit: false,
      client: StudioClient::new(&settings.server)?,
      credentials: settings.credentials.clone(),
      tasks: AsyncTasks::default(),
      error_time: None,
    })
  }

  /// One-time wiring, run before the first frame.
  pub fn setup(&mut self) {
    self.theme.setup();
    if let Err(e) = self.page.reload() {
      warn!(err = %format!("{:#}", e), "page: catalog unavailable");
      self.set_error(format!("Catalog: {:#}", e));
    }
    self.trigger_login();
    info!(server = %self.client.base(), "app: ready");
  }

  pub fn palette(&self) -> &'static Theme {
    self.theme.palette()
  }

  // --- Status line ---

  /// Set an error message with auto-dismiss tracking.
  pub fn set_error(&mut self, msg: String) {
    self.last_error = Some(msg);
    self.error_time = Some(Instant::now());
  }

  /// Clear the current error message and its expiry timer.
  pub fn clear_error(&mut self) {
    self.last_error = None;
    self.error_time = None;
  }

  /// Clear stale error messages after the configured delay.
  pub fn expire_error(&mut self) {
    if let Some(t) = self.error_time
      && t.elapsed() >= Duration::from_secs(constants().error_dismiss_secs)
    {
      self.last_error = None;
      self.error_time = None;
    }
  }

  // --- Clock ---

  /// Advance every timer-driven controller.
  pub fn tick(&mut self, now: Instant) {
    self.loader.tick(now);
    self.page.tick();
    if let Some(query) = self.search.poll(now) {
      self.trigger_search(query);
    }
    self.expire_error();
  }

  // --- Session ---

  fn trigger_login(&mut self) {
    let Some((username, password)) = self.credentials.clone() else { return };
    self.session = Session::SigningIn;
    self.status_message = Some(format!("Signing in as {}…", username));
    let client = self.client.clone();
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(client.login(&username, &password).await);
    });
    self.tasks.login_rx = Some(rx);
  }

  // --- Search ---

  /// The search input changed.
  pub fn on_search_edited(&mut self, now: Instant) {
    self.search.on_input(now);
  }

  fn trigger_search(&mut self, query: SearchQuery) {
    info!(seq = query.seq, term = %query.term, "search triggered");
    let client = self.client.clone();
    let (tx, rx) = oneshot::channel();
    let term = query.term;
    tokio::spawn(async move {
      let _ = tx.send(client.search(&term).await);
    });
    self.tasks.searches.push(PendingSearch { seq: query.seq, rx });
  }

  /// Act on a chosen search result.
  pub fn navigate(&mut self, nav: Navigation) {
    match nav {
      Navigation::ScrollTo(section) => self.page.scroll_into_view(section),
      Navigation::OpenPlayer { link, title } => {
        self.player.open_player(&link, Some(&title));
      }
      Navigation::Stay => {}
    }
    self.focus = Focus::Page;
  }

  pub fn select_result(&mut self, index: usize) {
    let nav = self.search.select(index);
    self.navigate(nav);
  }

  // --- Page ---

  /// Activate the `open-project` control under the page cursor.
  pub fn open_selected_project(&mut self) {
    let Some((link, title)) = self.page.selected_project() else { return };
    let (link, title) = (link.to_string(), title.to_string());
    self.player.open_player(&link, Some(&title));
  }

  pub fn reload_page(&mut self) {
    match self.page.reload() {
      Ok(()) => {
        self.clear_error();
        self.status_message = Some("Catalog reloaded.".to_string());
      }
      Err(e) => self.set_error(format!("Reload failed: {:#}", e)),
    }
  }

  // --- Player ---

  pub fn launch_player(&mut self) {
    if let Err(e) = self.player.launch() {
      self.set_error(format!("{:#}", e));
    }
  }

  // --- Manage ---

  pub fn submit_manage(&mut self) {
    if self.submit_in_flight() {
      debug!("manage: submission already in flight");
      return;
    }
    let Some(submission) = self.manage.begin_submit() else {
      debug!("manage: nothing to submit");
      return;
    };
    let mode = submission.mode();
    info!(mode = ?mode, "manage: submitting");
    let client = self.client.clone();
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let outcome = match submission {
        Submission::Insert { entity, data } => client.insert(entity, &data).await,
        Submission::Delete { entity, id } => client.delete(entity, &id).await,
      };
      let _ = tx.send((mode, outcome));
    });
    self.tasks.submit_rx = Some(rx);
  }

  // --- Task completion ---

  pub fn check_pending(&mut self) {
    let searches = std::mem::take(&mut self.tasks.searches);
    for mut pending in searches {
      match pending.rx.try_recv() {
        Ok(Ok(items)) => {
          self.search.apply_results(pending.seq, items);
        }
        Ok(Err(e)) => {
          warn!(seq = pending.seq, err = %format!("{:#}", e), "search failed");
        }
        Err(oneshot::error::TryRecvError::Empty) => {
          self.tasks.searches.push(pending);
        }
        Err(oneshot::error::TryRecvError::Closed) => {
          warn!(seq = pending.seq, "search task dropped");
        }
      }
    }

    if let Some(mut rx) = self.tasks.submit_rx.take() {
      match rx.try_recv() {
        Ok((mode, outcome)) => self.manage.finish_submit(mode, outcome),
        Err(oneshot::error::TryRecvError::Empty) => {
          self.tasks.submit_rx = Some(rx);
        }
        Err(oneshot::error::TryRecvError::Closed) => {
          let mode = self.manage.mode();
          self.manage.finish_submit(mode, Err(anyhow::anyhow!("submit task dropped")));
        }
      }
    }

    if let Some(mut rx) = self.tasks.login_rx.take() {
      match rx.try_recv() {
        Ok(result) => {
          self.status_message = None;
          let username = self.credentials.as_ref().map(|(u, _)| u.clone()).unwrap_or_default();
          match result {
            Ok(true) => self.session = Session::SignedIn(username),
            Ok(false) => {
              self.session = Session::Rejected;
              self.set_error("Sign-in rejected: check username and password.".to_string());
            }
            Err(e) => {
              self.session = Session::Rejected;
              self.set_error(format!("Sign-in failed: {:#}", e));
            }
          }
        }
        Err(oneshot::error::TryRecvError::Empty) => {
          self.tasks.login_rx = Some(rx);
        }
        Err(oneshot::error::TryRecvError::Closed) => {
          self.status_message = None;
          self.session = Session::Rejected;
          self.set_error("Sign-in task failed.".to_string());
        }
      }
    }
  }

  pub fn searches_in_flight(&self) -> usize {
    self.tasks.searches.len()
  }

  pub fn submit_in_flight(&self) -> bool {
    self.tasks.submit_rx.is_some()
  }
}
