mod api;
mod app;
mod config;
mod constants;
mod input;
mod loader;
mod logging;
mod manage;
mod models;
mod page;
mod player;
mod search;
mod storage;
mod text;
mod theme;
mod ui;
mod youtube;

use std::io;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use ratatui::{
  DefaultTerminal,
  crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
  },
};
use tracing::info;

use app::App;
use config::{Config, Overrides, Settings};
use constants::constants;
use storage::FileStorage;

// --- CLI ---

#[derive(Parser, Debug)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
struct Args {
  /// Backend base URL (default: http://127.0.0.1:5000)
  #[arg(short, long, env = "STUDIO_SERVER")]
  server: Option<String>,

  /// Manager username; when set, the app signs in at startup
  #[arg(short, long, env = "STUDIO_USERNAME")]
  username: Option<String>,

  /// Manager password
  #[arg(short, long, env = "STUDIO_PASSWORD", hide_env_values = true)]
  password: Option<String>,

  /// JSON catalog snapshot rendered as the page
  #[arg(short, long)]
  catalog: Option<PathBuf>,

  /// Skip the startup loading overlay
  #[arg(long)]
  no_loader: bool,

  /// Print a shell completion script and exit
  #[arg(long, value_name = "SHELL")]
  completions: Option<Shell>,
}

impl Args {
  fn overrides(&self) -> Overrides {
    Overrides {
      server: self.server.clone(),
      username: self.username.clone(),
      password: self.password.clone(),
      catalog: self.catalog.clone(),
      no_loader: self.no_loader,
    }
  }
}

// --- Main ---

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  if let Some(shell) = args.completions {
    clap_complete::generate(shell, &mut Args::command(), "studio", &mut io::stdout());
    return Ok(());
  }

  let _guard = logging::init().context("Failed to initialise logging")?;
  let settings = Settings::resolve(args.overrides(), Config::load());
  info!(server = %settings.server, catalog = ?settings.catalog, "starting");

  let mut app = App::new(&settings, Box::new(FileStorage::open()))?;
  app.setup();

  let default_hook = std::panic::take_hook();
  std::panic::set_hook(Box::new(move |info| {
    let _ = execute!(io::stdout(), DisableMouseCapture);
    ratatui::restore();
    default_hook(info);
  }));

  let mut terminal = ratatui::init();
  execute!(io::stdout(), EnableMouseCapture).context("Failed to enable mouse capture")?;
  let result = run(&mut terminal, &mut app);
  let _ = execute!(io::stdout(), DisableMouseCapture);
  ratatui::restore();
  info!("exiting");
  result
}

fn run(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
  let mut page_loaded = false;

  loop {
    app.check_pending();
    app.tick(Instant::now());

    terminal.draw(|frame| ui::ui(frame, app))?;

    // The page counts as loaded once its first frame is on screen.
    if !page_loaded {
      app.loader.on_page_load(Instant::now());
      page_loaded = true;
    }

    if event::poll(constants().tick())? {
      match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
          input::handle_key_event(app, key, Instant::now());
        }
        Event::Mouse(mouse) => input::handle_mouse_event(app, mouse),
        _ => {}
      }
    }

    if app.should_quit {
      break;
    }
  }
  Ok(())
}
