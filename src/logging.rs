use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Route `tracing` output to `<data dir>/logs/studio.log`; stdout belongs to the TUI.
///
/// The filter comes from `STUDIO_LOG` (e.g. `studio=debug`), defaulting to `info`.
/// Keep the returned guard alive for as long as logs should be flushed.
pub fn init() -> Result<WorkerGuard> {
  let log_dir = ProjectDirs::from("", "", "studio")
    .map(|dirs| dirs.data_dir().join("logs"))
    .unwrap_or_else(|| std::env::temp_dir().join("studio-logs"));
  std::fs::create_dir_all(&log_dir).with_context(|| format!("Failed to create log dir {}", log_dir.display()))?;

  let appender = tracing_appender::rolling::never(&log_dir, "studio.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);
  let filter = EnvFilter::try_from_env("STUDIO_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

  tracing_subscriber::fmt()
    .with_writer(writer)
    .with_env_filter(filter)
    .with_ansi(false)
    .try_init()
    .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))?;
  Ok(guard)
}
