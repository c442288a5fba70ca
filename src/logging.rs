//! File-based logging. The TUI owns the terminal, so tracing output goes
//! to a log file under the platform data directory.

use color_eyre::{eyre::eyre, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Environment variable controlling the log filter (EnvFilter syntax).
pub const LOG_ENV: &str = "HEARTH_LOG";

/// Initialize logging.
///
/// The returned guard must stay alive for the duration of the program or
/// buffered log lines are lost on exit.
pub fn init() -> Result<WorkerGuard> {
  let dir = dirs::data_dir()
    .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
    .ok_or_else(|| eyre!("Could not determine data directory"))?
    .join("hearth");

  std::fs::create_dir_all(&dir).map_err(|e| eyre!("Failed to create log directory: {}", e))?;

  let appender = tracing_appender::rolling::never(dir, "hearth.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);

  let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("hearth=info"));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(writer)
    .with_ansi(false)
    .init();

  Ok(guard)
}
