use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "QUIZR_LOG";
const LOG_FILE: &str = "quizr.log";

/// Log to a file under `data_dir`. The terminal is in raw/alternate-screen
/// mode while the app runs, so nothing may be written to stdout or stderr.
///
/// `QUIZR_LOG` takes the usual env-filter directives, default `info`.
pub fn init(data_dir: &Path) -> Result<()> {
    fs::create_dir_all(data_dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(data_dir.join(LOG_FILE))?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))?;
    Ok(())
}
