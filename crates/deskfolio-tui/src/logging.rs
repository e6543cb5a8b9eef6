//! JSONL logging to a file.
//!
//! stderr is the TUI canvas, so nothing is written there. Each line in
//! `<data dir>/logs/deskfolio.jsonl` is one JSON event; `RUST_LOG` overrides
//! the default filter.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_FILE_NAME: &str = "deskfolio.jsonl";

const DEFAULT_FILTER: &str = "info,hyper=warn,reqwest=warn";

pub fn log_path(data_dir: &Path) -> PathBuf {
    data_dir.join("logs").join(LOG_FILE_NAME)
}

/// Install the global subscriber. Keep the returned guard alive until exit;
/// dropping it flushes pending lines.
pub fn init(data_dir: &Path) -> Result<WorkerGuard> {
    let path = log_path(data_dir);
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(file);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let json_layer = fmt::layer()
        .json()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::info!(log_path = %path.display(), "Logging initialized");
    Ok(guard)
}
