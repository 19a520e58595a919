//! Logging setup for one mdimg run.
//!
//! Records are appended to `$XDG_STATE_HOME/mdimg/mdimg.log` so a failed
//! download can be looked up after the terminal output is gone. If that file
//! cannot be opened, records go to stderr instead.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,mdimg=debug,mdimg_core=debug";
const LOG_FILE: &str = "mdimg.log";

/// Where log records ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    File(PathBuf),
    Stderr,
}

/// Log file location under `state_home`.
pub fn log_file_in(state_home: &Path) -> PathBuf {
    state_home.join("mdimg").join(LOG_FILE)
}

/// Opens (creating parents) the log file under `state_home` for appending.
fn open_log_file_in(state_home: &Path) -> Result<(PathBuf, fs::File)> {
    let path = log_file_in(state_home);
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open {}", path.display()))?;
    Ok((path, file))
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn install<W>(writer: W) -> bool
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .is_ok()
}

/// Installs the global subscriber: the XDG log file when it can be opened,
/// stderr otherwise. Calling it again is harmless; the first subscriber stays.
pub fn init() -> LogSink {
    let opened = xdg::BaseDirectories::new()
        .context("locate XDG state dir")
        .and_then(|dirs| open_log_file_in(&dirs.get_state_home()));

    match opened {
        Ok((path, file)) => {
            if install(Mutex::new(file)) {
                tracing::info!(path = %path.display(), "logging to file");
            }
            LogSink::File(path)
        }
        Err(e) => {
            install(std::io::stderr);
            tracing::warn!(error = %format!("{:#}", e), "log file unavailable, logging to stderr");
            LogSink::Stderr
        }
    }
}
