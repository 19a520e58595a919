//! Fetch error type.

use thiserror::Error;

/// Why a single image GET failed. Either way the URL is skipped for the run.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, DNS, TLS, etc.).
    #[error("{0}")]
    Transport(#[from] curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Transport(e) if e.is_operation_timedout())
    }
}
