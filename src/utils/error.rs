//! The `error` module defines the error types used within the `parlor`
//! application.
//!
//! Per-session protocol failures are answered inline on the wire and never
//! surface here; `ServerError` covers only process-level startup failures.

use thiserror::Error;

/// Errors that can abort server startup.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Binding or inspecting the listener socket failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Loading or deserializing the configuration failed.
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
