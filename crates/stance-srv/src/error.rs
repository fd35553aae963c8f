//! Error types for the server boundary.

use thiserror::Error;

/// Errors that can occur while configuring or running the HTTP boundary.
///
/// Evaluation itself never contributes here: the engine is infallible by
/// construction, so these are all startup and serving problems.
#[derive(Error, Debug)]
pub enum SrvError {
    /// Configuration file is present but invalid.
    #[error("config error: {0}")]
    Config(String),

    /// Failed to bind the listen address or serve on it.
    #[error("server error: {0}")]
    Server(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
