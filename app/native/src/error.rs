//! Error types for chunkwall.
//!
//! Each module has its own error enum; this one is what the CLI reports.

use thiserror::Error;

use crate::config::ConfigError;
use crate::layout::LayoutError;

/// Errors that end a CLI invocation.
#[derive(Debug, Error)]
pub enum ChunkwallError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// IO error.
    #[error("IO error: {0}")]
    IoError(String),
}

impl From<ConfigError> for ChunkwallError {
    fn from(err: ConfigError) -> Self { Self::ConfigError(err.to_string()) }
}

impl From<LayoutError> for ChunkwallError {
    fn from(err: LayoutError) -> Self { Self::ConfigError(err.to_string()) }
}
