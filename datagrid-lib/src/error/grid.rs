//! Top-level error type

use super::ConfigError;
use super::ExportError;

/// Any error produced by the datagrid library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Export(#[from] ExportError),

    /// Malformed table document or record JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias using the library [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
