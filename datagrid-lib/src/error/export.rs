//! Export error types

/// Errors reported by an export collaborator.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Writing the output failed.
    #[error("Export I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing rows failed.
    #[error("Export serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The collaborator does not support the requested format.
    #[error("Unsupported export format '{0}'")]
    UnsupportedFormat(String),
}
