//! Configuration error types

/// Errors raised while configuring a table: column definitions, presentation
/// settings and column-level actions.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Two columns share a field.
    #[error("Duplicate column field '{0}'")]
    DuplicateColumn(String),

    /// A column was defined with an empty field name.
    #[error("Column field must not be empty")]
    EmptyField,

    /// An action named a column that does not exist.
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    /// An edit targeted a column that is not editable.
    #[error("Column '{0}' is not editable")]
    ReadOnlyColumn(String),

    /// Row height must be a positive, finite number.
    #[error("Invalid row height {0}")]
    InvalidRowHeight(f64),

    /// Page size must be at least one.
    #[error("Page size must be greater than zero")]
    ZeroPageSize,

    /// A column move referenced an index past the end.
    #[error("Index {index} out of range for {len} columns")]
    IndexOutOfRange { index: usize, len: usize },
}

impl ConfigError {
    /// Creates a duplicate column error.
    pub fn duplicate_column(field: impl Into<String>) -> Self {
        Self::DuplicateColumn(field.into())
    }

    /// Creates an unknown column error.
    pub fn unknown_column(field: impl Into<String>) -> Self {
        Self::UnknownColumn(field.into())
    }
}
