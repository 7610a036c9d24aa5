//! Curation error types.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CurateError>;

/// Which side of a curation call a column was expected on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableRole {
    Input,
    Reference,
}

impl std::fmt::Display for TableRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableRole::Input => f.write_str("input"),
            TableRole::Reference => f.write_str("reference"),
        }
    }
}

#[derive(Debug, Error)]
pub enum CurateError {
    #[error("Column '{column}' not found in {table} table")]
    MissingColumn { column: String, table: TableRole },

    #[error("Cannot curate an empty table")]
    EmptyInput,

    #[error("Reference table {key} unavailable: {reason}")]
    ReferenceUnavailable { key: String, reason: String },

    #[error("Alias '{alias}' maps to both '{first}' and '{second}'")]
    AmbiguousAlias {
        alias: String,
        first: String,
        second: String,
    },

    #[error("{0} column already exists")]
    DuplicateColumn(String),

    #[error("Invalid reference table: {0}")]
    InvalidReference(String),

    #[error("Invalid column map: {0}")]
    InvalidColumnMap(String),

    #[error("Column '{column}' has {actual} rows, expected {expected}")]
    ShapeMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },
}

impl CurateError {
    pub fn missing_input(column: impl Into<String>) -> Self {
        CurateError::MissingColumn { column: column.into(), table: TableRole::Input }
    }

    pub fn missing_reference(column: impl Into<String>) -> Self {
        CurateError::MissingColumn { column: column.into(), table: TableRole::Reference }
    }
}
