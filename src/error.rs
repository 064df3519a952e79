use thiserror::Error;

/// Errors raised while building, validating or (de)serializing an
/// emissivity table.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EmissivityError {
    #[error("{field} has an invalid shape: {detail}")]
    InvalidShape { field: &'static str, detail: String },

    #[error("{0} should be monotonically increasing")]
    NotMonotonic(&'static str),

    #[error("{0} should be strictly positive")]
    NonPositive(&'static str),

    #[error("{0} should be non-negative")]
    NegativeValue(&'static str),

    #[error("{dependency} needs to be set before {field}")]
    MissingDependency {
        field: &'static str,
        dependency: &'static str,
    },

    #[error("Not all attributes of the emissivities are set")]
    IncompleteTable,

    #[error("Unknown emissivity variable: {0}")]
    UnsupportedVariable(String),

    #[error("Table set has no keyword '{0}'")]
    MissingKeyword(String),

    #[error("Table set has no table '{0}'")]
    MissingTable(String),

    #[error("Table '{table}' has no column '{column}'")]
    MissingColumn { table: String, column: String },

    #[error("Column '{column}' should hold {expected} values")]
    ColumnKind {
        column: String,
        expected: &'static str,
    },
}

impl EmissivityError {
    pub(crate) fn shape(field: &'static str, detail: impl Into<String>) -> Self {
        EmissivityError::InvalidShape {
            field,
            detail: detail.into(),
        }
    }
}
