use thiserror::Error;

/// Everything that can go wrong while shaping a dataset for a chart.
///
/// Every variant is raised synchronously by the step that detects it and
/// aborts the whole preparation; no partial output is ever returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PrepError {
    #[error("required column '{column}' is missing from the dataset or is a reserved field")]
    InputShape { column: String },

    #[error("row {row}, column '{column}': '{value}' is not a number")]
    NumericCoercion {
        row: usize,
        column: String,
        value: String,
    },

    #[error("row {row}: '{value}' does not match date format '{format}'")]
    DateParse {
        row: usize,
        value: String,
        format: String,
    },

    #[error("duplicate node id '{id}'")]
    DuplicateId { id: String },

    #[error("node '{id}' references missing parent '{parent}'")]
    DanglingParent { id: String, parent: String },

    #[error("expected exactly one root node, found {found}")]
    RootCount { found: usize },

    #[error("node '{id}' is part of a cycle")]
    Cycle { id: String },

    #[error("malformed highlight range at row {row}: {reason}")]
    MalformedHighlightRange { row: usize, reason: String },
}

pub type Result<T> = std::result::Result<T, PrepError>;
