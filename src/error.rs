use std::fmt;
use thiserror::Error;

/// A single argument that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub problem: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, problem: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            problem: problem.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.problem)
    }
}

fn join_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid arguments: {}", join_fields(.0))]
    Validation(Vec<FieldError>),

    #[error("Monobank API error {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("request to Monobank API failed: {0}")]
    Transport(String),

    #[error("unknown tool: {0}")]
    UnknownOperation(String),

    #[error("unexpected Monobank API response: {0}")]
    InvalidResponse(String),

    #[error("failed to serialize tool result: {0}")]
    Serialization(String),

    #[error("timestamp out of range: {0}")]
    InvalidTimestamp(i64),

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Failures caused by the caller's request rather than by executing it.
    pub fn is_invalid_request(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::UnknownOperation(_))
    }

    /// Names of the fields rejected by argument validation, if any.
    pub fn invalid_fields(&self) -> Vec<&str> {
        match self {
            Error::Validation(fields) => fields.iter().map(|f| f.field.as_str()).collect(),
            _ => Vec::new(),
        }
    }
}
