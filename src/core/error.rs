use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while editing or submitting an invoice.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FacturaError {
    /// A line could not be added; the ledger is unchanged.
    #[error("line rejected: {}", join(.0))]
    LineRejected(Vec<ValidationError>),

    /// The document gate refused submission.
    #[error("submission refused: {}", join(.0))]
    Refused(Vec<ValidationError>),

    /// Lines cannot change while a submission is in flight.
    #[error("a submission is in flight; lines are locked until it completes")]
    Busy,

    /// Invalid endpoint or runtime configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl FacturaError {
    /// The field-level errors carried by this error, if any.
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            Self::LineRejected(errors) | Self::Refused(errors) => errors,
            _ => &[],
        }
    }

    /// True if any carried validation error is of the given kind.
    pub fn has_kind(&self, kind: ErrorKind) -> bool {
        self.validation_errors().iter().any(|e| e.kind == kind)
    }
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Kind of a field-level validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Empty after trimming.
    FieldRequired,
    /// Value does not match the expected shape (digits, phone, email, NIF pattern).
    PatternMismatch,
    /// Value is shorter than the minimum length.
    TooShort,
    /// NIF control letter does not match.
    ChecksumInvalid,
    /// CIF does not match `letter + 7 digits + alphanumeric`.
    FormatInvalid,
    /// Challenge answer does not equal the expected sum.
    ChallengeIncorrect,
    /// Document has no lines.
    EmptyLineSet,
    /// Line quantity, price, description or rate out of range.
    LineInputInvalid,
}

impl ErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            Self::FieldRequired => "required",
            Self::PatternMismatch => "pattern",
            Self::TooShort => "too-short",
            Self::ChecksumInvalid => "checksum",
            Self::FormatInvalid => "format",
            Self::ChallengeIncorrect => "challenge",
            Self::EmptyLineSet => "empty-lines",
            Self::LineInputInvalid => "line-input",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A single validation error with field name, message and kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Name of the invalid field (e.g. "numero_documento", "lines").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
    /// What kind of rule failed.
    pub kind: ErrorKind,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.field, self.message)
    }
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            kind,
        }
    }

    pub fn required(field: impl Into<String>) -> Self {
        Self::new(field, "this field is required", ErrorKind::FieldRequired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_field() {
        let e = ValidationError::required("email");
        assert_eq!(e.to_string(), "[required] email: this field is required");
    }

    #[test]
    fn refused_lists_every_error() {
        let err = FacturaError::Refused(vec![
            ValidationError::required("email"),
            ValidationError::new("lines", "no lines", ErrorKind::EmptyLineSet),
        ]);
        let msg = err.to_string();
        assert!(msg.starts_with("submission refused: "));
        assert!(msg.contains("[required] email"));
        assert!(msg.contains("[empty-lines] lines: no lines"));
        assert!(err.has_kind(ErrorKind::EmptyLineSet));
        assert!(!err.has_kind(ErrorKind::ChecksumInvalid));
    }

    #[test]
    fn busy_error_has_no_field_errors() {
        let err = FacturaError::Busy;
        assert!(err.validation_errors().is_empty());
        assert!(err.to_string().contains("in flight"));
    }
}
