use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// A single rejected request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Field name as it appears on the wire (`email`, `phoneNumber`).
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    #[must_use]
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self { field, message: message.into() }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every problem found while validating an identify request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed: {}", join_errors(.0))]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

fn join_errors(errors: &[FieldError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

/// A stored `link_precedence` value was neither `primary` nor `secondary`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid link precedence: {0}")]
pub struct InvalidLinkPrecedence(pub String);
