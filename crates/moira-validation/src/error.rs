//! Validation error types.

use std::fmt;
use thiserror::Error;

/// The kind of validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A required value was blank or a required list was empty.
    Empty,
    /// The value did not have the expected shape.
    InvalidFormat {
        /// Description of the expected shape.
        expected: String,
    },
    /// The value could not be parsed as a URL.
    InvalidUrl {
        /// Parser message.
        reason: String,
    },
    /// The URL host is not one of the allowed prefixes.
    HostNotAllowed {
        /// Allowed prefixes.
        allowed: Vec<String>,
    },
    /// A required query parameter was missing.
    MissingParameter {
        /// Parameter name.
        name: String,
    },
    /// A numeric value was not positive.
    NotPositive,
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "value is required"),
            Self::InvalidFormat { expected } => write!(f, "expected {expected}"),
            Self::InvalidUrl { reason } => write!(f, "invalid URL: {reason}"),
            Self::HostNotAllowed { allowed } => {
                write!(f, "host not allowed, expected one of [{}]", allowed.join(", "))
            }
            Self::MissingParameter { name } => write!(f, "missing query parameter '{name}'"),
            Self::NotPositive => write!(f, "value must be positive"),
        }
    }
}

/// A failed check on one field.
///
/// `message` is the text shown to the user; `kind` classifies the failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Field that failed, e.g. `targets[1]`.
    pub field: String,
    /// The failure class.
    pub kind: ValidationErrorKind,
    /// User-facing message.
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error.
    #[must_use]
    pub fn new(field: impl Into<String>, kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            message: message.into(),
        }
    }

    /// Create an "empty" validation error.
    #[must_use]
    pub fn empty(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field, ValidationErrorKind::Empty, message)
    }

    /// Create an "invalid format" validation error.
    #[must_use]
    pub fn invalid_format(
        field: impl Into<String>,
        expected: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(
            field,
            ValidationErrorKind::InvalidFormat {
                expected: expected.into(),
            },
            message,
        )
    }

    /// Check if this is an empty error.
    #[must_use]
    pub fn is_empty_error(&self) -> bool {
        matches!(self.kind, ValidationErrorKind::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_field_and_message() {
        let err = ValidationError::empty("name", "Can't be empty");
        assert_eq!(err.to_string(), "name: Can't be empty");
        assert!(err.is_empty_error());
    }

    #[test]
    fn test_kind_display() {
        let kind = ValidationErrorKind::HostNotAllowed {
            allowed: vec!["http://a".into(), "http://b".into()],
        };
        assert_eq!(kind.to_string(), "host not allowed, expected one of [http://a, http://b]");
    }
}
