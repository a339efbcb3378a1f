//! Error types for the moira-core crate.

use thiserror::Error;

/// Errors raised by the data model helpers.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A textual name did not match any known variant.
    #[error("unknown {kind}: {value}")]
    UnknownVariant {
        /// What was being parsed (e.g. "maintenance").
        kind: &'static str,
        /// The rejected input.
        value: String,
    },

    /// A numeric code did not match any known variant.
    #[error("unknown {kind} code: {code}")]
    UnknownCode {
        /// What was being decoded.
        kind: &'static str,
        /// The rejected code.
        code: i64,
    },
}

impl CoreError {
    pub(crate) fn unknown(kind: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownVariant {
            kind,
            value: value.into(),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for CoreError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_unknown_variant() {
        let err = CoreError::unknown("maintenance", "forever");
        assert_eq!(err.to_string(), "unknown maintenance: forever");
    }

    #[test]
    fn error_display_unknown_code() {
        let err = CoreError::UnknownCode {
            kind: "silent pattern type",
            code: 7,
        };
        assert_eq!(err.to_string(), "unknown silent pattern type code: 7");
    }

    #[test]
    fn error_from_serde_json() {
        let json_err = serde_json::from_str::<String>("invalid json");
        assert!(json_err.is_err());
        let core_err: CoreError = json_err.unwrap_err().into();
        assert!(matches!(core_err, CoreError::Serialization(_)));
    }
}
