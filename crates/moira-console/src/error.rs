//! Console error types.

use moira_api::ApiError;
use moira_core::CoreError;
use moira_validation::ValidationError;
use thiserror::Error;

/// Errors raised by screens and commands.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// A gateway call failed; renders the server message.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Local form checks failed; nothing was sent.
    #[error("{}", join_messages(.0))]
    Validation(Vec<ValidationError>),

    /// A record could not be converted.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Required state was absent, e.g. mutating settings before they loaded.
    #[error("InvalidProgramState: {0}")]
    InvalidProgramState(String),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid command-line argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A referenced record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Output formatting failed.
    #[error("format error: {0}")]
    Format(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConsoleError {
    /// Shorthand for [`ConsoleError::InvalidProgramState`].
    pub fn invalid_state(what: impl Into<String>) -> Self {
        Self::InvalidProgramState(what.into())
    }
}

impl From<Vec<ValidationError>> for ConsoleError {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::Validation(errors)
    }
}

impl From<ValidationError> for ConsoleError {
    fn from(error: ValidationError) -> Self {
        Self::Validation(vec![error])
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for console operations.
pub type Result<T> = std::result::Result<T, ConsoleError>;
