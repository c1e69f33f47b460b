use std::path::PathBuf;

use crate::QuestionId;

/// Fallback shown when the endpoint rejects a form without a usable `message`.
pub(crate) const REJECTION_FALLBACK: &str = "Failed to save form.";

/// The form is not ready to be submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("The form has no questions")]
    NoQuestions,

    #[error("The form has no header image")]
    MissingHeaderImage,
}

/// Error type for a failed save attempt.
///
/// Every variant is terminal for that attempt and recoverable by saving again.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// Local pre-submission check failed; nothing was sent.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The endpoint answered with a non-2xx status.
    #[error("{message}")]
    RemoteRejection { status: u16, message: String },

    /// No usable response (network failure or malformed body).
    #[error("Transport failure: {0}")]
    TransportFailure(#[source] anyhow::Error),
}

impl SaveError {
    /// Create a transport failure from any error type.
    pub fn transport(err: impl Into<anyhow::Error>) -> Self {
        Self::TransportFailure(err.into())
    }

    /// Check if this error was raised before anything was sent.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<SubmitError> for SaveError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Rejected { status, message } => Self::RemoteRejection {
                status,
                message: message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| REJECTION_FALLBACK.to_string()),
            },
            SubmitError::Transport(err) => Self::TransportFailure(err),
        }
    }
}

/// Error type reported by a [`FormSubmitter`](crate::FormSubmitter).
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// The endpoint answered with a non-2xx status. `message` is taken from the JSON
    /// error body when present.
    #[error("Rejected with status {status}: {}", .message.as_deref().unwrap_or("<no message>"))]
    Rejected {
        status: u16,
        message: Option<String>,
    },

    /// Network failure, or a response that could not be read.
    #[error("Transport error: {0}")]
    Transport(#[source] anyhow::Error),
}

impl SubmitError {
    /// Create a transport error from any error type.
    pub fn transport(err: impl Into<anyhow::Error>) -> Self {
        Self::Transport(err.into())
    }
}

/// Error type for composition operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComposeError {
    #[error("Option index {index} is out of range for question {id} ({len} options)")]
    OptionOutOfRange {
        id: QuestionId,
        index: usize,
        len: usize,
    },
}

/// Error type reported by an [`ImagePicker`](crate::ImagePicker).
///
/// Composers swallow these; they only reach the log.
#[derive(Debug, thiserror::Error)]
pub enum PickError {
    #[error("No such image: {}", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Picker error: {0}")]
    Backend(#[source] anyhow::Error),
}

impl PickError {
    /// Create a backend error from any error type.
    pub fn backend(err: impl Into<anyhow::Error>) -> Self {
        Self::Backend(err.into())
    }
}
