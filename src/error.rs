//! Error types surfaced to the user
//!
//! Every [`UploadError`] ends the action that raised it but never the
//! session. The controller falls back to its last stable state and the
//! presenter shows `Error: <message>`.

use crate::selection::ImageSource;
use thiserror::Error;

/// Failure reported by a [`Detector`](crate::client::Detector)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DetectError {
    /// Network failure, or a body that is not the expected JSON. Carries the
    /// raw error text.
    #[error("{0}")]
    Transport(String),
    /// The service answered `success: false`
    #[error("{0}")]
    Service(String),
}

/// Text shown when a `success: false` response carries no `error` field
pub const SERVICE_FALLBACK_MESSAGE: &str = "Failed to analyze image";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UploadError {
    /// A non-image file was picked or dropped
    #[error("{}", .0.rejection_message())]
    Validation(ImageSource),
    /// Analysis requested with no image held
    #[error("Please select an image first")]
    State,
    #[error("An error occurred: {0}")]
    Transport(String),
    #[error("{0}")]
    Service(String),
}

impl From<DetectError> for UploadError {
    fn from(err: DetectError) -> Self {
        match err {
            DetectError::Transport(msg) => UploadError::Transport(msg),
            DetectError::Service(msg) => UploadError::Service(msg),
        }
    }
}

impl UploadError {
    /// The one-line notification text, `Error: <message>`
    pub fn notification(&self) -> String {
        format!("Error: {}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages_follow_source() {
        assert_eq!(
            UploadError::Validation(ImageSource::Picker).to_string(),
            "Please select a valid image file"
        );
        assert_eq!(
            UploadError::Validation(ImageSource::Drop).to_string(),
            "Please drop a valid image file"
        );
    }

    #[test]
    fn test_service_message_is_verbatim() {
        let err: UploadError = DetectError::Service("no face detected".into()).into();
        assert_eq!(err.to_string(), "no face detected");
        assert_eq!(err.notification(), "Error: no face detected");
    }

    #[test]
    fn test_transport_message_is_prefixed() {
        let err: UploadError = DetectError::Transport("connection refused".into()).into();
        assert_eq!(err.to_string(), "An error occurred: connection refused");
    }

    #[test]
    fn test_state_message() {
        assert_eq!(UploadError::State.notification(), "Error: Please select an image first");
    }
}
