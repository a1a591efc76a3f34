//! Editor errors and the user-visible processing error.

/// Errors raised by editor store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditorError {
    #[error("Index {index} out of range for list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("A submission is already in progress")]
    SubmissionInFlight,
}

/// Transient message shown to the user after a failed submission.
///
/// There is a single slot for it in the session; a new error overwrites the
/// previous one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ProcessingError {
    message: String,
}

impl ProcessingError {
    pub const VIDEO_REQUIRED: &'static str = "Please upload a video first";
    pub const UNEXPECTED: &'static str = "An unexpected error occurred";

    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Submission attempted with no video selected.
    pub fn video_required() -> Self {
        Self::new(Self::VIDEO_REQUIRED)
    }

    /// Fallback when an error carries no usable message.
    pub fn unexpected() -> Self {
        Self::new(Self::UNEXPECTED)
    }

    /// Wrap an arbitrary error, keeping its display text when it has one.
    pub fn from_error(err: &dyn std::error::Error) -> Self {
        let message = err.to_string();
        if message.trim().is_empty() {
            Self::unexpected()
        } else {
            Self::new(message)
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<mochi_common::MochiError> for ProcessingError {
    fn from(err: mochi_common::MochiError) -> Self {
        Self::from_error(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mochi_common::MochiError;

    #[test]
    fn test_video_required_message() {
        assert_eq!(
            ProcessingError::video_required().message(),
            "Please upload a video first"
        );
    }

    #[test]
    fn test_from_mochi_error_keeps_message() {
        let err: ProcessingError = MochiError::transport("connection refused").into();
        assert_eq!(err.message(), "Transport error: connection refused");
    }

    #[test]
    fn test_empty_message_falls_back_to_generic() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "");
        let err = ProcessingError::from_error(&io);
        assert_eq!(err.message(), ProcessingError::UNEXPECTED);
    }
}
