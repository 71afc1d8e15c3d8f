use thiserror::Error;

use crate::types::UploadedFile;

/// Errors surfaced by the upload pipeline.
///
/// Nothing here is retried; every variant ends the current call.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Malformed or truncated multipart body, or a missing boundary.
    #[error("malformed multipart body: {0}")]
    Parse(String),

    /// The multipart body is larger than the configured bound.
    #[error("multipart body exceeds the {limit} byte limit")]
    SizeLimitExceeded { limit: u64 },

    /// A part's sniffed content type is not on the allow-list. Files written
    /// earlier in the same call stay on disk and are listed in `uploaded`.
    #[error("file type [{content_type}] is not allowed")]
    Validation {
        content_type: String,
        uploaded: Vec<UploadedFile>,
    },

    /// The client file name cannot be used as a destination name.
    #[error("invalid file name: {0:?}")]
    InvalidFileName(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no files were submitted")]
    NoFilesSubmitted,

    #[error("randomness unavailable: {0}")]
    RandomnessUnavailable(String),
}

impl UploadError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Records persisted before the failure; empty for every kind but `Validation`.
    pub fn uploaded(&self) -> &[UploadedFile] {
        match self {
            Self::Validation { uploaded, .. } => uploaded,
            _ => &[],
        }
    }

    /// True for failures caused by what the client sent rather than by the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Parse(_)
                | Self::SizeLimitExceeded { .. }
                | Self::Validation { .. }
                | Self::InvalidFileName(_)
                | Self::NoFilesSubmitted
        )
    }
}

pub type UploadResult<T> = Result<T, UploadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_side_failures_are_not_client_errors() {
        assert!(UploadError::NoFilesSubmitted.is_client_error());
        assert!(UploadError::SizeLimitExceeded { limit: 10 }.is_client_error());
        assert!(!UploadError::RandomnessUnavailable("closed".into()).is_client_error());
        assert!(!UploadError::io("write failed", std::io::Error::other("disk full")).is_client_error());
    }

    #[test]
    fn rejection_exposes_stored_records() {
        let stored = UploadedFile {
            original_file_name: "a.png".into(),
            new_file_name: "a.png".into(),
            size_bytes: 1,
        };
        let err = UploadError::Validation {
            content_type: "text/plain; charset=utf-8".into(),
            uploaded: vec![stored.clone()],
        };
        assert_eq!(err.uploaded(), [stored]);
        assert!(UploadError::NoFilesSubmitted.uploaded().is_empty());
    }
}
