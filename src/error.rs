//
// error.rs
// DocVerify-Tools-rs
//
// Error taxonomy shared by the decoder, the signal extractors, the intake gate and the quarantine store.
//
// Thales Matheus Mendonça Santos - November 2025

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::evaluate::SignalKind;

/// Reviewer-facing text for failures the uploader can fix by sending a new file.
pub const REUPLOAD_MESSAGE: &str = "could not analyze document, please re-upload";

#[derive(Debug, Error)]
pub enum DocumentError {
    /// The bytes are not a raster image we can parse.
    #[error("Failed to decode document image: {0}")]
    Decode(String),

    /// A signal computation could not run on the decoded buffer.
    #[error("Signal extraction failed ({signal}): {message}")]
    Extractor { signal: SignalKind, message: String },

    /// Upload refused before any pixel was looked at.
    #[error("Upload rejected: {0}")]
    Intake(String),

    #[error("Invalid validation thresholds: {0}")]
    InvalidThresholds(String),

    /// Quarantine lifecycle misuse (e.g. releasing a document that is not quarantined).
    #[error("Invalid status transition: {0}")]
    InvalidTransition(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, DocumentError>;

/// Stable, serializable classification of a [`DocumentError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    DecodeError,
    ExtractorError,
    IntakeError,
    ConfigurationError,
    LifecycleError,
    IoError,
}

impl DocumentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DocumentError::Decode(_) => ErrorKind::DecodeError,
            DocumentError::Extractor { .. } => ErrorKind::ExtractorError,
            DocumentError::Intake(_) => ErrorKind::IntakeError,
            DocumentError::InvalidThresholds(_) => ErrorKind::ConfigurationError,
            DocumentError::InvalidTransition(_) => ErrorKind::LifecycleError,
            DocumentError::Io(_) | DocumentError::Serialization(_) => ErrorKind::IoError,
        }
    }

    /// Message safe to show to reviewers and uploaders.
    pub fn user_message(&self) -> String {
        match self {
            DocumentError::Decode(_) | DocumentError::Extractor { .. } => {
                REUPLOAD_MESSAGE.to_string()
            }
            DocumentError::Intake(reason) => reason.clone(),
            other => other.to_string(),
        }
    }

    pub(crate) fn extractor(signal: SignalKind, message: impl Into<String>) -> Self {
        DocumentError::Extractor {
            signal,
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for DocumentError {
    fn from(err: serde_json::Error) -> Self {
        DocumentError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_and_extractor_errors_hide_internal_detail() {
        let decode = DocumentError::Decode("bad PNG signature".into());
        assert_eq!(decode.kind(), ErrorKind::DecodeError);
        assert_eq!(decode.user_message(), REUPLOAD_MESSAGE);

        let extractor = DocumentError::extractor(SignalKind::Ela, "image has zero area");
        assert_eq!(extractor.kind(), ErrorKind::ExtractorError);
        assert_eq!(extractor.user_message(), REUPLOAD_MESSAGE);
        assert_eq!(
            extractor.to_string(),
            "Signal extraction failed (ela_score): image has zero area"
        );
    }

    #[test]
    fn intake_errors_surface_their_reason() {
        let err = DocumentError::Intake("File size must not exceed 10MB".into());
        assert_eq!(err.kind(), ErrorKind::IntakeError);
        assert_eq!(err.user_message(), "File size must not exceed 10MB");
    }

    #[test]
    fn error_kind_serializes_in_snake_case() {
        let json = serde_json::to_string(&ErrorKind::DecodeError).expect("serialize");
        assert_eq!(json, "\"decode_error\"");
    }
}
