//! Error taxonomy for the studio.
//!
//! Every failure that can reach the user is one of these variants. The
//! `Display` text is what ends up in the error banner or on stderr, so it is
//! written for people, not for logs.

use thiserror::Error;

/// Top-level error for studio operations
#[derive(Debug, Error)]
pub enum StudioError {
    /// Missing credential or unusable configuration. Fatal to any generation call.
    #[error("{0}")]
    Configuration(String),

    /// A file could not be read or is not a supported image
    #[error("Failed to load {name}: {reason}")]
    Ingestion { name: String, reason: String },

    /// A precondition was violated before any network call
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The generation service returned nothing usable
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// Local persistence or export failure
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl StudioError {
    pub fn ingestion(name: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Ingestion {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// User attempted an action whose precondition does not hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please upload a model image first.")]
    MissingModelImage,
    #[error("Please select at least one item to try on.")]
    EmptySelection,
    #[error("Please enter a description for the clothing item.")]
    EmptyDescription,
}

/// Failure reported by, or while talking to, the generation service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The service rejected the request as structurally invalid (HTTP 400)
    #[error("The request was invalid. The model may not be able to process the provided images.")]
    InvalidRequest,
    /// The response carried no inline image part
    #[error("{0}")]
    NoImage(&'static str),
    /// The text step of item generation produced nothing usable
    #[error("Failed to generate a clothing description.")]
    NoText,
    /// Any other request-level failure; details go to the log
    #[error("{0}")]
    Failed(&'static str),
}

/// Convenience alias used across the crate
pub type Result<T, E = StudioError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages_are_user_facing() {
        let err = StudioError::from(ValidationError::MissingModelImage);
        assert_eq!(err.to_string(), "Please upload a model image first.");
    }

    #[test]
    fn test_ingestion_message_names_file() {
        let err = StudioError::ingestion("jacket.png", "unsupported image format");
        assert_eq!(
            err.to_string(),
            "Failed to load jacket.png: unsupported image format"
        );
    }

    #[test]
    fn test_invalid_request_is_distinguished() {
        let err = StudioError::from(GenerationError::InvalidRequest);
        assert!(err.to_string().starts_with("The request was invalid"));
    }
}
