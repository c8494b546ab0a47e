//! Error types for the domain layer.

use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Error codes surfaced to callers of the sales agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Input errors
    EmptyUserText,
    InvalidModelIdentifier,
    InvalidStageCursor,

    // Provider errors
    ProviderUnavailable,
    NoContentProduced,

    // Structured output errors
    MalformedMetadata,
    UnknownStageTag,
    UnknownInterestLevel,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::EmptyUserText => "EMPTY_USER_TEXT",
            ErrorCode::InvalidModelIdentifier => "INVALID_MODEL_IDENTIFIER",
            ErrorCode::InvalidStageCursor => "INVALID_STAGE_CURSOR",
            ErrorCode::ProviderUnavailable => "PROVIDER_UNAVAILABLE",
            ErrorCode::NoContentProduced => "NO_CONTENT_PRODUCED",
            ErrorCode::MalformedMetadata => "MALFORMED_METADATA",
            ErrorCode::UnknownStageTag => "UNKNOWN_STAGE_TAG",
            ErrorCode::UnknownInterestLevel => "UNKNOWN_INTEREST_LEVEL",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_invalid_format_displays_correctly() {
        let err = ValidationError::invalid_format("interrupted_stage", "must not be objection");
        assert_eq!(
            format!("{}", err),
            "Field 'interrupted_stage' has invalid format: must not be objection"
        );
    }

    #[test]
    fn error_code_display_formats_correctly() {
        assert_eq!(format!("{}", ErrorCode::EmptyUserText), "EMPTY_USER_TEXT");
        assert_eq!(format!("{}", ErrorCode::ProviderUnavailable), "PROVIDER_UNAVAILABLE");
        assert_eq!(format!("{}", ErrorCode::UnknownStageTag), "UNKNOWN_STAGE_TAG");
    }
}
