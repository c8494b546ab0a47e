//! Parsing the provider's two-line structured output.
//!
//! Line one is the customer-facing SMS text. Line two is a metadata line of
//! the exact form `Stage: <Stage>; Interest: <cold|warm|hot>`. Anything after
//! the first line break belongs to the metadata part.

use std::fmt;
use thiserror::Error;

use super::stage::{InterestLevel, SalesStage};
use crate::domain::foundation::ErrorCode;

/// Errors produced while reading the structured output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplyParseError {
    #[error("provider produced no customer-facing text")]
    NoContentProduced,

    #[error("malformed metadata line: {0:?}")]
    MalformedMetadata(String),

    #[error("unknown stage tag: {0:?}")]
    UnknownStageTag(String),

    #[error("unknown interest level: {0:?}")]
    UnknownInterestLevel(String),
}

impl ReplyParseError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ReplyParseError::NoContentProduced => ErrorCode::NoContentProduced,
            ReplyParseError::MalformedMetadata(_) => ErrorCode::MalformedMetadata,
            ReplyParseError::UnknownStageTag(_) => ErrorCode::UnknownStageTag,
            ReplyParseError::UnknownInterestLevel(_) => ErrorCode::UnknownInterestLevel,
        }
    }
}

/// Raw output split at the first line break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyParts<'a> {
    pub message: &'a str,
    pub metadata: Option<&'a str>,
}

impl<'a> ReplyParts<'a> {
    /// Splits `raw` on its first `\n`. A trailing `\r` on either part is
    /// dropped; no other whitespace is touched.
    pub fn split(raw: &'a str) -> Self {
        match raw.split_once('\n') {
            Some((message, metadata)) => Self {
                message: message.trim_end_matches('\r'),
                metadata: Some(metadata.trim_end_matches('\r')),
            },
            None => Self {
                message: raw.trim_end_matches('\r'),
                metadata: None,
            },
        }
    }
}

/// The parsed `Stage: X; Interest: Y` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetadataLine {
    pub stage: SalesStage,
    pub interest: InterestLevel,
}

impl MetadataLine {
    /// Parses the metadata line strictly.
    ///
    /// Keys and values match case-insensitively. Two fields separated by
    /// `"; "` are required, in order; trailing punctuation is rejected.
    pub fn parse(line: &str) -> Result<Self, ReplyParseError> {
        let malformed = || ReplyParseError::MalformedMetadata(line.to_string());
        let trimmed = line.trim();

        let (stage_field, interest_field) = trimmed.split_once("; ").ok_or_else(malformed)?;
        let stage_value = field_value(stage_field, "stage").ok_or_else(malformed)?;
        let interest_value = field_value(interest_field, "interest").ok_or_else(malformed)?;

        let stage = stage_value
            .parse::<SalesStage>()
            .map_err(ReplyParseError::UnknownStageTag)?;
        let interest = interest_value
            .parse::<InterestLevel>()
            .map_err(ReplyParseError::UnknownInterestLevel)?;

        Ok(Self { stage, interest })
    }
}

impl fmt::Display for MetadataLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Stage: {}; Interest: {}", self.stage, self.interest)
    }
}

fn field_value<'a>(field: &'a str, key: &str) -> Option<&'a str> {
    let (name, value) = field.split_once(':')?;
    if !name.trim().eq_ignore_ascii_case(key) {
        return None;
    }
    let value = value.trim();
    if value.is_empty() || value.contains([';', ':']) {
        return None;
    }
    Some(value)
}

/// Renders the canonical metadata line for `stage` and `interest`.
pub fn format_metadata(stage: SalesStage, interest: InterestLevel) -> String {
    MetadataLine { stage, interest }.to_string()
}

/// A fully parsed structured reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReply {
    pub message_text: String,
    pub stage: SalesStage,
    pub interest: InterestLevel,
}

impl ParsedReply {
    /// Parses both lines. Fails if the message is blank or the metadata is
    /// absent or malformed.
    pub fn parse(raw: &str) -> Result<Self, ReplyParseError> {
        let parts = ReplyParts::split(raw);
        if parts.message.trim().is_empty() {
            return Err(ReplyParseError::NoContentProduced);
        }
        let metadata = parts
            .metadata
            .ok_or_else(|| ReplyParseError::MalformedMetadata(String::new()))?;
        let MetadataLine { stage, interest } = MetadataLine::parse(metadata)?;

        Ok(Self {
            message_text: parts.message.to_string(),
            stage,
            interest,
        })
    }

    /// Renders the reply back into the two-line wire form.
    pub fn to_raw(&self) -> String {
        format!(
            "{}\n{}",
            self.message_text,
            format_metadata(self.stage, self.interest)
        )
    }
}
