//! Request decoding and validation.
//!
//! The inbound payload is decoded into a loose shape first so that missing
//! fields can be told apart from malformed JSON, then checked in a fixed
//! order: required fields, text emptiness, text length, action membership.
//! Only the first failing check is reported.

use serde::Deserialize;

use crate::error::AssistError;

/// Minimum accepted text length in characters, after trimming.
pub const MIN_TEXT_CHARS: usize = 10;
/// Maximum accepted text length in characters, after trimming.
pub const MAX_TEXT_CHARS: usize = 10_000;

/// The closed set of supported text transformations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Summarize,
    Reply,
    Bullets,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Summarize => "summarize",
            Action::Reply => "reply",
            Action::Bullets => "bullets",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "summarize" => Some(Action::Summarize),
            "reply" => Some(Action::Reply),
            "bullets" => Some(Action::Bullets),
            _ => None,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload shape as decoded straight off the wire.  Both fields are
/// optional so absence is reported as `MissingField` rather than a decode
/// failure.  Unknown fields are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct RawAssistPayload {
    pub text: Option<String>,
    pub action: Option<String>,
}

impl RawAssistPayload {
    /// Best-effort action label for audit records, available even when
    /// validation fails.
    pub fn action_label(&self) -> &str {
        self.action
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("unknown")
    }

    /// Trimmed text length in characters for audit records.
    pub fn text_chars(&self) -> usize {
        self.text
            .as_deref()
            .map(|s| s.trim().chars().count())
            .unwrap_or(0)
    }
}

/// A fully validated request.  `text` is trimmed and within bounds and
/// `action` is a member of the closed enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistRequest {
    pub text: String,
    pub action: Action,
}

/// Decode the raw body.  Invalid JSON, a non-object payload or fields of
/// the wrong type all count as `MalformedInput`.
pub fn decode_payload(body: &[u8]) -> Result<RawAssistPayload, AssistError> {
    serde_json::from_slice(body).map_err(|_| AssistError::MalformedInput)
}

/// Validate the decoded payload into an immutable `AssistRequest`.
pub fn validate(payload: &RawAssistPayload) -> Result<AssistRequest, AssistError> {
    let (text, action) = match (payload.text.as_deref(), payload.action.as_deref()) {
        (Some(text), Some(action)) => (text.trim(), action.trim()),
        _ => return Err(AssistError::MissingField),
    };
    if text.is_empty() {
        return Err(AssistError::EmptyText);
    }
    let chars = text.chars().count();
    if chars < MIN_TEXT_CHARS {
        return Err(AssistError::TextTooShort);
    }
    if chars > MAX_TEXT_CHARS {
        return Err(AssistError::TextTooLong);
    }
    let action = Action::parse(action).ok_or(AssistError::InvalidAction)?;
    Ok(AssistRequest {
        text: text.to_string(),
        action,
    })
}
