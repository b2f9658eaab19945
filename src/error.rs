use thiserror::Error;

/// Failures surfaced by the assist pipeline.  Every variant maps to exactly
/// one HTTP status code and a stable user-facing message; the handler
/// matches on the variant, never on message text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssistError {
    /// The request body was not a JSON object of the expected shape.
    #[error("Invalid JSON format.")]
    MalformedInput,
    #[error("Missing required fields: text and action.")]
    MissingField,
    #[error("Text cannot be empty.")]
    EmptyText,
    #[error("Text is too short. Minimum 10 characters required.")]
    TextTooShort,
    #[error("Text is too long. Maximum 10000 characters allowed.")]
    TextTooLong,
    #[error("Invalid action. Allowed values: summarize, reply, bullets.")]
    InvalidAction,
    #[error("Method not allowed. Only POST requests are accepted.")]
    MethodNotAllowed,
    /// Any failure contacting or interpreting the completion provider.
    #[error("AI processing failed: {0}")]
    Upstream(String),
}

impl AssistError {
    /// HTTP status carried by the formatted envelope.
    pub fn http_status(&self) -> u16 {
        match self {
            AssistError::MethodNotAllowed => 405,
            AssistError::Upstream(_) => 500,
            _ => 400,
        }
    }
}
