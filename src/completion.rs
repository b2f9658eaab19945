//! Outbound completion provider client.
//!
//! Issues a single chat-completion request to the configured endpoint.
//! When no usable credential is configured the client degrades to a
//! deterministic canned response instead, so a missing key never surfaces
//! as an error to the caller.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AssistError;

/// Placeholder value shipped in sample configurations; treated the same as
/// an absent credential.
pub const PLACEHOLDER_API_KEY: &str = "your-openai-api-key-here";

const MODEL: &str = "gpt-3.5-turbo";
const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that provides concise and accurate responses.";
const MAX_TOKENS: u32 = 500;
const TEMPERATURE: f32 = 0.7;

const CANNED_SUMMARY: &str = "This is a summary of your text. The main points have been condensed into a brief overview that captures the essential information while maintaining clarity and coherence.";
const CANNED_REPLY: &str = "Thank you for your message. I appreciate you taking the time to reach out. I've reviewed your input and wanted to provide a thoughtful and professional response. Please let me know if you need any additional information or clarification.";
const CANNED_BULLETS: &str = "\u{2022} Main point from your text has been identified\n\u{2022} Key information has been extracted and organized\n\u{2022} Content is presented in clear, concise bullet points\n\u{2022} Easy to read and understand format\n\u{2022} Professional presentation of information";
const CANNED_GENERIC: &str = "Your text has been processed successfully.";

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Generated text, whether produced upstream or by the fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
}

/// Client for the external text-generation API.  Constructed once at
/// startup; the underlying `reqwest::Client` is cheap to clone and carries
/// the request timeout and TLS verification settings.
#[derive(Clone)]
pub struct CompletionClient {
    endpoint: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl CompletionClient {
    pub fn new(endpoint: String, api_key: Option<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build reqwest client");
        Self {
            endpoint,
            api_key,
            client,
        }
    }

    /// True when requests will be served by the canned fallback.
    pub fn is_fallback(&self) -> bool {
        self.usable_key().is_none()
    }

    fn usable_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && *key != PLACEHOLDER_API_KEY)
    }

    /// Run one prompt through the provider.  Exactly one outbound request
    /// is issued; there are no retries.
    pub async fn complete(&self, prompt: &str) -> Result<Completion, AssistError> {
        let Some(key) = self.usable_key() else {
            tracing::debug!("no usable API credential, serving canned response");
            return Ok(canned_completion(prompt));
        };

        let request = ChatRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(key)
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, "completion request failed");
                AssistError::Upstream(format!("API request failed: {}", err))
            })?;

        let status = response.status();
        if status.as_u16() != 200 {
            tracing::warn!(status = status.as_u16(), "completion provider returned error status");
            return Err(AssistError::Upstream(format!(
                "API returned error code: {}",
                status.as_u16()
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|_| AssistError::Upstream("Invalid API response format.".to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AssistError::Upstream("No content in API response.".to_string()))?;

        Ok(Completion {
            text: content.trim().to_string(),
        })
    }
}

/// Deterministic fallback keyed off the instruction line of the prompt.
/// One canned string per action family plus a generic catch-all.
fn canned_completion(prompt: &str) -> Completion {
    let instruction = prompt.lines().next().unwrap_or("").to_lowercase();
    let text = if instruction.contains("summarize") {
        CANNED_SUMMARY
    } else if instruction.contains("reply") {
        CANNED_REPLY
    } else if instruction.contains("bullet") {
        CANNED_BULLETS
    } else {
        CANNED_GENERIC
    };
    Completion {
        text: text.to_string(),
    }
}
