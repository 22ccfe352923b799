//! Chat-completion wire format
//!
//! Both upstream providers speak the same chat-completion JSON dialect;
//! these types cover the request and response bodies for both, with the
//! provider-specific knobs optional.

use crate::providers::{ChatCompletion, ChatMessage, TokenUsage};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Request body for a chat completion call
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    /// Model identifier to run the completion with
    pub model: String,
    /// Ordered conversation turns
    pub messages: Vec<ChatMessage>,
    /// Output token ceiling (OpenAI's newer parameter name)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<u32>,
    /// Output token ceiling (classic parameter name)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Response body of a chat completion call
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    /// Completion candidates; the first one carries the reply
    #[serde(default)]
    pub choices: Vec<Choice>,
    /// Model identifier as resolved by the provider
    #[serde(default)]
    pub model: Option<String>,
    /// Token accounting, if the provider reports it
    #[serde(default)]
    pub usage: Option<WireUsage>,
}

/// One completion candidate
#[derive(Debug, Deserialize)]
pub struct Choice {
    /// The assistant turn produced by the model
    pub message: ChoiceMessage,
}

/// Message payload inside a completion candidate
#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    /// Reply text; providers may omit it for empty replies
    #[serde(default)]
    pub content: Option<String>,
}

/// Token usage counters as reported on the wire
#[derive(Debug, Default, Deserialize)]
pub struct WireUsage {
    /// Tokens consumed by the prompt
    #[serde(default)]
    pub prompt_tokens: u32,
    /// Tokens produced in the completion
    #[serde(default)]
    pub completion_tokens: u32,
    /// Total tokens billed
    #[serde(default)]
    pub total_tokens: u32,
}

/// Error envelope some providers return on failure
#[derive(Debug, Deserialize)]
struct WireError {
    #[serde(default)]
    error: Option<WireErrorBody>,
}

#[derive(Debug, Deserialize)]
struct WireErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl ChatCompletionResponse {
    /// Collapse the wire response into the uniform completion shape
    ///
    /// Missing usage counters default to 0 so callers can always read
    /// numeric usage; the provider's resolved model name is echoed back,
    /// falling back to the requested one.
    pub fn into_completion(self, requested_model: &str) -> ChatCompletion {
        let content = self
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();
        let usage = self.usage.unwrap_or_default();

        ChatCompletion {
            content,
            model: self
                .model
                .unwrap_or_else(|| requested_model.to_string()),
            usage: TokenUsage {
                prompt_tokens: usage.prompt_tokens,
                completion_tokens: usage.completion_tokens,
                total_tokens: usage.total_tokens,
            },
        }
    }
}

/// Pull a human-readable message out of an upstream error body
///
/// Providers wrap failures as `{"error": {"message": ...}}`; when the body
/// is not parseable, fall back to the raw status and body text.
pub fn extract_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<WireError>(body) {
        if let Some(message) = parsed.error.and_then(|e| e.message) {
            return message;
        }
    }
    format!("HTTP {}: {}", status.as_u16(), body)
}
