//! DeepSeek chat completion client
//!
//! Plain HTTPS JSON client for the DeepSeek chat completion API. The
//! configured key is sent as-is; an unset key surfaces as an upstream
//! authorization failure wrapped in a `Provider` error.

use crate::error::AppError;
use crate::providers::wire::{extract_error_message, ChatCompletionRequest, ChatCompletionResponse};
use crate::providers::{ChatCompletion, ChatMessage};

const DEEPSEEK_API_BASE_URL: &str = "https://api.deepseek.com/v1";

/// Output token ceiling sent with every request
const MAX_TOKENS: u32 = 8192;

/// Sampling temperature sent with every request
const TEMPERATURE: f32 = 0.7;

/// HTTP client for the DeepSeek chat completion API
pub struct DeepSeekClient {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl DeepSeekClient {
    /// Create a client against the production API endpoint
    pub fn new(client: reqwest::Client, api_key: Option<String>) -> Self {
        Self::with_base_url(client, api_key, DEEPSEEK_API_BASE_URL)
    }

    /// Create a client against a custom base URL (for testing)
    pub fn with_base_url(
        client: reqwest::Client,
        api_key: Option<String>,
        base_url: &str,
    ) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.to_string(),
        }
    }

    /// Send a conversation and return the uniform completion result
    ///
    /// # Errors
    /// * `AppError::Provider` on transport failures, non-success statuses,
    ///   or unparseable response bodies
    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        model: &str,
    ) -> Result<ChatCompletion, AppError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request_body = ChatCompletionRequest {
            model: model.to_string(),
            messages: messages.to_vec(),
            max_completion_tokens: None,
            max_tokens: Some(MAX_TOKENS),
            temperature: Some(TEMPERATURE),
        };

        tracing::debug!(
            model = %model,
            turns = messages.len(),
            "Calling DeepSeek API"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.as_deref().unwrap_or_default())
            .json(&request_body)
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("DeepSeek Error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());

            tracing::error!(
                status_code = status.as_u16(),
                error_body = %error_body,
                "DeepSeek API returned error status"
            );

            return Err(AppError::Provider(format!(
                "DeepSeek Error: {}",
                extract_error_message(status, &error_body)
            )));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AppError::Provider(format!("DeepSeek Error: {}", e)))?;

        Ok(parsed.into_completion(model))
    }
}
