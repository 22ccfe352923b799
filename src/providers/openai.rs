//! OpenAI chat completion client
//!
//! Direct HTTP client for the OpenAI chat completion API. The credential
//! check happens at first use, not at construction, so a missing key is a
//! diagnosable `MissingCredential` error rather than a startup failure.

use crate::error::AppError;
use crate::providers::wire::{extract_error_message, ChatCompletionRequest, ChatCompletionResponse};
use crate::providers::{ChatCompletion, ChatMessage};

const OPENAI_API_BASE_URL: &str = "https://api.openai.com/v1";

/// Output token ceiling sent with every request
const MAX_COMPLETION_TOKENS: u32 = 8192;

/// HTTP client for the OpenAI chat completion API
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl OpenAiClient {
    /// Create a client against the production API endpoint
    pub fn new(client: reqwest::Client, api_key: Option<String>) -> Self {
        Self::with_base_url(client, api_key, OPENAI_API_BASE_URL)
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
    /// * `AppError::MissingCredential` if no API key is configured
    /// * `AppError::Provider` on transport failures, non-success statuses,
    ///   or unparseable response bodies
    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        model: &str,
    ) -> Result<ChatCompletion, AppError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AppError::MissingCredential(
                "OpenAI API key is required. Please set OPENAI_API_KEY environment variable."
                    .to_string(),
            )
        })?;

        let url = format!("{}/chat/completions", self.base_url);
        let request_body = ChatCompletionRequest {
            model: model.to_string(),
            messages: messages.to_vec(),
            max_completion_tokens: Some(MAX_COMPLETION_TOKENS),
            max_tokens: None,
            temperature: None,
        };

        tracing::debug!(
            model = %model,
            turns = messages.len(),
            "Calling OpenAI API"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("OpenAI Error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());

            tracing::error!(
                status_code = status.as_u16(),
                error_body = %error_body,
                "OpenAI API returned error status"
            );

            return Err(AppError::Provider(format!(
                "OpenAI Error: {}",
                extract_error_message(status, &error_body)
            )));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AppError::Provider(format!("OpenAI Error: {}", e)))?;

        Ok(parsed.into_completion(model))
    }
}
