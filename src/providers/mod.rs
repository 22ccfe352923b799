//! Provider adapter
//!
//! Normalizes calls to the upstream chat-completion APIs into one uniform
//! request/response shape, dispatching by model-name prefix. No retries,
//! no circuit breaking: upstream failures are wrapped into a typed error
//! and propagated.

pub mod deepseek;
pub mod openai;
pub mod wire;

pub use deepseek::DeepSeekClient;
pub use openai::OpenAiClient;

use crate::config::ProviderConfig;
use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// One conversation turn as sent upstream
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    /// Sender role ("user", "assistant", or "system")
    pub role: String,
    /// Turn text
    pub content: String,
}

/// Token usage counters for one completion
///
/// Counters missing from the upstream response default to 0, never absent.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    /// Tokens consumed by the prompt
    pub prompt_tokens: u32,
    /// Tokens produced in the completion
    pub completion_tokens: u32,
    /// Total tokens billed
    pub total_tokens: u32,
}

/// Uniform result of a chat completion call
#[derive(Debug, Clone)]
pub struct ChatCompletion {
    /// Assistant reply text
    pub content: String,
    /// Model identifier as resolved by the provider
    pub model: String,
    /// Token accounting for the call
    pub usage: TokenUsage,
}

/// Routes a chat completion request to one upstream provider by
/// model-name prefix
pub struct ProviderAdapter {
    openai: OpenAiClient,
    deepseek: DeepSeekClient,
}

impl ProviderAdapter {
    /// Build an adapter from resolved provider configuration
    ///
    /// Both clients share one pooled HTTP client. Credential absence is not
    /// checked here; it surfaces at first use.
    pub fn new(config: &ProviderConfig) -> Self {
        let client = reqwest::Client::new();
        Self {
            openai: OpenAiClient::new(client.clone(), config.openai_api_key.clone()),
            deepseek: DeepSeekClient::new(client, config.deepseek_api_key.clone()),
        }
    }

    /// Build an adapter pointing at custom base URLs (for testing)
    pub fn with_base_urls(
        config: &ProviderConfig,
        openai_base_url: &str,
        deepseek_base_url: &str,
    ) -> Self {
        let client = reqwest::Client::new();
        Self {
            openai: OpenAiClient::with_base_url(
                client.clone(),
                config.openai_api_key.clone(),
                openai_base_url,
            ),
            deepseek: DeepSeekClient::with_base_url(
                client,
                config.deepseek_api_key.clone(),
                deepseek_base_url,
            ),
        }
    }

    /// Send a conversation to the provider selected by the model prefix
    ///
    /// "gpt-" and "o1-" models go to OpenAI, "deepseek-" models go to
    /// DeepSeek; anything else fails with `AppError::UnknownModel`.
    pub async fn send_chat(
        &self,
        messages: &[ChatMessage],
        model: &str,
    ) -> Result<ChatCompletion, AppError> {
        if model.starts_with("gpt-") || model.starts_with("o1-") {
            self.openai.chat(messages, model).await
        } else if model.starts_with("deepseek-") {
            self.deepseek.chat(messages, model).await
        } else {
            Err(AppError::UnknownModel(model.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use serial_test::serial;

    fn test_config() -> ProviderConfig {
        ProviderConfig {
            openai_api_key: Some("test-key".to_string()),
            deepseek_api_key: Some("test-key".to_string()),
        }
    }

    fn hello() -> Vec<ChatMessage> {
        vec![ChatMessage {
            role: "user".to_string(),
            content: "hello".to_string(),
        }]
    }

    #[tokio::test]
    async fn test_send_chat_unknown_model() {
        let adapter = ProviderAdapter::new(&test_config());
        let result = adapter.send_chat(&hello(), "llama-2").await;
        match result.unwrap_err() {
            AppError::UnknownModel(model) => assert_eq!(model, "llama-2"),
            other => panic!("Expected UnknownModel error, got: {:?}", other),
        }
    }

    #[tokio::test]
    #[serial]
    async fn test_send_chat_routes_gpt_prefix_to_openai() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_body(
                r#"{
                    "model": "gpt-5",
                    "choices": [{"message": {"role": "assistant", "content": "hi"}}],
                    "usage": {"prompt_tokens": 5, "completion_tokens": 2, "total_tokens": 7}
                }"#,
            )
            .create_async()
            .await;

        let adapter = ProviderAdapter::with_base_urls(
            &test_config(),
            &server.url(),
            "http://127.0.0.1:1/unused",
        );
        let completion = adapter.send_chat(&hello(), "gpt-5").await.unwrap();

        mock.assert_async().await;
        assert_eq!(completion.content, "hi");
        assert_eq!(completion.model, "gpt-5");
        assert_eq!(completion.usage.total_tokens, 7);
    }

    #[tokio::test]
    #[serial]
    async fn test_send_chat_routes_deepseek_prefix_to_deepseek() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(
                r#"{
                    "model": "deepseek-chat",
                    "choices": [{"message": {"role": "assistant", "content": "مرحبا"}}],
                    "usage": {"prompt_tokens": 3, "completion_tokens": 1, "total_tokens": 4}
                }"#,
            )
            .create_async()
            .await;

        let adapter = ProviderAdapter::with_base_urls(
            &test_config(),
            "http://127.0.0.1:1/unused",
            &server.url(),
        );
        let completion = adapter.send_chat(&hello(), "deepseek-chat").await.unwrap();

        mock.assert_async().await;
        assert_eq!(completion.content, "مرحبا");
        assert_eq!(completion.model, "deepseek-chat");
        assert_eq!(completion.usage.prompt_tokens, 3);
    }

    #[tokio::test]
    #[serial]
    async fn test_send_chat_routes_o1_prefix_to_openai() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(
                r#"{
                    "model": "o1-mini",
                    "choices": [{"message": {"role": "assistant", "content": "thinking done"}}]
                }"#,
            )
            .create_async()
            .await;

        let adapter = ProviderAdapter::with_base_urls(
            &test_config(),
            &server.url(),
            "http://127.0.0.1:1/unused",
        );
        let completion = adapter.send_chat(&hello(), "o1-mini").await.unwrap();

        mock.assert_async().await;
        assert_eq!(completion.content, "thinking done");
        // Usage absent upstream still reads as numeric zeros
        assert_eq!(completion.usage.total_tokens, 0);
    }
}
