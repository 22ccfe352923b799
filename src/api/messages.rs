//! Message API endpoints
//!
//! Handles HTTP requests for listing, sending, and deleting messages.
//! Sending a message runs the full orchestration: persist the user turn,
//! relay history to the selected provider, persist the assistant reply.

use crate::api::utils::RouterState;
use crate::error::AppError;
use crate::orchestrator::SendOutcome;
use crate::storage::{Message, DEFAULT_MODEL};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;

/// Request to send a message in a session
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    /// Message content; required, validated non-empty
    pub content: Option<String>,
    /// Model identifier; defaults to the stock model when omitted
    #[serde(default = "default_model")]
    pub model: String,
    /// IDs of previously uploaded attachments to carry on the message
    #[serde(default)]
    pub attachment_ids: Vec<String>,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

/// GET /api/sessions/:id/messages - List a session's messages, oldest first
pub async fn list_messages(
    State((storage, _, _)): State<RouterState>,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<Message>>, AppError> {
    let messages = storage.list_messages(&session_id).await?;
    Ok(Json(messages))
}

/// POST /api/sessions/:id/messages - Send a message and get the AI reply
pub async fn send_message(
    State((_, orchestrator, _)): State<RouterState>,
    Path(session_id): Path<String>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<SendOutcome>, AppError> {
    let content = request.content.unwrap_or_default();
    let outcome = orchestrator
        .send_message(
            &session_id,
            &content,
            &request.model,
            &request.attachment_ids,
        )
        .await?;
    Ok(Json(outcome))
}

/// DELETE /api/messages/:id - Delete a message
pub async fn delete_message(
    State((storage, _, _)): State<RouterState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !storage.delete_message(&id).await? {
        return Err(AppError::MessageNotFound(id));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, ProviderConfig, ServerConfig, UploadConfig};
    use crate::orchestrator::Orchestrator;
    use crate::providers::ProviderAdapter;
    use crate::storage::{MemStorage, MessageRole, NewSession, Storage};
    use mockito::Server;
    use serial_test::serial;
    use std::sync::Arc;

    fn create_test_router_state(openai_base_url: &str) -> RouterState {
        let storage: Arc<dyn Storage> = Arc::new(MemStorage::new());
        let providers = ProviderAdapter::with_base_urls(
            &ProviderConfig {
                openai_api_key: Some("test-key".to_string()),
                deepseek_api_key: Some("test-key".to_string()),
            },
            openai_base_url,
            "http://127.0.0.1:1/unused",
        );
        let orchestrator = Arc::new(Orchestrator::new(storage.clone(), providers));
        let config = Arc::new(Config {
            server: ServerConfig {
                port: 0,
                host: "127.0.0.1".to_string(),
            },
            providers: ProviderConfig::default(),
            uploads: UploadConfig {
                dir: "uploads".to_string(),
                max_file_bytes: 10 * 1024 * 1024,
                max_files: 5,
            },
        });
        (storage, orchestrator, config)
    }

    #[tokio::test]
    async fn test_list_messages_empty() {
        let state = create_test_router_state("http://127.0.0.1:1/unused");
        let result = list_messages(State(state), Path("any-session".to_string())).await;
        assert!(result.unwrap().0.is_empty());
    }

    #[tokio::test]
    async fn test_send_message_missing_content() {
        let state = create_test_router_state("http://127.0.0.1:1/unused");
        let (storage, _, _) = &state;
        let session = storage.create_session(NewSession::default()).await.unwrap();

        let request = SendMessageRequest {
            content: None,
            model: "gpt-5".to_string(),
            attachment_ids: vec![],
        };
        let result = send_message(State(state.clone()), Path(session.id.clone()), Json(request)).await;
        match result.unwrap_err() {
            AppError::Validation(_) => {}
            other => panic!("Expected Validation error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_send_message_session_not_found() {
        let state = create_test_router_state("http://127.0.0.1:1/unused");
        let request = SendMessageRequest {
            content: Some("hello".to_string()),
            model: "gpt-5".to_string(),
            attachment_ids: vec![],
        };
        let result =
            send_message(State(state), Path("nonexistent".to_string()), Json(request)).await;
        match result.unwrap_err() {
            AppError::SessionNotFound(_) => {}
            other => panic!("Expected SessionNotFound error, got: {:?}", other),
        }
    }

    #[tokio::test]
    #[serial]
    async fn test_send_message_returns_both_messages() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
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

        let state = create_test_router_state(&server.url());
        let (storage, _, _) = &state;
        let session = storage.create_session(NewSession::default()).await.unwrap();

        let request = SendMessageRequest {
            content: Some("hello".to_string()),
            model: "gpt-5".to_string(),
            attachment_ids: vec![],
        };
        let outcome = send_message(State(state.clone()), Path(session.id.clone()), Json(request))
            .await
            .unwrap()
            .0;

        mock.assert_async().await;
        assert_eq!(outcome.user_message.content, "hello");
        assert_eq!(outcome.ai_message.content, "hi");
        assert_eq!(outcome.ai_message.role, MessageRole::Assistant);

        let messages = list_messages(State(state), Path(session.id)).await.unwrap().0;
        assert_eq!(messages.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_message() {
        let state = create_test_router_state("http://127.0.0.1:1/unused");
        let (storage, _, _) = &state;
        let session = storage.create_session(NewSession::default()).await.unwrap();
        let msg = storage
            .create_message(crate::storage::NewMessage {
                session_id: session.id.clone(),
                role: MessageRole::User,
                content: "hello".to_string(),
                attachments: None,
                metadata: None,
            })
            .await
            .unwrap()
            .unwrap();

        let status = delete_message(State(state.clone()), Path(msg.id.clone()))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let result = delete_message(State(state), Path(msg.id)).await;
        match result.unwrap_err() {
            AppError::MessageNotFound(_) => {}
            other => panic!("Expected MessageNotFound error, got: {:?}", other),
        }
    }
}
