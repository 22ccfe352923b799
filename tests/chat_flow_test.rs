//! End-to-end chat flow tests
//!
//! Drives the handler layer the way the HTTP router does: create a session,
//! send a message against a mocked provider, inspect the stored history,
//! then delete the session and verify the cascade.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chat_backend::api::messages::{list_messages, send_message, SendMessageRequest};
use chat_backend::api::sessions::{create_session, delete_session, get_session};
use chat_backend::api::utils::RouterState;
use chat_backend::config::{Config, ProviderConfig, ServerConfig, UploadConfig};
use chat_backend::orchestrator::Orchestrator;
use chat_backend::providers::ProviderAdapter;
use chat_backend::storage::{MemStorage, MessageRole, NewSession, Storage};
use mockito::Server;
use serial_test::serial;
use std::sync::Arc;

fn create_router_state(openai_base_url: &str) -> RouterState {
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
#[serial]
async fn test_full_chat_flow() {
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

    let state = create_router_state(&server.url());

    // Create a session
    let (status, Json(session)) = create_session(
        State(state.clone()),
        Json(NewSession {
            title: Some("Integration".to_string()),
            model: Some("gpt-5".to_string()),
            ..NewSession::default()
        }),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CREATED);

    // Send a message through the orchestrated path
    let outcome = send_message(
        State(state.clone()),
        Path(session.id.clone()),
        Json(SendMessageRequest {
            content: Some("hello".to_string()),
            model: "gpt-5".to_string(),
            attachment_ids: vec![],
        }),
    )
    .await
    .unwrap()
    .0;

    mock.assert_async().await;
    assert_eq!(outcome.user_message.role, MessageRole::User);
    assert_eq!(outcome.user_message.content, "hello");
    assert_eq!(outcome.ai_message.role, MessageRole::Assistant);
    assert_eq!(outcome.ai_message.content, "hi");

    let metadata = outcome.ai_message.metadata.as_ref().unwrap();
    assert_eq!(metadata["model"], "gpt-5");
    assert_eq!(metadata["usage"]["totalTokens"], 7);

    // History holds exactly the two turns, user first
    let messages = list_messages(State(state.clone()), Path(session.id.clone()))
        .await
        .unwrap()
        .0;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].id, outcome.user_message.id);
    assert_eq!(messages[1].id, outcome.ai_message.id);

    // The session's updated_at advanced past creation
    let refreshed = get_session(State(state.clone()), Path(session.id.clone()))
        .await
        .unwrap()
        .0;
    assert!(refreshed.updated_at > session.updated_at);

    // Deleting the session removes its messages with it
    let status = delete_session(State(state.clone()), Path(session.id.clone()))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);

    assert!(get_session(State(state.clone()), Path(session.id.clone()))
        .await
        .is_err());
    let messages = list_messages(State(state), Path(session.id)).await.unwrap().0;
    assert!(messages.is_empty());
}

#[tokio::test]
async fn test_send_message_unknown_model_over_handlers() {
    let state = create_router_state("http://127.0.0.1:1/unused");

    let (_, Json(session)) = create_session(State(state.clone()), Json(NewSession::default()))
        .await
        .unwrap();

    let result = send_message(
        State(state.clone()),
        Path(session.id.clone()),
        Json(SendMessageRequest {
            content: Some("hello".to_string()),
            model: "llama-2".to_string(),
            attachment_ids: vec![],
        }),
    )
    .await;
    assert!(result.is_err());

    // The user message is persisted even though no provider matched
    let messages = list_messages(State(state), Path(session.id)).await.unwrap().0;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].role, MessageRole::User);
}
