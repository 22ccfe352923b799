//! Conversation orchestrator
//!
//! The single entry point that turns "user typed a message" into two
//! persisted messages: the user's turn and the assistant's reply. The user
//! message is stored before the provider call, so a failed upstream call
//! leaves it in place and the client can retry without re-entering text.

use crate::error::AppError;
use crate::providers::{ChatMessage, ProviderAdapter};
use crate::storage::{Message, MessageRole, NewMessage, Storage};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

/// Result of a successful send: both newly created messages
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOutcome {
    /// The persisted user message
    pub user_message: Message,
    /// The persisted assistant message
    pub ai_message: Message,
}

/// Sequences message persistence and provider invocation
pub struct Orchestrator {
    storage: Arc<dyn Storage>,
    providers: ProviderAdapter,
}

impl Orchestrator {
    /// Build an orchestrator from its injected dependencies
    pub fn new(storage: Arc<dyn Storage>, providers: ProviderAdapter) -> Self {
        Self { storage, providers }
    }

    /// Store a user message, relay the full session history to the selected
    /// provider, store the assistant reply, and return both messages
    ///
    /// Attachment ids that resolve to nothing are silently dropped from the
    /// attached set. Sessions are never auto-created here.
    ///
    /// # Errors
    /// * `AppError::Validation` if `content` is empty
    /// * `AppError::SessionNotFound` if the session does not exist
    /// * provider errors (`MissingCredential`, `UnknownModel`, `Provider`)
    ///   pass through unchanged; the user message stays persisted
    pub async fn send_message(
        &self,
        session_id: &str,
        content: &str,
        model: &str,
        attachment_ids: &[String],
    ) -> Result<SendOutcome, AppError> {
        if content.trim().is_empty() {
            return Err(AppError::Validation("Content is required".to_string()));
        }

        self.storage
            .get_session(session_id)
            .await?
            .ok_or_else(|| AppError::SessionNotFound(session_id.to_string()))?;

        // Resolve attachment references; unknown ids are dropped, not errors
        let mut attachments = None;
        if !attachment_ids.is_empty() {
            let mut resolved = Vec::new();
            for attachment_id in attachment_ids {
                if let Some(attachment) = self.storage.get_attachment(attachment_id).await? {
                    resolved.push(attachment);
                }
            }
            attachments = Some(resolved);
        }

        let user_message = self
            .storage
            .create_message(NewMessage {
                session_id: session_id.to_string(),
                role: MessageRole::User,
                content: content.to_string(),
                attachments,
                metadata: None,
            })
            .await?
            .ok_or_else(|| AppError::SessionNotFound(session_id.to_string()))?;

        // Full ascending history, projected down to {role, content}
        let history = self.storage.list_messages(session_id).await?;
        let turns: Vec<ChatMessage> = history
            .iter()
            .map(|msg| ChatMessage {
                role: msg.role.as_str().to_string(),
                content: msg.content.clone(),
            })
            .collect();

        info!(
            session_id = %session_id,
            model = %model,
            turns = turns.len(),
            "Relaying conversation to provider"
        );

        let completion = self.providers.send_chat(&turns, model).await?;

        let ai_message = self
            .storage
            .create_message(NewMessage {
                session_id: session_id.to_string(),
                role: MessageRole::Assistant,
                content: completion.content.clone(),
                attachments: None,
                metadata: Some(json!({
                    "model": completion.model,
                    "usage": completion.usage,
                })),
            })
            .await?
            .ok_or_else(|| AppError::SessionNotFound(session_id.to_string()))?;

        info!(
            session_id = %session_id,
            response_len = completion.content.len(),
            total_tokens = completion.usage.total_tokens,
            "Assistant reply stored"
        );

        Ok(SendOutcome {
            user_message,
            ai_message,
        })
    }
}
