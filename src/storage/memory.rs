//! In-memory storage implementation
//!
//! Map-backed store standing in for a relational database. A single lock
//! guards all three maps so that cascade-delete and touch-on-append are
//! atomic with respect to readers.

use crate::error::AppError;
use crate::storage::models::{
    Attachment, Message, NewAttachment, NewMessage, NewSession, Session, SessionPatch,
};
use crate::storage::Storage;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

#[derive(Default)]
struct Inner {
    sessions: HashMap<String, Session>,
    messages: HashMap<String, Message>,
    attachments: HashMap<String, Attachment>,
    /// Monotonic insertion counter; tie-breaker for message ordering
    next_seq: u64,
}

/// In-memory map store for sessions, messages, and attachments
#[derive(Default)]
pub struct MemStorage {
    inner: RwLock<Inner>,
}

impl MemStorage {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemStorage {
    async fn list_sessions(&self) -> Result<Vec<Session>, AppError> {
        let inner = self.inner.read().await;
        let mut sessions: Vec<Session> = inner.sessions.values().cloned().collect();
        sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(sessions)
    }

    async fn get_session(&self, id: &str) -> Result<Option<Session>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.sessions.get(id).cloned())
    }

    async fn create_session(&self, fields: NewSession) -> Result<Session, AppError> {
        let session = Session::new(Uuid::new_v4().to_string(), fields);
        let mut inner = self.inner.write().await;
        inner.sessions.insert(session.id.clone(), session.clone());
        debug!("Created session: {}", session.id);
        Ok(session)
    }

    async fn update_session(
        &self,
        id: &str,
        patch: SessionPatch,
    ) -> Result<Option<Session>, AppError> {
        let mut inner = self.inner.write().await;
        let Some(session) = inner.sessions.get_mut(id) else {
            return Ok(None);
        };
        session.apply(patch);
        debug!("Updated session: {}", id);
        Ok(Some(session.clone()))
    }

    async fn delete_session(&self, id: &str) -> Result<bool, AppError> {
        let mut inner = self.inner.write().await;
        if inner.sessions.remove(id).is_none() {
            return Ok(false);
        }
        inner.messages.retain(|_, msg| msg.session_id != id);
        debug!("Deleted session: {}", id);
        Ok(true)
    }

    async fn list_messages(&self, session_id: &str) -> Result<Vec<Message>, AppError> {
        let inner = self.inner.read().await;
        let mut messages: Vec<Message> = inner
            .messages
            .values()
            .filter(|msg| msg.session_id == session_id)
            .cloned()
            .collect();
        messages.sort_by(|a, b| (a.created_at, a.seq).cmp(&(b.created_at, b.seq)));
        Ok(messages)
    }

    async fn get_message(&self, id: &str) -> Result<Option<Message>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.messages.get(id).cloned())
    }

    async fn create_message(&self, fields: NewMessage) -> Result<Option<Message>, AppError> {
        let mut inner = self.inner.write().await;
        if !inner.sessions.contains_key(&fields.session_id) {
            debug!(
                "Rejected message for unknown session: {}",
                fields.session_id
            );
            return Ok(None);
        }

        let seq = inner.next_seq;
        inner.next_seq += 1;
        let message = Message::new(Uuid::new_v4().to_string(), seq, fields);
        inner.messages.insert(message.id.clone(), message.clone());

        // Appending a message refreshes the owning session's updated_at
        if let Some(session) = inner.sessions.get_mut(&message.session_id) {
            session.updated_at = Utc::now();
        }

        debug!(
            "Added message {} to session {}",
            message.id, message.session_id
        );
        Ok(Some(message))
    }

    async fn delete_message(&self, id: &str) -> Result<bool, AppError> {
        let mut inner = self.inner.write().await;
        let removed = inner.messages.remove(id).is_some();
        if removed {
            debug!("Deleted message: {}", id);
        }
        Ok(removed)
    }

    async fn create_attachment(&self, fields: NewAttachment) -> Result<Attachment, AppError> {
        let attachment = Attachment::new(Uuid::new_v4().to_string(), fields);
        let mut inner = self.inner.write().await;
        inner
            .attachments
            .insert(attachment.id.clone(), attachment.clone());
        debug!("Created attachment: {}", attachment.id);
        Ok(attachment)
    }

    async fn get_attachment(&self, id: &str) -> Result<Option<Attachment>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.attachments.get(id).cloned())
    }
}
