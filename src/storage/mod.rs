//! Entity storage
//!
//! Authoritative record of sessions, messages, and attachments. The
//! reference implementation is an in-memory map store; a persistent
//! implementation must honor the same `Storage` contract, including
//! cascade-on-delete and timestamp-refresh-on-append.

pub mod memory;
pub mod models;

pub use memory::MemStorage;
pub use models::{
    Attachment, Message, MessageRole, NewAttachment, NewMessage, NewSession, Session, SessionMode,
    SessionPatch, DEFAULT_MODEL, DEFAULT_SESSION_TITLE,
};

use crate::error::AppError;
use async_trait::async_trait;

/// Storage contract for sessions, messages, and attachments
///
/// Absence is signaled via `Option`/`bool`, never via an error; callers are
/// responsible for turning absence into a 404. Errors are reserved for
/// storage-level faults.
#[async_trait]
pub trait Storage: Send + Sync {
    /// List all sessions, descending by `updated_at`
    async fn list_sessions(&self) -> Result<Vec<Session>, AppError>;

    /// Get a session by ID
    async fn get_session(&self, id: &str) -> Result<Option<Session>, AppError>;

    /// Create a session, assigning a new ID and equal created/updated timestamps
    async fn create_session(&self, fields: NewSession) -> Result<Session, AppError>;

    /// Merge partial fields over an existing session, refreshing `updated_at`
    ///
    /// Returns `None` if the session does not exist.
    async fn update_session(
        &self,
        id: &str,
        patch: SessionPatch,
    ) -> Result<Option<Session>, AppError>;

    /// Delete a session and all messages referencing it
    ///
    /// Returns `true` if a session was removed.
    async fn delete_session(&self, id: &str) -> Result<bool, AppError>;

    /// List all messages for a session, ascending by creation order
    async fn list_messages(&self, session_id: &str) -> Result<Vec<Message>, AppError>;

    /// Get a message by ID
    async fn get_message(&self, id: &str) -> Result<Option<Message>, AppError>;

    /// Create a message and touch the owning session's `updated_at`
    ///
    /// Returns `None` if the owning session does not exist; no orphaned
    /// message is written.
    async fn create_message(&self, fields: NewMessage) -> Result<Option<Message>, AppError>;

    /// Delete a message by ID
    ///
    /// Returns `true` if a message was removed.
    async fn delete_message(&self, id: &str) -> Result<bool, AppError>;

    /// Create an attachment record, assigning a new ID
    async fn create_attachment(&self, fields: NewAttachment) -> Result<Attachment, AppError>;

    /// Get an attachment by ID
    async fn get_attachment(&self, id: &str) -> Result<Option<Attachment>, AppError>;
}
