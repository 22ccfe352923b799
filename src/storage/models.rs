//! Chat data models
//!
//! Defines structures for sessions, messages, and attachments.
//! Field names serialize in camelCase to match the JSON contract the
//! browser client expects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default title for a newly created session (localized placeholder)
pub const DEFAULT_SESSION_TITLE: &str = "محادثة جديدة";

/// Default model identifier for a newly created session
pub const DEFAULT_MODEL: &str = "gpt-5";

/// Role of a message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message from the user
    User,
    /// Message from the assistant/AI
    Assistant,
    /// System instruction message
    System,
}

impl MessageRole {
    /// Convert the role to its string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
            MessageRole::System => "system",
        }
    }
}

impl From<&str> for MessageRole {
    fn from(s: &str) -> Self {
        match s {
            "assistant" => MessageRole::Assistant,
            "system" => MessageRole::System,
            _ => MessageRole::User,
        }
    }
}

/// Interaction mode of a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    /// Plain conversational chat
    #[default]
    Chat,
    /// Agentic mode
    Agent,
}

/// A persisted conversation thread
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Unique identifier for the session
    pub id: String,
    /// Title of the session (user-set or localized placeholder)
    pub title: String,
    /// Model identifier the client selected for this session
    pub model: String,
    /// Interaction mode ("chat" or "agent")
    pub mode: SessionMode,
    /// Whether the session is pinned in the session list
    pub is_pinned: bool,
    /// When the session was created
    pub created_at: DateTime<Utc>,
    /// When the session was last updated (refreshed on every message append)
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session from insert fields, applying schema defaults
    ///
    /// `created_at` and `updated_at` are stamped equal.
    pub fn new(id: String, fields: NewSession) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: fields
                .title
                .unwrap_or_else(|| DEFAULT_SESSION_TITLE.to_string()),
            model: fields.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            mode: fields.mode.unwrap_or_default(),
            is_pinned: fields.is_pinned.unwrap_or(false),
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge partial fields over this session and refresh `updated_at`
    pub fn apply(&mut self, patch: SessionPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(model) = patch.model {
            self.model = model;
        }
        if let Some(mode) = patch.mode {
            self.mode = mode;
        }
        if let Some(is_pinned) = patch.is_pinned {
            self.is_pinned = is_pinned;
        }
        self.updated_at = Utc::now();
    }
}

/// Insert fields for a new session; omitted fields take schema defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewSession {
    /// Optional title (placeholder if not provided)
    pub title: Option<String>,
    /// Optional model identifier
    pub model: Option<String>,
    /// Optional interaction mode
    pub mode: Option<SessionMode>,
    /// Optional pinned flag
    pub is_pinned: Option<bool>,
}

/// Partial fields for updating an existing session
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionPatch {
    /// New title, if changing
    pub title: Option<String>,
    /// New model identifier, if changing
    pub model: Option<String>,
    /// New interaction mode, if changing
    pub mode: Option<SessionMode>,
    /// New pinned flag, if changing
    pub is_pinned: Option<bool>,
}

/// A single message in a session
///
/// Immutable once created, except for deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique identifier for the message
    pub id: String,
    /// ID of the session this message belongs to
    pub session_id: String,
    /// Role of the message sender
    pub role: MessageRole,
    /// Content of the message
    pub content: String,
    /// Resolved attachment records carried by this message
    pub attachments: Option<Vec<Attachment>>,
    /// Opaque metadata bag (responding model name, token usage, ...)
    pub metadata: Option<Value>,
    /// When the message was created
    pub created_at: DateTime<Utc>,
    /// Store-assigned insertion sequence; breaks `created_at` ties
    #[serde(skip)]
    pub seq: u64,
}

impl Message {
    /// Create a new message from insert fields
    pub fn new(id: String, seq: u64, fields: NewMessage) -> Self {
        Self {
            id,
            session_id: fields.session_id,
            role: fields.role,
            content: fields.content,
            attachments: fields.attachments,
            metadata: fields.metadata,
            created_at: Utc::now(),
            seq,
        }
    }
}

/// Insert fields for a new message
#[derive(Debug, Clone)]
pub struct NewMessage {
    /// ID of the owning session
    pub session_id: String,
    /// Role of the message sender
    pub role: MessageRole,
    /// Content of the message
    pub content: String,
    /// Resolved attachment records, if any
    pub attachments: Option<Vec<Attachment>>,
    /// Opaque metadata bag, if any
    pub metadata: Option<Value>,
}

/// An uploaded file record, referenceable by id from messages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    /// Unique identifier for the attachment
    pub id: String,
    /// Original filename as supplied by the client
    pub filename: String,
    /// MIME type of the file
    pub mimetype: String,
    /// File size in bytes, stored as text
    pub size: String,
    /// Path where the file is stored on disk
    pub path: String,
    /// When the attachment was created
    pub created_at: DateTime<Utc>,
}

impl Attachment {
    /// Create a new attachment record from insert fields
    pub fn new(id: String, fields: NewAttachment) -> Self {
        Self {
            id,
            filename: fields.filename,
            mimetype: fields.mimetype,
            size: fields.size,
            path: fields.path,
            created_at: Utc::now(),
        }
    }
}

/// Insert fields for a new attachment
#[derive(Debug, Clone)]
pub struct NewAttachment {
    /// Original filename as supplied by the client
    pub filename: String,
    /// MIME type of the file
    pub mimetype: String,
    /// File size in bytes, as text
    pub size: String,
    /// Path where the file is stored on disk
    pub path: String,
}
