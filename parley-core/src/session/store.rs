//! Session data structures

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Message role
    pub role: Role,
    /// Message content
    pub content: String,
    /// Message timestamp, set at creation and never mutated
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a new chat message
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// A conversation session
///
/// The transcript lock guards only short synchronous reads and writes.
/// `turn_lock` serializes an entire chat round (snapshot, provider call,
/// append, persist) per session and is the only lock held across an await;
/// rounds on different sessions proceed in parallel.
pub struct SessionEntry {
    /// Session id (caller-chosen)
    pub id: String,
    /// Whether this session's transcript is mirrored to durable storage
    pub durable: bool,
    /// Session creation time
    pub created_at: DateTime<Utc>,
    transcript: RwLock<Vec<Message>>,
    turn_lock: Mutex<()>,
}

impl SessionEntry {
    /// Create a new empty session
    pub fn new(id: impl Into<String>, durable: bool) -> Self {
        Self::with_transcript(id, durable, Vec::new())
    }

    /// Create a session seeded with an existing transcript
    pub fn with_transcript(id: impl Into<String>, durable: bool, transcript: Vec<Message>) -> Self {
        Self {
            id: id.into(),
            durable,
            created_at: Utc::now(),
            transcript: RwLock::new(transcript),
            turn_lock: Mutex::new(()),
        }
    }

    /// Acquire the per-session turn lock
    pub async fn lock_turn(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.turn_lock.lock().await
    }

    /// Number of messages in the transcript
    pub fn message_count(&self) -> usize {
        self.transcript.read().len()
    }

    /// Clone the full transcript
    pub fn snapshot(&self) -> Vec<Message> {
        self.transcript.read().clone()
    }

    /// Timestamp of the most recent message, or `created_at` when empty
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.transcript
            .read()
            .last()
            .map(|m| m.timestamp)
            .unwrap_or(self.created_at)
    }

    /// Append one completed round: the user message, then the reply
    pub fn append_turn(&self, user: Message, assistant: Message) {
        let mut transcript = self.transcript.write();
        transcript.push(user);
        transcript.push(assistant);
    }

    /// Reset the transcript to empty; the session itself is retained
    pub fn clear(&self) {
        self.transcript.write().clear();
    }
}
