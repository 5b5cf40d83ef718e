//! Session registry: the owned, process-wide session table
//!
//! Replaces an ambient global map with an explicit registry object shared
//! by handle. Entries are created lazily on first reference and live for
//! the process lifetime; clearing resets a transcript but never removes
//! the entry. There is no eviction policy (known gap, kept deliberately).

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::info;

use super::history::HistoryStore;
use super::store::SessionEntry;

/// Read-only summary of one session for listings
#[derive(Debug, Clone, Serialize)]
pub struct SessionOverview {
    pub message_count: usize,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

/// Process-wide mapping from session id to session state
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, Arc<SessionEntry>>>,
    history: HistoryStore,
    default_id: String,
}

impl SessionRegistry {
    /// Create a registry backed by the given history store.
    ///
    /// Sessions created under `default_id` are durable: they seed from the
    /// history file and mirror every completed round back to it.
    pub fn new(history: HistoryStore, default_id: impl Into<String>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            history,
            default_id: default_id.into(),
        }
    }

    /// The id of the durable session
    pub fn default_session_id(&self) -> &str {
        &self.default_id
    }

    /// The history store backing durable sessions
    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Return the session for `id`, creating it if it does not exist.
    ///
    /// Never fails: the worst case is a fresh empty session.
    pub fn resolve(&self, id: &str) -> Arc<SessionEntry> {
        if let Some(session) = self.sessions.read().get(id) {
            return session.clone();
        }

        let mut sessions = self.sessions.write();
        // Re-check under the write lock; another request may have won.
        sessions
            .entry(id.to_string())
            .or_insert_with(|| {
                info!("Creating new session: {}", id);
                let durable = id == self.default_id;
                let transcript = if durable {
                    self.history.load()
                } else {
                    Vec::new()
                };
                Arc::new(SessionEntry::with_transcript(id, durable, transcript))
            })
            .clone()
    }

    /// Return the session for `id` if it already exists
    pub fn get(&self, id: &str) -> Option<Arc<SessionEntry>> {
        self.sessions.read().get(id).cloned()
    }

    /// Reset a session's transcript to empty.
    ///
    /// Returns false if the session was never created; clearing does not
    /// create sessions as a side effect. Durable sessions also reset the
    /// persisted file. Takes the session's turn lock so an in-flight chat
    /// round cannot interleave with the reset.
    pub async fn clear(&self, id: &str) -> bool {
        let Some(session) = self.get(id) else {
            return false;
        };

        let _turn = session.lock_turn().await;
        session.clear();
        if session.durable {
            self.history.clear();
        }
        info!("Session {} cleared", id);
        true
    }

    /// Read-only snapshot of every session, keyed by id
    pub fn list(&self) -> BTreeMap<String, SessionOverview> {
        self.sessions
            .read()
            .iter()
            .map(|(id, session)| {
                (
                    id.clone(),
                    SessionOverview {
                        message_count: session.message_count(),
                        created_at: session.created_at,
                        last_activity: session.last_activity(),
                    },
                )
            })
            .collect()
    }

    /// Number of sessions in the table
    pub fn count(&self) -> usize {
        self.sessions.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::store::Message;
    use tempfile::TempDir;

    fn test_registry(tmp: &TempDir) -> SessionRegistry {
        let history = HistoryStore::new(tmp.path().join("chat_history.json"));
        SessionRegistry::new(history, "default_session")
    }

    #[test]
    fn test_resolve_creates_lazily() {
        let tmp = TempDir::new().unwrap();
        let registry = test_registry(&tmp);

        assert_eq!(registry.count(), 0);
        let session = registry.resolve("s1");
        assert_eq!(session.id, "s1");
        assert_eq!(registry.count(), 1);

        // Same id resolves to the same entry
        let again = registry.resolve("s1");
        assert!(Arc::ptr_eq(&session, &again));
    }

    #[test]
    fn test_default_session_seeds_from_history_file() {
        let tmp = TempDir::new().unwrap();
        let history = HistoryStore::new(tmp.path().join("chat_history.json"));
        history.save(&[Message::user("earlier"), Message::assistant("aye")]);

        let registry = SessionRegistry::new(history, "default_session");
        let session = registry.resolve("default_session");

        assert!(session.durable);
        assert_eq!(session.message_count(), 2);
    }

    #[test]
    fn test_other_sessions_start_empty_and_isolated() {
        let tmp = TempDir::new().unwrap();
        let history = HistoryStore::new(tmp.path().join("chat_history.json"));
        history.save(&[Message::user("earlier")]);

        let registry = SessionRegistry::new(history, "default_session");
        let session = registry.resolve("s1");

        assert!(!session.durable);
        assert_eq!(session.message_count(), 0);
    }

    #[tokio::test]
    async fn test_clear_unknown_session_is_not_found_and_creates_nothing() {
        let tmp = TempDir::new().unwrap();
        let registry = test_registry(&tmp);

        assert!(!registry.clear("never-seen").await);
        assert_eq!(registry.count(), 0);
    }

    #[tokio::test]
    async fn test_clear_resets_but_keeps_session_resolvable() {
        let tmp = TempDir::new().unwrap();
        let registry = test_registry(&tmp);

        let session = registry.resolve("s1");
        session.append_turn(Message::user("q"), Message::assistant("a"));

        assert!(registry.clear("s1").await);
        assert_eq!(registry.count(), 1);
        assert_eq!(registry.resolve("s1").message_count(), 0);
    }

    #[tokio::test]
    async fn test_clear_default_session_resets_history_file() {
        let tmp = TempDir::new().unwrap();
        let registry = test_registry(&tmp);

        let session = registry.resolve("default_session");
        session.append_turn(Message::user("q"), Message::assistant("a"));
        registry.history().save(&session.snapshot());
        assert_eq!(registry.history().load().len(), 2);

        assert!(registry.clear("default_session").await);
        assert!(registry.history().load().is_empty());
    }

    #[tokio::test]
    async fn test_clear_non_default_session_leaves_history_file_alone() {
        let tmp = TempDir::new().unwrap();
        let registry = test_registry(&tmp);

        registry.history().save(&[Message::user("keep me")]);
        let session = registry.resolve("s1");
        session.append_turn(Message::user("q"), Message::assistant("a"));

        assert!(registry.clear("s1").await);
        assert_eq!(registry.history().load().len(), 1);
    }

    #[test]
    fn test_list_reports_counts_and_activity() {
        let tmp = TempDir::new().unwrap();
        let registry = test_registry(&tmp);

        let s1 = registry.resolve("s1");
        s1.append_turn(Message::user("q"), Message::assistant("a"));
        registry.resolve("s2");

        let listing = registry.list();
        assert_eq!(listing.len(), 2);
        assert_eq!(listing["s1"].message_count, 2);
        assert_eq!(listing["s2"].message_count, 0);
        assert_eq!(listing["s2"].last_activity, listing["s2"].created_at);
    }
}
