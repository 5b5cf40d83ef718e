//! Persisted transcript storage
//!
//! One JSON file holding an ordered array of `{role, content, timestamp}`
//! objects. Failures are absorbed here: a damaged or missing history file
//! must never take the chat service down with it.

use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use super::store::Message;

/// Reads and writes one session's transcript as a whole-file overwrite.
///
/// Stateless apart from the target path; the owning session's turn lock
/// guarantees a single writer.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    /// Create a store over the given file path
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The file this store reads and writes
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted transcript.
    ///
    /// A missing file is an empty history; a read or parse failure is
    /// logged and treated the same way.
    pub fn load(&self) -> Vec<Message> {
        if !self.path.exists() {
            info!("No existing history file at {}", self.path.display());
            return Vec::new();
        }

        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Error reading history file {}: {}", self.path.display(), e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Message>>(&content) {
            Ok(messages) => {
                debug!("Loaded {} messages from history file", messages.len());
                messages
            }
            Err(e) => {
                warn!(
                    "Error parsing history file {}: {}",
                    self.path.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    /// Save the full transcript, overwriting the file.
    ///
    /// A write failure is logged and swallowed; losing a history flush must
    /// not fail the chat request that triggered it.
    pub fn save(&self, transcript: &[Message]) {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    error!("Error creating history directory: {}", e);
                    return;
                }
            }
        }

        let content = match serde_json::to_string_pretty(transcript) {
            Ok(content) => content,
            Err(e) => {
                error!("Error serializing history: {}", e);
                return;
            }
        };

        match std::fs::write(&self.path, content) {
            Ok(()) => debug!("Saved {} messages to history file", transcript.len()),
            Err(e) => error!("Error saving history: {}", e),
        }
    }

    /// Reset the persisted transcript to empty
    pub fn clear(&self) {
        self.save(&[]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::store::Role;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = HistoryStore::new(tmp.path().join("chat_history.json"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = HistoryStore::new(tmp.path().join("chat_history.json"));

        let transcript = vec![
            Message::user("Hello"),
            Message::assistant("Hi there!"),
            Message::user("How are you?"),
        ];
        store.save(&transcript);

        let loaded = store.load();
        assert_eq!(loaded.len(), 3);
        for (saved, restored) in transcript.iter().zip(&loaded) {
            assert_eq!(saved.role, restored.role);
            assert_eq!(saved.content, restored.content);
            assert_eq!(saved.timestamp, restored.timestamp);
        }
    }

    #[test]
    fn test_load_corrupt_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("chat_history.json");
        std::fs::write(&path, "not json at all {{{").unwrap();

        let store = HistoryStore::new(&path);
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_overwrites_not_appends() {
        let tmp = TempDir::new().unwrap();
        let store = HistoryStore::new(tmp.path().join("chat_history.json"));

        store.save(&[Message::user("one"), Message::assistant("two")]);
        store.save(&[Message::user("only")]);

        let loaded = store.load();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].content, "only");
    }

    #[test]
    fn test_clear_writes_empty_array() {
        let tmp = TempDir::new().unwrap();
        let store = HistoryStore::new(tmp.path().join("chat_history.json"));

        store.save(&[Message::user("keep?")]);
        store.clear();

        assert!(store.load().is_empty());
        assert!(store.path().exists());
    }

    #[test]
    fn test_file_format_is_role_content_timestamp_array() {
        let tmp = TempDir::new().unwrap();
        let store = HistoryStore::new(tmp.path().join("chat_history.json"));
        store.save(&[Message::user("Hello")]);

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let first = &value.as_array().unwrap()[0];
        assert_eq!(first["role"], "user");
        assert_eq!(first["content"], "Hello");
        assert!(first["timestamp"].is_string());
    }

    #[test]
    fn test_role_round_trips_through_file() {
        let tmp = TempDir::new().unwrap();
        let store = HistoryStore::new(tmp.path().join("chat_history.json"));
        store.save(&[Message::assistant("Aye")]);

        let loaded = store.load();
        assert_eq!(loaded[0].role, Role::Assistant);
    }
}
