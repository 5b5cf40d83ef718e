//! Session management for conversation history
//!
//! A session is an isolated, identifier-keyed conversation thread. The
//! registry owns every session for the life of the process; one designated
//! session mirrors its transcript to a durable JSON file.

pub mod history;
pub mod registry;
pub mod store;

pub use history::HistoryStore;
pub use registry::{SessionOverview, SessionRegistry};
pub use store::{Message, Role, SessionEntry};
