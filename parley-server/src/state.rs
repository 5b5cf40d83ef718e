use std::path::PathBuf;
use std::sync::Arc;

use parley_core::session::SessionRegistry;

use crate::orchestrator::ChatOrchestrator;

/// Shared state handed to every request handler
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<SessionRegistry>,
    pub orchestrator: Arc<ChatOrchestrator>,
    /// Log file served back by the debug-logs endpoint
    pub log_file: PathBuf,
}
