pub mod handlers;
pub mod orchestrator;
pub mod server;
pub mod state;

pub use orchestrator::{ChatError, ChatOrchestrator, ChatReply};
pub use server::{build_router, run_server};
pub use state::AppState;
