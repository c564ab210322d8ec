// Chat exports
pub mod bot;
pub mod extractor;
pub mod memory;

pub use bot::SchemeBot;
pub use extractor::EntityExtractor;
pub use memory::{ConversationMemory, SessionState, Turn, DEFAULT_MAX_HISTORY, DEFAULT_MAX_SESSIONS};
