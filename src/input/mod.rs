mod completer;
pub mod history;

pub use completer::ReplHelper;
pub use history::{ChatHistory, ChatTurn, CommandHistory, CommandRecord, HistoryError, HistoryStore, Role};
