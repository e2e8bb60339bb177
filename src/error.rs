use thiserror::Error;

use crate::core::config::ConfigError;
use crate::inference::InferenceError;
use crate::input::HistoryError;

/// Failures that stop the session: startup problems and a broken terminal.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("History error: {0}")]
    History(#[from] HistoryError),
    #[error("Inference client error: {0}")]
    Inference(#[from] InferenceError),
    #[error("Ctrl-C error: {0}")]
    CtrlC(#[from] ctrlc::Error),
}
