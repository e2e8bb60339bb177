use std::io;

use thiserror::Error;

use crate::input::HistoryError;

pub mod executor;
pub mod runner;
pub mod signal;
pub mod sink;

pub use executor::CommandExecutor;
pub use runner::ShellRunner;
pub use sink::{NullSink, OutputSink, WriterSink};

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("lost output of `{command}`: {source}")]
    Output {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    History(#[from] HistoryError),
}

/// Everything a finished process left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Spawns one shell command and waits for it, forwarding output as it arrives.
pub trait ProcessRunner {
    fn run(&self, command: &str, sink: &mut dyn OutputSink) -> Result<ProcessOutput, ProcessError>;
}
