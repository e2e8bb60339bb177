use tracing::info;

use super::{OutputSink, ProcessError, ProcessRunner};
use crate::input::{CommandHistory, CommandRecord};

/// Runs user commands and records every outcome in the command history.
#[derive(Clone)]
pub struct CommandExecutor<R> {
    runner: R,
}

impl<R: ProcessRunner> CommandExecutor<R> {
    pub fn new(runner: R) -> Self {
        CommandExecutor { runner }
    }

    /// A failing command is still `Ok`: its exit code and stderr land in the
    /// returned record. Only a spawn failure or a failed history write is `Err`.
    pub fn execute(
        &self,
        command: &str,
        history: &mut CommandHistory,
        sink: &mut dyn OutputSink,
    ) -> Result<CommandRecord, ProcessError> {
        let output = self.runner.run(command, sink)?;
        let record = CommandRecord::new(command, output.exit_code, output.stdout, output.stderr);

        info!(
            command,
            exit_code = record.exit_code,
            has_error = record.has_error,
            "command recorded"
        );

        history.append(record.clone())?;
        Ok(record)
    }
}
