use std::io::{self, Write};

use tracing::warn;

use crate::core::commands::{self, Action};
use crate::core::state::{Mode, Session};
use crate::highlight::Palette;
use crate::inference::{InferenceClient, InferenceError, Transport};
use crate::process::{CommandExecutor, ProcessRunner, WriterSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Turns each input line into exactly one action and runs it to completion.
///
/// Failures of the action itself are printed and the session goes on; the
/// only error returned is a failed write to the terminal.
pub struct Controller<R, T> {
    session: Session,
    executor: CommandExecutor<R>,
    client: InferenceClient<T, R>,
    palette: Palette,
}

impl<R, T> Controller<R, T>
where
    R: ProcessRunner + Clone,
    T: Transport,
{
    pub fn new(session: Session, runner: R, transport: T, palette: Palette) -> Self {
        Controller {
            session,
            executor: CommandExecutor::new(runner.clone()),
            client: InferenceClient::new(transport, runner),
            palette,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn prompt(&self) -> String {
        let mode = self.session.mode();
        let text = format!("LLMCode [{}] > ", mode.label());
        match mode {
            Mode::Shell => self.palette.info(&text),
            Mode::Chat => self.palette.success(&text),
        }
    }

    /// Like `handle_line`, but a terminal that can no longer be written ends
    /// the session instead of failing it.
    pub fn step(&mut self, line: &str, out: &mut dyn Write) -> Flow {
        self.handle_line(line, out).unwrap_or_else(|e| {
            warn!(error = %e, "terminal write failed, ending session");
            Flow::Exit
        })
    }

    pub fn handle_line(&mut self, line: &str, out: &mut dyn Write) -> io::Result<Flow> {
        let mode = self.session.mode();

        match commands::resolve(line, mode) {
            Action::ToggleMode => {
                let mode = self.session.toggle_mode();
                let message = format!("Switched to {} mode", mode.label().to_uppercase());
                writeln!(out, "{}", self.palette.warning(&message))?;
            }
            Action::Exit => return Ok(Flow::Exit),
            Action::ShowConfig => self.show_config(out)?,
            Action::SetModel(name) => self.set_model(&name, out)?,
            Action::Help => self.show_help(mode, out)?,
            Action::History => match mode {
                Mode::Shell => self.show_command_history(out)?,
                Mode::Chat => self.show_chat_history(out)?,
            },
            Action::Clear => self.clear_history(mode, out)?,
            Action::Explain => self.explain_last_error(out)?,
            Action::Noop => {}
            Action::RunCommand(command) => self.run_command(&command, out)?,
            Action::SendChat(message) => self.send_chat(&message, out)?,
        }

        Ok(Flow::Continue)
    }

    fn show_config(&self, out: &mut dyn Write) -> io::Result<()> {
        let config = self.session.config.config();
        writeln!(out, "{}", self.palette.success("=== Current Configuration ==="))?;
        writeln!(
            out,
            "{}{}",
            self.palette.warning("Ollama Model: "),
            self.palette.info(&config.model)
        )?;
        writeln!(
            out,
            "{}{}",
            self.palette.warning("Ollama URL: "),
            self.palette.info(&config.base_url)
        )?;
        writeln!(out, "{}", self.palette.success("============================"))
    }

    fn set_model(&mut self, name: &str, out: &mut dyn Write) -> io::Result<()> {
        if name.is_empty() {
            let usage = "Please provide a model name. Example: config:model llama3";
            return writeln!(out, "{}", self.palette.error(usage));
        }

        match self.session.config.set_model(name) {
            Ok(()) => writeln!(
                out,
                "{}{}",
                self.palette.success("Ollama model changed to: "),
                self.palette.info(name)
            ),
            Err(e) => writeln!(out, "{}", self.palette.error(&format!("Failed to save config: {e}"))),
        }
    }

    fn show_help(&self, mode: Mode, out: &mut dyn Write) -> io::Result<()> {
        let mut entries = vec![
            ("!", "Toggle between Shell and Chat mode"),
            ("exit", "Exit the application"),
            ("help", "Show this help message"),
            ("config", "Show current configuration"),
            ("config:model <name>", "Change Ollama model"),
        ];
        let footer = match mode {
            Mode::Shell => {
                entries.push(("history", "Show command history"));
                entries.push(("clear", "Clear command history"));
                entries.push(("explain", "Explain the error from the last command"));
                "Any other input will be executed as a shell command"
            }
            Mode::Chat => {
                entries.push(("history", "Show chat history"));
                entries.push(("clear", "Clear chat history"));
                "Any other input will be sent to Ollama"
            }
        };

        writeln!(out, "{}", self.palette.success("=== Available Commands ==="))?;
        for (command, description) in entries {
            writeln!(out, "{} - {}", self.palette.success(command), description)?;
        }
        writeln!(out, "{}", self.palette.success(footer))?;
        writeln!(out, "{}", self.palette.success("============================"))
    }

    fn show_command_history(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "{}", self.palette.success("=== Command History ==="))?;
        for (index, record) in self.session.command_history.entries().iter().enumerate() {
            writeln!(out, "{}", commands::format_command_entry(index, record, &self.palette))?;
        }
        writeln!(out, "{}", self.palette.success("======================="))
    }

    fn show_chat_history(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "{}", self.palette.success("=== Chat History ==="))?;
        for (index, turn) in self.session.chat_history.entries().iter().enumerate() {
            writeln!(out, "{}", commands::format_chat_entry(index, turn, &self.palette))?;
        }
        writeln!(out, "{}", self.palette.success("======================="))
    }

    fn clear_history(&mut self, mode: Mode, out: &mut dyn Write) -> io::Result<()> {
        let (result, done) = match mode {
            Mode::Shell => (self.session.command_history.clear(), "Command history cleared"),
            Mode::Chat => (self.session.chat_history.clear(), "Chat history cleared"),
        };

        match result {
            Ok(()) => writeln!(out, "{}", self.palette.success(done)),
            Err(e) => writeln!(out, "{}", self.palette.error(&e.to_string())),
        }
    }

    fn run_command(&mut self, command: &str, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "{}", self.palette.hint(&format!("Executing: {command}")))?;
        out.flush()?;

        let result = {
            let mut sink = WriterSink::new(&mut *out, self.palette);
            self.executor
                .execute(command, &mut self.session.command_history, &mut sink)
        };

        match result {
            Ok(record) if record.has_error => writeln!(
                out,
                "{}",
                self.palette.warning(
                    "Command completed with errors. Type \"explain\" to analyze the error."
                )
            ),
            Ok(_) => Ok(()),
            Err(e) => writeln!(out, "{}", self.palette.error(&e.to_string())),
        }
    }

    fn send_chat(&mut self, message: &str, out: &mut dyn Write) -> io::Result<()> {
        let model = self.session.config.config().model.clone();
        writeln!(
            out,
            "{}",
            self.palette.warning(&format!("Sending message to Ollama ({model})..."))
        )?;
        out.flush()?;

        let outcome = self.client.chat(
            message,
            self.session.config.config(),
            &mut self.session.chat_history,
        );

        match outcome.reply {
            Ok(reply) => {
                writeln!(out, "{}", self.palette.success("\n=== OLLAMA RESPONSE ===\n"))?;
                writeln!(out, "{}", reply.content)?;
                writeln!(out, "{}", self.palette.success("\n=======================\n"))?;
            }
            Err(e) => self.report_inference_error(&e, &model, out)?,
        }

        for e in &outcome.unsaved {
            writeln!(out, "{}", self.palette.error(&format!("Failed to save chat history: {e}")))?;
        }
        Ok(())
    }

    fn explain_last_error(&self, out: &mut dyn Write) -> io::Result<()> {
        let Some(record) = commands::last_failed(self.session.command_history.entries()) else {
            return writeln!(
                out,
                "{}",
                self.palette.warning("No errors found in recent commands.")
            );
        };

        let config = self.session.config.config();
        writeln!(
            out,
            "{}",
            self.palette
                .warning(&format!("Analyzing error using Ollama ({})...", config.model))
        )?;
        out.flush()?;

        match self.client.explain_error(&record.error, config) {
            Ok(text) => {
                writeln!(out, "{}", self.palette.success("\n=== ERROR EXPLANATION ===\n"))?;
                writeln!(out, "{}", self.palette.warning(&text))?;
                writeln!(out, "{}", self.palette.success("\n=========================\n"))
            }
            Err(e) => self.report_inference_error(&e, &config.model, out),
        }
    }

    fn report_inference_error(&self, error: &InferenceError, model: &str, out: &mut dyn Write) -> io::Result<()> {
        let message = match error {
            InferenceError::Service(reason) => format!("Error from Ollama: {reason}"),
            InferenceError::Transport(reason) => format!(
                "Failed to connect to Ollama: {reason}\nMake sure Ollama is running and the model '{model}' is installed."
            ),
        };
        writeln!(out, "{}", self.palette.error(&message))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::core::config::DataPaths;
    use crate::inference::client::tests::RecordingTransport;
    use crate::inference::prompt::LISTING_COMMAND;
    use crate::input::Role;
    use crate::process::executor::tests::ScriptedRunner;

    const LS_ERROR: &str = "ls: cannot access '/nonexistent': No such file or directory\n";

    struct Fixture {
        _dir: tempfile::TempDir,
        paths: DataPaths,
        runner: ScriptedRunner,
        transport: RecordingTransport,
        controller: Controller<ScriptedRunner, RecordingTransport>,
    }

    impl Fixture {
        fn new(transport: RecordingTransport) -> Self {
            let dir = tempfile::tempdir().unwrap();
            let paths = DataPaths::in_dir(dir.path());
            let session = Session::load(&paths).unwrap();
            let runner = ScriptedRunner::default()
                .with(LISTING_COMMAND, ".\n..\nCargo.toml\n", "", 0)
                .with("echo hi", "hi\n", "", 0)
                .with("ls /nonexistent", "", LS_ERROR, 2);

            Fixture {
                _dir: dir,
                paths,
                runner: runner.clone(),
                transport: transport.clone(),
                controller: Controller::new(session, runner, transport, Palette::plain()),
            }
        }

        fn send(&mut self, line: &str) -> String {
            let mut out = Vec::new();
            let flow = self.controller.handle_line(line, &mut out).unwrap();
            assert_eq!(flow, Flow::Continue);
            String::from_utf8(out).unwrap()
        }
    }

    #[test]
    fn test_history_then_explain_scenario() {
        let mut fx = Fixture::new(RecordingTransport::default().answering("- the directory is missing"));

        let out = fx.send("echo hi");
        assert!(out.contains("Executing: echo hi"));
        assert!(out.contains("hi\n"));
        assert!(!out.contains("Command completed with errors"));

        let out = fx.send("history");
        assert!(out.contains("1. ✓ echo hi ["));

        let out = fx.send("ls /nonexistent");
        assert!(out.contains(LS_ERROR));
        assert!(out.contains("Type \"explain\" to analyze the error."));

        let out = fx.send("explain");
        assert!(out.contains("=== ERROR EXPLANATION ==="));
        assert!(out.contains("- the directory is missing"));

        let requests = fx.transport.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].1.prompt.contains(LS_ERROR.trim_end()));
        assert!(fx.controller.session().chat_history.is_empty());

        // The context listing runs through the same runner but is never recorded.
        assert!(fx.runner.calls.borrow().iter().any(|c| c == LISTING_COMMAND));
        assert_eq!(fx.controller.session().command_history.len(), 2);
    }

    #[test]
    fn test_explain_without_errors() {
        let mut fx = Fixture::new(RecordingTransport::default());

        fx.send("echo hi");
        let out = fx.send("explain");

        assert!(out.contains("No errors found in recent commands."));
        assert!(fx.transport.requests.borrow().is_empty());
    }

    #[test]
    fn test_set_model_persists_and_shows() {
        let mut fx = Fixture::new(RecordingTransport::default());

        let out = fx.send("config:model llama3");
        assert!(out.contains("Ollama model changed to: llama3"));

        let on_disk: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&fx.paths.config_path).unwrap()).unwrap();
        assert_eq!(on_disk["ollama"]["model"], "llama3");
        assert_eq!(on_disk["ollama"]["baseUrl"], "http://localhost:11434");

        let out = fx.send("config");
        assert!(out.contains("Ollama Model: llama3"));
    }

    #[test]
    fn test_set_model_without_name_is_usage_error() {
        let mut fx = Fixture::new(RecordingTransport::default());

        let out = fx.send("config:model   ");

        assert!(out.contains("Please provide a model name."));
        assert_eq!(fx.controller.session().config.config().model, "qwen2.5-coder");
    }

    #[test]
    fn test_only_toggle_changes_mode() {
        let mut fx = Fixture::new(RecordingTransport::default());

        for line in ["help", "config", "history", "clear", "explain", ""] {
            fx.send(line);
            assert_eq!(fx.controller.session().mode(), Mode::Shell);
        }

        assert!(fx.send("!").contains("Switched to CHAT mode"));
        assert_eq!(fx.controller.prompt(), "LLMCode [Chat] > ");

        for line in ["help", "config", "history", "clear", ""] {
            fx.send(line);
            assert_eq!(fx.controller.session().mode(), Mode::Chat);
        }

        assert!(fx.send("!").contains("Switched to SHELL mode"));
        assert_eq!(fx.controller.prompt(), "LLMCode [Shell] > ");
    }

    #[test]
    fn test_chat_round_trip_and_history_listing() {
        let mut fx = Fixture::new(RecordingTransport::default().answering("Rust is a systems language"));
        fx.send("!");

        let out = fx.send("what is rust?");
        assert!(out.contains("Sending message to Ollama (qwen2.5-coder)..."));
        assert!(out.contains("=== OLLAMA RESPONSE ==="));
        assert!(out.contains("Rust is a systems language"));

        let out = fx.send("history");
        assert!(out.contains("1. [USER] what is rust? ["));
        assert!(out.contains("1. [ASSISTANT] Rust is a systems language ["));
    }

    #[test]
    fn test_chat_reply_shown_when_history_cannot_be_written() {
        let mut fx = Fixture::new(RecordingTransport::default().answering("THE ANSWER"));
        fs::remove_file(&fx.paths.chat_history_path).unwrap();
        fs::create_dir_all(fx.paths.chat_history_path.join("blocker")).unwrap();

        fx.send("!");
        let out = fx.send("hello");

        assert!(out.contains("THE ANSWER"));
        assert!(out.contains("Failed to save chat history"));
        assert_eq!(fx.transport.requests.borrow().len(), 1);
        assert_eq!(fx.controller.session().chat_history.len(), 2);
    }

    #[test]
    fn test_chat_transport_failure() {
        let mut fx = Fixture::new(RecordingTransport::default().unreachable());
        fx.send("!");

        let out = fx.send("hello");

        assert!(out.contains("Failed to connect to Ollama:"));
        assert!(out.contains("Make sure Ollama is running and the model 'qwen2.5-coder' is installed."));
        let turns = fx.controller.session().chat_history.entries();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].role, Role::User);
    }

    #[test]
    fn test_chat_service_error_is_reported_verbatim() {
        let mut fx = Fixture::new(RecordingTransport::default().refusing("model 'qwen2.5-coder' not found"));
        fx.send("!");

        let out = fx.send("hello");

        assert!(out.contains("Error from Ollama: model 'qwen2.5-coder' not found"));
        assert_eq!(fx.controller.session().chat_history.len(), 1);
    }

    #[test]
    fn test_clear_is_mode_specific() {
        let mut fx = Fixture::new(RecordingTransport::default().answering("hi"));
        fx.send("echo hi");
        fx.send("!");
        fx.send("hello");

        assert!(fx.send("clear").contains("Chat history cleared"));
        assert!(fx.controller.session().chat_history.is_empty());
        assert_eq!(fx.controller.session().command_history.len(), 1);

        fx.send("!");
        assert!(fx.send("clear").contains("Command history cleared"));
        assert!(fx.controller.session().command_history.is_empty());
    }

    #[test]
    fn test_blank_line_records_nothing() {
        let mut fx = Fixture::new(RecordingTransport::default());

        assert_eq!(fx.send("   "), "");
        fx.send("!");
        assert_eq!(fx.send(""), "");

        assert!(fx.controller.session().command_history.is_empty());
        assert!(fx.controller.session().chat_history.is_empty());
    }

    #[test]
    fn test_exit_ends_loop() {
        let mut fx = Fixture::new(RecordingTransport::default());
        let mut out = Vec::new();

        let flow = fx.controller.handle_line("exit", &mut out).unwrap();

        assert_eq!(flow, Flow::Exit);
    }

    struct ClosedTerminal;

    impl Write for ClosedTerminal {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "terminal closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_closed_terminal_ends_session() {
        let mut fx = Fixture::new(RecordingTransport::default());

        assert_eq!(fx.controller.step("echo hi", &mut ClosedTerminal), Flow::Exit);
        assert_eq!(fx.controller.step("help", &mut ClosedTerminal), Flow::Exit);
    }

    #[test]
    fn test_help_is_mode_aware() {
        let mut fx = Fixture::new(RecordingTransport::default());

        let shell_help = fx.send("help");
        assert!(shell_help.contains("explain - Explain the error from the last command"));

        fx.send("!");
        let chat_help = fx.send("help");
        assert!(!chat_help.contains("explain"));
        assert!(chat_help.contains("Any other input will be sent to Ollama"));
    }
}
