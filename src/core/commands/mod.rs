mod history;

pub use history::{format_chat_entry, format_command_entry, last_failed, preview};

use super::state::Mode;

const SET_MODEL_PREFIX: &str = "config:model";

/// What one input line asks the session to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ToggleMode,
    Exit,
    ShowConfig,
    /// Carries the requested model name, possibly empty.
    SetModel(String),
    Help,
    History,
    Clear,
    /// Shell mode only.
    Explain,
    Noop,
    RunCommand(String),
    SendChat(String),
}

/// Resolves a line to exactly one action; the first matching rule wins.
pub fn resolve(line: &str, mode: Mode) -> Action {
    let input = line.trim();

    match input {
        "!" => return Action::ToggleMode,
        "exit" => return Action::Exit,
        "config" => return Action::ShowConfig,
        "help" => return Action::Help,
        "history" => return Action::History,
        "clear" => return Action::Clear,
        "" => return Action::Noop,
        _ => {}
    }

    if let Some(rest) = input.strip_prefix(SET_MODEL_PREFIX) {
        if rest.is_empty() || rest.starts_with(char::is_whitespace) {
            return Action::SetModel(rest.trim().to_string());
        }
    }

    match mode {
        Mode::Shell if input == "explain" => Action::Explain,
        Mode::Shell => Action::RunCommand(input.to_string()),
        Mode::Chat => Action::SendChat(input.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_builtins_in_both_modes() {
        for mode in [Mode::Shell, Mode::Chat] {
            assert_eq!(resolve("!", mode), Action::ToggleMode);
            assert_eq!(resolve("  exit  ", mode), Action::Exit);
            assert_eq!(resolve("config", mode), Action::ShowConfig);
            assert_eq!(resolve("help", mode), Action::Help);
            assert_eq!(resolve("history", mode), Action::History);
            assert_eq!(resolve("clear", mode), Action::Clear);
            assert_eq!(resolve("   ", mode), Action::Noop);
        }
    }

    #[test]
    fn test_set_model_parsing() {
        assert_eq!(
            resolve("config:model llama3", Mode::Shell),
            Action::SetModel("llama3".to_string())
        );
        assert_eq!(
            resolve("config:model   ", Mode::Chat),
            Action::SetModel(String::new())
        );
        assert_eq!(resolve("config:model", Mode::Chat), Action::SetModel(String::new()));
        assert_eq!(
            resolve("config:modelx", Mode::Shell),
            Action::RunCommand("config:modelx".to_string())
        );
    }

    #[test]
    fn test_explain_is_shell_only() {
        assert_eq!(resolve("explain", Mode::Shell), Action::Explain);
        assert_eq!(
            resolve("explain", Mode::Chat),
            Action::SendChat("explain".to_string())
        );
    }

    #[test]
    fn test_free_text_depends_on_mode() {
        assert_eq!(
            resolve("ls -la", Mode::Shell),
            Action::RunCommand("ls -la".to_string())
        );
        assert_eq!(
            resolve("what does ls -la do?", Mode::Chat),
            Action::SendChat("what does ls -la do?".to_string())
        );
    }
}
