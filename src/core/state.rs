use std::fmt;

use super::config::{ConfigStore, DataPaths};
use crate::error::SessionError;
use crate::input::{ChatHistory, CommandHistory};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Shell,
    Chat,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::Shell => Mode::Chat,
            Mode::Chat => Mode::Shell,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mode::Shell => "Shell",
            Mode::Chat => "Chat",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything one program run owns: the mode, both histories, and the
/// connection settings.
pub struct Session {
    mode: Mode,
    pub command_history: CommandHistory,
    pub chat_history: ChatHistory,
    pub config: ConfigStore,
}

impl Session {
    pub fn load(paths: &DataPaths) -> Result<Self, SessionError> {
        paths.ensure_root()?;

        let config = ConfigStore::load(paths.config_path.clone())?;
        let command_history = CommandHistory::load(paths.history_path.clone())?;
        let chat_history = ChatHistory::load(paths.chat_history_path.clone())?;

        Ok(Session {
            mode: Mode::default(),
            command_history,
            chat_history,
            config,
        })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn toggle_mode(&mut self) -> Mode {
        self.mode = self.mode.toggled();
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_toggle_is_identity() {
        assert_eq!(Mode::Shell.toggled().toggled(), Mode::Shell);
        assert_eq!(Mode::Chat.toggled().toggled(), Mode::Chat);
    }

    #[test]
    fn test_load_starts_in_shell_mode_with_healed_files() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::in_dir(dir.path().join("data"));

        let mut session = Session::load(&paths).unwrap();

        assert_eq!(session.mode(), Mode::Shell);
        assert!(session.command_history.is_empty());
        assert!(session.chat_history.is_empty());
        assert!(paths.config_path.exists());
        assert!(paths.history_path.exists());
        assert!(paths.chat_history_path.exists());

        assert_eq!(session.toggle_mode(), Mode::Chat);
    }
}
