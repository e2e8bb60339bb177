use std::env;
use std::path::PathBuf;

use super::ConfigError;

/// Overrides the data directory, mainly for tests and portable installs.
const HOME_ENV: &str = "LLMCODE_HOME";
const DATA_DIR: &str = ".llmcode";

#[derive(Debug, Clone)]
pub struct DataPaths {
    pub root: PathBuf,
    pub config_path: PathBuf,
    pub history_path: PathBuf,
    pub chat_history_path: PathBuf,
}

impl DataPaths {
    pub fn new() -> Result<Self, ConfigError> {
        let root = match env::var_os(HOME_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs::home_dir()
                .ok_or(ConfigError::HomeDirNotFound)?
                .join(DATA_DIR),
        };

        Ok(Self::in_dir(root))
    }

    pub fn in_dir(root: impl Into<PathBuf>) -> Self {
        let root = root.into();

        DataPaths {
            config_path: root.join("config.json"),
            history_path: root.join("history.json"),
            chat_history_path: root.join("chat_history.json"),
            root,
        }
    }

    pub fn ensure_root(&self) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.root).map_err(|source| ConfigError::Io {
            path: self.root.clone(),
            source,
        })
    }
}
