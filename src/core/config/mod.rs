use std::{io, path::PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

mod paths;

use crate::input::history::FileOps;

pub use paths::DataPaths;

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "qwen2.5-coder";

/// Where the inference service lives and which model to ask.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionConfig {
    pub base_url: String,
    pub model: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        ConnectionConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl ConnectionConfig {
    pub fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Serialize, Deserialize)]
struct ConfigFile {
    ollama: ConnectionConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Home directory not found")]
    HomeDirNotFound,
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub struct ConfigStore {
    file_ops: FileOps,
    current: ConnectionConfig,
}

impl ConfigStore {
    /// Loads the stored settings, writing the defaults when none are usable.
    pub fn load(path: PathBuf) -> Result<Self, ConfigError> {
        let file_ops = FileOps::new(path);

        match file_ops.read::<ConfigFile>() {
            Some(file) => Ok(ConfigStore {
                file_ops,
                current: file.ollama,
            }),
            None => {
                info!(path = %file_ops.path().display(), "writing default config");
                let mut store = ConfigStore {
                    file_ops,
                    current: ConnectionConfig::default(),
                };
                store.save(ConnectionConfig::default())?;
                Ok(store)
            }
        }
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.current
    }

    /// Writes `config` to disk and only then makes it current.
    pub fn save(&mut self, config: ConnectionConfig) -> Result<(), ConfigError> {
        let file = ConfigFile { ollama: config };
        self.file_ops.write(&file).map_err(|source| ConfigError::Io {
            path: self.file_ops.path().to_path_buf(),
            source,
        })?;

        self.current = file.ollama;
        Ok(())
    }

    pub fn set_model(&mut self, model: &str) -> Result<(), ConfigError> {
        let updated = ConnectionConfig {
            model: model.to_string(),
            ..self.current.clone()
        };
        self.save(updated)
    }
}
