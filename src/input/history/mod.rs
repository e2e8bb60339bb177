pub(crate) mod file_ops;
pub mod types;

use std::{io, path::PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::info;

pub use self::file_ops::FileOps;
pub use self::types::{ChatTurn, CommandRecord, Role};

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("failed to write history {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Append-only log persisted as a JSON array after every mutation.
#[derive(Debug)]
pub struct HistoryStore<T> {
    entries: Vec<T>,
    file_ops: FileOps,
}

pub type CommandHistory = HistoryStore<CommandRecord>;
pub type ChatHistory = HistoryStore<ChatTurn>;

impl<T> HistoryStore<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Loads the log, replacing an absent or malformed file with an empty one.
    pub fn load(history_file: PathBuf) -> Result<Self, HistoryError> {
        let file_ops = FileOps::new(history_file);

        let (entries, healed) = match file_ops.read::<Vec<T>>() {
            Some(entries) => (entries, false),
            None => (Vec::new(), true),
        };
        let store = HistoryStore { entries, file_ops };

        if healed {
            info!(path = %store.file_ops.path().display(), "initializing empty history");
            store.persist()?;
        }

        Ok(store)
    }

    /// Adds one record and writes the whole log through to disk.
    ///
    /// The record stays in memory even when the write fails.
    pub fn append(&mut self, record: T) -> Result<(), HistoryError> {
        self.entries.push(record);
        self.persist()
    }

    pub fn clear(&mut self) -> Result<(), HistoryError> {
        self.entries.clear();
        self.persist()
    }

    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self) -> Result<(), HistoryError> {
        self.file_ops
            .write(&self.entries)
            .map_err(|source| HistoryError::Io {
                path: self.file_ops.path().to_path_buf(),
                source,
            })
    }
}
