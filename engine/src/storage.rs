use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::error::Error;

/// Key/value persistence for player-facing numbers. Reads answer "value or
/// absent"; writes report success so callers can decide how loudly to fail.
pub trait Storage: Send {
    fn get_number(&self, key: &str) -> Option<f64>;
    fn set_number(&mut self, key: &str, value: f64) -> Result<(), Error>;
}

/// JSON map persisted to a local file, the save-file counterpart of the
/// browser local storage the game persists into on the web.
pub struct FileStorage {
    path: PathBuf,
    values: HashMap<String, f64>,
}

impl FileStorage {
    /// Opens the store at `path`, loading any values a previous run saved.
    /// A missing file is a fresh store; an unreadable one is treated the same
    /// way, with a warning, so a corrupt save never blocks the game.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(values) => values,
                Err(err) => {
                    tracing::warn!(
                        "Discarding unreadable save file {}: {}",
                        path.display(),
                        err
                    );
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };
        Self { path, values }
    }
}

impl Storage for FileStorage {
    fn get_number(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    fn set_number(&mut self, key: &str, value: f64) -> Result<(), Error> {
        self.values.insert(key.to_string(), value);
        let contents = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, contents)?;
        Ok(())
    }
}

/// In-process store for tests and ephemeral sessions.
pub struct MemoryStorage {
    values: HashMap<String, f64>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }
}

impl Storage for MemoryStorage {
    fn get_number(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    fn set_number(&mut self, key: &str, value: f64) -> Result<(), Error> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}
