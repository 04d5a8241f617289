// ABOUTME: Read-only guardian registry backed by a JSON file
// Publishes the guardian count over a watch channel so sessions see external changes

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, warn};

/// Failure reading the guardian list
#[derive(Debug, Error)]
pub enum GuardianError {
    /// Reading the file failed
    #[error("IO error reading guardians from {path}: {source}")]
    Io {
        /// Guardian list file
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// File is not a JSON guardian list
    #[error("Failed to parse guardian list: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A person alerted when a call starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guardian {
    /// Display name
    pub name: String,
    /// Number the alert goes to
    #[serde(default)]
    pub phone: String,
}

impl Guardian {
    /// Guardian with a name and phone number
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
        }
    }
}

/// The guardian list and a live count for subscribers
pub struct GuardianRegistry {
    path: Option<PathBuf>,
    guardians: Vec<Guardian>,
    count_tx: watch::Sender<usize>,
}

impl GuardianRegistry {
    /// Registry with no backing file
    pub fn in_memory(guardians: Vec<Guardian>) -> Self {
        let (count_tx, _) = watch::channel(guardians.len());
        Self {
            path: None,
            guardians,
            count_tx,
        }
    }

    /// Open the registry file. A missing file means no guardians yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, GuardianError> {
        let path = path.into();
        let guardians = Self::read_file(&path)?;
        info!("Loaded {} guardians from {}", guardians.len(), path.display());

        let (count_tx, _) = watch::channel(guardians.len());
        Ok(Self {
            path: Some(path),
            guardians,
            count_tx,
        })
    }

    fn read_file(path: &Path) -> Result<Vec<Guardian>, GuardianError> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(path).map_err(|source| GuardianError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    /// Number of guardians
    pub fn count(&self) -> usize {
        self.guardians.len()
    }

    /// Current guardians
    pub fn guardians(&self) -> &[Guardian] {
        &self.guardians
    }

    /// Backing file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Receiver that observes the current count and every later change
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.count_tx.subscribe()
    }

    /// Re-read the backing file after an external change.
    /// On a parse failure the previous list is kept.
    pub fn reload(&mut self) -> Result<usize, GuardianError> {
        let Some(path) = self.path.clone() else {
            return Ok(self.count());
        };

        match Self::read_file(&path) {
            Ok(guardians) => {
                self.set_guardians(guardians);
                Ok(self.count())
            }
            Err(e) => {
                warn!("Keeping previous guardian list: {}", e);
                Err(e)
            }
        }
    }

    /// Apply a guardian list delivered by the external store
    pub fn set_guardians(&mut self, guardians: Vec<Guardian>) {
        self.guardians = guardians;
        let count = self.guardians.len();
        let changed = self.count_tx.send_if_modified(|current| {
            if *current == count {
                false
            } else {
                *current = count;
                true
            }
        });
        if changed {
            info!("Guardian count changed to {}", count);
        }
    }
}
