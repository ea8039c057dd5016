// Configuration persistence module
// Reads and writes the server document as pretty-printed JSON

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tokio::sync::{Mutex, MutexGuard};

use super::document::ConfigDocument;
use crate::logger;

/// Failure while persisting the document
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to create {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// Document file manager.
///
/// Nothing is cached: every `load` reads the file again and every `save`
/// rewrites it in full.
pub struct ConfigStore {
    /// Path to the JSON document
    path: PathBuf,
    /// Serializes read-modify-write sequences across requests
    lock: Mutex<()>,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Hold exclusive access to the file for a read-modify-write sequence.
    pub async fn lock(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().await
    }

    /// Read the document, falling back to the default on any failure.
    pub fn load(&self) -> ConfigDocument {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                logger::log_debug(&format!(
                    "No document at {}, using defaults",
                    self.path.display()
                ));
                return ConfigDocument::default();
            }
            Err(e) => {
                logger::log_warning(&format!(
                    "Failed to read document {}: {e}",
                    self.path.display()
                ));
                return ConfigDocument::default();
            }
        };

        match serde_json::from_str(&content).map(ConfigDocument::from_value) {
            Ok(Some(document)) => document,
            Ok(None) => {
                logger::log_warning(&format!(
                    "Document {} is not a JSON object, using defaults",
                    self.path.display()
                ));
                ConfigDocument::default()
            }
            Err(e) => {
                logger::log_warning(&format!(
                    "Failed to parse document {}: {e}",
                    self.path.display()
                ));
                ConfigDocument::default()
            }
        }
    }

    /// Write the document with 2-space indentation, creating parent
    /// directories as needed.
    ///
    /// The content goes to a sibling `.tmp` file that is then renamed over
    /// the document, so readers never see a half-written file.
    pub fn save(&self, document: &ConfigDocument) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let content = serde_json::to_string_pretty(document)?;

        let staging = self.staging_path();
        fs::write(&staging, content).map_err(|source| StoreError::Write {
            path: staging.clone(),
            source,
        })?;
        fs::rename(&staging, &self.path).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }

    /// `settings.json` -> `settings.json.tmp`
    fn staging_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Get document file path
    #[allow(clippy::missing_const_for_fn)]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
