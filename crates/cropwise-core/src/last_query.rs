//! Persistence of the most recent location query.
//!
//! The only state Cropwise keeps between runs: one line of text in the data dir.

use std::path::{Path, PathBuf};

use crate::error::StorageError;

const LAST_QUERY_FILE: &str = "last_location";

#[derive(Debug, Clone)]
pub struct LastQueryStore {
    path: PathBuf,
}

impl LastQueryStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(LAST_QUERY_FILE),
        }
    }

    /// Last saved query. Missing, blank or unreadable files give `None`.
    pub fn load(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let query = contents.trim();
                (!query.is_empty()).then(|| query.to_string())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::debug!("Could not read last query from {}: {}", self.path.display(), e);
                None
            }
        }
    }

    pub fn save(&self, query: &str) -> Result<(), StorageError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(StorageError::EmptyValue);
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, query)?;

        tracing::debug!("Saved last query to {}", self.path.display());
        Ok(())
    }
}
