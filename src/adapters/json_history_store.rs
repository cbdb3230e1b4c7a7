//! JSON file history store adapter.
//!
//! The store is one pretty-printed JSON document. Saves go through a
//! sibling temp file followed by a rename, so a crash mid-write leaves the
//! previous store intact.

use std::fs;
use std::path::PathBuf;

use crate::domain::error::PhasewatchError;
use crate::domain::history::HistoryStore;
use crate::ports::store_port::HistoryStorePort;

pub struct JsonHistoryStore {
    path: PathBuf,
}

impl JsonHistoryStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl HistoryStorePort for JsonHistoryStore {
    fn load(&self) -> Result<HistoryStore, PhasewatchError> {
        if !self.path.exists() {
            return Ok(HistoryStore::new());
        }
        let content = fs::read_to_string(&self.path).map_err(|e| PhasewatchError::Store {
            reason: format!("failed to read {}: {e}", self.path.display()),
        })?;
        serde_json::from_str(&content).map_err(|e| PhasewatchError::Store {
            reason: format!("failed to parse {}: {e}", self.path.display()),
        })
    }

    fn save(&self, store: &HistoryStore) -> Result<(), PhasewatchError> {
        let encoded =
            serde_json::to_string_pretty(store).map_err(|e| PhasewatchError::Store {
                reason: format!("failed to encode history: {e}"),
            })?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, encoded).map_err(|e| PhasewatchError::Store {
            reason: format!("failed to write {}: {e}", tmp_path.display()),
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|e| PhasewatchError::Store {
            reason: format!("failed to replace {}: {e}", self.path.display()),
        })
    }
}
