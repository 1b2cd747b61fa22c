//! Persistence boundary: the collections as a single JSON document on disk.
//!
//! Loads and saves are explicit and synchronous. A save failure is reported
//! but never fatal; the in-memory collections stay authoritative.

use crate::store::Collections;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Basename of the persisted document.
pub const STORAGE_KEY: &str = "todo-storage";

/// Version of the persisted document layout.
const STORAGE_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct StorageDoc {
    version: u32,
    #[serde(flatten)]
    collections: Collections,
}

/// Handle on the persisted document's location.
#[derive(Debug, Clone)]
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The default document location under the platform data directory.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("taskdeck")
            .join(format!("{}.json", STORAGE_KEY))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted collections. Returns `None` when no document
    /// exists yet; a present but unreadable document is an error.
    pub fn load(&self) -> anyhow::Result<Option<Collections>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No persisted data, starting fresh");
            return Ok(None);
        }
        let json = std::fs::read_to_string(&self.path)
            .with_context(|| format!("cannot read {}", self.path.display()))?;
        let doc: StorageDoc = serde_json::from_str(&json)
            .with_context(|| format!("{} is not a valid storage document", self.path.display()))?;
        debug!(
            path = %self.path.display(),
            tasks = doc.collections.tasks.len(),
            "Loaded persisted data"
        );
        Ok(Some(doc.collections))
    }

    /// Save the collections. Failures are logged, not propagated, so a full
    /// disk never takes down a mutation that already happened in memory.
    pub fn save(&self, collections: &Collections) {
        if let Err(err) = self.try_save(collections) {
            warn!(path = %self.path.display(), error = %err, "Failed to persist data");
        }
    }

    fn try_save(&self, collections: &Collections) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
        let doc = StorageDoc {
            version: STORAGE_VERSION,
            collections: collections.clone(),
        };
        let json = serde_json::to_string_pretty(&doc)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("cannot write {}", self.path.display()))?;
        Ok(())
    }
}
