//! Export/import boundary for the task collections.
//!
//! Exports are full snapshots enabling:
//! - Backup and restore of all task data
//! - Migration between installations
//! - Spreadsheet-friendly CSV dumps
//!
//! JSON is the canonical round-trippable format; CSV is a lossy one-way
//! projection of the task table.

use crate::error::{StoreError, StoreResult};
use crate::store::Collections;
use crate::types::{List, Subtask, Tag, Task};
use anyhow::Context;
use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Export format version.
pub const EXPORT_VERSION: &str = "1.0";

/// A full snapshot of the task data, as written to an export file.
///
/// Subtasks appear twice: inline in their parent task, and flattened in
/// `subtasks` for consumers that want a flat table. Import reads the inline
/// copies and ignores the flat list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Export format version.
    pub version: String,

    /// ISO 8601 timestamp of export.
    pub export_date: String,

    pub tasks: Vec<Task>,
    #[serde(default)]
    pub lists: Vec<List>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
}

impl Snapshot {
    /// Build a snapshot of the given collections with current metadata.
    pub fn new(collections: &Collections) -> Self {
        let subtasks = collections
            .tasks
            .iter()
            .flat_map(|t| t.subtasks.iter().cloned())
            .collect();
        Self {
            version: EXPORT_VERSION.to_string(),
            export_date: Utc::now().to_rfc3339(),
            tasks: collections.tasks.clone(),
            lists: collections.lists.clone(),
            tags: collections.tags.clone(),
            subtasks,
        }
    }

    /// Parse and validate a snapshot from JSON data.
    ///
    /// Structural problems (not JSON, or missing `version`/`tasks`) are
    /// validation failures; nothing is imported from a document that fails
    /// here.
    pub fn from_json(json: &str) -> StoreResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| StoreError::validation("import", e.to_string()))?;
        if value.get("version").is_none() {
            return Err(StoreError::validation("version", "missing required field"));
        }
        if !value.get("tasks").is_some_and(|t| t.is_array()) {
            return Err(StoreError::validation("tasks", "missing required field"));
        }
        serde_json::from_value(value).map_err(|e| StoreError::validation("import", e.to_string()))
    }

    /// Load a snapshot from a file (plain JSON or gzip).
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        use std::fs::File;
        use std::io::{BufReader, Read};

        let file = File::open(path)
            .with_context(|| format!("cannot open {}", path.display()))?;
        let mut reader = BufReader::new(file);

        // Check for gzip magic bytes
        let mut magic = [0u8; 2];
        reader.read_exact(&mut magic)?;

        // Reset to start
        drop(reader);
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);

        let mut json = String::new();
        if magic == [0x1f, 0x8b] {
            let mut decoder = flate2::read::GzDecoder::new(reader);
            decoder.read_to_string(&mut json)?;
        } else {
            reader.read_to_string(&mut json)?;
        }
        Ok(Self::from_json(&json)?)
    }

    /// Serialize to JSON with pretty formatting.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write the snapshot to a file, gzip-compressed on request.
    pub fn write_file(&self, path: &Path, compress: bool) -> anyhow::Result<()> {
        use std::io::Write;

        let json = serde_json::to_vec_pretty(self)?;
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("cannot create {}", path.display()))?;
        if compress {
            let mut encoder =
                flate2::write::GzEncoder::new(file, flate2::Compression::default());
            encoder.write_all(&json)?;
            encoder.finish()?;
        } else {
            file.write_all(&json)?;
        }
        Ok(())
    }

    /// Render the task table as CSV.
    ///
    /// One row per task; dates in RFC 3339, the list by name, tags by name
    /// joined with "; ". Lists, tags, and subtask detail beyond the parent
    /// task are not representable in this projection.
    pub fn to_csv(&self) -> String {
        let mut out = String::from(
            "Title,Description,Status,Priority,Due Date,List,Tags,Created At,Completed At\n",
        );
        for task in &self.tasks {
            let list_name = task
                .list_id
                .as_ref()
                .and_then(|id| self.lists.iter().find(|l| &l.id == id))
                .map(|l| l.name.as_str())
                .unwrap_or("");
            let tag_names = task
                .tags
                .iter()
                .filter_map(|id| self.tags.iter().find(|t| &t.id == id))
                .map(|t| t.name.as_str())
                .collect::<Vec<_>>()
                .join("; ");

            let row = [
                task.title.as_str(),
                task.description.as_deref().unwrap_or(""),
                task.status.as_str(),
                task.priority.as_str(),
                &task.due_date.map(rfc3339).unwrap_or_default(),
                list_name,
                &tag_names,
                &rfc3339(task.created_at),
                &task.completed_at.map(rfc3339).unwrap_or_default(),
            ]
            .map(escape_csv)
            .join(",");
            out.push_str(&row);
            out.push('\n');
        }
        out
    }

    /// Convert the snapshot back into collections for import.
    pub fn into_collections(self) -> Collections {
        Collections {
            tasks: self.tasks,
            lists: self.lists,
            tags: self.tags,
        }
    }
}

fn rfc3339(ms: i64) -> String {
    match Utc.timestamp_millis_opt(ms).single() {
        Some(dt) => dt.to_rfc3339(),
        None => String::new(),
    }
}

/// Quote a CSV field when it contains a comma, quote, or newline; embedded
/// quotes are doubled.
fn escape_csv(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;
    use crate::types::{CreateListInput, CreateTagInput, CreateTaskInput};

    fn seeded_store() -> Store {
        let store = Store::new();
        let list = store
            .create_list(CreateListInput {
                name: "Errands, etc".to_string(),
                color: "#64748b".to_string(),
            })
            .unwrap();
        let tag = store
            .create_tag(CreateTagInput {
                name: "urgent".to_string(),
                color: "#ef4444".to_string(),
            })
            .unwrap();
        let task = store
            .create_task(CreateTaskInput {
                title: "Say \"hello\"".to_string(),
                list_id: Some(list.id),
                tags: vec![tag.id],
                ..Default::default()
            })
            .unwrap();
        store.add_subtask(&task.id, "First step").unwrap();
        store
    }

    #[test]
    fn snapshot_json_roundtrip() {
        let store = seeded_store();
        let snapshot = Snapshot::new(&store.snapshot());
        assert_eq!(snapshot.version, EXPORT_VERSION);
        assert_eq!(snapshot.subtasks.len(), 1);

        let json = snapshot.to_json_pretty().unwrap();
        let loaded = Snapshot::from_json(&json).unwrap();
        assert_eq!(loaded.tasks, snapshot.tasks);
        assert_eq!(loaded.lists, snapshot.lists);
        assert_eq!(loaded.tags, snapshot.tags);
    }

    #[test]
    fn from_json_rejects_malformed_documents() {
        use crate::error::StoreError;

        assert!(Snapshot::from_json("not json").is_err());
        let err = Snapshot::from_json(r#"{"version": "1.0"}"#).unwrap_err();
        assert!(matches!(err, StoreError::ValidationFailed { field: "tasks", .. }));
        let err = Snapshot::from_json(r#"{"tasks": []}"#).unwrap_err();
        assert!(matches!(err, StoreError::ValidationFailed { field: "version", .. }));
    }

    #[test]
    fn csv_escapes_and_names_references() {
        let store = seeded_store();
        let snapshot = Snapshot::new(&store.snapshot());
        let csv = snapshot.to_csv();

        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Title,Description,Status,Priority,Due Date,List,Tags,Created At,Completed At"
        );
        let row = lines.next().unwrap();
        // Embedded quotes doubled, field wrapped.
        assert!(row.starts_with("\"Say \"\"hello\"\"\""));
        // List name contains a comma and gets quoted.
        assert!(row.contains("\"Errands, etc\""));
        assert!(row.contains("urgent"));
    }

    #[test]
    fn gzip_file_roundtrip() {
        let store = seeded_store();
        let snapshot = Snapshot::new(&store.snapshot());
        let dir = tempfile::tempdir().unwrap();

        let plain = dir.path().join("export.json");
        snapshot.write_file(&plain, false).unwrap();
        let loaded = Snapshot::from_file(&plain).unwrap();
        assert_eq!(loaded.tasks, snapshot.tasks);

        let gz = dir.path().join("export.json.gz");
        snapshot.write_file(&gz, true).unwrap();
        let loaded = Snapshot::from_file(&gz).unwrap();
        assert_eq!(loaded.tasks, snapshot.tasks);
    }
}
