use std::cell::RefCell;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::TodoError;
use crate::models::TaskRecord;

/// Load-all / save-all persistence for the task list.
pub trait TaskStore {
    /// Never fails: missing or unusable data yields an empty list.
    fn load(&self) -> Vec<TaskRecord>;

    fn save(&self, records: &[TaskRecord]) -> Result<(), TodoError>;
}

/// Stores the list as a pretty-printed JSON array in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl TaskStore for JsonFileStore {
    fn load(&self) -> Vec<TaskRecord> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no task file yet");
                return Vec::new();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cannot read task file");
                return Vec::new();
            }
        };
        parse_records(&content).unwrap_or_else(|reason| {
            warn!(path = %self.path.display(), "ignoring task file: {reason}");
            Vec::new()
        })
    }

    fn save(&self, records: &[TaskRecord]) -> Result<(), TodoError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                TodoError::storage(format!("cannot create {}: {e}", parent.display()))
            })?;
        }
        let body = serde_json::to_string_pretty(records)?;
        let tmp = self.tmp_path();
        fs::write(&tmp, body)
            .and_then(|()| fs::rename(&tmp, &self.path))
            .map_err(|e| {
                let _ = fs::remove_file(&tmp);
                TodoError::storage(format!("cannot write {}: {e}", self.path.display()))
            })?;
        debug!(path = %self.path.display(), count = records.len(), "saved tasks");
        Ok(())
    }
}

/// Parses a stored document. Elements that are not objects are skipped.
fn parse_records(content: &str) -> Result<Vec<TaskRecord>, String> {
    let value: Value = serde_json::from_str(content).map_err(|e| format!("invalid JSON: {e}"))?;
    let Value::Array(items) = value else {
        return Err("top level is not a list".to_string());
    };
    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| match serde_json::from_value::<TaskRecord>(item) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(index = i, error = %e, "skipping malformed task entry");
                None
            }
        })
        .collect())
}

/// Keeps records in memory; nothing outlives the value.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RefCell<Vec<TaskRecord>>,
}

impl MemoryStore {
    pub fn new(records: Vec<TaskRecord>) -> Self {
        Self {
            records: RefCell::new(records),
        }
    }
}

impl TaskStore for MemoryStore {
    fn load(&self) -> Vec<TaskRecord> {
        self.records.borrow().clone()
    }

    fn save(&self, records: &[TaskRecord]) -> Result<(), TodoError> {
        *self.records.borrow_mut() = records.to_vec();
        Ok(())
    }
}
