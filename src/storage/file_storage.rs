use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::{Record, StorageError};

pub const DEFAULT_FILE_PATH: &str = "file.json";

/// Records keyed by `<Kind>.<id>`, mirrored to one JSON document.
pub struct FileStorage {
    file_path: PathBuf,
    objects: BTreeMap<String, Record>,
}

impl FileStorage {
    /// Empty store bound to `file_path`. Nothing is read until `reload`.
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            objects: BTreeMap::new(),
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn all(&self) -> &BTreeMap<String, Record> {
        &self.objects
    }

    /// Inserts or replaces one entry.
    pub fn insert(&mut self, key: String, record: Record) {
        self.objects.insert(key, record);
    }

    pub fn get(&self, key: &str) -> Option<&Record> {
        self.objects.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Record> {
        self.objects.get_mut(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Record> {
        self.objects.remove(key)
    }

    /// Replaces the in-memory mapping with the document on disk. A missing
    /// or unreadable document leaves the mapping untouched.
    pub fn reload(&mut self) {
        match self.read_document() {
            Ok(Some(objects)) => {
                debug!(path = %self.file_path.display(), count = objects.len(), "reloaded store");
                self.objects = objects;
            }
            Ok(None) => debug!(path = %self.file_path.display(), "no store document yet"),
            Err(e) => warn!(path = %self.file_path.display(), error = %e, "ignoring unreadable store document"),
        }
    }

    fn read_document(&self) -> Result<Option<BTreeMap<String, Record>>, StorageError> {
        let content = match fs::read_to_string(&self.file_path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::io(&self.file_path, e)),
        };

        let document: Map<String, JsonValue> = serde_json::from_str(&content)?;
        let mut objects = BTreeMap::new();
        for (key, entry) in document {
            let Some(fields) = entry.as_object() else {
                warn!(key = %key, "skipping non-object store entry");
                continue;
            };
            match Record::from_map(fields) {
                // Re-keyed from the record itself, as the document key may be stale.
                Ok(record) => {
                    objects.insert(record.key(), record);
                }
                Err(e) => warn!(key = %key, error = %e, "skipping store entry"),
            }
        }
        Ok(Some(objects))
    }

    /// Writes every record to the document, replacing it atomically.
    pub fn save(&self) -> Result<(), StorageError> {
        let document = self.objects
            .iter()
            .map(|(key, record)| Ok((key.clone(), JsonValue::Object(record.to_map()?))))
            .collect::<Result<Map<String, JsonValue>, StorageError>>()?;
        let content = serde_json::to_string_pretty(&document)?;

        let mut tmp_path = self.file_path.clone().into_os_string();
        tmp_path.push(".tmp");
        let tmp_path = PathBuf::from(tmp_path);

        fs::write(&tmp_path, content).map_err(|e| StorageError::io(&tmp_path, e))?;
        fs::rename(&tmp_path, &self.file_path).map_err(|e| StorageError::io(&self.file_path, e))?;
        debug!(path = %self.file_path.display(), count = self.objects.len(), "saved store");
        Ok(())
    }
}

impl Default for FileStorage {
    fn default() -> Self {
        Self::new(DEFAULT_FILE_PATH)
    }
}
