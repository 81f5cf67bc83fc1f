use std::fs;
use std::io;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("store is not valid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("store document at {0} is not a json object")]
    NotAnObject(PathBuf),
}

/// A single JSON document of `key -> {field: value}` entries.
///
/// Every `put` rewrites the whole document, so the file on disk always
/// reflects the last successful write.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    data: Map<String, Value>,
}

impl JsonStore {
    /// Opens the store at `path`. A missing or empty file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let data = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => Map::new(),
            Ok(text) => match serde_json::from_str::<Value>(&text)? {
                Value::Object(map) => map,
                _ => return Err(StoreError::NotAnObject(path)),
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => Map::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        tracing::debug!(path = %path.display(), keys = data.len(), "store opened");
        Ok(Self { path, data })
    }

    pub fn exists(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Map<String, Value>> {
        self.data.get(key).and_then(Value::as_object)
    }

    /// Reads one field of an entry, `None` when absent or of the wrong shape.
    pub fn get_field<T: DeserializeOwned>(&self, key: &str, field: &str) -> Option<T> {
        let value = self.get(key)?.get(field)?;
        serde_json::from_value(value.clone()).ok()
    }

    /// Replaces the entry under `key` and writes the document back.
    pub fn put(&mut self, key: &str, fields: Map<String, Value>) -> Result<(), StoreError> {
        self.data.insert(key.to_string(), Value::Object(fields));
        self.sync()
    }

    /// Shorthand for an entry holding a single field.
    pub fn put_field(
        &mut self,
        key: &str,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<(), StoreError> {
        let mut fields = Map::new();
        fields.insert(field.to_string(), value.into());
        self.put(key, fields)
    }

    fn sync(&self) -> Result<(), StoreError> {
        let io_err = |source: io::Error| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let text = serde_json::to_string_pretty(&self.data)?;
        fs::write(&self.path, text).map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path().join("none.json")).unwrap();
        assert!(!store.exists("date"));
        assert!(store.get("date").is_none());
    }

    #[test]
    fn put_persists_entries_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let mut store = JsonStore::open(&path).unwrap();
        store.put_field("date", "date", "2025-01-01").unwrap();
        store
            .put_field("favorites", "quotes", vec!["a".to_string(), "b".to_string()])
            .unwrap();

        let reopened = JsonStore::open(&path).unwrap();
        assert!(reopened.exists("date"));
        assert_eq!(
            reopened.get_field::<String>("date", "date").as_deref(),
            Some("2025-01-01")
        );
        assert_eq!(
            reopened.get_field::<Vec<String>>("favorites", "quotes"),
            Some(vec!["a".to_string(), "b".to_string()])
        );

        let on_disk: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk["date"], json!({ "date": "2025-01-01" }));
    }

    #[test]
    fn wrong_shape_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, r#"{"date": {"date": 7}, "quote": "flat"}"#).unwrap();

        let store = JsonStore::open(&path).unwrap();
        assert_eq!(store.get_field::<String>("date", "date"), None);
        assert!(store.exists("quote"));
        assert!(store.get("quote").is_none());
    }

    #[test]
    fn rejects_non_object_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "[1, 2]").unwrap();

        assert!(matches!(JsonStore::open(&path), Err(StoreError::NotAnObject(_))));
    }
}
