use crate::domain::ports::KeyValueStore;
use crate::utils::error::{Result, TrackerError};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// 程序內的 key-value 儲存，不跨 session 保留
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.slots.remove(key);
        Ok(())
    }
}

/// 每個 key 對應 `<base_path>/<key>.json` 一個檔案
#[derive(Debug, Clone)]
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.base_path.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let full_path = self.slot_path(key)?;
        match fs::read_to_string(&full_path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let full_path = self.slot_path(key)?;

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let full_path = self.slot_path(key)?;
        match fs::remove_file(full_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// slot 名稱會成為檔名，不允許路徑字元
pub fn validate_key(key: &str) -> Result<()> {
    let invalid = key.is_empty()
        || key == "."
        || key == ".."
        || key.contains(['/', '\\', '\0']);

    if invalid {
        return Err(TrackerError::InvalidConfigValueError {
            field: "storage.key".to_string(),
            value: key.to_string(),
            reason: "Key must be a plain, non-empty file name".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("items").unwrap(), None);

        store.set("items", "[]").unwrap();
        assert_eq!(store.get("items").unwrap().as_deref(), Some("[]"));

        store.remove("items").unwrap();
        store.remove("items").unwrap();
        assert_eq!(store.get("items").unwrap(), None);
    }

    #[test]
    fn test_file_store_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = FileStore::new(temp_dir.path().join("nested"));

        assert_eq!(store.get("items").unwrap(), None);
        store.set("items", r#"[{"id":0}]"#).unwrap();
        assert!(temp_dir.path().join("nested/items.json").exists());
        assert_eq!(store.get("items").unwrap().as_deref(), Some(r#"[{"id":0}]"#));

        store.remove("items").unwrap();
        assert_eq!(store.get("items").unwrap(), None);
        store.remove("items").unwrap();
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = FileStore::new(temp_dir.path());

        for key in ["", "..", "a/b", "a\\b"] {
            assert!(store.set(key, "x").is_err(), "{key:?}");
        }
        assert!(validate_key("items").is_ok());
    }
}
