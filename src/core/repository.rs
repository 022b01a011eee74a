//! Persistence adapter: mirrors the item collection into one key-value slot.

use crate::core::item_store::dedup_by_id;
use crate::domain::model::{Entry, EntryId};
use crate::domain::ports::KeyValueStore;
use crate::utils::error::{Result, TrackerError};

pub const DEFAULT_SLOT_KEY: &str = "items";

/// 每個寫入操作都是完整的 讀取 → 修改 → 寫回，沒有部分更新。
/// 沒有鎖，也不處理其他程序同時寫入：最後寫入者獲勝。
pub struct ItemRepository<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> ItemRepository<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_SLOT_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// 讀取 slot；不存在、無法解析或後端失敗時都回傳空集合
    pub fn load(&self) -> Vec<Entry> {
        match self.read_entries() {
            Ok(entries) => {
                tracing::debug!("Loaded {} items from slot '{}'", entries.len(), self.key);
                entries
            }
            Err(e) => {
                tracing::error!("Failed to read slot '{}', starting empty: {}", self.key, e);
                Vec::new()
            }
        }
    }

    pub fn append(&mut self, entry: &Entry) -> Result<()> {
        let mut entries = self.read_entries()?;
        entries.push(entry.clone());
        self.write_entries(&entries)
    }

    /// 以相同 id 原地覆寫；找不到時回傳 NotFound 且不寫入
    pub fn replace(&mut self, entry: &Entry) -> Result<()> {
        let mut entries = self.read_entries()?;
        let slot = entries
            .iter_mut()
            .find(|e| e.id == entry.id)
            .ok_or(TrackerError::NotFound { id: entry.id })?;
        *slot = entry.clone();
        self.write_entries(&entries)
    }

    /// 找不到時回傳 NotFound 且不寫入
    pub fn remove(&mut self, id: EntryId) -> Result<()> {
        let mut entries = self.read_entries()?;
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            return Err(TrackerError::NotFound { id });
        }
        self.write_entries(&entries)
    }

    /// 整個 slot 刪除
    pub fn clear(&mut self) -> Result<()> {
        tracing::debug!("Removing slot '{}'", self.key);
        self.store.remove(&self.key)
    }

    fn read_entries(&self) -> Result<Vec<Entry>> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(Vec::new());
        };

        match decode(&raw) {
            Ok(entries) => {
                // 與記憶體端相同：重複 id 只保留第一筆，避免 remove 一次刪掉多筆
                let (entries, dropped) = dedup_by_id(entries);
                if dropped > 0 {
                    tracing::warn!(
                        "⚠️ Slot '{}' holds {} items with duplicate ids, keeping the first of each",
                        self.key,
                        dropped
                    );
                }
                Ok(entries)
            }
            Err(e) => {
                tracing::warn!("⚠️ Ignoring unreadable slot '{}': {}", self.key, e);
                Ok(Vec::new())
            }
        }
    }

    fn write_entries(&mut self, entries: &[Entry]) -> Result<()> {
        let raw = serde_json::to_string(entries)?;
        tracing::debug!("Writing {} items to slot '{}'", entries.len(), self.key);
        self.store.set(&self.key, &raw)
    }
}

fn decode(raw: &str) -> Result<Vec<Entry>> {
    serde_json::from_str(raw).map_err(TrackerError::DeserializationFailure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::MemoryStore;

    fn entry(id: u64, name: &str, value: i64) -> Entry {
        Entry::new(EntryId(id), name, value)
    }

    #[test]
    fn test_load_missing_slot_is_empty() {
        let repo = ItemRepository::new(MemoryStore::new());
        assert!(repo.load().is_empty());
    }

    #[test]
    fn test_load_corrupt_slot_is_empty() {
        let mut store = MemoryStore::new();
        store.set(DEFAULT_SLOT_KEY, "{not json").unwrap();
        let repo = ItemRepository::new(store);
        assert!(repo.load().is_empty());

        let mut store = MemoryStore::new();
        store.set(DEFAULT_SLOT_KEY, r#"{"id":0}"#).unwrap();
        let repo = ItemRepository::new(store);
        assert!(repo.load().is_empty());
    }

    #[test]
    fn test_append_replace_remove() {
        let mut repo = ItemRepository::new(MemoryStore::new());
        repo.append(&entry(0, "Steak", 1200)).unwrap();
        repo.append(&entry(1, "Cookie", 400)).unwrap();
        repo.append(&entry(2, "Eggs", 300)).unwrap();

        repo.replace(&entry(1, "Cookie Large", 450)).unwrap();
        repo.remove(EntryId(0)).unwrap();

        assert_eq!(
            repo.load(),
            vec![entry(1, "Cookie Large", 450), entry(2, "Eggs", 300)]
        );
    }

    #[test]
    fn test_replace_and_remove_missing_id() {
        let mut repo = ItemRepository::new(MemoryStore::new());
        repo.append(&entry(0, "Steak", 1200)).unwrap();
        let before = repo.store().get(DEFAULT_SLOT_KEY).unwrap();

        assert!(matches!(
            repo.replace(&entry(5, "Ghost", 1)).unwrap_err(),
            TrackerError::NotFound { id: EntryId(5) }
        ));
        assert!(matches!(
            repo.remove(EntryId(5)).unwrap_err(),
            TrackerError::NotFound { .. }
        ));
        assert_eq!(repo.store().get(DEFAULT_SLOT_KEY).unwrap(), before);
    }

    #[test]
    fn test_clear_deletes_slot() {
        let mut repo = ItemRepository::with_key(MemoryStore::new(), "meals");
        repo.append(&entry(0, "Steak", 1200)).unwrap();
        assert!(repo.store().get("meals").unwrap().is_some());

        repo.clear().unwrap();
        assert!(repo.store().get("meals").unwrap().is_none());
        assert!(repo.load().is_empty());
    }

    #[test]
    fn test_append_over_corrupt_slot_starts_fresh() {
        let mut store = MemoryStore::new();
        store.set(DEFAULT_SLOT_KEY, "garbage").unwrap();
        let mut repo = ItemRepository::new(store);

        repo.append(&entry(0, "Steak", 1200)).unwrap();
        assert_eq!(repo.load(), vec![entry(0, "Steak", 1200)]);
    }

    #[test]
    fn test_duplicate_ids_collapse_to_first() {
        let mut store = MemoryStore::new();
        store
            .set(
                DEFAULT_SLOT_KEY,
                r#"[{"id":0,"name":"A","value":10},{"id":0,"name":"B","value":20}]"#,
            )
            .unwrap();
        let mut repo = ItemRepository::new(store);
        assert_eq!(repo.load(), vec![entry(0, "A", 10)]);

        repo.replace(&entry(0, "A2", 15)).unwrap();
        assert_eq!(repo.load(), vec![entry(0, "A2", 15)]);

        repo.remove(EntryId(0)).unwrap();
        assert!(repo.load().is_empty());
    }

    #[test]
    fn test_stored_layout() {
        let mut repo = ItemRepository::new(MemoryStore::new());
        repo.append(&entry(0, "Steak", 1200)).unwrap();
        assert_eq!(
            repo.store().get(DEFAULT_SLOT_KEY).unwrap().as_deref(),
            Some(r#"[{"id":0,"name":"Steak","value":1200}]"#)
        );
    }
}
