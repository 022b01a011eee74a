//! Orchestrator: keeps the in-memory store and the persisted slot in lockstep.

use crate::core::item_store::{IdStrategy, ItemStore};
use crate::core::repository::ItemRepository;
use crate::domain::model::{Entry, EntryId, View};
use crate::domain::ports::{KeyValueStore, Presenter};
use crate::utils::error::{Result, TrackerError};

/// 整個應用程式的狀態；建立時從持久層載入一次，之後不會隱式重新初始化。
///
/// 每個使用者動作 = ItemStore 操作 + 對應的 ItemRepository 操作 + render。
/// 持久化失敗時回復記憶體中的變更並回傳錯誤，兩份資料不會分歧。
pub struct Tracker<S: KeyValueStore> {
    items: ItemStore,
    repository: ItemRepository<S>,
}

impl<S: KeyValueStore> Tracker<S> {
    pub fn open(repository: ItemRepository<S>, id_strategy: IdStrategy) -> Self {
        let entries = repository.load();
        tracing::info!(
            "Opened tracker with {} items from slot '{}'",
            entries.len(),
            repository.key()
        );

        Self {
            items: ItemStore::from_entries(entries, id_strategy),
            repository,
        }
    }

    pub fn entries(&self) -> &[Entry] {
        self.items.list()
    }

    pub fn get_by_id(&self, id: EntryId) -> Option<&Entry> {
        self.items.get_by_id(id)
    }

    pub fn current(&self) -> Option<&Entry> {
        self.items.current()
    }

    pub fn total_calories(&self) -> i64 {
        self.items.total_calories()
    }

    pub fn repository(&self) -> &ItemRepository<S> {
        &self.repository
    }

    pub fn view(&self) -> View<'_> {
        View {
            entries: self.items.list(),
            total_calories: self.items.total_calories(),
            current: self.items.current(),
        }
    }

    /// 初次繪製或重新繪製
    pub fn refresh(&self, presenter: &mut impl Presenter) {
        presenter.render(self.view());
    }

    pub fn add(&mut self, name: &str, raw_value: &str, presenter: &mut impl Presenter) -> Result<Entry> {
        let entry = self.items.add(name, raw_value)?;

        if let Err(e) = self.repository.append(&entry) {
            tracing::error!("❌ Failed to persist new item {}: {}", entry.id, e);
            if let Err(rollback) = self.items.delete(entry.id) {
                tracing::warn!("⚠️ Could not roll back item {}: {}", entry.id, rollback);
            }
            return Err(e);
        }

        tracing::info!("Added '{}' ({} calories)", entry.name, entry.value);
        self.refresh(presenter);
        Ok(entry)
    }

    /// 進入編輯狀態
    pub fn select(&mut self, id: EntryId, presenter: &mut impl Presenter) -> Result<Entry> {
        let entry = self.items.set_current(id)?.clone();
        tracing::debug!("Editing item {}", id);
        self.refresh(presenter);
        Ok(entry)
    }

    /// 「返回」：結束編輯狀態，不做任何變更
    pub fn cancel_edit(&mut self, presenter: &mut impl Presenter) {
        self.items.clear_current();
        self.refresh(presenter);
    }

    /// 更新目前選取的項目，成功後結束編輯狀態
    pub fn update(&mut self, name: &str, raw_value: &str, presenter: &mut impl Presenter) -> Result<Entry> {
        let previous = self.items.current().cloned();
        let entry = self.items.update(name, raw_value)?;

        if let Err(e) = self.repository.replace(&entry) {
            tracing::error!("❌ Failed to persist update of item {}: {}", entry.id, e);
            if let Some(previous) = previous {
                self.items.overwrite(previous);
            }
            return Err(e);
        }

        tracing::info!("Updated item {} to '{}' ({} calories)", entry.id, entry.name, entry.value);
        self.items.clear_current();
        self.refresh(presenter);
        Ok(entry)
    }

    pub fn delete_current(&mut self, presenter: &mut impl Presenter) -> Result<Entry> {
        let id = self
            .items
            .current()
            .map(|e| e.id)
            .ok_or(TrackerError::NoCurrentSelection)?;
        self.delete(id, presenter)
    }

    pub fn delete(&mut self, id: EntryId, presenter: &mut impl Presenter) -> Result<Entry> {
        let index = self.items.position(id);
        let was_current = self.items.current_id() == Some(id);
        let removed = self.items.delete(id)?;

        if let Err(e) = self.repository.remove(id) {
            tracing::error!("❌ Failed to persist deletion of item {}: {}", id, e);
            self.items.restore_at(index.unwrap_or(usize::MAX), removed);
            if was_current {
                if let Err(rollback) = self.items.set_current(id) {
                    tracing::warn!("⚠️ Could not restore selection of item {}: {}", id, rollback);
                }
            }
            return Err(e);
        }

        tracing::info!("Deleted '{}'", removed.name);
        self.items.clear_current();
        self.refresh(presenter);
        Ok(removed)
    }

    pub fn clear_all(&mut self, presenter: &mut impl Presenter) -> Result<()> {
        let snapshot = self.items.list().to_vec();
        let current = self.items.current_id();
        self.items.clear_all();

        if let Err(e) = self.repository.clear() {
            tracing::error!("❌ Failed to clear stored items: {}", e);
            self.items.restore_all(snapshot, current);
            return Err(e);
        }

        tracing::info!("Cleared {} items", snapshot.len());
        self.refresh(presenter);
        Ok(())
    }
}
