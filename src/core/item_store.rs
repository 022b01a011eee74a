//! In-memory item collection: id assignment, current selection and totals.

use crate::domain::model::{Entry, EntryId};
use crate::utils::error::{Result, TrackerError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 新項目 id 的指派方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    /// 獨立遞增計數器，同一個 session 內不會重複發出 id
    #[default]
    Monotonic,
    /// 舊版行為：最後一筆的 id + 1，空集合時為 0。
    /// 刪除尾端項目後再新增會重新發出已用過的 id。
    LastPlusOne,
}

impl std::str::FromStr for IdStrategy {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "monotonic" => Ok(IdStrategy::Monotonic),
            "last_plus_one" => Ok(IdStrategy::LastPlusOne),
            other => Err(TrackerError::InvalidConfigValueError {
                field: "tracker.id_strategy".to_string(),
                value: other.to_string(),
                reason: "Valid strategies: monotonic, last_plus_one".to_string(),
            }),
        }
    }
}

/// 將表單輸入的熱量字串轉成整數；無法解析時拒絕，不讓非數字進入總和
pub fn parse_value(raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| TrackerError::InvalidValue {
            raw: raw.to_string(),
        })
}

/// 依 id 去除重複項目，保留第一筆；回傳被丟棄的數量
pub fn dedup_by_id(entries: Vec<Entry>) -> (Vec<Entry>, usize) {
    let mut seen = HashSet::new();
    let before = entries.len();
    let unique: Vec<Entry> = entries.into_iter().filter(|e| seen.insert(e.id)).collect();
    let dropped = before - unique.len();
    (unique, dropped)
}

fn next_after(id: EntryId) -> Option<u64> {
    id.0.checked_add(1)
}

#[derive(Debug, Clone)]
pub struct ItemStore {
    entries: Vec<Entry>,
    current: Option<EntryId>,
    /// None 表示 id 已用盡
    next_id: Option<u64>,
    id_strategy: IdStrategy,
}

impl Default for ItemStore {
    fn default() -> Self {
        Self::new(IdStrategy::default())
    }
}

impl ItemStore {
    pub fn new(id_strategy: IdStrategy) -> Self {
        Self {
            entries: Vec::new(),
            current: None,
            next_id: Some(0),
            id_strategy,
        }
    }

    /// 以已載入的項目建立，計數器從現有最大 id + 1 開始。
    /// 重複的 id 只保留第一筆。
    pub fn from_entries(entries: Vec<Entry>, id_strategy: IdStrategy) -> Self {
        let (entries, dropped) = dedup_by_id(entries);
        if dropped > 0 {
            tracing::warn!("⚠️ Dropped {} items with duplicate ids", dropped);
        }

        let next_id = match entries.iter().map(|e| e.id).max() {
            None => Some(0),
            Some(max) => {
                let next = next_after(max);
                if next.is_none() {
                    tracing::warn!("⚠️ Item id {} is the largest possible, no new ids left", max);
                }
                next
            }
        };

        Self {
            entries,
            current: None,
            next_id,
            id_strategy,
        }
    }

    pub fn list(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn add(&mut self, name: &str, raw_value: &str) -> Result<Entry> {
        let value = parse_value(raw_value)?;
        self.check_total(None, value)?;
        let id = self.allocate_id()?;

        let entry = Entry::new(id, name, value);
        self.entries.push(entry.clone());
        self.next_id = match (self.next_id, next_after(id)) {
            (Some(current), Some(after)) => Some(current.max(after)),
            _ => None,
        };

        tracing::debug!("Added item {} ({} calories)", id, value);
        Ok(entry)
    }

    /// 加入 `value`（可排除一筆將被覆寫的項目）後總和仍須落在 i64 範圍內
    fn check_total(&self, replacing: Option<EntryId>, value: i64) -> Result<()> {
        self.entries
            .iter()
            .filter(|e| Some(e.id) != replacing)
            .try_fold(value, |acc, e| acc.checked_add(e.value))
            .map(|_| ())
            .ok_or(TrackerError::TotalOutOfRange { value })
    }

    fn allocate_id(&self) -> Result<EntryId> {
        match self.id_strategy {
            IdStrategy::Monotonic => self
                .next_id
                .map(EntryId)
                .ok_or(TrackerError::IdSpaceExhausted),
            IdStrategy::LastPlusOne => {
                let candidate = match self.entries.last() {
                    None => Some(EntryId(0)),
                    Some(last) => next_after(last.id).map(EntryId),
                };

                match candidate {
                    Some(id) if self.get_by_id(id).is_none() => Ok(id),
                    // 載入的資料若非遞增排列，last + 1 可能與現存 id 衝突
                    _ => {
                        let fallback = self
                            .entries
                            .iter()
                            .map(|e| e.id)
                            .max()
                            .and_then(next_after)
                            .ok_or(TrackerError::IdSpaceExhausted)?;
                        tracing::warn!(
                            "Id after the last item is unavailable, assigning {} instead",
                            fallback
                        );
                        Ok(EntryId(fallback))
                    }
                }
            }
        }
    }

    pub fn get_by_id(&self, id: EntryId) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn position(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    pub fn set_current(&mut self, id: EntryId) -> Result<&Entry> {
        let index = self.position(id).ok_or(TrackerError::NotFound { id })?;
        self.current = Some(id);
        Ok(&self.entries[index])
    }

    /// 每次都對目前的集合重新查找，不持有舊副本
    pub fn current(&self) -> Option<&Entry> {
        self.current.and_then(|id| self.get_by_id(id))
    }

    pub fn clear_current(&mut self) {
        self.current = None;
    }

    pub fn update(&mut self, name: &str, raw_value: &str) -> Result<Entry> {
        let id = self
            .current()
            .map(|e| e.id)
            .ok_or(TrackerError::NoCurrentSelection)?;
        let value = parse_value(raw_value)?;
        self.check_total(Some(id), value)?;

        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(TrackerError::NoCurrentSelection)?;
        entry.name = name.to_string();
        entry.value = value;

        tracing::debug!("Updated item {} ({} calories)", id, value);
        Ok(entry.clone())
    }

    pub fn delete(&mut self, id: EntryId) -> Result<Entry> {
        let index = self.position(id).ok_or(TrackerError::NotFound { id })?;
        let removed = self.entries.remove(index);

        if self.current == Some(id) {
            self.current = None;
        }

        tracing::debug!("Deleted item {}", id);
        Ok(removed)
    }

    /// 清空集合與選取；id 計數器不歸零
    pub fn clear_all(&mut self) {
        self.entries.clear();
        self.current = None;
    }

    /// 載入的資料可能已超出範圍，因此以飽和加法累計
    pub fn total_calories(&self) -> i64 {
        self.entries
            .iter()
            .fold(0i64, |acc, e| acc.saturating_add(e.value))
    }

    // 以下供 Tracker 在持久化失敗時回復記憶體狀態

    pub(crate) fn restore_at(&mut self, index: usize, entry: Entry) {
        let index = index.min(self.entries.len());
        self.entries.insert(index, entry);
    }

    pub(crate) fn overwrite(&mut self, entry: Entry) {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.id == entry.id) {
            *existing = entry;
        }
    }

    pub(crate) fn restore_all(&mut self, entries: Vec<Entry>, current: Option<EntryId>) {
        self.entries = entries;
        self.current = current;
    }

    pub(crate) fn current_id(&self) -> Option<EntryId> {
        self.current
    }
}
