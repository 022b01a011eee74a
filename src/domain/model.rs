use serde::{Deserialize, Serialize};
use std::fmt;

/// 項目識別碼，由 ItemStore 指派，建立後不再變更
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for EntryId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(EntryId)
    }
}

/// 一筆追蹤記錄，持久化格式為 `{"id": .., "name": .., "value": ..}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub name: String,
    pub value: i64,
}

impl Entry {
    pub fn new(id: EntryId, name: impl Into<String>, value: i64) -> Self {
        Self {
            id,
            name: name.into(),
            value,
        }
    }
}

/// 交給 Presenter 的唯讀畫面狀態
#[derive(Debug, Clone, Copy)]
pub struct View<'a> {
    pub entries: &'a [Entry],
    pub total_calories: i64,
    /// 編輯中的項目；None 表示處於新增狀態
    pub current: Option<&'a Entry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_wire_format() {
        let entry = Entry::new(EntryId(3), "Eggs", 300);
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"id":3,"name":"Eggs","value":300}"#);
    }

    #[test]
    fn test_entry_id_from_str() {
        assert_eq!(" 12 ".parse::<EntryId>().unwrap(), EntryId(12));
        assert!("-1".parse::<EntryId>().is_err());
    }
}
