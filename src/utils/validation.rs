use crate::utils::error::{Result, TrackerError};
use std::path::Path;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: &str, reason: impl Into<String>) -> TrackerError {
    TrackerError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// 檔案後端的資料目錄：可以尚未建立，但若已存在就必須是目錄
pub fn validate_data_dir(field_name: &str, dir: &str) -> Result<()> {
    if dir.trim().is_empty() {
        return Err(invalid(field_name, dir, "Data directory cannot be blank"));
    }
    if dir.contains('\0') {
        return Err(invalid(field_name, dir, "Data directory contains a NUL byte"));
    }
    // 環境變數未設定時 `${VAR}` 會原樣保留
    if dir.contains("${") {
        return Err(invalid(field_name, dir, "Unresolved environment variable"));
    }

    let path = Path::new(dir);
    if path.exists() && !path.is_dir() {
        return Err(invalid(field_name, dir, "Exists but is not a directory"));
    }

    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(invalid(
            field_name,
            value,
            format!("Valid values: {}", allowed.join(", ")),
        ));
    }
    Ok(())
}
