use crate::domain::model::EntryId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Invalid calorie value: {raw:?} is not an integer")]
    InvalidValue { raw: String },

    #[error("Adding {value} would push the calorie total past {max}", max = i64::MAX)]
    TotalOutOfRange { value: i64 },

    #[error("No item ids left to assign")]
    IdSpaceExhausted,

    #[error("No item is currently selected for editing")]
    NoCurrentSelection,

    #[error("Item {id} not found")]
    NotFound { id: EntryId },

    #[error("Stored items could not be parsed: {0}")]
    DeserializationFailure(#[source] serde_json::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    StorageError(#[from] std::io::Error),

    #[error("CSV export error: {0}")]
    ExportError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': {value:?} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Capacity,
    Selection,
    NotFound,
    Storage,
    Configuration,
}

impl TrackerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            TrackerError::InvalidValue { .. } | TrackerError::TotalOutOfRange { .. } => {
                ErrorCategory::Validation
            }
            TrackerError::IdSpaceExhausted => ErrorCategory::Capacity,
            TrackerError::NoCurrentSelection => ErrorCategory::Selection,
            TrackerError::NotFound { .. } => ErrorCategory::NotFound,
            TrackerError::DeserializationFailure(_)
            | TrackerError::Serialization(_)
            | TrackerError::StorageError(_)
            | TrackerError::ExportError(_) => ErrorCategory::Storage,
            TrackerError::ConfigError { .. } | TrackerError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
        }
    }

    /// 使用者可以修正輸入後重試的錯誤
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Validation
                | ErrorCategory::Capacity
                | ErrorCategory::Selection
                | ErrorCategory::NotFound
        )
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            TrackerError::InvalidValue { raw } => {
                format!("'{}' is not a whole number of calories", raw)
            }
            TrackerError::TotalOutOfRange { value } => {
                format!("{} calories would overflow the running total", value)
            }
            TrackerError::NoCurrentSelection => "Pick an item to edit first".to_string(),
            TrackerError::NotFound { id } => format!("There is no item with id {}", id),
            TrackerError::StorageError(_) => "Could not access the item storage".to_string(),
            TrackerError::ExportError(_) => "Could not write the export".to_string(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Validation => "Enter calories as a reasonable integer, e.g. 350",
            ErrorCategory::Capacity => "Run 'clear' to start over with fresh ids",
            ErrorCategory::Selection => "Use 'edit <id>' before 'update'",
            ErrorCategory::NotFound => "Run 'list' to see the available ids",
            ErrorCategory::Storage => "Check that the data directory exists and is writable",
            ErrorCategory::Configuration => "Check the configuration file and CLI flags",
        }
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
