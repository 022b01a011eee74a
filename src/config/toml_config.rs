use crate::adapters::storage::{validate_key, FileStore, MemoryStore};
use crate::core::item_store::IdStrategy;
use crate::core::repository::{ItemRepository, DEFAULT_SLOT_KEY};
use crate::core::tracker::Tracker;
use crate::domain::ports::KeyValueStore;
use crate::utils::error::{Result, TrackerError};
use crate::utils::validation::{validate_data_dir, validate_one_of, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

const BACKENDS: [&str; 2] = ["file", "memory"];
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: [&str; 2] = ["compact", "json"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub storage: StorageConfig,
    pub tracker: TrackerSection,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: String,
    pub path: String,
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: "file".to_string(),
            path: "./data".to_string(),
            key: DEFAULT_SLOT_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerSection {
    pub id_strategy: IdStrategy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl TrackerConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| TrackerError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| TrackerError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${TRACKER_DATA})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| TrackerError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_one_of("storage.backend", &self.storage.backend, &BACKENDS)?;
        if self.storage.backend == "file" {
            validate_data_dir("storage.path", &self.storage.path)?;
        }
        validate_key(&self.storage.key)?;
        validate_one_of("logging.level", &self.logging.level, &LOG_LEVELS)?;
        validate_one_of("logging.format", &self.logging.format, &LOG_FORMATS)?;
        Ok(())
    }

    pub fn id_strategy(&self) -> IdStrategy {
        self.tracker.id_strategy
    }

    pub fn open_store(&self) -> Result<Box<dyn KeyValueStore>> {
        match self.storage.backend.as_str() {
            "file" => Ok(Box::new(FileStore::new(&self.storage.path))),
            "memory" => {
                tracing::warn!("Using in-memory storage, items will not survive this session");
                Ok(Box::new(MemoryStore::new()))
            }
            other => Err(TrackerError::InvalidConfigValueError {
                field: "storage.backend".to_string(),
                value: other.to_string(),
                reason: format!("Valid values: {}", BACKENDS.join(", ")),
            }),
        }
    }

    /// 依配置建立後端並載入 Tracker
    pub fn open_tracker(&self) -> Result<Tracker<Box<dyn KeyValueStore>>> {
        let store = self.open_store()?;
        let repository = ItemRepository::with_key(store, self.storage.key.clone());
        Ok(Tracker::open(repository, self.id_strategy()))
    }
}

impl Validate for TrackerConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[storage]
backend = "memory"
path = "./meals"
key = "meals"

[tracker]
id_strategy = "last_plus_one"

[logging]
level = "debug"
format = "json"
"#;

        let config = TrackerConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.storage.backend, "memory");
        assert_eq!(config.storage.key, "meals");
        assert_eq!(config.id_strategy(), IdStrategy::LastPlusOne);
        assert_eq!(config.logging.format, "json");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TrackerConfig::from_toml_str("").unwrap();

        assert_eq!(config.storage.backend, "file");
        assert_eq!(config.storage.path, "./data");
        assert_eq!(config.storage.key, "items");
        assert_eq!(config.id_strategy(), IdStrategy::Monotonic);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CALORIE_TRACKER_TEST_DIR", "/tmp/calories");

        let toml_content = r#"
[storage]
path = "${CALORIE_TRACKER_TEST_DIR}"
key = "${CALORIE_TRACKER_UNSET_VAR}"
"#;

        let config = TrackerConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.storage.path, "/tmp/calories");
        assert_eq!(config.storage.key, "${CALORIE_TRACKER_UNSET_VAR}");

        std::env::remove_var("CALORIE_TRACKER_TEST_DIR");
    }

    #[test]
    fn test_config_validation() {
        let invalid = [
            "[storage]\nbackend = \"redis\"",
            "[storage]\nkey = \"a/b\"",
            "[storage]\npath = \"\"",
            "[logging]\nlevel = \"loud\"",
        ];

        for content in invalid {
            let config = TrackerConfig::from_toml_str(content).unwrap();
            assert!(config.validate().is_err(), "{content}");
        }

        assert!(TrackerConfig::from_toml_str("[tracker]\nid_strategy = \"random\"").is_err());
    }

    #[test]
    fn test_data_dir_checked_only_for_file_backend() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().display().to_string();

        let mut config = TrackerConfig::from_toml_str("").unwrap();
        config.storage.path = path;
        assert!(config.validate().is_err());

        config.storage.backend = "memory".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[storage]\nbackend = \"memory\"\n")
            .unwrap();

        let config = TrackerConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.storage.backend, "memory");

        let tracker = config.open_tracker().unwrap();
        assert!(tracker.entries().is_empty());
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = TrackerConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, TrackerError::ConfigError { .. }));
    }
}
