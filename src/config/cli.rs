use crate::config::toml_config::TrackerConfig;
use crate::utils::error::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "calorie-tracker.toml";

#[derive(Debug, Clone, Parser)]
#[command(name = "calorie-tracker")]
#[command(about = "Track meals and their calories, persisted between sessions")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override storage.path from the config
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show all items and the total
    List,
    /// Add an item
    Add {
        name: String,
        #[arg(allow_hyphen_values = true)]
        calories: String,
    },
    /// Replace the name and calories of an item
    Update {
        id: u64,
        name: String,
        #[arg(allow_hyphen_values = true)]
        calories: String,
    },
    /// Delete one item
    Delete { id: u64 },
    /// Delete every item
    Clear,
    /// Print only the total calories
    Total,
    /// Export items as CSV
    Export {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Interactive session with edit state
    Shell,
}

impl CliConfig {
    /// 載入配置：--config 指定的檔案，否則工作目錄下的預設檔，都沒有則用預設值
    pub fn load_config(&self) -> Result<TrackerConfig> {
        let mut config = match &self.config {
            Some(path) => TrackerConfig::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                TrackerConfig::from_file(DEFAULT_CONFIG_FILE)?
            }
            None => TrackerConfig::default(),
        };

        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut TrackerConfig) {
        if let Some(data_dir) = &self.data_dir {
            config.storage.path = data_dir.clone();
        }
        if self.verbose {
            config.logging.level = "debug".to_string();
        }
    }
}
