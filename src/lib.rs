pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::presenter::{write_csv, SilentPresenter, TextPresenter};
pub use adapters::storage::{FileStore, MemoryStore};
#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};
pub use config::TrackerConfig;
pub use crate::core::{
    item_store::{IdStrategy, ItemStore},
    repository::ItemRepository,
    tracker::Tracker,
};
pub use domain::model::{Entry, EntryId, View};
pub use domain::ports::{KeyValueStore, Presenter};
pub use utils::error::{Result, TrackerError};
