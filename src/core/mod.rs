pub mod item_store;
pub mod repository;
pub mod tracker;

pub use crate::domain::model::{Entry, EntryId, View};
pub use crate::domain::ports::{KeyValueStore, Presenter};
pub use crate::utils::error::Result;
