// Adapters layer: concrete implementations of the domain ports (key-value storage, presentation).

pub mod presenter;
pub mod storage;
