//! Search settings: the record, partial updates, and persistence.
//!
//! - `model`: [`SearchSettings`], [`SearchSettingsUpdate`] and clamping rules
//! - `store`: [`SettingsStore`] trait with JSON-file and in-memory backends

pub mod model;
pub mod store;

pub use model::{SearchSettings, SearchSettingsUpdate, SettingsChange};
pub use store::{JsonSettingsStore, MemorySettingsStore, SettingsStore};
