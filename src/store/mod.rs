// Store module entry
// Persisted server document and its on-disk manager

mod document;
mod persist;

pub use document::{ConfigDocument, ServerRecord};
pub use persist::{ConfigStore, StoreError};
