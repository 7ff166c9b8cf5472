//! Record stores that live alongside the application
//!
//! The CSV store used for the history file lives in `retablo_integrations::csv`.
mod memory_storage;

pub use memory_storage::MemoryStore;
