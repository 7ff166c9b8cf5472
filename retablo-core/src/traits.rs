//! Traits implemented by integrations
use async_trait::async_trait;

use crate::errors::{RequestError, StoreError};
use crate::prompt::Prompt;
use crate::record::{LoadedRecords, Record};

#[cfg(feature = "test-utils")]
use mockall::automock;

#[cfg_attr(feature = "test-utils", automock)]
#[async_trait]
/// Sends a single prompt to a language model and returns its text
pub trait SimplePrompt: Send + Sync {
    async fn prompt(&self, prompt: Prompt) -> Result<String, RequestError>;
}

#[cfg_attr(feature = "test-utils", automock)]
#[async_trait]
/// Loads and saves the full, ordered set of records
///
/// Saving always rewrites the complete set; there is no incremental append.
pub trait RecordStore: Send + Sync {
    /// Returns every saved record, or an empty set if nothing was saved yet
    async fn load(&self) -> Result<LoadedRecords, StoreError>;

    async fn save(&self, records: &[Record]) -> Result<(), StoreError>;
}
