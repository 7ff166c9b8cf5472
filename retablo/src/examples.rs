//! The history of generated descriptions, used as prompt examples
use retablo_core::{Record, RecordStore, errors::StoreError};

use crate::describer::combined_examples;

/// Holds every saved record in insertion order and appends new ones through a [`RecordStore`]
///
/// Records are read once, when the store is loaded. Every append rewrites the full set; the
/// in-memory set only changes once the rewrite succeeded.
pub struct ExampleStore {
    backend: Box<dyn RecordStore>,
    records: Vec<Record>,
    has_descriptions: bool,
}

impl std::fmt::Debug for ExampleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExampleStore")
            .field("records", &self.records.len())
            .field("has_descriptions", &self.has_descriptions)
            .finish_non_exhaustive()
    }
}

impl ExampleStore {
    /// Loads all previously saved records from `backend`
    ///
    /// # Errors
    ///
    /// Errors if the backend cannot be read or the persisted set is malformed
    #[tracing::instrument(skip_all, err)]
    pub async fn load(backend: impl RecordStore + 'static) -> Result<Self, StoreError> {
        let loaded = backend.load().await?;

        Ok(Self {
            backend: Box::new(backend),
            records: loaded.records,
            has_descriptions: loaded.has_descriptions,
        })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// False if the loaded set had no column for generated descriptions
    pub fn has_descriptions(&self) -> bool {
        self.has_descriptions
    }

    /// The example blocks for the next prompt
    pub fn combined_examples(&self) -> String {
        combined_examples(&self.records, self.has_descriptions)
    }

    /// Appends a record and durably rewrites the full set
    ///
    /// # Errors
    ///
    /// Errors if the backend fails to save; the record is not kept in that case
    #[tracing::instrument(skip_all, err)]
    pub async fn append(&mut self, record: Record) -> Result<(), StoreError> {
        let mut records = Vec::with_capacity(self.records.len() + 1);
        records.extend_from_slice(&self.records);
        records.push(record);

        self.backend.save(&records).await?;

        self.records = records;
        self.has_descriptions = true;

        tracing::debug!(records = self.records.len(), "Appended record");

        Ok(())
    }
}
