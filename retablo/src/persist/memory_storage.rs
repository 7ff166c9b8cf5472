use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use derive_builder::Builder;
use tokio::sync::RwLock;

use retablo_core::{LoadedRecords, Record, RecordStore, errors::StoreError};

#[derive(Debug, Default, Builder, Clone)]
#[builder(pattern = "owned")]
/// A simple in-memory record store.
///
/// Great for experimentation and testing. Clones share the same records, so a clone can be used
/// to inspect what another handle saved.
pub struct MemoryStore {
    #[builder(default)]
    data: Arc<RwLock<LoadedRecords>>,
    #[builder(default)]
    save_count: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn builder() -> MemoryStoreBuilder {
        MemoryStoreBuilder::default()
    }

    /// Creates a store that already holds `records`
    pub fn with_records(records: Vec<Record>) -> Self {
        Self::from(LoadedRecords::from(records))
    }

    /// Retrieve all records in the store
    pub async fn get_all(&self) -> Vec<Record> {
        self.data.read().await.records.clone()
    }

    /// How many times the full set was saved
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }
}

impl From<LoadedRecords> for MemoryStore {
    fn from(loaded: LoadedRecords) -> Self {
        Self {
            data: Arc::new(RwLock::new(loaded)),
            save_count: Arc::default(),
        }
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn load(&self) -> Result<LoadedRecords, StoreError> {
        Ok(self.data.read().await.clone())
    }

    async fn save(&self, records: &[Record]) -> Result<(), StoreError> {
        let mut data = self.data.write().await;
        data.records = records.to_vec();
        data.has_descriptions = true;

        self.save_count.fetch_add(1, Ordering::SeqCst);

        Ok(())
    }
}
