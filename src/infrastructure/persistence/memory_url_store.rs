//! In-process implementation of the URL store.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::domain::entities::UrlRecord;
use crate::domain::errors::StoreError;
use crate::domain::repositories::UrlStore;

/// URL store backed by a concurrent hash map.
///
/// Selected with a `memory://` store URI and used throughout the tests.
/// `save` inserts through the map's entry API, which holds the shard lock for
/// the id, so concurrent saves of one id yield exactly one success.
/// Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryUrlStore {
    records: DashMap<String, UrlRecord>,
}

impl MemoryUrlStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl UrlStore for MemoryUrlStore {
    async fn save(&self, record: &UrlRecord) -> Result<(), StoreError> {
        match self.records.entry(record.id.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate {
                id: record.id.clone(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(())
            }
        }
    }

    async fn get_by_id(&self, id: &str) -> Result<UrlRecord, StoreError> {
        self.records
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })
    }

    async fn ensure_indexes(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
