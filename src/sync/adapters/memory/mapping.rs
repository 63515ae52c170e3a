//! In-memory mapping store for reconciliation tests.

use async_trait::async_trait;
use mockable::Clock;
use std::sync::{Arc, RwLock};
use tracing::error;

use crate::sync::{
    domain::MappingRecord,
    ports::{MappingStore, MappingStoreResult},
};

/// Volatile mapping store holding the record behind a lock.
///
/// `load` hands out a clone and `persist` stamps metadata and writes a
/// clone back, matching the load-once/persist-per-batch shape of the
/// durable store without touching the filesystem.
#[derive(Debug, Clone)]
pub struct InMemoryMappingStore<C> {
    state: Arc<RwLock<MappingRecord>>,
    clock: Arc<C>,
}

impl<C> InMemoryMappingStore<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a store holding an empty record.
    #[must_use]
    pub fn new(clock: Arc<C>) -> Self {
        Self::with_record(MappingRecord::new(), clock)
    }

    /// Creates a store pre-seeded with an existing record.
    #[must_use]
    pub fn with_record(record: MappingRecord, clock: Arc<C>) -> Self {
        Self {
            state: Arc::new(RwLock::new(record)),
            clock,
        }
    }

    /// Returns a copy of the record as last persisted (or seeded).
    #[must_use]
    pub fn snapshot(&self) -> MappingRecord {
        self.state.read().map_or_else(
            |err| {
                error!(error = %err, "mapping store lock poisoned");
                MappingRecord::new()
            },
            |record| record.clone(),
        )
    }
}

#[async_trait]
impl<C> MappingStore for InMemoryMappingStore<C>
where
    C: Clock + Send + Sync,
{
    async fn load(&self) -> MappingRecord {
        self.snapshot()
    }

    async fn persist(&self, record: &mut MappingRecord) -> MappingStoreResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| std::io::Error::other(err.to_string()))?;
        record.mark_persisted(self.clock.utc());
        *state = record.clone();
        Ok(())
    }
}
