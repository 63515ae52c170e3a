//! Port for durable mapping record persistence.

use crate::sync::domain::MappingRecord;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for mapping store operations.
pub type MappingStoreResult<T> = Result<T, MappingStoreError>;

/// Durable storage contract for the [`MappingRecord`].
///
/// The two operations deliberately carry different failure policies. A
/// failed `load` degrades to an empty record (equivalent to first run) so
/// the engine can start and let the repair paths recover. A failed
/// `persist` is surfaced to the caller: external calls have already been
/// issued by the time persist runs, and continuing silently would leave
/// durable state inconsistent with the external systems.
#[async_trait]
pub trait MappingStore: Send + Sync {
    /// Reads the persisted record, or returns an empty one when the stored
    /// document is missing or unreadable. Load failures are logged, never
    /// raised past this boundary.
    async fn load(&self) -> MappingRecord;

    /// Writes the full record durably, stamping `last_sync` and the persist
    /// counter as part of the same operation.
    ///
    /// # Errors
    ///
    /// Returns [`MappingStoreError`] when the record could not be written;
    /// the metadata stamp is not applied in that case.
    async fn persist(&self, record: &mut MappingRecord) -> MappingStoreResult<()>;
}

/// Errors returned by mapping store implementations.
#[derive(Debug, Clone, Error)]
pub enum MappingStoreError {
    /// The record could not be serialized.
    #[error("failed to serialize mapping record: {0}")]
    Serialize(Arc<serde_json::Error>),

    /// The record could not be written to durable storage.
    #[error("failed to write mapping record: {0}")]
    Write(Arc<std::io::Error>),
}

impl From<serde_json::Error> for MappingStoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialize(Arc::new(err))
    }
}

impl From<std::io::Error> for MappingStoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Write(Arc::new(err))
    }
}
