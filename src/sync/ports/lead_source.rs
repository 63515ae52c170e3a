//! Port for the external lead store.

use crate::sync::domain::{Lead, LeadFieldChanges, LeadId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for lead source operations.
pub type LeadSourceResult<T> = Result<T, LeadSourceError>;

/// Consumed capability set of the external lead store.
#[async_trait]
pub trait LeadSource: Send + Sync {
    /// Returns every lead currently in the store.
    async fn list_leads(&self) -> LeadSourceResult<Vec<Lead>>;

    /// Fetches a single lead by id.
    ///
    /// Returns `None` when the lead does not exist.
    async fn get_lead(&self, lead_id: &LeadId) -> LeadSourceResult<Option<Lead>>;

    /// Applies a field-level patch to an existing lead.
    ///
    /// # Errors
    ///
    /// Returns [`LeadSourceError::NotFound`] when the lead does not exist.
    async fn update_lead(
        &self,
        lead_id: &LeadId,
        changes: LeadFieldChanges,
    ) -> LeadSourceResult<()>;

    /// Deletes a lead.
    ///
    /// Returns `false` when the store refused the deletion.
    async fn delete_lead(&self, lead_id: &LeadId) -> LeadSourceResult<bool>;
}

/// Errors returned by lead source implementations.
#[derive(Debug, Clone, Error)]
pub enum LeadSourceError {
    /// The lead was not found.
    #[error("lead not found: {0}")]
    NotFound(LeadId),

    /// Backend failure (network, API, storage).
    #[error("lead source error: {0}")]
    Backend(Arc<dyn std::error::Error + Send + Sync>),
}

impl LeadSourceError {
    /// Wraps a backend error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Arc::new(err))
    }
}
