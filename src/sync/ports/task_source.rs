//! Port for the external task store.

use crate::sync::domain::{LeadStatus, NewTaskCard, TaskCard, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task source operations.
pub type TaskSourceResult<T> = Result<T, TaskSourceError>;

/// Consumed capability set of the external task store.
#[async_trait]
pub trait TaskSource: Send + Sync {
    /// Returns every open (non-archived) task card in the store.
    async fn list_tasks(&self) -> TaskSourceResult<Vec<TaskCard>>;

    /// Fetches a single card by id. Archived cards still resolve.
    ///
    /// Returns `None` when the card does not exist.
    async fn get_task(&self, task_id: &TaskId) -> TaskSourceResult<Option<TaskCard>>;

    /// Creates a new card and returns its store-assigned id.
    async fn create_task(&self, card: NewTaskCard) -> TaskSourceResult<TaskId>;

    /// Pushes a status onto an existing card.
    ///
    /// # Errors
    ///
    /// Returns [`TaskSourceError::NotFound`] when the card does not exist.
    async fn update_task_status(
        &self,
        task_id: &TaskId,
        status: LeadStatus,
    ) -> TaskSourceResult<()>;

    /// Archives a card.
    ///
    /// Returns `false` when the store refused the archival.
    async fn archive_task(&self, task_id: &TaskId) -> TaskSourceResult<bool>;
}

/// Errors returned by task source implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskSourceError {
    /// The task card was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Backend failure (network, API, storage).
    #[error("task source error: {0}")]
    Backend(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskSourceError {
    /// Wraps a backend error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Arc::new(err))
    }
}
