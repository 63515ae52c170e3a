//! In-memory task store for reconciliation tests.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::sync::{
    domain::{LeadStatus, NewTaskCard, TaskCard, TaskId},
    ports::{TaskSource, TaskSourceError, TaskSourceResult},
};

/// Thread-safe in-memory task store.
///
/// Mirrors the listing semantics of the real work tracker: archived cards
/// drop out of `list_tasks` but remain resolvable through `get_task`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskSource {
    state: Arc<RwLock<BTreeMap<TaskId, TaskCard>>>,
}

impl InMemoryTaskSource {
    /// Creates an empty in-memory task store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a card into the store, replacing any record with the same id.
    ///
    /// # Errors
    ///
    /// Returns [`TaskSourceError::Backend`] when the store lock is poisoned.
    pub fn insert(&self, card: TaskCard) -> TaskSourceResult<()> {
        let mut state = lock_write(&self.state)?;
        state.insert(card.id.clone(), card);
        Ok(())
    }

    /// Removes a card directly, simulating an out-of-band deletion.
    ///
    /// # Errors
    ///
    /// Returns [`TaskSourceError::Backend`] when the store lock is poisoned.
    pub fn remove(&self, task_id: &TaskId) -> TaskSourceResult<Option<TaskCard>> {
        let mut state = lock_write(&self.state)?;
        Ok(state.remove(task_id))
    }

    /// Inspects a stored card without going through the port.
    ///
    /// # Errors
    ///
    /// Returns [`TaskSourceError::Backend`] when the store lock is poisoned.
    pub fn get(&self, task_id: &TaskId) -> TaskSourceResult<Option<TaskCard>> {
        let state = lock_read(&self.state)?;
        Ok(state.get(task_id).cloned())
    }

    /// Returns all open cards without going through the port.
    ///
    /// # Errors
    ///
    /// Returns [`TaskSourceError::Backend`] when the store lock is poisoned.
    pub fn open_cards(&self) -> TaskSourceResult<Vec<TaskCard>> {
        let state = lock_read(&self.state)?;
        Ok(state.values().filter(|c| !c.archived).cloned().collect())
    }
}

fn lock_write(
    state: &RwLock<BTreeMap<TaskId, TaskCard>>,
) -> TaskSourceResult<std::sync::RwLockWriteGuard<'_, BTreeMap<TaskId, TaskCard>>> {
    state
        .write()
        .map_err(|err| TaskSourceError::backend(std::io::Error::other(err.to_string())))
}

fn lock_read(
    state: &RwLock<BTreeMap<TaskId, TaskCard>>,
) -> TaskSourceResult<std::sync::RwLockReadGuard<'_, BTreeMap<TaskId, TaskCard>>> {
    state
        .read()
        .map_err(|err| TaskSourceError::backend(std::io::Error::other(err.to_string())))
}

#[async_trait]
impl TaskSource for InMemoryTaskSource {
    async fn list_tasks(&self) -> TaskSourceResult<Vec<TaskCard>> {
        let state = lock_read(&self.state)?;
        Ok(state.values().filter(|card| !card.archived).cloned().collect())
    }

    async fn get_task(&self, task_id: &TaskId) -> TaskSourceResult<Option<TaskCard>> {
        let state = lock_read(&self.state)?;
        Ok(state.get(task_id).cloned())
    }

    async fn create_task(&self, card: NewTaskCard) -> TaskSourceResult<TaskId> {
        let task_id =
            TaskId::new(Uuid::new_v4().to_string()).map_err(TaskSourceError::backend)?;
        let mut state = lock_write(&self.state)?;
        state.insert(
            task_id.clone(),
            TaskCard {
                id: task_id.clone(),
                title: card.title().to_owned(),
                status: LeadStatus::New,
                description: card.description().to_owned(),
                archived: false,
            },
        );
        Ok(task_id)
    }

    async fn update_task_status(
        &self,
        task_id: &TaskId,
        status: LeadStatus,
    ) -> TaskSourceResult<()> {
        let mut state = lock_write(&self.state)?;
        let card = state
            .get_mut(task_id)
            .ok_or_else(|| TaskSourceError::NotFound(task_id.clone()))?;
        card.status = status;
        Ok(())
    }

    async fn archive_task(&self, task_id: &TaskId) -> TaskSourceResult<bool> {
        let mut state = lock_write(&self.state)?;
        match state.get_mut(task_id) {
            Some(card) => {
                card.archived = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
