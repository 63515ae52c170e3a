//! In-memory lead store for reconciliation tests.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::sync::{
    domain::{Lead, LeadFieldChanges, LeadId},
    ports::{LeadSource, LeadSourceError, LeadSourceResult},
};

/// Thread-safe in-memory lead store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLeadSource {
    state: Arc<RwLock<BTreeMap<LeadId, Lead>>>,
}

impl InMemoryLeadSource {
    /// Creates an empty in-memory lead store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a lead into the store, replacing any record with the same id.
    ///
    /// # Errors
    ///
    /// Returns [`LeadSourceError::Backend`] when the store lock is poisoned.
    pub fn insert(&self, lead: Lead) -> LeadSourceResult<()> {
        let mut state = lock_write(&self.state)?;
        state.insert(lead.id.clone(), lead);
        Ok(())
    }

    /// Removes a lead directly, simulating an out-of-band deletion.
    ///
    /// # Errors
    ///
    /// Returns [`LeadSourceError::Backend`] when the store lock is poisoned.
    pub fn remove(&self, lead_id: &LeadId) -> LeadSourceResult<Option<Lead>> {
        let mut state = lock_write(&self.state)?;
        Ok(state.remove(lead_id))
    }

    /// Inspects a stored lead without going through the port.
    ///
    /// # Errors
    ///
    /// Returns [`LeadSourceError::Backend`] when the store lock is poisoned.
    pub fn get(&self, lead_id: &LeadId) -> LeadSourceResult<Option<Lead>> {
        let state = lock_read(&self.state)?;
        Ok(state.get(lead_id).cloned())
    }
}

fn lock_write(
    state: &RwLock<BTreeMap<LeadId, Lead>>,
) -> LeadSourceResult<std::sync::RwLockWriteGuard<'_, BTreeMap<LeadId, Lead>>> {
    state
        .write()
        .map_err(|err| LeadSourceError::backend(std::io::Error::other(err.to_string())))
}

fn lock_read(
    state: &RwLock<BTreeMap<LeadId, Lead>>,
) -> LeadSourceResult<std::sync::RwLockReadGuard<'_, BTreeMap<LeadId, Lead>>> {
    state
        .read()
        .map_err(|err| LeadSourceError::backend(std::io::Error::other(err.to_string())))
}

#[async_trait]
impl LeadSource for InMemoryLeadSource {
    async fn list_leads(&self) -> LeadSourceResult<Vec<Lead>> {
        let state = lock_read(&self.state)?;
        Ok(state.values().cloned().collect())
    }

    async fn get_lead(&self, lead_id: &LeadId) -> LeadSourceResult<Option<Lead>> {
        let state = lock_read(&self.state)?;
        Ok(state.get(lead_id).cloned())
    }

    async fn update_lead(
        &self,
        lead_id: &LeadId,
        changes: LeadFieldChanges,
    ) -> LeadSourceResult<()> {
        let mut state = lock_write(&self.state)?;
        let lead = state
            .get_mut(lead_id)
            .ok_or_else(|| LeadSourceError::NotFound(lead_id.clone()))?;
        changes.apply_to(lead);
        Ok(())
    }

    async fn delete_lead(&self, lead_id: &LeadId) -> LeadSourceResult<bool> {
        let mut state = lock_write(&self.state)?;
        Ok(state.remove(lead_id).is_some())
    }
}
