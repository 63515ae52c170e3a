//! Persisted bidirectional identity mapping between leads and task cards.

use super::{LeadId, SyncDomainError, TaskId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The persisted association between lead ids and task ids plus sync
/// metadata.
///
/// Both directions are stored explicitly and every mutator updates both
/// halves, so the two maps are exact inverses of each other in any state
/// reachable through this API. `BTreeMap` keeps the serialized document
/// stable and human-diffable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRecord {
    lead_to_task: BTreeMap<LeadId, TaskId>,
    task_to_lead: BTreeMap<TaskId, LeadId>,
    last_sync: Option<DateTime<Utc>>,
    sync_count: u64,
}

impl MappingRecord {
    /// Creates an empty mapping record.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lead_to_task: BTreeMap::new(),
            task_to_lead: BTreeMap::new(),
            last_sync: None,
            sync_count: 0,
        }
    }

    /// Inserts a lead/task pair into both maps.
    ///
    /// # Errors
    ///
    /// Returns [`SyncDomainError::LeadAlreadyMapped`] or
    /// [`SyncDomainError::TaskAlreadyMapped`] when either id is already
    /// paired; inserting would otherwise orphan the existing half-entry.
    pub fn put(&mut self, lead_id: LeadId, task_id: TaskId) -> Result<(), SyncDomainError> {
        if self.lead_to_task.contains_key(&lead_id) {
            return Err(SyncDomainError::LeadAlreadyMapped(lead_id));
        }
        if self.task_to_lead.contains_key(&task_id) {
            return Err(SyncDomainError::TaskAlreadyMapped(task_id));
        }
        self.lead_to_task.insert(lead_id.clone(), task_id.clone());
        self.task_to_lead.insert(task_id, lead_id);
        Ok(())
    }

    /// Removes the pair identified by its lead id from both maps.
    ///
    /// Returns the removed pair, or `None` when the lead is unmapped.
    pub fn remove_by_lead(&mut self, lead_id: &LeadId) -> Option<(LeadId, TaskId)> {
        let task_id = self.lead_to_task.remove(lead_id)?;
        let paired_lead = self
            .task_to_lead
            .remove(&task_id)
            .unwrap_or_else(|| lead_id.clone());
        Some((paired_lead, task_id))
    }

    /// Removes the pair identified by its task id from both maps.
    ///
    /// Returns the removed pair, or `None` when the task is unmapped.
    pub fn remove_by_task(&mut self, task_id: &TaskId) -> Option<(LeadId, TaskId)> {
        let lead_id = self.task_to_lead.remove(task_id)?;
        let paired_task = self
            .lead_to_task
            .remove(&lead_id)
            .unwrap_or_else(|| task_id.clone());
        Some((lead_id, paired_task))
    }

    /// Returns the task paired with a lead, if any.
    #[must_use]
    pub fn task_for(&self, lead_id: &LeadId) -> Option<&TaskId> {
        self.lead_to_task.get(lead_id)
    }

    /// Returns the lead paired with a task, if any.
    #[must_use]
    pub fn lead_for(&self, task_id: &TaskId) -> Option<&LeadId> {
        self.task_to_lead.get(task_id)
    }

    /// Returns `true` when the lead has a mapping entry.
    #[must_use]
    pub fn contains_lead(&self, lead_id: &LeadId) -> bool {
        self.lead_to_task.contains_key(lead_id)
    }

    /// Iterates over all mapped lead ids.
    pub fn lead_ids(&self) -> impl Iterator<Item = &LeadId> {
        self.lead_to_task.keys()
    }

    /// Iterates over all mapped task ids.
    pub fn task_ids(&self) -> impl Iterator<Item = &TaskId> {
        self.task_to_lead.keys()
    }

    /// Returns the number of mapped pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lead_to_task.len()
    }

    /// Returns `true` when no pairs are mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lead_to_task.is_empty()
    }

    /// Returns the timestamp of the last successful persist, if any.
    #[must_use]
    pub const fn last_sync(&self) -> Option<DateTime<Utc>> {
        self.last_sync
    }

    /// Returns how many times the record has been persisted.
    #[must_use]
    pub const fn sync_count(&self) -> u64 {
        self.sync_count
    }

    /// Stamps persist metadata: sets `last_sync` and increments the
    /// persist counter. Called by mapping stores as part of a successful
    /// persist, never on load.
    pub const fn mark_persisted(&mut self, now: DateTime<Utc>) {
        self.last_sync = Some(now);
        self.sync_count += 1;
    }
}
