//! Bidirectional reconciliation engine.
//!
//! Orchestrates one-shot and bulk sync operations between the lead store
//! and the task store, consulting and repairing the persisted identity
//! mapping as it goes. Per-item failures are explicit values collected into
//! batch reports; only enumeration failures and persist failures abort an
//! operation.

use crate::sync::{
    domain::{Lead, LeadFieldChanges, LeadId, MappingRecord, NewTaskCard, SyncDomainError, TaskId},
    ports::{
        LeadSource, LeadSourceError, MappingStore, MappingStoreError, TaskSource, TaskSourceError,
    },
};
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Fatal errors that abort a sync operation.
///
/// Transient per-item failures never surface here; they are reported
/// through [`SyncItemFailure`] and batch counters instead.
#[derive(Debug, Clone, Error)]
pub enum SyncEngineError {
    /// Enumerating the lead store failed.
    #[error(transparent)]
    LeadSource(#[from] LeadSourceError),
    /// Enumerating the task store failed.
    #[error(transparent)]
    TaskSource(#[from] TaskSourceError),
    /// The mapping record could not be persisted. External calls have
    /// already been issued, so the operation must not continue silently.
    #[error(transparent)]
    MappingStore(#[from] MappingStoreError),
}

/// Result type for engine operations.
pub type SyncEngineResult<T> = Result<T, SyncEngineError>;

/// Successful outcome of a single-record sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The record's status was pushed onto its mapped counterpart.
    StatusPushed,
    /// The mapping was first repaired from the lead's cross-reference,
    /// then the status was pushed.
    RepairedAndPushed,
    /// The record was gone; its counterpart task card was archived (or
    /// found already gone) and the pair removed.
    CounterpartArchived,
    /// The record was gone; its counterpart lead was deleted (or found
    /// already gone) and the pair removed.
    CounterpartDeleted,
}

/// Per-item failure of a single-record sync. Logged at warning level and
/// counted by the bulk drivers; never aborts a batch.
#[derive(Debug, Clone, Error)]
pub enum SyncItemFailure {
    /// The lead has no mapped task and no recoverable cross-reference.
    #[error("no mapped task for lead {0}")]
    UnmappedLead(LeadId),
    /// The task has no mapped lead.
    #[error("no mapped lead for task {0}")]
    UnmappedTask(TaskId),
    /// The task store refused to archive the card; the pair stays mapped
    /// for a later sweep.
    #[error("task store refused to archive {0}")]
    ArchiveRefused(TaskId),
    /// The lead store refused the deletion; the pair stays mapped for a
    /// later sweep.
    #[error("lead store refused to delete {0}")]
    DeleteRefused(LeadId),
    /// Repairing the mapping from the cross-reference would break the
    /// bijection.
    #[error(transparent)]
    RepairConflict(#[from] SyncDomainError),
    /// Transient lead store failure.
    #[error(transparent)]
    LeadSource(#[from] LeadSourceError),
    /// Transient task store failure.
    #[error(transparent)]
    TaskSource(#[from] TaskSourceError),
}

/// Outcome of syncing one record.
pub type SyncItemResult = Result<SyncOutcome, SyncItemFailure>;

/// Summary of an `initial_sync` batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InitialSyncReport {
    /// Task cards created for previously unmapped leads.
    pub created: usize,
    /// Mappings recovered from a lead's cross-reference instead of
    /// creating a duplicate card.
    pub repaired: usize,
    /// Leads skipped because they are terminal or already mapped.
    pub skipped: usize,
    /// Leads whose card creation or write-back failed.
    pub failed: usize,
}

/// Summary of a bulk status sync in one direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkSyncReport {
    /// Records enumerated from the source store.
    pub attempted: usize,
    /// Records synced without a per-item failure.
    pub succeeded: usize,
}

/// Summary of a deletion sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeletionSweepReport {
    /// Mapped ids no longer present in the owning store.
    pub detected: usize,
    /// Pairs whose counterpart was removed and mapping entry dropped.
    pub removed: usize,
}

/// Combined summary of a full bidirectional sync.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FullSyncReport {
    /// Card creation for unmapped leads.
    pub initial: InitialSyncReport,
    /// Task-side deletion sweep.
    pub deleted_tasks: DeletionSweepReport,
    /// Lead-side deletion sweep.
    pub deleted_leads: DeletionSweepReport,
    /// Task-to-lead status propagation.
    pub tasks_to_leads: BulkSyncReport,
    /// Lead-to-task status propagation.
    pub leads_to_tasks: BulkSyncReport,
}

/// Reconciliation engine over a lead source, a task source, and a durable
/// mapping store.
///
/// The engine owns the in-memory [`MappingRecord`] for the process
/// lifetime and is the record's only writer; multi-instance deployments
/// need external mutual exclusion over the persisted document.
pub struct ReconciliationEngine<L, T, M>
where
    L: LeadSource,
    T: TaskSource,
    M: MappingStore,
{
    leads: Arc<L>,
    tasks: Arc<T>,
    store: Arc<M>,
    mapping: MappingRecord,
}

impl<L, T, M> ReconciliationEngine<L, T, M>
where
    L: LeadSource,
    T: TaskSource,
    M: MappingStore,
{
    /// Creates an engine, loading the mapping record from the store.
    ///
    /// A missing or unreadable record degrades to an empty one; see
    /// [`MappingStore::load`].
    pub async fn load(leads: Arc<L>, tasks: Arc<T>, store: Arc<M>) -> Self {
        let mapping = store.load().await;
        Self {
            leads,
            tasks,
            store,
            mapping,
        }
    }

    /// Returns a read-only view of the in-memory mapping record.
    #[must_use]
    pub const fn mapping(&self) -> &MappingRecord {
        &self.mapping
    }

    async fn persist(&mut self) -> SyncEngineResult<()> {
        self.store.persist(&mut self.mapping).await?;
        Ok(())
    }

    /// Creates task cards for every eligible lead that has none yet.
    ///
    /// Terminal (`LOST`) and already-mapped leads are skipped. An unmapped
    /// lead that still carries a task cross-reference gets its mapping
    /// repaired instead of a second card. Per-lead failures are logged and
    /// counted without aborting the batch; the record is persisted once at
    /// the end.
    ///
    /// # Errors
    ///
    /// Returns a [`SyncEngineError`] when lead enumeration or the final
    /// persist fails.
    pub async fn initial_sync(&mut self) -> SyncEngineResult<InitialSyncReport> {
        info!("starting initial sync (leads -> tasks)");
        let leads = self.leads.list_leads().await?;
        let mut report = InitialSyncReport::default();

        for lead in leads {
            if lead.status.is_terminal() {
                report.skipped += 1;
                continue;
            }
            if self.mapping.contains_lead(&lead.id) {
                report.skipped += 1;
                continue;
            }
            self.admit_lead(&lead, &mut report).await;
        }

        self.persist().await?;
        info!(
            created = report.created,
            repaired = report.repaired,
            skipped = report.skipped,
            failed = report.failed,
            "initial sync complete"
        );
        Ok(report)
    }

    /// Creates a card (or repairs the mapping) for one unmapped,
    /// non-terminal lead, updating the batch report.
    async fn admit_lead(&mut self, lead: &Lead, report: &mut InitialSyncReport) {
        if let Some(task_id) = &lead.linked_task_id {
            match self.mapping.put(lead.id.clone(), task_id.clone()) {
                Ok(()) => {
                    info!(lead = %lead.id, task = %task_id, "repaired mapping from lead cross-reference");
                    report.repaired += 1;
                }
                Err(err) => {
                    warn!(lead = %lead.id, error = %err, "cross-reference conflicts with existing mapping");
                    report.failed += 1;
                }
            }
            return;
        }

        let task_id = match self.tasks.create_task(NewTaskCard::for_lead(lead)).await {
            Ok(task_id) => task_id,
            Err(err) => {
                warn!(lead = %lead.id, error = %err, "failed to create task card");
                report.failed += 1;
                return;
            }
        };

        if let Err(err) = self.mapping.put(lead.id.clone(), task_id.clone()) {
            warn!(lead = %lead.id, task = %task_id, error = %err, "created card conflicts with existing mapping");
            report.failed += 1;
            return;
        }

        let changes = LeadFieldChanges::new().with_linked_task_id(task_id.clone());
        match self.leads.update_lead(&lead.id, changes).await {
            Ok(()) => {
                info!(lead = %lead.id, task = %task_id, "created task card for lead");
                report.created += 1;
            }
            Err(err) => {
                // The card and mapping entry stand; only the lead-side
                // cross-reference is missing until the next write-back.
                warn!(lead = %lead.id, task = %task_id, error = %err, "failed to write card reference back to lead");
                report.failed += 1;
            }
        }
    }

    /// Propagates one lead's state to its mapped task card.
    ///
    /// A gone lead archives its mapped card and drops the pair. A missing
    /// mapping entry is repaired from the lead's cross-reference when
    /// possible. Otherwise the lead's status is pushed onto the card.
    ///
    /// # Errors
    ///
    /// Returns a [`SyncEngineError`] only when persisting the mapping
    /// record fails; everything else is a [`SyncItemFailure`] in the inner
    /// result.
    pub async fn sync_lead_to_task(&mut self, lead_id: &LeadId) -> SyncEngineResult<SyncItemResult> {
        let lead = match self.leads.get_lead(lead_id).await {
            Ok(lead) => lead,
            Err(err) => {
                warn!(lead = %lead_id, error = %err, "failed to fetch lead");
                return Ok(Err(err.into()));
            }
        };

        let Some(lead) = lead else {
            return self.archive_card_of_missing_lead(lead_id).await;
        };

        let (task_id, repaired) = match self.resolve_task_for(&lead).await? {
            Ok(resolved) => resolved,
            Err(failure) => return Ok(Err(failure)),
        };

        match self.tasks.update_task_status(&task_id, lead.status).await {
            Ok(()) => Ok(Ok(if repaired {
                SyncOutcome::RepairedAndPushed
            } else {
                SyncOutcome::StatusPushed
            })),
            Err(err) => {
                warn!(lead = %lead.id, task = %task_id, error = %err, "failed to push lead status");
                Ok(Err(err.into()))
            }
        }
    }

    /// Archives the card mapped to a lead that no longer exists.
    ///
    /// A refused archival whose card is itself already absent means both
    /// sides of the pair are gone; the stale pair is dropped instead of
    /// being retried forever.
    async fn archive_card_of_missing_lead(
        &mut self,
        lead_id: &LeadId,
    ) -> SyncEngineResult<SyncItemResult> {
        warn!(lead = %lead_id, "lead not found in lead store");
        let Some(task_id) = self.mapping.task_for(lead_id).cloned() else {
            return Ok(Err(SyncItemFailure::UnmappedLead(lead_id.clone())));
        };

        match self.tasks.archive_task(&task_id).await {
            Ok(true) => {
                self.mapping.remove_by_lead(lead_id);
                self.persist().await?;
                info!(lead = %lead_id, task = %task_id, "archived card for deleted lead");
                Ok(Ok(SyncOutcome::CounterpartArchived))
            }
            Ok(false) => match self.tasks.get_task(&task_id).await {
                Ok(None) => {
                    self.mapping.remove_by_lead(lead_id);
                    self.persist().await?;
                    info!(lead = %lead_id, task = %task_id, "both sides gone, dropped pair");
                    Ok(Ok(SyncOutcome::CounterpartArchived))
                }
                Ok(Some(_)) => {
                    warn!(task = %task_id, "task store refused archival");
                    Ok(Err(SyncItemFailure::ArchiveRefused(task_id)))
                }
                Err(err) => {
                    warn!(task = %task_id, error = %err, "failed to resolve refused card");
                    Ok(Err(err.into()))
                }
            },
            Err(err) => {
                warn!(task = %task_id, error = %err, "failed to archive card");
                Ok(Err(err.into()))
            }
        }
    }

    /// Resolves the task mapped to a lead, repairing the mapping from the
    /// lead's cross-reference when the entry is missing. Returns the task
    /// id and whether a repair happened.
    async fn resolve_task_for(
        &mut self,
        lead: &Lead,
    ) -> SyncEngineResult<Result<(TaskId, bool), SyncItemFailure>> {
        if let Some(task_id) = self.mapping.task_for(&lead.id) {
            return Ok(Ok((task_id.clone(), false)));
        }

        let Some(task_id) = lead.linked_task_id.clone() else {
            warn!(lead = %lead.id, "no mapped task for lead");
            return Ok(Err(SyncItemFailure::UnmappedLead(lead.id.clone())));
        };

        if let Err(err) = self.mapping.put(lead.id.clone(), task_id.clone()) {
            warn!(lead = %lead.id, task = %task_id, error = %err, "mapping repair conflict");
            return Ok(Err(err.into()));
        }
        self.persist().await?;
        info!(lead = %lead.id, task = %task_id, "repaired mapping for lead");
        Ok(Ok((task_id, true)))
    }

    /// Propagates one task card's state to its mapped lead.
    ///
    /// A gone card deletes its mapped lead and drops the pair. Tasks carry
    /// no cross-reference back to leads, so there is no repair path in
    /// this direction.
    ///
    /// # Errors
    ///
    /// Returns a [`SyncEngineError`] only when persisting the mapping
    /// record fails.
    pub async fn sync_task_to_lead(&mut self, task_id: &TaskId) -> SyncEngineResult<SyncItemResult> {
        let card = match self.tasks.get_task(task_id).await {
            Ok(card) => card,
            Err(err) => {
                warn!(task = %task_id, error = %err, "failed to fetch task card");
                return Ok(Err(err.into()));
            }
        };

        let Some(card) = card else {
            return self.delete_lead_of_missing_task(task_id).await;
        };

        let Some(lead_id) = self.mapping.lead_for(task_id).cloned() else {
            warn!(task = %task_id, "no mapped lead for task");
            return Ok(Err(SyncItemFailure::UnmappedTask(task_id.clone())));
        };

        let changes = LeadFieldChanges::new().with_status(card.status);
        match self.leads.update_lead(&lead_id, changes).await {
            Ok(()) => Ok(Ok(SyncOutcome::StatusPushed)),
            Err(err) => {
                warn!(task = %task_id, lead = %lead_id, error = %err, "failed to push task status");
                Ok(Err(err.into()))
            }
        }
    }

    /// Deletes the lead mapped to a task card that no longer exists.
    ///
    /// A refused deletion whose lead is itself already absent means both
    /// sides of the pair are gone; the stale pair is dropped instead of
    /// being retried forever.
    async fn delete_lead_of_missing_task(
        &mut self,
        task_id: &TaskId,
    ) -> SyncEngineResult<SyncItemResult> {
        warn!(task = %task_id, "task not found in task store");
        let Some(lead_id) = self.mapping.lead_for(task_id).cloned() else {
            return Ok(Err(SyncItemFailure::UnmappedTask(task_id.clone())));
        };

        match self.leads.delete_lead(&lead_id).await {
            Ok(true) => {
                self.mapping.remove_by_task(task_id);
                self.persist().await?;
                info!(task = %task_id, lead = %lead_id, "deleted lead for removed task");
                Ok(Ok(SyncOutcome::CounterpartDeleted))
            }
            Ok(false) => match self.leads.get_lead(&lead_id).await {
                Ok(None) => {
                    self.mapping.remove_by_task(task_id);
                    self.persist().await?;
                    info!(task = %task_id, lead = %lead_id, "both sides gone, dropped pair");
                    Ok(Ok(SyncOutcome::CounterpartDeleted))
                }
                Ok(Some(_)) => {
                    warn!(lead = %lead_id, "lead store refused deletion");
                    Ok(Err(SyncItemFailure::DeleteRefused(lead_id)))
                }
                Err(err) => {
                    warn!(lead = %lead_id, error = %err, "failed to resolve refused lead");
                    Ok(Err(err.into()))
                }
            },
            Err(err) => {
                warn!(lead = %lead_id, error = %err, "failed to delete lead");
                Ok(Err(err.into()))
            }
        }
    }

    /// Pushes every lead's status to its mapped card.
    ///
    /// # Errors
    ///
    /// Returns a [`SyncEngineError`] when lead enumeration or a persist
    /// inside a per-item sync fails.
    pub async fn sync_all_leads_to_tasks(&mut self) -> SyncEngineResult<BulkSyncReport> {
        info!("running bulk leads -> tasks status sync");
        let leads = self.leads.list_leads().await?;
        let mut report = BulkSyncReport {
            attempted: leads.len(),
            succeeded: 0,
        };
        for lead in leads {
            if self.sync_lead_to_task(&lead.id).await?.is_ok() {
                report.succeeded += 1;
            }
        }
        info!(
            succeeded = report.succeeded,
            attempted = report.attempted,
            "completed leads -> tasks sync"
        );
        Ok(report)
    }

    /// Pushes every open card's status to its mapped lead.
    ///
    /// # Errors
    ///
    /// Returns a [`SyncEngineError`] when task enumeration or a persist
    /// inside a per-item sync fails.
    pub async fn sync_all_tasks_to_leads(&mut self) -> SyncEngineResult<BulkSyncReport> {
        info!("running bulk tasks -> leads status sync");
        let cards = self.tasks.list_tasks().await?;
        let mut report = BulkSyncReport {
            attempted: cards.len(),
            succeeded: 0,
        };
        for card in cards {
            if self.sync_task_to_lead(&card.id).await?.is_ok() {
                report.succeeded += 1;
            }
        }
        info!(
            succeeded = report.succeeded,
            attempted = report.attempted,
            "completed tasks -> leads sync"
        );
        Ok(report)
    }

    /// Deletes leads whose mapped task cards have disappeared from the
    /// task store.
    ///
    /// A failed or refused deletion leaves the pair mapped so the next
    /// sweep retries it, unless the lead turns out to be already absent,
    /// in which case both sides are gone and the pair is dropped. One
    /// persist when anything was removed.
    ///
    /// # Errors
    ///
    /// Returns a [`SyncEngineError`] when task enumeration or the final
    /// persist fails.
    pub async fn sync_deleted_tasks(&mut self) -> SyncEngineResult<DeletionSweepReport> {
        info!("checking for deleted tasks");
        let existing: BTreeSet<TaskId> = self
            .tasks
            .list_tasks()
            .await?
            .into_iter()
            .map(|card| card.id)
            .collect();
        let missing: Vec<TaskId> = self
            .mapping
            .task_ids()
            .filter(|task_id| !existing.contains(*task_id))
            .cloned()
            .collect();
        let mut report = DeletionSweepReport {
            detected: missing.len(),
            removed: 0,
        };
        info!(count = report.detected, "found deleted tasks");

        for task_id in missing {
            let Some(lead_id) = self.mapping.lead_for(&task_id).cloned() else {
                continue;
            };
            match self.leads.delete_lead(&lead_id).await {
                Ok(true) => {
                    self.mapping.remove_by_task(&task_id);
                    report.removed += 1;
                    info!(task = %task_id, lead = %lead_id, "deleted lead for removed task");
                }
                Ok(false) => match self.leads.get_lead(&lead_id).await {
                    Ok(None) => {
                        self.mapping.remove_by_task(&task_id);
                        report.removed += 1;
                        info!(task = %task_id, lead = %lead_id, "both sides gone, dropped pair");
                    }
                    Ok(Some(_)) => warn!(lead = %lead_id, "lead store refused deletion"),
                    Err(err) => {
                        warn!(lead = %lead_id, error = %err, "failed to resolve refused lead");
                    }
                },
                Err(err) => warn!(lead = %lead_id, error = %err, "failed to delete lead"),
            }
        }

        if report.removed > 0 {
            self.persist().await?;
        }
        Ok(report)
    }

    /// Archives cards whose mapped leads have disappeared from the lead
    /// store.
    ///
    /// # Errors
    ///
    /// Returns a [`SyncEngineError`] when lead enumeration or the final
    /// persist fails.
    pub async fn sync_deleted_leads(&mut self) -> SyncEngineResult<DeletionSweepReport> {
        info!("checking for deleted leads");
        let existing: BTreeSet<LeadId> = self
            .leads
            .list_leads()
            .await?
            .into_iter()
            .map(|lead| lead.id)
            .collect();
        let missing: Vec<LeadId> = self
            .mapping
            .lead_ids()
            .filter(|lead_id| !existing.contains(*lead_id))
            .cloned()
            .collect();
        let mut report = DeletionSweepReport {
            detected: missing.len(),
            removed: 0,
        };
        info!(count = report.detected, "found deleted leads");

        for lead_id in missing {
            let Some(task_id) = self.mapping.task_for(&lead_id).cloned() else {
                continue;
            };
            match self.tasks.archive_task(&task_id).await {
                Ok(true) => {
                    self.mapping.remove_by_lead(&lead_id);
                    report.removed += 1;
                    info!(lead = %lead_id, task = %task_id, "archived card for deleted lead");
                }
                Ok(false) => match self.tasks.get_task(&task_id).await {
                    Ok(None) => {
                        self.mapping.remove_by_lead(&lead_id);
                        report.removed += 1;
                        info!(lead = %lead_id, task = %task_id, "both sides gone, dropped pair");
                    }
                    Ok(Some(_)) => warn!(task = %task_id, "task store refused archival"),
                    Err(err) => {
                        warn!(task = %task_id, error = %err, "failed to resolve refused card");
                    }
                },
                Err(err) => warn!(task = %task_id, error = %err, "failed to archive card"),
            }
        }

        if report.removed > 0 {
            self.persist().await?;
        }
        Ok(report)
    }

    /// Runs a complete bidirectional sync.
    ///
    /// Order matters: missing cards are created first so later status
    /// pushes have a target, and deletions are resolved before status
    /// pushes so stale pairs are never used. The task-to-lead pass runs
    /// before lead-to-task, so when both sides changed the same record in
    /// one cycle the pair converges on the card's status.
    ///
    /// # Errors
    ///
    /// Any fatal error aborts the remaining steps and is surfaced to the
    /// caller.
    pub async fn full_sync(&mut self) -> SyncEngineResult<FullSyncReport> {
        info!("starting full bidirectional sync");
        let initial = self.initial_sync().await?;
        let deleted_tasks = self.sync_deleted_tasks().await?;
        let deleted_leads = self.sync_deleted_leads().await?;
        let tasks_to_leads = self.sync_all_tasks_to_leads().await?;
        let leads_to_tasks = self.sync_all_leads_to_tasks().await?;
        info!("full sync completed");
        Ok(FullSyncReport {
            initial,
            deleted_tasks,
            deleted_leads,
            tasks_to_leads,
            leads_to_tasks,
        })
    }
}
