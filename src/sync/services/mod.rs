//! Application services for lead/task reconciliation.

mod engine;

pub use engine::{
    BulkSyncReport, DeletionSweepReport, FullSyncReport, InitialSyncReport, ReconciliationEngine,
    SyncEngineError, SyncEngineResult, SyncItemFailure, SyncItemResult, SyncOutcome,
};
