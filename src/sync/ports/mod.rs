//! Port contracts for lead/task reconciliation.
//!
//! Ports define infrastructure-agnostic interfaces used by the
//! reconciliation engine.

pub mod lead_source;
pub mod mapping_store;
pub mod task_source;

pub use lead_source::{LeadSource, LeadSourceError, LeadSourceResult};
pub use mapping_store::{MappingStore, MappingStoreError, MappingStoreResult};
pub use task_source::{TaskSource, TaskSourceError, TaskSourceResult};
