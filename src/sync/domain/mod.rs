//! Domain model for lead/task reconciliation.
//!
//! The sync domain models the records owned by the two external stores, the
//! persisted identity mapping between them, and nothing else; all
//! infrastructure concerns stay outside the domain boundary.

mod card;
mod error;
mod ids;
mod lead;
mod mapping;

pub use card::{NewTaskCard, TaskCard};
pub use error::{ParseLeadStatusError, SyncDomainError};
pub use ids::{LeadId, TaskId};
pub use lead::{Lead, LeadFieldChanges, LeadStatus};
pub use mapping::MappingRecord;
