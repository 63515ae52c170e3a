//! Error types for sync domain validation and parsing.

use super::{LeadId, TaskId};
use thiserror::Error;

/// Errors returned while constructing domain sync values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyncDomainError {
    /// The lead identifier is empty after trimming.
    #[error("lead identifier must not be empty")]
    EmptyLeadId,

    /// The task identifier is empty after trimming.
    #[error("task identifier must not be empty")]
    EmptyTaskId,

    /// The lead is already paired with a task card.
    #[error("lead {0} is already mapped to a task")]
    LeadAlreadyMapped(LeadId),

    /// The task card is already paired with a lead.
    #[error("task {0} is already mapped to a lead")]
    TaskAlreadyMapped(TaskId),
}

/// Error returned while parsing lead statuses from external stores.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown lead status: {0}")]
pub struct ParseLeadStatusError(pub String);
