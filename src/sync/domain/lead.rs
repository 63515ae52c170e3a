//! Lead record and status types owned by the external lead store.

use super::{LeadId, ParseLeadStatusError, TaskId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pipeline status of a lead.
///
/// Task cards mirror the same vocabulary: status values are copied verbatim
/// in both sync directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadStatus {
    /// Lead has been captured but not yet contacted.
    New,
    /// First contact has been made.
    Contacted,
    /// Lead has been qualified as a real opportunity.
    Qualified,
    /// Lead converted.
    Won,
    /// Lead is terminally lost; never given a task card.
    Lost,
}

impl LeadStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Contacted => "CONTACTED",
            Self::Qualified => "QUALIFIED",
            Self::Won => "WON",
            Self::Lost => "LOST",
        }
    }

    /// Returns `true` for the terminal `LOST` status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Lost)
    }
}

impl TryFrom<&str> for LeadStatus {
    type Error = ParseLeadStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "NEW" => Ok(Self::New),
            "CONTACTED" => Ok(Self::Contacted),
            "QUALIFIED" => Ok(Self::Qualified),
            "WON" => Ok(Self::Won),
            "LOST" => Ok(Self::Lost),
            _ => Err(ParseLeadStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A prospective contact owned by the external lead store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    /// Lead identifier assigned by the lead store.
    pub id: LeadId,
    /// Display name.
    pub name: String,
    /// Contact email address.
    pub email: String,
    /// Current pipeline status.
    pub status: LeadStatus,
    /// Cross-reference to the linked task card, written back by the engine
    /// so the lead store itself carries a recoverable copy of the mapping.
    pub linked_task_id: Option<TaskId>,
    /// Label describing where the lead came from.
    pub source: String,
}

/// Field-level patch applied through `LeadSource::update_lead`.
///
/// Only set fields are written; unset fields keep their stored value
/// (last-writer-wins per field).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadFieldChanges {
    status: Option<LeadStatus>,
    linked_task_id: Option<TaskId>,
}

impl LeadFieldChanges {
    /// Creates an empty patch.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            status: None,
            linked_task_id: None,
        }
    }

    /// Sets the lead status.
    #[must_use]
    pub const fn with_status(mut self, status: LeadStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the task card cross-reference.
    #[must_use]
    pub fn with_linked_task_id(mut self, task_id: TaskId) -> Self {
        self.linked_task_id = Some(task_id);
        self
    }

    /// Returns the status change, if any.
    #[must_use]
    pub const fn status(&self) -> Option<LeadStatus> {
        self.status
    }

    /// Returns the cross-reference change, if any.
    #[must_use]
    pub const fn linked_task_id(&self) -> Option<&TaskId> {
        self.linked_task_id.as_ref()
    }

    /// Applies the patch to a lead record in place.
    pub fn apply_to(&self, lead: &mut Lead) {
        if let Some(status) = self.status {
            lead.status = status;
        }
        if let Some(task_id) = &self.linked_task_id {
            lead.linked_task_id = Some(task_id.clone());
        }
    }
}
