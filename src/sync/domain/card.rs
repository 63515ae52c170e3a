//! Task card records owned by the external task store.

use super::{Lead, LeadId, LeadStatus, TaskId};
use serde::{Deserialize, Serialize};

/// A unit of follow-up work owned by the external task store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCard {
    /// Task identifier assigned by the task store.
    pub id: TaskId,
    /// Card title.
    pub title: String,
    /// Current status, mirroring the lead status vocabulary.
    pub status: LeadStatus,
    /// Free-text description.
    pub description: String,
    /// Whether the card has been archived. Archived cards no longer appear
    /// in store listings but remain resolvable by id.
    #[serde(default)]
    pub archived: bool,
}

/// Creation payload for a new task card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskCard {
    title: String,
    linked_lead_id: LeadId,
    description: String,
}

impl NewTaskCard {
    /// Derives the follow-up card for a lead.
    #[must_use]
    pub fn for_lead(lead: &Lead) -> Self {
        Self {
            title: format!("Follow-up: {}", lead.name),
            linked_lead_id: lead.id.clone(),
            description: format!("Email: {}\nSource: {}", lead.email, lead.source),
        }
    }

    /// Returns the card title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the lead the card follows up on.
    #[must_use]
    pub const fn linked_lead_id(&self) -> &LeadId {
        &self.linked_lead_id
    }

    /// Returns the card description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}
