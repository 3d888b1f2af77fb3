//! Approval records.
//!
//! Approval is tracked in two places: a project-level pointer (which
//! revision, if any, is currently under decision) and a per-PSPEC-revision
//! record. The transition rules live in `credenza-core`; this module only
//! defines the persisted shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Approval lifecycle states.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalState {
    /// No PSPEC has been generated against the current brief.
    None,
    /// A PSPEC revision awaits a decision.
    Pending,
    /// Terminal for the revision.
    Approved,
    /// Terminal for the revision; a later revision may supersede it.
    Rejected,
}

/// Approval state attached to a single PSPEC revision.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ApprovalRecord {
    pub state: ApprovalState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decided_at: Option<DateTime<Utc>>,
}

impl ApprovalRecord {
    pub fn pending() -> Self {
        Self {
            state: ApprovalState::Pending,
            decided_at: None,
        }
    }

    /// Whether the record can no longer change.
    pub fn is_terminal(&self) -> bool {
        matches!(self.state, ApprovalState::Approved | ApprovalState::Rejected)
    }
}

/// The project-level approval pointer.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ProjectApproval {
    pub state: ApprovalState,
    /// The PSPEC revision the pointer refers to; `None` while no PSPEC
    /// exists for the current brief.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decided_at: Option<DateTime<Utc>>,
}

impl ProjectApproval {
    /// The reset pointer: no PSPEC generated against the current brief.
    pub fn none() -> Self {
        Self {
            state: ApprovalState::None,
            revision: None,
            decided_at: None,
        }
    }

    pub fn pending(revision: u32) -> Self {
        Self {
            state: ApprovalState::Pending,
            revision: Some(revision),
            decided_at: None,
        }
    }
}
