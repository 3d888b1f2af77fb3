//! Approval transitions.
//!
//! `none → pending → {approved | rejected}`, tracked both on the
//! project-level pointer and on each PSPEC revision's own record.
//! Approved and rejected are terminal per revision; a rejected revision
//! is superseded by generating a new one. Confirming a new brief
//! revision resets the project pointer unconditionally - no PSPEC exists
//! yet for the new brief.
//!
//! These are pure functions over the protocol records; the engine owns
//! persistence. Checking `approved` before CAD regeneration is the
//! downstream collaborator's precondition, not enforced here.

use chrono::{DateTime, Utc};
use thiserror::Error;

use credenza_protocol::approval::{ApprovalRecord, ApprovalState, ProjectApproval};

/// A decision on a pending revision.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Decision {
    Approve,
    Reject,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApprovalError {
    #[error("revision {revision} has already been decided ({state:?})")]
    AlreadyDecided { revision: u32, state: ApprovalState },

    #[error("revision {requested} is not the revision under decision (current: {current:?})")]
    WrongRevision { requested: u32, current: Option<u32> },

    #[error("project approval is {state:?}, not pending")]
    NotPending { state: ApprovalState },
}

/// Pointer + record state after a new PSPEC revision is generated.
pub fn on_spec_generated(revision: u32) -> (ProjectApproval, ApprovalRecord) {
    (ProjectApproval::pending(revision), ApprovalRecord::pending())
}

/// Pointer state after a new brief revision is confirmed.
pub fn on_brief_confirmed() -> ProjectApproval {
    ProjectApproval::none()
}

/// Apply a decision to the revision currently under approval.
///
/// Returns the new pointer and the revision's new record. The previous
/// record is consulted only to guard terminality - decided revisions are
/// never mutated again.
pub fn decide(
    pointer: &ProjectApproval,
    record: &ApprovalRecord,
    revision: u32,
    decision: Decision,
    now: DateTime<Utc>,
) -> Result<(ProjectApproval, ApprovalRecord), ApprovalError> {
    if record.is_terminal() {
        return Err(ApprovalError::AlreadyDecided {
            revision,
            state: record.state,
        });
    }
    if pointer.revision != Some(revision) {
        return Err(ApprovalError::WrongRevision {
            requested: revision,
            current: pointer.revision,
        });
    }
    if pointer.state != ApprovalState::Pending {
        return Err(ApprovalError::NotPending {
            state: pointer.state,
        });
    }

    let state = match decision {
        Decision::Approve => ApprovalState::Approved,
        Decision::Reject => ApprovalState::Rejected,
    };
    Ok((
        ProjectApproval {
            state,
            revision: Some(revision),
            decided_at: Some(now),
        },
        ApprovalRecord {
            state,
            decided_at: Some(now),
        },
    ))
}
