//! Error taxonomy for pipeline operations.
//!
//! Expected domain violations - an incomplete draft, an infeasible
//! specification, a mapping contract breach - are data, carried inside
//! [`ConfirmOutcome`](crate::engine::ConfirmOutcome) and
//! [`GenerateOutcome`](crate::engine::GenerateOutcome). `CoreError` is
//! reserved for genuinely exceptional conditions: storage failures,
//! corrupted records, precondition violations on the operation itself.

use thiserror::Error;
use uuid::Uuid;

use crate::approval::ApprovalError;
use crate::store::StoreError;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Approval(#[from] ApprovalError),

    #[error("failed to compile the embedded PSPEC schema: {0}")]
    SchemaCompile(String),

    #[error("failed to serialize record: {source}")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },

    #[error("no reference geometry registered for project {project}")]
    GeometryNotRegistered { project: Uuid },

    #[error("no confirmed brief exists for project {project}")]
    BriefNotConfirmed { project: Uuid },

    #[error("spec revision {revision} is not recorded in the ledger for project {project}")]
    SpecNotInLedger { project: Uuid, revision: u32 },

    #[error("internal invariant violated: {0}")]
    Internal(String),
}
