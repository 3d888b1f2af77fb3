//! The revisioned project store.
//!
//! An injectable interface over the per-project artifacts: the mutable
//! ledger (guarded by an `updated_at` compare-and-swap), the singular
//! draft, and the immutable brief/spec revisions. Two implementations:
//! [`fs::FsProjectStore`] for real persistence with atomic replacement,
//! and [`memory::MemoryProjectStore`] as the deterministic test fake.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use credenza_protocol::brief::DesignIntentBrief;
use credenza_protocol::draft::Draft;
use credenza_protocol::ledger::RunMetadata;
use credenza_protocol::spec::ParametricSpec;
use credenza_protocol::variables::VariableMapping;

pub mod fs;
pub mod memory;

/// Which immutable revision family a store operation concerns.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RevisionKind {
    Brief,
    Spec,
}

impl std::fmt::Display for RevisionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Brief => write!(f, "brief"),
            Self::Spec => write!(f, "spec"),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("project {project} not found")]
    ProjectNotFound { project: Uuid },

    #[error("a ledger already exists for project {project}")]
    LedgerExists { project: Uuid },

    #[error("no draft saved for project {project}")]
    DraftNotFound { project: Uuid },

    #[error("{kind} revision {revision} not found for project {project}")]
    RevisionNotFound {
        kind: RevisionKind,
        project: Uuid,
        revision: u32,
    },

    #[error("{kind} revision {revision} already exists for project {project}; revisions are immutable")]
    RevisionExists {
        kind: RevisionKind,
        project: Uuid,
        revision: u32,
    },

    #[error(
        "ledger for project {project} was modified concurrently (expected {expected}, found {actual})"
    )]
    Conflict {
        project: Uuid,
        expected: DateTime<Utc>,
        actual: DateTime<Utc>,
    },

    #[error("stored record at {path} is corrupted: {reason}")]
    Corrupted { path: PathBuf, reason: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Storage contract for one project root.
///
/// Revisions are append-only: writing an existing revision number is a
/// [`StoreError::RevisionExists`]. The ledger is the only mutable
/// aggregate; its read-modify-write cycle is protected by comparing the
/// `updated_at` the caller read against the one on disk.
pub trait ProjectStore {
    /// Create the ledger for a new project. Fails if one exists.
    fn create_ledger(&self, ledger: &RunMetadata) -> Result<(), StoreError>;

    fn load_ledger(&self, project: Uuid) -> Result<RunMetadata, StoreError>;

    /// Replace the ledger iff its stored `updated_at` still equals
    /// `expected_updated_at`.
    fn compare_and_swap_ledger(
        &self,
        expected_updated_at: DateTime<Utc>,
        ledger: &RunMetadata,
    ) -> Result<(), StoreError>;

    /// Overwrite the project's single in-progress draft.
    fn save_draft(&self, project: Uuid, draft: &Draft) -> Result<(), StoreError>;

    fn load_draft(&self, project: Uuid) -> Result<Draft, StoreError>;

    /// Persist a new immutable brief revision.
    fn put_brief(&self, brief: &DesignIntentBrief) -> Result<(), StoreError>;

    fn brief(&self, project: Uuid, revision: u32) -> Result<DesignIntentBrief, StoreError>;

    /// Persist a new immutable spec revision together with its rendered
    /// summary and its variable mapping. All-or-nothing from the
    /// caller's perspective: the revision file is written last, so a
    /// revision that exists is complete.
    fn put_spec(
        &self,
        spec: &ParametricSpec,
        summary: &str,
        mapping: &VariableMapping,
    ) -> Result<(), StoreError>;

    fn spec(&self, project: Uuid, revision: u32) -> Result<ParametricSpec, StoreError>;

    fn summary(&self, project: Uuid, revision: u32) -> Result<String, StoreError>;

    fn variables(&self, project: Uuid, revision: u32) -> Result<VariableMapping, StoreError>;
}
