//! The per-project run-metadata ledger.
//!
//! The ledger is the only mutable aggregate in the model: everything else
//! is either the singular draft or an immutable revision. It tracks the
//! revision histories (hash + timestamps + cross-references), the current
//! approval pointer, and reference-geometry provenance. Writers must
//! replace it atomically and guard the read-modify-write with the
//! `updated_at` compare-and-swap the store exposes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::approval::{ApprovalRecord, ProjectApproval};
use crate::geometry::CrgMeta;

/// Summary of one confirmed DIB revision.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DibRevisionSummary {
    pub revision: u32,
    /// SHA-256 of the canonical DIB serialization.
    pub content_hash: String,
    pub confirmed_at: DateTime<Utc>,
}

/// Summary of one generated PSPEC revision.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpecRevisionSummary {
    pub revision: u32,
    /// SHA-256 of the canonical PSPEC serialization.
    pub content_hash: String,
    pub created_at: DateTime<Utc>,
    /// The DIB revision this PSPEC was synthesized from.
    pub dib_revision: u32,
    /// Content hash of the reference geometry used.
    pub crg_hash: String,
    /// The revision's own approval record.
    pub approval: ApprovalRecord,
}

/// The per-project ledger.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub project_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Bumped on every ledger write; the optimistic-concurrency token.
    pub updated_at: DateTime<Utc>,
    /// Reference-geometry provenance, once registered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<CrgMeta>,
    /// Current project-level approval pointer.
    pub approval: ProjectApproval,
    /// Ordered DIB revision history (ascending revision).
    pub briefs: Vec<DibRevisionSummary>,
    /// Ordered PSPEC revision history (ascending revision).
    pub specs: Vec<SpecRevisionSummary>,
}

impl RunMetadata {
    /// A fresh ledger for a new project.
    pub fn new(project_id: Uuid, name: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            project_id,
            name,
            created_at: now,
            updated_at: now,
            geometry: None,
            approval: ProjectApproval::none(),
            briefs: Vec::new(),
            specs: Vec::new(),
        }
    }

    /// Latest confirmed DIB revision number, 0 when none exist.
    pub fn latest_brief_revision(&self) -> u32 {
        self.briefs.last().map(|b| b.revision).unwrap_or(0)
    }

    /// Latest generated PSPEC revision number, 0 when none exist.
    pub fn latest_spec_revision(&self) -> u32 {
        self.specs.last().map(|s| s.revision).unwrap_or(0)
    }

    pub fn spec_summary(&self, revision: u32) -> Option<&SpecRevisionSummary> {
        self.specs.iter().find(|s| s.revision == revision)
    }

    pub fn spec_summary_mut(&mut self, revision: u32) -> Option<&mut SpecRevisionSummary> {
        self.specs.iter_mut().find(|s| s.revision == revision)
    }
}
