//! Pipeline orchestration.
//!
//! [`PipelineEngine`] is the only component that touches the clock and
//! the store; every transformation it coordinates is a pure function.
//! Domain rejections (validation issues, infeasibility, mapping
//! violations) are returned as outcome data; `CoreError` is reserved for
//! storage and precondition failures.

use chrono::Utc;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use credenza_protocol::canonical::content_hash;
use credenza_protocol::draft::Draft;
use credenza_protocol::geometry::CrgMeta;
use credenza_protocol::ledger::{DibRevisionSummary, RunMetadata, SpecRevisionSummary};
use credenza_protocol::spec::ParametricSpec;
use credenza_protocol::variables::VariableMapping;

use crate::approval::{self, Decision};
use crate::error::{CoreError, Result};
use crate::normalizer::{ValidationIssue, normalize};
use crate::onshape::mapper::{MappingIssue, map_to_variables};
use crate::store::{ProjectStore, StoreError};
use crate::summary::render_summary;
use crate::synthesizer::synthesize;
use crate::validate::manufacturability::check_manufacturability;
use crate::validate::schema::{SchemaValidator, SchemaViolation};

/// Result of a brief confirmation attempt.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfirmOutcome {
    Confirmed { revision: u32, content_hash: String },
    /// The draft is incomplete or invalid; nothing was persisted and the
    /// draft itself is untouched.
    Rejected { issues: Vec<ValidationIssue> },
}

/// Which gate stopped a generation attempt, with its full issue batch.
#[derive(Clone, Debug, PartialEq)]
pub enum BlockReason {
    Schema(Vec<SchemaViolation>),
    Manufacturability(Vec<String>),
    Mapping(Vec<MappingIssue>),
}

impl BlockReason {
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Schema(_) => "schema",
            Self::Manufacturability(_) => "manufacturability",
            Self::Mapping(_) => "mapping",
        }
    }
}

/// Result of a spec generation attempt.
#[derive(Clone, Debug, PartialEq)]
pub enum GenerateOutcome {
    Generated {
        revision: u32,
        content_hash: String,
        variable_count: usize,
    },
    /// A validator or the mapper refused the synthesized spec; nothing
    /// was persisted.
    Blocked(BlockReason),
}

pub struct PipelineEngine<S> {
    store: S,
    schema: SchemaValidator,
}

impl<S: ProjectStore> PipelineEngine<S> {
    /// Build an engine over a store, compiling the embedded PSPEC schema.
    pub fn new(store: S) -> Result<Self> {
        Ok(Self {
            store,
            schema: SchemaValidator::new()?,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create a new project with an empty ledger.
    pub fn create_project(&self, name: Option<String>) -> Result<RunMetadata> {
        let ledger = RunMetadata::new(Uuid::new_v4(), name, Utc::now());
        self.store.create_ledger(&ledger)?;
        info!(project = %ledger.project_id, "project created");
        Ok(ledger)
    }

    /// Overwrite the project's draft wholesale. Drafts are never
    /// validated on save; incompleteness only blocks confirmation.
    pub fn save_draft(
        &self,
        project: Uuid,
        answers: std::collections::BTreeMap<String, Value>,
    ) -> Result<Draft> {
        let draft = Draft {
            answers,
            updated_at: Utc::now(),
        };
        self.store.save_draft(project, &draft)?;
        Ok(draft)
    }

    /// Point-update a single draft answer, creating the draft if absent.
    pub fn set_draft_answer(&self, project: Uuid, path: &str, value: Value) -> Result<Draft> {
        let now = Utc::now();
        let mut draft = match self.store.load_draft(project) {
            Ok(draft) => draft,
            Err(StoreError::DraftNotFound { .. }) => Draft::empty(now),
            Err(e) => return Err(e.into()),
        };
        draft.set(path, value, now);
        self.store.save_draft(project, &draft)?;
        Ok(draft)
    }

    pub fn draft(&self, project: Uuid) -> Result<Draft> {
        Ok(self.store.load_draft(project)?)
    }

    /// Record reference-geometry provenance in the ledger. Metadata
    /// only - the mesh payload is not retained by the pipeline.
    pub fn register_geometry(&self, project: Uuid, crg: CrgMeta) -> Result<RunMetadata> {
        let ledger = self.store.load_ledger(project)?;
        let token = ledger.updated_at;
        let mut updated = ledger;
        updated.geometry = Some(crg);
        updated.updated_at = Utc::now();
        self.store.compare_and_swap_ledger(token, &updated)?;
        info!(project = %project, "reference geometry registered");
        Ok(updated)
    }

    /// Normalize the draft into a new immutable brief revision.
    pub fn confirm_brief(&self, project: Uuid) -> Result<ConfirmOutcome> {
        let ledger = self.store.load_ledger(project)?;
        let draft = self.store.load_draft(project)?;
        let now = Utc::now();

        let brief = match normalize(&draft, project, ledger.latest_brief_revision(), now) {
            Ok(brief) => brief,
            Err(issues) => {
                warn!(project = %project, issues = issues.len(), "brief confirmation rejected");
                return Ok(ConfirmOutcome::Rejected { issues });
            }
        };

        let hash = content_hash(&brief).map_err(|source| CoreError::Serialize { source })?;
        self.store.put_brief(&brief)?;

        let token = ledger.updated_at;
        let mut updated = ledger;
        updated.briefs.push(DibRevisionSummary {
            revision: brief.revision,
            content_hash: hash.clone(),
            confirmed_at: now,
        });
        // A new brief invalidates the current approval pointer: no PSPEC
        // exists for it yet.
        updated.approval = approval::on_brief_confirmed();
        updated.updated_at = now;
        self.store.compare_and_swap_ledger(token, &updated)?;

        info!(project = %project, revision = brief.revision, "brief confirmed");
        Ok(ConfirmOutcome::Confirmed {
            revision: brief.revision,
            content_hash: hash,
        })
    }

    /// Synthesize, validate, and map the next spec revision.
    ///
    /// Fail-fast and all-or-nothing: a blocked gate persists nothing.
    pub fn generate_spec(&self, project: Uuid) -> Result<GenerateOutcome> {
        let ledger = self.store.load_ledger(project)?;
        let crg = ledger
            .geometry
            .clone()
            .ok_or(CoreError::GeometryNotRegistered { project })?;
        let dib_revision = ledger.latest_brief_revision();
        if dib_revision == 0 {
            return Err(CoreError::BriefNotConfirmed { project });
        }
        let brief = self.store.brief(project, dib_revision)?;
        let dib_hash = content_hash(&brief).map_err(|source| CoreError::Serialize { source })?;

        let now = Utc::now();
        let spec = synthesize(&brief, &dib_hash, &crg, ledger.latest_spec_revision(), now);

        let violations = self.schema.validate(&spec)?;
        if !violations.is_empty() {
            warn!(project = %project, count = violations.len(), "spec blocked by schema contract");
            return Ok(GenerateOutcome::Blocked(BlockReason::Schema(violations)));
        }

        let feasibility = check_manufacturability(&spec);
        if !feasibility.ok {
            warn!(project = %project, count = feasibility.errors.len(), "spec blocked by manufacturability");
            return Ok(GenerateOutcome::Blocked(BlockReason::Manufacturability(
                feasibility.errors,
            )));
        }

        let mapping = match map_to_variables(&spec) {
            Ok(mapping) => mapping,
            Err(issues) => {
                warn!(project = %project, count = issues.len(), "spec blocked by variable mapping");
                return Ok(GenerateOutcome::Blocked(BlockReason::Mapping(issues)));
            }
        };

        let summary = render_summary(&spec);
        let spec_hash = content_hash(&spec).map_err(|source| CoreError::Serialize { source })?;
        self.store.put_spec(&spec, &summary, &mapping)?;

        let (pointer, record) = approval::on_spec_generated(spec.revision);
        let token = ledger.updated_at;
        let mut updated = ledger;
        updated.specs.push(SpecRevisionSummary {
            revision: spec.revision,
            content_hash: spec_hash.clone(),
            created_at: now,
            dib_revision,
            crg_hash: crg.content_hash,
            approval: record,
        });
        updated.approval = pointer;
        updated.updated_at = now;
        self.store.compare_and_swap_ledger(token, &updated)?;

        info!(
            project = %project,
            revision = spec.revision,
            variables = mapping.variables.len(),
            "spec generated and pending approval"
        );
        Ok(GenerateOutcome::Generated {
            revision: spec.revision,
            content_hash: spec_hash,
            variable_count: mapping.variables.len(),
        })
    }

    pub fn approve(&self, project: Uuid, revision: u32) -> Result<RunMetadata> {
        self.decide_on(project, revision, Decision::Approve)
    }

    pub fn reject(&self, project: Uuid, revision: u32) -> Result<RunMetadata> {
        self.decide_on(project, revision, Decision::Reject)
    }

    fn decide_on(&self, project: Uuid, revision: u32, decision: Decision) -> Result<RunMetadata> {
        let ledger = self.store.load_ledger(project)?;
        let summary = ledger
            .spec_summary(revision)
            .ok_or(CoreError::SpecNotInLedger { project, revision })?;
        let now = Utc::now();
        let (pointer, record) =
            approval::decide(&ledger.approval, &summary.approval, revision, decision, now)?;

        let token = ledger.updated_at;
        let mut updated = ledger;
        if let Some(entry) = updated.spec_summary_mut(revision) {
            entry.approval = record;
        }
        updated.approval = pointer;
        updated.updated_at = now;
        self.store.compare_and_swap_ledger(token, &updated)?;

        info!(project = %project, revision, state = ?record.state, "approval decided");
        Ok(updated)
    }

    pub fn status(&self, project: Uuid) -> Result<RunMetadata> {
        Ok(self.store.load_ledger(project)?)
    }

    /// Resolve `revision` (0 meaning latest) against the ledger.
    fn resolve_spec_revision(&self, project: Uuid, revision: u32) -> Result<u32> {
        if revision > 0 {
            return Ok(revision);
        }
        let ledger = self.store.load_ledger(project)?;
        let latest = ledger.latest_spec_revision();
        if latest == 0 {
            return Err(CoreError::SpecNotInLedger {
                project,
                revision: 0,
            });
        }
        Ok(latest)
    }

    pub fn spec(&self, project: Uuid, revision: u32) -> Result<ParametricSpec> {
        let revision = self.resolve_spec_revision(project, revision)?;
        Ok(self.store.spec(project, revision)?)
    }

    pub fn summary(&self, project: Uuid, revision: u32) -> Result<String> {
        let revision = self.resolve_spec_revision(project, revision)?;
        Ok(self.store.summary(project, revision)?)
    }

    pub fn variables(&self, project: Uuid, revision: u32) -> Result<VariableMapping> {
        let revision = self.resolve_spec_revision(project, revision)?;
        Ok(self.store.variables(project, revision)?)
    }
}
