//! In-memory project store.
//!
//! The deterministic test double: same trait, same compare-and-swap and
//! immutability semantics as the filesystem store, no I/O.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use credenza_protocol::brief::DesignIntentBrief;
use credenza_protocol::draft::Draft;
use credenza_protocol::ledger::RunMetadata;
use credenza_protocol::spec::ParametricSpec;
use credenza_protocol::variables::VariableMapping;

use super::{ProjectStore, RevisionKind, StoreError};

struct ProjectState {
    ledger: RunMetadata,
    draft: Option<Draft>,
    briefs: BTreeMap<u32, DesignIntentBrief>,
    specs: BTreeMap<u32, (ParametricSpec, String, VariableMapping)>,
}

#[derive(Default)]
pub struct MemoryProjectStore {
    inner: Mutex<HashMap<Uuid, ProjectState>>,
}

impl MemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with<T>(
        &self,
        f: impl FnOnce(&mut HashMap<Uuid, ProjectState>) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

impl ProjectStore for MemoryProjectStore {
    fn create_ledger(&self, ledger: &RunMetadata) -> Result<(), StoreError> {
        self.with(|projects| {
            if projects.contains_key(&ledger.project_id) {
                return Err(StoreError::LedgerExists {
                    project: ledger.project_id,
                });
            }
            projects.insert(
                ledger.project_id,
                ProjectState {
                    ledger: ledger.clone(),
                    draft: None,
                    briefs: BTreeMap::new(),
                    specs: BTreeMap::new(),
                },
            );
            Ok(())
        })
    }

    fn load_ledger(&self, project: Uuid) -> Result<RunMetadata, StoreError> {
        self.with(|projects| {
            projects
                .get(&project)
                .map(|state| state.ledger.clone())
                .ok_or(StoreError::ProjectNotFound { project })
        })
    }

    fn compare_and_swap_ledger(
        &self,
        expected_updated_at: DateTime<Utc>,
        ledger: &RunMetadata,
    ) -> Result<(), StoreError> {
        self.with(|projects| {
            let state = projects
                .get_mut(&ledger.project_id)
                .ok_or(StoreError::ProjectNotFound {
                    project: ledger.project_id,
                })?;
            if state.ledger.updated_at != expected_updated_at {
                return Err(StoreError::Conflict {
                    project: ledger.project_id,
                    expected: expected_updated_at,
                    actual: state.ledger.updated_at,
                });
            }
            state.ledger = ledger.clone();
            Ok(())
        })
    }

    fn save_draft(&self, project: Uuid, draft: &Draft) -> Result<(), StoreError> {
        self.with(|projects| {
            let state = projects
                .get_mut(&project)
                .ok_or(StoreError::ProjectNotFound { project })?;
            state.draft = Some(draft.clone());
            Ok(())
        })
    }

    fn load_draft(&self, project: Uuid) -> Result<Draft, StoreError> {
        self.with(|projects| {
            let state = projects
                .get(&project)
                .ok_or(StoreError::ProjectNotFound { project })?;
            state
                .draft
                .clone()
                .ok_or(StoreError::DraftNotFound { project })
        })
    }

    fn put_brief(&self, brief: &DesignIntentBrief) -> Result<(), StoreError> {
        self.with(|projects| {
            let state = projects
                .get_mut(&brief.project_id)
                .ok_or(StoreError::ProjectNotFound {
                    project: brief.project_id,
                })?;
            if state.briefs.contains_key(&brief.revision) {
                return Err(StoreError::RevisionExists {
                    kind: RevisionKind::Brief,
                    project: brief.project_id,
                    revision: brief.revision,
                });
            }
            state.briefs.insert(brief.revision, brief.clone());
            Ok(())
        })
    }

    fn brief(&self, project: Uuid, revision: u32) -> Result<DesignIntentBrief, StoreError> {
        self.with(|projects| {
            projects
                .get(&project)
                .ok_or(StoreError::ProjectNotFound { project })?
                .briefs
                .get(&revision)
                .cloned()
                .ok_or(StoreError::RevisionNotFound {
                    kind: RevisionKind::Brief,
                    project,
                    revision,
                })
        })
    }

    fn put_spec(
        &self,
        spec: &ParametricSpec,
        summary: &str,
        mapping: &VariableMapping,
    ) -> Result<(), StoreError> {
        self.with(|projects| {
            let state = projects
                .get_mut(&spec.project_id)
                .ok_or(StoreError::ProjectNotFound {
                    project: spec.project_id,
                })?;
            if state.specs.contains_key(&spec.revision) {
                return Err(StoreError::RevisionExists {
                    kind: RevisionKind::Spec,
                    project: spec.project_id,
                    revision: spec.revision,
                });
            }
            state.specs.insert(
                spec.revision,
                (spec.clone(), summary.to_string(), mapping.clone()),
            );
            Ok(())
        })
    }

    fn spec(&self, project: Uuid, revision: u32) -> Result<ParametricSpec, StoreError> {
        self.with(|projects| {
            projects
                .get(&project)
                .ok_or(StoreError::ProjectNotFound { project })?
                .specs
                .get(&revision)
                .map(|(spec, _, _)| spec.clone())
                .ok_or(StoreError::RevisionNotFound {
                    kind: RevisionKind::Spec,
                    project,
                    revision,
                })
        })
    }

    fn summary(&self, project: Uuid, revision: u32) -> Result<String, StoreError> {
        self.with(|projects| {
            projects
                .get(&project)
                .ok_or(StoreError::ProjectNotFound { project })?
                .specs
                .get(&revision)
                .map(|(_, summary, _)| summary.clone())
                .ok_or(StoreError::RevisionNotFound {
                    kind: RevisionKind::Spec,
                    project,
                    revision,
                })
        })
    }

    fn variables(&self, project: Uuid, revision: u32) -> Result<VariableMapping, StoreError> {
        self.with(|projects| {
            projects
                .get(&project)
                .ok_or(StoreError::ProjectNotFound { project })?
                .specs
                .get(&revision)
                .map(|(_, _, mapping)| mapping.clone())
                .ok_or(StoreError::RevisionNotFound {
                    kind: RevisionKind::Spec,
                    project,
                    revision,
                })
        })
    }
}
