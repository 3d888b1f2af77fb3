//! Filesystem-backed project store.
//!
//! Layout, per project, under the store root:
//!
//! ```text
//! <root>/<project_id>/
//!   ledger.json
//!   draft.json
//!   briefs/rev-000001.json     (immutable revision archive)
//!   briefs/latest.json         (atomically replaced copy)
//!   specs/rev-000001.json
//!   specs/rev-000001.md        (co-written summary)
//!   specs/rev-000001.variables.json
//!   specs/latest.json
//! ```
//!
//! Every write uses the temp-file + fsync + rename pattern, so
//! concurrent readers never observe partial content. The revision file
//! of a spec is written after its companions: a revision that exists is
//! complete.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use credenza_protocol::brief::DesignIntentBrief;
use credenza_protocol::draft::Draft;
use credenza_protocol::ledger::RunMetadata;
use credenza_protocol::spec::ParametricSpec;
use credenza_protocol::variables::VariableMapping;

use super::{ProjectStore, RevisionKind, StoreError};

pub struct FsProjectStore {
    root: PathBuf,
}

impl FsProjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn project_dir(&self, project: Uuid) -> PathBuf {
        self.root.join(project.to_string())
    }

    fn ledger_path(&self, project: Uuid) -> PathBuf {
        self.project_dir(project).join("ledger.json")
    }

    fn draft_path(&self, project: Uuid) -> PathBuf {
        self.project_dir(project).join("draft.json")
    }

    fn brief_path(&self, project: Uuid, revision: u32) -> PathBuf {
        self.project_dir(project)
            .join("briefs")
            .join(format!("rev-{revision:06}.json"))
    }

    fn brief_latest_path(&self, project: Uuid) -> PathBuf {
        self.project_dir(project).join("briefs").join("latest.json")
    }

    fn spec_path(&self, project: Uuid, revision: u32) -> PathBuf {
        self.project_dir(project)
            .join("specs")
            .join(format!("rev-{revision:06}.json"))
    }

    fn spec_latest_path(&self, project: Uuid) -> PathBuf {
        self.project_dir(project).join("specs").join("latest.json")
    }

    fn summary_path(&self, project: Uuid, revision: u32) -> PathBuf {
        self.project_dir(project)
            .join("specs")
            .join(format!("rev-{revision:06}.md"))
    }

    fn variables_path(&self, project: Uuid, revision: u32) -> PathBuf {
        self.project_dir(project)
            .join("specs")
            .join(format!("rev-{revision:06}.variables.json"))
    }

    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(value)?;
        write_atomic(path, json.as_bytes())
    }

    fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<T, StoreError> {
        let content = std::fs::read_to_string(path).map_err(|e| StoreError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(|e| StoreError::Corrupted {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

/// Write `bytes` to `path` via a temporary file in the same directory,
/// fsync, then atomic rename.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let parent = path.parent().ok_or_else(|| StoreError::Io {
        path: path.to_path_buf(),
        source: std::io::Error::other("path has no parent directory"),
    })?;
    std::fs::create_dir_all(parent).map_err(|e| StoreError::Io {
        path: parent.to_path_buf(),
        source: e,
    })?;

    let file_name = path
        .file_name()
        .and_then(std::ffi::OsStr::to_str)
        .ok_or_else(|| StoreError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::other("path has no file name"),
        })?;
    let temp_path = parent.join(format!(".{file_name}.tmp"));

    let mut file = std::fs::File::create(&temp_path).map_err(|e| StoreError::Io {
        path: temp_path.clone(),
        source: e,
    })?;
    file.write_all(bytes).map_err(|e| StoreError::Io {
        path: temp_path.clone(),
        source: e,
    })?;
    file.sync_all().map_err(|e| StoreError::Io {
        path: temp_path.clone(),
        source: e,
    })?;

    std::fs::rename(&temp_path, path).map_err(|e| StoreError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

impl ProjectStore for FsProjectStore {
    fn create_ledger(&self, ledger: &RunMetadata) -> Result<(), StoreError> {
        let path = self.ledger_path(ledger.project_id);
        if path.exists() {
            return Err(StoreError::LedgerExists {
                project: ledger.project_id,
            });
        }
        self.write_json(&path, ledger)
    }

    fn load_ledger(&self, project: Uuid) -> Result<RunMetadata, StoreError> {
        let path = self.ledger_path(project);
        if !path.exists() {
            return Err(StoreError::ProjectNotFound { project });
        }
        self.read_json(&path)
    }

    fn compare_and_swap_ledger(
        &self,
        expected_updated_at: DateTime<Utc>,
        ledger: &RunMetadata,
    ) -> Result<(), StoreError> {
        let current = self.load_ledger(ledger.project_id)?;
        if current.updated_at != expected_updated_at {
            return Err(StoreError::Conflict {
                project: ledger.project_id,
                expected: expected_updated_at,
                actual: current.updated_at,
            });
        }
        self.write_json(&self.ledger_path(ledger.project_id), ledger)
    }

    fn save_draft(&self, project: Uuid, draft: &Draft) -> Result<(), StoreError> {
        if !self.ledger_path(project).exists() {
            return Err(StoreError::ProjectNotFound { project });
        }
        self.write_json(&self.draft_path(project), draft)
    }

    fn load_draft(&self, project: Uuid) -> Result<Draft, StoreError> {
        let path = self.draft_path(project);
        if !path.exists() {
            return Err(StoreError::DraftNotFound { project });
        }
        self.read_json(&path)
    }

    fn put_brief(&self, brief: &DesignIntentBrief) -> Result<(), StoreError> {
        let path = self.brief_path(brief.project_id, brief.revision);
        if path.exists() {
            return Err(StoreError::RevisionExists {
                kind: RevisionKind::Brief,
                project: brief.project_id,
                revision: brief.revision,
            });
        }
        self.write_json(&path, brief)?;
        self.write_json(&self.brief_latest_path(brief.project_id), brief)
    }

    fn brief(&self, project: Uuid, revision: u32) -> Result<DesignIntentBrief, StoreError> {
        let path = self.brief_path(project, revision);
        if !path.exists() {
            return Err(StoreError::RevisionNotFound {
                kind: RevisionKind::Brief,
                project,
                revision,
            });
        }
        self.read_json(&path)
    }

    fn put_spec(
        &self,
        spec: &ParametricSpec,
        summary: &str,
        mapping: &VariableMapping,
    ) -> Result<(), StoreError> {
        let path = self.spec_path(spec.project_id, spec.revision);
        if path.exists() {
            return Err(StoreError::RevisionExists {
                kind: RevisionKind::Spec,
                project: spec.project_id,
                revision: spec.revision,
            });
        }
        // Companions first; the revision file lands last so an existing
        // revision is always complete.
        write_atomic(
            &self.summary_path(spec.project_id, spec.revision),
            summary.as_bytes(),
        )?;
        self.write_json(&self.variables_path(spec.project_id, spec.revision), mapping)?;
        self.write_json(&path, spec)?;
        self.write_json(&self.spec_latest_path(spec.project_id), spec)
    }

    fn spec(&self, project: Uuid, revision: u32) -> Result<ParametricSpec, StoreError> {
        let path = self.spec_path(project, revision);
        if !path.exists() {
            return Err(StoreError::RevisionNotFound {
                kind: RevisionKind::Spec,
                project,
                revision,
            });
        }
        self.read_json(&path)
    }

    fn summary(&self, project: Uuid, revision: u32) -> Result<String, StoreError> {
        let path = self.summary_path(project, revision);
        if !path.exists() {
            return Err(StoreError::RevisionNotFound {
                kind: RevisionKind::Spec,
                project,
                revision,
            });
        }
        std::fs::read_to_string(&path).map_err(|e| StoreError::Io { path, source: e })
    }

    fn variables(&self, project: Uuid, revision: u32) -> Result<VariableMapping, StoreError> {
        let path = self.variables_path(project, revision);
        if !path.exists() {
            return Err(StoreError::RevisionNotFound {
                kind: RevisionKind::Spec,
                project,
                revision,
            });
        }
        self.read_json(&path)
    }
}
