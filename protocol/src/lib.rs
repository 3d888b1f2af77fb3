//! Data model for the credenza specification pipeline.
//!
//! Every record that crosses a pipeline boundary lives here: the mutable
//! answer [`Draft`], the immutable [`DesignIntentBrief`] and
//! [`ParametricSpec`] revisions, reference-geometry metadata, approval
//! records, the per-project [`RunMetadata`] ledger, and the CAD variable
//! mapping types. The crate also owns canonical (sorted-key) JSON
//! serialization and SHA-256 content addressing, so that every consumer
//! hashes revisions the same way.

pub mod approval;
pub mod brief;
pub mod canonical;
pub mod draft;
pub mod geometry;
pub mod ledger;
pub mod spec;
pub mod variables;

pub use approval::{ApprovalRecord, ApprovalState, ProjectApproval};
pub use brief::{
    AccessOptions, AmplifierBrief, BriefComponents, BriefConstraints, DIB_VERSION,
    DesignIntentBrief, DrawerBrief, IsolationStrategy, MaterialSpec, OutputOptions, OutputProfile,
    OverallDimensions, SpeakerBrief, TurntableBrief,
};
pub use canonical::{canonical_json, content_hash};
pub use draft::Draft;
pub use geometry::{CrgMeta, MeshFormat};
pub use ledger::{DibRevisionSummary, RunMetadata, SpecRevisionSummary};
pub use spec::{
    ClearanceEnvelope, DibProvenance, PSPEC_VERSION, ParametricSpec, SpecComponent,
    SpecComponents, SpecDrawers, SpecInputs,
};
pub use variables::{MappedVariable, VariableMapping, VariableSource, VariableUnit};
