//! The Design Intent Brief (DIB).
//!
//! A DIB is the authoritative, fully typed record of the user's confirmed
//! answers. Revisions are immutable once written and strictly increasing
//! per project; a later confirmation supersedes (never mutates) earlier
//! revisions.
//!
//! `material.kind` and `components.amplifier.ventilation` are kept as
//! validated strings rather than closed enums: the CAD variable mapper's
//! code tables are the single authority for their value sets, and an
//! out-of-set value must surface there as an `INVALID_VALUE` mapping
//! issue instead of failing deserialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Version tag stamped into every persisted DIB revision.
pub const DIB_VERSION: &str = "0.1.0";

/// Outer bounding dimensions of the cabinet, in millimeters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverallDimensions {
    pub width_mm: f64,
    pub height_mm: f64,
    pub depth_mm: f64,
}

/// Cabinet material selection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaterialSpec {
    /// One of `plywood`, `mdf`, `veneer_plywood`, `other`.
    pub kind: String,
    /// Sheet thickness in millimeters.
    pub thickness_mm: f64,
    /// Free-text description, collected only when `kind` is `other`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_note: Option<String>,
}

/// Hard constraints reserved before any component placement.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BriefConstraints {
    /// Depth reserved behind the carcass for cabling and wall offset.
    pub back_clearance_mm: f64,
}

/// How a component is decoupled from the carcass.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IsolationStrategy {
    None,
    FoamPads,
    Spikes,
}

/// External envelope of the symmetric speaker pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeakerBrief {
    pub width_mm: f64,
    pub height_mm: f64,
    pub depth_mm: f64,
    pub isolation: IsolationStrategy,
}

/// External envelope of the turntable.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurntableBrief {
    pub width_mm: f64,
    pub height_mm: f64,
    pub depth_mm: f64,
}

/// External envelope of the amplifier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AmplifierBrief {
    pub width_mm: f64,
    pub height_mm: f64,
    pub depth_mm: f64,
    /// One of `none`, `top`, `rear`.
    pub ventilation: String,
}

/// The black-box equipment the cabinet must house.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BriefComponents {
    /// Single scalar clearance the user requires around powered
    /// components; expanded to six-sided envelopes at synthesis.
    pub required_clearance_mm: f64,
    pub speakers: SpeakerBrief,
    pub turntable: TurntableBrief,
    pub amplifier: AmplifierBrief,
}

/// LP drawer configuration.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct DrawerBrief {
    pub count: u32,
    /// Total LP capacity across drawers; 0 when no drawers are fitted.
    pub lp_capacity: u32,
}

/// Access options for the rear of the cabinet.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct AccessOptions {
    pub rear_hatch: bool,
}

/// Downstream export profile.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputProfile {
    Step,
    Parasolid,
    Drawings,
}

/// Output configuration.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct OutputOptions {
    pub profile: OutputProfile,
}

/// A confirmed, immutable brief revision.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DesignIntentBrief {
    /// Record schema version (`DIB_VERSION`).
    pub dib_version: String,
    pub project_id: Uuid,
    /// Positive, strictly increasing per project.
    pub revision: u32,
    pub created_at: DateTime<Utc>,
    /// Identical to `created_at`: confirmation is synchronous with
    /// creation in this design.
    pub confirmed_at: DateTime<Utc>,
    pub overall: OverallDimensions,
    pub material: MaterialSpec,
    pub constraints: BriefConstraints,
    pub components: BriefComponents,
    pub drawers: DrawerBrief,
    pub access: AccessOptions,
    pub output: OutputOptions,
    /// Always `true` for a written revision; kept explicit because the
    /// confirmation answer is part of the brief contract.
    pub confirmed: bool,
}
