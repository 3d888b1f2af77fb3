//! The Parametric Specification (PSPEC).
//!
//! A PSPEC revision is synthesized from exactly one DIB revision plus
//! reference-geometry metadata. It is immutable once written and records
//! full input provenance so any revision can be traced back to the brief
//! and mesh it was built from. Derived quantities (the six-sided
//! clearance envelopes) are computed once at synthesis time and frozen
//! into the record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::brief::{
    AccessOptions, BriefConstraints, IsolationStrategy, MaterialSpec, OutputOptions,
    OverallDimensions,
};
use crate::geometry::CrgMeta;

/// Version tag stamped into every persisted PSPEC revision.
pub const PSPEC_VERSION: &str = "0.1.0";

/// Six-sided clearance around a component envelope, in millimeters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClearanceEnvelope {
    pub left_mm: f64,
    pub right_mm: f64,
    pub top_mm: f64,
    pub bottom_mm: f64,
    pub front_mm: f64,
    pub rear_mm: f64,
}

impl ClearanceEnvelope {
    /// The same scalar applied to all six sides.
    pub fn symmetric(clearance_mm: f64) -> Self {
        Self {
            left_mm: clearance_mm,
            right_mm: clearance_mm,
            top_mm: clearance_mm,
            bottom_mm: clearance_mm,
            front_mm: clearance_mm,
            rear_mm: clearance_mm,
        }
    }

    /// No clearance on any side.
    pub fn zero() -> Self {
        Self::symmetric(0.0)
    }
}

/// Provenance of the DIB revision a PSPEC was synthesized from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DibProvenance {
    pub revision: u32,
    /// SHA-256 of the DIB's canonical serialization.
    pub content_hash: String,
}

/// Everything a PSPEC was built from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpecInputs {
    pub dib: DibProvenance,
    pub crg: CrgMeta,
}

/// A black-box component: external envelope plus frozen clearance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpecComponent {
    pub width_mm: f64,
    pub height_mm: f64,
    pub depth_mm: f64,
    pub clearance_mm: ClearanceEnvelope,
    /// Present for speakers and the turntable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isolation: Option<IsolationStrategy>,
    /// Present for the amplifier: one of `none`, `top`, `rear`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ventilation: Option<String>,
}

/// Drawer section of the specification.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SpecDrawers {
    pub count: u32,
    pub lp_capacity: u32,
}

/// The closed set of black-box components.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpecComponents {
    /// Modeled once for the symmetric pair; the mapper duplicates it
    /// into left/right variables.
    pub speakers: SpecComponent,
    pub turntable: SpecComponent,
    pub amplifier: SpecComponent,
    pub drawers: SpecDrawers,
}

/// An immutable, versioned parametric specification revision.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParametricSpec {
    /// Record schema version (`PSPEC_VERSION`).
    pub pspec_version: String,
    pub project_id: Uuid,
    /// Independent counter from the DIB revision counter.
    pub revision: u32,
    pub created_at: DateTime<Utc>,
    pub inputs: SpecInputs,
    pub overall: OverallDimensions,
    pub material: MaterialSpec,
    pub constraints: BriefConstraints,
    pub access: AccessOptions,
    pub output: OutputOptions,
    pub components: SpecComponents,
}

impl ParametricSpec {
    /// Usable depth once the rear clearance is reserved. Computed on the
    /// unrounded values; the mapper rounds the result once.
    pub fn available_depth_mm(&self) -> f64 {
        self.overall.depth_mm - self.constraints.back_clearance_mm
    }
}
