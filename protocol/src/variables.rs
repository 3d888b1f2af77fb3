//! CAD variable-map types.
//!
//! The mapper in `credenza-core` projects a validated PSPEC into a flat
//! set of named integer variables for the parametric Onshape template.
//! These are the persisted result shapes; the contract table (names,
//! ranges, code tables) lives next to the mapper.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unit of a mapped variable.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableUnit {
    Mm,
    Count,
    Flag,
    EnumCode,
}

/// Where a variable's value came from.
///
/// Threaded through the mapper as a first-class classification; tests and
/// UI query it per variable.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableSource {
    /// Copied from a user-confirmed brief field.
    Dib,
    /// Fixed by this specification version, not user-configurable.
    Default,
    /// Computed from other fields at synthesis or mapping time.
    Derived,
}

/// One mapped variable with full provenance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MappedVariable {
    /// Uppercase-snake-case name matching `^[A-Z][A-Z0-9_]*$`.
    pub name: String,
    /// Integer value after rounding; millimeters for `Mm` variables.
    pub value: i64,
    pub unit: VariableUnit,
    pub source: VariableSource,
    /// JSON pointer into the PSPEC the value was computed from.
    pub pointer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// The all-or-nothing mapping result: either every required variable is
/// present and valid, or nothing is persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariableMapping {
    /// Version of the variable-naming/rounding/unit contract.
    pub contract_version: String,
    pub project_id: Uuid,
    /// The PSPEC revision this mapping was produced from.
    pub pspec_revision: u32,
    /// Flat name → value map (sorted by name).
    pub variables: BTreeMap<String, i64>,
    /// One entry per variable, sorted by name; stable across runs.
    pub provenance: Vec<MappedVariable>,
}
