//! The Onshape template variable contract.
//!
//! A fixed table of required variables: uppercase-snake-case name, unit,
//! and inclusive integer range. The contract version is data and is
//! bumped only on breaking changes to naming, rounding, or units -
//! the template and this table move in lockstep.

use credenza_protocol::variables::VariableUnit;

/// Version of the variable contract shared with the Onshape template.
pub const ONSHAPE_CONTRACT_VERSION: &str = "0.1.0";

/// One required variable of the contract.
#[derive(Clone, Copy, Debug)]
pub struct VariableSpec {
    pub name: &'static str,
    pub unit: VariableUnit,
    pub min: i64,
    pub max: i64,
}

const fn mm(name: &'static str) -> VariableSpec {
    VariableSpec {
        name,
        unit: VariableUnit::Mm,
        min: 1,
        max: 10_000,
    }
}

const fn clearance(name: &'static str) -> VariableSpec {
    VariableSpec {
        name,
        unit: VariableUnit::Mm,
        min: 0,
        max: 2_000,
    }
}

/// Every variable the template requires. Kept sorted by name so the
/// table itself documents the mapper's output order.
pub const REQUIRED_VARIABLES: &[VariableSpec] = &[
    clearance("AMP_CLR_B"),
    clearance("AMP_CLR_BK"),
    clearance("AMP_CLR_F"),
    clearance("AMP_CLR_L"),
    clearance("AMP_CLR_R"),
    clearance("AMP_CLR_T"),
    mm("AMP_D"),
    mm("AMP_H"),
    mm("AMP_W"),
    VariableSpec {
        name: "DRAWER_COUNT",
        unit: VariableUnit::Count,
        min: 0,
        max: 6,
    },
    VariableSpec {
        name: "DRAWER_LP_CAPACITY",
        unit: VariableUnit::Count,
        min: 0,
        max: 3_000,
    },
    mm("MAT_THICKNESS"),
    VariableSpec {
        name: "MAT_TYPE_CODE",
        unit: VariableUnit::EnumCode,
        min: 1,
        max: 4,
    },
    mm("OVERALL_AVAILABLE_DEPTH"),
    VariableSpec {
        name: "OVERALL_BACK_CLEARANCE",
        unit: VariableUnit::Mm,
        min: 0,
        max: 2_000,
    },
    mm("OVERALL_D"),
    mm("OVERALL_H"),
    mm("OVERALL_W"),
    VariableSpec {
        name: "REAR_HATCH",
        unit: VariableUnit::Flag,
        min: 0,
        max: 1,
    },
    clearance("SPK_L_CLR_B"),
    clearance("SPK_L_CLR_BK"),
    clearance("SPK_L_CLR_F"),
    clearance("SPK_L_CLR_L"),
    clearance("SPK_L_CLR_R"),
    clearance("SPK_L_CLR_T"),
    mm("SPK_L_D"),
    mm("SPK_L_H"),
    mm("SPK_L_W"),
    clearance("SPK_R_CLR_B"),
    clearance("SPK_R_CLR_BK"),
    clearance("SPK_R_CLR_F"),
    clearance("SPK_R_CLR_L"),
    clearance("SPK_R_CLR_R"),
    clearance("SPK_R_CLR_T"),
    mm("SPK_R_D"),
    mm("SPK_R_H"),
    mm("SPK_R_W"),
    clearance("TT_CLR_B"),
    clearance("TT_CLR_BK"),
    clearance("TT_CLR_F"),
    clearance("TT_CLR_L"),
    clearance("TT_CLR_R"),
    clearance("TT_CLR_T"),
    mm("TT_D"),
    mm("TT_H"),
    mm("TT_W"),
    VariableSpec {
        name: "VENT_DIR_CODE",
        unit: VariableUnit::EnumCode,
        min: 0,
        max: 2,
    },
];

/// Material kind → template code. The mapper is the single authority
/// for this set; an out-of-table value is an `INVALID_VALUE` issue,
/// never a default.
pub const MATERIAL_CODES: &[(&str, i64)] = &[
    ("plywood", 1),
    ("mdf", 2),
    ("veneer_plywood", 3),
    ("other", 4),
];

/// Ventilation direction → template code.
pub const VENTILATION_CODES: &[(&str, i64)] = &[("none", 0), ("top", 1), ("rear", 2)];

/// Look up a variable's contract entry.
pub fn variable_spec(name: &str) -> Option<&'static VariableSpec> {
    REQUIRED_VARIABLES.iter().find(|v| v.name == name)
}

pub fn material_code(kind: &str) -> Option<i64> {
    MATERIAL_CODES
        .iter()
        .find(|(name, _)| *name == kind)
        .map(|(_, code)| *code)
}

pub fn ventilation_code(direction: &str) -> Option<i64> {
    VENTILATION_CODES
        .iter()
        .find(|(name, _)| *name == direction)
        .map(|(_, code)| *code)
}

/// Whether `name` is a legal template variable name
/// (`^[A-Z][A-Z0-9_]*$`).
pub fn is_valid_variable_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
