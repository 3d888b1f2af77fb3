//! Deterministic PSPEC → variable mapping.
//!
//! A total function over a schema-valid specification. Dimensional
//! values are rounded to integer millimeters with `f64::round`
//! (half-away-from-zero; for the non-negative dimensions of this domain
//! that is round-half-up) and range-checked against the contract table -
//! never clamped. Booleans become 0/1 flags, enum strings go through the
//! fixed code tables, and any single violation discards the entire
//! result: no partial variable set is ever returned or persisted.

use std::collections::BTreeMap;

use credenza_protocol::spec::{ClearanceEnvelope, ParametricSpec};
use credenza_protocol::variables::{
    MappedVariable, VariableMapping, VariableSource, VariableUnit,
};

use super::contract::{
    ONSHAPE_CONTRACT_VERSION, material_code, variable_spec, ventilation_code,
};

/// Machine-readable issue categories, stable for test assertions and UI.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IssueCode {
    /// Enum value outside the code table.
    InvalidValue,
    /// Rounded value outside the variable's declared range.
    OutOfRange,
    /// Non-finite number reached the mapper.
    NotFinite,
    /// Variable missing from the contract table; a mapper/contract skew.
    UnknownVariable,
}

impl IssueCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidValue => "INVALID_VALUE",
            Self::OutOfRange => "OUT_OF_RANGE",
            Self::NotFinite => "NOT_FINITE",
            Self::UnknownVariable => "UNKNOWN_VARIABLE",
        }
    }
}

/// One mapping violation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MappingIssue {
    pub variable: String,
    pub pointer: String,
    pub code: IssueCode,
    pub message: String,
}

struct MapperRun {
    variables: Vec<MappedVariable>,
    issues: Vec<MappingIssue>,
}

impl MapperRun {
    fn new() -> Self {
        Self {
            variables: Vec::new(),
            issues: Vec::new(),
        }
    }

    fn issue(&mut self, name: &str, pointer: &str, code: IssueCode, message: String) {
        self.issues.push(MappingIssue {
            variable: name.to_string(),
            pointer: pointer.to_string(),
            code,
            message,
        });
    }

    fn emit(
        &mut self,
        name: &str,
        value: i64,
        unit: VariableUnit,
        source: VariableSource,
        pointer: &str,
        note: Option<&str>,
    ) {
        let Some(spec) = variable_spec(name) else {
            self.issue(
                name,
                pointer,
                IssueCode::UnknownVariable,
                format!("`{name}` is not part of contract {ONSHAPE_CONTRACT_VERSION}"),
            );
            return;
        };
        if value < spec.min || value > spec.max {
            self.issue(
                name,
                pointer,
                IssueCode::OutOfRange,
                format!(
                    "{value} is outside the declared range {}..={} for {name}",
                    spec.min, spec.max
                ),
            );
            return;
        }
        self.variables.push(MappedVariable {
            name: name.to_string(),
            value,
            unit,
            source,
            pointer: pointer.to_string(),
            note: note.map(str::to_string),
        });
    }

    /// Round a dimensional value and emit it as a millimeter variable.
    fn mm(&mut self, name: &str, raw: f64, source: VariableSource, pointer: &str, note: Option<&str>) {
        if !raw.is_finite() {
            self.issue(
                name,
                pointer,
                IssueCode::NotFinite,
                format!("{name} must be a finite number, got {raw}"),
            );
            return;
        }
        self.emit(name, raw.round() as i64, VariableUnit::Mm, source, pointer, note);
    }

    fn count(&mut self, name: &str, raw: u32, source: VariableSource, pointer: &str) {
        self.emit(name, i64::from(raw), VariableUnit::Count, source, pointer, None);
    }

    fn flag(&mut self, name: &str, raw: bool, source: VariableSource, pointer: &str) {
        self.emit(name, i64::from(raw), VariableUnit::Flag, source, pointer, None);
    }

    fn code(
        &mut self,
        name: &str,
        raw: &str,
        lookup: fn(&str) -> Option<i64>,
        pointer: &str,
    ) {
        match lookup(raw) {
            Some(code) => {
                self.emit(name, code, VariableUnit::EnumCode, VariableSource::Dib, pointer, None);
            }
            None => self.issue(
                name,
                pointer,
                IssueCode::InvalidValue,
                format!("`{raw}` at {pointer} has no code in {name}'s table"),
            ),
        }
    }

    /// Emit the six clearance variables of one component envelope.
    fn envelope(
        &mut self,
        prefix: &str,
        envelope: &ClearanceEnvelope,
        source: VariableSource,
        component_pointer: &str,
        note: Option<&str>,
    ) {
        let sides = [
            ("B", "bottom_mm", envelope.bottom_mm),
            ("BK", "rear_mm", envelope.rear_mm),
            ("F", "front_mm", envelope.front_mm),
            ("L", "left_mm", envelope.left_mm),
            ("R", "right_mm", envelope.right_mm),
            ("T", "top_mm", envelope.top_mm),
        ];
        for (suffix, field, value) in sides {
            let name = format!("{prefix}_CLR_{suffix}");
            let pointer = format!("{component_pointer}/clearance_mm/{field}");
            self.mm(&name, value, source, &pointer, note);
        }
    }
}

/// Project a specification into the template variable contract.
///
/// All-or-nothing: on any issue the entire result is discarded and the
/// sorted issue list is returned instead. On success both the flat map
/// and the provenance list are sorted by variable name, so repeated
/// calls on the same PSPEC are byte-identical.
pub fn map_to_variables(
    spec: &ParametricSpec,
) -> std::result::Result<VariableMapping, Vec<MappingIssue>> {
    let mut run = MapperRun::new();
    let dib = VariableSource::Dib;

    run.mm("OVERALL_W", spec.overall.width_mm, dib, "/overall/width_mm", None);
    run.mm("OVERALL_H", spec.overall.height_mm, dib, "/overall/height_mm", None);
    run.mm("OVERALL_D", spec.overall.depth_mm, dib, "/overall/depth_mm", None);
    run.mm(
        "OVERALL_BACK_CLEARANCE",
        spec.constraints.back_clearance_mm,
        dib,
        "/constraints/back_clearance_mm",
        None,
    );
    // Subtract first, round once. The manufacturability check uses the
    // unrounded difference; the two can differ by 1mm at .5 boundaries.
    run.mm(
        "OVERALL_AVAILABLE_DEPTH",
        spec.available_depth_mm(),
        VariableSource::Derived,
        "/overall/depth_mm",
        Some("overall.depth_mm - constraints.back_clearance_mm"),
    );

    run.mm(
        "MAT_THICKNESS",
        spec.material.thickness_mm,
        dib,
        "/material/thickness_mm",
        None,
    );
    run.code("MAT_TYPE_CODE", &spec.material.kind, material_code, "/material/kind");

    // The PSPEC models the speakers once as a symmetric pair; the
    // template wants independent left/right variables.
    let speaker_note = "duplicated from the symmetric speaker pair";
    for prefix in ["SPK_L", "SPK_R"] {
        let speakers = &spec.components.speakers;
        run.mm(
            &format!("{prefix}_W"),
            speakers.width_mm,
            dib,
            "/components/speakers/width_mm",
            Some(speaker_note),
        );
        run.mm(
            &format!("{prefix}_H"),
            speakers.height_mm,
            dib,
            "/components/speakers/height_mm",
            Some(speaker_note),
        );
        run.mm(
            &format!("{prefix}_D"),
            speakers.depth_mm,
            dib,
            "/components/speakers/depth_mm",
            Some(speaker_note),
        );
        run.envelope(
            prefix,
            &speakers.clearance_mm,
            VariableSource::Derived,
            "/components/speakers",
            Some(speaker_note),
        );
    }

    let turntable = &spec.components.turntable;
    run.mm("TT_W", turntable.width_mm, dib, "/components/turntable/width_mm", None);
    run.mm("TT_H", turntable.height_mm, dib, "/components/turntable/height_mm", None);
    run.mm("TT_D", turntable.depth_mm, dib, "/components/turntable/depth_mm", None);
    run.envelope(
        "TT",
        &turntable.clearance_mm,
        VariableSource::Default,
        "/components/turntable",
        Some("fixed at zero for pspec_version 0.1.0"),
    );

    let amplifier = &spec.components.amplifier;
    run.mm("AMP_W", amplifier.width_mm, dib, "/components/amplifier/width_mm", None);
    run.mm("AMP_H", amplifier.height_mm, dib, "/components/amplifier/height_mm", None);
    run.mm("AMP_D", amplifier.depth_mm, dib, "/components/amplifier/depth_mm", None);
    run.envelope(
        "AMP",
        &amplifier.clearance_mm,
        VariableSource::Derived,
        "/components/amplifier",
        None,
    );
    run.code(
        "VENT_DIR_CODE",
        amplifier.ventilation.as_deref().unwrap_or(""),
        ventilation_code,
        "/components/amplifier/ventilation",
    );

    run.count("DRAWER_COUNT", spec.components.drawers.count, dib, "/components/drawers/count");
    let capacity_source = if spec.components.drawers.count > 0 {
        dib
    } else {
        VariableSource::Default
    };
    run.count(
        "DRAWER_LP_CAPACITY",
        spec.components.drawers.lp_capacity,
        capacity_source,
        "/components/drawers/lp_capacity",
    );

    run.flag("REAR_HATCH", spec.access.rear_hatch, dib, "/access/rear_hatch");

    if !run.issues.is_empty() {
        run.issues.sort_by(|a, b| a.variable.cmp(&b.variable));
        return Err(run.issues);
    }

    run.variables.sort_by(|a, b| a.name.cmp(&b.name));
    let variables: BTreeMap<String, i64> = run
        .variables
        .iter()
        .map(|v| (v.name.clone(), v.value))
        .collect();

    Ok(VariableMapping {
        contract_version: ONSHAPE_CONTRACT_VERSION.to_string(),
        project_id: spec.project_id,
        pspec_revision: spec.revision,
        variables,
        provenance: run.variables,
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    use credenza_protocol::variables::VariableSource;

    use super::super::contract::REQUIRED_VARIABLES;
    use super::*;
    use crate::synthesizer::synthesize;
    use crate::synthesizer::tests::{sample_brief, sample_crg};

    fn sample_spec() -> ParametricSpec {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single().expect("valid");
        synthesize(&sample_brief(), &"ab".repeat(32), &sample_crg(), 0, now)
    }

    #[test]
    fn happy_path_scenario() {
        let mapping = map_to_variables(&sample_spec()).expect("mapping succeeds");
        assert_eq!(mapping.variables["OVERALL_AVAILABLE_DEPTH"], 425);
        assert_eq!(mapping.variables["SPK_L_CLR_F"], 10);
        assert_eq!(mapping.variables["OVERALL_W"], 2000);
        assert_eq!(mapping.variables["MAT_TYPE_CODE"], 1);
        assert_eq!(mapping.variables["VENT_DIR_CODE"], 1);
        assert_eq!(mapping.variables["DRAWER_COUNT"], 2);
        assert_eq!(mapping.variables["REAR_HATCH"], 1);
        assert_eq!(mapping.contract_version, ONSHAPE_CONTRACT_VERSION);
    }

    #[test]
    fn every_required_variable_is_emitted() {
        let mapping = map_to_variables(&sample_spec()).expect("mapping succeeds");
        assert_eq!(mapping.variables.len(), REQUIRED_VARIABLES.len());
        for required in REQUIRED_VARIABLES {
            assert!(
                mapping.variables.contains_key(required.name),
                "missing {}",
                required.name
            );
        }
    }

    #[test]
    fn mapping_is_idempotent() {
        let spec = sample_spec();
        let a = map_to_variables(&spec).expect("first run");
        let b = map_to_variables(&spec).expect("second run");
        assert_eq!(a, b);
        let a_json = serde_json::to_string(&a).expect("serialize");
        let b_json = serde_json::to_string(&b).expect("serialize");
        assert_eq!(a_json, b_json);
    }

    #[test]
    fn provenance_is_sorted_by_name() {
        let mapping = map_to_variables(&sample_spec()).expect("mapping succeeds");
        let names: Vec<&str> = mapping.provenance.iter().map(|v| v.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        let mut spec = sample_spec();
        spec.overall.width_mm = 100.4;
        spec.overall.height_mm = 100.5;
        let mapping = map_to_variables(&spec).expect("mapping succeeds");
        assert_eq!(mapping.variables["OVERALL_W"], 100);
        assert_eq!(mapping.variables["OVERALL_H"], 101);
    }

    #[test]
    fn available_depth_is_subtract_then_round() {
        let mut spec = sample_spec();
        // Exactly representable values so the difference is exactly 425.5.
        spec.overall.depth_mm = 450.25;
        spec.constraints.back_clearance_mm = 24.75;
        let mapping = map_to_variables(&spec).expect("mapping succeeds");
        // round(450.25 - 24.75) = round(425.5) = 426, while
        // round(450.25) - round(24.75) = 450 - 25 = 425. The contract
        // uses the former.
        assert_eq!(mapping.variables["OVERALL_AVAILABLE_DEPTH"], 426);
        assert_ne!(
            mapping.variables["OVERALL_AVAILABLE_DEPTH"],
            mapping.variables["OVERALL_D"] - mapping.variables["OVERALL_BACK_CLEARANCE"]
        );
    }

    #[test]
    fn speaker_variables_are_duplicated_left_and_right() {
        let mapping = map_to_variables(&sample_spec()).expect("mapping succeeds");
        assert_eq!(mapping.variables["SPK_L_W"], mapping.variables["SPK_R_W"]);
        assert_eq!(mapping.variables["SPK_L_CLR_T"], mapping.variables["SPK_R_CLR_T"]);
        let left = mapping
            .provenance
            .iter()
            .find(|v| v.name == "SPK_L_W")
            .expect("present");
        let right = mapping
            .provenance
            .iter()
            .find(|v| v.name == "SPK_R_W")
            .expect("present");
        assert_eq!(left.pointer, right.pointer);
    }

    #[test]
    fn source_classification_is_queryable_per_variable() {
        let mapping = map_to_variables(&sample_spec()).expect("mapping succeeds");
        let source_of = |name: &str| {
            mapping
                .provenance
                .iter()
                .find(|v| v.name == name)
                .map(|v| v.source)
                .expect("variable present")
        };
        assert_eq!(source_of("OVERALL_W"), VariableSource::Dib);
        assert_eq!(source_of("OVERALL_AVAILABLE_DEPTH"), VariableSource::Derived);
        assert_eq!(source_of("SPK_L_CLR_F"), VariableSource::Derived);
        assert_eq!(source_of("TT_CLR_T"), VariableSource::Default);
        assert_eq!(source_of("DRAWER_LP_CAPACITY"), VariableSource::Dib);
    }

    #[test]
    fn lp_capacity_is_default_sourced_without_drawers() {
        let mut spec = sample_spec();
        spec.components.drawers.count = 0;
        spec.components.drawers.lp_capacity = 0;
        let mapping = map_to_variables(&spec).expect("mapping succeeds");
        let capacity = mapping
            .provenance
            .iter()
            .find(|v| v.name == "DRAWER_LP_CAPACITY")
            .expect("present");
        assert_eq!(capacity.source, VariableSource::Default);
        assert_eq!(capacity.value, 0);
    }

    #[test]
    fn invalid_material_yields_invalid_value_issue() {
        let mut spec = sample_spec();
        spec.material.kind = "bamboo".to_string();
        let issues = map_to_variables(&spec).expect_err("mapping must fail");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].variable, "MAT_TYPE_CODE");
        assert_eq!(issues[0].code, IssueCode::InvalidValue);
        assert_eq!(issues[0].code.as_str(), "INVALID_VALUE");
        assert_eq!(issues[0].pointer, "/material/kind");
    }

    #[test]
    fn out_of_range_is_an_error_not_a_clamp() {
        let mut spec = sample_spec();
        spec.components.speakers.clearance_mm.top_mm = 2_500.0;
        let issues = map_to_variables(&spec).expect_err("mapping must fail");
        // Both duplicated speaker variables report it.
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].variable, "SPK_L_CLR_T");
        assert_eq!(issues[1].variable, "SPK_R_CLR_T");
        assert!(issues.iter().all(|i| i.code == IssueCode::OutOfRange));
    }

    #[test]
    fn issues_are_sorted_and_result_is_all_or_nothing() {
        let mut spec = sample_spec();
        spec.material.kind = "bamboo".to_string();
        spec.components.amplifier.ventilation = Some("bottom".to_string());
        spec.overall.depth_mm = f64::NAN;
        let issues = map_to_variables(&spec).expect_err("mapping must fail");
        let variables: Vec<&str> = issues.iter().map(|i| i.variable.as_str()).collect();
        let mut sorted = variables.clone();
        sorted.sort_unstable();
        assert_eq!(variables, sorted);
        // NAN depth poisons both OVERALL_D and the derived depth.
        assert!(variables.contains(&"MAT_TYPE_CODE"));
        assert!(variables.contains(&"VENT_DIR_CODE"));
        assert!(variables.contains(&"OVERALL_D"));
        assert!(variables.contains(&"OVERALL_AVAILABLE_DEPTH"));
    }
}
