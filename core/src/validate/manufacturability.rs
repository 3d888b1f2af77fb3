//! Manufacturability checks.
//!
//! Derived-quantity feasibility over a schema-valid specification. All
//! checks operate on the unrounded PSPEC values and run independently,
//! so a single pass reports every violation. The mapper later rounds to
//! integer millimeters; at `.5` boundaries the two computations can
//! disagree by 1 mm, which is accepted and pinned by a mapper test
//! rather than resolved here.

use credenza_protocol::spec::{ParametricSpec, SpecComponent};

/// Minimum available depth for LP storage drawers: a 12" sleeve plus
/// runner hardware.
pub const MIN_LP_DRAWER_DEPTH_MM: f64 = 330.0;

/// Batched feasibility verdict.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Feasibility {
    pub ok: bool,
    pub errors: Vec<String>,
}

fn component_depth_check(
    errors: &mut Vec<String>,
    name: &str,
    component: &SpecComponent,
    available_depth: f64,
) {
    let required = component.depth_mm
        + component.clearance_mm.front_mm
        + component.clearance_mm.rear_mm;
    if required > available_depth {
        errors.push(format!(
            "{name} does not fit the available depth: {}mm deep + {}mm front + {}mm rear clearance = {required}mm exceeds {available_depth}mm",
            component.depth_mm, component.clearance_mm.front_mm, component.clearance_mm.rear_mm
        ));
    }
}

/// Check a specification for physical consistency.
pub fn check_manufacturability(spec: &ParametricSpec) -> Feasibility {
    let mut errors = Vec::new();
    let available_depth = spec.available_depth_mm();

    if available_depth <= 0.0 {
        errors.push(format!(
            "available depth must be positive: overall depth {}mm minus back clearance {}mm leaves {available_depth}mm",
            spec.overall.depth_mm, spec.constraints.back_clearance_mm
        ));
    } else {
        component_depth_check(&mut errors, "speakers", &spec.components.speakers, available_depth);
        component_depth_check(&mut errors, "amplifier", &spec.components.amplifier, available_depth);
        component_depth_check(&mut errors, "turntable", &spec.components.turntable, available_depth);
    }

    if spec.components.drawers.count > 0 && available_depth < MIN_LP_DRAWER_DEPTH_MM {
        errors.push(format!(
            "LP drawers need at least {MIN_LP_DRAWER_DEPTH_MM}mm of available depth, but only {available_depth}mm remains"
        ));
    }

    Feasibility {
        ok: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;

    use super::*;
    use crate::synthesizer::synthesize;
    use crate::synthesizer::tests::{sample_brief, sample_crg};

    fn spec_with(
        depth_mm: f64,
        back_clearance_mm: f64,
        drawer_count: u32,
    ) -> ParametricSpec {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single().expect("valid");
        let mut brief = sample_brief();
        brief.overall.depth_mm = depth_mm;
        brief.constraints.back_clearance_mm = back_clearance_mm;
        brief.drawers.count = drawer_count;
        synthesize(&brief, &"ab".repeat(32), &sample_crg(), 0, now)
    }

    #[test]
    fn feasible_spec_passes() {
        // 450 - 25 = 425 available; deepest component is the turntable at
        // 380 + 0 + 0.
        let verdict = check_manufacturability(&spec_with(450.0, 25.0, 2));
        assert!(verdict.ok, "unexpected errors: {:?}", verdict.errors);
        assert!(verdict.errors.is_empty());
    }

    #[test]
    fn negative_available_depth_is_reported() {
        let verdict = check_manufacturability(&spec_with(450.0, 440.0, 0));
        assert!(!verdict.ok);
        assert_eq!(verdict.errors.len(), 1);
        assert!(verdict.errors[0].contains("available depth must be positive"));
    }

    #[test]
    fn component_overflow_names_the_component() {
        // 400 - 25 = 375 available; turntable needs 380.
        let verdict = check_manufacturability(&spec_with(400.0, 25.0, 0));
        assert!(!verdict.ok);
        assert!(verdict.errors.iter().any(|e| e.starts_with("turntable")));
        assert!(!verdict.errors.iter().any(|e| e.starts_with("speakers")));
    }

    #[test]
    fn drawer_depth_conflict_cites_both_values() {
        // 350 - 50 = 300 available, below the 330 threshold.
        let verdict = check_manufacturability(&spec_with(350.0, 50.0, 2));
        assert!(!verdict.ok);
        let drawer_error = verdict
            .errors
            .iter()
            .find(|e| e.contains("LP drawers"))
            .expect("drawer error present");
        assert!(drawer_error.contains("330"));
        assert!(drawer_error.contains("300"));
    }

    #[test]
    fn no_drawer_check_when_count_is_zero() {
        let verdict = check_manufacturability(&spec_with(350.0, 50.0, 0));
        assert!(!verdict.errors.iter().any(|e| e.contains("LP drawers")));
    }

    #[test]
    fn all_violations_reported_in_one_pass() {
        // 300 - 25 = 275: turntable (380) and amplifier (350 + 20) both
        // overflow, and the drawer threshold fails too.
        let verdict = check_manufacturability(&spec_with(300.0, 25.0, 1));
        assert!(!verdict.ok);
        assert_eq!(verdict.errors.len(), 3);
    }
}
