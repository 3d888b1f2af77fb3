//! Human-readable PSPEC summary.
//!
//! A deterministic markdown rendering of a specification revision,
//! co-written with every persisted PSPEC. Pure presentation: every line
//! is derived from the record, so the summary can never diverge from the
//! specification it accompanies.

use credenza_protocol::spec::{ClearanceEnvelope, ParametricSpec, SpecComponent};

fn short_hash(hash: &str) -> &str {
    hash.get(..12).unwrap_or(hash)
}

fn clearance_line(c: &ClearanceEnvelope) -> String {
    format!(
        "L {} / R {} / T {} / B {} / F {} / Rr {} mm",
        c.left_mm, c.right_mm, c.top_mm, c.bottom_mm, c.front_mm, c.rear_mm
    )
}

fn component_section(out: &mut String, title: &str, c: &SpecComponent) {
    out.push_str(&format!("### {title}\n\n"));
    out.push_str(&format!(
        "- External envelope: {} × {} × {} mm (W×H×D)\n",
        c.width_mm, c.height_mm, c.depth_mm
    ));
    out.push_str(&format!("- Clearance: {}\n", clearance_line(&c.clearance_mm)));
    if let Some(isolation) = c.isolation {
        out.push_str(&format!("- Isolation: {isolation:?}\n"));
    }
    if let Some(ventilation) = &c.ventilation {
        out.push_str(&format!("- Ventilation: {ventilation}\n"));
    }
    out.push('\n');
}

/// Render the markdown summary for a specification revision.
pub fn render_summary(spec: &ParametricSpec) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "# Parametric Specification - revision {}\n\n",
        spec.revision
    ));
    out.push_str(&format!(
        "Project `{}` · pspec_version {} · generated {}\n\n",
        spec.project_id,
        spec.pspec_version,
        spec.created_at.to_rfc3339()
    ));

    out.push_str("## Inputs\n\n");
    out.push_str(&format!(
        "- Design brief: revision {} (sha256 `{}`)\n",
        spec.inputs.dib.revision,
        short_hash(&spec.inputs.dib.content_hash)
    ));
    out.push_str(&format!(
        "- Reference geometry: `{}` ({}, {} bytes, sha256 `{}`) - metadata only, contributes no dimensions\n\n",
        spec.inputs.crg.filename,
        spec.inputs.crg.format.as_str(),
        spec.inputs.crg.size_bytes,
        short_hash(&spec.inputs.crg.content_hash)
    ));

    out.push_str("## Cabinet\n\n");
    out.push_str(&format!(
        "- Overall: {} × {} × {} mm (W×H×D)\n",
        spec.overall.width_mm, spec.overall.height_mm, spec.overall.depth_mm
    ));
    out.push_str(&format!(
        "- Material: {} @ {} mm{}\n",
        spec.material.kind,
        spec.material.thickness_mm,
        spec.material
            .custom_note
            .as_deref()
            .map(|note| format!(" ({note})"))
            .unwrap_or_default()
    ));
    out.push_str(&format!(
        "- Back clearance: {} mm (available depth {} mm)\n",
        spec.constraints.back_clearance_mm,
        spec.available_depth_mm()
    ));
    out.push_str(&format!(
        "- Rear hatch: {}\n",
        if spec.access.rear_hatch { "yes" } else { "no" }
    ));
    out.push_str(&format!("- Output profile: {:?}\n\n", spec.output.profile));

    out.push_str("## Components\n\n");
    component_section(&mut out, "Speakers (symmetric pair)", &spec.components.speakers);
    component_section(&mut out, "Turntable", &spec.components.turntable);
    component_section(&mut out, "Amplifier", &spec.components.amplifier);

    out.push_str("### Drawers\n\n");
    out.push_str(&format!(
        "- Count: {} · LP capacity: {}\n",
        spec.components.drawers.count, spec.components.drawers.lp_capacity
    ));

    out
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;

    use super::*;
    use crate::synthesizer::synthesize;
    use crate::synthesizer::tests::{sample_brief, sample_crg};

    #[test]
    fn summary_is_deterministic() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single().expect("valid");
        let spec = synthesize(&sample_brief(), "deadbeef", &sample_crg(), 0, now);
        assert_eq!(render_summary(&spec), render_summary(&spec));
    }

    #[test]
    fn summary_renders_spec_fields() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single().expect("valid");
        let spec = synthesize(&sample_brief(), "deadbeef", &sample_crg(), 0, now);
        let summary = render_summary(&spec);
        assert!(summary.contains("revision 1"));
        assert!(summary.contains("2000 × 900 × 450 mm"));
        assert!(summary.contains("available depth 425 mm"));
        assert!(summary.contains("concept.stl"));
        assert!(summary.contains("contributes no dimensions"));
    }
}
