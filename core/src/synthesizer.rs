//! PSPEC synthesis.
//!
//! A pure projection of a confirmed brief plus geometry metadata into a
//! new specification revision. Synthesis performs no business
//! validation - its input already passed the normalizer, and the
//! specification validators run downstream as an independent safety net.

use chrono::{DateTime, Utc};

use credenza_protocol::brief::DesignIntentBrief;
use credenza_protocol::geometry::CrgMeta;
use credenza_protocol::spec::{
    ClearanceEnvelope, DibProvenance, PSPEC_VERSION, ParametricSpec, SpecComponent,
    SpecComponents, SpecDrawers, SpecInputs,
};

/// Synthesize the next PSPEC revision from a brief.
///
/// `dib_hash` is the content hash of the brief's canonical serialization,
/// computed by the caller so the same value lands in the ledger and in
/// the spec's provenance. The speaker and amplifier envelopes are DERIVED
/// from the brief's single clearance scalar (all six sides); the
/// turntable envelope is a DEFAULT of this specification version, fixed
/// at zero. The revision counter is independent of the brief's.
pub fn synthesize(
    dib: &DesignIntentBrief,
    dib_hash: &str,
    crg: &CrgMeta,
    prior_pspec_revision_count: u32,
    now: DateTime<Utc>,
) -> ParametricSpec {
    let derived = ClearanceEnvelope::symmetric(dib.components.required_clearance_mm);

    ParametricSpec {
        pspec_version: PSPEC_VERSION.to_string(),
        project_id: dib.project_id,
        revision: prior_pspec_revision_count + 1,
        created_at: now,
        inputs: SpecInputs {
            dib: DibProvenance {
                revision: dib.revision,
                content_hash: dib_hash.to_string(),
            },
            crg: crg.clone(),
        },
        overall: dib.overall,
        material: dib.material.clone(),
        constraints: dib.constraints,
        access: dib.access,
        output: dib.output,
        components: SpecComponents {
            speakers: SpecComponent {
                width_mm: dib.components.speakers.width_mm,
                height_mm: dib.components.speakers.height_mm,
                depth_mm: dib.components.speakers.depth_mm,
                clearance_mm: derived,
                isolation: Some(dib.components.speakers.isolation),
                ventilation: None,
            },
            turntable: SpecComponent {
                width_mm: dib.components.turntable.width_mm,
                height_mm: dib.components.turntable.height_mm,
                depth_mm: dib.components.turntable.depth_mm,
                clearance_mm: ClearanceEnvelope::zero(),
                isolation: None,
                ventilation: None,
            },
            amplifier: SpecComponent {
                width_mm: dib.components.amplifier.width_mm,
                height_mm: dib.components.amplifier.height_mm,
                depth_mm: dib.components.amplifier.depth_mm,
                clearance_mm: derived,
                isolation: None,
                ventilation: Some(dib.components.amplifier.ventilation.clone()),
            },
            drawers: SpecDrawers {
                count: dib.drawers.count,
                lp_capacity: dib.drawers.lp_capacity,
            },
        },
    }
}
