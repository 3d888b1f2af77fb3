//! End-to-end pipeline tests over both store implementations.

use serde_json::json;
use uuid::Uuid;

use credenza_core::engine::{BlockReason, ConfirmOutcome, GenerateOutcome, PipelineEngine};
use credenza_core::store::fs::FsProjectStore;
use credenza_core::store::memory::MemoryProjectStore;
use credenza_core::store::{ProjectStore, StoreError};
use credenza_core::{CoreError, check_manufacturability};
use credenza_protocol::approval::ApprovalState;
use credenza_protocol::canonical::bytes_hash;
use credenza_protocol::geometry::{CrgMeta, MeshFormat};

fn sample_crg() -> CrgMeta {
    let payload = b"solid concept\nendsolid concept\n";
    CrgMeta {
        filename: "concept.stl".to_string(),
        format: MeshFormat::Stl,
        size_bytes: payload.len() as u64,
        content_hash: bytes_hash(payload),
        uploaded_at: chrono::Utc::now(),
    }
}

fn fill_valid_draft<S: ProjectStore>(engine: &PipelineEngine<S>, project: Uuid) {
    let answers = [
        ("overall.width_mm", json!(2000.0)),
        ("overall.height_mm", json!(900.0)),
        ("overall.depth_mm", json!(450.0)),
        ("constraints.back_clearance_mm", json!(25.0)),
        ("material.kind", json!("plywood")),
        ("material.thickness_mm", json!(18.0)),
        ("components.speakers.width_mm", json!(200.0)),
        ("components.speakers.height_mm", json!(300.0)),
        ("components.speakers.depth_mm", json!(250.0)),
        ("components.speakers.isolation", json!("foam_pads")),
        ("components.turntable.width_mm", json!(450.0)),
        ("components.turntable.height_mm", json!(150.0)),
        ("components.turntable.depth_mm", json!(380.0)),
        ("components.amplifier.width_mm", json!(430.0)),
        ("components.amplifier.height_mm", json!(120.0)),
        ("components.amplifier.depth_mm", json!(350.0)),
        ("components.amplifier.ventilation", json!("top")),
        ("components.required_clearance_mm", json!(10.0)),
        ("drawers.count", json!(2)),
        ("drawers.lp_capacity", json!(120)),
        ("access.rear_hatch", json!(true)),
        ("output.profile", json!("step")),
        ("confirm", json!(true)),
    ];
    for (path, value) in answers {
        engine
            .set_draft_answer(project, path, value)
            .expect("draft save");
    }
}

fn confirmed_revision(outcome: ConfirmOutcome) -> u32 {
    match outcome {
        ConfirmOutcome::Confirmed { revision, .. } => revision,
        ConfirmOutcome::Rejected { issues } => panic!("unexpected rejection: {issues:?}"),
    }
}

fn generated_revision(outcome: GenerateOutcome) -> u32 {
    match outcome {
        GenerateOutcome::Generated { revision, .. } => revision,
        GenerateOutcome::Blocked(reason) => panic!("unexpected block: {reason:?}"),
    }
}

#[test]
fn happy_path_draft_to_approved_variables() {
    let engine = PipelineEngine::new(MemoryProjectStore::new()).expect("engine");
    let project = engine
        .create_project(Some("listening room".into()))
        .expect("create")
        .project_id;

    fill_valid_draft(&engine, project);
    engine
        .register_geometry(project, sample_crg())
        .expect("register geometry");

    let revision = confirmed_revision(engine.confirm_brief(project).expect("confirm"));
    assert_eq!(revision, 1);

    let spec_revision = generated_revision(engine.generate_spec(project).expect("generate"));
    assert_eq!(spec_revision, 1);

    let mapping = engine.variables(project, 0).expect("variables");
    assert_eq!(mapping.variables["OVERALL_AVAILABLE_DEPTH"], 425);
    assert_eq!(mapping.variables["SPK_L_CLR_F"], 10);
    assert_eq!(mapping.pspec_revision, 1);

    let status = engine.status(project).expect("status");
    assert_eq!(status.approval.state, ApprovalState::Pending);
    assert_eq!(status.approval.revision, Some(1));
    assert_eq!(status.specs[0].dib_revision, 1);

    let status = engine.approve(project, 1).expect("approve");
    assert_eq!(status.approval.state, ApprovalState::Approved);
    assert_eq!(status.specs[0].approval.state, ApprovalState::Approved);

    let summary = engine.summary(project, 1).expect("summary");
    assert!(summary.contains("Parametric Specification - revision 1"));
}

#[test]
fn fs_store_persists_across_instances() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let root = dir.path().join("projects");

    let project = {
        let engine = PipelineEngine::new(FsProjectStore::new(&root)).expect("engine");
        let project = engine.create_project(None).expect("create").project_id;
        fill_valid_draft(&engine, project);
        engine
            .register_geometry(project, sample_crg())
            .expect("register geometry");
        engine.confirm_brief(project).expect("confirm");
        engine.generate_spec(project).expect("generate");
        project
    };

    // A fresh engine over the same root sees the persisted state.
    let engine = PipelineEngine::new(FsProjectStore::new(&root)).expect("engine");
    let status = engine.status(project).expect("status");
    assert_eq!(status.briefs.len(), 1);
    assert_eq!(status.specs.len(), 1);
    assert_eq!(status.approval.state, ApprovalState::Pending);

    let spec = engine.spec(project, 1).expect("spec");
    assert_eq!(spec.revision, 1);
    assert_eq!(spec.inputs.dib.revision, 1);
    assert_eq!(spec.inputs.dib.content_hash, status.briefs[0].content_hash);

    let mapping = engine.variables(project, 1).expect("variables");
    assert_eq!(mapping.variables["OVERALL_AVAILABLE_DEPTH"], 425);
}

#[test]
fn revisions_are_monotonic_and_gapless() {
    let engine = PipelineEngine::new(MemoryProjectStore::new()).expect("engine");
    let project = engine.create_project(None).expect("create").project_id;
    fill_valid_draft(&engine, project);
    engine
        .register_geometry(project, sample_crg())
        .expect("register geometry");

    for expected in 1..=3 {
        // Tweak the draft so each revision has distinct content.
        engine
            .set_draft_answer(project, "overall.width_mm", json!(2000.0 + f64::from(expected)))
            .expect("draft save");
        let revision = confirmed_revision(engine.confirm_brief(project).expect("confirm"));
        assert_eq!(revision, u32::try_from(expected).expect("small"));
    }

    for expected in 1..=2u32 {
        let revision = generated_revision(engine.generate_spec(project).expect("generate"));
        assert_eq!(revision, expected);
    }

    let status = engine.status(project).expect("status");
    let brief_revisions: Vec<u32> = status.briefs.iter().map(|b| b.revision).collect();
    let spec_revisions: Vec<u32> = status.specs.iter().map(|s| s.revision).collect();
    assert_eq!(brief_revisions, vec![1, 2, 3]);
    assert_eq!(spec_revisions, vec![1, 2]);
}

#[test]
fn new_brief_resets_project_approval_but_not_revision_record() {
    let engine = PipelineEngine::new(MemoryProjectStore::new()).expect("engine");
    let project = engine.create_project(None).expect("create").project_id;
    fill_valid_draft(&engine, project);
    engine
        .register_geometry(project, sample_crg())
        .expect("register geometry");

    engine.confirm_brief(project).expect("confirm");
    engine.generate_spec(project).expect("generate");
    engine.approve(project, 1).expect("approve");

    // Confirming a new brief unconditionally resets the pointer.
    engine
        .set_draft_answer(project, "overall.width_mm", json!(1800.0))
        .expect("draft save");
    engine.confirm_brief(project).expect("confirm again");

    let status = engine.status(project).expect("status");
    assert_eq!(status.approval.state, ApprovalState::None);
    assert_eq!(status.approval.revision, None);
    // The approved revision's own record is untouched.
    assert_eq!(status.specs[0].approval.state, ApprovalState::Approved);
}

#[test]
fn rejected_revision_can_be_superseded() {
    let engine = PipelineEngine::new(MemoryProjectStore::new()).expect("engine");
    let project = engine.create_project(None).expect("create").project_id;
    fill_valid_draft(&engine, project);
    engine
        .register_geometry(project, sample_crg())
        .expect("register geometry");
    engine.confirm_brief(project).expect("confirm");

    engine.generate_spec(project).expect("generate");
    let status = engine.reject(project, 1).expect("reject");
    assert_eq!(status.approval.state, ApprovalState::Rejected);

    let revision = generated_revision(engine.generate_spec(project).expect("generate again"));
    assert_eq!(revision, 2);
    let status = engine.status(project).expect("status");
    assert_eq!(status.approval.state, ApprovalState::Pending);
    assert_eq!(status.approval.revision, Some(2));
    assert_eq!(status.specs[0].approval.state, ApprovalState::Rejected);
}

#[test]
fn deciding_twice_is_refused() {
    let engine = PipelineEngine::new(MemoryProjectStore::new()).expect("engine");
    let project = engine.create_project(None).expect("create").project_id;
    fill_valid_draft(&engine, project);
    engine
        .register_geometry(project, sample_crg())
        .expect("register geometry");
    engine.confirm_brief(project).expect("confirm");
    engine.generate_spec(project).expect("generate");

    engine.approve(project, 1).expect("approve");
    let err = engine.reject(project, 1).expect_err("second decision");
    assert!(matches!(err, CoreError::Approval(_)));
}

#[test]
fn incomplete_draft_blocks_confirmation_but_not_saving() {
    let engine = PipelineEngine::new(MemoryProjectStore::new()).expect("engine");
    let project = engine.create_project(None).expect("create").project_id;

    engine
        .set_draft_answer(project, "overall.width_mm", json!(2000.0))
        .expect("saving a partial draft always succeeds");

    let outcome = engine.confirm_brief(project).expect("confirm runs");
    let ConfirmOutcome::Rejected { issues } = outcome else {
        panic!("partial draft must be rejected");
    };
    assert!(issues.len() > 10);

    // The raw draft is preserved for further editing.
    let draft = engine.draft(project).expect("draft still there");
    assert_eq!(draft.answer("overall.width_mm"), Some(&json!(2000.0)));
    assert_eq!(engine.status(project).expect("status").briefs.len(), 0);
}

#[test]
fn infeasible_depth_blocks_generation_and_persists_nothing() {
    let engine = PipelineEngine::new(MemoryProjectStore::new()).expect("engine");
    let project = engine.create_project(None).expect("create").project_id;
    fill_valid_draft(&engine, project);
    // 450 - 440 = 10mm available: positive, but nothing fits.
    engine
        .set_draft_answer(project, "constraints.back_clearance_mm", json!(440.0))
        .expect("draft save");
    engine
        .register_geometry(project, sample_crg())
        .expect("register geometry");
    engine.confirm_brief(project).expect("confirm");

    let outcome = engine.generate_spec(project).expect("generate runs");
    let GenerateOutcome::Blocked(BlockReason::Manufacturability(errors)) = outcome else {
        panic!("expected a manufacturability block, got {outcome:?}");
    };
    assert!(!errors.is_empty());

    let status = engine.status(project).expect("status");
    assert!(status.specs.is_empty());
    assert_eq!(status.approval.state, ApprovalState::None);
    assert!(matches!(
        engine.store().spec(project, 1),
        Err(StoreError::RevisionNotFound { .. })
    ));
}

#[test]
fn drawer_depth_conflict_blocks_generation() {
    let engine = PipelineEngine::new(MemoryProjectStore::new()).expect("engine");
    let project = engine.create_project(None).expect("create").project_id;
    fill_valid_draft(&engine, project);
    // 400 - 100 = 300mm available, below the 330mm LP drawer threshold.
    engine
        .set_draft_answer(project, "overall.depth_mm", json!(400.0))
        .expect("draft save");
    engine
        .set_draft_answer(project, "constraints.back_clearance_mm", json!(100.0))
        .expect("draft save");
    engine
        .set_draft_answer(project, "components.turntable.depth_mm", json!(280.0))
        .expect("draft save");
    engine
        .set_draft_answer(project, "components.amplifier.depth_mm", json!(270.0))
        .expect("draft save");
    engine
        .register_geometry(project, sample_crg())
        .expect("register geometry");
    engine.confirm_brief(project).expect("confirm");

    let outcome = engine.generate_spec(project).expect("generate runs");
    let GenerateOutcome::Blocked(BlockReason::Manufacturability(errors)) = outcome else {
        panic!("expected a manufacturability block, got {outcome:?}");
    };
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("LP drawers"));
}

#[test]
fn generation_requires_geometry_and_brief() {
    let engine = PipelineEngine::new(MemoryProjectStore::new()).expect("engine");
    let project = engine.create_project(None).expect("create").project_id;

    let err = engine.generate_spec(project).expect_err("no geometry yet");
    assert!(matches!(err, CoreError::GeometryNotRegistered { .. }));

    engine
        .register_geometry(project, sample_crg())
        .expect("register geometry");
    let err = engine.generate_spec(project).expect_err("no brief yet");
    assert!(matches!(err, CoreError::BriefNotConfirmed { .. }));
}

#[test]
fn stored_spec_passes_manufacturability_on_reload() {
    // The persisted record and the in-memory record validate identically.
    let engine = PipelineEngine::new(MemoryProjectStore::new()).expect("engine");
    let project = engine.create_project(None).expect("create").project_id;
    fill_valid_draft(&engine, project);
    engine
        .register_geometry(project, sample_crg())
        .expect("register geometry");
    engine.confirm_brief(project).expect("confirm");
    engine.generate_spec(project).expect("generate");

    let reloaded = engine.spec(project, 1).expect("spec");
    let verdict = check_manufacturability(&reloaded);
    assert!(verdict.ok);
}
