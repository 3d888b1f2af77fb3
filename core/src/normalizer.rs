//! Brief normalization: untyped draft in, typed immutable revision out.
//!
//! `normalize` walks the fixed question schema once, validating and
//! coercing each applicable answer, then applies the cross-field rules.
//! Every violation is accumulated - incompleteness is data, not an
//! exception - and a brief is only constructed when the issue list is
//! empty.

use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use credenza_protocol::brief::{
    AccessOptions, AmplifierBrief, BriefComponents, BriefConstraints, DIB_VERSION,
    DesignIntentBrief, DrawerBrief, IsolationStrategy, MaterialSpec, OutputOptions, OutputProfile,
    OverallDimensions, SpeakerBrief, TurntableBrief,
};
use credenza_protocol::draft::Draft;

use crate::questions::{
    Dependency, DependencyPredicate, QUESTIONS, Question, QuestionKind,
};

/// One validation problem, keyed by the draft path it concerns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationIssue {
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    fn new(path: &str, message: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

/// Normalize a draft into a new DIB revision.
///
/// Pure: the clock is injected, persistence is the store's job. Returns
/// the full issue list (in question order, cross-field rules last) when
/// anything is incomplete or invalid.
pub fn normalize(
    draft: &Draft,
    project_id: Uuid,
    prior_revision_count: u32,
    now: DateTime<Utc>,
) -> std::result::Result<DesignIntentBrief, Vec<ValidationIssue>> {
    let mut issues = Vec::new();
    let mut typed = TypedAnswers::default();

    for question in QUESTIONS {
        if !is_applicable(question, draft) {
            continue;
        }
        match draft.answer(question.path) {
            None | Some(Value::Null) => {
                if question.required {
                    issues.push(ValidationIssue::new(question.path, "required answer is missing"));
                }
            }
            Some(value) => match coerce(question, value) {
                Ok(answer) => typed.record(question.id, answer),
                Err(message) => issues.push(ValidationIssue::new(question.path, message)),
            },
        }
    }

    // Cross-field rule: the reserved rear clearance must leave usable
    // depth. Attached to the back-clearance path.
    if let (Some(depth), Some(back)) = (typed.overall_depth_mm, typed.back_clearance_mm)
        && back >= depth
    {
        issues.push(ValidationIssue::new(
            "constraints.back_clearance_mm",
            format!("back clearance ({back}mm) must be strictly less than overall depth ({depth}mm)"),
        ));
    }

    if !issues.is_empty() {
        return Err(issues);
    }

    match typed.into_brief(project_id, prior_revision_count + 1, now) {
        Some(brief) => Ok(brief),
        // Unreachable when the schema covers every brief field; kept as a
        // structured issue rather than a panic.
        None => Err(vec![ValidationIssue::new(
            "",
            "answers incomplete after validation; question schema does not cover the brief",
        )]),
    }
}

fn is_applicable(question: &Question, draft: &Draft) -> bool {
    let Some(Dependency { path, predicate }) = question.depends_on else {
        return true;
    };
    let value = draft.answer(path);
    match predicate {
        DependencyPredicate::Equals(expected) => {
            value.and_then(Value::as_str) == Some(expected)
        }
        DependencyPredicate::AtLeast(minimum) => {
            value.and_then(Value::as_f64).is_some_and(|v| v >= minimum)
        }
    }
}

/// A validated answer coerced to its declared type.
enum Coerced {
    Number(f64),
    Integer(i64),
    Bool(bool),
    Text(String),
}

fn coerce(question: &Question, value: &Value) -> std::result::Result<Coerced, String> {
    match question.kind {
        QuestionKind::Confirmation => match value {
            Value::Bool(true) => Ok(Coerced::Bool(true)),
            other => Err(format!("must be confirmed with exactly `true`, got {other}")),
        },
        QuestionKind::Boolean => value
            .as_bool()
            .map(Coerced::Bool)
            .ok_or_else(|| format!("expected a boolean, got {value}")),
        QuestionKind::Enum(options) => {
            let text = value
                .as_str()
                .ok_or_else(|| format!("expected one of {options:?}, got {value}"))?;
            if options.contains(&text) {
                Ok(Coerced::Text(text.to_string()))
            } else {
                Err(format!("`{text}` is not one of {options:?}"))
            }
        }
        QuestionKind::Integer { min, max } => {
            let n = value
                .as_i64()
                .ok_or_else(|| format!("expected an integer, got {value}"))?;
            if (min..=max).contains(&n) {
                Ok(Coerced::Integer(n))
            } else {
                Err(format!("{n} is outside the allowed range {min}..={max}"))
            }
        }
        QuestionKind::Number { min, max } => {
            let n = value
                .as_f64()
                .ok_or_else(|| format!("expected a number, got {value}"))?;
            if !n.is_finite() {
                return Err("expected a finite number".to_string());
            }
            if n < min || n > max {
                return Err(format!("{n} is outside the allowed range {min}..={max}"));
            }
            Ok(Coerced::Number(n))
        }
        QuestionKind::Text => value
            .as_str()
            .map(|s| Coerced::Text(s.to_string()))
            .ok_or_else(|| format!("expected text, got {value}")),
    }
}

/// Scratch space the fold fills in; turned into a brief once validation
/// passes.
#[derive(Default)]
struct TypedAnswers {
    overall_width_mm: Option<f64>,
    overall_height_mm: Option<f64>,
    overall_depth_mm: Option<f64>,
    back_clearance_mm: Option<f64>,
    material_kind: Option<String>,
    material_custom_note: Option<String>,
    material_thickness_mm: Option<f64>,
    speaker_width_mm: Option<f64>,
    speaker_height_mm: Option<f64>,
    speaker_depth_mm: Option<f64>,
    speaker_isolation: Option<IsolationStrategy>,
    turntable_width_mm: Option<f64>,
    turntable_height_mm: Option<f64>,
    turntable_depth_mm: Option<f64>,
    amplifier_width_mm: Option<f64>,
    amplifier_height_mm: Option<f64>,
    amplifier_depth_mm: Option<f64>,
    amplifier_ventilation: Option<String>,
    required_clearance_mm: Option<f64>,
    drawer_count: Option<u32>,
    drawer_lp_capacity: Option<u32>,
    rear_hatch: Option<bool>,
    output_profile: Option<OutputProfile>,
    confirmed: Option<bool>,
}

impl TypedAnswers {
    fn record(&mut self, id: &str, answer: Coerced) {
        match (id, answer) {
            ("overall_width", Coerced::Number(n)) => self.overall_width_mm = Some(n),
            ("overall_height", Coerced::Number(n)) => self.overall_height_mm = Some(n),
            ("overall_depth", Coerced::Number(n)) => self.overall_depth_mm = Some(n),
            ("back_clearance", Coerced::Number(n)) => self.back_clearance_mm = Some(n),
            ("material_kind", Coerced::Text(s)) => self.material_kind = Some(s),
            ("material_custom_note", Coerced::Text(s)) => self.material_custom_note = Some(s),
            ("material_thickness", Coerced::Number(n)) => self.material_thickness_mm = Some(n),
            ("speaker_width", Coerced::Number(n)) => self.speaker_width_mm = Some(n),
            ("speaker_height", Coerced::Number(n)) => self.speaker_height_mm = Some(n),
            ("speaker_depth", Coerced::Number(n)) => self.speaker_depth_mm = Some(n),
            ("speaker_isolation", Coerced::Text(s)) => {
                self.speaker_isolation = parse_isolation(&s);
            }
            ("turntable_width", Coerced::Number(n)) => self.turntable_width_mm = Some(n),
            ("turntable_height", Coerced::Number(n)) => self.turntable_height_mm = Some(n),
            ("turntable_depth", Coerced::Number(n)) => self.turntable_depth_mm = Some(n),
            ("amplifier_width", Coerced::Number(n)) => self.amplifier_width_mm = Some(n),
            ("amplifier_height", Coerced::Number(n)) => self.amplifier_height_mm = Some(n),
            ("amplifier_depth", Coerced::Number(n)) => self.amplifier_depth_mm = Some(n),
            ("amplifier_ventilation", Coerced::Text(s)) => self.amplifier_ventilation = Some(s),
            ("required_clearance", Coerced::Number(n)) => self.required_clearance_mm = Some(n),
            ("drawer_count", Coerced::Integer(n)) => self.drawer_count = u32::try_from(n).ok(),
            ("drawer_lp_capacity", Coerced::Integer(n)) => {
                self.drawer_lp_capacity = u32::try_from(n).ok();
            }
            ("rear_hatch", Coerced::Bool(b)) => self.rear_hatch = Some(b),
            ("output_profile", Coerced::Text(s)) => self.output_profile = parse_profile(&s),
            ("confirm", Coerced::Bool(b)) => self.confirmed = Some(b),
            _ => {}
        }
    }

    fn into_brief(
        self,
        project_id: Uuid,
        revision: u32,
        now: DateTime<Utc>,
    ) -> Option<DesignIntentBrief> {
        Some(DesignIntentBrief {
            dib_version: DIB_VERSION.to_string(),
            project_id,
            revision,
            created_at: now,
            confirmed_at: now,
            overall: OverallDimensions {
                width_mm: self.overall_width_mm?,
                height_mm: self.overall_height_mm?,
                depth_mm: self.overall_depth_mm?,
            },
            material: MaterialSpec {
                kind: self.material_kind?,
                thickness_mm: self.material_thickness_mm?,
                custom_note: self.material_custom_note,
            },
            constraints: BriefConstraints {
                back_clearance_mm: self.back_clearance_mm?,
            },
            components: BriefComponents {
                required_clearance_mm: self.required_clearance_mm?,
                speakers: SpeakerBrief {
                    width_mm: self.speaker_width_mm?,
                    height_mm: self.speaker_height_mm?,
                    depth_mm: self.speaker_depth_mm?,
                    isolation: self.speaker_isolation?,
                },
                turntable: TurntableBrief {
                    width_mm: self.turntable_width_mm?,
                    height_mm: self.turntable_height_mm?,
                    depth_mm: self.turntable_depth_mm?,
                },
                amplifier: AmplifierBrief {
                    width_mm: self.amplifier_width_mm?,
                    height_mm: self.amplifier_height_mm?,
                    depth_mm: self.amplifier_depth_mm?,
                    ventilation: self.amplifier_ventilation?,
                },
            },
            drawers: DrawerBrief {
                count: self.drawer_count?,
                // Defaults to 0 when the capacity question was skipped
                // (no drawers fitted).
                lp_capacity: self.drawer_lp_capacity.unwrap_or(0),
            },
            access: AccessOptions {
                rear_hatch: self.rear_hatch?,
            },
            output: OutputOptions {
                profile: self.output_profile?,
            },
            confirmed: self.confirmed?,
        })
    }
}

fn parse_isolation(s: &str) -> Option<IsolationStrategy> {
    match s {
        "none" => Some(IsolationStrategy::None),
        "foam_pads" => Some(IsolationStrategy::FoamPads),
        "spikes" => Some(IsolationStrategy::Spikes),
        _ => None,
    }
}

fn parse_profile(s: &str) -> Option<OutputProfile> {
    match s {
        "step" => Some(OutputProfile::Step),
        "parasolid" => Some(OutputProfile::Parasolid),
        "drawings" => Some(OutputProfile::Drawings),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single().expect("valid timestamp")
    }

    fn complete_draft() -> Draft {
        let mut draft = Draft::empty(fixed_now());
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
            draft.set(path, value, fixed_now());
        }
        draft
    }

    #[test]
    fn complete_draft_normalizes() {
        let brief = normalize(&complete_draft(), Uuid::nil(), 0, fixed_now())
            .expect("draft should validate");
        assert_eq!(brief.revision, 1);
        assert_eq!(brief.created_at, brief.confirmed_at);
        assert_eq!(brief.overall.depth_mm, 450.0);
        assert_eq!(brief.material.kind, "plywood");
        assert_eq!(brief.components.speakers.isolation, IsolationStrategy::FoamPads);
        assert_eq!(brief.drawers.count, 2);
        assert_eq!(brief.drawers.lp_capacity, 120);
        assert!(brief.confirmed);
    }

    #[test]
    fn revision_is_prior_count_plus_one() {
        let brief = normalize(&complete_draft(), Uuid::nil(), 4, fixed_now())
            .expect("draft should validate");
        assert_eq!(brief.revision, 5);
    }

    #[test]
    fn missing_required_answers_are_all_reported() {
        let draft = Draft::empty(fixed_now());
        let issues = normalize(&draft, Uuid::nil(), 0, fixed_now())
            .expect_err("empty draft must be rejected");
        // Dependent questions (custom note, LP capacity) are skipped when
        // their conditions do not hold.
        let paths: Vec<&str> = issues.iter().map(|i| i.path.as_str()).collect();
        assert!(paths.contains(&"overall.width_mm"));
        assert!(paths.contains(&"confirm"));
        assert!(!paths.contains(&"material.custom_note"));
        assert!(!paths.contains(&"drawers.lp_capacity"));
        assert_eq!(issues.len(), 22);
    }

    #[test]
    fn type_and_range_violations_accumulate() {
        let mut draft = complete_draft();
        draft.set("overall.width_mm", json!("wide"), fixed_now());
        draft.set("drawers.count", json!(9), fixed_now());
        draft.set("material.kind", json!("bamboo"), fixed_now());
        let issues = normalize(&draft, Uuid::nil(), 0, fixed_now())
            .expect_err("invalid draft must be rejected");
        assert_eq!(issues.len(), 3);
        let paths: Vec<&str> = issues.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["overall.width_mm", "material.kind", "drawers.count"]
        );
    }

    #[test]
    fn integer_question_rejects_fractional_values() {
        let mut draft = complete_draft();
        draft.set("drawers.count", json!(1.5), fixed_now());
        let issues = normalize(&draft, Uuid::nil(), 0, fixed_now())
            .expect_err("fractional drawer count must be rejected");
        assert_eq!(issues[0].path, "drawers.count");
        assert!(issues[0].message.contains("integer"));
    }

    #[test]
    fn confirmation_must_be_exactly_true() {
        let mut draft = complete_draft();
        draft.set("confirm", json!(false), fixed_now());
        let issues = normalize(&draft, Uuid::nil(), 0, fixed_now())
            .expect_err("unconfirmed draft must be rejected");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "confirm");
    }

    #[test]
    fn back_clearance_must_be_less_than_depth() {
        let mut draft = complete_draft();
        draft.set("constraints.back_clearance_mm", json!(450.0), fixed_now());
        let issues = normalize(&draft, Uuid::nil(), 0, fixed_now())
            .expect_err("clearance >= depth must be rejected");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "constraints.back_clearance_mm");
        assert!(issues[0].message.contains("strictly less"));
    }

    #[test]
    fn custom_note_required_when_material_is_other() {
        let mut draft = complete_draft();
        draft.set("material.kind", json!("other"), fixed_now());
        let issues = normalize(&draft, Uuid::nil(), 0, fixed_now())
            .expect_err("missing custom note must be rejected");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "material.custom_note");

        draft.set("material.custom_note", json!("reclaimed oak"), fixed_now());
        let brief = normalize(&draft, Uuid::nil(), 0, fixed_now()).expect("valid with note");
        assert_eq!(brief.material.custom_note.as_deref(), Some("reclaimed oak"));
    }

    #[test]
    fn lp_capacity_skipped_without_drawers() {
        let mut draft = complete_draft();
        draft.set("drawers.count", json!(0), fixed_now());
        draft.answers.remove("drawers.lp_capacity");
        let brief = normalize(&draft, Uuid::nil(), 0, fixed_now())
            .expect("capacity question inapplicable at count 0");
        assert_eq!(brief.drawers.lp_capacity, 0);
    }
}
