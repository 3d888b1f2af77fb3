//! The brief question schema, represented as data.
//!
//! Each question is a record: identifier, store path, required flag, a
//! typed kind with its constraints, and an optional dependency condition
//! on another path's value. Normalization is a single fold over this
//! table plus the draft - there is no reflection and no per-question
//! special casing outside the table itself.

/// Dependency predicate against another field's current draft value.
#[derive(Clone, Copy, Debug)]
pub enum DependencyPredicate {
    /// Applicable when the other field equals this string value.
    Equals(&'static str),
    /// Applicable when the other field is numeric and `>=` this value.
    AtLeast(f64),
}

/// Condition gating a question's applicability.
#[derive(Clone, Copy, Debug)]
pub struct Dependency {
    pub path: &'static str,
    pub predicate: DependencyPredicate,
}

/// The typed kind of an answer, with its validation constraints.
#[derive(Clone, Copy, Debug)]
pub enum QuestionKind {
    /// Must be exactly `true`.
    Confirmation,
    Boolean,
    /// Must be one of the declared options.
    Enum(&'static [&'static str]),
    /// Must be an integer within `[min, max]`.
    Integer { min: i64, max: i64 },
    /// Must be a finite number within `[min, max]`.
    Number { min: f64, max: f64 },
    /// Free text.
    Text,
}

/// One entry of the fixed, ordered question schema.
#[derive(Clone, Copy, Debug)]
pub struct Question {
    pub id: &'static str,
    /// Dotted store path into the draft.
    pub path: &'static str,
    pub required: bool,
    pub kind: QuestionKind,
    pub depends_on: Option<Dependency>,
}

pub const MATERIAL_KINDS: &[&str] = &["plywood", "mdf", "veneer_plywood", "other"];
pub const ISOLATION_STRATEGIES: &[&str] = &["none", "foam_pads", "spikes"];
pub const VENTILATION_DIRECTIONS: &[&str] = &["none", "top", "rear"];
pub const OUTPUT_PROFILES: &[&str] = &["step", "parasolid", "drawings"];

/// The fixed, ordered question schema for brief version 0.1.0.
pub const QUESTIONS: &[Question] = &[
    Question {
        id: "overall_width",
        path: "overall.width_mm",
        required: true,
        kind: QuestionKind::Number {
            min: 100.0,
            max: 10_000.0,
        },
        depends_on: None,
    },
    Question {
        id: "overall_height",
        path: "overall.height_mm",
        required: true,
        kind: QuestionKind::Number {
            min: 100.0,
            max: 10_000.0,
        },
        depends_on: None,
    },
    Question {
        id: "overall_depth",
        path: "overall.depth_mm",
        required: true,
        kind: QuestionKind::Number {
            min: 100.0,
            max: 10_000.0,
        },
        depends_on: None,
    },
    Question {
        id: "back_clearance",
        path: "constraints.back_clearance_mm",
        required: true,
        kind: QuestionKind::Number {
            min: 0.0,
            max: 2_000.0,
        },
        depends_on: None,
    },
    Question {
        id: "material_kind",
        path: "material.kind",
        required: true,
        kind: QuestionKind::Enum(MATERIAL_KINDS),
        depends_on: None,
    },
    Question {
        id: "material_custom_note",
        path: "material.custom_note",
        required: true,
        kind: QuestionKind::Text,
        depends_on: Some(Dependency {
            path: "material.kind",
            predicate: DependencyPredicate::Equals("other"),
        }),
    },
    Question {
        id: "material_thickness",
        path: "material.thickness_mm",
        required: true,
        kind: QuestionKind::Number {
            min: 6.0,
            max: 60.0,
        },
        depends_on: None,
    },
    Question {
        id: "speaker_width",
        path: "components.speakers.width_mm",
        required: true,
        kind: QuestionKind::Number {
            min: 1.0,
            max: 2_000.0,
        },
        depends_on: None,
    },
    Question {
        id: "speaker_height",
        path: "components.speakers.height_mm",
        required: true,
        kind: QuestionKind::Number {
            min: 1.0,
            max: 2_000.0,
        },
        depends_on: None,
    },
    Question {
        id: "speaker_depth",
        path: "components.speakers.depth_mm",
        required: true,
        kind: QuestionKind::Number {
            min: 1.0,
            max: 2_000.0,
        },
        depends_on: None,
    },
    Question {
        id: "speaker_isolation",
        path: "components.speakers.isolation",
        required: true,
        kind: QuestionKind::Enum(ISOLATION_STRATEGIES),
        depends_on: None,
    },
    Question {
        id: "turntable_width",
        path: "components.turntable.width_mm",
        required: true,
        kind: QuestionKind::Number {
            min: 1.0,
            max: 2_000.0,
        },
        depends_on: None,
    },
    Question {
        id: "turntable_height",
        path: "components.turntable.height_mm",
        required: true,
        kind: QuestionKind::Number {
            min: 1.0,
            max: 2_000.0,
        },
        depends_on: None,
    },
    Question {
        id: "turntable_depth",
        path: "components.turntable.depth_mm",
        required: true,
        kind: QuestionKind::Number {
            min: 1.0,
            max: 2_000.0,
        },
        depends_on: None,
    },
    Question {
        id: "amplifier_width",
        path: "components.amplifier.width_mm",
        required: true,
        kind: QuestionKind::Number {
            min: 1.0,
            max: 2_000.0,
        },
        depends_on: None,
    },
    Question {
        id: "amplifier_height",
        path: "components.amplifier.height_mm",
        required: true,
        kind: QuestionKind::Number {
            min: 1.0,
            max: 2_000.0,
        },
        depends_on: None,
    },
    Question {
        id: "amplifier_depth",
        path: "components.amplifier.depth_mm",
        required: true,
        kind: QuestionKind::Number {
            min: 1.0,
            max: 2_000.0,
        },
        depends_on: None,
    },
    Question {
        id: "amplifier_ventilation",
        path: "components.amplifier.ventilation",
        required: true,
        kind: QuestionKind::Enum(VENTILATION_DIRECTIONS),
        depends_on: None,
    },
    Question {
        id: "required_clearance",
        path: "components.required_clearance_mm",
        required: true,
        kind: QuestionKind::Number {
            min: 0.0,
            max: 500.0,
        },
        depends_on: None,
    },
    Question {
        id: "drawer_count",
        path: "drawers.count",
        required: true,
        kind: QuestionKind::Integer { min: 0, max: 6 },
        depends_on: None,
    },
    Question {
        id: "drawer_lp_capacity",
        path: "drawers.lp_capacity",
        required: true,
        kind: QuestionKind::Integer { min: 1, max: 3_000 },
        depends_on: Some(Dependency {
            path: "drawers.count",
            predicate: DependencyPredicate::AtLeast(1.0),
        }),
    },
    Question {
        id: "rear_hatch",
        path: "access.rear_hatch",
        required: true,
        kind: QuestionKind::Boolean,
        depends_on: None,
    },
    Question {
        id: "output_profile",
        path: "output.profile",
        required: true,
        kind: QuestionKind::Enum(OUTPUT_PROFILES),
        depends_on: None,
    },
    Question {
        id: "confirm",
        path: "confirm",
        required: true,
        kind: QuestionKind::Confirmation,
        depends_on: None,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_ids_and_paths_are_unique() {
        let mut ids: Vec<&str> = QUESTIONS.iter().map(|q| q.id).collect();
        let mut paths: Vec<&str> = QUESTIONS.iter().map(|q| q.path).collect();
        ids.sort_unstable();
        paths.sort_unstable();
        let id_count = ids.len();
        let path_count = paths.len();
        ids.dedup();
        paths.dedup();
        assert_eq!(ids.len(), id_count);
        assert_eq!(paths.len(), path_count);
    }

    #[test]
    fn dependencies_reference_earlier_questions() {
        for (idx, q) in QUESTIONS.iter().enumerate() {
            if let Some(dep) = &q.depends_on {
                let target = QUESTIONS.iter().position(|o| o.path == dep.path);
                let target = target.unwrap_or(usize::MAX);
                assert!(
                    target < idx,
                    "dependency of {} must point at an earlier question",
                    q.id
                );
            }
        }
    }
}
