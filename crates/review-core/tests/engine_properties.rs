//! Property-based tests for the review form engine
//!
//! Drives the engine with arbitrary sequences of operations and checks the
//! invariants that must hold after every step.

use proptest::prelude::*;
use review_core::forms::environmental_monitoring;
use review_core::{
    FieldPath, FinalField, FormDefinition, FormState, ReviewDecision, ReviewError,
    ReviewFormEngine, SectionSchema, SectionStatus, ValidationReason,
};

const SECTIONS: [&str; 4] = [
    "generalInfo",
    "waterSoilParameters",
    "gasEmissions",
    "mitigationMeasures",
];

#[derive(Debug, Clone)]
enum Op {
    Decide(usize, ReviewDecision),
    Observe(usize, String),
    Reading(usize, String),
    Final(FinalField, String),
    Toggle(usize),
    ToggleFinal,
    Submit,
}

impl Op {
    fn is_toggle(&self) -> bool {
        matches!(self, Op::Toggle(_) | Op::ToggleFinal)
    }
}

fn decision() -> impl Strategy<Value = ReviewDecision> {
    prop_oneof![Just(ReviewDecision::Approved), Just(ReviewDecision::Reported)]
}

fn final_field() -> impl Strategy<Value = FinalField> {
    prop_oneof![
        Just(FinalField::Comments),
        Just(FinalField::ReportDate),
        Just(FinalField::Signature),
    ]
}

fn approval_value() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("approved"),
        Just("Rechazado"),
        Just("Requiere revisión"),
        Just(""),
    ]
    .prop_map(str::to_string)
}

/// Edits only; every generated op is valid on an editable form.
fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..4, decision()).prop_map(|(i, d)| Op::Decide(i, d)),
        (0usize..4, "[a-z ]{0,12}").prop_map(|(i, t)| Op::Observe(i, t)),
        (0usize..3, "[0-9.]{0,6}").prop_map(|(i, v)| Op::Reading(i, v)),
        (final_field(), "[a-z0-9-]{0,10}").prop_map(|(f, v)| Op::Final(f, v)),
        approval_value().prop_map(|v| Op::Final(FinalField::RegulatoryApproval, v)),
        (0usize..4).prop_map(Op::Toggle),
    ]
}

/// Edits interleaved with toggles of the closing block and submit attempts.
fn session_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => op(),
        1 => Just(Op::ToggleFinal),
        2 => Just(Op::Submit),
    ]
}

fn reading_path(index: usize) -> (&'static str, FieldPath) {
    match index {
        0 => ("waterSoilParameters", ("waterPh", "before").into()),
        1 => ("gasEmissions", ("co2Emission", "during").into()),
        _ => ("mitigationMeasures", ("soilRestoration", "description").into()),
    }
}

fn try_apply(engine: &mut ReviewFormEngine, op: &Op) -> Result<(), ReviewError> {
    match op {
        Op::Decide(i, d) => engine.set_section_status(SECTIONS[*i], *d),
        Op::Observe(i, t) => engine.set_observation(SECTIONS[*i], t),
        Op::Reading(i, v) => {
            let (section, path) = reading_path(*i);
            engine.set_field(section, &path, v)
        }
        Op::Final(f, v) => engine.set_final_observation(*f, v),
        Op::Toggle(i) => engine.toggle_expanded(SECTIONS[*i]),
        Op::ToggleFinal => {
            engine.toggle_final_observations_expanded();
            Ok(())
        }
        Op::Submit => engine.submit().map(|_| ()),
    }
}

fn apply(engine: &mut ReviewFormEngine, op: &Op) {
    try_apply(engine, op).unwrap()
}

/// Review and annotate every section and fill the required closing fields.
fn complete(engine: &mut ReviewFormEngine) {
    for id in SECTIONS {
        engine
            .set_section_status(id, ReviewDecision::Approved)
            .unwrap();
        engine.set_observation(id, "Sin novedades").unwrap();
    }
    engine
        .set_final_observation(FinalField::Comments, "Cumple")
        .unwrap();
    engine
        .set_final_observation(FinalField::ReportDate, "2024-06-30")
        .unwrap();
    engine
        .set_final_observation(FinalField::RegulatoryApproval, "Aprobado")
        .unwrap();
}

/// State with presentation flags cleared, for comparing content only.
fn content(engine: &ReviewFormEngine) -> FormState {
    let mut state = engine.state().clone();
    for section in &mut state.sections {
        section.expanded = true;
    }
    state.final_observations.expanded = true;
    state
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn reviewed_sections_never_return_to_pending(ops in prop::collection::vec(op(), 0..40)) {
        let mut engine = ReviewFormEngine::new(environmental_monitoring()).unwrap();
        let mut reviewed = [false; 4];

        for op in &ops {
            apply(&mut engine, op);
            if let Op::Decide(i, _) = op {
                reviewed[*i] = true;
            }
            for (i, id) in SECTIONS.iter().enumerate() {
                let status = engine.section_status(id).unwrap();
                prop_assert_eq!(status.is_reviewed(), reviewed[i]);
            }
        }
    }

    #[test]
    fn pending_section_blocks_submission(ops in prop::collection::vec(op(), 0..40)) {
        let mut engine = ReviewFormEngine::new(environmental_monitoring()).unwrap();
        for op in &ops {
            apply(&mut engine, op);
        }
        if !engine.pending_sections().is_empty() {
            prop_assert!(!engine.can_submit());
            prop_assert_eq!(
                engine.submit(),
                Err(ReviewError::ValidationFailed(ValidationReason::SectionsNotReviewed))
            );
        }
    }

    #[test]
    fn last_decision_wins(first in decision(), second in decision(), index in 0usize..4) {
        let mut engine = ReviewFormEngine::new(environmental_monitoring()).unwrap();
        engine.set_section_status(SECTIONS[index], first).unwrap();
        engine.set_section_status(SECTIONS[index], second).unwrap();
        prop_assert_eq!(
            engine.section_status(SECTIONS[index]).unwrap(),
            SectionStatus::from(second)
        );
    }

    #[test]
    fn draft_mirrors_live_statuses(ops in prop::collection::vec(op(), 0..40)) {
        let mut engine = ReviewFormEngine::new(environmental_monitoring()).unwrap();
        for op in &ops {
            apply(&mut engine, op);
        }
        let draft = engine.save_draft();
        prop_assert_eq!(draft.statuses(), engine.state().statuses());
        prop_assert_eq!(&draft.state, engine.state());
    }

    #[test]
    fn progress_counts_reviewed_sections(
        count in 1usize..8,
        decided in prop::collection::vec(any::<bool>(), 8)
    ) {
        let mut form = FormDefinition::new("generic", "");
        for i in 0..count {
            form = form.section(SectionSchema::new(format!("s{}", i), ""));
        }
        let mut engine = ReviewFormEngine::new(form).unwrap();

        let mut reviewed = 0;
        for (i, flag) in decided.iter().take(count).enumerate() {
            if *flag {
                engine.set_section_status(&format!("s{}", i), ReviewDecision::Approved).unwrap();
                reviewed += 1;
            }
        }

        let expected = (100.0 * reviewed as f64 / count as f64).round() as u8;
        prop_assert_eq!(engine.compute_progress(), expected);
    }

    #[test]
    fn submitted_form_only_accepts_toggles(
        prefill in any::<bool>(),
        ops in prop::collection::vec(session_op(), 0..40)
    ) {
        let mut engine = ReviewFormEngine::new(environmental_monitoring()).unwrap();
        if prefill {
            complete(&mut engine);
        }

        for op in &ops {
            let was_submitted = engine.is_submitted();
            let before = content(&engine);
            let result = try_apply(&mut engine, op);

            if was_submitted {
                if op.is_toggle() {
                    prop_assert!(result.is_ok());
                } else {
                    prop_assert_eq!(result, Err(ReviewError::FormAlreadySubmitted));
                }
                prop_assert_eq!(content(&engine), before);
                prop_assert!(engine.is_submitted());
            } else if let Op::Submit = op {
                prop_assert_eq!(result.is_ok(), engine.is_submitted());
            } else {
                prop_assert!(result.is_ok());
            }
        }

        if let Some(record) = engine.submission() {
            prop_assert_eq!(record.statuses(), engine.state().statuses());
            prop_assert!(engine.pending_sections().is_empty());
            prop_assert!(engine.missing_observations().is_empty());
        }
    }

    #[test]
    fn missing_final_field_blocks_submission(
        missing in prop_oneof![
            Just(FinalField::Comments),
            Just(FinalField::ReportDate),
            Just(FinalField::RegulatoryApproval),
        ]
    ) {
        let mut engine = ReviewFormEngine::new(environmental_monitoring()).unwrap();
        complete(&mut engine);
        engine.set_final_observation(missing, "").unwrap();

        prop_assert_eq!(
            engine.submit(),
            Err(ReviewError::ValidationFailed(ValidationReason::FinalObservationsIncomplete))
        );
    }
}

#[test]
fn submitted_form_rejects_every_setter() {
    let mut engine = ReviewFormEngine::new(environmental_monitoring()).unwrap();
    complete(&mut engine);

    let record = engine.submit().unwrap();
    assert_eq!(record.statuses(), engine.state().statuses());
    assert!(record
        .statuses()
        .iter()
        .all(|(_, status)| *status == SectionStatus::Approved));

    assert_eq!(
        engine.set_field("generalInfo", &"wellName".into(), "x"),
        Err(ReviewError::FormAlreadySubmitted)
    );
    assert_eq!(
        engine.set_final_observation(FinalField::Signature, "firmado"),
        Err(ReviewError::FormAlreadySubmitted)
    );
    assert!(engine.toggle_expanded("gasEmissions").is_ok());
}
