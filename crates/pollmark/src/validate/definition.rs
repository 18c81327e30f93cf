//!
//! Definition-level validation: poll-wide rules plus the method-specific rule
//! table, evaluated per question. The legacy flat shape is validated as one
//! implicit question via the unified view.
//!

use super::{Verdict, is_blank, is_hex_of_len};
use crate::{
    constants::{DIGEST_ALGORITHM, MIN_OPTIONS, TX_ID_HEX_LEN},
    model::{LIFECYCLE_KNOWN_KEYS, MethodType, QuestionRef, SurveyDefinition},
};
use std::collections::BTreeSet;
use tracing::debug;

///
/// Validate a survey definition.
///
/// Returns a verdict with every violated rule; the definition must pass
/// before it is normalized, encoded, or hashed.
///
#[must_use]
pub fn validate_definition(def: &SurveyDefinition) -> Verdict {
    let mut errors = Vec::new();

    if is_blank(&def.spec_version) {
        errors.push("specVersion must not be blank".to_string());
    }
    if is_blank(&def.title) {
        errors.push("title must not be blank".to_string());
    }
    if is_blank(&def.description) {
        errors.push("description must not be blank".to_string());
    }

    let questions = def.unified_questions();
    if questions.is_empty() {
        errors.push("survey must define at least one question".to_string());
    }

    let multi = questions.len() > 1;
    let mut seen_ids: BTreeSet<&str> = BTreeSet::new();

    for (idx, q) in questions.iter().enumerate() {
        let label = question_label(q, idx);

        if is_blank(q.question) {
            errors.push(format!("{label}: question text must not be blank"));
        }

        match q.question_id {
            Some(id) if !is_blank(id) => {
                if !seen_ids.insert(id) {
                    errors.push(format!("{label}: duplicate questionId '{id}'"));
                }
            }
            _ if multi => {
                errors.push(format!(
                    "{label}: every question of a multi-question survey needs a questionId"
                ));
            }
            _ => {}
        }

        validate_method(&mut errors, &label, q);
    }

    if let Some(action) = &def.reference_action
        && !is_hex_of_len(&action.transaction_id, TX_ID_HEX_LEN)
    {
        errors.push(format!(
            "referenceAction.transactionId must be exactly {TX_ID_HEX_LEN} hex characters"
        ));
    }

    if let Some(lifecycle) = &def.lifecycle {
        for key in LIFECYCLE_KNOWN_KEYS {
            match lifecycle.get(key) {
                None => {}
                Some(value) if value.is_null() => {}
                Some(value) if value.as_u64().is_some() => {}
                Some(_) => {
                    errors.push(format!("lifecycle.{key} must be a non-negative integer"));
                }
            }
        }
    }

    debug!(valid = errors.is_empty(), count = errors.len(), "definition validated");

    Verdict::from_errors(errors)
}

fn question_label(q: &QuestionRef<'_>, idx: usize) -> String {
    match q.question_id {
        Some(id) if !is_blank(id) => format!("question '{id}'"),
        _ => format!("question #{}", idx + 1),
    }
}

fn validate_method(errors: &mut Vec<String>, label: &str, q: &QuestionRef<'_>) {
    if is_blank(q.method_type) {
        errors.push(format!("{label}: methodType must not be blank"));
        return;
    }

    match MethodType::from_id(q.method_type) {
        MethodType::SingleChoice => {
            validate_options(errors, label, q.options);
        }
        MethodType::MultiSelect => {
            let option_count = validate_options(errors, label, q.options);

            match q.max_selections {
                None => {
                    errors.push(format!("{label}: multi-select requires maxSelections"));
                }
                Some(0) => {
                    errors.push(format!("{label}: maxSelections must be at least 1"));
                }
                Some(max) if option_count > 0 && max > option_count as u64 => {
                    errors.push(format!(
                        "{label}: maxSelections ({max}) exceeds the option count ({option_count})"
                    ));
                }
                Some(_) => {}
            }
        }
        MethodType::NumericRange => match q.numeric_constraints {
            None => {
                errors.push(format!("{label}: numeric-range requires numericConstraints"));
            }
            Some(nc) => {
                if nc.min_value > nc.max_value {
                    errors.push(format!(
                        "{label}: minValue ({}) must not exceed maxValue ({})",
                        nc.min_value, nc.max_value
                    ));
                }
                if nc.step == Some(0) {
                    errors.push(format!("{label}: step must be at least 1"));
                }
            }
        },
        MethodType::Custom(_) => {
            if q.method_schema_uri.is_none_or(is_blank) {
                errors.push(format!(
                    "{label}: caller-defined methods require a methodSchemaUri"
                ));
            }
            if q.method_schema_hash.is_none_or(is_blank) {
                errors.push(format!(
                    "{label}: caller-defined methods require a methodSchemaHash"
                ));
            }
            if let Some(alg) = q.hash_algorithm
                && alg != DIGEST_ALGORITHM
            {
                errors.push(format!(
                    "{label}: hashAlgorithm must be '{DIGEST_ALGORITHM}', got '{alg}'"
                ));
            }
        }
    }
}

/// Shared choice-method rule: at least two options, none blank. Returns the
/// option count for the maxSelections comparison (0 when options are absent).
fn validate_options(errors: &mut Vec<String>, label: &str, options: Option<&[String]>) -> usize {
    let Some(options) = options else {
        errors.push(format!("{label}: choice methods require options"));
        return 0;
    };

    if options.len() < MIN_OPTIONS {
        errors.push(format!("{label}: at least {MIN_OPTIONS} options are required"));
    }
    if options.iter().any(|o| is_blank(o)) {
        errors.push(format!("{label}: options must not be blank"));
    }

    options.len()
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NumericConstraints, Question, ReferenceAction};
    use serde_json::json;

    fn question(method: &str) -> Question {
        Question {
            question_id: Some("q1".into()),
            question: "Pick one".into(),
            method_type: method.into(),
            ..Question::default()
        }
    }

    fn definition(questions: Vec<Question>) -> SurveyDefinition {
        SurveyDefinition {
            spec_version: "1.0".into(),
            title: "T".into(),
            description: "D".into(),
            questions,
            ..SurveyDefinition::default()
        }
    }

    #[test]
    fn minimal_single_choice_definition_passes() {
        let mut q = question(MethodType::SINGLE_CHOICE);
        q.options = Some(vec!["A".into(), "B".into()]);

        let verdict = validate_definition(&definition(vec![q]));
        assert!(verdict.is_valid(), "{:?}", verdict.errors);
    }

    #[test]
    fn blank_poll_fields_are_all_reported() {
        let verdict = validate_definition(&SurveyDefinition::default());

        assert!(!verdict.is_valid());
        assert!(verdict.errors.iter().any(|e| e.contains("specVersion")));
        assert!(verdict.errors.iter().any(|e| e.contains("title")));
        assert!(verdict.errors.iter().any(|e| e.contains("description")));
        assert!(verdict.errors.iter().any(|e| e.contains("at least one question")));
    }

    #[test]
    fn single_choice_needs_two_nonblank_options() {
        let mut q = question(MethodType::SINGLE_CHOICE);
        q.options = Some(vec!["A".into()]);
        let verdict = validate_definition(&definition(vec![q]));
        assert!(verdict.errors.iter().any(|e| e.contains("at least 2 options")));

        let mut q = question(MethodType::SINGLE_CHOICE);
        q.options = Some(vec!["A".into(), "  ".into()]);
        let verdict = validate_definition(&definition(vec![q]));
        assert!(verdict.errors.iter().any(|e| e.contains("must not be blank")));
    }

    #[test]
    fn multi_select_bounds_max_selections() {
        let mut q = question(MethodType::MULTI_SELECT);
        q.options = Some(vec!["A".into(), "B".into(), "C".into()]);
        q.max_selections = Some(4);
        let verdict = validate_definition(&definition(vec![q]));
        assert!(verdict.errors.iter().any(|e| e.contains("exceeds the option count")));

        let mut q = question(MethodType::MULTI_SELECT);
        q.options = Some(vec!["A".into(), "B".into(), "C".into()]);
        q.max_selections = Some(2);
        assert!(validate_definition(&definition(vec![q])).is_valid());
    }

    #[test]
    fn numeric_range_rejects_inverted_bounds_with_one_error() {
        let mut q = question(MethodType::NUMERIC_RANGE);
        q.numeric_constraints = Some(NumericConstraints {
            min_value: 5,
            max_value: 2,
            step: None,
        });

        let verdict = validate_definition(&definition(vec![q]));
        assert!(!verdict.is_valid());
        assert_eq!(verdict.errors.len(), 1);
        assert!(verdict.errors[0].contains("minValue (5) must not exceed maxValue (2)"));
    }

    #[test]
    fn numeric_range_rejects_zero_step() {
        let mut q = question(MethodType::NUMERIC_RANGE);
        q.numeric_constraints = Some(NumericConstraints {
            min_value: 0,
            max_value: 10,
            step: Some(0),
        });

        let verdict = validate_definition(&definition(vec![q]));
        assert!(verdict.errors.iter().any(|e| e.contains("step must be at least 1")));
    }

    #[test]
    fn caller_defined_methods_need_schema_uri_and_hash() {
        let q = question("urn:x-survey:essay");
        let verdict = validate_definition(&definition(vec![q]));

        assert!(verdict.errors.iter().any(|e| e.contains("methodSchemaUri")));
        assert!(verdict.errors.iter().any(|e| e.contains("methodSchemaHash")));

        let mut q = question("urn:x-survey:essay");
        q.method_schema_uri = Some("https://example.com/schema.json".into());
        q.method_schema_hash = Some("ab".repeat(32));
        q.hash_algorithm = Some("sha-256".into());
        let verdict = validate_definition(&definition(vec![q]));
        assert!(verdict.errors.iter().any(|e| e.contains("hashAlgorithm")));

        let mut q = question("urn:x-survey:essay");
        q.method_schema_uri = Some("https://example.com/schema.json".into());
        q.method_schema_hash = Some("ab".repeat(32));
        q.hash_algorithm = Some(DIGEST_ALGORITHM.into());
        assert!(validate_definition(&definition(vec![q])).is_valid());
    }

    #[test]
    fn multi_question_polls_need_unique_ids() {
        let mut a = question(MethodType::SINGLE_CHOICE);
        a.options = Some(vec!["A".into(), "B".into()]);
        let mut b = a.clone();
        b.question = "And again?".into();

        // duplicate ids
        let verdict = validate_definition(&definition(vec![a.clone(), b.clone()]));
        assert!(verdict.errors.iter().any(|e| e.contains("duplicate questionId")));

        // missing id on the second question
        b.question_id = None;
        let verdict = validate_definition(&definition(vec![a.clone(), b.clone()]));
        assert!(verdict.errors.iter().any(|e| e.contains("needs a questionId")));

        // distinct ids pass
        b.question_id = Some("q2".into());
        assert!(validate_definition(&definition(vec![a, b])).is_valid());
    }

    #[test]
    fn legacy_shape_validates_as_one_question() {
        let def = SurveyDefinition {
            spec_version: "1.0".into(),
            title: "T".into(),
            description: "D".into(),
            question: Some("Agree?".into()),
            method_type: Some(MethodType::SINGLE_CHOICE.into()),
            options: Some(vec!["Yes".into(), "No".into()]),
            ..SurveyDefinition::default()
        };

        assert!(validate_definition(&def).is_valid());
    }

    #[test]
    fn reference_action_tx_id_must_be_64_hex() {
        let mut q = question(MethodType::SINGLE_CHOICE);
        q.options = Some(vec!["A".into(), "B".into()]);
        let mut def = definition(vec![q]);
        def.reference_action = Some(ReferenceAction {
            transaction_id: "deadbeef".into(),
            action_index: 0,
        });

        let verdict = validate_definition(&def);
        assert!(verdict.errors.iter().any(|e| e.contains("transactionId")));

        def.reference_action = Some(ReferenceAction {
            transaction_id: "ab".repeat(32),
            action_index: 3,
        });
        assert!(validate_definition(&def).is_valid());
    }

    #[test]
    fn lifecycle_known_keys_must_be_unsigned_integers() {
        let mut q = question(MethodType::SINGLE_CHOICE);
        q.options = Some(vec!["A".into(), "B".into()]);
        let mut def = definition(vec![q]);

        def.lifecycle = Some(json!({ "endEpoch": -3 }).as_object().unwrap().clone());
        let verdict = validate_definition(&def);
        assert!(verdict.errors.iter().any(|e| e.contains("lifecycle.endEpoch")));

        def.lifecycle = Some(
            json!({ "endEpoch": 540, "futureKey": "opaque ok" })
                .as_object()
                .unwrap()
                .clone(),
        );
        assert!(validate_definition(&def).is_valid());
    }
}
