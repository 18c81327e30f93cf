//!
//! Response validation against a resolved survey definition. The response is
//! first bound to exactly one question, then checked against that question's
//! method rules. The definition itself is assumed to have passed
//! [`super::validate_definition`]; missing method fields are still reported
//! rather than panicking.
//!

use super::{Verdict, is_blank, is_hex_of_len};
use crate::{
    constants::SURVEY_HASH_HEX_LEN,
    model::{MethodType, QuestionRef, SurveyDefinition, SurveyResponse},
};
use std::collections::BTreeSet;
use tracing::debug;

///
/// Validate a response against its poll's definition.
///
#[must_use]
pub fn validate_response(resp: &SurveyResponse, def: &SurveyDefinition) -> Verdict {
    let mut errors = Vec::new();

    if is_blank(&resp.survey_tx_id) {
        errors.push("surveyTxId must not be blank".to_string());
    }
    if !is_hex_of_len(&resp.survey_hash, SURVEY_HASH_HEX_LEN) {
        errors.push(format!(
            "surveyHash must be exactly {SURVEY_HASH_HEX_LEN} hex characters"
        ));
    }

    if let Some(question) = resolve_question(&mut errors, resp, def) {
        validate_answer(&mut errors, &question, resp);
    }

    debug!(valid = errors.is_empty(), count = errors.len(), "response validated");

    Verdict::from_errors(errors)
}

/// Bind the response to exactly one question of the poll. A `questionId` is
/// matched against the question list; omitting it is only unambiguous when
/// the poll has a single question.
fn resolve_question<'a>(
    errors: &mut Vec<String>,
    resp: &SurveyResponse,
    def: &'a SurveyDefinition,
) -> Option<QuestionRef<'a>> {
    let questions = def.unified_questions();

    if questions.is_empty() {
        errors.push("survey defines no questions to answer".to_string());
        return None;
    }

    match resp.question_id.as_deref() {
        Some(id) => {
            let found = questions.iter().find(|q| q.question_id == Some(id)).copied();
            if found.is_none() {
                errors.push(format!("no question with questionId '{id}'"));
            }
            found
        }
        None if questions.len() == 1 => Some(questions[0]),
        None => {
            errors.push(
                "response to a multi-question survey must name a questionId".to_string(),
            );
            None
        }
    }
}

fn validate_answer(errors: &mut Vec<String>, q: &QuestionRef<'_>, resp: &SurveyResponse) {
    match MethodType::from_id(q.method_type) {
        MethodType::SingleChoice => {
            let count = option_count(q);

            match &resp.selection {
                None => errors.push("single-choice requires a selection".to_string()),
                Some(sel) => {
                    if sel.len() != 1 {
                        errors.push(format!(
                            "single-choice takes exactly one selection, got {}",
                            sel.len()
                        ));
                    }
                    check_in_range(errors, sel, count);
                }
            }
        }
        MethodType::MultiSelect => {
            let count = option_count(q);
            let max = q.max_selections.unwrap_or(count);

            match &resp.selection {
                None => errors.push("multi-select requires a selection".to_string()),
                Some(sel) => {
                    if sel.is_empty() {
                        errors.push("multi-select requires at least one selection".to_string());
                    }
                    if sel.len() as u64 > max {
                        errors.push(format!(
                            "selection count ({}) exceeds maxSelections ({max})",
                            sel.len()
                        ));
                    }
                    check_in_range(errors, sel, count);

                    let mut seen = BTreeSet::new();
                    if !sel.iter().all(|i| seen.insert(i)) {
                        errors.push("selection indices must not repeat".to_string());
                    }
                }
            }
        }
        MethodType::NumericRange => match (q.numeric_constraints, resp.numeric_value) {
            (_, None) => {
                errors.push("numeric-range requires a numericValue".to_string());
            }
            (None, Some(_)) => {
                errors.push("question carries no numericConstraints".to_string());
            }
            (Some(nc), Some(value)) => {
                if value < nc.min_value || value > nc.max_value {
                    errors.push(format!(
                        "numericValue ({value}) is outside [{}, {}]",
                        nc.min_value, nc.max_value
                    ));
                }
                if let Some(step) = nc.step
                    && step >= 1
                {
                    let offset = i128::from(value) - i128::from(nc.min_value);
                    if offset.rem_euclid(i128::from(step)) != 0 {
                        errors.push(format!(
                            "numericValue ({value}) is not a multiple of step ({step}) from minValue ({})",
                            nc.min_value
                        ));
                    }
                }
            }
        },
        // the answer schema is opaque to this engine
        MethodType::Custom(_) => {}
    }
}

fn option_count(q: &QuestionRef<'_>) -> u64 {
    q.options.map_or(0, |o| o.len() as u64)
}

fn check_in_range(errors: &mut Vec<String>, selection: &[u64], option_count: u64) {
    for &index in selection {
        if index >= option_count {
            errors.push(format!(
                "selection index {index} is out of range (options: {option_count})"
            ));
        }
    }
}

///
/// TESTS
///
