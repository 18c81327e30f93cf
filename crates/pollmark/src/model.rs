//!
//! Data model for survey definitions and responses. These types are the input
//! boundary of the engine: callers construct them directly or deserialize them
//! from a JSON payload. They carry no behavior beyond shape resolution — the
//! normalizer, encoder, and validators operate on them.
//!

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{self, Display};

///
/// SurveyDefinition
///
/// A poll definition in either of the two historical payload shapes: the
/// current multi-question shape (`questions` non-empty, authoritative) or the
/// legacy single-question shape, where `question`, `method_type`, and the
/// method-specific fields sit directly on the definition. The two shapes are
/// mutually exclusive; [`Self::unified_questions`] resolves them once.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SurveyDefinition {
    pub spec_version: String,
    pub title: String,
    pub description: String,

    /// Ordered question list. Authoritative whenever non-empty.
    pub questions: Vec<Question>,

    // legacy single-question shape
    pub question: Option<String>,
    pub method_type: Option<String>,
    pub options: Option<Vec<String>>,
    pub max_selections: Option<u64>,
    pub numeric_constraints: Option<NumericConstraints>,
    pub method_schema_uri: Option<String>,
    pub hash_algorithm: Option<String>,
    pub method_schema_hash: Option<String>,

    pub eligibility: Option<BTreeSet<EligibilityRole>>,
    pub vote_weighting: Option<VoteWeighting>,
    pub reference_action: Option<ReferenceAction>,
    pub lifecycle: Option<Lifecycle>,
}

impl SurveyDefinition {
    /// Resolve the two historical shapes into one ordered question view.
    ///
    /// A non-empty `questions` list wins outright. Otherwise the legacy flat
    /// fields form a single implicit question, provided at least one of
    /// `question` / `method_type` is present. A definition carrying neither
    /// resolves to no questions at all (rejected by validation).
    #[must_use]
    pub fn unified_questions(&self) -> Vec<QuestionRef<'_>> {
        if !self.questions.is_empty() {
            return self.questions.iter().map(QuestionRef::from).collect();
        }

        if self.question.is_none() && self.method_type.is_none() {
            return Vec::new();
        }

        vec![QuestionRef {
            question_id: None,
            question: self.question.as_deref().unwrap_or(""),
            method_type: self.method_type.as_deref().unwrap_or(""),
            options: self.options.as_deref(),
            max_selections: self.max_selections,
            numeric_constraints: self.numeric_constraints.as_ref(),
            method_schema_uri: self.method_schema_uri.as_deref(),
            hash_algorithm: self.hash_algorithm.as_deref(),
            method_schema_hash: self.method_schema_hash.as_deref(),
        }]
    }
}

///
/// Question
///
/// One question of a multi-question survey. Exactly one method-specific field
/// group is populated, determined by `method_type`.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Question {
    /// Unique within the poll when present. Required for every question of a
    /// multi-question poll; a sole question may omit it.
    pub question_id: Option<String>,
    pub question: String,
    pub method_type: String,

    // single-choice / multi-select
    pub options: Option<Vec<String>>,
    pub max_selections: Option<u64>,

    // numeric-range
    pub numeric_constraints: Option<NumericConstraints>,

    // caller-defined methods
    pub method_schema_uri: Option<String>,
    pub hash_algorithm: Option<String>,
    pub method_schema_hash: Option<String>,
}

///
/// QuestionRef
///
/// Borrowed, shape-independent view of a question. Produced by
/// [`SurveyDefinition::unified_questions`] so the normalizer and validators
/// never see the legacy/multi split.
///

#[derive(Clone, Copy, Debug)]
pub struct QuestionRef<'a> {
    pub question_id: Option<&'a str>,
    pub question: &'a str,
    pub method_type: &'a str,
    pub options: Option<&'a [String]>,
    pub max_selections: Option<u64>,
    pub numeric_constraints: Option<&'a NumericConstraints>,
    pub method_schema_uri: Option<&'a str>,
    pub hash_algorithm: Option<&'a str>,
    pub method_schema_hash: Option<&'a str>,
}

impl<'a> From<&'a Question> for QuestionRef<'a> {
    fn from(q: &'a Question) -> Self {
        Self {
            question_id: q.question_id.as_deref(),
            question: &q.question,
            method_type: &q.method_type,
            options: q.options.as_deref(),
            max_selections: q.max_selections,
            numeric_constraints: q.numeric_constraints.as_ref(),
            method_schema_uri: q.method_schema_uri.as_deref(),
            hash_algorithm: q.hash_algorithm.as_deref(),
            method_schema_hash: q.method_schema_hash.as_deref(),
        }
    }
}

///
/// MethodType
///
/// Answer-collection strategy dispatch. Unrecognized identifiers fall into
/// `Custom` rather than failing, so future method types keep validating and
/// encoding (their schema is opaque to this engine).
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MethodType {
    SingleChoice,
    MultiSelect,
    NumericRange,
    Custom(String),
}

impl MethodType {
    pub const SINGLE_CHOICE: &'static str = "single-choice";
    pub const MULTI_SELECT: &'static str = "multi-select";
    pub const NUMERIC_RANGE: &'static str = "numeric-range";

    #[must_use]
    pub fn from_id(id: &str) -> Self {
        match id {
            Self::SINGLE_CHOICE => Self::SingleChoice,
            Self::MULTI_SELECT => Self::MultiSelect,
            Self::NUMERIC_RANGE => Self::NumericRange,
            other => Self::Custom(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::SingleChoice => Self::SINGLE_CHOICE,
            Self::MultiSelect => Self::MULTI_SELECT,
            Self::NumericRange => Self::NUMERIC_RANGE,
            Self::Custom(id) => id,
        }
    }
}

impl Display for MethodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// NumericConstraints
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericConstraints {
    pub min_value: i64,
    pub max_value: i64,
    #[serde(default)]
    pub step: Option<u64>,
}

///
/// ReferenceAction
///
/// Pointer to the on-chain action this survey is about.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceAction {
    /// 64 hex characters.
    pub transaction_id: String,
    pub action_index: u64,
}

///
/// Lifecycle
///
/// Opaque key/value carrier for scheduling fields. The current schema uses
/// `endEpoch`; legacy payloads carry `startSlot`/`endSlot`. All present keys
/// pass through to the canonical encoding unchanged.
///

pub type Lifecycle = serde_json::Map<String, serde_json::Value>;

/// Lifecycle keys with validated semantics (non-negative integer when present).
pub const LIFECYCLE_KNOWN_KEYS: [&str; 3] = ["endEpoch", "startSlot", "endSlot"];

///
/// EligibilityRole
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
pub enum EligibilityRole {
    #[serde(rename = "constitutional-committee")]
    ConstitutionalCommittee,
    #[serde(rename = "drep")]
    DelegatedRepresentative,
    #[serde(rename = "spo")]
    StakePoolOperator,
}

impl EligibilityRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConstitutionalCommittee => "constitutional-committee",
            Self::DelegatedRepresentative => "drep",
            Self::StakePoolOperator => "spo",
        }
    }
}

impl Display for EligibilityRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// VoteWeighting
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum VoteWeighting {
    #[serde(rename = "credential-based")]
    CredentialBased,
    #[serde(rename = "stake-based")]
    StakeBased,
}

impl VoteWeighting {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CredentialBased => "credential-based",
            Self::StakeBased => "stake-based",
        }
    }
}

impl Display for VoteWeighting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// SurveyResponse
///
/// One submission attempt against a resolved survey. Meaningless without the
/// definition it is validated against.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SurveyResponse {
    pub spec_version: String,
    pub survey_tx_id: String,
    /// Content hash of the survey being answered, 64 hex characters.
    pub survey_hash: String,
    /// Binds the response to one question of a multi-question poll. May be
    /// omitted when the poll has a single question.
    pub question_id: Option<String>,
    /// Zero-based option indices, for choice-based methods.
    pub selection: Option<Vec<u64>>,
    /// Submitted value, for numeric-range methods.
    pub numeric_value: Option<i64>,
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_question_shape_is_authoritative() {
        let def = SurveyDefinition {
            questions: vec![Question {
                question_id: Some("q1".into()),
                question: "Pick one".into(),
                method_type: MethodType::SINGLE_CHOICE.into(),
                options: Some(vec!["A".into(), "B".into()]),
                ..Question::default()
            }],
            // stray legacy fields must be ignored
            question: Some("ignored".into()),
            method_type: Some("numeric-range".into()),
            ..SurveyDefinition::default()
        };

        let qs = def.unified_questions();
        assert_eq!(qs.len(), 1);
        assert_eq!(qs[0].question, "Pick one");
        assert_eq!(qs[0].question_id, Some("q1"));
    }

    #[test]
    fn legacy_shape_resolves_to_one_question() {
        let def = SurveyDefinition {
            question: Some("Agree?".into()),
            method_type: Some(MethodType::SINGLE_CHOICE.into()),
            options: Some(vec!["Yes".into(), "No".into()]),
            ..SurveyDefinition::default()
        };

        let qs = def.unified_questions();
        assert_eq!(qs.len(), 1);
        assert_eq!(qs[0].question_id, None);
        assert_eq!(qs[0].options.unwrap().len(), 2);
    }

    #[test]
    fn empty_definition_has_no_questions() {
        assert!(SurveyDefinition::default().unified_questions().is_empty());
    }

    #[test]
    fn method_type_dispatch_is_open() {
        assert_eq!(
            MethodType::from_id("single-choice"),
            MethodType::SingleChoice
        );
        assert_eq!(MethodType::from_id("multi-select"), MethodType::MultiSelect);
        assert_eq!(
            MethodType::from_id("numeric-range"),
            MethodType::NumericRange
        );
        assert_eq!(
            MethodType::from_id("urn:x-survey:essay"),
            MethodType::Custom("urn:x-survey:essay".into())
        );
    }

    #[test]
    fn wire_names_are_camel_case() {
        let def: SurveyDefinition = serde_json::from_value(serde_json::json!({
            "specVersion": "1.0",
            "title": "T",
            "description": "D",
            "questions": [{
                "questionId": "q1",
                "question": "Pick one",
                "methodType": "single-choice",
                "options": ["A", "B"]
            }],
            "voteWeighting": "stake-based"
        }))
        .unwrap();

        assert_eq!(def.spec_version, "1.0");
        assert_eq!(def.vote_weighting, Some(VoteWeighting::StakeBased));
        assert_eq!(def.questions[0].question_id.as_deref(), Some("q1"));
    }

    #[test]
    fn eligibility_roles_round_trip_their_ids() {
        let roles: BTreeSet<EligibilityRole> =
            serde_json::from_value(serde_json::json!(["spo", "drep"])).unwrap();
        assert!(roles.contains(&EligibilityRole::StakePoolOperator));
        assert!(roles.contains(&EligibilityRole::DelegatedRepresentative));
        assert_eq!(EligibilityRole::ConstitutionalCommittee.to_string(), "constitutional-committee");
    }
}
