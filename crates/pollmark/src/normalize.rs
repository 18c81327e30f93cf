//!
//! Normalization of a survey definition into the ordered, key-complete tree
//! the canonical encoder consumes. Both historical payload shapes resolve to
//! one representation here: the tree always carries a `questions` array, with
//! a legacy flat definition contributing its single implicit question. Keys
//! with absent values are omitted entirely — never emitted as null or as an
//! empty placeholder.
//!
//! Byte-level ordering is the encoder's concern; this module fixes *which*
//! keys appear and emits them in declaration order.
//!

use crate::{
    encode::EncodeError,
    model::{MethodType, NumericConstraints, QuestionRef, ReferenceAction, SurveyDefinition},
    node::Node,
};

// wire keys
const KEY_SPEC_VERSION: &str = "specVersion";
const KEY_TITLE: &str = "title";
const KEY_DESCRIPTION: &str = "description";
const KEY_QUESTIONS: &str = "questions";
const KEY_QUESTION_ID: &str = "questionId";
const KEY_QUESTION: &str = "question";
const KEY_METHOD_TYPE: &str = "methodType";
const KEY_OPTIONS: &str = "options";
const KEY_MAX_SELECTIONS: &str = "maxSelections";
const KEY_NUMERIC_CONSTRAINTS: &str = "numericConstraints";
const KEY_MIN_VALUE: &str = "minValue";
const KEY_MAX_VALUE: &str = "maxValue";
const KEY_STEP: &str = "step";
const KEY_METHOD_SCHEMA_URI: &str = "methodSchemaUri";
const KEY_HASH_ALGORITHM: &str = "hashAlgorithm";
const KEY_METHOD_SCHEMA_HASH: &str = "methodSchemaHash";
const KEY_ELIGIBILITY: &str = "eligibility";
const KEY_VOTE_WEIGHTING: &str = "voteWeighting";
const KEY_REFERENCE_ACTION: &str = "referenceAction";
const KEY_TRANSACTION_ID: &str = "transactionId";
const KEY_ACTION_INDEX: &str = "actionIndex";
const KEY_LIFECYCLE: &str = "lifecycle";

///
/// Normalize a survey definition into its canonical tree.
///
/// Total over structurally valid input (validation is the upstream step); the
/// only failure is an unsupported opaque value inside `lifecycle`, which is a
/// programming-contract violation rather than a validation verdict.
///
pub fn normalize(def: &SurveyDefinition) -> Result<Node, EncodeError> {
    let mut root: Vec<(Node, Node)> = Vec::new();

    root.push((Node::text(KEY_SPEC_VERSION), Node::text(&def.spec_version)));
    root.push((Node::text(KEY_TITLE), Node::text(&def.title)));
    root.push((Node::text(KEY_DESCRIPTION), Node::text(&def.description)));

    let questions: Vec<Node> = def.unified_questions().iter().map(question_node).collect();
    root.push((Node::text(KEY_QUESTIONS), Node::Array(questions)));

    if let Some(roles) = &def.eligibility {
        let items = roles.iter().map(|r| Node::text(r.as_str())).collect();
        root.push((Node::text(KEY_ELIGIBILITY), Node::Array(items)));
    }

    if let Some(weighting) = def.vote_weighting {
        root.push((Node::text(KEY_VOTE_WEIGHTING), Node::text(weighting.as_str())));
    }

    if let Some(action) = &def.reference_action {
        root.push((Node::text(KEY_REFERENCE_ACTION), reference_action_node(action)));
    }

    if let Some(lifecycle) = &def.lifecycle {
        let mut entries: Vec<(Node, Node)> = Vec::with_capacity(lifecycle.len());
        for (key, value) in lifecycle {
            // null is how an absent value shows up in an opaque payload
            if value.is_null() {
                continue;
            }
            entries.push((Node::text(key), opaque_node(value)?));
        }
        root.push((Node::text(KEY_LIFECYCLE), Node::Map(entries)));
    }

    Ok(Node::Map(root))
}

fn question_node(q: &QuestionRef<'_>) -> Node {
    let mut entries: Vec<(Node, Node)> = Vec::new();

    if let Some(id) = q.question_id {
        entries.push((Node::text(KEY_QUESTION_ID), Node::text(id)));
    }
    entries.push((Node::text(KEY_QUESTION), Node::text(q.question)));
    entries.push((Node::text(KEY_METHOD_TYPE), Node::text(q.method_type)));

    // Exactly one method group is emitted; fields belonging to a different
    // method are dropped rather than carried into the canonical form.
    match MethodType::from_id(q.method_type) {
        MethodType::SingleChoice => {
            push_options(&mut entries, q.options);
        }
        MethodType::MultiSelect => {
            push_options(&mut entries, q.options);
            if let Some(max) = q.max_selections {
                entries.push((Node::text(KEY_MAX_SELECTIONS), Node::Uint(max)));
            }
        }
        MethodType::NumericRange => {
            if let Some(nc) = q.numeric_constraints {
                entries.push((Node::text(KEY_NUMERIC_CONSTRAINTS), numeric_constraints_node(nc)));
            }
        }
        MethodType::Custom(_) => {
            if let Some(uri) = q.method_schema_uri {
                entries.push((Node::text(KEY_METHOD_SCHEMA_URI), Node::text(uri)));
            }
            if let Some(alg) = q.hash_algorithm {
                entries.push((Node::text(KEY_HASH_ALGORITHM), Node::text(alg)));
            }
            if let Some(hash) = q.method_schema_hash {
                entries.push((Node::text(KEY_METHOD_SCHEMA_HASH), Node::text(hash)));
            }
        }
    }

    Node::Map(entries)
}

fn push_options(entries: &mut Vec<(Node, Node)>, options: Option<&[String]>) {
    if let Some(options) = options {
        let items = options.iter().map(Node::text).collect();
        entries.push((Node::text(KEY_OPTIONS), Node::Array(items)));
    }
}

fn numeric_constraints_node(nc: &NumericConstraints) -> Node {
    let mut entries = vec![
        (Node::text(KEY_MIN_VALUE), Node::int(nc.min_value)),
        (Node::text(KEY_MAX_VALUE), Node::int(nc.max_value)),
    ];
    if let Some(step) = nc.step {
        entries.push((Node::text(KEY_STEP), Node::Uint(step)));
    }

    Node::Map(entries)
}

fn reference_action_node(action: &ReferenceAction) -> Node {
    Node::Map(vec![
        (Node::text(KEY_TRANSACTION_ID), Node::text(&action.transaction_id)),
        (Node::text(KEY_ACTION_INDEX), Node::Uint(action.action_index)),
    ])
}

/// Convert an opaque lifecycle value. Integers, strings, booleans, and nested
/// arrays/objects of the same are supported; floats and nulls are not
/// representable in the canonical form and fail fast.
fn opaque_node(value: &serde_json::Value) -> Result<Node, EncodeError> {
    use serde_json::Value;

    match value {
        Value::Null => Err(EncodeError::UnsupportedValue("null".into())),
        Value::Bool(b) => Ok(Node::Bool(*b)),
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Ok(Node::Uint(u))
            } else if let Some(i) = n.as_i64() {
                Ok(Node::int(i))
            } else {
                Err(EncodeError::UnsupportedValue(format!(
                    "non-integer number {n}"
                )))
            }
        }
        Value::String(s) => Ok(Node::text(s)),
        Value::Array(items) => {
            let items: Result<Vec<Node>, EncodeError> = items.iter().map(opaque_node).collect();
            Ok(Node::Array(items?))
        }
        Value::Object(fields) => {
            let mut entries = Vec::with_capacity(fields.len());
            for (key, value) in fields {
                entries.push((Node::text(key), opaque_node(value)?));
            }
            Ok(Node::Map(entries))
        }
    }
}

///
/// TESTS
///
