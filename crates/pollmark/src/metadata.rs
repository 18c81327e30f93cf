//!
//! Display/export form of the metadata envelope. Unlike the hash preimage,
//! the display envelope MAY carry a free-text `msg`, chunked to the on-chain
//! metadata string limit. Only the `surveyDetails` subtree contributes to the
//! content hash.
//!

use crate::{
    Error,
    constants::{METADATA_LABEL, METADATA_STRING_MAX_BYTES, MSG_KEY, SURVEY_DETAILS_KEY},
    model::SurveyDefinition,
    node::Node,
    normalize::normalize,
};
use serde_json::{Map, Value};

///
/// Build the display envelope `{17: {msg?, surveyDetails}}` for a definition,
/// with an optional accompanying message. The message is cosmetic: it never
/// affects the survey's content hash.
///
pub fn display_envelope(def: &SurveyDefinition, message: Option<&str>) -> Result<Value, Error> {
    let details = node_to_json(&normalize(def)?);

    let mut body = Map::new();
    if let Some(message) = message {
        let chunks = chunk_message(message);
        if !chunks.is_empty() {
            body.insert(
                MSG_KEY.to_string(),
                Value::Array(chunks.into_iter().map(Value::String).collect()),
            );
        }
    }
    body.insert(SURVEY_DETAILS_KEY.to_string(), details);

    let mut outer = Map::new();
    outer.insert(METADATA_LABEL.to_string(), Value::Object(body));

    Ok(Value::Object(outer))
}

///
/// Split a message into chunks that each fit the on-chain metadata string
/// limit, never splitting inside a character.
///
#[must_use]
pub fn chunk_message(message: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for ch in message.chars() {
        if current.len() + ch.len_utf8() > METADATA_STRING_MAX_BYTES {
            chunks.push(std::mem::take(&mut current));
        }
        current.push(ch);
    }
    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

/// Render a normalized tree as JSON for display. Non-text map keys become
/// their decimal rendering (the envelope label, for instance).
fn node_to_json(node: &Node) -> Value {
    match node {
        Node::Map(entries) => {
            let mut obj = Map::new();
            for (key, value) in entries {
                let key = match key {
                    Node::Text(s) => s.clone(),
                    Node::Uint(n) => n.to_string(),
                    Node::Int(n) => n.to_string(),
                    Node::Bool(b) => b.to_string(),
                    Node::Map(_) | Node::Array(_) => continue,
                };
                obj.insert(key, node_to_json(value));
            }
            Value::Object(obj)
        }
        Node::Array(items) => Value::Array(items.iter().map(node_to_json).collect()),
        Node::Text(s) => Value::String(s.clone()),
        Node::Uint(n) => Value::Number((*n).into()),
        Node::Int(n) => Value::Number((*n).into()),
        Node::Bool(b) => Value::Bool(*b),
    }
}

///
/// TESTS
///
