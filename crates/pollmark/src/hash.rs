//!
//! Content hashing for survey definitions: Blake2b-256 over the canonical
//! CBOR bytes of the fixed envelope `{17: {"surveyDetails": …}}`, rendered as
//! lowercase hex. The envelope is not user-configurable, and a display `msg`
//! is never part of the preimage — two definitions differing only in an
//! accompanying message hash identically.
//!

use crate::{
    Error, ThisError,
    constants::{METADATA_LABEL, SURVEY_DETAILS_KEY},
    encode::{decode, encode},
    model::SurveyDefinition,
    node::Node,
    normalize::normalize,
};
use blake2::{Blake2b, Digest, digest::consts::U32};
use tracing::debug;

type Blake2b256 = Blake2b<U32>;

///
/// HashError
///

#[derive(Debug, ThisError)]
pub enum HashError {
    #[error("digest input is not canonical encoder output: {0}")]
    DigestInputMismatch(String),
}

///
/// Wrap a normalized definition tree in the fixed hashing envelope.
///
#[must_use]
pub fn canonical_envelope(details: Node) -> Node {
    Node::Map(vec![(
        Node::Uint(METADATA_LABEL),
        Node::Map(vec![(Node::text(SURVEY_DETAILS_KEY), details)]),
    )])
}

///
/// Blake2b-256 digest of arbitrary bytes, as 64 lowercase hex characters.
///
#[must_use]
pub fn digest(bytes: &[u8]) -> String {
    hex::encode(Blake2b256::digest(bytes))
}

///
/// Digest with a canonicality check on the input.
///
/// Callers are expected to hash canonical encoder output only; bytes that do
/// not decode, or that re-encode to a different sequence, are a caller error.
///
pub fn digest_verified(bytes: &[u8]) -> Result<String, HashError> {
    let node = decode(bytes).map_err(|e| HashError::DigestInputMismatch(e.to_string()))?;
    let reencoded = encode(&node).map_err(|e| HashError::DigestInputMismatch(e.to_string()))?;

    if reencoded != bytes {
        return Err(HashError::DigestInputMismatch(
            "input bytes are not in canonical form".into(),
        ));
    }

    Ok(digest(bytes))
}

///
/// Content hash of a survey definition: normalize, wrap in the envelope,
/// canonically encode, digest. The resulting string is the poll's on-chain
/// identity.
///
pub fn survey_hash(def: &SurveyDefinition) -> Result<String, Error> {
    let tree = normalize(def)?;
    let bytes = encode(&canonical_envelope(tree))?;
    let hash = digest(&bytes);

    debug!(%hash, bytes = bytes.len(), "survey content hash computed");

    Ok(hash)
}

///
/// Recompute a definition's hash and compare it to a claimed one (case
/// insensitively — renderers differ on hex case, the digest does not).
///
pub fn verify_survey_hash(def: &SurveyDefinition, claimed: &str) -> Result<bool, Error> {
    let computed = survey_hash(def)?;

    Ok(computed.eq_ignore_ascii_case(claimed))
}

///
/// TESTS
///
