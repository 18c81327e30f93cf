//! Canonical metadata encoding and validation for on-chain surveys.
//!
//! Pollmark turns a survey definition into a deterministic CBOR byte sequence
//! and a Blake2b-256 content hash, so that independent parties — browser,
//! CLI, chain indexer — compute the identical identity for the same logical
//! poll. It also enforces the structural rules that make a definition or a
//! response to it well-formed before hashing or submission.
//!
//! The pipeline is `validate` → [`normalize`] → [`encode`] → [`hash`]; every
//! stage is a pure, synchronous computation over immutable input, safe to
//! call concurrently and to memoize.

pub mod constants;
pub mod encode;
pub mod hash;
pub mod metadata;
pub mod model;
pub mod node;
pub mod normalize;
pub mod validate;

pub use thiserror::Error as ThisError;

// the common surface, re-exported flat
pub use encode::{EncodeError, decode, encode};
pub use hash::{HashError, digest, digest_verified, survey_hash, verify_survey_hash};
pub use metadata::{chunk_message, display_envelope};
pub use model::{
    EligibilityRole, Lifecycle, MethodType, NumericConstraints, Question, ReferenceAction,
    SurveyDefinition, SurveyResponse, VoteWeighting,
};
pub use node::Node;
pub use normalize::normalize;
pub use validate::{Verdict, validate_definition, validate_response};

///
/// Crate Version
///

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Error
///
/// Top-level error covering the fail-fast conditions. Validation outcomes are
/// not errors — they are [`Verdict`] values, returned so a caller can show
/// every violation at once.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Hash(#[from] HashError),
}
