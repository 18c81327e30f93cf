//!
//! Process-wide fixed configuration for the survey metadata engine. Everything
//! here is immutable for the lifetime of the process and shared by the
//! normalizer, encoder, hasher, and validators.
//!

/// Transaction-metadata label under which survey payloads are published.
pub const METADATA_LABEL: u64 = 17;

/// Envelope key holding the normalized survey definition.
pub const SURVEY_DETAILS_KEY: &str = "surveyDetails";

/// Envelope key holding the display-only message chunks. Never hashed.
pub const MSG_KEY: &str = "msg";

/// Digest deployed for survey content hashes.
pub const DIGEST_ALGORITHM: &str = "blake2b-256";

/// Rendered length of a content hash (256-bit digest, lowercase hex).
pub const SURVEY_HASH_HEX_LEN: usize = 64;

/// Rendered length of a referenced transaction id.
pub const TX_ID_HEX_LEN: usize = 64;

/// Maximum byte length of a single metadata string on chain. Display messages
/// are chunked to this size.
pub const METADATA_STRING_MAX_BYTES: usize = 64;

/// Minimum number of options a choice-based question must offer.
pub const MIN_OPTIONS: usize = 2;
