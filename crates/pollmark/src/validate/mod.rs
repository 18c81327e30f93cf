//!
//! Structural and semantic validation of survey definitions and responses.
//! Validation never panics on malformed-but-well-typed input and never stops
//! at the first problem: the verdict carries every violated rule in
//! evaluation order, so a caller can display all of them at once.
//!

mod definition;
mod response;

pub use definition::validate_definition;
pub use response::validate_response;

///
/// Verdict
///
/// The outcome of a validation pass. A definition or response is either fully
/// valid or rejected with the complete error set — validation never partially
/// applies.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Verdict {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl Verdict {
    #[must_use]
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }
}

pub(crate) fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

pub(crate) fn is_hex_of_len(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_hexdigit())
}

///
/// TESTS
///
