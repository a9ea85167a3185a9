//! Validation of the revision identifiers carried by a ref update.
//!
//! Updates arrive as `"<old> <new> [<refname>]"`. Only the first two tokens are
//! significant here; anything after them is ignored. An identifier is accepted as
//! long as it consists of hexadecimal digits, which keeps abbreviated ids usable
//! while still rejecting anything that could be mistaken for an option or a revspec.

use crate::Error;
use std::fmt;

/// Which end of a ref update an identifier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The revision the ref pointed to before the update.
    Source,
    /// The revision the ref will point to after the update.
    Destination,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Source => "old",
            Side::Destination => "new",
        })
    }
}

/// Classification of a single revision identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefState {
    /// A hexadecimal identifier naming an existing revision.
    Valid,
    /// The all-zero identifier: the ref did not exist before, or is being deleted.
    Null,
    /// Contains characters outside the hexadecimal alphabet, or is empty.
    Malformed,
}

/// Classify `input` without allocating.
pub fn validate(input: &str) -> RefState {
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_hexdigit()) {
        RefState::Malformed
    } else if is_null_hex(input) {
        RefState::Null
    } else {
        RefState::Valid
    }
}

/// SHA-1 and SHA-256 spellings of the null object id.
fn is_null_hex(input: &str) -> bool {
    matches!(input.len(), 40 | 64) && input.bytes().all(|b| b == b'0')
}

/// A revision identifier that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Revision(String);

impl Revision {
    /// Validate `input` as the `side` of an update.
    pub fn parse(side: Side, input: &str) -> Result<Self, Error> {
        match validate(input) {
            RefState::Malformed => Err(Error::InvalidRef {
                side,
                value: input.to_owned(),
            }),
            RefState::Valid | RefState::Null => Ok(Revision(input.to_owned())),
        }
    }

    /// True if this is the null sentinel.
    pub fn is_null(&self) -> bool {
        is_null_hex(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The validated old and new revision of a single ref update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefUpdate {
    pub source: Revision,
    pub dest: Revision,
}

impl RefUpdate {
    /// Parse the whitespace separated `"<old> <new> ..."` form.
    ///
    /// Both identifiers are validated before anything else happens, the old one first.
    /// A missing token is reported as an invalid (empty) ref for that side.
    pub fn parse(line: &str) -> Result<Self, Error> {
        let mut tokens = line.split_whitespace();
        let source = Revision::parse(Side::Source, tokens.next().unwrap_or_default())?;
        let dest = Revision::parse(Side::Destination, tokens.next().unwrap_or_default())?;
        Ok(RefUpdate { source, dest })
    }

    /// True if the ref did not exist before this update.
    pub fn is_new_branch(&self) -> bool {
        self.source.is_null()
    }

    /// True if the ref is removed by this update.
    pub fn is_deletion(&self) -> bool {
        self.dest.is_null()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NULL: &str = "0000000000000000000000000000000000000000";
    const A: &str = "5713ac70b1aba88fc2d218a015d0b7ff7bf5c244";
    const B: &str = "1111111111111111111111111111111111111111";

    #[test]
    fn classify_refs() {
        assert_eq!(validate(A), RefState::Valid);
        assert_eq!(validate("ABCDEF0123"), RefState::Valid);
        assert_eq!(validate(NULL), RefState::Null);
        assert_eq!(validate(&"0".repeat(64)), RefState::Null);
        assert_eq!(validate("0000"), RefState::Valid, "short zero runs are not the sentinel");
        assert_eq!(validate("5713ac70-b1ab"), RefState::Malformed);
        assert_eq!(validate("refs/heads/main"), RefState::Malformed);
        assert_eq!(validate(""), RefState::Malformed);
    }

    #[test]
    fn parse_update_with_refname() {
        let update = RefUpdate::parse(&format!("{A} {B} refs/heads/main")).unwrap();
        assert_eq!(update.source.as_str(), A);
        assert_eq!(update.dest.as_str(), B);
        assert!(!update.is_new_branch());
    }

    #[test]
    fn parse_new_branch() {
        let update = RefUpdate::parse(&format!("{NULL}\t{B}")).unwrap();
        assert!(update.is_new_branch());
        assert!(!update.dest.is_null());
    }

    #[test]
    fn parse_ref_deletion() {
        let update = RefUpdate::parse(&format!("{A} {NULL} refs/heads/topic")).unwrap();
        assert!(update.is_deletion());
        assert!(!update.is_new_branch());
    }

    #[test]
    fn malformed_old_ref_is_reported_first() {
        let err = RefUpdate::parse("xyz also-bad").unwrap_err();
        match err {
            Error::InvalidRef { side, value } => {
                assert_eq!(side, Side::Source);
                assert_eq!(value, "xyz");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn malformed_new_ref_names_its_value() {
        let err = RefUpdate::parse(&format!("{A} {B}z")).unwrap_err();
        assert_eq!(err.to_string(), format!("new ref '{B}z' is not a valid ref"));
    }

    #[test]
    fn missing_new_ref_is_invalid() {
        let err = RefUpdate::parse(A).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidRef {
                side: Side::Destination,
                ..
            }
        ));
    }
}
