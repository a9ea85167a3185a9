//! Object-level changes between two revisions.
//!
//! Records are parsed from the raw diff-tree output of an [`ObjectStore`](crate::ObjectStore):
//!
//! ```text
//! :100644 000000 5713ac70b1aba88fc2d218a015d0b7ff7bf5c244 0000000000000000000000000000000000000000 D	.gitattributes
//! ```

use crate::Error;
use gix_hash::ObjectId;

pub mod classify;
pub mod enumerate;

pub use classify::is_delete_only;
pub use enumerate::enumerate;

/// What happened to an object between two revisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    Added,
    Modified,
    Deleted,
    /// The entry changed its type, e.g. from a regular file to a symlink.
    ///
    /// Neither counts as growth nor enters the size delta.
    TypeChanged,
}

impl Action {
    /// Map a diff-tree status letter. Copies and renames are never produced without `-C`/`-M`.
    pub fn from_status(status: &str) -> Option<Self> {
        Some(match status {
            "A" => Action::Added,
            "M" => Action::Modified,
            "D" => Action::Deleted,
            "T" => Action::TypeChanged,
            _ => return None,
        })
    }
}

/// One changed object between two revisions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChangeRecord {
    /// Mode before the change, e.g. `100644`. Opaque.
    pub source_mode: String,
    /// Mode after the change. Opaque.
    pub dest_mode: String,
    /// Object before the change, null if it did not exist.
    pub source_id: ObjectId,
    /// Object after the change, null if it no longer exists.
    pub dest_id: ObjectId,
    pub action: Action,
    /// Repository relative path, for diagnostics only.
    pub path: String,
}

impl ChangeRecord {
    /// Parse a single line of `git diff-tree -r` output.
    pub fn from_diff_tree_line(line: &str) -> Result<Self, Error> {
        let malformed = |reason: &str| Error::EnumerationFailure {
            message: format!("{reason} in diff-tree line '{line}'"),
        };

        let (meta, path) = match line.split_once('\t') {
            Some((meta, path)) => (meta, Some(path)),
            None => (line, None),
        };
        let mut fields = meta.split_whitespace();
        let mut next = |name: &str| fields.next().ok_or_else(|| malformed(&format!("missing {name}")));

        let source_mode = next("source mode")?.trim_start_matches(':').to_owned();
        let dest_mode = next("destination mode")?.to_owned();
        let source_hex = next("source object id")?;
        let dest_hex = next("destination object id")?;
        let status = next("status")?;
        let path = match path {
            Some(path) => path.to_owned(),
            None => {
                let rest: Vec<_> = fields.collect();
                if rest.is_empty() {
                    return Err(malformed("missing path"));
                }
                rest.join(" ")
            }
        };

        let parse_id = |hex: &str| {
            ObjectId::from_hex(hex.as_bytes()).map_err(|err| malformed(&format!("invalid object id '{hex}' ({err})")))
        };
        let source_id = parse_id(source_hex)?;
        let dest_id = parse_id(dest_hex)?;
        let action = Action::from_status(status).ok_or_else(|| malformed(&format!("unsupported status '{status}'")))?;

        match action {
            Action::Added if !source_id.is_null() => return Err(malformed("added object with a source id")),
            Action::Deleted if !dest_id.is_null() => return Err(malformed("deleted object with a destination id")),
            _ => {}
        }

        Ok(ChangeRecord {
            source_mode,
            dest_mode,
            source_id,
            dest_id,
            action,
            path,
        })
    }
}
