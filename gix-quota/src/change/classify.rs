use super::{Action, ChangeRecord};

/// True if no record adds or modifies an object.
///
/// Such an update can only shrink the repository, so it is accepted without sizing.
/// An empty change set is vacuously delete-only.
pub fn is_delete_only(records: &[ChangeRecord]) -> bool {
    !records
        .iter()
        .any(|record| matches!(record.action, Action::Added | Action::Modified))
}
