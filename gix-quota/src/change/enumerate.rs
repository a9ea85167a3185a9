//! Listing the objects a ref update adds, modifies or deletes.

use super::ChangeRecord;
use crate::refs::RefUpdate;
use crate::store::ObjectStore;
use crate::Error;
use bstr::ByteSlice;
use std::path::Path;

/// Ask `store` for the changes between the two revisions of `update` and parse them.
///
/// Records are returned in the order the store lists them. An update creating or deleting
/// a ref has nothing to diff and must be short-circuited by the caller before enumeration;
/// passing one in is an [`Error::EnumerationFailure`], never an empty set.
///
/// Paths that aren't valid UTF-8 are decoded lossily as they only serve diagnostics.
pub fn enumerate(store: &impl ObjectStore, repo: &Path, update: &RefUpdate) -> Result<Vec<ChangeRecord>, Error> {
    if update.is_new_branch() || update.is_deletion() {
        return Err(Error::EnumerationFailure {
            message: format!(
                "update from {} to {} has no pair of revisions to compare",
                update.source, update.dest
            ),
        });
    }

    let raw = store.diff_tree(repo, &update.source, &update.dest)?;
    let records = raw
        .lines()
        .map(ByteSlice::to_str_lossy)
        .filter(|line| !line.trim().is_empty())
        .map(|line| ChangeRecord::from_diff_tree_line(&line))
        .collect::<Result<Vec<_>, _>>()?;

    gix_trace::debug!(
        "{} changed objects between {} and {}",
        records.len(),
        update.source,
        update.dest
    );
    Ok(records)
}
