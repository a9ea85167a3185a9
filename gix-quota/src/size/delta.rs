//! The size an update adds to (or removes from) a repository.

use super::to_mb;
use crate::change::{Action, ChangeRecord};
use crate::store::ObjectStore;
use crate::Error;
use gix_hash::ObjectId;
use std::path::Path;

/// Compute the net growth in MiB implied by `records`.
///
/// - added: `+size(dest)`
/// - modified: `+size(dest) - size(source)`
/// - deleted: `-size(source)`
/// - type changed: nothing
///
/// Each object size is truncated to whole MiB before it enters the sum. The first
/// failing size query aborts the computation.
pub fn delta_mb(store: &impl ObjectStore, repo: &Path, records: &[ChangeRecord]) -> Result<i64, Error> {
    let size = |id: &ObjectId| store.object_size(repo, id).map(to_mb);
    let mut total = 0i64;
    for record in records {
        total += match record.action {
            Action::Added => size(&record.dest_id)?,
            Action::Modified => size(&record.dest_id)? - size(&record.source_id)?,
            Action::Deleted => -size(&record.source_id)?,
            Action::TypeChanged => 0,
        };
    }
    gix_trace::debug!("{} changed objects amount to {} MiB", records.len(), total);
    Ok(total)
}
