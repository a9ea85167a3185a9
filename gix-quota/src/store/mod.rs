//! Ports to the object store the quota decision is computed from.
//!
//! The pipeline never talks to storage directly. It asks an [`ObjectStore`] for
//! tree diffs and object sizes, and a [`Compactor`] to compact the repository
//! before it is measured. [`GitCli`] implements both by running `git`.

use crate::refs::Revision;
use crate::Error;
use bstr::BString;
use gix_hash::ObjectId;
use std::path::Path;

pub mod git;

pub use git::GitCli;

/// Read-only queries against a repository's object store.
pub trait ObjectStore {
    /// Return the raw recursive tree diff between `old` and `new`, one changed object per line,
    /// in the format of `git diff-tree -r --ignore-submodules=all`.
    ///
    /// Paths are passed through as the store emits them and need not be valid UTF-8.
    ///
    /// Failures are reported as [`Error::EnumerationFailure`].
    fn diff_tree(&self, repo: &Path, old: &Revision, new: &Revision) -> Result<BString, Error>;

    /// Return the size of the object `id` in bytes.
    ///
    /// Failures are reported as [`Error::SizeQueryFailure`].
    fn object_size(&self, repo: &Path, id: &ObjectId) -> Result<u64, Error>;
}

/// Storage compaction.
///
/// Unlike [`ObjectStore`], this mutates the repository on disk: loose objects get
/// packed and unreachable ones may be pruned. Logical content stays the same.
pub trait Compactor {
    /// Compact the object store of `repo` in place.
    fn compact(&mut self, repo: &Path) -> Result<(), Error>;
}

impl<T: ObjectStore + ?Sized> ObjectStore for &T {
    fn diff_tree(&self, repo: &Path, old: &Revision, new: &Revision) -> Result<BString, Error> {
        (**self).diff_tree(repo, old, new)
    }

    fn object_size(&self, repo: &Path, id: &ObjectId) -> Result<u64, Error> {
        (**self).object_size(repo, id)
    }
}

impl<T: Compactor + ?Sized> Compactor for &mut T {
    fn compact(&mut self, repo: &Path) -> Result<(), Error> {
        (**self).compact(repo)
    }
}
