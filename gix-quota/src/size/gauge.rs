//! Measuring how much space a repository takes on disk.

use super::to_mb;
use crate::store::Compactor;
use crate::Error;
use std::path::Path;

/// Current on-disk size of a repository.
pub trait RepositorySizeGauge {
    /// Return the size of `repo` in whole MiB.
    ///
    /// Implementations may mutate the repository to get a steady-state reading; see [`DiskGauge`].
    fn current_size_mb(&mut self, repo: &Path) -> Result<i64, Error>;
}

/// Compacts the repository, then sums the sizes of all files below its root.
///
/// Every measurement runs the [`Compactor`] first so loose objects from earlier pushes
/// don't inflate the result. This is a visible side effect of every quota check and the
/// dominant cost of an invocation. Nothing is cached.
#[derive(Debug, Clone)]
pub struct DiskGauge<C> {
    compactor: C,
}

impl<C: Compactor> DiskGauge<C> {
    pub fn new(compactor: C) -> Self {
        Self { compactor }
    }

    pub fn compactor(&self) -> &C {
        &self.compactor
    }
}

impl<C: Compactor> RepositorySizeGauge for DiskGauge<C> {
    fn current_size_mb(&mut self, repo: &Path) -> Result<i64, Error> {
        if !repo.is_dir() {
            return Err(Error::InvalidRepository { path: repo.to_owned() });
        }
        self.compactor.compact(repo)?;
        let bytes = disk_usage(repo)?;
        let size = to_mb(bytes);
        gix_trace::info!("repository {:?} uses {} bytes ({} MiB) after compaction", repo, bytes, size);
        Ok(size)
    }
}

/// Sum the lengths of all regular files below `root`. Symbolic links are not followed.
pub fn disk_usage(root: &Path) -> Result<u64, Error> {
    let mut total = 0;
    for entry in walkdir::WalkDir::new(root) {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_file() {
            total += entry.metadata().map_err(std::io::Error::from)?.len();
        }
    }
    Ok(total)
}
