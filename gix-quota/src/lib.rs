/*!
Size quota enforcement for updates pushed into git repositories.

The crate decides, before a ref update is accepted, whether the objects it
introduces would grow the repository past a soft (nag) or hard (max) limit.

Pipeline per update
- [`refs`]: validate the old and new revision and detect branch creation.
- [`size::gauge`]: compact the repository, then measure it on disk.
- [`change`]: enumerate the changed objects and spot delete-only updates.
- [`size::delta`]: turn changed objects into a size delta in MiB.
- [`policy`]: apply the thresholds and produce a [`QuotaDecision`].

Storage is reached only through the ports in [`store`], so the pipeline can be
driven by a scripted store in tests and by `git` in production.

Design principles
- Thresholds are an immutable value handed to the engine at construction.
- Every fatal condition is a typed [`Error`] with a stable [`Kind`].
- The decision itself is a pure function of two sizes and the thresholds.
*/

#![forbid(unsafe_code)]

pub mod change;
pub mod config;
pub mod hook;
pub mod policy;
pub mod refs;
pub mod size;
pub mod store;

pub use change::{Action, ChangeRecord};
pub use config::QuotaConfig;
pub use hook::{QuotaHook, UpdateRequest};
pub use policy::{Outcome, QuotaDecision, QuotaPolicyEngine, QuotaThresholds, Reason};
pub use refs::{RefState, RefUpdate, Revision, Side};
pub use size::{DiskGauge, RepositorySizeGauge};
pub use store::{Compactor, GitCli, ObjectStore};

use gix_hash::ObjectId;
use std::path::PathBuf;

/// Stable high-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// The caller handed us something unusable, like a malformed ref or a missing repository.
    Input,
    /// The update would exceed the hard limit.
    Quota,
    /// The object store could not be queried or answered with garbage.
    Store,
    /// Thresholds or configuration values are invalid.
    Config,
    /// I/O errors from filesystem or OS interactions.
    Io,
}

/// Error type for operations provided by this crate.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A revision identifier contains characters outside the hexadecimal alphabet.
    #[error("{side} ref '{value}' is not a valid ref")]
    InvalidRef { side: Side, value: String },
    /// The repository path does not denote a directory.
    #[error("{} is not a valid repository", .path.display())]
    InvalidRepository { path: PathBuf },
    /// The projected repository size reaches the hard limit.
    #[error("Your commit exceeded your quota size of {max_limit_mb} mb. Please use LFS for big files!")]
    QuotaExceeded { max_limit_mb: i64, projected_size_mb: i64 },
    /// The change set between two revisions could not be listed or parsed.
    #[error("failed to enumerate changed objects: {message}")]
    EnumerationFailure { message: String },
    /// The size of a changed object could not be determined.
    #[error("failed to query the size of object {id}: {message}")]
    SizeQueryFailure { id: ObjectId, message: String },
    /// A store command other than a query failed, e.g. compaction.
    #[error("'{command}' failed: {message}")]
    StoreCommand { command: String, message: String },
    /// Invalid thresholds or configuration values.
    #[error("configuration error: {0}")]
    Config(String),
    /// I/O errors from filesystem or OS interactions.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Fast classification helper returning a stable error kind.
    pub fn kind(&self) -> Kind {
        match self {
            Error::InvalidRef { .. } | Error::InvalidRepository { .. } => Kind::Input,
            Error::QuotaExceeded { .. } => Kind::Quota,
            Error::EnumerationFailure { .. } | Error::SizeQueryFailure { .. } | Error::StoreCommand { .. } => {
                Kind::Store
            }
            Error::Config(_) => Kind::Config,
            Error::Io(_) => Kind::Io,
        }
    }

    /// Returns true if this is the business-rule rejection rather than a failure to evaluate.
    pub fn is_quota_exceeded(&self) -> bool {
        self.kind() == Kind::Quota
    }
}

/// Convenient crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;
