//! Configuration of quota thresholds from git config.
//!
//! # Configuration Keys
//!
//! - `quota.nagLimit`: size in MiB from which pushes are accepted with a warning (default 950)
//! - `quota.maxLimit`: size in MiB from which pushes are rejected (default 1024)
//!
//! Values are read from the repository's own config file, `<repo>/config` for bare
//! repositories or `<repo>/.git/config` otherwise. Callers may override either limit
//! afterwards; validation happens once all sources are merged.

pub mod quota;

pub use quota::QuotaConfig;

use crate::policy::QuotaThresholds;
use crate::Error;
use gix_config::File;
use std::path::Path;

/// Result type for configuration parsing operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Read the config file of the repository at `repo`.
///
/// A repository without a config file yields an empty configuration.
pub fn load_repository_config(repo: &Path) -> Result<File<'static>> {
    for candidate in [repo.join("config"), repo.join(".git").join("config")] {
        if !candidate.is_file() {
            continue;
        }
        let text = std::fs::read_to_string(&candidate)?;
        gix_trace::debug!("reading quota configuration from {:?}", candidate);
        return text
            .parse::<File<'static>>()
            .map_err(|e| Error::Config(format!("failed to parse '{}': {}", candidate.display(), e)));
    }
    Ok(File::new(gix_config::file::Metadata::api()))
}

/// Load the thresholds configured for the repository at `repo`.
pub fn load_thresholds(repo: &Path) -> Result<QuotaThresholds> {
    QuotaConfig::from_config(&load_repository_config(repo)?)?.thresholds()
}
