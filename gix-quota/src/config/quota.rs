//! Quota threshold parsing from Git config.

use crate::policy::QuotaThresholds;
use crate::Error;
use gix_config::File;

/// Threshold settings as found in configuration, before defaults are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuotaConfig {
    /// `quota.nagLimit` in MiB
    pub nag_limit_mb: Option<i64>,
    /// `quota.maxLimit` in MiB
    pub max_limit_mb: Option<i64>,
}

impl QuotaConfig {
    /// Create an empty configuration that resolves to the default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load quota configuration from a Git config file.
    ///
    /// This method parses the following configuration keys:
    /// - `quota.nagLimit`: Integer, soft limit in MiB
    /// - `quota.maxLimit`: Integer, hard limit in MiB
    ///
    /// Keys that are absent stay unset.
    pub fn from_config(config: &File<'static>) -> Result<Self, Error> {
        Ok(Self {
            nag_limit_mb: parse_limit(config, "quota.nagLimit")?,
            max_limit_mb: parse_limit(config, "quota.maxLimit")?,
        })
    }

    /// Override the soft limit if `limit` is set.
    pub fn with_nag_limit(mut self, limit: impl Into<Option<i64>>) -> Self {
        if let Some(limit) = limit.into() {
            self.nag_limit_mb = Some(limit);
        }
        self
    }

    /// Override the hard limit if `limit` is set.
    pub fn with_max_limit(mut self, limit: impl Into<Option<i64>>) -> Self {
        if let Some(limit) = limit.into() {
            self.max_limit_mb = Some(limit);
        }
        self
    }

    /// Fill in defaults for unset limits and validate the result.
    pub fn thresholds(&self) -> Result<QuotaThresholds, Error> {
        QuotaThresholds::new(
            self.nag_limit_mb.unwrap_or(QuotaThresholds::DEFAULT_NAG_LIMIT_MB),
            self.max_limit_mb.unwrap_or(QuotaThresholds::DEFAULT_MAX_LIMIT_MB),
        )
    }
}

fn parse_limit(config: &File<'static>, key: &str) -> Result<Option<i64>, Error> {
    match config.integer(key) {
        None => Ok(None),
        Some(Ok(value)) if value > 0 => Ok(Some(value)),
        Some(Ok(value)) => Err(Error::Config(format!(
            "limit for '{key}' must be a positive number of megabytes, got: {value}"
        ))),
        Some(Err(e)) => Err(Error::Config(format!("invalid integer value for '{key}': {e}"))),
    }
}
