//! The two limits a repository is held to.

use crate::Error;

/// Soft and hard size limits in MiB.
///
/// Fixed for the lifetime of the process, and valid by construction: both limits are
/// positive and `nag < max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct QuotaThresholds {
    nag_limit_mb: i64,
    max_limit_mb: i64,
}

impl QuotaThresholds {
    /// Default soft limit in MiB.
    pub const DEFAULT_NAG_LIMIT_MB: i64 = 950;
    /// Default hard limit in MiB.
    pub const DEFAULT_MAX_LIMIT_MB: i64 = 1024;

    /// Create thresholds, validating that both are positive and `nag_limit_mb < max_limit_mb`.
    pub fn new(nag_limit_mb: i64, max_limit_mb: i64) -> Result<Self, Error> {
        if nag_limit_mb <= 0 || max_limit_mb <= 0 {
            return Err(Error::Config(format!(
                "quota limits must be positive, got nag limit {nag_limit_mb} mb and max limit {max_limit_mb} mb"
            )));
        }
        if nag_limit_mb >= max_limit_mb {
            return Err(Error::Config(format!(
                "nag limit ({nag_limit_mb} mb) must be below max limit ({max_limit_mb} mb)"
            )));
        }
        Ok(Self {
            nag_limit_mb,
            max_limit_mb,
        })
    }

    /// Size at which pushes are still accepted, but with a warning.
    pub fn nag_limit_mb(&self) -> i64 {
        self.nag_limit_mb
    }

    /// Size at which pushes are rejected.
    pub fn max_limit_mb(&self) -> i64 {
        self.max_limit_mb
    }
}

impl Default for QuotaThresholds {
    fn default() -> Self {
        Self {
            nag_limit_mb: Self::DEFAULT_NAG_LIMIT_MB,
            max_limit_mb: Self::DEFAULT_MAX_LIMIT_MB,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let t = QuotaThresholds::default();
        assert_eq!(t.nag_limit_mb(), 950);
        assert_eq!(t.max_limit_mb(), 1024);
        assert_eq!(QuotaThresholds::new(950, 1024).unwrap(), t);
    }

    #[test]
    fn nag_must_be_below_max() {
        let err = QuotaThresholds::new(1024, 1024).unwrap_err();
        assert_eq!(err.to_string(), "configuration error: nag limit (1024 mb) must be below max limit (1024 mb)");
        assert!(QuotaThresholds::new(2000, 1000).is_err());
    }

    #[test]
    fn limits_must_be_positive() {
        assert!(QuotaThresholds::new(0, 10).is_err());
        assert!(QuotaThresholds::new(-5, 10).is_err());
        assert!(QuotaThresholds::new(1, 2).is_ok());
    }
}
