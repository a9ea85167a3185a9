//! Sizes in whole mebibytes: the current footprint of a repository and the delta
//! an update would add to it.
//!
//! All conversions truncate. This happens per object, before summation, so changes
//! smaller than 1 MiB each do not register at all.

pub mod delta;
pub mod gauge;

pub use delta::delta_mb;
pub use gauge::{DiskGauge, RepositorySizeGauge};

/// Bytes in one mebibyte, the unit of all quota arithmetic.
pub const BYTES_PER_MB: u64 = 1024 * 1024;

/// Convert `bytes` to whole mebibytes, truncating.
pub fn to_mb(bytes: u64) -> i64 {
    (bytes / BYTES_PER_MB) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_mb_truncates() {
        assert_eq!(to_mb(0), 0);
        assert_eq!(to_mb(BYTES_PER_MB - 1), 0);
        assert_eq!(to_mb(BYTES_PER_MB), 1);
        assert_eq!(to_mb(5 * BYTES_PER_MB + BYTES_PER_MB / 2), 5);
    }
}
