//! Quota policy evaluation.
//!
//! The engine compares the projected repository size against two limits, in
//! order (first match wins):
//! 1. `projected >= max` → rejected
//! 2. `projected >= nag` → accepted with a warning
//! 3. otherwise accepted silently
//!
//! Both limits are inclusive. The engine does no I/O.

pub mod engine;
pub mod thresholds;

pub use engine::{Outcome, QuotaDecision, QuotaPolicyEngine, Reason};
pub use thresholds::QuotaThresholds;
