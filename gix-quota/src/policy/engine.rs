//! Threshold evaluation.

use super::QuotaThresholds;

/// Result class of a quota check, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    /// Accept the update silently.
    Allowed,
    /// Accept the update, but tell the pusher they are over the nag limit.
    Warned,
    /// Refuse the update.
    Rejected,
}

/// Why a decision came out the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Reason {
    /// The ref did not exist before, nothing was measured.
    NewBranch,
    /// The ref is removed, which cannot grow the repository.
    RefDeleted,
    /// The update only deletes objects and cannot grow the repository.
    DeleteOnly,
    /// The projected size is below the nag limit.
    BelowNagLimit,
    /// The projected size reaches the nag limit.
    NagLimitReached,
    /// The projected size reaches the max limit.
    MaxLimitReached,
}

/// Decision produced for one update.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuotaDecision {
    pub outcome: Outcome,
    pub reason: Reason,
    /// Text for the pusher; present for warnings and rejections.
    pub message: Option<String>,
    /// Repository size after the update, if it was computed.
    pub projected_size_mb: Option<i64>,
}

impl QuotaDecision {
    /// Accept without consulting the thresholds.
    pub fn allow(reason: Reason, projected_size_mb: Option<i64>) -> Self {
        QuotaDecision {
            outcome: Outcome::Allowed,
            reason,
            message: None,
            projected_size_mb,
        }
    }

    /// True unless the update must be refused.
    pub fn is_accepted(&self) -> bool {
        self.outcome != Outcome::Rejected
    }
}

/// Applies [`QuotaThresholds`] to sizes. Pure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuotaPolicyEngine {
    thresholds: QuotaThresholds,
}

impl QuotaPolicyEngine {
    pub fn new(thresholds: QuotaThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &QuotaThresholds {
        &self.thresholds
    }

    /// Decide on an update that changes a repository of `old_size_mb` by `delta_mb`.
    pub fn decide(&self, old_size_mb: i64, delta_mb: i64) -> QuotaDecision {
        let projected = old_size_mb + delta_mb;
        let nag = self.thresholds.nag_limit_mb();
        let max = self.thresholds.max_limit_mb();

        let (outcome, reason, message) = if projected >= max {
            (Outcome::Rejected, Reason::MaxLimitReached, Some(rejection_message(max)))
        } else if projected >= nag {
            (
                Outcome::Warned,
                Reason::NagLimitReached,
                Some(nag_message(projected, nag, max)),
            )
        } else {
            (Outcome::Allowed, Reason::BelowNagLimit, None)
        };

        QuotaDecision {
            outcome,
            reason,
            message,
            projected_size_mb: Some(projected),
        }
    }
}

fn rejection_message(max: i64) -> String {
    format!("Your commit exceeded your quota size of {max} mb. Please use LFS for big files!")
}

fn nag_message(projected: i64, nag: i64, max: i64) -> String {
    format!(
        "\n*** YOU ARE OVER NAGGING QUOTA! ***\n\n\
         Repo size: {projected} mb\n\
         (Nagging quota is {nag} mb / Max quota {max} mb)\n\n\
         *** YOU ARE OVER NAGGING QUOTA! ***\n\n"
    )
}
