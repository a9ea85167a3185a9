//! The pre-receive quota check.
//!
//! [`QuotaHook`] runs the whole decision for one ref update, in this order:
//! 1. validate both revisions; a malformed one aborts before any store access
//! 2. accept ref creation and deletion outright, one side has no revision to diff against
//! 3. compact and measure the repository
//! 4. enumerate the changed objects; accept delete-only updates
//! 5. size the changes and apply the thresholds
//!
//! Every step blocks until it is done. Nothing is retried and nothing is shared
//! between invocations besides the thresholds.
//!
//! # Examples
//!
//! ```no_run
//! use gix_quota::{GitCli, QuotaHook, QuotaThresholds};
//!
//! let mut hook = QuotaHook::with_git(QuotaThresholds::default(), GitCli::new());
//! let decision = hook.pre_receive(
//!     "/srv/git/project.git",
//!     "key-42",
//!     "5713ac70b1aba88fc2d218a015d0b7ff7bf5c244 e69de29bb2d1d6434b8b29ae775ad8c2e48c5391 refs/heads/main",
//! )?;
//! if let Some(message) = decision.message {
//!     print!("{message}");
//! }
//! # Ok::<_, gix_quota::Error>(())
//! ```

use crate::change;
use crate::policy::{Outcome, QuotaDecision, QuotaPolicyEngine, QuotaThresholds, Reason};
use crate::refs::{RefUpdate, Revision};
use crate::size::{self, DiskGauge, RepositorySizeGauge};
use crate::store::{GitCli, ObjectStore};
use crate::Error;
use std::path::{Path, PathBuf};

/// A single ref update to evaluate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRequest {
    pub repository_path: PathBuf,
    /// Who pushed. Used for attribution in logs only.
    pub actor: String,
    pub update: RefUpdate,
}

impl UpdateRequest {
    /// Build a request from the `"<old> <new> [<refname>]"` form, validating both revisions.
    pub fn parse(
        repository_path: impl Into<PathBuf>,
        actor: impl Into<String>,
        ref_update: &str,
    ) -> Result<Self, Error> {
        Ok(UpdateRequest {
            repository_path: repository_path.into(),
            actor: actor.into(),
            update: RefUpdate::parse(ref_update)?,
        })
    }

    pub fn source_revision(&self) -> &Revision {
        &self.update.source
    }

    pub fn dest_revision(&self) -> &Revision {
        &self.update.dest
    }
}

/// Evaluates ref updates against quota thresholds.
#[derive(Debug, Clone)]
pub struct QuotaHook<S, G> {
    engine: QuotaPolicyEngine,
    store: S,
    gauge: G,
}

impl QuotaHook<GitCli, DiskGauge<GitCli>> {
    /// Query and compact repositories through `git`.
    pub fn with_git(thresholds: QuotaThresholds, git: GitCli) -> Self {
        QuotaHook::new(thresholds, git.clone(), DiskGauge::new(git))
    }
}

impl<S: ObjectStore, G: RepositorySizeGauge> QuotaHook<S, G> {
    pub fn new(thresholds: QuotaThresholds, store: S, gauge: G) -> Self {
        Self {
            engine: QuotaPolicyEngine::new(thresholds),
            store,
            gauge,
        }
    }

    pub fn thresholds(&self) -> &QuotaThresholds {
        self.engine.thresholds()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn gauge(&self) -> &G {
        &self.gauge
    }

    /// Check the update given as `ref_update` against `repo`.
    ///
    /// Accepted updates return their decision, which carries a message to show the pusher
    /// if they are over the nag limit. A rejected update is returned as [`Error::QuotaExceeded`].
    pub fn pre_receive(
        &mut self,
        repo: impl AsRef<Path>,
        actor: &str,
        ref_update: &str,
    ) -> Result<QuotaDecision, Error> {
        let request = UpdateRequest::parse(repo.as_ref(), actor, ref_update)?;
        match self.evaluate(&request)? {
            QuotaDecision {
                outcome: Outcome::Rejected,
                projected_size_mb,
                ..
            } => Err(Error::QuotaExceeded {
                max_limit_mb: self.thresholds().max_limit_mb(),
                projected_size_mb: projected_size_mb.unwrap_or_default(),
            }),
            decision => Ok(decision),
        }
    }

    /// Produce the decision for `request`, including rejections.
    pub fn evaluate(&mut self, request: &UpdateRequest) -> Result<QuotaDecision, Error> {
        let _span = gix_trace::coarse!("gix_quota::QuotaHook::evaluate()");
        let update = &request.update;

        if update.is_new_branch() {
            gix_trace::info!("{} creates a ref at {}, skipping quota check", request.actor, update.dest);
            return Ok(QuotaDecision::allow(Reason::NewBranch, None));
        }
        if update.is_deletion() {
            gix_trace::info!("{} deletes a ref at {}, skipping quota check", request.actor, update.source);
            return Ok(QuotaDecision::allow(Reason::RefDeleted, None));
        }

        let repo = request.repository_path.as_path();
        let current_mb = self.gauge.current_size_mb(repo)?;
        let records = change::enumerate(&self.store, repo, update)?;

        // Already being over a limit doesn't matter here, cleanups always go through.
        if change::is_delete_only(&records) {
            gix_trace::info!("update by {} only deletes objects, skipping size computation", request.actor);
            return Ok(QuotaDecision::allow(Reason::DeleteOnly, Some(current_mb)));
        }

        let delta_mb = size::delta_mb(&self.store, repo, &records)?;
        let decision = self.engine.decide(current_mb, delta_mb);
        match decision.outcome {
            Outcome::Allowed => gix_trace::debug!(
                "update by {} allowed: {} MiB + {} MiB",
                request.actor,
                current_mb,
                delta_mb
            ),
            Outcome::Warned => gix_trace::warn!(
                "update by {} over nag limit: {} MiB + {} MiB >= {} MiB",
                request.actor,
                current_mb,
                delta_mb,
                self.thresholds().nag_limit_mb()
            ),
            Outcome::Rejected => gix_trace::warn!(
                "update by {} rejected: {} MiB + {} MiB >= {} MiB",
                request.actor,
                current_mb,
                delta_mb,
                self.thresholds().max_limit_mb()
            ),
        }
        Ok(decision)
    }
}
