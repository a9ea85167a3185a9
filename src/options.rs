use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Debug, clap::Parser)]
#[clap(name = "gix-quota-hook", about = "Reject pushes that grow a repository past its size quota", version = clap::crate_version!())]
pub struct Args {
    /// The soft limit in MiB. Pushes reaching it are accepted with a warning.
    ///
    /// Overrides `quota.nagLimit` from the repository configuration.
    #[clap(long, global = true, value_name = "MB")]
    pub nag_limit: Option<i64>,

    /// The hard limit in MiB. Pushes reaching it are rejected.
    ///
    /// Overrides `quota.maxLimit` from the repository configuration.
    #[clap(long, global = true, value_name = "MB")]
    pub max_limit: Option<i64>,

    /// The git executable used to inspect and compact the repository.
    #[clap(long, global = true, default_value = "git", value_name = "PATH")]
    pub git: OsString,

    /// Log what is measured and decided to stderr. Repeat for more detail.
    #[clap(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[clap(subcommand)]
    pub cmd: Subcommands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Subcommands {
    /// Check a single ref update, given as `"<old> <new> [<refname>]"`.
    Check {
        /// The repository to check, the directory containing `objects/` or a worktree with `.git/`.
        repository: PathBuf,
        /// Who pushed. Only used for logging.
        actor: String,
        /// The old and new revision, separated by whitespace.
        ref_update: String,
    },
    /// Run as git `pre-receive` hook, reading `<old> <new> <refname>` lines from stdin.
    #[clap(visible_alias = "hook")]
    PreReceive {
        /// The repository receiving the push.
        #[clap(long, env = "GIT_DIR", default_value = ".")]
        repo: PathBuf,
        /// Who pushed. Defaults to `$GL_ID`, then `$USER`.
        #[clap(long, env = "GL_ID")]
        actor: Option<String>,
    },
}
