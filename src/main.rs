#![deny(rust_2018_idioms)]

use std::io::BufRead;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use gix_quota::{DiskGauge, GitCli, Kind, QuotaConfig, QuotaHook, QuotaThresholds};

mod options;
use options::{Args, Subcommands};

type Hook = QuotaHook<GitCli, DiskGauge<GitCli>>;

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<gix_quota::Error>() {
                // git relays this to the pusher verbatim.
                Some(quota) if quota.is_quota_exceeded() => eprintln!("{quota}"),
                _ => eprintln!("Error: {err:#}"),
            }
            ExitCode::from(exit_code(&err))
        }
    }
}

/// `1` for a rejected push, `2` for unusable input or configuration, `3` if the repository could not be inspected.
fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<gix_quota::Error>().map(gix_quota::Error::kind) {
        Some(Kind::Quota) => 1,
        Some(Kind::Input | Kind::Config) | None => 2,
        Some(Kind::Store | Kind::Io) => 3,
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let git = GitCli::with_program(args.git);
    match args.cmd {
        Subcommands::Check {
            repository,
            actor,
            ref_update,
        } => {
            let mut hook = QuotaHook::with_git(thresholds(&repository, args.nag_limit, args.max_limit)?, git);
            check(&mut hook, &repository, &actor, &ref_update)
        }
        Subcommands::PreReceive { repo, actor } => {
            let actor = actor
                .or_else(|| std::env::var("USER").ok())
                .unwrap_or_else(|| "unknown".into());
            let mut hook = QuotaHook::with_git(thresholds(&repo, args.nag_limit, args.max_limit)?, git);
            for (line_number, line) in std::io::stdin().lock().lines().enumerate() {
                let line = line
                    .map_err(gix_quota::Error::from)
                    .context("Could not read ref updates from stdin")?;
                if line.trim().is_empty() {
                    continue;
                }
                check(&mut hook, &repo, &actor, &line)
                    .with_context(|| format!("Ref update on line {} was not accepted", line_number + 1))?;
            }
            Ok(())
        }
    }
}

fn check(hook: &mut Hook, repo: &Path, actor: &str, ref_update: &str) -> anyhow::Result<()> {
    let decision = hook.pre_receive(repo, actor, ref_update)?;
    if let Some(message) = decision.message {
        print!("{message}");
    }
    Ok(())
}

/// Repository configuration, overridden by whichever limits were given on the command line.
fn thresholds(repo: &Path, nag_limit: Option<i64>, max_limit: Option<i64>) -> anyhow::Result<QuotaThresholds> {
    let config = gix_quota::config::load_repository_config(repo)?;
    Ok(QuotaConfig::from_config(&config)?
        .with_nag_limit(nag_limit)
        .with_max_limit(max_limit)
        .thresholds()?)
}

#[cfg(feature = "tracing")]
fn init_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let level = match verbose {
        0 => "error",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(not(feature = "tracing"))]
fn init_tracing(_verbose: u8) {}
