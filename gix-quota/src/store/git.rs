//! Object store access by running `git` via gix-command.

use super::{Compactor, ObjectStore};
use crate::refs::Revision;
use crate::Error;
use bstr::BString;
use gix_hash::ObjectId;
use std::ffi::OsString;
use std::path::Path;
use std::process::{Output, Stdio};

/// Runs `git -C <repo> ...` for every query.
///
/// Each call spawns one process and waits for it with its output captured, so the
/// child is reaped on every path out of the call, including errors.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: OsString,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

/// Failure to run a git command, before it is mapped to the error of the operation.
struct CommandFailure {
    command: String,
    message: String,
}

impl GitCli {
    /// Use the `git` found in `PATH`.
    pub fn new() -> Self {
        Self::with_program("git")
    }

    /// Use the git executable at `program`.
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The executable this instance runs.
    pub fn program(&self) -> &OsString {
        &self.program
    }

    fn run(&self, repo: &Path, args: &[&str]) -> Result<Vec<u8>, CommandFailure> {
        let command = format!("git {}", args.join(" "));
        gix_trace::debug!("running '{}' in {:?}", command, repo);

        let output = gix_command::prepare(self.program.clone())
            .arg("-C")
            .arg(repo)
            .args(args.iter().copied())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .and_then(std::process::Child::wait_with_output);

        match output {
            Ok(Output { status, stdout, .. }) if status.success() => Ok(stdout),
            Ok(Output { status, stderr, .. }) => {
                let stderr = String::from_utf8_lossy(&stderr);
                let stderr = stderr.trim();
                let message = match status.code() {
                    Some(code) if stderr.is_empty() => format!("exited with status {code}"),
                    Some(code) => format!("exited with status {code}: {stderr}"),
                    None => format!("terminated by signal: {stderr}"),
                };
                Err(CommandFailure { command, message })
            }
            Err(err) => Err(CommandFailure {
                command,
                message: format!("could not be spawned: {err}"),
            }),
        }
    }
}

impl ObjectStore for GitCli {
    fn diff_tree(&self, repo: &Path, old: &Revision, new: &Revision) -> Result<BString, Error> {
        let stdout = self
            .run(
                repo,
                &["diff-tree", "--ignore-submodules=all", "-r", old.as_str(), new.as_str()],
            )
            .map_err(|failure| Error::EnumerationFailure {
                message: format!("'{}' {}", failure.command, failure.message),
            })?;
        Ok(stdout.into())
    }

    fn object_size(&self, repo: &Path, id: &ObjectId) -> Result<u64, Error> {
        let hex = id.to_string();
        let stdout = self
            .run(repo, &["cat-file", "-s", &hex])
            .map_err(|failure| Error::SizeQueryFailure {
                id: *id,
                message: format!("'{}' {}", failure.command, failure.message),
            })?;
        parse_size(&stdout).ok_or_else(|| Error::SizeQueryFailure {
            id: *id,
            message: format!("unexpected output '{}'", String::from_utf8_lossy(&stdout).trim()),
        })
    }
}

impl Compactor for GitCli {
    fn compact(&mut self, repo: &Path) -> Result<(), Error> {
        self.run(repo, &["gc"])
            .map(|_| ())
            .map_err(|failure| Error::StoreCommand {
                command: failure.command,
                message: failure.message,
            })
    }
}

fn parse_size(stdout: &[u8]) -> Option<u64> {
    std::str::from_utf8(stdout).ok()?.trim().parse().ok()
}
