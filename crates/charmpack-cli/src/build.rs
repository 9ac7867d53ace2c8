//! Charm build orchestration
//!
//! Building a charm (resolving bases, installing dependencies, staging the
//! tree) is delegated to an external orchestrator. This module defines the
//! request handed to it and the adapter that runs it as a subprocess.

use charmpack_core::{Environment, PackError, PackResult};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::debug;

/// Environment variable naming the orchestrator program
pub const BUILDER_VAR: &str = "CHARMPACK_BUILDER";

/// Orchestrator program used when `CHARMPACK_BUILDER` is unset
pub const DEFAULT_BUILDER: &str = "charm-builder";

/// Normalized charm build request, forwarded verbatim to the orchestrator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRequest {
    /// Project directory to build from
    #[serde(rename = "from")]
    pub from: PathBuf,

    /// Requirement files for the charm's dependencies
    pub requirement: Vec<PathBuf>,

    /// Charm entry point script
    pub entrypoint: Option<PathBuf>,

    /// Indices of the bases to build for; empty means all
    pub bases_indices: Vec<usize>,

    /// Build on the host instead of a managed instance
    pub destructive_mode: bool,

    /// Continue past linting problems
    pub force: bool,
}

/// A charm tree staged by the orchestrator, ready to be archived
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedCharm {
    /// Archive file stem
    pub name: String,

    /// Directory holding the staged tree
    pub staged_dir: PathBuf,
}

/// Runs a charm build
pub trait CharmBuilder {
    /// Build the charm described by `request`, one staged tree per base
    fn build(&self, request: &BuildRequest) -> PackResult<Vec<StagedCharm>>;
}

/// Orchestrator run as a child process
///
/// The request is written as JSON to the child's stdin. The child answers
/// with one JSON [`StagedCharm`] per line on stdout. Relative staged
/// directories are resolved against the project directory.
#[derive(Debug, Clone)]
pub struct ExternalBuilder {
    program: OsString,
    args: Vec<OsString>,
}

impl ExternalBuilder {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Add arguments passed before anything else on the command line
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Use the command line in `CHARMPACK_BUILDER`, or the default program
    ///
    /// The variable is split on whitespace: the first word is the program,
    /// the rest are its arguments.
    pub fn from_env(env: &Environment) -> Self {
        let command = env
            .var(BUILDER_VAR)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or(DEFAULT_BUILDER);
        let mut words = command.split_whitespace();
        let program = words.next().unwrap_or(DEFAULT_BUILDER);
        Self::new(program).args(words)
    }

    fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

impl CharmBuilder for ExternalBuilder {
    fn build(&self, request: &BuildRequest) -> PackResult<Vec<StagedCharm>> {
        let payload = serde_json::to_vec(request)?;
        debug!("Running charm builder '{}'", self.program_name());

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .current_dir(&request.from)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| {
                PackError::BuildFailed(format!("cannot run '{}': {e}", self.program_name()))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&payload).map_err(|e| {
                PackError::BuildFailed(format!("cannot send the build request: {e}"))
            })?;
            // stdin closes here so the child sees the end of the request
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(PackError::BuildFailed(format!(
                "'{}' failed ({})",
                self.program_name(),
                output.status
            )));
        }

        let staged = parse_staged(&output.stdout, request)?;
        debug!("Charm builder staged {} charm(s)", staged.len());
        Ok(staged)
    }
}

/// Parse the orchestrator's stdout, one record per non-blank line
fn parse_staged(stdout: &[u8], request: &BuildRequest) -> PackResult<Vec<StagedCharm>> {
    let text = String::from_utf8_lossy(stdout);

    let mut staged = Vec::new();
    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let mut charm: StagedCharm = serde_json::from_str(line).map_err(|e| {
            PackError::BuildFailed(format!("invalid builder output on line {}: {e}", index + 1))
        })?;
        if charm.staged_dir.is_relative() {
            charm.staged_dir = request.from.join(&charm.staged_dir);
        }
        staged.push(charm);
    }

    if staged.is_empty() {
        return Err(PackError::BuildFailed("no charm was staged".to_string()));
    }
    Ok(staged)
}

#[cfg(test)]
#[path = "build/build_tests.rs"]
mod build_tests;
