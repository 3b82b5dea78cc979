//! Installed-tool version probing.
//!
//! Asks an executable to report its own version by running it with a
//! version flag and parsing the first output line. The result drives the
//! install decision: a missing or unreadable tool means "install again",
//! never an error.

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

/// Outcome of probing an executable for its version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbedVersion {
    /// No executable at the given location.
    NotFound,
    /// The executable exists but its version could not be read.
    Unreadable,
    /// Self-reported version string.
    Version(String),
}

impl ProbedVersion {
    /// The version string, if one was read.
    pub fn version(&self) -> Option<&str> {
        match self {
            ProbedVersion::Version(v) => Some(v),
            _ => None,
        }
    }
}

/// Probe an executable for its self-reported version.
///
/// `command` may be an absolute path or a bare name resolved via `PATH`.
/// The probe spawns it with `version_flag`, capturing stdout only (stdin
/// and stderr are null), and reads the second whitespace-delimited token
/// of the first output line. A spawn failure, non-zero exit, or output
/// without a second token yields [`ProbedVersion::Unreadable`].
pub async fn probe_version(command: impl AsRef<Path>, version_flag: &str) -> ProbedVersion {
    let command = command.as_ref();
    let resolved = match which::which(command) {
        Ok(path) => path,
        Err(_) => {
            tracing::debug!("No executable at {}", command.display());
            return ProbedVersion::NotFound;
        }
    };

    let output = match Command::new(&resolved)
        .arg(version_flag)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .await
    {
        Ok(output) => output,
        Err(e) => {
            tracing::debug!("Failed to run {} {}: {}", resolved.display(), version_flag, e);
            return ProbedVersion::Unreadable;
        }
    };

    if !output.status.success() {
        tracing::debug!("{} {} exited with {}", resolved.display(), version_flag, output.status);
        return ProbedVersion::Unreadable;
    }

    match parse_version_output(&String::from_utf8_lossy(&output.stdout)) {
        Some(version) => ProbedVersion::Version(version),
        None => ProbedVersion::Unreadable,
    }
}

/// Extract the version from `--version`-style output: the second
/// whitespace-delimited token of the first line (`"a3s-code 0.3.0"` ->
/// `"0.3.0"`).
fn parse_version_output(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .next()?
        .split_whitespace()
        .nth(1)
        .map(str::to_string)
}
