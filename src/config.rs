//! Managed-tool configuration.

use serde::{Deserialize, Serialize};

use crate::github;

/// Describes a managed tool: which repository publishes it, how to ask it
/// for its version, and how to start it in server mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Tool name; also the installed executable file stem (e.g. `"a3s-code"`).
    pub tool_name: String,
    /// GitHub repository owner (e.g. `"A3S-Lab"`).
    pub github_owner: String,
    /// GitHub repository name (e.g. `"Code"`).
    pub github_repo: String,
    /// Flag that makes the tool print `<name> <version>` on stdout.
    #[serde(default = "default_version_flag")]
    pub version_flag: String,
    /// Arguments that start the tool in stdio server mode.
    #[serde(default = "default_server_args")]
    pub server_args: Vec<String>,
    /// Install and update automatically. When `false`, installs are
    /// skipped and the launcher uses whatever `PATH` resolves.
    #[serde(default = "default_true")]
    pub auto_install: bool,
    /// Release metadata endpoint.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Deadline for the release metadata request, in seconds.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

impl BootstrapConfig {
    /// Configuration for a tool that follows the conventional flags
    /// (`--version` to report, `--stdio` to serve).
    pub fn new(
        tool_name: impl Into<String>,
        github_owner: impl Into<String>,
        github_repo: impl Into<String>,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            github_owner: github_owner.into(),
            github_repo: github_repo.into(),
            version_flag: default_version_flag(),
            server_args: default_server_args(),
            auto_install: default_true(),
            api_base: default_api_base(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

fn default_version_flag() -> String {
    "--version".into()
}
fn default_server_args() -> Vec<String> {
    vec!["--stdio".into()]
}
fn default_true() -> bool {
    true
}
fn default_api_base() -> String {
    github::GITHUB_API_BASE.into()
}
fn default_fetch_timeout_secs() -> u64 {
    5
}
