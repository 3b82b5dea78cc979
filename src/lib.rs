//! # a3s-bootstrap
//!
//! Install, update, and launch managed tool binaries from GitHub Releases.
//!
//! ## Overview
//!
//! `a3s-bootstrap` keeps a versioned executable fresh and running for a
//! host application (typically an editor integration embedding an A3S
//! tool server). Given a [`BootstrapConfig`] describing the tool, it
//! probes the installed copy for its version, compares it against the
//! latest published release, downloads the platform artifact when they
//! differ, swaps it into place atomically, and finally spawns it as a
//! long-lived stdio server. A broken or half-written executable is never
//! left behind: the swap is a single rename, and failed downloads clean
//! up after themselves.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use a3s_bootstrap::BootstrapConfig;
//!
//! # async fn example() -> a3s_bootstrap::Result<()> {
//! let config = BootstrapConfig::new("a3s-code", "A3S-Lab", "Code");
//!
//! // Install or update, then start the tool in stdio server mode.
//! let mut server = a3s_bootstrap::launch(&config, Path::new("/opt/a3s/tools")).await?;
//!
//! let stdin = server.take_stdin();
//! let stdout = server.take_stdout();
//! // ... speak the tool's protocol over the pipes ...
//!
//! server.stop().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`probe`] — asks the installed executable for its version
//! - [`platform`] — static platform-to-artifact-name table
//! - [`github`] — latest-release metadata and asset selection
//! - [`download`] + [`install`] — staged download and atomic swap
//! - [`mod@launch`] — the managed server subprocess

pub mod config;
pub mod download;
pub mod error;
pub mod github;
pub mod install;
pub mod launch;
pub mod platform;
pub mod probe;

// Re-export core types
pub use config::BootstrapConfig;
pub use error::{BootstrapError, Result};
pub use github::{Asset, Release};
pub use install::{install_or_update, install_or_update_with_cancel, InstallOutcome};
pub use launch::{launch, ToolServer};
pub use probe::{probe_version, ProbedVersion};

// Re-exported so callers of `install_or_update_with_cancel` can mint and
// share tokens without depending on tokio-util themselves.
pub use tokio_util::sync::CancellationToken;
