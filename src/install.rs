//! Install-or-update orchestration.
//!
//! Walks one attempt through its stages: check the local copy, fetch the
//! latest release, decide whether an update is needed, download to a
//! staging file named after the artifact, then swap it into place. The
//! final rename is the single observable transition; everything before it
//! leaves a prior install untouched and usable.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::config::BootstrapConfig;
use crate::download;
use crate::error::Result;
use crate::github;
use crate::platform;
use crate::probe;

/// Result of one install-or-update attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The installed executable already matches the latest release.
    AlreadyUpToDate(PathBuf),
    /// A new executable was downloaded and swapped into place.
    Installed(PathBuf),
    /// No artifact is published for this platform.
    UnsupportedPlatform,
    /// Metadata fetch or artifact transfer failed; a prior install is intact.
    DownloadFailed(String),
    /// Automatic installation is disabled in the configuration.
    Skipped,
}

impl InstallOutcome {
    /// Path to a usable executable, when the attempt produced one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            InstallOutcome::AlreadyUpToDate(p) | InstallOutcome::Installed(p) => Some(p),
            _ => None,
        }
    }
}

/// One install at a time per directory. Concurrent callers queue up on the
/// same mutex and typically observe `AlreadyUpToDate` once they get in.
fn dir_lock(dir: &Path) -> Arc<tokio::sync::Mutex<()>> {
    static LOCKS: OnceLock<Mutex<HashMap<PathBuf, Arc<tokio::sync::Mutex<()>>>>> = OnceLock::new();
    let locks = LOCKS.get_or_init(|| Mutex::new(HashMap::new()));
    let mut map = locks.lock().unwrap_or_else(|e| e.into_inner());
    map.entry(dir.to_path_buf()).or_default().clone()
}

/// Install or update the configured tool under `install_dir`.
///
/// Same as [`install_or_update_with_cancel`] with a token nobody else
/// holds.
pub async fn install_or_update(
    config: &BootstrapConfig,
    install_dir: &Path,
) -> Result<InstallOutcome> {
    install_or_update_with_cancel(config, install_dir, CancellationToken::new()).await
}

/// Install or update, sharing `cancel` with the caller.
///
/// Cancelling the token aborts whichever network operation is in flight
/// (metadata fetch or artifact download) and the attempt reports
/// [`InstallOutcome::DownloadFailed`]. The metadata fetch additionally
/// cancels the token itself when its deadline expires.
///
/// Fetch and transfer failures are outcomes, not errors; `Err` is
/// reserved for filesystem failures while staging or swapping, which
/// still leave any prior executable in place.
pub async fn install_or_update_with_cancel(
    config: &BootstrapConfig,
    install_dir: &Path,
    cancel: CancellationToken,
) -> Result<InstallOutcome> {
    if !config.auto_install {
        tracing::info!("Automatic install of {} is disabled; skipping", config.tool_name);
        return Ok(InstallOutcome::Skipped);
    }

    let lock = dir_lock(install_dir);
    let _guard = lock.lock().await;

    let exe_path = install_dir.join(platform::executable_name(&config.tool_name));
    let previously_installed = install_dir.exists();

    let artifact_name = match platform::current_artifact_name(&config.tool_name) {
        Some(name) => name,
        None => {
            tracing::warn!(
                "No {} build published for {}/{}",
                config.tool_name,
                std::env::consts::OS,
                std::env::consts::ARCH
            );
            return Ok(InstallOutcome::UnsupportedPlatform);
        }
    };

    let release = match github::fetch_latest_release(
        &config.api_base,
        &config.github_owner,
        &config.github_repo,
        Duration::from_secs(config.fetch_timeout_secs),
        &cancel,
    )
    .await
    {
        Ok(release) => release,
        Err(e) => {
            tracing::warn!("Release metadata fetch failed: {}", e);
            return Ok(InstallOutcome::DownloadFailed(e.to_string()));
        }
    };

    let asset = match github::find_artifact(&release, &artifact_name) {
        Some(asset) => asset,
        None => {
            tracing::warn!(
                "Release {} of {} has no asset named {}",
                release.tag_name,
                config.tool_name,
                artifact_name
            );
            return Ok(InstallOutcome::UnsupportedPlatform);
        }
    };

    if previously_installed {
        let probed = probe::probe_version(&exe_path, &config.version_flag).await;
        match probed.version() {
            Some(version) if github::stripped_tag(&release.tag_name) == version => {
                tracing::info!("{} {} is up to date", config.tool_name, version);
                return Ok(InstallOutcome::AlreadyUpToDate(exe_path));
            }
            Some(version) => {
                tracing::info!(
                    "{} {} is behind release {}",
                    config.tool_name,
                    version,
                    release.tag_name
                );
            }
            None => {
                tracing::info!(
                    "Installed {} version is unreadable; reinstalling",
                    config.tool_name
                );
            }
        }
    }

    tokio::fs::create_dir_all(install_dir).await?;
    let staging_path = install_dir.join(&asset.name);
    if let Err(e) =
        download::download_artifact(&asset.browser_download_url, &staging_path, &cancel).await
    {
        tracing::warn!("Download of {} failed: {}", asset.name, e);
        return Ok(InstallOutcome::DownloadFailed(e.to_string()));
    }

    set_executable(&staging_path).await?;
    tokio::fs::rename(&staging_path, &exe_path).await?;
    tracing::info!(
        "Installed {} {} at {}",
        config.tool_name,
        release.tag_name,
        exe_path.display()
    );

    Ok(InstallOutcome::Installed(exe_path))
}

/// Mark a staged download executable (no-op off Unix).
async fn set_executable(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).await?;
    }
    #[cfg(not(unix))]
    {
        let _ = path;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn test_config(api_base: String) -> BootstrapConfig {
        let mut config = BootstrapConfig::new("fake-tool", "a3s-lab", "fake-tool");
        config.api_base = api_base;
        config
    }

    #[test]
    fn test_outcome_path_accessor() {
        let path = PathBuf::from("/tools/fake-tool");
        assert_eq!(
            InstallOutcome::Installed(path.clone()).path(),
            Some(path.as_path())
        );
        assert_eq!(
            InstallOutcome::AlreadyUpToDate(path.clone()).path(),
            Some(path.as_path())
        );
        assert_eq!(InstallOutcome::UnsupportedPlatform.path(), None);
        assert_eq!(InstallOutcome::DownloadFailed("boom".into()).path(), None);
        assert_eq!(InstallOutcome::Skipped.path(), None);
    }

    #[test]
    fn test_dir_lock_is_shared_per_directory() {
        let a = dir_lock(Path::new("/tmp/a3s-bootstrap-lock-test"));
        let b = dir_lock(Path::new("/tmp/a3s-bootstrap-lock-test"));
        let c = dir_lock(Path::new("/tmp/a3s-bootstrap-lock-other"));
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
    }

    #[tokio::test]
    async fn test_skipped_when_auto_install_disabled() {
        let mut config = test_config("http://127.0.0.1:9".to_string());
        config.auto_install = false;

        let dir = tempfile::tempdir().unwrap();
        let outcome = install_or_update(&config, dir.path()).await.unwrap();
        assert_eq!(outcome, InstallOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_metadata_failure_maps_to_download_failed() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/repos/a3s-lab/fake-tool/releases/latest");
                then.status(500);
            })
            .await;

        let config = test_config(server.base_url());
        let dir = tempfile::tempdir().unwrap();

        let outcome = install_or_update(&config, dir.path()).await.unwrap();
        assert!(matches!(outcome, InstallOutcome::DownloadFailed(_)));
    }

    #[tokio::test]
    async fn test_missing_asset_is_unsupported_platform() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/repos/a3s-lab/fake-tool/releases/latest");
                then.status(200).json_body(serde_json::json!({
                    "name": "v1.0.0",
                    "tag_name": "v1.0.0",
                    "assets": []
                }));
            })
            .await;

        let config = test_config(server.base_url());
        let dir = tempfile::tempdir().unwrap();

        let outcome = install_or_update(&config, dir.path()).await.unwrap();
        assert_eq!(outcome, InstallOutcome::UnsupportedPlatform);
    }

    #[tokio::test]
    async fn test_caller_cancellation_maps_to_download_failed() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let config = test_config("http://127.0.0.1:9".to_string());
        let dir = tempfile::tempdir().unwrap();

        let outcome = install_or_update_with_cancel(&config, dir.path(), cancel)
            .await
            .unwrap();
        assert!(matches!(outcome, InstallOutcome::DownloadFailed(_)));
    }
}
