//! Managed tool server subprocess.
//!
//! Spawns the installed tool in stdio server mode and exposes its
//! lifecycle: pid, liveness, exit status, graceful stop. The wire
//! protocol spoken over the piped streams belongs entirely to the
//! caller.

use std::path::Path;
use std::process::{ExitStatus, Stdio};

use tokio::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command};

use crate::config::BootstrapConfig;
use crate::error::{BootstrapError, Result};
use crate::install;

/// A running tool server process.
///
/// The child is killed if the handle is dropped while it is still
/// running.
pub struct ToolServer {
    command: String,
    child: Child,
}

impl ToolServer {
    /// Spawn `command` with `args`, all three stdio streams piped.
    ///
    /// `command` may be an absolute path to an installed executable or a
    /// bare name resolved via `PATH`.
    pub fn spawn(command: impl AsRef<Path>, args: &[String]) -> Result<ToolServer> {
        let command = command.as_ref();
        let child = Command::new(command)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| BootstrapError::Spawn {
                command: command.display().to_string(),
                reason: e.to_string(),
            })?;

        tracing::info!(
            "Started {} {:?} (pid {:?})",
            command.display(),
            args,
            child.id()
        );

        Ok(ToolServer {
            command: command.display().to_string(),
            child,
        })
    }

    /// Command this server was started from.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// OS process id, while the server is running.
    pub fn pid(&self) -> Option<u32> {
        self.child.id()
    }

    /// Take the server's stdin pipe. Returns `None` after the first call.
    pub fn take_stdin(&mut self) -> Option<ChildStdin> {
        self.child.stdin.take()
    }

    /// Take the server's stdout pipe. Returns `None` after the first call.
    pub fn take_stdout(&mut self) -> Option<ChildStdout> {
        self.child.stdout.take()
    }

    /// Take the server's stderr pipe. Returns `None` after the first call.
    pub fn take_stderr(&mut self) -> Option<ChildStderr> {
        self.child.stderr.take()
    }

    /// Exit status if the server has terminated, `None` while it runs.
    pub fn try_status(&mut self) -> Result<Option<ExitStatus>> {
        Ok(self.child.try_wait()?)
    }

    /// Whether the server is still running.
    pub fn is_running(&mut self) -> bool {
        matches!(self.try_status(), Ok(None))
    }

    /// Wait for the server to exit and return its status.
    ///
    /// Abnormal termination surfaces here: the status reports the
    /// non-zero exit code or the killing signal.
    pub async fn wait(&mut self) -> Result<ExitStatus> {
        Ok(self.child.wait().await?)
    }

    /// Stop the server.
    ///
    /// Graceful on Unix: SIGTERM, up to 5 s of grace, then SIGKILL.
    /// Elsewhere the process is killed directly.
    pub async fn stop(&mut self) {
        #[cfg(unix)]
        {
            use nix::sys::signal::{kill, Signal};
            use nix::unistd::Pid;
            if let Some(pid) = self.child.id() {
                let _ = kill(Pid::from_raw(pid as i32), Signal::SIGTERM);
                let _ = tokio::time::timeout(
                    std::time::Duration::from_secs(5),
                    self.child.wait(),
                )
                .await;
            }
        }
        let _ = self.child.kill().await;
        tracing::info!("Stopped {}", self.command);
    }
}

/// Install (or update) the configured tool, then start it in server mode.
///
/// When the install attempt yields no executable — download failure,
/// unsupported platform, or auto-install disabled — the bare tool name is
/// spawned instead and the OS resolves it via `PATH`.
pub async fn launch(config: &BootstrapConfig, install_dir: &Path) -> Result<ToolServer> {
    let outcome = install::install_or_update(config, install_dir).await?;

    match outcome.path() {
        Some(path) => ToolServer::spawn(path, &config.server_args),
        None => {
            tracing::info!(
                "No managed install of {} ({:?}); falling back to PATH",
                config.tool_name,
                outcome
            );
            ToolServer::spawn(Path::new(&config.tool_name), &config.server_args)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

    #[tokio::test]
    async fn test_spawn_invalid_command() {
        let result = ToolServer::spawn(Path::new("nonexistent_tool_server_12345"), &[]);
        assert!(matches!(result, Err(BootstrapError::Spawn { .. })));
    }

    #[tokio::test]
    async fn test_spawn_and_stop() {
        if let Ok(mut server) = ToolServer::spawn(Path::new("cat"), &[]) {
            assert!(server.is_running());
            assert!(server.pid().is_some());
            server.stop().await;
            assert!(!server.is_running());
        }
    }

    #[tokio::test]
    async fn test_stdio_roundtrip() {
        if let Ok(mut server) = ToolServer::spawn(Path::new("cat"), &[]) {
            let mut stdin = server.take_stdin().unwrap();
            let stdout = server.take_stdout().unwrap();

            stdin.write_all(b"hello server\n").await.unwrap();
            stdin.flush().await.unwrap();

            let mut line = String::new();
            BufReader::new(stdout).read_line(&mut line).await.unwrap();
            assert_eq!(line, "hello server\n");

            server.stop().await;
        }
    }

    #[tokio::test]
    async fn test_take_stdin_only_once() {
        if let Ok(mut server) = ToolServer::spawn(Path::new("cat"), &[]) {
            assert!(server.take_stdin().is_some());
            assert!(server.take_stdin().is_none());
            server.stop().await;
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_wait_observes_exit() {
        let mut server = ToolServer::spawn(Path::new("true"), &[]).unwrap();
        let status = server.wait().await.unwrap();
        assert!(status.success());
    }
}
