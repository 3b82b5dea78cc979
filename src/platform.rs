//! Platform-specific artifact and executable naming.
//!
//! Releases attach one pre-built binary per published target triple. The
//! mapping from host platform to artifact name is a static table; platforms
//! outside the table are unsupported, and resolution reports that without
//! touching the network or the filesystem.

/// Artifact file name for a tool on a given OS/architecture, or `None` if
/// no pre-built binary is published for that platform.
///
/// Windows and Linux publish a single x86-64 build regardless of the host
/// architecture; macOS publishes separate x86-64 and ARM64 builds.
pub fn target_artifact_name(tool: &str, os: &str, arch: &str) -> Option<String> {
    match (os, arch) {
        ("windows", _) => Some(format!("{}-x86_64-pc-windows-msvc.exe", tool)),
        ("macos", "x86_64") => Some(format!("{}-x86_64-apple-darwin", tool)),
        ("macos", "aarch64") => Some(format!("{}-aarch64-apple-darwin", tool)),
        ("macos", _) => None,
        ("linux", _) => Some(format!("{}-x86_64-unknown-linux-gnu", tool)),
        _ => None,
    }
}

/// Artifact file name for the running host, from `std::env::consts`.
pub fn current_artifact_name(tool: &str) -> Option<String> {
    target_artifact_name(tool, std::env::consts::OS, std::env::consts::ARCH)
}

/// Installed executable file name for a tool (`.exe`-suffixed on Windows).
pub fn executable_name(tool: &str) -> String {
    if cfg!(windows) {
        format!("{}.exe", tool)
    } else {
        tool.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linux_artifact_name() {
        let name = target_artifact_name("a3s-code", "linux", "x86_64").unwrap();
        assert_eq!(name, "a3s-code-x86_64-unknown-linux-gnu");
    }

    #[test]
    fn test_linux_arm_uses_x86_artifact() {
        // Only one Linux build is published; ARM hosts get the x86-64 name.
        let name = target_artifact_name("a3s-code", "linux", "aarch64").unwrap();
        assert_eq!(name, "a3s-code-x86_64-unknown-linux-gnu");
    }

    #[test]
    fn test_macos_artifact_names_by_arch() {
        let intel = target_artifact_name("a3s-code", "macos", "x86_64").unwrap();
        assert_eq!(intel, "a3s-code-x86_64-apple-darwin");

        let arm = target_artifact_name("a3s-code", "macos", "aarch64").unwrap();
        assert_eq!(arm, "a3s-code-aarch64-apple-darwin");
    }

    #[test]
    fn test_macos_other_arch_unsupported() {
        assert!(target_artifact_name("a3s-code", "macos", "powerpc").is_none());
    }

    #[test]
    fn test_windows_artifact_name_any_arch() {
        let x86 = target_artifact_name("a3s-code", "windows", "x86_64").unwrap();
        assert_eq!(x86, "a3s-code-x86_64-pc-windows-msvc.exe");

        let arm = target_artifact_name("a3s-code", "windows", "aarch64").unwrap();
        assert_eq!(arm, "a3s-code-x86_64-pc-windows-msvc.exe");
    }

    #[test]
    fn test_unsupported_os() {
        assert!(target_artifact_name("a3s-code", "freebsd", "x86_64").is_none());
    }

    #[test]
    fn test_current_platform_is_supported() {
        // CI hosts are all in the table.
        assert!(current_artifact_name("a3s-code").is_some());
    }

    #[test]
    fn test_executable_name_suffix() {
        if cfg!(windows) {
            assert_eq!(executable_name("a3s-code"), "a3s-code.exe");
        } else {
            assert_eq!(executable_name("a3s-code"), "a3s-code");
        }
    }
}
