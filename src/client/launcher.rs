//! Vendor server process launch.
//!
//! The Lux service is a vendor-provided executable that must be running
//! before the WebSocket session can be opened. It is spawned detached:
//! the process is a machine-wide resource shared with other clients and
//! deliberately outlives the [`LuxClient`] that started it.
//!
//! [`LuxClient`]: crate::LuxClient

// ============================================================================
// Imports
// ============================================================================

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::{Child, Command};
use tracing::info;

use crate::error::{Error, Result};

// ============================================================================
// ServerHandle
// ============================================================================

/// Handle to a spawned Lux server process.
///
/// Holding the handle does not tie the process to the client's lifetime;
/// dropping it leaves the server running. There is no shutdown path.
#[derive(Debug)]
pub struct ServerHandle {
    /// The spawned child process.
    child: Child,

    /// Path the server was launched from.
    binary: PathBuf,
}

impl ServerHandle {
    /// Returns the OS process ID, if the process is still running.
    #[inline]
    #[must_use]
    pub fn pid(&self) -> Option<u32> {
        self.child.id()
    }

    /// Returns the path of the launched executable.
    #[inline]
    #[must_use]
    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

// ============================================================================
// Launch
// ============================================================================

/// Spawns the Lux server executable as a detached process.
///
/// Stdio is suppressed and the child is not killed on drop. The server
/// needs a moment to open its listening socket; callers connect afterwards
/// and treat a connect failure as fatal.
///
/// # Errors
///
/// - [`Error::ServerNotFound`] if `binary` does not exist
/// - [`Error::ProcessLaunchFailed`] if the process fails to spawn
pub fn launch(binary: &Path) -> Result<ServerHandle> {
    if !binary.exists() {
        return Err(Error::server_not_found(binary));
    }

    let mut cmd = Command::new(binary);
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(false);

    let child = cmd.spawn().map_err(Error::process_launch_failed)?;

    info!(pid = child.id(), binary = %binary.display(), "Lux server process spawned");

    Ok(ServerHandle {
        child,
        binary: binary.to_path_buf(),
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_launch_missing_binary_fails() {
        let err = launch(Path::new("/nonexistent/CytoSmartLuxService.exe")).unwrap_err();
        assert!(matches!(err, Error::ServerNotFound { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_launch_spawns_detached_process() {
        let handle = launch(Path::new("/bin/true")).expect("spawn");
        assert_eq!(handle.binary(), Path::new("/bin/true"));
    }
}
