//! Snapshot directory polling and decoding.
//!
//! During a capture run the device writes JPEG snapshots into
//! `<snapshot_root>/<run id>/`. The client polls that directory and decodes
//! the file with the lexicographically greatest name; filename order, not
//! mtime, determines "most recent" (the device names snapshots so the two
//! agree).
//!
//! Every failure mode here is transient from the caller's point of view and
//! retried identically, but each is a distinct [`SnapshotError`] variant so
//! tests can observe which stage failed.

// ============================================================================
// Imports
// ============================================================================

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use thiserror::Error;

// ============================================================================
// Constants
// ============================================================================

/// Default root directory the device writes snapshots under.
///
/// The vendor service is Windows-only and uses a fixed ProgramData path.
pub const DEFAULT_SNAPSHOT_ROOT: &str = r"C:\ProgramData\CytoSmartLuxService\Images";

/// Snapshot file extension written by the device.
const SNAPSHOT_EXTENSION: &str = "jpg";

// ============================================================================
// SnapshotError
// ============================================================================

/// Why a single poll attempt failed.
///
/// All variants are handled the same way (wait and retry), but keeping them
/// distinct makes the polling loop observable in tests.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The run directory has not been created yet.
    #[error("snapshot directory not created yet: {path}")]
    DirectoryMissing {
        /// The expected run directory.
        path: PathBuf,
    },

    /// The run directory exists but holds no `.jpg` files yet.
    #[error("no snapshots yet in: {path}")]
    NoSnapshots {
        /// The run directory that was listed.
        path: PathBuf,
    },

    /// A snapshot file exists but could not be decoded.
    ///
    /// Typically the device is still writing the file.
    #[error("failed to decode {path}: {source}")]
    Decode {
        /// The snapshot that failed to decode.
        path: PathBuf,
        /// The underlying decoder error.
        source: image::ImageError,
    },

    /// Transient IO error while listing the directory.
    #[error("failed to list snapshot directory: {0}")]
    Io(#[from] io::Error),
}

// ============================================================================
// Polling
// ============================================================================

/// Attempts to load the latest snapshot from a run directory.
///
/// Lists `*.jpg` files in `dir` and decodes the one with the
/// lexicographically greatest filename.
///
/// # Errors
///
/// Returns a [`SnapshotError`] describing which stage failed; the caller
/// retries on any of them.
pub fn latest_snapshot(dir: &Path) -> Result<DynamicImage, SnapshotError> {
    let entries = fs::read_dir(dir).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            SnapshotError::DirectoryMissing {
                path: dir.to_path_buf(),
            }
        } else {
            SnapshotError::Io(e)
        }
    })?;

    let mut latest: Option<PathBuf> = None;
    for entry in entries {
        let path = entry?.path();
        if path.extension().is_none_or(|ext| ext != SNAPSHOT_EXTENSION) {
            continue;
        }
        // Compare by filename, not full path, to keep the ordering contract
        // independent of the directory prefix.
        if latest
            .as_ref()
            .is_none_or(|cur| path.file_name() > cur.file_name())
        {
            latest = Some(path);
        }
    }

    let path = latest.ok_or_else(|| SnapshotError::NoSnapshots {
        path: dir.to_path_buf(),
    })?;

    image::open(&path).map_err(|source| SnapshotError::Decode { path, source })
}

// ============================================================================
// Tests
// ============================================================================
