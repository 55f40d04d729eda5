//! Type-safe identifiers for capture runs.
//!
//! A [`RunId`] correlates an experiment START command with the snapshot
//! directory the device writes into and with the matching STOP command.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// RunId
// ============================================================================

/// Unique identifier for a single capture run.
///
/// Generated fresh for every [`capture_image`] call. The device uses the
/// run name both as the server-side experiment identifier and as the name
/// of the subdirectory it writes snapshot files into.
///
/// [`capture_image`]: crate::LuxClient::capture_image
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    /// Generates a fresh run identifier from a v4 UUID.
    #[inline]
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RunId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_unique() {
        let a = RunId::generate();
        let b = RunId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_display_matches_as_str() {
        let id = RunId::generate();
        assert_eq!(id.to_string(), id.as_str());
    }

    #[test]
    fn test_is_valid_uuid() {
        let id = RunId::generate();
        assert!(Uuid::parse_str(id.as_str()).is_ok());
    }

    #[test]
    fn test_serialize_transparent() {
        let id = RunId::generate();
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, format!("\"{}\"", id.as_str()));
    }
}
