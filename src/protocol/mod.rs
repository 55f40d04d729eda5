//! Wire message types for the Lux device protocol.
//!
//! Requests are small JSON objects in text frames; replies are opaque JSON
//! that the client logs without parsing. Only the request side is typed.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `command` | The `{type, payload}` command union |

// ============================================================================
// Submodules
// ============================================================================

/// Command definitions for the device protocol.
pub mod command;

// ============================================================================
// Re-exports
// ============================================================================

pub use command::{
    AUTO_STOP_TIME, Command, ExperimentAction, ExperimentPayload, SNAPSHOT_INTERVAL, ZoomMode,
};
