//! Command definitions for the Lux device protocol.
//!
//! Every request to the device is a JSON text frame of the form
//! `{"type": KIND, "payload": {...}}`. [`Command`] models the four kinds
//! as an adjacently tagged enum so serde produces that shape directly.
//!
//! # Command Kinds
//!
//! | Kind | Payload |
//! |------|---------|
//! | `LIVE_STREAM` | `{"enable": bool}` |
//! | `ZOOM` | `{"action": "IN" \| "OUT"}` |
//! | `FOCUS` | `{"value": 0.0..=1.0}` |
//! | `EXPERIMENT` | start/stop parameters, see [`ExperimentPayload`] |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::identifiers::RunId;

// ============================================================================
// Constants
// ============================================================================

/// Device-side snapshot cadence in capture runs, passed through unmodified.
pub const SNAPSHOT_INTERVAL: u32 = 50;

/// Device-side auto-stop time for capture runs, passed through unmodified.
pub const AUTO_STOP_TIME: u32 = 1;

// ============================================================================
// Command
// ============================================================================

/// A command message to the Lux device.
///
/// Serializes to the `{"type": ..., "payload": ...}` wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Command {
    /// Toggle the live view stream.
    #[serde(rename = "LIVE_STREAM")]
    LiveStream {
        /// `true` turns live view on.
        enable: bool,
    },

    /// Set the zoom (binning) mode.
    #[serde(rename = "ZOOM")]
    Zoom {
        /// Coarse IN/OUT setting.
        action: ZoomMode,
    },

    /// Set the relative z-position of the camera.
    #[serde(rename = "FOCUS")]
    Focus {
        /// Focus level in `[0, 1]`.
        value: f64,
    },

    /// Start or stop a capture run.
    #[serde(rename = "EXPERIMENT")]
    Experiment(ExperimentPayload),
}

impl Command {
    /// Creates a LIVE_STREAM command.
    #[inline]
    #[must_use]
    pub fn live_stream(enable: bool) -> Self {
        Self::LiveStream { enable }
    }

    /// Creates a ZOOM command.
    #[inline]
    #[must_use]
    pub fn zoom(action: ZoomMode) -> Self {
        Self::Zoom { action }
    }

    /// Creates a FOCUS command.
    ///
    /// Range validation happens in [`LuxClient::set_focus`], before the
    /// command is constructed.
    ///
    /// [`LuxClient::set_focus`]: crate::LuxClient::set_focus
    #[inline]
    #[must_use]
    pub fn focus(value: f64) -> Self {
        Self::Focus { value }
    }

    /// Creates an EXPERIMENT/START command for a run.
    #[inline]
    #[must_use]
    pub fn experiment_start(run: &RunId) -> Self {
        Self::Experiment(ExperimentPayload::new(ExperimentAction::Start, run))
    }

    /// Creates an EXPERIMENT/STOP command for a run.
    #[inline]
    #[must_use]
    pub fn experiment_stop(run: &RunId) -> Self {
        Self::Experiment(ExperimentPayload::new(ExperimentAction::Stop, run))
    }

    /// Returns the wire kind of this command (the `type` field).
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::LiveStream { .. } => "LIVE_STREAM",
            Self::Zoom { .. } => "ZOOM",
            Self::Focus { .. } => "FOCUS",
            Self::Experiment(_) => "EXPERIMENT",
        }
    }
}

// ============================================================================
// ZoomMode
// ============================================================================

/// Zoom (binning) mode of the camera.
///
/// A coarse IN/OUT toggle affecting effective resolution and field of view.
/// Parses case-insensitively from strings; anything outside `IN`/`OUT` is
/// rejected before a message is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ZoomMode {
    /// Zoomed in (binning off).
    In,
    /// Zoomed out (binning on).
    Out,
}

impl ZoomMode {
    /// Returns the wire representation.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::In => "IN",
            Self::Out => "OUT",
        }
    }
}

impl fmt::Display for ZoomMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ZoomMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("IN") {
            Ok(Self::In)
        } else if s.eq_ignore_ascii_case("OUT") {
            Ok(Self::Out)
        } else {
            Err(Error::invalid_argument(format!(
                "zoom mode must be IN or OUT, got: {s}"
            )))
        }
    }
}

// ============================================================================
// ExperimentAction
// ============================================================================

/// Action field of an EXPERIMENT command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExperimentAction {
    /// Start a capture run.
    Start,
    /// Stop a capture run.
    Stop,
}

// ============================================================================
// ExperimentPayload
// ============================================================================

/// Payload of an EXPERIMENT command.
///
/// `experiment_id` and `sas_token` are always empty strings and
/// `snapshot_interval`/`auto_stop_time` are fixed; the device ignores none
/// of these fields, so they are sent verbatim on both START and STOP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentPayload {
    /// START or STOP.
    pub action: ExperimentAction,

    /// Server-side experiment identifier, always empty.
    pub experiment_id: String,

    /// Run name; also the snapshot subdirectory name.
    pub name: RunId,

    /// Snapshot cadence, fixed at [`SNAPSHOT_INTERVAL`].
    pub snapshot_interval: u32,

    /// Auto-stop time, fixed at [`AUTO_STOP_TIME`].
    pub auto_stop_time: u32,

    /// Upload token, always empty.
    pub sas_token: String,
}

impl ExperimentPayload {
    /// Creates a payload for the given action and run.
    #[must_use]
    pub fn new(action: ExperimentAction, run: &RunId) -> Self {
        Self {
            action,
            experiment_id: String::new(),
            name: run.clone(),
            snapshot_interval: SNAPSHOT_INTERVAL,
            auto_stop_time: AUTO_STOP_TIME,
            sas_token: String::new(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
