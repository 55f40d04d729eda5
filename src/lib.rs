//! Lux Connector - Control client for the CytoSMART Lux microscope.
//!
//! This library launches the vendor-provided Lux service, holds a single
//! WebSocket session to it, and exchanges small JSON command/response
//! messages to toggle live view, set zoom and focus, and retrieve captured
//! images from the local filesystem.
//!
//! # Architecture
//!
//! The client follows a strict request/response model:
//!
//! - **Local End (Rust)**: Sends `{type, payload}` commands over WebSocket
//! - **Remote End (Lux service)**: Drives the camera, replies with opaque JSON
//!
//! Key design points:
//!
//! - One [`LuxClient`] owns one session; commands are strictly sequential
//! - Construction is three explicit phases: launch, connect, configure
//! - Image capture works through the filesystem, not the reply body: the
//!   device writes JPEG snapshots into a per-run directory that the client
//!   polls with a bounded retry
//! - The transport is a trait seam ([`DeviceTransport`]) so tests can
//!   simulate device replies
//!
//! # Quick Start
//!
//! ```no_run
//! use lux_connector::{LuxClient, Result, ZoomMode};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // Launch the vendor server, connect, and configure the device
//!     let mut client = LuxClient::builder()
//!         .server_binary(r"C:\Program Files\LuxServer\CytoSmartLuxService.exe")
//!         .connect()
//!         .await?;
//!
//!     client.set_zoom(ZoomMode::Out).await?;
//!     client.set_focus(0.5).await?;
//!
//!     // None when no snapshot appeared within the poll cap
//!     if let Some(image) = client.capture_image().await? {
//!         image.save("snapshot.jpg").expect("save");
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | [`LuxClient`], builder, server launch, snapshot capture |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`protocol`] | Wire message types (internal) |
//! | [`transport`] | WebSocket transport layer |

// ============================================================================
// Modules
// ============================================================================

/// Lux device client: facade, builder, launcher, capture.
///
/// Use [`LuxClient::builder()`] to create a configured client instance.
pub mod client;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers for capture runs.
///
/// [`RunId`] correlates a capture run with its snapshot directory.
pub mod identifiers;

/// Wire message types for the device protocol.
///
/// Defines the `{type, payload}` command union.
pub mod protocol;

/// WebSocket transport layer.
///
/// [`DeviceTransport`] trait and the [`WsSession`] implementation.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Client types
pub use client::{LuxClient, LuxClientBuilder, ServerHandle, SnapshotError};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::RunId;

// Protocol types
pub use protocol::{Command, ExperimentAction, ExperimentPayload, ZoomMode};

// Transport types
pub use transport::{DeviceTransport, WsSession};
