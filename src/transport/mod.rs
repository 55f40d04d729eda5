//! WebSocket transport layer.
//!
//! The client talks to the device server over a single long-lived
//! connection. [`DeviceTransport`] is the seam between the [`LuxClient`]
//! and the socket: production code uses [`WsSession`], tests inject a
//! double that records outbound commands and serves canned replies.
//!
//! [`LuxClient`]: crate::LuxClient

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;

use crate::error::Result;
use crate::protocol::Command;

// ============================================================================
// Submodules
// ============================================================================

/// Long-lived WebSocket session to the device server.
pub mod session;

pub use session::WsSession;

// ============================================================================
// DeviceTransport
// ============================================================================

/// Transport for device command exchange.
///
/// Commands are strictly sequential: one outbound frame, then at most one
/// awaited reply. Methods take `&mut self` so the compiler enforces that no
/// two commands are in flight at once.
#[async_trait]
pub trait DeviceTransport: Send {
    /// Sends a command and awaits one text reply.
    ///
    /// The reply is opaque JSON; callers log it but never parse it.
    ///
    /// # Errors
    ///
    /// - [`Error::WebSocket`] if the frame cannot be sent
    /// - [`Error::ConnectionClosed`] if the session ends before a reply
    ///
    /// [`Error::WebSocket`]: crate::Error::WebSocket
    /// [`Error::ConnectionClosed`]: crate::Error::ConnectionClosed
    async fn send(&mut self, command: &Command) -> Result<String>;

    /// Sends a command without awaiting a reply (fire-and-forget).
    ///
    /// Used only for EXPERIMENT/STOP, whose reply is never read.
    ///
    /// # Errors
    ///
    /// - [`Error::WebSocket`] if the frame cannot be sent
    ///
    /// [`Error::WebSocket`]: crate::Error::WebSocket
    async fn post(&mut self, command: &Command) -> Result<()>;
}
