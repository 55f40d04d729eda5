//! Long-lived WebSocket session to the Lux device server.
//!
//! One session is opened at client construction and held for the client's
//! lifetime. There is no reconnect logic: once the connection drops, every
//! subsequent call fails with [`Error::ConnectionClosed`] and the client
//! must be rebuilt.

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, trace};
use url::Url;

use crate::error::{Error, Result};
use crate::protocol::Command;

use super::DeviceTransport;

// ============================================================================
// Constants
// ============================================================================

/// Default endpoint of the locally running Lux service.
pub const DEFAULT_ENDPOINT: &str = "ws://localhost:3333/luxservice";

// ============================================================================
// WsSession
// ============================================================================

/// A single open WebSocket connection to the device server.
///
/// Text frames only; each frame carries one UTF-8 JSON message.
#[derive(Debug)]
pub struct WsSession {
    /// Endpoint the session was opened against, kept for log context.
    endpoint: Url,

    /// The underlying WebSocket stream.
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsSession {
    /// Opens a session to the device server.
    ///
    /// There is no retry: a connect failure is fatal and surfaced to the
    /// caller unmodified.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] if the socket cannot be established.
    pub async fn connect(endpoint: &Url) -> Result<Self> {
        let (stream, _) = connect_async(endpoint.as_str()).await.map_err(|e| {
            Error::connection(format!("WebSocket connect to {endpoint} failed: {e}"))
        })?;

        debug!(endpoint = %endpoint, "Device session established");

        Ok(Self {
            endpoint: endpoint.clone(),
            stream,
        })
    }

    /// Returns the endpoint this session is connected to.
    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Waits for the next text frame.
    ///
    /// Non-text frames (ping/pong, binary) are skipped. No timeout is
    /// applied; the device replies to every awaited command.
    async fn receive_text(&mut self) -> Result<String> {
        while let Some(msg) = self.stream.next().await {
            match msg? {
                Message::Text(text) => return Ok(text.to_string()),
                Message::Close(_) => return Err(Error::ConnectionClosed),
                _ => continue,
            }
        }

        Err(Error::ConnectionClosed)
    }
}

// ============================================================================
// DeviceTransport Implementation
// ============================================================================

#[async_trait]
impl DeviceTransport for WsSession {
    async fn send(&mut self, command: &Command) -> Result<String> {
        self.post(command).await?;
        let reply = self.receive_text().await?;
        trace!(kind = command.kind(), reply = %reply, "Reply received");
        Ok(reply)
    }

    async fn post(&mut self, command: &Command) -> Result<()> {
        let json = serde_json::to_string(command)?;
        trace!(kind = command.kind(), frame = %json, "Sending command");
        self.stream.send(Message::text(json)).await?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
