//! Builder pattern for client configuration.
//!
//! Provides a fluent API for configuring and connecting a [`LuxClient`].
//! Construction is split into three explicit phases, each with its own
//! failure mode: launch the vendor server (optional), open the WebSocket
//! session, then configure the device (live view on + initial zoom).
//!
//! # Example
//!
//! ```no_run
//! use lux_connector::{LuxClient, ZoomMode};
//!
//! # async fn example() -> lux_connector::Result<()> {
//! let client = LuxClient::builder()
//!     .server_binary(r"C:\Program Files\LuxServer\CytoSmartLuxService.exe")
//!     .initial_zoom(ZoomMode::Out)
//!     .connect()
//!     .await?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::client::capture::DEFAULT_SNAPSHOT_ROOT;
use crate::client::launcher;
use crate::error::{Error, Result};
use crate::protocol::ZoomMode;
use crate::transport::session::DEFAULT_ENDPOINT;
use crate::transport::{DeviceTransport, WsSession};

use super::LuxClient;

// ============================================================================
// Constants
// ============================================================================

/// Default wait between snapshot poll attempts.
pub(crate) const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Default snapshot poll attempt cap.
pub(crate) const DEFAULT_MAX_POLLS: u32 = 10;

// ============================================================================
// LuxClientBuilder
// ============================================================================

/// Builder for configuring a [`LuxClient`].
///
/// Use [`LuxClient::builder()`] to create a new builder. Every knob has a
/// default matching the observed device behavior; only deployments with a
/// non-standard install need to change anything.
#[derive(Debug, Clone)]
pub struct LuxClientBuilder {
    /// Path to the vendor server executable, launched before connecting.
    server_binary: Option<PathBuf>,
    /// WebSocket endpoint; defaults to the fixed local service address.
    endpoint: Option<Url>,
    /// Root directory the device writes snapshots under.
    snapshot_root: PathBuf,
    /// Wait between snapshot poll attempts.
    poll_interval: Duration,
    /// Snapshot poll attempt cap.
    max_polls: u32,
    /// Zoom mode applied during the configure phase.
    initial_zoom: ZoomMode,
}

impl Default for LuxClientBuilder {
    fn default() -> Self {
        Self {
            server_binary: None,
            endpoint: None,
            snapshot_root: PathBuf::from(DEFAULT_SNAPSHOT_ROOT),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: DEFAULT_MAX_POLLS,
            initial_zoom: ZoomMode::In,
        }
    }
}

// ============================================================================
// LuxClientBuilder Implementation
// ============================================================================

impl LuxClientBuilder {
    /// Creates a new builder with default configuration.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the vendor server executable to launch before connecting.
    ///
    /// When unset, the builder assumes the Lux service is already running.
    #[inline]
    #[must_use]
    pub fn server_binary(mut self, path: impl Into<PathBuf>) -> Self {
        self.server_binary = Some(path.into());
        self
    }

    /// Sets the WebSocket endpoint of the Lux service.
    #[inline]
    #[must_use]
    pub fn endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Sets the root directory the device writes snapshots under.
    #[inline]
    #[must_use]
    pub fn snapshot_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_root = path.into();
        self
    }

    /// Sets the wait between snapshot poll attempts.
    #[inline]
    #[must_use]
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the snapshot poll attempt cap.
    #[inline]
    #[must_use]
    pub fn max_polls(mut self, max_polls: u32) -> Self {
        self.max_polls = max_polls;
        self
    }

    /// Sets the zoom mode applied during the configure phase.
    #[inline]
    #[must_use]
    pub fn initial_zoom(mut self, zoom: ZoomMode) -> Self {
        self.initial_zoom = zoom;
        self
    }

    /// Launches the server (if configured), connects, and configures the
    /// device.
    ///
    /// The three phases run in order and any failure propagates unmodified;
    /// there is no retry.
    ///
    /// # Errors
    ///
    /// - [`Error::ServerNotFound`] / [`Error::ProcessLaunchFailed`] from the
    ///   launch phase
    /// - [`Error::Connection`] from the connect phase
    /// - Any command error from the configure phase
    pub async fn connect(self) -> Result<LuxClient> {
        // Phase 1: launch.
        let server = match &self.server_binary {
            Some(binary) => Some(launcher::launch(binary)?),
            None => None,
        };

        // Phase 2: connect.
        let endpoint = self.resolve_endpoint()?;
        let session = WsSession::connect(&endpoint).await?;

        // Phase 3: configure.
        let initial_zoom = self.initial_zoom;
        let mut client = self.into_client(Box::new(session), server);
        client.configure(initial_zoom).await?;

        Ok(client)
    }

    /// Builds a client around an injected transport.
    ///
    /// Skips all three connect phases; no process is launched and no
    /// configure commands are sent. Intended for custom transports and
    /// test doubles.
    #[must_use]
    pub fn build_with_transport(self, transport: Box<dyn DeviceTransport>) -> LuxClient {
        self.into_client(transport, None)
    }

    fn resolve_endpoint(&self) -> Result<Url> {
        match &self.endpoint {
            Some(url) => Ok(url.clone()),
            None => DEFAULT_ENDPOINT
                .parse()
                .map_err(|e| Error::config(format!("invalid default endpoint: {e}"))),
        }
    }

    fn into_client(
        self,
        transport: Box<dyn DeviceTransport>,
        server: Option<launcher::ServerHandle>,
    ) -> LuxClient {
        LuxClient {
            transport,
            server,
            snapshot_root: self.snapshot_root,
            poll_interval: self.poll_interval,
            max_polls: self.max_polls,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configuration() {
        let builder = LuxClientBuilder::new();
        assert!(builder.server_binary.is_none());
        assert!(builder.endpoint.is_none());
        assert_eq!(builder.snapshot_root, PathBuf::from(DEFAULT_SNAPSHOT_ROOT));
        assert_eq!(builder.poll_interval, Duration::from_secs(1));
        assert_eq!(builder.max_polls, 10);
        assert_eq!(builder.initial_zoom, ZoomMode::In);
    }

    #[test]
    fn test_setters() {
        let endpoint: Url = "ws://localhost:4444/luxservice".parse().expect("url");
        let builder = LuxClientBuilder::new()
            .server_binary("/opt/lux/server.exe")
            .endpoint(endpoint.clone())
            .snapshot_root("/tmp/lux")
            .poll_interval(Duration::from_millis(10))
            .max_polls(3)
            .initial_zoom(ZoomMode::Out);

        assert_eq!(
            builder.server_binary,
            Some(PathBuf::from("/opt/lux/server.exe"))
        );
        assert_eq!(builder.endpoint, Some(endpoint));
        assert_eq!(builder.snapshot_root, PathBuf::from("/tmp/lux"));
        assert_eq!(builder.poll_interval, Duration::from_millis(10));
        assert_eq!(builder.max_polls, 3);
        assert_eq!(builder.initial_zoom, ZoomMode::Out);
    }

    #[test]
    fn test_resolve_default_endpoint() {
        let url = LuxClientBuilder::new().resolve_endpoint().expect("url");
        assert_eq!(url.as_str(), DEFAULT_ENDPOINT);
    }

    #[tokio::test]
    async fn test_connect_fails_on_missing_server_binary() {
        let err = LuxClientBuilder::new()
            .server_binary("/nonexistent/CytoSmartLuxService.exe")
            .connect()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ServerNotFound { .. }));
    }
}
