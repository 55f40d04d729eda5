//! Lux device client.
//!
//! [`LuxClient`] owns the launched server handle and the device session,
//! and issues strictly sequential command/response exchanges. Methods take
//! `&mut self`; there is never more than one command in flight.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `builder` | Fluent configuration and the launch/connect/configure phases |
//! | `capture` | Snapshot directory polling and decoding |
//! | `launcher` | Detached vendor server process spawn |

// ============================================================================
// Imports
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use image::DynamicImage;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::identifiers::RunId;
use crate::protocol::{Command, ZoomMode};
use crate::transport::DeviceTransport;

// ============================================================================
// Submodules
// ============================================================================

/// Builder pattern for client configuration.
pub mod builder;

/// Snapshot directory polling and decoding.
pub mod capture;

/// Vendor server process launch.
pub mod launcher;

pub use builder::LuxClientBuilder;
pub use capture::SnapshotError;
pub use launcher::ServerHandle;

// ============================================================================
// LuxClient
// ============================================================================

/// Control client for the Lux microscope.
///
/// Holds one device session for its lifetime. There is no reconnect and no
/// explicit shutdown path: the session closes when the client is dropped
/// and the vendor server process keeps running.
///
/// # Example
///
/// ```no_run
/// use lux_connector::{LuxClient, ZoomMode};
///
/// # async fn example() -> lux_connector::Result<()> {
/// let mut client = LuxClient::builder().connect().await?;
///
/// client.set_zoom(ZoomMode::Out).await?;
/// client.set_focus(0.5).await?;
///
/// match client.capture_image().await? {
///     Some(image) => image.save("snapshot.jpg").expect("save"),
///     None => eprintln!("no image produced"),
/// }
/// # Ok(())
/// # }
/// ```
pub struct LuxClient {
    /// Device session; a trait object so tests can inject doubles.
    transport: Box<dyn DeviceTransport>,

    /// Handle to the launched server process, if this client launched it.
    server: Option<ServerHandle>,

    /// Root directory the device writes snapshots under.
    snapshot_root: PathBuf,

    /// Wait between snapshot poll attempts.
    poll_interval: Duration,

    /// Snapshot poll attempt cap.
    max_polls: u32,
}

impl std::fmt::Debug for LuxClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LuxClient")
            .field("server", &self.server)
            .field("snapshot_root", &self.snapshot_root)
            .field("poll_interval", &self.poll_interval)
            .field("max_polls", &self.max_polls)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// LuxClient - Construction
// ============================================================================

impl LuxClient {
    /// Creates a configuration builder for the client.
    #[inline]
    #[must_use]
    pub fn builder() -> LuxClientBuilder {
        LuxClientBuilder::new()
    }

    /// Creates a client around an injected transport with default settings.
    ///
    /// Equivalent to `LuxClient::builder().build_with_transport(transport)`:
    /// no process is launched and no configure commands are sent.
    #[must_use]
    pub fn with_transport(transport: Box<dyn DeviceTransport>) -> Self {
        LuxClientBuilder::new().build_with_transport(transport)
    }

    /// Returns the handle of the server process this client launched.
    #[inline]
    #[must_use]
    pub fn server(&self) -> Option<&ServerHandle> {
        self.server.as_ref()
    }
}

// ============================================================================
// LuxClient - Device Operations
// ============================================================================

impl LuxClient {
    /// Applies the initial device configuration.
    ///
    /// Enables live view, then applies the zoom mode. Called by the builder
    /// as the final connect phase; exposed so injected-transport clients
    /// can run the same sequence.
    ///
    /// # Errors
    ///
    /// Propagates any send/receive failure.
    pub async fn configure(&mut self, initial_zoom: ZoomMode) -> Result<()> {
        self.set_live_view(true).await?;
        self.set_zoom(initial_zoom).await
    }

    /// Turns the live view stream on or off.
    ///
    /// One round trip; the reply is logged, not parsed.
    ///
    /// # Errors
    ///
    /// Propagates any send/receive failure.
    pub async fn set_live_view(&mut self, enabled: bool) -> Result<()> {
        let reply = self.transport.send(&Command::live_stream(enabled)).await?;
        debug!(enabled, reply = %reply, "Live view toggled");
        Ok(())
    }

    /// Sets the zoom (binning) mode.
    ///
    /// The device only applies a new zoom setting after live view is turned
    /// off and on again, so this is always three round trips: ZOOM,
    /// LIVE_STREAM(false), LIVE_STREAM(true).
    ///
    /// # Errors
    ///
    /// Propagates any send/receive failure.
    pub async fn set_zoom(&mut self, mode: ZoomMode) -> Result<()> {
        let reply = self.transport.send(&Command::zoom(mode)).await?;
        debug!(mode = %mode, reply = %reply, "Zoom set");

        // Toggle live view to enforce the new setting.
        self.set_live_view(false).await?;
        self.set_live_view(true).await
    }

    /// Sets the relative z-position of the camera, and with that the focus.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `level` is outside `[0, 1]` (checked
    ///   before any message is sent; NaN is rejected)
    /// - Any send/receive failure
    pub async fn set_focus(&mut self, level: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&level) {
            return Err(Error::invalid_argument(format!(
                "focus level must be within [0, 1], got: {level}"
            )));
        }

        let reply = self.transport.send(&Command::focus(level)).await?;
        debug!(level, reply = %reply, "Focus set");
        Ok(())
    }

    /// Captures the current image of the camera.
    ///
    /// Starts a capture run under a fresh [`RunId`], polls the run's
    /// snapshot directory until a `.jpg` decodes or the attempt cap is
    /// reached, then stops the run. The STOP command is fire-and-forget;
    /// its reply is never awaited.
    ///
    /// Returns `Ok(None)` when no snapshot appeared within the cap; callers
    /// must handle the no-image case.
    ///
    /// # Errors
    ///
    /// Propagates send/receive failures on START and send failures on STOP.
    /// Snapshot polling failures are retried, never surfaced.
    pub async fn capture_image(&mut self) -> Result<Option<DynamicImage>> {
        let run = RunId::generate();

        let reply = self.transport.send(&Command::experiment_start(&run)).await?;
        debug!(run = %run, reply = %reply, "Capture run started");

        let dir = self.snapshot_root.join(run.as_str());
        let mut image = None;

        for attempt in 1..=self.max_polls {
            match capture::latest_snapshot(&dir) {
                Ok(img) => {
                    debug!(run = %run, attempt, "Snapshot decoded");
                    image = Some(img);
                    break;
                }
                Err(e) => {
                    debug!(run = %run, attempt, error = %e, "Snapshot not ready");
                    sleep(self.poll_interval).await;
                }
            }
        }

        if image.is_none() {
            warn!(
                run = %run,
                attempts = self.max_polls,
                "No snapshot appeared within the attempt cap; returning no image"
            );
        }

        self.transport.post(&Command::experiment_stop(&run)).await?;

        Ok(image)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use tempfile::TempDir;
    use tokio::time::Instant;

    use crate::protocol::{ExperimentAction, ExperimentPayload};

    /// Callback invoked when the mock receives EXPERIMENT/START.
    type OnStart = Box<dyn FnMut(&ExperimentPayload) + Send>;

    /// Transport double recording every outbound command.
    struct MockTransport {
        sent: Arc<Mutex<Vec<Command>>>,
        on_start: Option<OnStart>,
    }

    impl MockTransport {
        fn new() -> (Self, Arc<Mutex<Vec<Command>>>) {
            let sent = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    sent: Arc::clone(&sent),
                    on_start: None,
                },
                sent,
            )
        }

        fn record(&mut self, command: &Command) {
            self.sent.lock().unwrap().push(command.clone());
            if let Command::Experiment(payload) = command
                && payload.action == ExperimentAction::Start
                && let Some(on_start) = &mut self.on_start
            {
                on_start(payload);
            }
        }
    }

    #[async_trait]
    impl DeviceTransport for MockTransport {
        async fn send(&mut self, command: &Command) -> Result<String> {
            self.record(command);
            Ok(r#"{"ok":true}"#.to_string())
        }

        async fn post(&mut self, command: &Command) -> Result<()> {
            self.record(command);
            Ok(())
        }
    }

    fn fast_client(transport: MockTransport, root: &Path) -> LuxClient {
        LuxClient::builder()
            .snapshot_root(root)
            .poll_interval(Duration::from_secs(1))
            .build_with_transport(Box::new(transport))
    }

    fn write_jpeg(dir: &Path, name: &str, luma: u8) {
        let img = image::GrayImage::from_pixel(2, 2, image::Luma([luma]));
        img.save(dir.join(name)).expect("write jpeg");
    }

    fn run_name(command: &Command) -> &RunId {
        match command {
            Command::Experiment(p) => &p.name,
            other => panic!("expected EXPERIMENT, got {other:?}"),
        }
    }

    // ------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_set_focus_rejects_out_of_range_before_sending() {
        let tmp = TempDir::new().expect("tempdir");
        let (mock, sent) = MockTransport::new();
        let mut client = fast_client(mock, tmp.path());

        for bad in [-0.1, 1.1, 42.0, f64::NAN, f64::INFINITY] {
            let err = client.set_focus(bad).await.unwrap_err();
            assert!(err.is_validation_error(), "expected rejection for {bad}");
        }

        assert!(sent.lock().unwrap().is_empty(), "no message may be sent");
    }

    #[tokio::test]
    async fn test_set_focus_accepts_boundaries() {
        let tmp = TempDir::new().expect("tempdir");
        let (mock, sent) = MockTransport::new();
        let mut client = fast_client(mock, tmp.path());

        client.set_focus(0.0).await.expect("lower bound");
        client.set_focus(1.0).await.expect("upper bound");
        client.set_focus(0.5).await.expect("midpoint");

        assert_eq!(sent.lock().unwrap().len(), 3);
    }

    // ------------------------------------------------------------------
    // Zoom cycle
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_set_zoom_emits_exactly_three_messages_in_order() {
        let tmp = TempDir::new().expect("tempdir");
        let (mock, sent) = MockTransport::new();
        let mut client = fast_client(mock, tmp.path());

        client.set_zoom(ZoomMode::Out).await.expect("set zoom");

        let sent = sent.lock().unwrap();
        assert_eq!(
            *sent,
            vec![
                Command::zoom(ZoomMode::Out),
                Command::live_stream(false),
                Command::live_stream(true),
            ]
        );
    }

    #[tokio::test]
    async fn test_configure_enables_live_view_then_applies_zoom() {
        let tmp = TempDir::new().expect("tempdir");
        let (mock, sent) = MockTransport::new();
        let mut client = fast_client(mock, tmp.path());

        client.configure(ZoomMode::In).await.expect("configure");

        let sent = sent.lock().unwrap();
        assert_eq!(
            *sent,
            vec![
                Command::live_stream(true),
                Command::zoom(ZoomMode::In),
                Command::live_stream(false),
                Command::live_stream(true),
            ]
        );
    }

    // ------------------------------------------------------------------
    // Capture
    // ------------------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn test_capture_exhausts_ten_attempts_then_returns_none() {
        let tmp = TempDir::new().expect("tempdir");
        let (mock, sent) = MockTransport::new();
        let mut client = fast_client(mock, tmp.path());

        let started = Instant::now();
        let image = client.capture_image().await.expect("capture");
        let elapsed = started.elapsed();

        assert!(image.is_none());
        // Ten failed attempts, one interval of virtual time after each.
        assert_eq!(elapsed, Duration::from_secs(10));

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 2, "START and STOP only");
        let (start, stop) = (&sent[0], &sent[1]);
        assert!(matches!(
            start,
            Command::Experiment(p) if p.action == ExperimentAction::Start
        ));
        assert!(matches!(
            stop,
            Command::Experiment(p) if p.action == ExperimentAction::Stop
        ));
        assert_eq!(run_name(start), run_name(stop), "STOP reuses the run id");
    }

    #[tokio::test(start_paused = true)]
    async fn test_capture_returns_image_once_snapshot_appears() {
        let tmp = TempDir::new().expect("tempdir");
        let root = tmp.path().to_path_buf();

        let (mut mock, sent) = MockTransport::new();
        mock.on_start = Some(Box::new(move |payload| {
            let dir = root.join(payload.name.as_str());
            fs::create_dir_all(&dir).expect("run dir");
            // Snapshot lands between the second and third poll attempt.
            tokio::spawn(async move {
                sleep(Duration::from_millis(1500)).await;
                write_jpeg(&dir, "0001.jpg", 200);
            });
        }));
        let mut client = fast_client(mock, tmp.path());

        let image = client.capture_image().await.expect("capture");
        let image = image.expect("snapshot decoded");
        assert_eq!(image.to_luma8().dimensions(), (2, 2));

        let sent = sent.lock().unwrap();
        let starts = sent
            .iter()
            .filter(|c| matches!(c, Command::Experiment(p) if p.action == ExperimentAction::Start))
            .count();
        let stops = sent
            .iter()
            .filter(|c| matches!(c, Command::Experiment(p) if p.action == ExperimentAction::Stop))
            .count();
        assert_eq!((starts, stops), (1, 1));
    }

    #[tokio::test]
    async fn test_capture_picks_lexicographic_max_snapshot() {
        let tmp = TempDir::new().expect("tempdir");
        let root = tmp.path().to_path_buf();

        let (mut mock, _sent) = MockTransport::new();
        mock.on_start = Some(Box::new(move |payload| {
            let dir = root.join(payload.name.as_str());
            fs::create_dir_all(&dir).expect("run dir");
            // b.jpg (white) must win over a.jpg (black) by filename order.
            write_jpeg(&dir, "b.jpg", 255);
            write_jpeg(&dir, "a.jpg", 0);
        }));
        let mut client = fast_client(mock, tmp.path());

        let image = client
            .capture_image()
            .await
            .expect("capture")
            .expect("snapshot decoded");
        assert!(image.to_luma8().get_pixel(0, 0).0[0] > 127);
    }
}
