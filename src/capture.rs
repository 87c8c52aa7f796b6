// THEORY:
// The `capture` module is the screen-side capability boundary. The tracking
// loop never talks to the OS directly; it talks to the `FrameSource` trait,
// which supplies one full-screen image on demand. That seam is what lets the
// integration tests drive the loop with synthetic frames and injected
// failures, while production wires in the `xcap`-backed `ScreenSource`.
//
// A capture failure is an iteration-level error, never a crash: it maps to
// `TrackerError::Capture` and the loop's recovery policy takes over. Only the
// constructor is allowed to fail fatally - if there is no monitor to capture,
// that is surfaced before the loop ever starts.

use image::RgbaImage;
use xcap::Monitor;

use crate::error::{TrackerError, TrackerResult};

/// One captured screen image. Owned by the current loop iteration and
/// discarded after segmentation.
pub type Frame = RgbaImage;

/// Supplies one color image of the current screen on demand.
pub trait FrameSource: Send {
    fn capture(&mut self) -> TrackerResult<Frame>;
}

/// Production frame source: captures the primary monitor via `xcap`.
pub struct ScreenSource {
    monitor: Monitor,
}

impl ScreenSource {
    /// Binds to the first available monitor. Fails when no monitor exists,
    /// which is a startup failure, not an iteration error.
    pub fn new() -> TrackerResult<Self> {
        let monitor = Monitor::all()
            .map_err(|e| TrackerError::Capture(e.to_string()))?
            .into_iter()
            .next()
            .ok_or_else(|| TrackerError::Capture("no monitors found".into()))?;
        Ok(Self { monitor })
    }
}

impl FrameSource for ScreenSource {
    fn capture(&mut self) -> TrackerResult<Frame> {
        self.monitor
            .capture_image()
            .map_err(|e| TrackerError::Capture(e.to_string()))
    }
}
