// THEORY:
// The `config` module holds the two configuration surfaces of the engine:
//
// 1.  `TrackerConfig` / `SharedConfig`: the externally mutable knobs (target
//     color, tolerance, speed). A control panel writes them at any time; the
//     loop reads one snapshot at the top of every iteration. This gives the
//     single-writer / single-reader model its concrete shape: a change takes
//     effect on the next iteration, never mid-iteration, and the loop never
//     observes a half-applied update.
// 2.  `LoopConfig`: timing and detection parameters fixed when the tracker is
//     constructed. These are not part of the runtime control surface.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::pipeline::DetectionConfig;

/// The default target color, `#C9008D` as an RGB triple.
pub const DEFAULT_TARGET_COLOR: [u8; 3] = [201, 0, 141];

/// Pointer movement speed presets exposed by the control surface.
/// Each maps to a multiplier applied when sizing a motion path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speed {
    Slow,
    Medium,
    Fast,
}

impl Speed {
    /// The step-count multiplier for this preset.
    pub fn multiplier(self) -> f64 {
        match self {
            Speed::Slow => 0.3,
            Speed::Medium => 0.7,
            Speed::Fast => 1.0,
        }
    }
}

/// The externally mutable tracking parameters, read once per iteration.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// The RGB color the segmenter hunts for.
    pub target_color: [u8; 3],
    /// Color tolerance (0-100) accepted from the control surface. Scaled to
    /// an RGB-distance acceptance gate on the selected cluster: a nearest
    /// cluster whose centroid is still farther from the target color than
    /// the gate allows counts as "no target."
    pub tolerance: u8,
    /// Pointer movement speed preset.
    pub speed: Speed,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            target_color: DEFAULT_TARGET_COLOR,
            tolerance: 30,
            speed: Speed::Medium,
        }
    }
}

/// A shared handle to the mutable tracking parameters.
///
/// The control surface holds one clone and writes whole fields; the loop
/// holds another and calls `snapshot` at the top of each iteration. Updates
/// are plain field assignments under a short-lived lock, so the next
/// iteration always sees a complete, consistent configuration.
#[derive(Clone)]
pub struct SharedConfig(Arc<Mutex<TrackerConfig>>);

impl SharedConfig {
    pub fn new(config: TrackerConfig) -> Self {
        Self(Arc::new(Mutex::new(config)))
    }

    /// Returns a copy of the current configuration.
    pub fn snapshot(&self) -> TrackerConfig {
        self.0.lock().unwrap().clone()
    }

    pub fn set_target_color(&self, color: [u8; 3]) {
        self.0.lock().unwrap().target_color = color;
    }

    /// Sets the advisory tolerance, clamped to the 0-100 range the control
    /// surface exposes.
    pub fn set_tolerance(&self, tolerance: u8) {
        self.0.lock().unwrap().tolerance = tolerance.min(100);
    }

    pub fn set_speed(&self, speed: Speed) {
        self.0.lock().unwrap().speed = speed;
    }
}

/// Timing and detection parameters fixed at tracker construction time.
#[derive(Debug, Clone)]
pub struct LoopConfig {
    /// The cadence the loop self-paces to (~10 Hz by default).
    pub target_period: Duration,
    /// The floor on the per-iteration sleep, so the loop never busy-spins
    /// even when processing overruns the target period.
    pub min_sleep: Duration,
    /// How long the loop pauses after a recoverable iteration error before
    /// trying again.
    pub recovery_pause: Duration,
    /// Parameters for the detection pipeline.
    pub detection: DetectionConfig,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            target_period: Duration::from_millis(100),
            min_sleep: Duration::from_millis(10),
            recovery_pause: Duration::from_secs(1),
            detection: DetectionConfig::default(),
        }
    }
}
