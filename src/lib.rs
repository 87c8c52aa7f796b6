// THEORY:
// This file is the main entry point for the `hue_hound` library crate.
// It follows the standard Rust convention of using `lib.rs` to define the public
// API that will be exposed to external consumers (like the runner binary or a
// control-panel frontend).
//
// The primary goal is to export the `Tracker` control loop and its associated
// data structures (`TrackerConfig`, `TrackerEvent`, the capability traits) as
// the clean, high-level interface for the entire tracking engine. The internal
// perception and motion algorithms (`core_modules`) are encapsulated behind the
// `DetectionPipeline`, providing a clean separation of concerns.

pub mod actuator;
pub mod capture;
pub mod config;
pub mod core_modules;
pub mod error;
pub mod pipeline;
pub mod tracker;

pub use crate::actuator::{EnigoActuator, PointerActuator};
pub use crate::capture::{Frame, FrameSource, ScreenSource};
pub use crate::config::{LoopConfig, SharedConfig, Speed, TrackerConfig};
pub use crate::core_modules::region::region::TargetPoint;
pub use crate::core_modules::segmenter::segmenter::TargetColor;
pub use crate::error::{TrackerError, TrackerResult};
pub use crate::pipeline::{DetectionConfig, DetectionPipeline};
pub use crate::tracker::{Tracker, TrackerEvent};
