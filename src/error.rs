// THEORY:
// The `error` module defines the failure taxonomy for the tracking engine.
// Only two things can genuinely fail inside an iteration: talking to the
// screen (capture) and talking to the pointer device (actuation). Everything
// else - a frame with no separable clusters, a region too small to trust -
// is an expected "no target" outcome and is modeled as `Option`, not as an
// error. This keeps error signaling reserved for the device boundary, where
// the control loop's catch-report-pause-retry policy applies.

use thiserror::Error;

/// Errors that can occur during one iteration of the tracking loop.
///
/// All variants are recoverable at the loop boundary: the loop reports them
/// as a status event, pauses, and retries. A failure to even construct a
/// capture or actuation backend surfaces from the constructors in
/// `capture`/`actuator` before the loop ever starts.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The screen could not be captured this iteration.
    #[error("screen capture failed: {0}")]
    Capture(String),
    /// The pointer device could not be read or moved.
    #[error("pointer device failed: {0}")]
    Actuator(String),
}

pub type TrackerResult<T> = Result<T, TrackerError>;
