// THEORY:
// The `actuator` module is the pointer-side capability boundary, the mirror
// image of `capture`. The loop consumes the `PointerActuator` trait - read
// the current position once per move, then apply each path step - and the
// production implementation injects real pointer events via `enigo`.
//
// Both operations are assumed synchronous and near-instantaneous; pacing
// between steps is the path's job, not the actuator's. Failures map to
// `TrackerError::Actuator` and recover at the loop boundary exactly like
// capture failures.

use enigo::{Coordinate, Enigo, Mouse, Settings};

use crate::error::{TrackerError, TrackerResult};

/// Reports and updates the pointer position in screen coordinates.
pub trait PointerActuator: Send {
    fn position(&mut self) -> TrackerResult<(i32, i32)>;
    fn set_position(&mut self, x: i32, y: i32) -> TrackerResult<()>;
}

/// Production actuator: drives the real pointer through `enigo`.
pub struct EnigoActuator {
    enigo: Enigo,
}

impl EnigoActuator {
    /// Connects to the platform input backend. Fails when the capability is
    /// entirely absent, which is a startup failure, not an iteration error.
    pub fn new() -> TrackerResult<Self> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| TrackerError::Actuator(e.to_string()))?;
        Ok(Self { enigo })
    }
}

impl PointerActuator for EnigoActuator {
    fn position(&mut self) -> TrackerResult<(i32, i32)> {
        self.enigo
            .location()
            .map_err(|e| TrackerError::Actuator(e.to_string()))
    }

    fn set_position(&mut self, x: i32, y: i32) -> TrackerResult<()> {
        self.enigo
            .move_mouse(x, y, Coordinate::Abs)
            .map_err(|e| TrackerError::Actuator(e.to_string()))
    }
}
