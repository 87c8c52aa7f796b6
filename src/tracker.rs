// THEORY:
// The `tracker` module is the control loop that closes the perception-to-
// actuation circle: capture, segment, locate, move, pace, repeat. It is the
// only stateful orchestrator in the crate and the owner of the loop's
// lifecycle.
//
// Key architectural principles:
// 1.  **One dedicated thread, strictly sequential iterations**: the loop
//     runs on its own background thread; no iteration ever overlaps another.
//     Pointer movement is synchronous inside the iteration, so the next
//     capture always sees the world after the move finished.
// 2.  **Cooperative cancellation**: `stop` raises a flag that the loop
//     checks only at iteration boundaries. A long clustering or movement
//     step is never interrupted mid-flight; `stop` blocks until the thread
//     has fully exited, and recovers the worker so the Stopped -> Running
//     cycle is re-entrant.
// 3.  **Self-pacing**: each iteration measures its own processing time and
//     sleeps the remainder of the target period, floored at a minimum sleep
//     so the loop cannot busy-spin even when processing overruns.
// 4.  **Errors stay inside the loop**: any iteration failure is caught at
//     the loop boundary, reported outward as a status event, and followed by
//     a recovery pause. A single bad frame never terminates the loop and
//     never propagates to the controlling context.
// 5.  **Snapshot configuration**: the externally mutable knobs are read once
//     at the top of each iteration, so a control-surface write lands cleanly
//     on the next pass.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Instant;

use rand::rngs::ThreadRng;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::actuator::PointerActuator;
use crate::capture::FrameSource;
use crate::config::{LoopConfig, SharedConfig, TrackerConfig};
use crate::core_modules::motion::motion;
use crate::core_modules::segmenter::segmenter::TargetColor;
use crate::error::TrackerResult;
use crate::pipeline::DetectionPipeline;

/// Events the loop emits to whoever is observing it (a control panel, the
/// runner binary, a test). The loop has no dependency on how they are shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerEvent {
    /// A free-text status or error message.
    Status(String),
    /// A target was located this iteration, at these screen coordinates.
    TargetFound { x: i32, y: i32 },
}

/// The moving parts the loop thread owns while running: the capability
/// backends and the detection stack. Returned by the thread on exit so the
/// tracker can be started again.
struct Worker<S, A> {
    source: S,
    actuator: A,
    pipeline: DetectionPipeline,
}

impl<S: FrameSource, A: PointerActuator> Worker<S, A> {
    fn run(
        mut self,
        running: Arc<AtomicBool>,
        config: SharedConfig,
        loop_config: LoopConfig,
        events: mpsc::UnboundedSender<TrackerEvent>,
    ) -> Self {
        let mut rng = rand::rng();
        info!("tracking started");
        let _ = events.send(TrackerEvent::Status("tracking started".into()));

        while running.load(Ordering::Acquire) {
            let started = Instant::now();
            let snapshot = config.snapshot();

            match self.run_iteration(&snapshot, &mut rng, &events) {
                Ok(()) => {
                    let budget = loop_config.target_period.saturating_sub(started.elapsed());
                    thread::sleep(budget.max(loop_config.min_sleep));
                }
                Err(err) => {
                    warn!(error = %err, "iteration failed, pausing before retry");
                    let _ = events.send(TrackerEvent::Status(format!("error: {err}")));
                    thread::sleep(loop_config.recovery_pause);
                }
            }
        }

        info!("tracking stopped");
        let _ = events.send(TrackerEvent::Status("tracking stopped".into()));
        self
    }

    /// One pass of the loop: capture, locate, and - when a target exists -
    /// notify and move. Movement blocks until the whole path is applied.
    fn run_iteration(
        &mut self,
        config: &TrackerConfig,
        rng: &mut ThreadRng,
        events: &mpsc::UnboundedSender<TrackerEvent>,
    ) -> TrackerResult<()> {
        let frame = self.source.capture()?;
        let target = TargetColor::new(config.target_color, config.tolerance);

        if let Some(point) = self.pipeline.locate_target(&frame, target) {
            debug!(x = point.x, y = point.y, "target located");
            let _ = events.send(TrackerEvent::TargetFound {
                x: point.x,
                y: point.y,
            });

            let from = self.actuator.position()?;
            let path = motion::plan_path(rng, from, (point.x, point.y), config.speed.multiplier());
            for step in path {
                self.actuator.set_position(step.x, step.y)?;
                thread::sleep(step.pause);
            }
        }

        Ok(())
    }
}

/// The control loop handle. Owns the lifecycle (Stopped -> Running ->
/// Stopped, re-entrant) and the configuration the control surface mutates.
pub struct Tracker<S: FrameSource + 'static, A: PointerActuator + 'static> {
    config: SharedConfig,
    loop_config: LoopConfig,
    events: mpsc::UnboundedSender<TrackerEvent>,
    running: Arc<AtomicBool>,
    worker: Option<Worker<S, A>>,
    handle: Option<thread::JoinHandle<Worker<S, A>>>,
}

impl<S: FrameSource + 'static, A: PointerActuator + 'static> Tracker<S, A> {
    /// Builds a tracker around the given capability backends. Returns the
    /// handle and the receiving end of its event stream.
    pub fn new(
        source: S,
        actuator: A,
        config: TrackerConfig,
        loop_config: LoopConfig,
    ) -> (Self, mpsc::UnboundedReceiver<TrackerEvent>) {
        let (events, event_rx) = mpsc::unbounded_channel();
        let pipeline = DetectionPipeline::new(loop_config.detection.clone());
        let tracker = Self {
            config: SharedConfig::new(config),
            loop_config,
            events,
            running: Arc::new(AtomicBool::new(false)),
            worker: Some(Worker {
                source,
                actuator,
                pipeline,
            }),
            handle: None,
        };
        (tracker, event_rx)
    }

    /// A handle to the mutable configuration, for the control surface.
    pub fn config(&self) -> SharedConfig {
        self.config.clone()
    }

    /// Whether the loop thread is currently running.
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Starts the loop on a dedicated background thread. No-op when already
    /// running.
    pub fn start(&mut self) {
        if self.handle.is_some() {
            debug!("start ignored: already running");
            return;
        }
        let Some(worker) = self.worker.take() else {
            error!("start ignored: worker was lost to a previous panic");
            return;
        };

        self.running.store(true, Ordering::Release);
        let running = Arc::clone(&self.running);
        let config = self.config.clone();
        let loop_config = self.loop_config.clone();
        let events = self.events.clone();
        self.handle = Some(thread::spawn(move || {
            worker.run(running, config, loop_config, events)
        }));
    }

    /// Stops the loop and blocks until the thread has fully exited. The
    /// current iteration is completed, not abandoned. No-op when already
    /// stopped.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        let Some(handle) = self.handle.take() else {
            return;
        };
        match handle.join() {
            Ok(worker) => self.worker = Some(worker),
            Err(_) => error!("tracker thread panicked; tracker cannot be restarted"),
        }
    }
}

impl<S: FrameSource + 'static, A: PointerActuator + 'static> Drop for Tracker<S, A> {
    fn drop(&mut self) {
        // Best effort shutdown on drop.
        self.stop();
    }
}
