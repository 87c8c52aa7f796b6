// THEORY:
// The `motion` module synthesizes the pointer's trajectory. A straight,
// constant-speed line is trivially mechanical; this planner instead produces
// the texture of a human hand: a curved approach, small mid-flight tremor,
// and a clean final convergence.
//
// Key architectural principles & algorithm steps:
// 1.  **Snap for short corrections**: below a small distance there is no
//     curve worth synthesizing; the path is the single target point.
// 2.  **Distance-proportional step count**: longer moves get more steps
//     (scaled by the configured speed multiplier), with a floor so even the
//     shortest curved move stays smooth.
// 3.  **One perturbed control point**: a quadratic Bezier through the two
//     endpoints and one control point offset from the straight-line midpoint
//     by bounded uniform noise. One control point gives a single, gentle arc;
//     each move draws a fresh one, so no two paths repeat.
// 4.  **Jitter everywhere but the approach**: independent Gaussian noise on
//     every point whose curve parameter is below 0.9. The final tenth of the
//     path is left exact, so the pointer converges onto the target instead
//     of trembling around it. The last point is evaluated at exactly t = 1,
//     which makes the terminal coordinates exact by construction.
// 5.  **Per-step pacing**: every step carries its own short randomized pause,
//     applied by the consumer between pointer updates, so traversal speed
//     also varies slightly.
//
// The planner is a stateless utility: it borrows a caller-owned RNG, which
// keeps the randomness injectable and the tests deterministic.

pub mod motion {
    use rand::Rng;
    use rand_distr::{Distribution, Normal};
    use std::time::Duration;

    /// Distance below which the path collapses to the single target point.
    pub const SNAP_DISTANCE: f64 = 5.0;
    /// Floor on the number of steps in a curved path.
    pub const MIN_STEPS: usize = 5;
    /// Steps per pixel of distance, before the speed multiplier.
    const STEP_DENSITY: f64 = 0.3;
    /// Maximum offset of the control point from the midpoint, per axis.
    const CONTROL_POINT_SPREAD: f64 = 30.0;
    /// Standard deviation of the per-point Gaussian jitter, in pixels.
    const JITTER_STD_DEV: f64 = 1.5;
    /// Curve parameter beyond which no jitter is injected.
    const JITTER_CUTOFF: f64 = 0.9;
    /// Bounds of the randomized per-step pause, in microseconds.
    const STEP_PAUSE_MICROS: std::ops::RangeInclusive<u64> = 1_000..=3_000;

    /// One step of a planned pointer path: the position to apply, then the
    /// pause to let elapse before the next step.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PathStep {
        pub x: i32,
        pub y: i32,
        pub pause: Duration,
    }

    /// Plans a path from `from` to `to`. The returned steps are consumed in
    /// order; the last step is always exactly `to`.
    pub fn plan_path<R: Rng>(
        rng: &mut R,
        from: (i32, i32),
        to: (i32, i32),
        speed: f64,
    ) -> Vec<PathStep> {
        let dx = (to.0 - from.0) as f64;
        let dy = (to.1 - from.1) as f64;
        let distance = dx.hypot(dy);

        if distance < SNAP_DISTANCE {
            return vec![PathStep {
                x: to.0,
                y: to.1,
                pause: Duration::ZERO,
            }];
        }

        let steps = ((distance * speed * STEP_DENSITY) as usize).max(MIN_STEPS);

        let control_x = from.0 as f64
            + dx * 0.5
            + rng.random_range(-CONTROL_POINT_SPREAD..=CONTROL_POINT_SPREAD);
        let control_y = from.1 as f64
            + dy * 0.5
            + rng.random_range(-CONTROL_POINT_SPREAD..=CONTROL_POINT_SPREAD);

        // Parameters are constants, so construction cannot fail.
        let jitter = Normal::new(0.0, JITTER_STD_DEV).unwrap();

        let mut path = Vec::with_capacity(steps);
        for i in 0..steps {
            let t = i as f64 / (steps - 1) as f64;
            let mut x = bezier(from.0 as f64, control_x, to.0 as f64, t);
            let mut y = bezier(from.1 as f64, control_y, to.1 as f64, t);
            if t < JITTER_CUTOFF {
                x += jitter.sample(rng);
                y += jitter.sample(rng);
            }
            path.push(PathStep {
                x: x.round() as i32,
                y: y.round() as i32,
                pause: Duration::from_micros(rng.random_range(STEP_PAUSE_MICROS)),
            });
        }

        path
    }

    /// Evaluates a quadratic Bezier through (p0, control, p1) at parameter t.
    fn bezier(p0: f64, control: f64, p1: f64, t: f64) -> f64 {
        let u = 1.0 - t;
        u * u * p0 + 2.0 * u * t * control + t * t * p1
    }
}

#[cfg(test)]
mod tests {
    use super::motion::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::time::Duration;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x4875_6548_6F75_6E64)
    }

    #[test]
    fn identical_endpoints_snap_to_single_point() {
        let path = plan_path(&mut rng(), (100, 100), (100, 100), 0.7);
        assert_eq!(path.len(), 1);
        assert_eq!((path[0].x, path[0].y), (100, 100));
    }

    #[test]
    fn short_distance_snaps_without_interpolation() {
        let path = plan_path(&mut rng(), (100, 100), (103, 103), 0.7);
        assert_eq!(path.len(), 1);
        assert_eq!((path[0].x, path[0].y), (103, 103));
    }

    #[test]
    fn path_terminates_exactly_at_target() {
        let mut rng = rng();
        for (from, to) in [
            ((0, 0), (500, 300)),
            ((200, 700), (190, 710)),
            ((-40, 60), (300, -20)),
        ] {
            let path = plan_path(&mut rng, from, to, 1.0);
            let last = path.last().unwrap();
            assert_eq!((last.x, last.y), to, "from {from:?} to {to:?}");
        }
    }

    #[test]
    fn step_count_never_falls_below_floor() {
        // Just past the snap threshold: curve synthesis with minimum steps.
        let path = plan_path(&mut rng(), (0, 0), (6, 0), 0.3);
        assert_eq!(path.len(), MIN_STEPS);
    }

    #[test]
    fn step_count_grows_monotonically_with_distance() {
        let mut rng = rng();
        let mut previous = 0;
        for distance in [10, 50, 100, 400, 1000] {
            let path = plan_path(&mut rng, (0, 0), (distance, 0), 0.7);
            assert!(
                path.len() >= previous,
                "distance {distance} produced {} steps, fewer than {previous}",
                path.len()
            );
            previous = path.len();
        }
    }

    #[test]
    fn faster_speed_produces_more_steps() {
        let slow = plan_path(&mut rng(), (0, 0), (600, 0), 0.3);
        let fast = plan_path(&mut rng(), (0, 0), (600, 0), 1.0);
        assert!(fast.len() > slow.len());
    }

    #[test]
    fn curved_steps_carry_bounded_pauses() {
        let path = plan_path(&mut rng(), (0, 0), (400, 400), 0.7);
        for step in &path {
            assert!(step.pause >= Duration::from_millis(1));
            assert!(step.pause <= Duration::from_millis(3));
        }
    }

    #[test]
    fn path_stays_in_the_endpoints_neighborhood() {
        // The control point offset is bounded by 30 and the jitter by a few
        // standard deviations, so the path cannot wander far off the segment.
        let path = plan_path(&mut rng(), (0, 0), (200, 0), 0.7);
        for step in &path {
            assert!(step.x >= -30 && step.x <= 230, "x = {}", step.x);
            assert!(step.y.abs() <= 40, "y = {}", step.y);
        }
    }
}
