//! Measures both steppers on scratch state and picks one

use std::sync::Arc;

use crate::domain::{ObstacleGrid, ThreadingConfig};
use crate::pool::MatrixPool;

use super::{PhysicsStepper, SimulationState};

/// Result of one advisor run
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThreadingAdvice {
    pub sequential_ms: f64,
    pub parallel_ms: f64,
    pub use_parallel: bool,
}

/// True only when parallel beats sequential by more than `tolerance`
/// (relative, 0.05 = 5%). Ties and near-ties stay sequential.
pub fn prefers_parallel(sequential_ms: f64, parallel_ms: f64, tolerance: f64) -> bool {
    if !(sequential_ms.is_finite() && parallel_ms.is_finite()) {
        return false;
    }
    parallel_ms < sequential_ms * (1.0 - tolerance)
}

#[derive(Clone, Copy, Debug)]
pub struct ThreadingAdvisor {
    iterations: u32,
    tolerance: f64,
}

impl Default for ThreadingAdvisor {
    fn default() -> Self {
        Self::from_config(&ThreadingConfig::default())
    }
}

impl ThreadingAdvisor {
    pub fn new(iterations: u32, tolerance: f64) -> Self {
        Self { iterations: iterations.max(1), tolerance }
    }

    pub fn from_config(config: &ThreadingConfig) -> Self {
        Self::new(config.advisor_iterations, config.advisor_tolerance)
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Run each stepper `iterations` times on its own scratch state and
    /// compare their average step times. Steppers are taken by value so the
    /// averages measured here never leak into a live stepper.
    pub fn compare<S, P>(
        &self,
        mut sequential: S,
        mut parallel: P,
        obstacles: &ObstacleGrid,
        pool: &Arc<MatrixPool>,
        time_step: f64,
    ) -> ThreadingAdvice
    where
        S: PhysicsStepper,
        P: PhysicsStepper,
    {
        let sequential_ms = self.measure(&mut sequential, obstacles, pool, time_step);
        let parallel_ms = self.measure(&mut parallel, obstacles, pool, time_step);
        let use_parallel = prefers_parallel(sequential_ms, parallel_ms, self.tolerance);

        log::info!(
            "threading advisor: {} {:.3} ms, {} {:.3} ms over {} steps -> {}",
            sequential.name(),
            sequential_ms,
            parallel.name(),
            parallel_ms,
            self.iterations,
            if use_parallel { parallel.name() } else { sequential.name() }
        );

        ThreadingAdvice { sequential_ms, parallel_ms, use_parallel }
    }

    pub fn should_use_parallel<S, P>(
        &self,
        sequential: S,
        parallel: P,
        obstacles: &ObstacleGrid,
        pool: &Arc<MatrixPool>,
        time_step: f64,
    ) -> bool
    where
        S: PhysicsStepper,
        P: PhysicsStepper,
    {
        self.compare(sequential, parallel, obstacles, pool, time_step).use_parallel
    }

    fn measure<T: PhysicsStepper>(
        &self,
        stepper: &mut T,
        obstacles: &ObstacleGrid,
        pool: &Arc<MatrixPool>,
        time_step: f64,
    ) -> f64 {
        // scratch state gives its grids back to the pool on drop
        let mut scratch = SimulationState::new(Arc::clone(pool), time_step);
        for _ in 0..self.iterations {
            stepper.update(&mut scratch, obstacles, time_step);
            if let Some(grid) = scratch.poll_render_grid() {
                if let Err(e) = scratch.return_grid_to_pool(grid) {
                    log::warn!("advisor scratch grid not returned: {}", e);
                }
            }
        }
        stepper.average_step_ms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::PoolBounds;
    use crate::simulation::perf_timer::{PerfTimer, RunningAverage};
    use crate::simulation::{FlowParams, ParallelStepper, SequentialStepper};
    use std::time::Duration;

    /// Publishes a zero grid and reports a fixed average
    struct FixedCost {
        name: &'static str,
        ms: f64,
        steps: u64,
    }

    impl FixedCost {
        fn new(name: &'static str, ms: f64) -> Self {
            Self { name, ms, steps: 0 }
        }
    }

    impl PhysicsStepper for FixedCost {
        fn name(&self) -> &'static str { self.name }

        fn update(&mut self, state: &mut SimulationState, _obstacles: &ObstacleGrid, _dt: f64) {
            let mut grid = state.borrow_working();
            grid.fill(0.0);
            state.publish(grid);
            self.steps += 1;
        }

        fn average_step_ms(&self) -> f64 { self.ms }

        fn steps_recorded(&self) -> u64 { self.steps }

        fn reset_average(&mut self) { self.steps = 0; }
    }

    /// Real sequential sweep plus a fixed sleep, timed on the wall clock
    struct Burdened {
        inner: SequentialStepper,
        extra: Duration,
        timings: RunningAverage,
    }

    impl Burdened {
        fn new(extra: Duration) -> Self {
            Self {
                inner: SequentialStepper::new(FlowParams::default()),
                extra,
                timings: RunningAverage::default(),
            }
        }
    }

    impl PhysicsStepper for Burdened {
        fn name(&self) -> &'static str { "burdened" }

        fn update(&mut self, state: &mut SimulationState, obstacles: &ObstacleGrid, dt: f64) {
            let timer = PerfTimer::start();
            self.inner.update(state, obstacles, dt);
            std::thread::sleep(self.extra);
            self.timings.record(timer.elapsed_ms());
        }

        fn average_step_ms(&self) -> f64 { self.timings.mean_ms() }

        fn steps_recorded(&self) -> u64 { self.timings.samples() }

        fn reset_average(&mut self) {
            self.timings.reset();
            self.inner.reset_average();
        }
    }

    fn fixture() -> (ObstacleGrid, Arc<MatrixPool>) {
        let mut grid = ObstacleGrid::new(24, 12);
        grid.draw_wind_tunnel_borders();
        grid.refresh_normals();
        let pool = Arc::new(MatrixPool::unmanaged(24, 12, PoolBounds::new(0, 8)));
        (grid, pool)
    }

    #[test]
    fn decision_rule_needs_more_than_the_tolerance() {
        assert!(prefers_parallel(10.0, 9.0, 0.05));
        assert!(!prefers_parallel(10.0, 9.6, 0.05));
        assert!(!prefers_parallel(10.0, 10.0, 0.05));
        assert!(!prefers_parallel(10.0, 12.0, 0.05));
        assert!(!prefers_parallel(f64::NAN, 1.0, 0.05));
    }

    #[test]
    fn clearly_faster_parallel_wins() {
        let (grid, pool) = fixture();
        let advisor = ThreadingAdvisor::new(5, 0.05);
        let advice = advisor.compare(
            FixedCost::new("seq", 10.0),
            FixedCost::new("par", 4.0),
            &grid,
            &pool,
            0.1,
        );
        assert!(advice.use_parallel);
        assert_eq!(advice.sequential_ms, 10.0);
        assert_eq!(advice.parallel_ms, 4.0);
    }

    #[test]
    fn marginal_gain_stays_sequential() {
        let (grid, pool) = fixture();
        let advisor = ThreadingAdvisor::new(5, 0.05);
        assert!(!advisor.should_use_parallel(
            FixedCost::new("seq", 10.0),
            FixedCost::new("par", 9.7),
            &grid,
            &pool,
            0.1,
        ));
    }

    #[test]
    fn scratch_grids_go_back_to_the_pool() {
        let (grid, pool) = fixture();
        let advisor = ThreadingAdvisor::new(12, 0.05);
        advisor.compare(
            FixedCost::new("seq", 1.0),
            FixedCost::new("par", 1.0),
            &grid,
            &pool,
            0.1,
        );
        let idle = pool.available();
        assert!(idle >= 2, "idle = {}", idle);
        // a second run reuses those grids instead of growing the pool
        advisor.compare(
            FixedCost::new("seq", 1.0),
            FixedCost::new("par", 1.0),
            &grid,
            &pool,
            0.1,
        );
        assert_eq!(pool.available(), idle);
    }

    #[test]
    fn real_steppers_produce_a_verdict() {
        let (grid, pool) = fixture();
        let advisor = ThreadingAdvisor::new(3, 0.05);
        let advice = advisor.compare(
            SequentialStepper::new(FlowParams::default()),
            ParallelStepper::new(FlowParams::default(), 2),
            &grid,
            &pool,
            1.0 / 60.0,
        );
        assert!(advice.sequential_ms >= 0.0);
        assert!(advice.parallel_ms >= 0.0);
        assert_eq!(
            advice.use_parallel,
            prefers_parallel(advice.sequential_ms, advice.parallel_ms, 0.05)
        );
    }

    #[test]
    fn zero_iterations_is_bumped_to_one() {
        assert_eq!(ThreadingAdvisor::new(0, 0.05).iterations(), 1);
    }

    #[test]
    fn slowed_sequential_stepper_loses_to_parallel() {
        let (grid, pool) = fixture();
        let advisor = ThreadingAdvisor::new(3, 0.05);
        let advice = advisor.compare(
            Burdened::new(Duration::from_millis(20)),
            ParallelStepper::new(FlowParams::default(), 2),
            &grid,
            &pool,
            1.0 / 60.0,
        );
        assert!(advice.sequential_ms >= 20.0, "sequential = {}", advice.sequential_ms);
        assert!(advice.use_parallel, "{:?}", advice);
    }
}
