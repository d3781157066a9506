//! Single-threaded stepper: one sweep over all rows

use crate::domain::ObstacleGrid;

use super::kernel::{self, RowContext};
use super::stepper::check_inputs;
use super::{FlowParams, PerfTimer, PhysicsStepper, RunningAverage, SimulationState};

pub struct SequentialStepper {
    params: FlowParams,
    timings: RunningAverage,
}

impl SequentialStepper {
    pub fn new(params: FlowParams) -> Self {
        Self { params, timings: RunningAverage::default() }
    }

    pub fn params(&self) -> FlowParams {
        self.params
    }

    pub fn set_params(&mut self, params: FlowParams) {
        self.params = params;
    }
}

impl PhysicsStepper for SequentialStepper {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn update(&mut self, state: &mut SimulationState, obstacles: &ObstacleGrid, dt: f64) {
        check_inputs(state, obstacles);
        let timer = PerfTimer::start();

        let (width, height) = state.dimensions();
        let ctx = RowContext::new(&self.params, width, height, dt);
        let mut working = state.borrow_working();
        {
            let prev = state.current();
            for (y, row) in working.as_mut_slice().chunks_mut(width as usize).enumerate() {
                kernel::update_row(y as u32, prev, obstacles, &ctx, row);
            }
        }
        state.publish(working);

        self.timings.record(timer.elapsed_ms());
    }

    fn average_step_ms(&self) -> f64 {
        self.timings.mean_ms()
    }

    fn steps_recorded(&self) -> u64 {
        self.timings.samples()
    }

    fn reset_average(&mut self) {
        self.timings.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ObstacleCell;
    use crate::pool::{MatrixPool, PoolBounds};
    use std::sync::Arc;

    fn setup(width: u32, height: u32) -> (SimulationState, ObstacleGrid) {
        let pool = Arc::new(MatrixPool::unmanaged(width, height, PoolBounds::new(0, 6)));
        let mut obstacles = ObstacleGrid::new(width, height);
        obstacles.draw_wind_tunnel_borders();
        obstacles.refresh_normals();
        (SimulationState::new(pool, 1.0 / 60.0), obstacles)
    }

    #[test]
    fn dye_enters_from_the_inlet_and_moves_downstream() {
        let (mut state, obstacles) = setup(32, 16);
        let mut stepper = SequentialStepper::new(FlowParams {
            inflow_speed: 30.0,
            diffusion: 0.0,
            inlet_fraction: 0.5,
        });
        for _ in 0..20 {
            stepper.update(&mut state, &obstacles, 1.0 / 60.0);
        }
        let grid = state.current();
        assert_eq!(grid.get(1, 8), 1.0);
        assert!(grid.get(4, 8) > 0.0);
        assert_eq!(grid.get(1, 1), 0.0);
        assert_eq!(grid.get(0, 8), 0.0, "border cell");
        assert_eq!(stepper.steps_recorded(), 20);
        assert!(stepper.average_step_ms() >= 0.0);
    }

    #[test]
    fn obstacle_cells_stay_empty() {
        let (mut state, mut obstacles) = setup(16, 16);
        for y in 5..11 {
            obstacles.set_cell(6, y, Some(ObstacleCell::generic(6, y as u32))).unwrap();
        }
        obstacles.refresh_normals();
        let mut stepper = SequentialStepper::new(FlowParams::default());
        for _ in 0..40 {
            stepper.update(&mut state, &obstacles, 0.1);
        }
        for y in 5..11 {
            assert_eq!(state.current().get(6, y as u32), 0.0);
        }
    }

    #[test]
    fn average_survives_until_reset() {
        let (mut state, obstacles) = setup(8, 8);
        let mut stepper = SequentialStepper::new(FlowParams::default());
        stepper.update(&mut state, &obstacles, 0.1);
        stepper.update(&mut state, &obstacles, 0.1);
        assert_eq!(stepper.steps_recorded(), 2);
        stepper.reset_average();
        assert_eq!(stepper.steps_recorded(), 0);
        assert_eq!(stepper.average_step_ms(), 0.0);
    }
}
