//! Stepper contract shared by the sequential and parallel variants

use crate::domain::{EngineConfig, ObstacleGrid};

use super::SimulationState;

/// Physical knobs a stepper reads every update
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlowParams {
    /// Free-stream speed along +x, cells per second
    pub inflow_speed: f32,
    /// Blend towards the 4-neighbor mean per step, 0..=1
    pub diffusion: f32,
    /// Share of the left edge held at full concentration, 0..=1
    pub inlet_fraction: f32,
}

impl FlowParams {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            inflow_speed: config.inflow_speed,
            diffusion: config.diffusion,
            inlet_fraction: config.inlet_fraction,
        }
    }
}

impl Default for FlowParams {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

/// Advances a [`SimulationState`] by one time step.
///
/// `update` must see normals that are up to date with the last obstacle
/// edit; the caller refreshes them between a merge and the next step.
/// Every call records its wall time into a running average that is only
/// cleared by `reset_average`.
pub trait PhysicsStepper: Send {
    fn name(&self) -> &'static str;

    fn update(&mut self, state: &mut SimulationState, obstacles: &ObstacleGrid, dt: f64);

    /// Mean step time in ms over all updates since the last reset
    fn average_step_ms(&self) -> f64;

    fn steps_recorded(&self) -> u64;

    fn reset_average(&mut self);
}

pub(crate) fn check_inputs(state: &SimulationState, obstacles: &ObstacleGrid) {
    debug_assert_eq!(
        state.dimensions(),
        (obstacles.width(), obstacles.height()),
        "state and obstacle grid sizes differ"
    );
    debug_assert!(!obstacles.normals_dirty(), "normals not refreshed after edit");
}
