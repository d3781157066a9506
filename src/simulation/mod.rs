//! FlowEngine - obstacle-aware wind tunnel simulation
//!
//! The engine only orchestrates: obstacle editing lives in `ObstacleGrid`,
//! grid ownership in `SimulationState`, the update rule in the steppers and
//! the threading decision in the advisor. Edits refresh the normal cache
//! before the next step reads it.

use std::sync::Arc;

use crate::domain::{EngineConfig, MergeReport, ObstacleBitmap, ObstacleGrid, ObstacleKind};
use crate::foundation::EngineResult;
use crate::pool::{Matrix, MatrixPool};

#[path = "perf/perf_timer.rs"]
mod perf_timer;
#[path = "perf/perf_stats.rs"]
mod perf_stats;
#[path = "state/state.rs"]
mod state;
#[path = "step/stepper.rs"]
mod stepper;
#[path = "step/kernel.rs"]
mod kernel;
#[path = "step/sequential.rs"]
mod sequential;
#[path = "step/parallel.rs"]
mod parallel;
#[path = "step/step.rs"]
mod step;
#[path = "advisor/advisor.rs"]
mod advisor;
#[path = "commands/commands.rs"]
mod commands;
#[path = "init/init.rs"]
mod init;
#[path = "init/settings.rs"]
mod settings;
#[cfg(not(target_arch = "wasm32"))]
#[path = "runner/runner.rs"]
mod runner;
mod facade;

pub use advisor::{prefers_parallel, ThreadingAdvice, ThreadingAdvisor};
pub use facade::WindTunnel;
pub use parallel::ParallelStepper;
pub use perf_stats::PerfStats;
#[cfg(not(target_arch = "wasm32"))]
pub use runner::SimulationRunner;
pub use sequential::SequentialStepper;
pub use state::SimulationState;
pub use stepper::{FlowParams, PhysicsStepper};

use perf_timer::{PerfTimer, RunningAverage};

/// The simulation: configuration, obstacles, pooled grids and steppers
pub struct FlowEngine {
    config: EngineConfig,
    obstacles: ObstacleGrid,
    pool: Arc<MatrixPool>,
    state: SimulationState,
    sequential: SequentialStepper,
    parallel: ParallelStepper,
    use_parallel: bool,

    frame: u64,

    perf_enabled: bool,
    perf_stats: PerfStats,
}

impl FlowEngine {
    /// Engine from a validated configuration
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        init::create_engine(config)
    }

    /// Engine with default settings and the given size
    pub fn with_size(width: u32, height: u32) -> EngineResult<Self> {
        init::create_engine(EngineConfig::with_size(width, height))
    }

    pub fn from_json(json: &str) -> EngineResult<Self> {
        init::create_engine(EngineConfig::from_json(json)?)
    }

    pub fn config(&self) -> &EngineConfig { &self.config }

    pub fn width(&self) -> u32 { self.obstacles.width() }

    pub fn height(&self) -> u32 { self.obstacles.height() }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    pub fn frame(&self) -> u64 { self.frame }

    pub fn obstacles(&self) -> &ObstacleGrid { &self.obstacles }

    pub fn state(&self) -> &SimulationState { &self.state }

    pub fn pool(&self) -> &Arc<MatrixPool> { &self.pool }

    /// Grid of the last completed step
    pub fn current_grid(&self) -> &Matrix {
        self.state.current()
    }

    // === Lifecycle ===

    /// Rebuild everything for a new grid size; the pool is replaced.
    pub fn reinitialize(&mut self, width: u32, height: u32) -> EngineResult<()> {
        init::reinitialize(self, width, height)
    }

    /// Keep size and pool, drop obstacles and flow, restart statistics.
    pub fn soft_reinitialize(&mut self) {
        init::soft_reinitialize(self)
    }

    // === Obstacle editing ===

    /// Merge a painted presence mask; see `ObstacleGrid::merge_from_presence_array`.
    pub fn merge_obstacles(&mut self, presence: &[u8]) -> EngineResult<MergeReport> {
        commands::merge_obstacles(self, presence)
    }

    pub fn set_obstacle(&mut self, x: i32, y: i32, kind: Option<ObstacleKind>) -> EngineResult<()> {
        commands::set_obstacle(self, x, y, kind)
    }

    pub fn clear_obstacles(&mut self) {
        commands::clear_obstacles(self)
    }

    pub fn draw_wind_tunnel_borders(&mut self) {
        commands::draw_wind_tunnel_borders(self)
    }

    pub fn load_obstacle_image(&mut self, bitmap: &ObstacleBitmap) -> EngineResult<()> {
        commands::load_obstacle_image(self, bitmap)
    }

    pub fn obstacle_image(&self, color: u32) -> ObstacleBitmap {
        self.obstacles.to_image(color)
    }

    pub fn obstacle_type_array(&self) -> Vec<Option<ObstacleKind>> {
        self.obstacles.to_obstacle_type_array()
    }

    pub fn border_indices(&self) -> Vec<usize> {
        self.obstacles.border_indices()
    }

    // === Stepping ===

    /// Advance one time step with the active stepper.
    pub fn step(&mut self) {
        step::step(self);
    }

    pub fn poll_render_grid(&mut self) -> Option<Matrix> {
        self.state.poll_render_grid()
    }

    pub fn return_grid_to_pool(&self, grid: Matrix) -> EngineResult<()> {
        self.state.return_grid_to_pool(grid)
    }

    // === Threading ===

    pub fn is_parallel(&self) -> bool { self.use_parallel }

    pub fn set_parallel(&mut self, enabled: bool) {
        settings::set_parallel(self, enabled);
    }

    /// Average ms per step of the active stepper since the last reinitialize
    pub fn average_step_ms(&self) -> f64 {
        self.active_stepper().average_step_ms()
    }

    /// Measure both steppers on scratch state and switch to the faster one.
    pub fn run_threading_advisor(&mut self) -> ThreadingAdvice {
        settings::run_threading_advisor(self)
    }

    // === Settings ===

    pub fn set_flow_params(&mut self, params: FlowParams) -> EngineResult<()> {
        settings::set_flow_params(self, params)
    }

    pub fn flow_params(&self) -> FlowParams {
        self.sequential.params()
    }

    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        settings::enable_perf_metrics(self, enabled);
    }

    /// Last step perf snapshot (zeros when perf disabled)
    pub fn get_perf_stats(&self) -> PerfStats {
        settings::get_perf_stats(self)
    }

    fn active_stepper(&self) -> &dyn PhysicsStepper {
        if self.use_parallel { &self.parallel } else { &self.sequential }
    }
}

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;
