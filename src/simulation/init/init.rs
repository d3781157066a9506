use std::sync::Arc;

use crate::domain::{EngineConfig, ObstacleGrid};
use crate::foundation::EngineResult;
use crate::pool::MatrixPool;

use super::perf_stats::PerfStats;
use super::{FlowEngine, FlowParams, ParallelStepper, PhysicsStepper, SequentialStepper, SimulationState};

fn build_obstacles(config: &EngineConfig) -> ObstacleGrid {
    let mut obstacles = ObstacleGrid::new(config.width, config.height);
    if config.wind_tunnel_borders {
        obstacles.draw_wind_tunnel_borders();
    }
    obstacles.refresh_normals();
    obstacles
}

fn build_pool(config: &EngineConfig) -> Arc<MatrixPool> {
    let pool = Arc::new(MatrixPool::from_config(config.width, config.height, &config.pool));
    pool.warm_up(config.pool.min_idle);
    pool
}

pub(super) fn create_engine(config: EngineConfig) -> EngineResult<FlowEngine> {
    config.validate()?;

    let obstacles = build_obstacles(&config);
    let pool = build_pool(&config);
    let state = SimulationState::new(Arc::clone(&pool), config.time_step);
    let params = FlowParams::from_config(&config);

    log::info!(
        "flow engine {}x{}, dt {:.4}s, {} stepper",
        config.width,
        config.height,
        config.time_step,
        if config.threading.parallel { "parallel" } else { "sequential" }
    );

    Ok(FlowEngine {
        obstacles,
        pool,
        state,
        sequential: SequentialStepper::new(params),
        parallel: ParallelStepper::new(params, config.threading.bands),
        use_parallel: config.threading.parallel,
        frame: 0,
        perf_enabled: false,
        perf_stats: PerfStats::default(),
        config,
    })
}

/// New size: fresh obstacle grid, pool and state. Stepper averages restart.
pub(super) fn reinitialize(engine: &mut FlowEngine, width: u32, height: u32) -> EngineResult<()> {
    let mut config = engine.config.clone();
    config.width = width;
    config.height = height;
    config.validate()?;

    engine.obstacles = build_obstacles(&config);
    let pool = build_pool(&config);
    // the old state hands its grids to the old pool, which goes with it
    engine.state = SimulationState::new(Arc::clone(&pool), config.time_step);
    engine.pool = pool;
    engine.config = config;
    reset_counters(engine);

    log::info!("reinitialized to {}x{}", width, height);
    Ok(())
}

/// Same size and pool: obstacles cleared (borders redrawn when
/// configured), flow zeroed, averages restarted.
pub(super) fn soft_reinitialize(engine: &mut FlowEngine) {
    engine.obstacles.clear();
    if engine.config.wind_tunnel_borders {
        engine.obstacles.draw_wind_tunnel_borders();
    }
    engine.obstacles.refresh_normals();
    engine.state.reset();
    reset_counters(engine);
    log::debug!("soft reinitialize {}x{}", engine.width(), engine.height());
}

fn reset_counters(engine: &mut FlowEngine) {
    engine.sequential.reset_average();
    engine.parallel.reset_average();
    engine.frame = 0;
    engine.perf_stats.reset();
}
