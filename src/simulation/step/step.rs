use super::{FlowEngine, PerfTimer, PhysicsStepper};

pub(super) fn step(engine: &mut FlowEngine) {
    let perf_on = engine.perf_enabled;
    let step_start = if perf_on { Some(PerfTimer::start()) } else { None };

    // edits made through the grid directly still need their normals
    if perf_on {
        let t0 = PerfTimer::start();
        engine.obstacles.refresh_normals();
        engine.perf_stats.normals_ms = t0.elapsed_ms();
    } else {
        engine.obstacles.refresh_normals();
    }

    let dt = engine.state.time_step();
    let stepper: &mut dyn PhysicsStepper = if engine.use_parallel {
        &mut engine.parallel
    } else {
        &mut engine.sequential
    };
    stepper.update(&mut engine.state, &engine.obstacles, dt);
    let average_ms = stepper.average_step_ms();

    engine.frame += 1;

    if let Some(t) = step_start {
        let stats = &mut engine.perf_stats;
        stats.step_ms = t.elapsed_ms();
        stats.average_step_ms = average_ms;
        stats.frame = engine.frame as u32;
        stats.parallel = engine.use_parallel;
        stats.bands = if engine.use_parallel {
            engine.parallel.band_count(engine.obstacles.height()) as u32
        } else {
            1
        };
        stats.obstacle_count = engine.obstacles.obstacle_count() as u32;
        stats.pool_available = engine.pool.available() as u32;
        stats.grid_size = engine.obstacles.size() as u32;
        stats.dye_total = engine.state.current().sum();
    }
}
