use crate::foundation::{EngineError, EngineResult};

use super::perf_stats::PerfStats;
use super::{FlowEngine, FlowParams, ParallelStepper, SequentialStepper, ThreadingAdvice, ThreadingAdvisor};

pub(super) fn set_parallel(engine: &mut FlowEngine, enabled: bool) {
    if engine.use_parallel != enabled {
        log::debug!("stepper -> {}", if enabled { "parallel" } else { "sequential" });
    }
    engine.use_parallel = enabled;
    engine.config.threading.parallel = enabled;
}

pub(super) fn run_threading_advisor(engine: &mut FlowEngine) -> ThreadingAdvice {
    engine.obstacles.refresh_normals();
    let params = engine.sequential.params();
    let advisor = ThreadingAdvisor::from_config(&engine.config.threading);
    let advice = advisor.compare(
        SequentialStepper::new(params),
        ParallelStepper::new(params, engine.config.threading.bands),
        &engine.obstacles,
        &engine.pool,
        engine.state.time_step(),
    );
    set_parallel(engine, advice.use_parallel);
    advice
}

pub(super) fn set_flow_params(engine: &mut FlowEngine, params: FlowParams) -> EngineResult<()> {
    let mut config = engine.config.clone();
    config.inflow_speed = params.inflow_speed;
    config.diffusion = params.diffusion;
    config.inlet_fraction = params.inlet_fraction;
    if !params.inflow_speed.is_finite() {
        return Err(EngineError::invalid_config("inflow speed must be finite"));
    }
    config.validate()?;

    engine.sequential.set_params(params);
    engine.parallel.set_params(params);
    engine.config = config;
    Ok(())
}

pub(super) fn enable_perf_metrics(engine: &mut FlowEngine, enabled: bool) {
    engine.perf_enabled = enabled;
    if !enabled {
        engine.perf_stats.reset();
    }
}

pub(super) fn get_perf_stats(engine: &FlowEngine) -> PerfStats {
    engine.perf_stats.clone()
}
