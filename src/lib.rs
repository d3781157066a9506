//! WindTunnel Engine - obstacle-aware 2D flow simulation in WASM
//!
//! Architecture:
//! - foundation/  - errors and the console log sink
//! - spatial/     - cell adjacency and boundary orientations
//! - domain/      - obstacles, their grid, bitmaps and configuration
//! - pool/        - pooled numeric grids
//! - simulation/  - state, steppers, threading advisor, engine and JS facade

pub mod foundation;
pub mod spatial;
pub mod domain;
pub mod pool;
pub mod simulation;

use wasm_bindgen::prelude::*;

// Re-export wasm-bindgen-rayon for thread pool initialization
#[cfg(all(feature = "parallel", target_arch = "wasm32"))]
pub use wasm_bindgen_rayon::init_thread_pool;

// Better error messages in debug mode
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize the engine
#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();

    foundation::logging::init_console_logger();
    log::info!("WindTunnel engine {} initialized", env!("CARGO_PKG_VERSION"));
}

/// Get engine version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// Re-export main types
pub use domain::{EngineConfig, MergeReport, ObstacleBitmap, ObstacleCell, ObstacleGrid, ObstacleKind};
pub use foundation::{EngineError, EngineResult};
pub use pool::{Matrix, MatrixPool, PoolBounds, ResourcePool};
pub use simulation::{
    FlowEngine, FlowParams, ParallelStepper, PerfStats, PhysicsStepper, SequentialStepper,
    SimulationState, ThreadingAdvice, ThreadingAdvisor, WindTunnel,
};
#[cfg(not(target_arch = "wasm32"))]
pub use simulation::SimulationRunner;
pub use spatial::{NormalAccumulator, EPSILON};

// Obstacle kind codes for JS
#[wasm_bindgen]
pub fn obstacle_none() -> u8 { domain::OBSTACLE_NONE }
#[wasm_bindgen]
pub fn obstacle_stick() -> u8 { ObstacleKind::Stick.code() }
#[wasm_bindgen]
pub fn obstacle_slip() -> u8 { ObstacleKind::Slip.code() }
#[wasm_bindgen]
pub fn obstacle_border() -> u8 { ObstacleKind::Border.code() }
