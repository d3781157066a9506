use wasm_bindgen::prelude::*;

use crate::domain::ObstacleBitmap;
use crate::foundation::EngineError;

use super::perf_stats::PerfStats;
use super::{FlowEngine, FlowParams};

fn to_js(e: EngineError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Result of a threading advisor run, for JS
#[wasm_bindgen]
#[derive(Clone, Copy)]
pub struct AdviceReport {
    sequential_ms: f64,
    parallel_ms: f64,
    use_parallel: bool,
}

#[wasm_bindgen]
impl AdviceReport {
    #[wasm_bindgen(getter)]
    pub fn sequential_ms(&self) -> f64 { self.sequential_ms }
    #[wasm_bindgen(getter)]
    pub fn parallel_ms(&self) -> f64 { self.parallel_ms }
    #[wasm_bindgen(getter)]
    pub fn use_parallel(&self) -> bool { self.use_parallel }
}

/// JS handle to a [`FlowEngine`]
#[wasm_bindgen]
pub struct WindTunnel {
    core: FlowEngine,
}

#[wasm_bindgen]
impl WindTunnel {
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32) -> Result<WindTunnel, JsValue> {
        let core = FlowEngine::with_size(width, height).map_err(to_js)?;
        Ok(Self { core })
    }

    /// Build from an `EngineConfig` JSON document.
    #[wasm_bindgen(js_name = fromConfigJson)]
    pub fn from_config_json(json: String) -> Result<WindTunnel, JsValue> {
        let core = FlowEngine::from_json(&json).map_err(to_js)?;
        Ok(Self { core })
    }

    #[wasm_bindgen(js_name = configJson)]
    pub fn config_json(&self) -> String {
        self.core.config().to_json()
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 { self.core.width() }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 { self.core.height() }

    #[wasm_bindgen(getter)]
    pub fn frame(&self) -> u64 { self.core.frame() }

    // === Lifecycle ===

    pub fn reinitialize(&mut self, width: u32, height: u32) -> Result<(), JsValue> {
        self.core.reinitialize(width, height).map_err(to_js)
    }

    #[wasm_bindgen(js_name = softReinitialize)]
    pub fn soft_reinitialize(&mut self) {
        self.core.soft_reinitialize();
    }

    // === Obstacles ===

    /// Merge a painted mask (one byte per cell, nonzero = obstacle).
    #[wasm_bindgen(js_name = mergePresence)]
    pub fn merge_presence(&mut self, presence: &[u8]) -> Result<(), JsValue> {
        self.core.merge_obstacles(presence).map(|_| ()).map_err(to_js)
    }

    #[wasm_bindgen(js_name = clearObstacles)]
    pub fn clear_obstacles(&mut self) {
        self.core.clear_obstacles();
    }

    #[wasm_bindgen(js_name = drawWindTunnelBorders)]
    pub fn draw_wind_tunnel_borders(&mut self) {
        self.core.draw_wind_tunnel_borders();
    }

    /// Kind code per cell (0 = none, 1 = stick, 2 = slip, 3 = border)
    #[wasm_bindgen(js_name = obstacleTypes)]
    pub fn obstacle_types(&self) -> Vec<u8> {
        self.core.obstacles().to_obstacle_type_codes()
    }

    #[wasm_bindgen(js_name = borderIndices)]
    pub fn border_indices(&self) -> Vec<u32> {
        self.core.border_indices().into_iter().map(|i| i as u32).collect()
    }

    /// Packed ABGR pixels, `color` where an obstacle is, 0 elsewhere
    #[wasm_bindgen(js_name = toImage)]
    pub fn to_image(&self, color: u32) -> Vec<u32> {
        self.core.obstacle_image(color).into_pixels()
    }

    #[wasm_bindgen(js_name = loadImage)]
    pub fn load_image(&mut self, width: u32, height: u32, pixels: Vec<u32>) -> Result<(), JsValue> {
        let bitmap = ObstacleBitmap::from_pixels(width, height, pixels).map_err(to_js)?;
        self.core.load_obstacle_image(&bitmap).map_err(to_js)
    }

    // === Simulation ===

    pub fn step(&mut self) {
        self.core.step();
    }

    /// Latest completed grid, or `undefined` if none since the last poll.
    /// The pooled grid is recycled once copied out.
    #[wasm_bindgen(js_name = pollRenderGrid)]
    pub fn poll_render_grid(&mut self) -> Option<Vec<f32>> {
        let grid = self.core.poll_render_grid()?;
        let values = grid.as_slice().to_vec();
        if let Err(e) = self.core.return_grid_to_pool(grid) {
            log::warn!("render grid not recycled: {}", e);
        }
        Some(values)
    }

    #[wasm_bindgen(js_name = setFlow)]
    pub fn set_flow(&mut self, inflow_speed: f32, diffusion: f32, inlet_fraction: f32) -> Result<(), JsValue> {
        self.core
            .set_flow_params(FlowParams { inflow_speed, diffusion, inlet_fraction })
            .map_err(to_js)
    }

    // === Threading ===

    #[wasm_bindgen(js_name = setParallel)]
    pub fn set_parallel(&mut self, enabled: bool) {
        self.core.set_parallel(enabled);
    }

    #[wasm_bindgen(getter)]
    pub fn parallel(&self) -> bool { self.core.is_parallel() }

    #[wasm_bindgen(js_name = runThreadingAdvisor)]
    pub fn run_threading_advisor(&mut self) -> AdviceReport {
        let advice = self.core.run_threading_advisor();
        AdviceReport {
            sequential_ms: advice.sequential_ms,
            parallel_ms: advice.parallel_ms,
            use_parallel: advice.use_parallel,
        }
    }

    // === Perf ===

    /// Enable or disable per-step perf metrics
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        self.core.enable_perf_metrics(enabled);
    }

    /// Last step perf snapshot (zeros when perf disabled)
    pub fn get_perf_stats(&self) -> PerfStats {
        self.core.get_perf_stats()
    }
}
