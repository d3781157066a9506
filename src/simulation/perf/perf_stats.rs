use wasm_bindgen::prelude::*;

/// Snapshot of the last step, handed to JS by value
#[wasm_bindgen]
#[derive(Clone, Debug, Default)]
pub struct PerfStats {
    pub(super) step_ms: f64,
    pub(super) average_step_ms: f64,
    pub(super) normals_ms: f64,
    pub(super) merge_ms: f64,
    pub(super) frame: u32,
    pub(super) parallel: bool,
    pub(super) bands: u32,
    pub(super) obstacle_count: u32,
    pub(super) pool_available: u32,
    pub(super) grid_size: u32,
    pub(super) dye_total: f64,
}

impl PerfStats {
    pub(crate) fn reset(&mut self) {
        *self = PerfStats::default();
    }
}

#[wasm_bindgen]
impl PerfStats {
    #[wasm_bindgen(getter)]
    pub fn step_ms(&self) -> f64 { self.step_ms }
    #[wasm_bindgen(getter)]
    pub fn average_step_ms(&self) -> f64 { self.average_step_ms }
    #[wasm_bindgen(getter)]
    pub fn normals_ms(&self) -> f64 { self.normals_ms }
    #[wasm_bindgen(getter)]
    pub fn merge_ms(&self) -> f64 { self.merge_ms }
    #[wasm_bindgen(getter)]
    pub fn frame(&self) -> u32 { self.frame }
    #[wasm_bindgen(getter)]
    pub fn parallel(&self) -> bool { self.parallel }
    #[wasm_bindgen(getter)]
    pub fn bands(&self) -> u32 { self.bands }
    #[wasm_bindgen(getter)]
    pub fn obstacle_count(&self) -> u32 { self.obstacle_count }
    #[wasm_bindgen(getter)]
    pub fn pool_available(&self) -> u32 { self.pool_available }
    #[wasm_bindgen(getter)]
    pub fn grid_size(&self) -> u32 { self.grid_size }
    #[wasm_bindgen(getter)]
    pub fn dye_total(&self) -> f64 { self.dye_total }
}
