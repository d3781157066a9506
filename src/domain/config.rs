//! Engine configuration
//!
//! Loaded from JSON the same way content bundles are; every field has a
//! default so hosts only send what they change.

use serde::{Deserialize, Serialize};

use crate::foundation::{EngineError, EngineResult};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub width: u32,
    pub height: u32,
    /// Seconds of simulated time per step
    pub time_step: f64,
    /// Free-stream speed along +x, cells per second
    pub inflow_speed: f32,
    /// Blend factor towards the 4-neighbor mean per step, 0..=1
    pub diffusion: f32,
    /// Fraction of the inlet column (centred) that emits dye
    pub inlet_fraction: f32,
    pub wind_tunnel_borders: bool,
    pub pool: PoolConfig,
    pub threading: ThreadingConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PoolConfig {
    pub min_idle: usize,
    pub max_idle: usize,
    pub maintenance_interval_ms: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThreadingConfig {
    /// Start with the parallel stepper
    pub parallel: bool,
    /// Row bands per parallel step; 0 picks one per worker thread
    pub bands: usize,
    pub advisor_iterations: u32,
    /// Relative speed-up parallel must beat to be recommended
    pub advisor_tolerance: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: 256,
            height: 128,
            time_step: 1.0 / 60.0,
            inflow_speed: 24.0,
            diffusion: 0.05,
            inlet_fraction: 0.5,
            wind_tunnel_borders: true,
            pool: PoolConfig::default(),
            threading: ThreadingConfig::default(),
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            min_idle: 2,
            max_idle: 8,
            maintenance_interval_ms: 500,
        }
    }
}

impl Default for ThreadingConfig {
    fn default() -> Self {
        Self {
            parallel: false,
            bands: 0,
            advisor_iterations: 30,
            advisor_tolerance: 0.05,
        }
    }
}

impl EngineConfig {
    pub fn with_size(width: u32, height: u32) -> Self {
        Self { width, height, ..Self::default() }
    }

    pub fn from_json(json: &str) -> EngineResult<Self> {
        let config: EngineConfig =
            serde_json::from_str(json).map_err(|e| EngineError::invalid_config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(EngineError::invalid_config(format!(
                "grid must be at least 1x1, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            return Err(EngineError::invalid_config(format!(
                "time step must be positive, got {}",
                self.time_step
            )));
        }
        if !(0.0..=1.0).contains(&self.diffusion) {
            return Err(EngineError::invalid_config(format!(
                "diffusion must be within 0..=1, got {}",
                self.diffusion
            )));
        }
        if !(0.0..=1.0).contains(&self.inlet_fraction) {
            return Err(EngineError::invalid_config(format!(
                "inlet fraction must be within 0..=1, got {}",
                self.inlet_fraction
            )));
        }
        if self.pool.min_idle > self.pool.max_idle {
            return Err(EngineError::invalid_config(format!(
                "pool min {} exceeds max {}",
                self.pool.min_idle, self.pool.max_idle
            )));
        }
        if !(0.0..1.0).contains(&self.threading.advisor_tolerance) {
            return Err(EngineError::invalid_config(format!(
                "advisor tolerance must be within 0..1, got {}",
                self.threading.advisor_tolerance
            )));
        }
        Ok(())
    }
}
