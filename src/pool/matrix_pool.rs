//! Pool of numeric grids of one fixed size
//!
//! Grids come back zeroed-or-not; callers overwrite every cell, so release
//! does not clear. A grid of any other size is refused: the pool is left
//! as it was and the grid is dropped.

use std::time::Duration;

use crate::domain::config::PoolConfig;
use crate::foundation::{EngineError, EngineResult};

use super::matrix::Matrix;
use super::resource_pool::{MaintenanceReport, PoolBounds, ResourcePool};

pub struct MatrixPool {
    width: u32,
    height: u32,
    inner: ResourcePool<Matrix>,
}

impl MatrixPool {
    pub fn new(width: u32, height: u32, bounds: PoolBounds, interval: Duration) -> Self {
        let inner = ResourcePool::new(move || Matrix::new(width, height), bounds, interval);
        log::debug!(
            "matrix pool {}x{} (idle {}..={}, maintenance {:?})",
            width,
            height,
            bounds.min_idle,
            bounds.max_idle,
            interval
        );
        Self { width, height, inner }
    }

    pub fn from_config(width: u32, height: u32, config: &PoolConfig) -> Self {
        Self::new(
            width,
            height,
            PoolBounds::new(config.min_idle, config.max_idle),
            Duration::from_millis(config.maintenance_interval_ms),
        )
    }

    /// Pool without a maintenance thread (scratch and test use)
    pub fn unmanaged(width: u32, height: u32, bounds: PoolBounds) -> Self {
        Self::new(width, height, bounds, Duration::ZERO)
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Never blocks; allocates when no grid is idle.
    pub fn borrow(&self) -> Matrix {
        self.inner.borrow()
    }

    /// Hand a grid back. A mismatched grid is dropped with an error and the
    /// pool is left as it was.
    pub fn release(&self, grid: Matrix) -> EngineResult<()> {
        if grid.dimensions() != self.dimensions() {
            return Err(EngineError::DimensionMismatch {
                expected_width: self.width,
                expected_height: self.height,
                actual_width: grid.width(),
                actual_height: grid.height(),
            });
        }
        self.inner.release(grid);
        Ok(())
    }

    pub fn available(&self) -> usize {
        self.inner.available()
    }

    pub fn maintain(&self) -> MaintenanceReport {
        self.inner.maintain()
    }

    pub fn warm_up(&self, count: usize) {
        self.inner.warm_up(count);
    }

    pub fn is_maintained(&self) -> bool {
        self.inner.is_maintained()
    }
}
