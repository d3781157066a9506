//! Current grid, render hand-off and pool bookkeeping
//!
//! Every grid held here came from `pool`. A step borrows a working grid,
//! fills it from `current`, and publishes it: the new grid becomes current,
//! the old one goes back to the pool, and a copy of the new grid becomes the
//! render grid. A render grid nobody polled before the next publish is
//! recycled, so the renderer only ever sees the latest completed step.

use std::sync::Arc;

use crate::foundation::EngineResult;
use crate::pool::{Matrix, MatrixPool};

pub struct SimulationState {
    pool: Arc<MatrixPool>,
    current: Matrix,
    ready: Option<Matrix>,
    time_step: f64,
    completed_steps: u64,
}

impl SimulationState {
    pub fn new(pool: Arc<MatrixPool>, time_step: f64) -> Self {
        let mut current = pool.borrow();
        current.fill(0.0);
        Self {
            pool,
            current,
            ready: None,
            time_step,
            completed_steps: 0,
        }
    }

    #[inline]
    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        self.pool.dimensions()
    }

    /// Grid of the last completed step (zeros before the first one)
    #[inline]
    pub fn current(&self) -> &Matrix {
        &self.current
    }

    #[inline]
    pub fn completed_steps(&self) -> u64 {
        self.completed_steps
    }

    pub fn pool(&self) -> &Arc<MatrixPool> {
        &self.pool
    }

    /// Grid for the next step to write into. Contents are unspecified.
    pub fn borrow_working(&self) -> Matrix {
        self.pool.borrow()
    }

    /// Install a fully written working grid as the latest step.
    pub fn publish(&mut self, working: Matrix) {
        debug_assert_eq!(working.dimensions(), self.dimensions());
        let previous = std::mem::replace(&mut self.current, working);
        self.recycle(previous);

        let mut snapshot = self.pool.borrow();
        snapshot.copy_from(&self.current);
        if let Some(stale) = self.ready.replace(snapshot) {
            self.recycle(stale);
        }
        self.completed_steps += 1;
    }

    /// Take the latest completed grid, if one arrived since the last poll.
    pub fn poll_render_grid(&mut self) -> Option<Matrix> {
        self.ready.take()
    }

    /// Hand a polled grid back; a grid of another size is refused.
    pub fn return_grid_to_pool(&self, grid: Matrix) -> EngineResult<()> {
        self.pool.release(grid)
    }

    /// Zero the field and drop any pending render grid.
    pub fn reset(&mut self) {
        self.current.fill(0.0);
        if let Some(stale) = self.ready.take() {
            self.recycle(stale);
        }
        self.completed_steps = 0;
    }

    fn recycle(&self, grid: Matrix) {
        // grids held here always match the pool
        if let Err(e) = self.pool.release(grid) {
            log::warn!("dropping foreign grid: {}", e);
        }
    }
}

impl Drop for SimulationState {
    fn drop(&mut self) {
        let current = std::mem::replace(&mut self.current, Matrix::new(0, 0));
        self.recycle(current);
        if let Some(ready) = self.ready.take() {
            self.recycle(ready);
        }
    }
}
