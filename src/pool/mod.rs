//! Pooled buffers feeding the stepper without per-step allocation

mod matrix;
mod matrix_pool;
mod resource_pool;

pub use matrix::Matrix;
pub use matrix_pool::MatrixPool;
pub use resource_pool::{MaintenanceReport, PoolBounds, ResourcePool};
