//! Domain - obstacles, their grid, and engine configuration

pub mod bitmap;
pub mod config;
pub mod obstacle_grid;
pub mod obstacles;

pub use bitmap::ObstacleBitmap;
pub use config::{EngineConfig, PoolConfig, ThreadingConfig};
pub use obstacle_grid::{MergeReport, ObstacleGrid};
pub use obstacles::{ObstacleCell, ObstacleKind, OBSTACLE_NONE};
