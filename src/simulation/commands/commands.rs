use crate::domain::{MergeReport, ObstacleBitmap, ObstacleCell, ObstacleGrid, ObstacleKind};
use crate::foundation::{EngineError, EngineResult};

use super::{FlowEngine, PerfTimer};

/// Merge and refresh normals so the next step sees the finished edit.
pub(super) fn merge_obstacles(engine: &mut FlowEngine, presence: &[u8]) -> EngineResult<MergeReport> {
    let timer = PerfTimer::start();
    let report = engine.obstacles.merge_from_presence_array(presence)?;
    engine.obstacles.refresh_normals();
    if engine.perf_enabled {
        engine.perf_stats.merge_ms = timer.elapsed_ms();
    }
    Ok(report)
}

/// Place an obstacle of `kind`, or remove whatever is there with `None`.
pub(super) fn set_obstacle(
    engine: &mut FlowEngine,
    x: i32,
    y: i32,
    kind: Option<ObstacleKind>,
) -> EngineResult<()> {
    // set_cell stamps the slot coordinates
    let cell = kind.map(|kind| match kind {
        ObstacleKind::Border => ObstacleCell::border(0, 0),
        _ => ObstacleCell::new(0, 0, kind, true),
    });
    engine.obstacles.set_cell(x, y, cell)?;
    engine.obstacles.refresh_normals();
    Ok(())
}

pub(super) fn clear_obstacles(engine: &mut FlowEngine) {
    engine.obstacles.clear();
}

pub(super) fn draw_wind_tunnel_borders(engine: &mut FlowEngine) {
    engine.obstacles.draw_wind_tunnel_borders();
    engine.obstacles.refresh_normals();
}

/// Replace all obstacles with the opaque pixels of `bitmap`. The bitmap
/// must match the grid; borders are redrawn when configured.
pub(super) fn load_obstacle_image(engine: &mut FlowEngine, bitmap: &ObstacleBitmap) -> EngineResult<()> {
    if (bitmap.width(), bitmap.height()) != engine.dimensions() {
        return Err(EngineError::DimensionMismatch {
            expected_width: engine.width(),
            expected_height: engine.height(),
            actual_width: bitmap.width(),
            actual_height: bitmap.height(),
        });
    }
    let mut obstacles = ObstacleGrid::from_image(bitmap);
    if engine.config.wind_tunnel_borders {
        obstacles.draw_wind_tunnel_borders();
        obstacles.refresh_normals();
    }
    log::debug!("loaded obstacle image: {} obstacles", obstacles.obstacle_count());
    engine.obstacles = obstacles;
    Ok(())
}
