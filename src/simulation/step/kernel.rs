//! Per-row flow update shared by both steppers
//!
//! The grid holds dye concentration in 0..=1 carried by a uniform wind along
//! +x. Every fluid cell starts from the free-stream velocity; where the cell
//! has a boundary normal the component pointing into the obstacle is
//! removed, which bends the flow around it. The new value is a
//! semi-Lagrangian back-trace into the previous grid, blended towards the
//! 4-neighbor mean by `diffusion`. Obstacle cells hold 0 and the inlet band
//! on the left edge is pinned to 1. A back-trace that leaves the grid
//! upstream of column 1 reads the inflow itself: 1 inside the inlet band,
//! 0 outside it. That keeps a step longer than one cell from skipping
//! columns.
//!
//! A row only reads the previous grid and the obstacle grid, so any split of
//! rows across threads produces bit-identical output.

use crate::domain::ObstacleGrid;
use crate::pool::Matrix;

use super::FlowParams;

/// Values derived once per step
#[derive(Clone, Copy, Debug)]
pub(crate) struct RowContext {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) shift: f32,
    pub(crate) diffusion: f32,
    pub(crate) inlet_lo: u32,
    pub(crate) inlet_hi: u32,
}

impl RowContext {
    pub(crate) fn new(params: &FlowParams, width: u32, height: u32, dt: f64) -> Self {
        let band = (height as f32 * params.inlet_fraction).round() as u32;
        let inlet_lo = (height - band.min(height)) / 2;
        Self {
            width,
            height,
            shift: (params.inflow_speed as f64 * dt) as f32,
            diffusion: params.diffusion,
            inlet_lo,
            inlet_hi: inlet_lo + band.min(height),
        }
    }

    #[inline]
    fn in_inlet_band(&self, y: u32) -> bool {
        y >= self.inlet_lo && y < self.inlet_hi
    }

    #[inline]
    fn is_inlet(&self, x: u32, y: u32) -> bool {
        x <= 1 && self.in_inlet_band(y)
    }

    /// Concentration entering through the upstream edge at source row `sy`
    #[inline]
    fn inflow_at(&self, sy: f32) -> f32 {
        let row = sy.round().clamp(0.0, (self.height - 1) as f32) as u32;
        if self.in_inlet_band(row) { 1.0 } else { 0.0 }
    }
}

/// Bilinear sample with coordinates clamped to the grid
#[inline]
fn sample(prev: &[f32], ctx: &RowContext, sx: f32, sy: f32) -> f32 {
    let max_x = (ctx.width - 1) as f32;
    let max_y = (ctx.height - 1) as f32;
    let sx = sx.clamp(0.0, max_x);
    let sy = sy.clamp(0.0, max_y);

    let x0 = sx.floor() as u32;
    let y0 = sy.floor() as u32;
    let x1 = (x0 + 1).min(ctx.width - 1);
    let y1 = (y0 + 1).min(ctx.height - 1);
    let tx = sx - x0 as f32;
    let ty = sy - y0 as f32;

    let w = ctx.width as usize;
    let at = |x: u32, y: u32| prev[(y as usize) * w + x as usize];
    let top = at(x0, y0) * (1.0 - tx) + at(x1, y0) * tx;
    let bottom = at(x0, y1) * (1.0 - tx) + at(x1, y1) * tx;
    top * (1.0 - ty) + bottom * ty
}

/// Mean of the in-grid fluid 4-neighbors; the cell itself when it has none
#[inline]
fn neighbor_mean(prev: &[f32], obstacles: &ObstacleGrid, ctx: &RowContext, x: u32, y: u32) -> f32 {
    let w = ctx.width as usize;
    let here = prev[(y as usize) * w + x as usize];
    let mut sum = 0.0f32;
    let mut count = 0u32;
    for &(dx, dy) in [(0i32, -1i32), (0, 1), (-1, 0), (1, 0)].iter() {
        let nx = x as i32 + dx;
        let ny = y as i32 + dy;
        if !obstacles.in_bounds(nx, ny) || obstacles.is_obstacle(nx, ny) {
            continue;
        }
        sum += prev[(ny as usize) * w + nx as usize];
        count += 1;
    }
    if count == 0 { here } else { sum / count as f32 }
}

/// Fill output row `y` from the previous grid.
pub(crate) fn update_row(
    y: u32,
    prev: &Matrix,
    obstacles: &ObstacleGrid,
    ctx: &RowContext,
    out_row: &mut [f32],
) {
    debug_assert_eq!(out_row.len(), ctx.width as usize);
    let prev = prev.as_slice();
    let row_start = (y as usize) * (ctx.width as usize);

    for (x, out) in out_row.iter_mut().enumerate() {
        let x = x as u32;
        let idx = row_start + x as usize;

        if obstacles.is_obstacle_idx(idx) {
            *out = 0.0;
            continue;
        }
        if ctx.is_inlet(x, y) {
            *out = 1.0;
            continue;
        }

        let (vx, vy) = deflected_shift(obstacles, ctx, idx);
        let (sx, sy) = (x as f32 - vx, y as f32 - vy);
        let advected = if sx < 1.0 {
            ctx.inflow_at(sy)
        } else {
            sample(prev, ctx, sx, sy)
        };
        let mean = neighbor_mean(prev, obstacles, ctx, x, y);
        let value = advected + (mean - advected) * ctx.diffusion;
        *out = value.clamp(0.0, 1.0);
    }
}

/// Per-step displacement of the cell at `idx` after removing the component
/// that points into an adjacent obstacle
#[inline]
pub(crate) fn deflected_shift(obstacles: &ObstacleGrid, ctx: &RowContext, idx: usize) -> (f32, f32) {
    let (nx, ny) = obstacles.normal_vector_idx(idx);
    let (mut vx, mut vy) = (ctx.shift, 0.0f32);
    let into_wall = vx * nx + vy * ny;
    if into_wall < 0.0 {
        vx -= into_wall * nx;
        vy -= into_wall * ny;
    }
    (vx, vy)
}
