//! Obstacle grid - dense obstacle presence plus cached boundary normals
//!
//! Layout follows the other SoA grids: one `Option<ObstacleCell>` per cell in
//! row-major order, and two parallel `f32` arrays holding the unit normal of
//! every fluid cell (0, 0 where the accumulated normal is null).
//!
//! Edits only mark the normal cache dirty; the engine calls
//! `refresh_normals` between the edit and the next step so a step always
//! sees a fully merged grid.

use crate::foundation::{EngineError, EngineResult};
use crate::spatial::geometry::NEIGHBOR_OFFSETS;
use crate::spatial::orientation::NormalAccumulator;

use super::bitmap::ObstacleBitmap;
use super::obstacles::{ObstacleCell, ObstacleKind, OBSTACLE_NONE};

/// What a presence merge changed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub installed: u32,
    pub cleared: u32,
}

impl MergeReport {
    pub fn is_noop(&self) -> bool {
        self.installed == 0 && self.cleared == 0
    }
}

pub struct ObstacleGrid {
    width: u32,
    height: u32,
    size: usize,

    cells: Vec<Option<ObstacleCell>>,

    normal_x: Vec<f32>,
    normal_y: Vec<f32>,
    normals_dirty: bool,
}

impl ObstacleGrid {
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width as usize) * (height as usize);
        Self {
            width,
            height,
            size,
            cells: vec![None; size],
            normal_x: vec![0.0; size],
            normal_y: vec![0.0; size],
            normals_dirty: false,
        }
    }

    // === Dimensions ===
    #[inline]
    pub fn width(&self) -> u32 { self.width }

    #[inline]
    pub fn height(&self) -> u32 { self.height }

    #[inline]
    pub fn size(&self) -> usize { self.size }

    // === Index conversion ===
    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + x as usize
    }

    #[inline]
    pub fn coords(&self, idx: usize) -> (u32, u32) {
        let w = self.width as usize;
        ((idx % w) as u32, (idx / w) as u32)
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    fn checked_index(&self, x: i32, y: i32) -> EngineResult<usize> {
        if !self.in_bounds(x, y) {
            return Err(EngineError::IndexOutOfBounds {
                x: x as i64,
                y: y as i64,
                width: self.width,
                height: self.height,
            });
        }
        Ok(self.index(x as u32, y as u32))
    }

    fn checked_flat(&self, idx: usize) -> EngineResult<usize> {
        if idx >= self.size {
            return Err(EngineError::IndexOutOfRange { index: idx, len: self.size });
        }
        Ok(idx)
    }

    // === Cell access ===
    pub fn get_cell(&self, x: i32, y: i32) -> EngineResult<Option<ObstacleCell>> {
        let idx = self.checked_index(x, y)?;
        Ok(self.cells[idx])
    }

    pub fn get_cell_idx(&self, idx: usize) -> EngineResult<Option<ObstacleCell>> {
        let idx = self.checked_flat(idx)?;
        Ok(self.cells[idx])
    }

    /// Place or remove (`None`) an obstacle. The stored cell always carries
    /// the coordinates of the slot it lives in.
    pub fn set_cell(&mut self, x: i32, y: i32, cell: Option<ObstacleCell>) -> EngineResult<()> {
        let idx = self.checked_index(x, y)?;
        self.cells[idx] = cell.map(|c| ObstacleCell { x: x as u32, y: y as u32, ..c });
        self.normals_dirty = true;
        Ok(())
    }

    #[inline]
    pub fn is_obstacle_idx(&self, idx: usize) -> bool {
        self.cells[idx].is_some()
    }

    /// Out-of-grid coordinates count as free fluid
    #[inline]
    pub fn is_obstacle(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y) && self.cells[self.index(x as u32, y as u32)].is_some()
    }

    pub fn obstacle_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn clear(&mut self) {
        self.cells.fill(None);
        self.normal_x.fill(0.0);
        self.normal_y.fill(0.0);
        self.normals_dirty = false;
    }

    // === Border ring ===
    #[inline]
    pub fn is_border_index(&self, idx: usize) -> bool {
        let (x, y) = self.coords(idx);
        x == 0 || y == 0 || x + 1 == self.width || y + 1 == self.height
    }

    /// Fill the outer ring with non-diagonal border cells. Running it again
    /// rewrites the same ring.
    pub fn draw_wind_tunnel_borders(&mut self) {
        if self.size == 0 {
            return;
        }
        for idx in self.ring_indices() {
            let (x, y) = self.coords(idx);
            self.cells[idx] = Some(ObstacleCell::border(x, y));
        }
        self.normals_dirty = true;
    }

    /// Ring indices in ascending order, each once (also for 1-wide grids).
    fn ring_indices(&self) -> Vec<usize> {
        (0..self.size).filter(|&idx| self.is_border_index(idx)).collect()
    }

    /// Occupied ring cells, ascending
    pub fn border_indices(&self) -> Vec<usize> {
        self.ring_indices()
            .into_iter()
            .filter(|&idx| self.cells[idx].is_some())
            .collect()
    }

    // === Export ===
    pub fn to_obstacle_type_array(&self) -> Vec<Option<ObstacleKind>> {
        self.cells.iter().map(|c| c.map(|cell| cell.kind)).collect()
    }

    /// Kind codes for JS overlays, `OBSTACLE_NONE` where empty
    pub fn to_obstacle_type_codes(&self) -> Vec<u8> {
        self.cells
            .iter()
            .map(|c| c.map_or(OBSTACLE_NONE, |cell| cell.kind.code()))
            .collect()
    }

    pub fn to_presence_array(&self) -> Vec<u8> {
        self.cells.iter().map(|c| c.is_some() as u8).collect()
    }

    /// Rasterize presence (not kind) with `color`; everything else transparent.
    pub fn to_image(&self, color: u32) -> ObstacleBitmap {
        let mut bitmap = ObstacleBitmap::new(self.width, self.height);
        for (idx, cell) in self.cells.iter().enumerate() {
            if cell.is_some() {
                let (x, y) = self.coords(idx);
                bitmap.set(x, y, color);
            }
        }
        bitmap
    }

    /// Every non-transparent pixel becomes a generic obstacle.
    pub fn from_image(bitmap: &ObstacleBitmap) -> Self {
        let mut grid = Self::new(bitmap.width(), bitmap.height());
        for idx in 0..bitmap.pixels().len() {
            if bitmap.is_opaque_at(idx) {
                let (x, y) = grid.coords(idx);
                grid.cells[idx] = Some(ObstacleCell::generic(x, y));
            }
        }
        grid.normals_dirty = true;
        grid.refresh_normals();
        grid
    }

    // === Merge ===

    /// Fold an editor presence array (nonzero = obstacle) into the grid.
    ///
    /// - nonzero over an empty cell installs a generic `Stick` obstacle
    /// - nonzero over an occupied cell keeps the existing obstacle and kind
    /// - zero clears only generic obstacles; border and specially typed
    ///   cells survive
    ///
    /// The length is checked before anything is touched.
    pub fn merge_from_presence_array(&mut self, presence: &[u8]) -> EngineResult<MergeReport> {
        if presence.len() != self.size {
            return Err(EngineError::SizeMismatch {
                name: "presence array",
                expected: self.size,
                actual: presence.len(),
            });
        }

        let mut report = MergeReport::default();
        let width = self.width as usize;
        for (idx, (&bit, slot)) in presence.iter().zip(self.cells.iter_mut()).enumerate() {
            match (bit != 0, *slot) {
                (true, None) => {
                    *slot = Some(ObstacleCell::generic((idx % width) as u32, (idx / width) as u32));
                    report.installed += 1;
                }
                (false, Some(cell)) if cell.kind.is_default() => {
                    *slot = None;
                    report.cleared += 1;
                }
                _ => {}
            }
        }

        if !report.is_noop() {
            self.normals_dirty = true;
            log::debug!(
                "obstacle merge: +{} -{} ({} obstacles)",
                report.installed,
                report.cleared,
                self.obstacle_count()
            );
        }
        Ok(report)
    }

    // === Normals ===

    /// Accumulated normal of the cell at `(x, y)`; obstacle cells and
    /// out-of-grid coordinates give a null accumulator.
    pub fn normal_at(&self, x: i32, y: i32) -> NormalAccumulator {
        let mut acc = NormalAccumulator::new();
        if !self.in_bounds(x, y) || self.is_obstacle(x, y) {
            return acc;
        }
        for &(dx, dy) in NEIGHBOR_OFFSETS.iter() {
            let (nx, ny) = (x + dx, y + dy);
            if !self.in_bounds(nx, ny) {
                continue;
            }
            if let Some(obstacle) = self.cells[self.index(nx as u32, ny as u32)] {
                obstacle.apply_normal_to(x as u32, y as u32, &mut acc);
            }
        }
        acc
    }

    #[inline]
    pub fn normals_dirty(&self) -> bool {
        self.normals_dirty
    }

    /// Rebuild the normal cache if any edit happened since the last refresh.
    pub fn refresh_normals(&mut self) {
        if !self.normals_dirty {
            return;
        }
        for idx in 0..self.size {
            let (x, y) = self.coords(idx);
            let (nx, ny) = self
                .normal_at(x as i32, y as i32)
                .unit_vector()
                .map_or((0.0, 0.0), |(nx, ny)| (nx as f32, ny as f32));
            self.normal_x[idx] = nx;
            self.normal_y[idx] = ny;
        }
        self.normals_dirty = false;
    }

    /// Cached unit normal, (0, 0) for null
    #[inline]
    pub fn normal_vector_idx(&self, idx: usize) -> (f32, f32) {
        (self.normal_x[idx], self.normal_y[idx])
    }
}
