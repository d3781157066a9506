//! Obstacle kinds and cells
//!
//! Kind codes are the ones exported to JS overlays; 0 means "no obstacle",
//! matching the empty sentinel of `ObstacleGrid::to_obstacle_type_codes`.

use serde::{Deserialize, Serialize};

use crate::spatial::geometry::{is_diagonal_neighbor, is_neighbor};
use crate::spatial::orientation::{orientation_between, NormalAccumulator};

pub const OBSTACLE_NONE: u8 = 0;

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ObstacleKind {
    /// Generic painted obstacle, the kind every freehand stroke produces
    Stick = 1,
    /// Placed by dedicated tools; freehand merges never touch it
    Slip = 2,
    /// Wind-tunnel wall on the outer ring
    Border = 3,
}

impl Default for ObstacleKind {
    fn default() -> Self {
        ObstacleKind::Stick
    }
}

impl ObstacleKind {
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(ObstacleKind::Stick),
            2 => Some(ObstacleKind::Slip),
            3 => Some(ObstacleKind::Border),
            _ => None,
        }
    }

    #[inline]
    pub fn is_default(self) -> bool {
        self == ObstacleKind::Stick
    }
}

/// One obstacle occupying a grid cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObstacleCell {
    pub x: u32,
    pub y: u32,
    pub kind: ObstacleKind,
    /// Also pushes the fluid in its diagonal neighbors
    pub diagonal: bool,
}

impl ObstacleCell {
    pub fn new(x: u32, y: u32, kind: ObstacleKind, diagonal: bool) -> Self {
        Self { x, y, kind, diagonal }
    }

    /// Default-typed cell as produced by paint strokes and bitmap import
    pub fn generic(x: u32, y: u32) -> Self {
        Self::new(x, y, ObstacleKind::Stick, true)
    }

    pub fn border(x: u32, y: u32) -> Self {
        Self::new(x, y, ObstacleKind::Border, false)
    }

    /// Whether this obstacle pushes on the fluid cell at `(fx, fy)`.
    pub fn touches(&self, fx: u32, fy: u32) -> bool {
        let (ox, oy, fx, fy) = (self.x as i32, self.y as i32, fx as i32, fy as i32);
        if !is_neighbor(ox, oy, fx, fy) {
            return false;
        }
        self.diagonal || !is_diagonal_neighbor(ox, oy, fx, fy)
    }

    /// Contribute the orientation pointing from this obstacle into the fluid
    /// cell at `(fx, fy)`. Cells it does not touch are left alone.
    pub fn apply_normal_to(&self, fx: u32, fy: u32, acc: &mut NormalAccumulator) {
        if self.touches(fx, fy) {
            acc.add_orientation(orientation_between(
                self.x as i32,
                self.y as i32,
                fx as i32,
                fy as i32,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    fn normal_from(obstacles: &[ObstacleCell], fx: u32, fy: u32) -> NormalAccumulator {
        let mut acc = NormalAccumulator::new();
        for o in obstacles {
            o.apply_normal_to(fx, fy, &mut acc);
        }
        acc
    }

    #[test]
    fn orthogonal_obstacles_point_into_the_fluid() {
        let above = normal_from(&[ObstacleCell::generic(5, 4)], 5, 5);
        assert!((above.orientation().unwrap() - FRAC_PI_2).abs() < 1e-9);

        let below = normal_from(&[ObstacleCell::generic(5, 6)], 5, 5);
        assert!((below.orientation().unwrap() - 3.0 * FRAC_PI_2).abs() < 1e-9);

        let left = normal_from(&[ObstacleCell::generic(4, 5)], 5, 5);
        assert!(left.orientation().unwrap().abs() < 1e-9);

        let right = normal_from(&[ObstacleCell::generic(6, 5)], 5, 5);
        assert!((right.orientation().unwrap() - PI).abs() < 1e-9);
    }

    #[test]
    fn diagonal_obstacle_gives_45_degree_normal() {
        let acc = normal_from(&[ObstacleCell::generic(4, 4)], 5, 5);
        assert!((acc.orientation().unwrap() - FRAC_PI_4).abs() < 1e-9);
    }

    #[test]
    fn non_diagonal_obstacle_ignores_corner_cells() {
        let acc = normal_from(&[ObstacleCell::border(4, 4)], 5, 5);
        assert!(acc.is_null_orientation());
        assert_eq!(acc.contributions(), 0);
    }

    #[test]
    fn opposing_and_surrounding_obstacles_cancel() {
        let pair = [ObstacleCell::generic(5, 4), ObstacleCell::generic(5, 6)];
        assert!(normal_from(&pair, 5, 5).is_null_orientation());

        let ring = [
            ObstacleCell::generic(5, 4),
            ObstacleCell::generic(5, 6),
            ObstacleCell::generic(4, 5),
            ObstacleCell::generic(6, 5),
        ];
        assert!(normal_from(&ring, 5, 5).is_null_orientation());
    }

    #[test]
    fn kind_codes_round_trip_and_zero_is_empty() {
        for kind in [ObstacleKind::Stick, ObstacleKind::Slip, ObstacleKind::Border] {
            assert_eq!(ObstacleKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(ObstacleKind::from_code(OBSTACLE_NONE), None);
        assert!(ObstacleKind::default().is_default());
    }
}
