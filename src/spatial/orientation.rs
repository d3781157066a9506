//! Orientations and boundary-normal accumulation
//!
//! Angles use the grid's own axis sense: 0 points to +x (right) and π/2 to
//! +y (down the rows). Normals are summed as unit vectors so the result does
//! not depend on the order neighbors are visited in.

use std::f64::consts::TAU;

/// Magnitude below which a vector sum counts as cancelled
pub const EPSILON: f64 = 1e-6;

/// Wrap any finite angle into `[0, 2π)`.
#[inline]
pub fn normalize_angle(theta: f64) -> f64 {
    let wrapped = theta.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Orientation of the vector pointing from `(from_x, from_y)` to `(to_x, to_y)`.
#[inline]
pub fn orientation_between(from_x: i32, from_y: i32, to_x: i32, to_y: i32) -> f64 {
    let dx = (to_x - from_x) as f64;
    let dy = (to_y - from_y) as f64;
    normalize_angle(dy.atan2(dx))
}

/// Merge two orientations without any state.
///
/// Returns the angle of the sum of both unit vectors, or NaN when they cancel.
pub fn add_vector_orientation(theta1: f64, theta2: f64) -> f64 {
    let x = theta1.cos() + theta2.cos();
    let y = theta1.sin() + theta2.sin();
    if x.hypot(y) < EPSILON {
        f64::NAN
    } else {
        normalize_angle(y.atan2(x))
    }
}

/// Resultant boundary normal of one fluid cell
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NormalAccumulator {
    sum_x: f64,
    sum_y: f64,
    contributions: u32,
}

impl NormalAccumulator {
    pub const fn new() -> Self {
        Self { sum_x: 0.0, sum_y: 0.0, contributions: 0 }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn add_orientation(&mut self, theta: f64) {
        self.sum_x += theta.cos();
        self.sum_y += theta.sin();
        self.contributions += 1;
    }

    /// Number of orientations merged since the last reset
    pub fn contributions(&self) -> u32 {
        self.contributions
    }

    /// True when nothing was added or the contributions cancelled out.
    pub fn is_null_orientation(&self) -> bool {
        self.contributions == 0 || self.sum_x.hypot(self.sum_y) < EPSILON
    }

    pub fn orientation(&self) -> Option<f64> {
        if self.is_null_orientation() {
            None
        } else {
            Some(normalize_angle(self.sum_y.atan2(self.sum_x)))
        }
    }

    /// Orientation with NaN standing in for the null state.
    pub fn orientation_or_nan(&self) -> f64 {
        self.orientation().unwrap_or(f64::NAN)
    }

    /// Unit vector of the resultant, if any.
    pub fn unit_vector(&self) -> Option<(f64, f64)> {
        self.orientation().map(|theta| (theta.cos(), theta.sin()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    const TOL: f64 = 1e-9;

    fn angle_eq(a: f64, b: f64) -> bool {
        let d = normalize_angle(a - b);
        d < TOL || TAU - d < TOL
    }

    #[test]
    fn normalize_wraps_into_half_open_range() {
        assert!((normalize_angle(-FRAC_PI_2) - 3.0 * FRAC_PI_2).abs() < TOL);
        assert!((normalize_angle(TAU) - 0.0).abs() < TOL);
        assert!((normalize_angle(5.0 * PI) - PI).abs() < TOL);
        assert!(normalize_angle(-1e-20) < TAU);
    }

    #[test]
    fn fresh_accumulator_is_null() {
        let acc = NormalAccumulator::new();
        assert!(acc.is_null_orientation());
        assert_eq!(acc.orientation(), None);
        assert!(acc.orientation_or_nan().is_nan());
    }

    #[test]
    fn single_orientation_is_taken_as_is() {
        let mut acc = NormalAccumulator::new();
        acc.add_orientation(FRAC_PI_4);
        assert!(angle_eq(acc.orientation().unwrap(), FRAC_PI_4));
    }

    #[test]
    fn adding_the_same_orientation_is_idempotent() {
        let mut acc = NormalAccumulator::new();
        acc.add_orientation(1.0);
        acc.add_orientation(1.0);
        assert!(angle_eq(acc.orientation().unwrap(), 1.0));
    }

    #[test]
    fn opposite_orientations_cancel_to_null() {
        let mut acc = NormalAccumulator::new();
        acc.add_orientation(0.3);
        acc.add_orientation(0.3 + PI);
        assert!(acc.is_null_orientation());
        assert!(add_vector_orientation(0.3, 0.3 + PI).is_nan());
    }

    #[test]
    fn cancellation_is_order_independent() {
        let samples = [0.0, 0.4, FRAC_PI_2, 2.0, PI, 4.1, 3.0 * FRAC_PI_2, 6.0];
        for &a in samples.iter() {
            for &b in samples.iter() {
                let mut fwd = NormalAccumulator::new();
                fwd.add_orientation(a);
                fwd.add_orientation(b);
                let mut rev = NormalAccumulator::new();
                rev.add_orientation(b);
                rev.add_orientation(a);
                assert_eq!(fwd.is_null_orientation(), rev.is_null_orientation());
                if let (Some(x), Some(y)) = (fwd.orientation(), rev.orientation()) {
                    assert!(angle_eq(x, y), "{} vs {} for ({}, {})", x, y, a, b);
                }
            }
        }
    }

    #[test]
    fn four_orthogonal_normals_cancel_in_any_order() {
        let down = FRAC_PI_2;
        let up = 3.0 * FRAC_PI_2;
        let right = 0.0;
        let left = PI;
        let orders = [
            [down, up, right, left],
            [down, right, up, left],
            [left, down, right, up],
            [right, left, up, down],
        ];
        for order in orders.iter() {
            let mut acc = NormalAccumulator::new();
            for &theta in order.iter() {
                acc.add_orientation(theta);
            }
            assert!(acc.is_null_orientation());
        }

        let mut pair = NormalAccumulator::new();
        pair.add_orientation(down);
        pair.add_orientation(up);
        assert!(pair.is_null_orientation());
        pair.reset();
        pair.add_orientation(left);
        pair.add_orientation(right);
        assert!(pair.is_null_orientation());
    }

    #[test]
    fn pure_merge_matches_accumulator() {
        let merged = add_vector_orientation(0.0, FRAC_PI_2);
        assert!(angle_eq(merged, FRAC_PI_4));
        let mut acc = NormalAccumulator::new();
        acc.add_orientation(0.0);
        acc.add_orientation(FRAC_PI_2);
        assert!(angle_eq(acc.orientation().unwrap(), merged));
    }

    #[test]
    fn contribution_after_cancellation_sets_the_resultant() {
        let mut acc = NormalAccumulator::new();
        acc.add_orientation(0.0);
        acc.add_orientation(PI);
        acc.add_orientation(FRAC_PI_2);
        assert!(angle_eq(acc.orientation().unwrap(), FRAC_PI_2));
    }

    #[test]
    fn orientation_between_follows_grid_axes() {
        assert!(angle_eq(orientation_between(0, 0, 1, 0), 0.0));
        assert!(angle_eq(orientation_between(0, 0, 0, 1), FRAC_PI_2));
        assert!(angle_eq(orientation_between(1, 0, 0, 0), PI));
        assert!(angle_eq(orientation_between(0, 1, 0, 0), 3.0 * FRAC_PI_2));
        assert!(angle_eq(orientation_between(0, 0, 1, 1), FRAC_PI_4));
    }
}
