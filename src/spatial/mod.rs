//! Spatial primitives: cell adjacency and boundary orientations

pub mod geometry;
pub mod orientation;

pub use geometry::{Cell, NEIGHBOR_OFFSETS};
pub use orientation::{add_vector_orientation, normalize_angle, NormalAccumulator, EPSILON};
