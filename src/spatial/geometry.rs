//! Cell adjacency predicates
//!
//! Plain integer tests over the 8-neighborhood. "Horizontal" neighbors share a
//! row, "vertical" neighbors share a column; both are orthogonal.

/// Integer grid coordinate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn is_neighbor(&self, other: &Cell) -> bool {
        is_neighbor(self.x, self.y, other.x, other.y)
    }

    #[inline]
    pub fn is_orthogonal_neighbor(&self, other: &Cell) -> bool {
        is_orthogonal_neighbor(self.x, self.y, other.x, other.y)
    }

    #[inline]
    pub fn is_horizontal_neighbor(&self, other: &Cell) -> bool {
        is_horizontal_neighbor(self.x, self.y, other.x, other.y)
    }

    #[inline]
    pub fn is_vertical_neighbor(&self, other: &Cell) -> bool {
        is_vertical_neighbor(self.x, self.y, other.x, other.y)
    }

    #[inline]
    pub fn is_diagonal_neighbor(&self, other: &Cell) -> bool {
        is_diagonal_neighbor(self.x, self.y, other.x, other.y)
    }
}

/// Offsets of the 8-neighborhood, orthogonal ones first
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (0, -1),
    (0, 1),
    (-1, 0),
    (1, 0),
    (-1, -1),
    (1, -1),
    (-1, 1),
    (1, 1),
];

#[inline]
fn deltas(x1: i32, y1: i32, x2: i32, y2: i32) -> (i64, i64) {
    // i64 so extreme coordinates cannot overflow the subtraction
    (
        (x2 as i64 - x1 as i64).abs(),
        (y2 as i64 - y1 as i64).abs(),
    )
}

#[inline]
pub fn is_neighbor(x1: i32, y1: i32, x2: i32, y2: i32) -> bool {
    let (dx, dy) = deltas(x1, y1, x2, y2);
    dx.max(dy) == 1
}

#[inline]
pub fn is_orthogonal_neighbor(x1: i32, y1: i32, x2: i32, y2: i32) -> bool {
    let (dx, dy) = deltas(x1, y1, x2, y2);
    dx + dy == 1
}

#[inline]
pub fn is_horizontal_neighbor(x1: i32, y1: i32, x2: i32, y2: i32) -> bool {
    let (dx, dy) = deltas(x1, y1, x2, y2);
    dy == 0 && dx == 1
}

#[inline]
pub fn is_vertical_neighbor(x1: i32, y1: i32, x2: i32, y2: i32) -> bool {
    let (dx, dy) = deltas(x1, y1, x2, y2);
    dx == 0 && dy == 1
}

#[inline]
pub fn is_diagonal_neighbor(x1: i32, y1: i32, x2: i32, y2: i32) -> bool {
    let (dx, dy) = deltas(x1, y1, x2, y2);
    dx == 1 && dy == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_offset_in_the_ring_is_a_neighbor() {
        for &(dx, dy) in NEIGHBOR_OFFSETS.iter() {
            let (x1, y1) = (5, 7);
            let (x2, y2) = (x1 + dx, y1 + dy);
            assert!(is_neighbor(x1, y1, x2, y2));

            let diagonal = dx != 0 && dy != 0;
            assert_eq!(is_diagonal_neighbor(x1, y1, x2, y2), diagonal);
            assert_eq!(is_orthogonal_neighbor(x1, y1, x2, y2), !diagonal);
            assert_eq!(is_horizontal_neighbor(x1, y1, x2, y2), dy == 0);
            assert_eq!(is_vertical_neighbor(x1, y1, x2, y2), dx == 0);
        }
    }

    #[test]
    fn same_cell_and_distant_cells_are_not_neighbors() {
        assert!(!is_neighbor(3, 3, 3, 3));
        assert!(!is_orthogonal_neighbor(3, 3, 3, 3));
        assert!(!is_neighbor(3, 3, 5, 3));
        assert!(!is_diagonal_neighbor(0, 0, 2, 2));
        assert!(!is_horizontal_neighbor(0, 0, 0, 1));
        assert!(!is_vertical_neighbor(0, 0, 1, 0));
    }

    #[test]
    fn extreme_coordinates_do_not_wrap() {
        assert!(!is_neighbor(i32::MIN, 0, i32::MAX, 0));
        assert!(is_neighbor(i32::MAX - 1, 0, i32::MAX, 0));
    }

    #[test]
    fn cell_methods_match_free_functions() {
        let a = Cell::new(2, 2);
        let b = Cell::new(3, 3);
        let c = Cell::new(2, 3);
        assert!(a.is_neighbor(&b));
        assert!(a.is_diagonal_neighbor(&b));
        assert!(!a.is_orthogonal_neighbor(&b));
        assert!(a.is_vertical_neighbor(&c));
        assert!(b.is_horizontal_neighbor(&c));
    }
}
