use crate::point::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A square cell of a uniform grid, used as the grouping key.
///
/// The cell covers `[min_x, min_x + size) x [min_y, min_y + size)`. Corners are
/// multiples of `size`, so cells of one size tile the plane without gaps or
/// overlap, and the cell of a coordinate is a pure function of that
/// coordinate and the size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCell {
    pub min_x: i64,
    pub min_y: i64,
    pub size: i64,
}

impl GridCell {
    /// The cell of side `size` whose bottom-left corner is `(min_x, min_y)`.
    ///
    /// The corner is not re-aligned; use [`GridCell::containing`] to derive a
    /// cell from an arbitrary coordinate.
    pub const fn new(min_x: i64, min_y: i64, size: i64) -> Self {
        Self {
            min_x,
            min_y,
            size,
        }
    }

    /// The single cell of side `size` containing `point`.
    ///
    /// Coordinates are floored toward negative infinity, so `(-1, -1)` lands in
    /// the cell starting at `(-size, -size)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use spatio_grid_types::{GridCell, Point};
    ///
    /// assert_eq!(GridCell::containing(10, Point::new(16, 402)), GridCell::new(10, 400, 10));
    /// assert_eq!(GridCell::containing(10, Point::new(-1, 0)), GridCell::new(-10, 0, 10));
    /// ```
    pub fn containing(size: i64, point: Point) -> Self {
        debug_assert!(size > 0, "cell size must be positive");
        Self::new(floor_to(point.x, size), floor_to(point.y, size), size)
    }

    /// Right edge (exclusive).
    pub fn max_x(&self) -> i64 {
        self.min_x.saturating_add(self.size)
    }

    /// Top edge (exclusive).
    pub fn max_y(&self) -> i64 {
        self.min_y.saturating_add(self.size)
    }

    /// Half-open membership: the cell owns its bottom and left edges.
    pub fn contains(&self, point: Point) -> bool {
        self.spans(self.min_x, point.x) && self.spans(self.min_y, point.y)
    }

    fn spans(&self, min: i64, value: i64) -> bool {
        value >= min && value.abs_diff(min) < self.size.unsigned_abs()
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.min_x,
            self.min_y,
            self.max_x(),
            self.max_y()
        )
    }
}

/// Floor `value` to a multiple of `size`.
///
/// Values whose multiple would fall below `i64::MIN` share the corner
/// `i64::MIN`.
///
/// ```
/// use spatio_grid_types::cell::floor_to;
///
/// assert_eq!(floor_to(-1, 10), -10);
/// assert_eq!(floor_to(i64::MIN, 10), i64::MIN);
/// ```
pub fn floor_to(value: i64, size: i64) -> i64 {
    value.div_euclid(size).saturating_mul(size)
}

/// The finite square domain `[0, max_coordinate)` in both axes.
///
/// Circle footprints are clipped to this domain: cells outside it are never
/// emitted. Data that extends past the bound has incomplete neighbor sets
/// near the edge, so the bound must cover the dataset's extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridDomain {
    pub max_coordinate: i64,
}

impl GridDomain {
    pub const DEFAULT_MAX_COORDINATE: i64 = 10_000;

    pub const fn new(max_coordinate: i64) -> Self {
        Self { max_coordinate }
    }

    /// Whether the cell's corner lies inside the domain.
    pub fn contains_cell(&self, cell: &GridCell) -> bool {
        cell.min_x >= 0
            && cell.min_y >= 0
            && cell.min_x < self.max_coordinate
            && cell.min_y < self.max_coordinate
    }
}

impl Default for GridDomain {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_COORDINATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_at_i64_bounds() {
        let low = GridCell::containing(10, Point::new(i64::MIN, i64::MIN + 3));
        assert_eq!(low, GridCell::new(i64::MIN, i64::MIN, 10));
        assert!(low.contains(Point::new(i64::MIN, i64::MIN + 3)));

        let high = GridCell::containing(10, Point::new(i64::MAX, i64::MAX));
        assert_eq!(high.min_x, 9_223_372_036_854_775_800);
        assert!(high.contains(Point::new(i64::MAX, i64::MAX)));
        assert!(!high.contains(Point::new(i64::MAX - 8, i64::MAX)));
    }

    #[test]
    fn test_cell_containing() {
        assert_eq!(
            GridCell::containing(100, Point::new(5, 5)),
            GridCell::new(0, 0, 100)
        );
        assert_eq!(
            GridCell::containing(100, Point::new(100, 199)),
            GridCell::new(100, 100, 100)
        );
        assert_eq!(
            GridCell::containing(10, Point::new(-10, -11)),
            GridCell::new(-10, -20, 10)
        );
    }

    #[test]
    fn test_cell_half_open_membership() {
        let cell = GridCell::new(0, 0, 10);
        assert!(cell.contains(Point::new(0, 0)));
        assert!(cell.contains(Point::new(9, 9)));
        assert!(!cell.contains(Point::new(10, 5)));
        assert!(!cell.contains(Point::new(5, 10)));
        assert!(!cell.contains(Point::new(-1, 5)));
    }

    #[test]
    fn test_cell_key_format() {
        let cell = GridCell::new(100, 200, 100);
        assert_eq!(cell.to_string(), "100,200,200,300");
    }

    #[test]
    fn test_floor_to() {
        assert_eq!(floor_to(16, 10), 10);
        assert_eq!(floor_to(10, 10), 10);
        assert_eq!(floor_to(9, 10), 0);
        assert_eq!(floor_to(-1, 10), -10);
        assert_eq!(floor_to(-10, 10), -10);
    }

    #[test]
    fn test_domain_contains_cell() {
        let domain = GridDomain::default();
        assert_eq!(domain.max_coordinate, 10_000);
        assert!(domain.contains_cell(&GridCell::new(0, 0, 100)));
        assert!(domain.contains_cell(&GridCell::new(9_900, 9_900, 100)));
        assert!(!domain.contains_cell(&GridCell::new(10_000, 0, 100)));
        assert!(!domain.contains_cell(&GridCell::new(-100, 0, 100)));
    }
}
