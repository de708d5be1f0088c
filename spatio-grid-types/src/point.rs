use serde::{Deserialize, Serialize};
use std::fmt;

/// A point on the integer grid.
///
/// Points are plain values: they are parsed once and never mutated, only
/// copied into the emissions of a partitioner.
///
/// # Examples
///
/// ```
/// use spatio_grid_types::Point;
///
/// let a = Point::new(0, 0);
/// let b = Point::new(3, 4);
/// assert_eq!(a.distance(&b), 5.0);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    /// Create a point from its coordinates.
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f64 {
        use geo::Distance;
        geo::Euclidean.distance(geo::Point::<f64>::from(*self), geo::Point::<f64>::from(*other))
    }

    /// Coordinates as a float pair, the form used by the per-cell R-trees.
    pub fn to_array(self) -> [f64; 2] {
        [self.x as f64, self.y as f64]
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i64, i64)> for Point {
    fn from((x, y): (i64, i64)) -> Self {
        Self::new(x, y)
    }
}

impl From<Point> for geo::Point<f64> {
    fn from(point: Point) -> Self {
        geo::Point::new(point.x as f64, point.y as f64)
    }
}

impl From<Point> for geo::Coord<i64> {
    fn from(point: Point) -> Self {
        geo::coord! { x: point.x, y: point.y }
    }
}
