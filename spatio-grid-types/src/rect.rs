use crate::point::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An axis-aligned rectangle anchored at its bottom-left corner.
///
/// The rectangle occupies `[x, x + width) x [y, y + height)`. Width and height
/// are never negative once a rectangle has been parsed.
///
/// # Examples
///
/// ```
/// use spatio_grid_types::Rectangle;
///
/// let rect = Rectangle::new(5, 5, 6, 20);
/// assert_eq!(rect.max_x(), 11);
/// assert_eq!(rect.max_y(), 25);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Rectangle {
    /// Left edge
    pub x: i64,
    /// Bottom edge
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Rectangle {
    /// Create a rectangle from its bottom-left corner and extent.
    pub const fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bottom-left corner.
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Right edge (exclusive).
    pub fn max_x(&self) -> i64 {
        self.x.saturating_add(self.width)
    }

    /// Top edge (exclusive).
    pub fn max_y(&self) -> i64 {
        self.y.saturating_add(self.height)
    }

    /// A rectangle with no area overlaps nothing and contains nothing.
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}) x [{}, {})",
            self.x,
            self.max_x(),
            self.y,
            self.max_y()
        )
    }
}

impl From<Rectangle> for geo::Rect<i64> {
    fn from(rect: Rectangle) -> Self {
        geo::Rect::new(
            geo::coord! { x: rect.x, y: rect.y },
            geo::coord! { x: rect.max_x(), y: rect.max_y() },
        )
    }
}

/// Inclusive bounding box restricting which records take part in a join.
///
/// Supplied once per run and read-only for its duration. Defaults to
/// `1,1,10000,10000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpatialWindow {
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
}

impl SpatialWindow {
    /// Create a window from its lower-left and upper-right corners (inclusive).
    pub const fn new(x1: i64, y1: i64, x2: i64, y2: i64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Whether the corners are ordered (`x1 <= x2` and `y1 <= y2`).
    pub fn is_valid(&self) -> bool {
        self.x1 <= self.x2 && self.y1 <= self.y2
    }
}

impl Default for SpatialWindow {
    fn default() -> Self {
        Self::new(1, 1, 10_000, 10_000)
    }
}

impl fmt::Display for SpatialWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.x1, self.y1, self.x2, self.y2)
    }
}
