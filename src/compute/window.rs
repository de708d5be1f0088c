//! Spatial window filter applied to join inputs before partitioning.

use crate::compute::geometry::{rectangle_intersects_window, within_window};
use spatio_grid_types::{
    Point, PointRecord, Rectangle, RectangleRecord, SpatialWindow, TaggedRecord,
};

/// Records that can be tested against a [`SpatialWindow`].
///
/// Points must lie inside the window; rectangles must overlap it. Both tests
/// are inclusive of the window's edges.
pub trait WindowFilter {
    fn within(&self, window: &SpatialWindow) -> bool;
}

impl WindowFilter for Point {
    fn within(&self, window: &SpatialWindow) -> bool {
        within_window(window, *self)
    }
}

impl WindowFilter for Rectangle {
    fn within(&self, window: &SpatialWindow) -> bool {
        rectangle_intersects_window(window, self)
    }
}

impl WindowFilter for PointRecord {
    fn within(&self, window: &SpatialWindow) -> bool {
        self.point.within(window)
    }
}

impl WindowFilter for RectangleRecord {
    fn within(&self, window: &SpatialWindow) -> bool {
        self.rect.within(window)
    }
}

impl WindowFilter for TaggedRecord {
    fn within(&self, window: &SpatialWindow) -> bool {
        match self {
            TaggedRecord::Point(record) => record.within(window),
            TaggedRecord::Rectangle(record) => record.within(window),
        }
    }
}
