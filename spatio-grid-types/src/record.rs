//! Identified records and the values exchanged between partitioners and evaluators.

use crate::cell::GridCell;
use crate::point::Point;
use crate::rect::Rectangle;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of an input record, unique within its dataset.
///
/// Records read from text carry their 0-based line ordinal. Evaluators use the
/// identity to tolerate the same record being delivered more than once.
pub type RecordId = u64;

/// The input dataset a record originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    Points,
    Rectangles,
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dataset::Points => f.write_str("point"),
            Dataset::Rectangles => f.write_str("rectangle"),
        }
    }
}

/// A point together with its record identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PointRecord {
    pub id: RecordId,
    pub point: Point,
}

impl PointRecord {
    pub const fn new(id: RecordId, point: Point) -> Self {
        Self { id, point }
    }

    /// Number points in iteration order, starting at zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use spatio_grid_types::{Point, PointRecord};
    ///
    /// let records = PointRecord::enumerate([Point::new(5, 5), Point::new(5, 6)]);
    /// assert_eq!(records[1].id, 1);
    /// ```
    pub fn enumerate(points: impl IntoIterator<Item = Point>) -> Vec<Self> {
        points
            .into_iter()
            .enumerate()
            .map(|(id, point)| Self::new(id as RecordId, point))
            .collect()
    }
}

/// A rectangle together with its record identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RectangleRecord {
    pub id: RecordId,
    pub rect: Rectangle,
}

impl RectangleRecord {
    pub const fn new(id: RecordId, rect: Rectangle) -> Self {
        Self { id, rect }
    }

    /// Number rectangles in iteration order, starting at zero.
    pub fn enumerate(rects: impl IntoIterator<Item = Rectangle>) -> Vec<Self> {
        rects
            .into_iter()
            .enumerate()
            .map(|(id, rect)| Self::new(id as RecordId, rect))
            .collect()
    }
}

/// A join input annotated with the dataset it came from.
///
/// Both datasets are grouped under the same cell keys, so the tag is what lets
/// the join evaluator separate them again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaggedRecord {
    Point(PointRecord),
    Rectangle(RectangleRecord),
}

impl TaggedRecord {
    pub fn dataset(&self) -> Dataset {
        match self {
            TaggedRecord::Point(_) => Dataset::Points,
            TaggedRecord::Rectangle(_) => Dataset::Rectangles,
        }
    }

    pub fn id(&self) -> RecordId {
        match self {
            TaggedRecord::Point(record) => record.id,
            TaggedRecord::Rectangle(record) => record.id,
        }
    }
}

impl From<PointRecord> for TaggedRecord {
    fn from(record: PointRecord) -> Self {
        TaggedRecord::Point(record)
    }
}

impl From<RectangleRecord> for TaggedRecord {
    fn from(record: RectangleRecord) -> Self {
        TaggedRecord::Rectangle(record)
    }
}

/// A value emitted by a partitioner under a cell key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedEmission<V> {
    pub cell: GridCell,
    pub value: V,
}

impl<V> KeyedEmission<V> {
    pub const fn new(cell: GridCell, value: V) -> Self {
        Self { cell, value }
    }
}

/// A point found strictly inside a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JoinMatch {
    pub rect: RectangleRecord,
    pub point: PointRecord,
}

impl JoinMatch {
    pub const fn new(rect: RectangleRecord, point: PointRecord) -> Self {
        Self { rect, point }
    }
}
