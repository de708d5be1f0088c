//! # spatio-grid-types
//!
//! Value types shared by the spatio-grid batch engine.
//!
//! - **Geometry**: [`Point`], [`Rectangle`], [`SpatialWindow`]
//! - **Grid**: [`GridCell`], [`GridDomain`]
//! - **Records**: [`PointRecord`], [`RectangleRecord`], [`TaggedRecord`],
//!   [`KeyedEmission`], [`JoinMatch`]
//!
//! Coordinates are integers. All types are `Copy`, serializable with Serde and
//! convert into the `geo` crate's primitives where that is useful.
//!
//! ## Examples
//!
//! ```rust
//! use spatio_grid_types::{GridCell, Point, Rectangle};
//!
//! let point = Point::new(16, 402);
//! let cell = GridCell::containing(10, point);
//! assert_eq!((cell.min_x, cell.min_y), (10, 400));
//!
//! let rect = Rectangle::new(0, 0, 10, 10);
//! assert_eq!(rect.max_x(), 10);
//! ```

pub mod cell;
pub mod point;
pub mod rect;
pub mod record;

pub use cell::{GridCell, GridDomain};
pub use point::Point;
pub use rect::{Rectangle, SpatialWindow};
pub use record::{
    Dataset, JoinMatch, KeyedEmission, PointRecord, RecordId, RectangleRecord, TaggedRecord,
};
