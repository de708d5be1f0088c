//! Grid-partitioned batch spatial analytics: radius outlier detection and
//! point-in-rectangle joins.
//!
//! Both computations partition their input into square grid cells, group the
//! emissions by cell, and evaluate each cell independently.
//!
//! ```rust
//! use spatio_grid::{JoinConfig, LocalEngine, OutlierConfig, detect_outliers, spatial_join};
//! use spatio_grid_types::{Point, PointRecord, Rectangle, RectangleRecord, SpatialWindow};
//!
//! let engine = LocalEngine::new(Some(2))?;
//!
//! let points = PointRecord::enumerate([Point::new(5, 5), Point::new(5, 6), Point::new(50, 50)]);
//! let outliers = detect_outliers(&engine, &points, &OutlierConfig::new(2.0, 1))?;
//! assert_eq!(outliers.results.len(), 1);
//!
//! let rects = RectangleRecord::enumerate([Rectangle::new(0, 0, 10, 10)]);
//! let config = JoinConfig::default().with_window(SpatialWindow::new(0, 0, 20, 20));
//! let matches = spatial_join(&engine, &points, &rects, &config)?;
//! assert_eq!(matches.results.len(), 2);
//! # Ok::<(), spatio_grid::GridError>(())
//! ```

pub mod codec;
pub mod compute;
pub mod config;
pub mod engine;
pub mod error;

pub use config::{Config, JoinConfig, OutlierConfig};
pub use error::{GridError, RecordError, Result};

pub use compute::{detect_outliers, spatial_join};
pub use engine::{Emitter, Executor, LocalEngine, RunOutput, RunStats, SequentialEngine};

pub use spatio_grid_types::{
    Dataset, GridCell, GridDomain, JoinMatch, KeyedEmission, Point, PointRecord, RecordId,
    Rectangle, RectangleRecord, SpatialWindow, TaggedRecord,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {
    pub use crate::{Config, GridError, JoinConfig, OutlierConfig, Result};

    pub use crate::{Executor, LocalEngine, SequentialEngine};

    pub use crate::{detect_outliers, spatial_join};

    pub use crate::{Point, PointRecord, Rectangle, RectangleRecord, SpatialWindow};
}
