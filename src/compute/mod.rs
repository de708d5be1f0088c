//! Compute layer: grid geometry and the two partition/evaluate computations.
//!
//! - [`geometry`]: cell enumeration and point tests
//! - [`window`]: spatial window filter
//! - [`outlier`]: radius outlier detection
//! - [`join`]: point-in-rectangle join
//!
//! Partitioners and evaluators hold only run-level parameters and are free of
//! side effects, so any [`Executor`](crate::engine::Executor) can host them.

pub mod geometry;
pub mod join;
pub mod outlier;
pub mod window;

pub use join::{JoinEvaluator, JoinPartitioner, spatial_join};
pub use outlier::{OutlierEvaluator, OutlierPartitioner, detect_outliers};
pub use window::WindowFilter;
