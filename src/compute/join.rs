//! Point-in-rectangle spatial join.
//!
//! Points have no extent, so each point goes to exactly one cell: its home
//! cell. Rectangles are replicated into every cell they overlap, so every
//! rectangle that could contain a point is present at that point's home cell.
//! Each containing pair is therefore found once, at one cell, and needs no
//! de-duplication downstream.

use crate::compute::geometry::{cells_overlapping_rectangle, contains, home_cell};
use crate::compute::window::WindowFilter;
use crate::config::JoinConfig;
use crate::engine::{Emitter, Executor, RunOutput};
use crate::error::Result;
use rstar::primitives::GeomWithData;
use rstar::{AABB, RTree};
use spatio_grid_types::{
    GridCell, JoinMatch, PointRecord, RectangleRecord, SpatialWindow, TaggedRecord,
};

type IndexedPoint = GeomWithData<[f64; 2], PointRecord>;

/// Drops records outside the window, then assigns points to their home cell
/// and rectangles to every cell they overlap inside the window.
#[derive(Debug, Clone)]
pub struct JoinPartitioner {
    window: SpatialWindow,
    cell_size: i64,
}

impl JoinPartitioner {
    pub fn new(config: &JoinConfig) -> Self {
        Self {
            window: config.window,
            cell_size: config.cell_size,
        }
    }

    pub fn partition<E>(&self, record: &TaggedRecord, out: &mut E)
    where
        E: Emitter<TaggedRecord> + ?Sized,
    {
        if !record.within(&self.window) {
            return;
        }
        match record {
            TaggedRecord::Point(point) => {
                out.emit(home_cell(self.cell_size, point.point), *record);
            }
            TaggedRecord::Rectangle(rect) => {
                for cell in cells_overlapping_rectangle(self.cell_size, &rect.rect, &self.window) {
                    out.emit(cell, *record);
                }
            }
        }
    }
}

/// Reports the containing pairs among one cell's points and rectangles.
#[derive(Debug, Clone, Copy, Default)]
pub struct JoinEvaluator;

impl JoinEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Return every `(rectangle, point)` of `group` where the point lies
    /// strictly inside the rectangle.
    pub fn evaluate(&self, _cell: GridCell, group: Vec<TaggedRecord>) -> Vec<JoinMatch> {
        let mut points: Vec<PointRecord> = Vec::new();
        let mut rects: Vec<RectangleRecord> = Vec::new();
        for record in group {
            match record {
                TaggedRecord::Point(point) => points.push(point),
                TaggedRecord::Rectangle(rect) => rects.push(rect),
            }
        }
        if points.is_empty() || rects.is_empty() {
            return Vec::new();
        }

        points.sort_unstable_by_key(|record| record.id);
        points.dedup_by_key(|record| record.id);
        rects.sort_unstable_by_key(|record| record.id);
        rects.dedup_by_key(|record| record.id);

        let tree = RTree::bulk_load(
            points
                .into_iter()
                .map(|record| IndexedPoint::new(record.point.to_array(), record))
                .collect(),
        );

        let mut matches = Vec::new();
        for rect in &rects {
            let envelope = AABB::from_corners(
                rect.rect.origin().to_array(),
                [rect.rect.max_x() as f64, rect.rect.max_y() as f64],
            );
            matches.extend(
                tree.locate_in_envelope(&envelope)
                    .filter(|point| contains(&rect.rect, point.data.point))
                    .map(|point| JoinMatch::new(*rect, point.data)),
            );
        }
        matches
    }
}

/// Report every point strictly inside a rectangle, restricted to
/// `config.window`.
///
/// # Examples
///
/// ```
/// use spatio_grid::{JoinConfig, SequentialEngine, spatial_join};
/// use spatio_grid_types::{Point, PointRecord, Rectangle, RectangleRecord, SpatialWindow};
///
/// let points = PointRecord::enumerate([Point::new(5, 5), Point::new(0, 0)]);
/// let rects = RectangleRecord::enumerate([Rectangle::new(0, 0, 10, 10)]);
/// let config = JoinConfig::default().with_window(SpatialWindow::new(0, 0, 20, 20));
///
/// let output = spatial_join(&SequentialEngine, &points, &rects, &config)?;
/// assert_eq!(output.results.len(), 1);
/// assert_eq!(output.results[0].point.point, Point::new(5, 5));
/// # Ok::<(), spatio_grid::GridError>(())
/// ```
pub fn spatial_join<X: Executor>(
    executor: &X,
    points: &[PointRecord],
    rects: &[RectangleRecord],
    config: &JoinConfig,
) -> Result<RunOutput<JoinMatch>> {
    config.validate()?;

    let inputs: Vec<TaggedRecord> = points
        .iter()
        .copied()
        .map(TaggedRecord::Point)
        .chain(rects.iter().copied().map(TaggedRecord::Rectangle))
        .collect();

    let partitioner = JoinPartitioner::new(config);
    let evaluator = JoinEvaluator::new();
    let output = executor.execute(
        &inputs,
        |record, out| partitioner.partition(record, out),
        |cell, group| evaluator.evaluate(cell, group),
    );

    log::info!(
        "spatial join: {} points, {} rectangles, {} outside window {}, {} cells, {} matches",
        points.len(),
        rects.len(),
        output.stats.unassigned,
        config.window,
        output.stats.groups,
        output.stats.results
    );
    Ok(output)
}
