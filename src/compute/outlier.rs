//! Radius outlier detection.
//!
//! A point is an outlier when fewer than `k` other points lie within distance
//! `r` of it. Points are replicated into every chunk their radius-`r` circle
//! overlaps. Any neighbor `q` of `p` has `p` inside its own circle, so `q`
//! reaches `p`'s home chunk, and each point can be judged at its home chunk
//! from that chunk's group alone.

use crate::compute::geometry::{cells_overlapping_circle, is_home_cell, within_radius};
use crate::config::OutlierConfig;
use crate::engine::{Emitter, Executor, RunOutput};
use crate::error::Result;
use rstar::primitives::GeomWithData;
use rstar::{AABB, RTree};
use spatio_grid_types::{GridCell, GridDomain, PointRecord};

/// Chunks spanned by the radius above which replication is reported.
const WIDE_RADIUS_CHUNKS: f64 = 16.0;

type IndexedPoint = GeomWithData<[f64; 2], PointRecord>;

/// Replicates each point into every chunk overlapped by its circle.
#[derive(Debug, Clone)]
pub struct OutlierPartitioner {
    chunk_size: i64,
    radius: f64,
    domain: GridDomain,
}

impl OutlierPartitioner {
    pub fn new(config: &OutlierConfig) -> Self {
        let spanned = 2.0 * config.radius / config.chunk_size as f64;
        if spanned > WIDE_RADIUS_CHUNKS {
            log::warn!(
                "radius {} spans about {:.0} chunks of size {}; every point will be replicated \
                 into roughly {:.0} chunks",
                config.radius,
                spanned,
                config.chunk_size,
                (spanned + 1.0).powi(2)
            );
        }

        Self {
            chunk_size: config.chunk_size,
            radius: config.radius,
            domain: config.domain,
        }
    }

    /// Emit `record` under every chunk its circle overlaps.
    pub fn partition<E>(&self, record: &PointRecord, out: &mut E)
    where
        E: Emitter<PointRecord> + ?Sized,
    {
        for cell in cells_overlapping_circle(self.chunk_size, record.point, self.radius, &self.domain)
        {
            out.emit(cell, *record);
        }
    }
}

/// Judges the points whose home chunk is the group's key.
#[derive(Debug, Clone)]
pub struct OutlierEvaluator {
    radius: f64,
    k: usize,
}

impl OutlierEvaluator {
    pub fn new(config: &OutlierConfig) -> Self {
        Self {
            radius: config.radius,
            k: config.k,
        }
    }

    /// Return the home points of `cell` with fewer than `k` neighbors.
    ///
    /// `group` must hold every point replicated into `cell`. Repeated
    /// deliveries of one record are collapsed by record identity first.
    pub fn evaluate(&self, cell: GridCell, mut group: Vec<PointRecord>) -> Vec<PointRecord> {
        group.sort_unstable_by_key(|record| record.id);
        group.dedup_by_key(|record| record.id);

        let candidates: Vec<PointRecord> = group
            .iter()
            .filter(|record| is_home_cell(&cell, record.point))
            .copied()
            .collect();
        if candidates.is_empty() {
            return Vec::new();
        }

        let tree = RTree::bulk_load(
            group
                .into_iter()
                .map(|record| IndexedPoint::new(record.point.to_array(), record))
                .collect(),
        );

        candidates
            .into_iter()
            .filter(|candidate| self.neighbor_count(&tree, candidate) < self.k)
            .collect()
    }

    /// Records other than `candidate` within the radius.
    fn neighbor_count(&self, tree: &RTree<IndexedPoint>, candidate: &PointRecord) -> usize {
        let [x, y] = candidate.point.to_array();
        let envelope = AABB::from_corners(
            [x - self.radius, y - self.radius],
            [x + self.radius, y + self.radius],
        );
        let within = tree
            .locate_in_envelope(&envelope)
            .filter(|other| within_radius(candidate.point, other.data.point, self.radius))
            .count();
        // The candidate always counts itself.
        within.saturating_sub(1)
    }
}

/// Flag every point with fewer than `config.k` neighbors within `config.radius`.
///
/// Points outside the configured domain have no home chunk and are never
/// reported.
///
/// # Examples
///
/// ```
/// use spatio_grid::{OutlierConfig, SequentialEngine, detect_outliers};
/// use spatio_grid_types::{Point, PointRecord};
///
/// let points = PointRecord::enumerate([Point::new(5, 5), Point::new(5, 6), Point::new(50, 50)]);
/// let output = detect_outliers(&SequentialEngine, &points, &OutlierConfig::new(2.0, 1))?;
/// assert_eq!(output.results, vec![PointRecord::new(2, Point::new(50, 50))]);
/// # Ok::<(), spatio_grid::GridError>(())
/// ```
pub fn detect_outliers<X: Executor>(
    executor: &X,
    points: &[PointRecord],
    config: &OutlierConfig,
) -> Result<RunOutput<PointRecord>> {
    config.validate()?;

    let partitioner = OutlierPartitioner::new(config);
    let evaluator = OutlierEvaluator::new(config);
    let output = executor.execute(
        points,
        |record, out| partitioner.partition(record, out),
        |cell, group| evaluator.evaluate(cell, group),
    );

    log::info!(
        "outlier detection: {} points, {} chunks, {} outliers (r = {}, k = {})",
        output.stats.inputs,
        output.stats.groups,
        output.stats.results,
        config.radius,
        config.k
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use spatio_grid_types::{KeyedEmission, Point};

    fn record(id: u64, x: i64, y: i64) -> PointRecord {
        PointRecord::new(id, Point::new(x, y))
    }

    #[test]
    fn test_partition_replicates_across_chunks() {
        let partitioner = OutlierPartitioner::new(&OutlierConfig::new(5.0, 1));
        let mut out: Vec<KeyedEmission<PointRecord>> = Vec::new();

        partitioner.partition(&record(0, 50, 50), &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].cell, GridCell::new(0, 0, 100));

        out.clear();
        partitioner.partition(&record(1, 98, 102), &mut out);
        let cells: Vec<GridCell> = out.iter().map(|e| e.cell).collect();
        assert_eq!(
            cells,
            vec![
                GridCell::new(0, 0, 100),
                GridCell::new(0, 100, 100),
                GridCell::new(100, 0, 100),
                GridCell::new(100, 100, 100),
            ]
        );
        assert!(out.iter().all(|e| e.value == record(1, 98, 102)));
    }

    #[test]
    fn test_partition_outside_domain_emits_nothing() {
        let partitioner = OutlierPartitioner::new(&OutlierConfig::new(2.0, 1));
        let mut out: Vec<KeyedEmission<PointRecord>> = Vec::new();
        partitioner.partition(&record(0, -50, 20_000), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_evaluate_counts_neighbors() {
        let evaluator = OutlierEvaluator::new(&OutlierConfig::new(2.0, 1));
        let cell = GridCell::new(0, 0, 100);
        let group = vec![record(0, 5, 5), record(1, 5, 6), record(2, 50, 50)];

        let outliers = evaluator.evaluate(cell, group);
        assert_eq!(outliers, vec![record(2, 50, 50)]);
    }

    #[test]
    fn test_evaluate_only_judges_home_points() {
        let evaluator = OutlierEvaluator::new(&OutlierConfig::new(5.0, 1));
        let cell = GridCell::new(100, 0, 100);
        // (98, 50) was replicated here from the neighboring chunk; it is lonely
        // but belongs to chunk (0, 0), so it must not be reported here.
        let group = vec![record(0, 98, 50), record(1, 150, 50)];

        let outliers = evaluator.evaluate(cell, group);
        assert_eq!(outliers, vec![record(1, 150, 50)]);
    }

    #[test]
    fn test_evaluate_uses_replicated_neighbors() {
        let evaluator = OutlierEvaluator::new(&OutlierConfig::new(3.0, 1));
        let cell = GridCell::new(100, 0, 100);
        // (98, 50) sits across the chunk edge but is 2 away from (100, 50).
        let group = vec![record(0, 98, 50), record(1, 100, 50)];

        assert!(evaluator.evaluate(cell, group).is_empty());
    }

    #[test]
    fn test_evaluate_radius_is_inclusive() {
        let evaluator = OutlierEvaluator::new(&OutlierConfig::new(5.0, 1));
        let cell = GridCell::new(0, 0, 100);
        let group = vec![record(0, 10, 10), record(1, 13, 14)];
        assert!(evaluator.evaluate(cell, group).is_empty());
    }

    #[test]
    fn test_evaluate_tolerates_duplicate_delivery() {
        let evaluator = OutlierEvaluator::new(&OutlierConfig::new(2.0, 1));
        let cell = GridCell::new(0, 0, 100);
        let group = vec![record(0, 5, 5), record(0, 5, 5), record(0, 5, 5)];

        // One record delivered three times is still alone.
        assert_eq!(evaluator.evaluate(cell, group), vec![record(0, 5, 5)]);
    }

    #[test]
    fn test_evaluate_counts_coincident_records() {
        let evaluator = OutlierEvaluator::new(&OutlierConfig::new(1.0, 2));
        let cell = GridCell::new(0, 0, 100);
        let group = vec![record(0, 5, 5), record(1, 5, 5), record(2, 5, 6)];
        assert!(evaluator.evaluate(cell, group).is_empty());

        let group = vec![record(0, 5, 5), record(1, 5, 5)];
        assert_eq!(evaluator.evaluate(cell, group).len(), 2);
    }

    #[test]
    fn test_detect_outliers_rejects_invalid_config() {
        let points = vec![record(0, 1, 1)];
        let result = detect_outliers(
            &crate::engine::SequentialEngine,
            &points,
            &OutlierConfig::new(-1.0, 1),
        );
        assert!(result.is_err());
    }
}
