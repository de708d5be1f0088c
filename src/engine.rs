//! Execution engines: the grouping boundary between partitioners and evaluators.
//!
//! A run has two phases separated by a barrier:
//!
//! 1. **Partition**: every input record is handed to a partition function that
//!    emits `(cell, value)` pairs through an [`Emitter`]. Emissions are grouped
//!    by cell.
//! 2. **Evaluate**: once every emission has been collected, each cell's complete
//!    group is handed to an evaluate function. Groups are independent.
//!
//! Partition and evaluate functions are pure, so re-running either on the same
//! input yields the same output and engines are free to schedule them in any
//! order. [`LocalEngine`] runs both phases on a rayon pool;
//! [`SequentialEngine`] runs them on the calling thread.

use crate::error::{GridError, Result};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use spatio_grid_types::{GridCell, KeyedEmission};

/// Sink for the emissions of a partition function.
pub trait Emitter<V> {
    fn emit(&mut self, cell: GridCell, value: V);
}

impl<V> Emitter<V> for Vec<KeyedEmission<V>> {
    fn emit(&mut self, cell: GridCell, value: V) {
        self.push(KeyedEmission::new(cell, value));
    }
}

/// Counters collected while executing a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Records handed to the partition function
    pub inputs: usize,
    /// Records that produced no emission (outside the window or domain)
    pub unassigned: usize,
    /// Total emissions, counting every replica
    pub emissions: usize,
    /// Distinct cell keys
    pub groups: usize,
    /// Size of the largest group
    pub max_group_size: usize,
    /// Records produced by the evaluate function
    pub results: usize,
}

impl RunStats {
    /// Average number of cells each assigned record was emitted to.
    pub fn replication_factor(&self) -> f64 {
        let assigned = self.inputs - self.unassigned;
        if assigned == 0 {
            0.0
        } else {
            self.emissions as f64 / assigned as f64
        }
    }
}

/// Results of a run together with its counters.
#[derive(Debug, Clone)]
pub struct RunOutput<R> {
    pub results: Vec<R>,
    pub stats: RunStats,
}

impl<R: Ord> RunOutput<R> {
    /// Results in ascending order. Engines make no ordering promise.
    pub fn into_sorted(mut self) -> Vec<R> {
        self.results.sort_unstable();
        self.results
    }
}

/// Hosts the partition and evaluate phases of a run.
pub trait Executor {
    /// Partition `inputs`, group the emissions by cell, then evaluate every
    /// group.
    ///
    /// `evaluate` is only called with a cell's complete group and takes
    /// ownership of it.
    fn execute<T, V, R, P, E>(&self, inputs: &[T], partition: P, evaluate: E) -> RunOutput<R>
    where
        T: Sync,
        V: Send,
        R: Send,
        P: Fn(&T, &mut Vec<KeyedEmission<V>>) + Sync,
        E: Fn(GridCell, Vec<V>) -> Vec<R> + Sync;
}

/// Emissions grouped by cell, plus partition-phase counters.
struct Shuffle<V> {
    groups: FxHashMap<GridCell, Vec<V>>,
    inputs: usize,
    unassigned: usize,
    emissions: usize,
}

impl<V> Shuffle<V> {
    fn new() -> Self {
        Self {
            groups: FxHashMap::default(),
            inputs: 0,
            unassigned: 0,
            emissions: 0,
        }
    }

    /// Drain one record's emissions into the groups.
    fn absorb(&mut self, buffer: &mut Vec<KeyedEmission<V>>) {
        self.inputs += 1;
        if buffer.is_empty() {
            self.unassigned += 1;
            return;
        }
        self.emissions += buffer.len();
        for emission in buffer.drain(..) {
            self.groups
                .entry(emission.cell)
                .or_default()
                .push(emission.value);
        }
    }

    /// Combine two partial shuffles, folding the smaller into the larger.
    fn merge(mut self, mut other: Self) -> Self {
        if other.groups.len() > self.groups.len() {
            std::mem::swap(&mut self.groups, &mut other.groups);
        }
        for (cell, mut values) in other.groups {
            self.groups.entry(cell).or_default().append(&mut values);
        }
        self.inputs += other.inputs;
        self.unassigned += other.unassigned;
        self.emissions += other.emissions;
        self
    }

    fn stats(&self) -> RunStats {
        RunStats {
            inputs: self.inputs,
            unassigned: self.unassigned,
            emissions: self.emissions,
            groups: self.groups.len(),
            max_group_size: self.groups.values().map(Vec::len).max().unwrap_or(0),
            results: 0,
        }
    }
}

/// Multi-threaded engine backed by its own rayon thread pool.
pub struct LocalEngine {
    pool: rayon::ThreadPool,
}

impl LocalEngine {
    /// Create an engine with `workers` threads, or one per core when `None`.
    pub fn new(workers: Option<usize>) -> Result<Self> {
        if workers == Some(0) {
            return Err(GridError::InvalidConfig(
                "worker count must be at least 1".to_string(),
            ));
        }

        let mut builder =
            rayon::ThreadPoolBuilder::new().thread_name(|index| format!("spatio-grid-{index}"));
        if let Some(workers) = workers {
            builder = builder.num_threads(workers);
        }
        let pool = builder
            .build()
            .map_err(|e| GridError::Engine(format!("failed to start worker pool: {e}")))?;

        Ok(Self { pool })
    }

    /// Number of worker threads.
    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }
}

impl std::fmt::Debug for LocalEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalEngine")
            .field("workers", &self.workers())
            .finish()
    }
}

impl Executor for LocalEngine {
    fn execute<T, V, R, P, E>(&self, inputs: &[T], partition: P, evaluate: E) -> RunOutput<R>
    where
        T: Sync,
        V: Send,
        R: Send,
        P: Fn(&T, &mut Vec<KeyedEmission<V>>) + Sync,
        E: Fn(GridCell, Vec<V>) -> Vec<R> + Sync,
    {
        self.pool.install(|| {
            let shuffle = inputs
                .par_iter()
                .fold(
                    || (Shuffle::new(), Vec::new()),
                    |(mut shuffle, mut buffer), input| {
                        partition(input, &mut buffer);
                        shuffle.absorb(&mut buffer);
                        (shuffle, buffer)
                    },
                )
                .map(|(shuffle, _)| shuffle)
                .reduce(Shuffle::new, Shuffle::merge);

            let mut stats = shuffle.stats();
            log::debug!(
                "partitioned {} records into {} cells ({} emissions, largest group {})",
                stats.inputs,
                stats.groups,
                stats.emissions,
                stats.max_group_size
            );

            let results: Vec<R> = shuffle
                .groups
                .into_par_iter()
                .flat_map_iter(|(cell, group)| evaluate(cell, group))
                .collect();

            stats.results = results.len();
            RunOutput { results, stats }
        })
    }
}

/// Single-threaded engine with the same contract as [`LocalEngine`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialEngine;

impl Executor for SequentialEngine {
    fn execute<T, V, R, P, E>(&self, inputs: &[T], partition: P, evaluate: E) -> RunOutput<R>
    where
        T: Sync,
        V: Send,
        R: Send,
        P: Fn(&T, &mut Vec<KeyedEmission<V>>) + Sync,
        E: Fn(GridCell, Vec<V>) -> Vec<R> + Sync,
    {
        let mut shuffle = Shuffle::new();
        let mut buffer = Vec::new();
        for input in inputs {
            partition(input, &mut buffer);
            shuffle.absorb(&mut buffer);
        }

        let mut stats = shuffle.stats();
        log::debug!(
            "partitioned {} records into {} cells ({} emissions, largest group {})",
            stats.inputs,
            stats.groups,
            stats.emissions,
            stats.max_group_size
        );

        let results: Vec<R> = shuffle
            .groups
            .into_iter()
            .flat_map(|(cell, group)| evaluate(cell, group))
            .collect();

        stats.results = results.len();
        RunOutput { results, stats }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spatio_grid_types::Point;

    /// Emit each value under the cell of side 10 containing `(value, 0)`, and
    /// twice when the value is a multiple of 10.
    fn partition(value: &i64, out: &mut Vec<KeyedEmission<i64>>) {
        if *value < 0 {
            return;
        }
        let cell = GridCell::containing(10, Point::new(*value, 0));
        out.emit(cell, *value);
        if value % 10 == 0 {
            out.emit(GridCell::new(cell.min_x - 10, 0, 10), *value);
        }
    }

    /// One result per group: the cell corner and the group's sorted members.
    fn evaluate(cell: GridCell, mut group: Vec<i64>) -> Vec<(i64, Vec<i64>)> {
        group.sort_unstable();
        vec![(cell.min_x, group)]
    }

    fn inputs() -> Vec<i64> {
        vec![1, 5, 10, 12, 25, -3, 29, 30]
    }

    #[test]
    fn test_sequential_engine_groups_by_cell() {
        let output = SequentialEngine.execute(&inputs(), partition, evaluate);
        let results = output.into_sorted();
        assert_eq!(
            results,
            vec![
                (0, vec![1, 5, 10]),
                (10, vec![10, 12]),
                (20, vec![25, 29, 30]),
                (30, vec![30]),
            ]
        );
    }

    #[test]
    fn test_engine_stats() {
        let output = SequentialEngine.execute(&inputs(), partition, evaluate);
        let stats = output.stats;
        assert_eq!(stats.inputs, 8);
        assert_eq!(stats.unassigned, 1);
        assert_eq!(stats.emissions, 9);
        assert_eq!(stats.groups, 4);
        assert_eq!(stats.max_group_size, 3);
        assert_eq!(stats.results, 4);
        assert!((stats.replication_factor() - 9.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_local_engine_matches_sequential() {
        let engine = LocalEngine::new(Some(4)).unwrap();
        assert_eq!(engine.workers(), 4);

        let values: Vec<i64> = (0..5_000).map(|i| (i * 7_919) % 3_001).collect();
        let local = engine.execute(&values, partition, evaluate);
        let sequential = SequentialEngine.execute(&values, partition, evaluate);

        assert_eq!(local.stats, sequential.stats);
        assert_eq!(local.into_sorted(), sequential.into_sorted());
    }

    #[test]
    fn test_local_engine_empty_input() {
        let engine = LocalEngine::new(Some(2)).unwrap();
        let output = engine.execute(&[] as &[i64], partition, evaluate);
        assert!(output.results.is_empty());
        assert_eq!(output.stats, RunStats::default());
        assert_eq!(output.stats.replication_factor(), 0.0);
    }

    #[test]
    fn test_local_engine_rejects_zero_workers() {
        let err = LocalEngine::new(Some(0)).unwrap_err();
        assert!(matches!(err, GridError::InvalidConfig(_)));
    }
}
