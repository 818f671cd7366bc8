//! Parallel convolution over statically partitioned row ranges.
//!
//! The destination buffer is split into one disjoint `&mut [u8]` row slice
//! per worker, so workers never share a writable byte and no locking is
//! needed. The source is shared read-only. The only synchronization point is
//! the join at the end of the run.
//!
//! Two scheduling strategies produce byte-identical output:
//!
//! - [`ExecutionStrategy::Pool`] - a dedicated Rayon pool of `workers`
//!   threads runs one task per row range
//! - [`ExecutionStrategy::Threads`] - one named OS thread per row range,
//!   joined before returning
//!
//! A panicking worker is reported as [`OpsError::WorkerPanicked`] by both
//! strategies, after every other worker has finished.
//!
//! # Example
//!
//! ```rust
//! use std::num::NonZeroUsize;
//! use kfilter_core::ImageBuffer;
//! use kfilter_ops::kernel::KernelKind;
//! use kfilter_ops::parallel::{ExecutionStrategy, ParallelExecutor};
//!
//! let src = ImageBuffer::from_raw(4, 4, 1, (0..16).collect()).unwrap();
//! let workers = NonZeroUsize::new(3).unwrap();
//! let kernel = KernelKind::Blur.kernel();
//!
//! let a = ParallelExecutor::new(workers, ExecutionStrategy::Pool).apply(&src, &kernel).unwrap();
//! let b = ParallelExecutor::new(workers, ExecutionStrategy::Threads).apply(&src, &kernel).unwrap();
//! assert_eq!(a, b);
//! ```

use crate::convolve::convolve_rows;
use crate::kernel::Kernel;
use crate::partition::{partition, RowRange};
use crate::{OpsError, OpsResult};
use kfilter_core::ImageBuffer;
use rayon::prelude::*;
use std::fmt;
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use tracing::{debug, trace};

/// Controls how row ranges are scheduled onto threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExecutionStrategy {
    /// Statically chunked parallel loop on a dedicated Rayon thread pool.
    #[default]
    Pool,

    /// One explicitly spawned OS thread per row range, joined at the end.
    Threads,
}

impl ExecutionStrategy {
    /// Short lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            ExecutionStrategy::Pool => "pool",
            ExecutionStrategy::Threads => "threads",
        }
    }
}

impl fmt::Display for ExecutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One worker's share of a run.
struct RowJob<'a> {
    range: RowRange,
    rows: &'a mut [u8],
}

/// Failures injected by tests. Always empty outside of them.
#[derive(Debug, Clone, Copy, Default)]
struct Faults {
    /// Threads strategy only: fail spawning from this worker index on.
    spawn_limit: Option<usize>,
    /// Worker that panics instead of filtering.
    panic_worker: Option<usize>,
}

/// Runs a kernel over an image with a fixed worker count and strategy.
#[derive(Debug, Clone)]
pub struct ParallelExecutor {
    workers: NonZeroUsize,
    strategy: ExecutionStrategy,
    faults: Faults,
}

impl ParallelExecutor {
    /// Creates an executor.
    pub fn new(workers: NonZeroUsize, strategy: ExecutionStrategy) -> Self {
        Self {
            workers,
            strategy,
            faults: Faults::default(),
        }
    }

    /// Creates an executor sized to the host's available parallelism.
    pub fn with_available_parallelism(strategy: ExecutionStrategy) -> Self {
        Self::new(available_parallelism(), strategy)
    }

    #[cfg(test)]
    fn with_spawn_limit(mut self, limit: usize) -> Self {
        self.faults.spawn_limit = Some(limit);
        self
    }

    #[cfg(test)]
    fn with_panic_worker(mut self, worker: usize) -> Self {
        self.faults.panic_worker = Some(worker);
        self
    }

    /// Worker count.
    pub fn workers(&self) -> NonZeroUsize {
        self.workers
    }

    /// Scheduling strategy.
    pub fn strategy(&self) -> ExecutionStrategy {
        self.strategy
    }

    /// Allocates a destination and filters `source` into it.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run); additionally [`OpsError::Allocation`] if the
    /// destination cannot be allocated, in which case no worker is started.
    pub fn apply(&self, source: &ImageBuffer, kernel: &Kernel) -> OpsResult<ImageBuffer> {
        let mut dst = source.zeroed_like()?;
        self.run(source, &mut dst, kernel)?;
        Ok(dst)
    }

    /// Filters `source` into `destination`.
    ///
    /// Every destination sample is written exactly once. On error the
    /// destination contents are unspecified.
    ///
    /// # Errors
    ///
    /// - [`OpsError::SizeMismatch`] if the two buffers differ in shape
    /// - [`OpsError::Allocation`] if worker bookkeeping cannot be allocated
    /// - [`OpsError::ThreadPool`] if the Rayon pool cannot be built
    /// - [`OpsError::WorkerSpawn`] if a thread fails to start; earlier workers are joined first
    /// - [`OpsError::WorkerPanicked`] if a worker panicked; the others run to completion
    pub fn run(
        &self,
        source: &ImageBuffer,
        destination: &mut ImageBuffer,
        kernel: &Kernel,
    ) -> OpsResult<()> {
        if !source.same_shape(destination) {
            return Err(OpsError::SizeMismatch(format!(
                "source {}x{}x{} vs destination {}x{}x{}",
                source.width(),
                source.height(),
                source.channels(),
                destination.width(),
                destination.height(),
                destination.channels()
            )));
        }

        let workers = self.workers.get();
        let ranges = partition(source.height(), workers)?;
        let jobs = split_rows(destination.as_mut_slice(), source.row_stride(), &ranges)?;

        debug!(
            workers,
            strategy = %self.strategy,
            width = source.width(),
            height = source.height(),
            channels = source.channels(),
            "fan-out"
        );

        match self.strategy {
            ExecutionStrategy::Pool => run_pool(source, kernel, jobs, workers, self.faults),
            ExecutionStrategy::Threads => run_threads(source, kernel, jobs, self.faults),
        }
    }
}

/// Host parallelism, or 1 if it cannot be queried.
pub fn available_parallelism() -> NonZeroUsize {
    thread::available_parallelism().unwrap_or(NonZeroUsize::MIN)
}

/// Splits `dst` into consecutive row slices matching `ranges`.
fn split_rows<'a>(
    dst: &'a mut [u8],
    stride: usize,
    ranges: &[RowRange],
) -> OpsResult<Vec<RowJob<'a>>> {
    let mut jobs = Vec::new();
    jobs.try_reserve_exact(ranges.len()).map_err(|e| {
        OpsError::allocation(
            ranges.len().saturating_mul(std::mem::size_of::<RowJob<'_>>()),
            e.to_string(),
        )
    })?;

    let mut rest = dst;
    for &range in ranges {
        let (rows, tail) = std::mem::take(&mut rest).split_at_mut(range.len() as usize * stride);
        jobs.push(RowJob { range, rows });
        rest = tail;
    }
    debug_assert!(rest.is_empty());

    Ok(jobs)
}

/// Body shared by both strategies.
fn filter_job(
    source: &ImageBuffer,
    kernel: &Kernel,
    worker: usize,
    job: RowJob<'_>,
    faults: Faults,
) {
    if faults.panic_worker == Some(worker) {
        panic!("worker {worker} failed");
    }
    trace!(worker, start = job.range.start, end = job.range.end, "worker");
    convolve_rows(source, kernel, job.range, job.rows);
}

fn run_pool(
    source: &ImageBuffer,
    kernel: &Kernel,
    jobs: Vec<RowJob<'_>>,
    workers: usize,
    faults: Faults,
) -> OpsResult<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("kfilter-pool-{i}"))
        .build()
        .map_err(|e| OpsError::ThreadPool(e.to_string()))?;

    // One task per range; a range is never split further,
    // so the row assignment stays static.
    let panicked = pool.install(|| {
        jobs.into_par_iter()
            .enumerate()
            .with_max_len(1)
            .filter_map(|(worker, job)| {
                panic::catch_unwind(AssertUnwindSafe(|| {
                    filter_job(source, kernel, worker, job, faults)
                }))
                .err()
                .map(|_| worker)
            })
            .min()
    });

    match panicked {
        Some(worker) => Err(OpsError::WorkerPanicked { worker }),
        None => Ok(()),
    }
}

fn run_threads(
    source: &ImageBuffer,
    kernel: &Kernel,
    jobs: Vec<RowJob<'_>>,
    faults: Faults,
) -> OpsResult<()> {
    thread::scope(|scope| {
        let mut handles = Vec::new();
        handles.try_reserve_exact(jobs.len()).map_err(|e| {
            OpsError::allocation(
                jobs.len()
                    .saturating_mul(std::mem::size_of::<thread::ScopedJoinHandle<'_, ()>>()),
                e.to_string(),
            )
        })?;

        let mut spawn_error = None;

        for (worker, job) in jobs.into_iter().enumerate() {
            let spawned = if faults.spawn_limit.is_some_and(|limit| worker >= limit) {
                Err(std::io::Error::other("spawn limit reached"))
            } else {
                thread::Builder::new()
                    .name(format!("kfilter-worker-{worker}"))
                    .spawn_scoped(scope, move || filter_job(source, kernel, worker, job, faults))
            };

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    spawn_error = Some(OpsError::WorkerSpawn {
                        worker,
                        reason: e.to_string(),
                    });
                    break;
                }
            }
        }

        // Join everything that started before reporting anything.
        let mut panicked = None;
        for (worker, handle) in handles.into_iter().enumerate() {
            if handle.join().is_err() && panicked.is_none() {
                panicked = Some(worker);
            }
        }

        if let Some(err) = spawn_error {
            return Err(err);
        }
        if let Some(worker) = panicked {
            return Err(OpsError::WorkerPanicked { worker });
        }
        Ok(())
    })
}
