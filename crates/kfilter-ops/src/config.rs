//! Run configuration.

use crate::kernel::{KernelCatalog, KernelKind};
use crate::parallel::{available_parallelism, ExecutionStrategy, ParallelExecutor};
use crate::OpsResult;
use kfilter_core::ImageBuffer;
use std::num::NonZeroUsize;
use tracing::debug;

/// Everything needed to filter one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterConfig {
    /// Kernel to apply.
    pub kernel: KernelKind,
    /// Worker count.
    pub workers: NonZeroUsize,
    /// Scheduling strategy.
    pub strategy: ExecutionStrategy,
}

impl FilterConfig {
    /// Builds a config from a kernel name and an optional requested worker count.
    ///
    /// The name goes through [`KernelCatalog::resolve`], so unknown names
    /// select the identity kernel. See [`resolve_workers`](Self::resolve_workers)
    /// for how the worker count is chosen.
    pub fn new(
        catalog: &KernelCatalog,
        kernel_name: &str,
        requested_workers: Option<i64>,
        strategy: ExecutionStrategy,
    ) -> Self {
        let config = Self {
            kernel: catalog.resolve(kernel_name),
            workers: Self::resolve_workers(requested_workers),
            strategy,
        };
        debug!(
            kernel = %config.kernel,
            workers = config.workers.get(),
            strategy = %config.strategy,
            "config"
        );
        config
    }

    /// Maps a requested worker count to a usable one.
    ///
    /// `None`, zero and negative values select the host's available
    /// parallelism. Values above `usize::MAX` saturate.
    ///
    /// ```rust
    /// use kfilter_ops::config::FilterConfig;
    ///
    /// assert_eq!(FilterConfig::resolve_workers(Some(3)).get(), 3);
    /// assert!(FilterConfig::resolve_workers(Some(-1)).get() >= 1);
    /// ```
    pub fn resolve_workers(requested: Option<i64>) -> NonZeroUsize {
        requested
            .filter(|&n| n > 0)
            .and_then(|n| NonZeroUsize::new(usize::try_from(n).unwrap_or(usize::MAX)))
            .unwrap_or_else(Self::hardware_parallelism)
    }

    /// Host parallelism, or 1 if it cannot be queried.
    pub fn hardware_parallelism() -> NonZeroUsize {
        available_parallelism()
    }

    /// Executor for this config.
    pub fn executor(&self) -> ParallelExecutor {
        ParallelExecutor::new(self.workers, self.strategy)
    }

    /// Filters `source` with this config.
    pub fn apply(&self, source: &ImageBuffer) -> OpsResult<ImageBuffer> {
        self.executor().apply(source, &self.kernel.kernel())
    }
}
