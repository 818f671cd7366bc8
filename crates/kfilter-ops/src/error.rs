//! Error types for filter operations.

use thiserror::Error;

/// Error type for filter operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Images have incompatible shapes.
    #[error("size mismatch: {0}")]
    SizeMismatch(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Destination buffer or worker bookkeeping could not be allocated.
    #[error("failed to allocate {requested} bytes: {reason}")]
    Allocation {
        /// Bytes requested
        requested: usize,
        /// Failure reason
        reason: String,
    },

    /// The worker thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    ThreadPool(String),

    /// A worker thread could not be started.
    ///
    /// Workers `0..worker` were already running; they have been joined by
    /// the time this error is returned.
    #[error("failed to spawn worker {worker}: {reason}")]
    WorkerSpawn {
        /// Index of the worker that failed to start
        worker: usize,
        /// OS error description
        reason: String,
    },

    /// A worker thread panicked. All other workers were joined first.
    #[error("worker {worker} panicked")]
    WorkerPanicked {
        /// Index of the first worker observed to panic
        worker: usize,
    },

    /// Invalid image buffer.
    #[error(transparent)]
    Image(kfilter_core::Error),
}

impl OpsError {
    /// Creates an [`OpsError::Allocation`] error.
    #[inline]
    pub fn allocation(requested: usize, reason: impl Into<String>) -> Self {
        Self::Allocation {
            requested,
            reason: reason.into(),
        }
    }

    /// Returns `true` if this is an allocation error.
    #[inline]
    pub fn is_allocation_error(&self) -> bool {
        matches!(self, Self::Allocation { .. })
    }
}

impl From<kfilter_core::Error> for OpsError {
    fn from(err: kfilter_core::Error) -> Self {
        match err {
            kfilter_core::Error::AllocationFailed { requested, reason } => {
                Self::Allocation { requested, reason }
            }
            other => Self::Image(other),
        }
    }
}

/// Result type for filter operations.
pub type OpsResult<T> = Result<T, OpsError>;
