//! # kfilter-ops
//!
//! 3x3 convolution for 8-bit images, run in parallel over static row ranges.
//!
//! # Modules
//!
//! - [`kernel`] - Built-in kernels and the name catalog
//! - [`convolve`] - Per-pixel clamp-to-edge convolution
//! - [`partition`] - Balanced row partitioning
//! - [`parallel`] - Worker fan-out over disjoint destination rows
//! - [`config`] - Resolved run configuration
//!
//! # Example
//!
//! ```rust
//! use kfilter_core::ImageBuffer;
//! use kfilter_ops::{ExecutionStrategy, FilterConfig, KernelCatalog};
//!
//! let catalog = KernelCatalog::new();
//! let config = FilterConfig::new(&catalog, "blur", Some(2), ExecutionStrategy::Pool);
//!
//! let src = ImageBuffer::from_raw(3, 3, 1, vec![90; 9]).unwrap();
//! let out = config.apply(&src).unwrap();
//! assert_eq!(out.as_slice(), &[90; 9]);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod config;
pub mod convolve;
pub mod kernel;
pub mod parallel;
pub mod partition;

pub use config::FilterConfig;
pub use error::{OpsError, OpsResult};
pub use kernel::{Kernel, KernelCatalog, KernelKind};
pub use parallel::{ExecutionStrategy, ParallelExecutor};
pub use partition::{partition, RowRange};
