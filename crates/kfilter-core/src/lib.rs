//! # kfilter-core
//!
//! Core types shared by every kfilter crate:
//!
//! - [`ImageBuffer`] - Owned, row-major, interleaved 8-bit image
//! - [`Error`] / [`Result`] - Buffer construction and addressing errors
//!
//! ## Crate Structure
//!
//! ```text
//! kfilter-core (this crate)
//!    ^
//!    |
//!    +-- kfilter-io (decode / encode)
//!    +-- kfilter-ops (kernels, convolution, parallel execution)
//!    +-- kfilter-cli
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod image;

pub use error::{Error, Result};
pub use image::ImageBuffer;
