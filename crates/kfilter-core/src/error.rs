//! Error types for kfilter-core operations.
//!
//! # Usage
//!
//! ```rust
//! use kfilter_core::{Error, Result};
//!
//! fn reserve(len: usize) -> Result<Vec<u8>> {
//!     let mut data = Vec::new();
//!     data.try_reserve_exact(len)
//!         .map_err(|e| Error::allocation_failed(len, e.to_string()))?;
//!     Ok(data)
//! }
//!
//! assert!(reserve(16).is_ok());
//! assert!(reserve(usize::MAX).unwrap_err().is_allocation_error());
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or addressing an [`ImageBuffer`](crate::ImageBuffer).
#[derive(Debug, Error)]
pub enum Error {
    /// Memory allocation failed.
    ///
    /// Returned when the system cannot reserve the bytes for a pixel buffer.
    #[error("failed to allocate {requested} bytes: {reason}")]
    AllocationFailed {
        /// Bytes requested
        requested: usize,
        /// Failure reason
        reason: String,
    },

    /// Invalid image dimensions.
    ///
    /// Width, height or channel count is zero, or the buffer size would
    /// overflow `usize`.
    #[error("invalid dimensions: {width}x{height}x{channels} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Requested channel count
        channels: u32,
        /// Reason why dimensions are invalid
        reason: String,
    },

    /// Raw data length does not match `width * height * channels`.
    #[error("buffer holds {got} bytes, expected {expected}")]
    BufferSize {
        /// Bytes implied by the dimensions
        expected: usize,
        /// Bytes supplied
        got: usize,
    },
}

impl Error {
    /// Creates an [`Error::AllocationFailed`] error.
    #[inline]
    pub fn allocation_failed(requested: usize, reason: impl Into<String>) -> Self {
        Self::AllocationFailed {
            requested,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(
        width: u32,
        height: u32,
        channels: u32,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            channels,
            reason: reason.into(),
        }
    }

    /// Returns `true` if this is an allocation error.
    #[inline]
    pub fn is_allocation_error(&self) -> bool {
        matches!(self, Self::AllocationFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocation_failed() {
        let err = Error::allocation_failed(1 << 40, "capacity overflow");
        assert!(err.to_string().contains("capacity overflow"));
        assert!(err.is_allocation_error());
    }

    #[test]
    fn test_invalid_dimensions() {
        let err = Error::invalid_dimensions(0, 10, 3, "width must be > 0");
        let msg = err.to_string();
        assert!(msg.contains("0x10x3"));
        assert!(!err.is_allocation_error());
    }
}
