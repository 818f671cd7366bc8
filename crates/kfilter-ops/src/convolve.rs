//! Per-pixel 3x3 convolution.
//!
//! Each output sample depends only on the source image and the kernel, never
//! on another output sample, so any number of workers may call into this
//! module concurrently over disjoint destination rows.
//!
//! Border policy is clamp-to-edge: out-of-range neighbor coordinates are
//! replaced by the nearest edge row/column. Channels are never mixed. The
//! weighted sum is clamped to `[0, 255]` and truncated toward zero.
//!
//! # Example
//!
//! ```rust
//! use kfilter_core::ImageBuffer;
//! use kfilter_ops::convolve::convolve;
//! use kfilter_ops::kernel::KernelKind;
//!
//! let src = ImageBuffer::from_raw(2, 2, 1, vec![10, 20, 30, 40]).unwrap();
//! let out = convolve(&src, &KernelKind::Identity.kernel()).unwrap();
//! assert_eq!(out, src);
//! ```

use crate::kernel::Kernel;
use crate::partition::RowRange;
use crate::OpsResult;
use kfilter_core::ImageBuffer;
use tracing::{debug, trace};

/// Clamped neighbor coordinates of `(x, y)`.
///
/// Returns `([x-1, x, x+1], [y-1, y, y+1])` with each entry clamped into
/// `[0, width)` / `[0, height)`. Requires `x < width` and `y < height`.
#[inline]
pub fn clamped_neighbors(x: u32, y: u32, width: u32, height: u32) -> ([u32; 3], [u32; 3]) {
    debug_assert!(x < width && y < height);
    (
        [x.saturating_sub(1), x, (x + 1).min(width - 1)],
        [y.saturating_sub(1), y, (y + 1).min(height - 1)],
    )
}

/// Computes one output sample.
///
/// # Panics
///
/// Panics if `(x, y, channel)` is outside `source`.
#[inline]
pub fn compute_pixel(source: &ImageBuffer, x: u32, y: u32, channel: u32, kernel: &Kernel) -> u8 {
    let (xs, ys) = clamped_neighbors(x, y, source.width(), source.height());
    let taps = kernel.taps();

    let mut sum = 0.0f64;
    for (row, &sy) in ys.iter().enumerate() {
        for (col, &sx) in xs.iter().enumerate() {
            sum += taps[row][col] * source.sample(sx, sy, channel) as f64;
        }
    }

    (sum / kernel.divisor()).clamp(0.0, 255.0) as u8
}

/// Filters the rows of `range` into `dst_rows`.
///
/// `dst_rows` holds exactly the destination bytes of those rows, i.e.
/// `range.len() * source.row_stride()` bytes starting at row `range.start`.
/// An empty range is a no-op.
pub fn convolve_rows(source: &ImageBuffer, kernel: &Kernel, range: RowRange, dst_rows: &mut [u8]) {
    let stride = source.row_stride();
    debug_assert_eq!(dst_rows.len(), range.len() as usize * stride);
    trace!(start = range.start, end = range.end, "convolve_rows");

    let width = source.width();
    let channels = source.channels();

    for (y, row) in range.rows().zip(dst_rows.chunks_exact_mut(stride)) {
        for x in 0..width {
            let base = x as usize * channels as usize;
            for c in 0..channels {
                row[base + c as usize] = compute_pixel(source, x, y, c, kernel);
            }
        }
    }
}

/// Single-threaded reference convolution.
///
/// # Errors
///
/// Returns an allocation error if the destination cannot be allocated.
pub fn convolve(source: &ImageBuffer, kernel: &Kernel) -> OpsResult<ImageBuffer> {
    debug!(
        width = source.width(),
        height = source.height(),
        channels = source.channels(),
        "convolve"
    );
    let mut dst = source.zeroed_like()?;
    convolve_rows(
        source,
        kernel,
        RowRange::new(0, source.height()),
        dst.as_mut_slice(),
    );
    Ok(dst)
}
