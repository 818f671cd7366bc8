//! Owned 8-bit image buffer.
//!
//! # Memory Layout
//!
//! Samples are stored in **row-major** order, top-to-bottom, with channels
//! interleaved:
//!
//! ```text
//! Memory: [R G B R G B R G B ...]  <- Row 0
//!         [R G B R G B R G B ...]  <- Row 1
//!         ...
//! ```
//!
//! Sample `(x, y, c)` lives at `(y * width + x) * channels + c`. There is no
//! row padding, so a row is exactly [`ImageBuffer::row_stride`] bytes.
//!
//! # Usage
//!
//! ```rust
//! use kfilter_core::ImageBuffer;
//!
//! let mut img = ImageBuffer::new(4, 2, 3).unwrap();
//! img.set_sample(1, 1, 2, 200);
//! assert_eq!(img.sample(1, 1, 2), 200);
//! assert_eq!(img.as_slice().len(), 4 * 2 * 3);
//! ```

use crate::{Error, Result};

/// Owned interleaved `u8` image.
///
/// The invariant `data.len() == width * height * channels` is established by
/// every constructor and cannot be broken afterwards: the buffer only hands
/// out fixed-length slices.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u32,
}

impl ImageBuffer {
    /// Creates a zero-filled image.
    ///
    /// The allocation is fallible: an out-of-memory condition is reported as
    /// [`Error::AllocationFailed`] instead of aborting the process.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDimensions`] if any dimension is zero or the size overflows
    /// - [`Error::AllocationFailed`] if the bytes cannot be reserved
    pub fn new(width: u32, height: u32, channels: u32) -> Result<Self> {
        let len = byte_len(width, height, channels)?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|e| Error::allocation_failed(len, e.to_string()))?;
        data.resize(len, 0);
        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    /// Wraps existing sample data.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDimensions`] if any dimension is zero or the size overflows
    /// - [`Error::BufferSize`] if `data` does not hold exactly `width * height * channels` bytes
    ///
    /// # Example
    ///
    /// ```rust
    /// use kfilter_core::ImageBuffer;
    ///
    /// let img = ImageBuffer::from_raw(2, 2, 1, vec![0, 255, 255, 0]).unwrap();
    /// assert_eq!(img.sample(1, 0, 0), 255);
    /// assert!(ImageBuffer::from_raw(2, 2, 1, vec![0; 3]).is_err());
    /// ```
    pub fn from_raw(width: u32, height: u32, channels: u32, data: Vec<u8>) -> Result<Self> {
        let expected = byte_len(width, height, channels)?;
        if data.len() != expected {
            return Err(Error::BufferSize {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    /// Allocates a zero-filled image with the same shape as `self`.
    pub fn zeroed_like(&self) -> Result<Self> {
        Self::new(self.width, self.height, self.channels)
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of interleaved channels per pixel.
    #[inline]
    pub fn channels(&self) -> u32 {
        self.channels
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Bytes per row.
    #[inline]
    pub fn row_stride(&self) -> usize {
        self.width as usize * self.channels as usize
    }

    /// Returns `true` when both images have equal width, height and channels.
    #[inline]
    pub fn same_shape(&self, other: &ImageBuffer) -> bool {
        self.width == other.width && self.height == other.height && self.channels == other.channels
    }

    /// Flat offset of sample `(x, y, c)`.
    ///
    /// Does not bounds-check; callers index the data slice with it, which does.
    #[inline]
    pub fn offset(&self, x: u32, y: u32, c: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.channels as usize + c as usize
    }

    /// Reads sample `(x, y, c)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn sample(&self, x: u32, y: u32, c: u32) -> u8 {
        debug_assert!(x < self.width && y < self.height && c < self.channels);
        self.data[self.offset(x, y, c)]
    }

    /// Writes sample `(x, y, c)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn set_sample(&mut self, x: u32, y: u32, c: u32, value: u8) {
        debug_assert!(x < self.width && y < self.height && c < self.channels);
        let idx = self.offset(x, y, c);
        self.data[idx] = value;
    }

    /// Raw sample data.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw sample data.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl std::fmt::Debug for ImageBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("channels", &self.channels)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// Validated `width * height * channels`.
fn byte_len(width: u32, height: u32, channels: u32) -> Result<usize> {
    if width == 0 || height == 0 || channels == 0 {
        return Err(Error::invalid_dimensions(
            width,
            height,
            channels,
            "width, height, and channels must be > 0",
        ));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(channels as usize))
        .ok_or_else(|| Error::invalid_dimensions(width, height, channels, "buffer size overflows"))
}
