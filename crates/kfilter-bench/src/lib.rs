//! Shared inputs for kfilter benchmarks.

use kfilter_core::{ImageBuffer, Result};

/// Deterministic noise image of the given shape.
pub fn noise_image(width: u32, height: u32, channels: u32) -> Result<ImageBuffer> {
    let mut state = 0x9e37_79b9u32;
    let data = (0..width as usize * height as usize * channels as usize)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        })
        .collect();
    ImageBuffer::from_raw(width, height, channels, data)
}
