//! JPEG format support (decode only).
//!
//! JPEG is lossy, so it is accepted as filter input but never written.
//! Grayscale files stay single-channel; CMYK is converted to RGB.

use crate::{IoError, IoResult};
use kfilter_core::ImageBuffer;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Reads a JPEG file from the given path.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<ImageBuffer> {
    let file = File::open(path.as_ref())?;
    decode(file)
}

/// Decodes a JPEG image held in memory.
pub fn read_from_memory(data: &[u8]) -> IoResult<ImageBuffer> {
    decode(data)
}

fn decode<R: Read>(reader: R) -> IoResult<ImageBuffer> {
    let mut decoder = jpeg_decoder::Decoder::new(BufReader::new(reader));
    let pixels = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(e.to_string()))?;

    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("missing JPEG info".into()))?;

    let width = info.width as u32;
    let height = info.height as u32;

    let (channels, data) = match info.pixel_format {
        jpeg_decoder::PixelFormat::RGB24 => (3, pixels),
        jpeg_decoder::PixelFormat::L8 => (1, pixels),
        jpeg_decoder::PixelFormat::L16 => {
            // High byte of each big-endian sample
            let gray: Vec<u8> = pixels.chunks_exact(2).map(|l16| l16[0]).collect();
            (1, gray)
        }
        jpeg_decoder::PixelFormat::CMYK32 => {
            // CMYK to RGB (approximate conversion)
            let rgb: Vec<u8> = pixels
                .chunks_exact(4)
                .flat_map(|cmyk| {
                    let c = cmyk[0] as f32 / 255.0;
                    let m = cmyk[1] as f32 / 255.0;
                    let y = cmyk[2] as f32 / 255.0;
                    let k = cmyk[3] as f32 / 255.0;

                    let r = ((1.0 - c) * (1.0 - k) * 255.0) as u8;
                    let g = ((1.0 - m) * (1.0 - k) * 255.0) as u8;
                    let b = ((1.0 - y) * (1.0 - k) * 255.0) as u8;

                    [r, g, b]
                })
                .collect();
            (3, rgb)
        }
    };

    Ok(ImageBuffer::from_raw(width, height, channels, data)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncated_stream_is_decode_error() {
        // SOI marker followed by nothing useful
        let err = read_from_memory(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00]).unwrap_err();
        assert!(matches!(err, IoError::DecodeError(_)));
    }
}
