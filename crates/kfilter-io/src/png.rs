//! PNG format support.
//!
//! Reading keeps the file's native channel count (gray, gray+alpha, RGB,
//! RGBA). Palette images are expanded and 16-bit samples are stripped to
//! 8 bits, since the filter operates on bytes. Writing always produces
//! 8-bit PNG.
//!
//! # Example
//!
//! ```rust,ignore
//! use kfilter_io::png::{read, write};
//!
//! let image = read("input.png")?;
//! write("output.png", &image)?;
//! ```

use crate::{IoError, IoResult};
use kfilter_core::ImageBuffer;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Seek};
use std::path::Path;

/// Reads a PNG file from the given path.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<ImageBuffer> {
    let file = File::open(path.as_ref())?;
    decode(BufReader::new(file))
}

/// Decodes a PNG image held in memory.
pub fn read_from_memory(data: &[u8]) -> IoResult<ImageBuffer> {
    decode(Cursor::new(data))
}

fn decode<R: BufRead + Seek>(reader: R) -> IoResult<ImageBuffer> {
    let mut decoder = png::Decoder::new(reader);
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("cannot determine output buffer size".into()))?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;

    let channels = match (info.color_type, info.bit_depth) {
        (png::ColorType::Grayscale, png::BitDepth::Eight) => 1,
        (png::ColorType::GrayscaleAlpha, png::BitDepth::Eight) => 2,
        (png::ColorType::Rgb, png::BitDepth::Eight) => 3,
        (png::ColorType::Rgba, png::BitDepth::Eight) => 4,
        (color_type, bit_depth) => {
            return Err(IoError::UnsupportedBitDepth(format!(
                "{:?} {:?}",
                color_type, bit_depth
            )));
        }
    };

    // Rows are tightly packed for 8-bit output; `line_size` guards against a
    // decoder that pads them.
    let row_bytes = info.width as usize * channels as usize;
    if info.line_size != row_bytes {
        return Err(IoError::DecodeError(format!(
            "unexpected line size {} for {} bytes per row",
            info.line_size, row_bytes
        )));
    }
    buf.truncate(info.buffer_size());

    Ok(ImageBuffer::from_raw(info.width, info.height, channels, buf)?)
}

/// Encodes an image as an 8-bit PNG in memory.
pub fn write_to_memory(image: &ImageBuffer) -> IoResult<Vec<u8>> {
    let color_type = match image.channels() {
        1 => png::ColorType::Grayscale,
        2 => png::ColorType::GrayscaleAlpha,
        3 => png::ColorType::Rgb,
        4 => png::ColorType::Rgba,
        n => return Err(IoError::EncodeError(format!("unsupported channel count: {}", n))),
    };

    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, image.width(), image.height());
        encoder.set_color(color_type);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::default());

        let mut png_writer = encoder
            .write_header()
            .map_err(|e| IoError::EncodeError(e.to_string()))?;
        png_writer
            .write_image_data(image.as_slice())
            .map_err(|e| IoError::EncodeError(e.to_string()))?;
        png_writer
            .finish()
            .map_err(|e| IoError::EncodeError(e.to_string()))?;
    }
    Ok(out)
}

/// Writes an image to a PNG file.
///
/// The file only appears at `path` once it has been fully written.
pub fn write<P: AsRef<Path>>(path: P, image: &ImageBuffer) -> IoResult<()> {
    let bytes = write_to_memory(image)?;
    crate::persist(path.as_ref(), &bytes)
}
