//! # kfilter-io
//!
//! Decode and encode collaborators for the kfilter pipeline.
//!
//! - [`read`] - decode PNG or JPEG into an [`ImageBuffer`], format auto-detected
//! - [`write`] - encode an [`ImageBuffer`] as lossless PNG
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use kfilter_io::{read, write};
//!
//! let image = read("input.jpg")?;
//! write("output.png", &image)?;
//! ```
//!
//! # Supported Formats
//!
//! | Format | Read | Write | Channels |
//! |--------|------|-------|----------|
//! | PNG | Yes | Yes | 1, 2, 3, 4 |
//! | JPEG | Yes | No | 1, 3 |
//!
//! # Feature Flags
//!
//! - `png` - PNG support (default)
//! - `jpeg` - JPEG decoding (default)

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod detect;
mod error;

#[cfg(feature = "png")]
pub mod png;

#[cfg(feature = "jpeg")]
pub mod jpeg;

pub use detect::Format;
pub use error::{IoError, IoResult};
pub use kfilter_core::ImageBuffer;

use std::path::Path;
use tracing::debug;

/// Reads an image from a file, auto-detecting the format.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be opened
/// - The format is not supported
/// - The file is corrupted
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<ImageBuffer> {
    let path = path.as_ref();
    let format = Format::detect(path)?;
    debug!(path = %path.display(), ?format, "decoding");

    let image = match format {
        #[cfg(feature = "png")]
        Format::Png => png::read(path),

        #[cfg(feature = "jpeg")]
        Format::Jpeg => jpeg::read(path),

        _ => Err(unsupported(path)),
    }?;

    debug!(
        width = image.width(),
        height = image.height(),
        channels = image.channels(),
        "decoded"
    );
    Ok(image)
}

/// Writes an image as PNG.
///
/// The output is always lossless: a path with a JPEG extension is rejected
/// instead of silently writing PNG bytes under a misleading name. Paths with
/// no or unknown extension are written as PNG.
///
/// # Errors
///
/// Returns an error if the format is not writable, the channel count is not
/// 1..=4, or the file cannot be created.
pub fn write<P: AsRef<Path>>(path: P, image: &ImageBuffer) -> IoResult<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), "encoding");

    match Format::from_extension(path) {
        #[cfg(feature = "png")]
        Format::Png | Format::Unknown => png::write(path, image),

        _ => Err(unsupported(path)),
    }
}

fn unsupported(path: &Path) -> IoError {
    IoError::UnsupportedFormat(
        path.extension()
            .and_then(|e| e.to_str())
            .unwrap_or("unknown")
            .to_string(),
    )
}

/// Writes `bytes` to a temporary file next to `path`, then renames it into place.
#[cfg(feature = "png")]
pub(crate) fn persist(path: &Path, bytes: &[u8]) -> IoResult<()> {
    use std::io::Write;

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| IoError::Io(e.error))?;
    Ok(())
}
