use kfilter_io::{read, write, Format, ImageBuffer, IoError};
use tempfile::tempdir;

fn gradient(width: u32, height: u32, channels: u32) -> ImageBuffer {
    let data: Vec<u8> = (0..width * height * channels)
        .map(|i| (i * 7 % 256) as u8)
        .collect();
    ImageBuffer::from_raw(width, height, channels, data).unwrap()
}

#[test]
fn png_roundtrip_preserves_every_channel_count() {
    let dir = tempdir().unwrap();
    for channels in 1..=4 {
        let path = dir.path().join(format!("c{channels}.png"));
        let image = gradient(13, 7, channels);

        write(&path, &image).expect("write png");
        let loaded = read(&path).expect("read png");

        assert_eq!(loaded, image, "channels = {channels}");
    }
}

#[test]
fn write_without_extension_is_png() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("output");
    write(&path, &gradient(4, 4, 3)).unwrap();
    assert_eq!(Format::detect(&path).unwrap(), Format::Png);
}

#[test]
fn write_jpeg_extension_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("lossy.jpg");
    let err = write(&path, &gradient(4, 4, 3)).unwrap_err();
    assert!(matches!(err, IoError::UnsupportedFormat(_)));
    assert!(!path.exists());
}

#[test]
fn write_five_channels_leaves_no_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("five.png");
    let err = write(&path, &gradient(2, 2, 5)).unwrap_err();
    assert!(matches!(err, IoError::EncodeError(_)));
    assert!(!path.exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn read_missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let err = read(dir.path().join("missing.png")).unwrap_err();
    assert!(matches!(err, IoError::Io(_)));
}

#[test]
fn read_unknown_format() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, b"hello world").unwrap();
    let err = read(&path).unwrap_err();
    assert!(matches!(err, IoError::UnsupportedFormat(_)));
}

#[test]
fn read_corrupt_png_is_decode_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.png");
    let mut bytes = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend_from_slice(&[0u8; 16]);
    std::fs::write(&path, bytes).unwrap();
    let err = read(&path).unwrap_err();
    assert!(matches!(err, IoError::DecodeError(_)));
}
