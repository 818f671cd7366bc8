//! Golden digest tests.
//!
//! Each test rebuilds a deterministic input, filters it, and compares the
//! SHA-256 of the output bytes against a stored reference. The references
//! were produced by an independent scalar model of the same arithmetic
//! (f64 accumulation, clamp to [0, 255], truncation).

use kfilter_core::ImageBuffer;
use kfilter_ops::{ExecutionStrategy, KernelKind, ParallelExecutor};
use sha2::{Digest, Sha256};
use std::num::NonZeroUsize;

/// Hex SHA-256 of the raw sample bytes.
pub(crate) fn digest(image: &ImageBuffer) -> String {
    let mut hasher = Sha256::new();
    hasher.update(image.as_slice());
    format!("{:x}", hasher.finalize())
}

/// 4x4 single-channel checkerboard, black in the top-left corner.
fn checkerboard() -> ImageBuffer {
    let data = (0..4u32)
        .flat_map(|y| (0..4u32).map(move |x| if (x + y) % 2 == 0 { 0 } else { 255 }))
        .collect();
    ImageBuffer::from_raw(4, 4, 1, data).unwrap()
}

/// 16x9 RGB pattern with no flat regions.
fn pattern() -> ImageBuffer {
    let (w, h, c) = (16u32, 9u32, 3u32);
    let mut data = Vec::with_capacity((w * h * c) as usize);
    for y in 0..h {
        for x in 0..w {
            for ch in 0..c {
                data.push((((x * 17 + y * 29 + ch * 71) ^ (x * y)) & 255) as u8);
            }
        }
    }
    ImageBuffer::from_raw(w, h, c, data).unwrap()
}

fn run_all(src: &ImageBuffer, kind: KernelKind) -> Vec<ImageBuffer> {
    let mut outputs = Vec::new();
    for strategy in [ExecutionStrategy::Pool, ExecutionStrategy::Threads] {
        for workers in [1, 2, 3, src.height() as usize + 3] {
            let exec = ParallelExecutor::new(NonZeroUsize::new(workers).unwrap(), strategy);
            outputs.push(exec.apply(src, &kind.kernel()).unwrap());
        }
    }
    outputs
}

const CHECKERBOARD_DIGEST: &str =
    "f60458950b5fc6a75fc3e955f05784b82de23ef7bc3f7c9f7b1aceede2e5d149";

#[test]
fn test_checkerboard_edge() {
    // Dark pixels see only bright neighbors (sum <= 0) and bright pixels
    // see at most two bright neighbors through edge clamping (sum >= 510),
    // so edge detection reproduces the board.
    let src = checkerboard();
    #[rustfmt::skip]
    let expected: [u8; 16] = [
          0, 255,   0, 255,
        255,   0, 255,   0,
          0, 255,   0, 255,
        255,   0, 255,   0,
    ];

    for out in run_all(&src, KernelKind::Edge) {
        assert_eq!(out.as_slice(), &expected);
        assert_eq!(digest(&out), CHECKERBOARD_DIGEST);
    }
}

#[test]
fn test_pattern_digests() {
    let src = pattern();
    let cases = [
        (KernelKind::Edge, "a082609055d6d69033396ada313592e2d63d65f14c8287e2dfbe452368e40589"),
        (KernelKind::Sharpen, "a29c1af767daf6fc20edbd7ab81ee16dee9fcd2dd83c00fd519bbc546d544315"),
        (KernelKind::Blur, "335729bd004beaa7d71da9a7189d1ed0fba63d328207e89c918fe3facf0be4a7"),
        (KernelKind::GaussianBlur, "9c56eff9fc0add778356ad598fa38c431943bf535c51464c241c7f4047df7564"),
        (KernelKind::Emboss, "3397a5085c4069e7fcb68f37a61dd04b4223486546ede25f1effbe3771743f60"),
        (KernelKind::Identity, "818cd720bf51a5e4035e70c121749842c9169c0c4fafbdd58deb857aa89731e1"),
    ];

    assert_eq!(digest(&src), cases[5].1);
    for (kind, expected) in cases {
        for out in run_all(&src, kind) {
            assert_eq!(digest(&out), expected, "{kind}");
        }
    }
}
