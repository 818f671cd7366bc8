//! 3x3 convolution kernels and the named kernel catalog.
//!
//! # Kernels
//!
//! | Name | Weights | Sum |
//! |------|---------|-----|
//! | `edge` | Laplacian `0,-1,0 / -1,4,-1 / 0,-1,0` | 0 |
//! | `sharpen` | `0,-1,0 / -1,5,-1 / 0,-1,0` | 1 |
//! | `blur` | uniform 1/9 box | 1 |
//! | `gaussian-blur` | binomial `1,2,1 / 2,4,2 / 1,2,1` over 16 | 1 |
//! | `emboss` | `-2,-1,0 / -1,1,1 / 0,1,2` | 1 |
//! | `identity` | center 1 | 1 |
//!
//! The fixed kernels store integer taps over a divisor, so a uniform region
//! filtered by `blur` or `gaussian-blur` reproduces its value exactly
//! instead of landing a rounding error below it.
//!
//! # Example
//!
//! ```rust
//! use kfilter_ops::kernel::{KernelCatalog, KernelKind};
//!
//! let catalog = KernelCatalog::new();
//! assert_eq!(catalog.resolve("sharpen"), KernelKind::Sharpen);
//! assert_eq!(catalog.resolve("gauss"), KernelKind::GaussianBlur);
//! // Unknown names fall back to identity
//! assert_eq!(catalog.resolve("frobnicate"), KernelKind::Identity);
//! ```

use std::collections::HashMap;
use std::fmt;
use tracing::warn;

/// A 3x3 convolution kernel.
///
/// Row 0 weighs the row above the center pixel, column 0 the column to its
/// left. Effective weight `(row, col)` is `taps[row][col] / divisor`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kernel {
    taps: [[f64; 3]; 3],
    divisor: f64,
}

impl Kernel {
    /// Creates a kernel from real-valued weights.
    pub const fn new(weights: [[f64; 3]; 3]) -> Self {
        Self {
            taps: weights,
            divisor: 1.0,
        }
    }

    /// Integer taps over a non-zero divisor.
    const fn fixed(taps: [[f64; 3]; 3], divisor: f64) -> Self {
        Self { taps, divisor }
    }

    /// Effective weight at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is greater than 2.
    #[inline]
    pub fn weight(&self, row: usize, col: usize) -> f64 {
        self.taps[row][col] / self.divisor
    }

    /// All effective weights.
    pub fn weights(&self) -> [[f64; 3]; 3] {
        let mut out = [[0.0; 3]; 3];
        for (row, taps) in self.taps.iter().enumerate() {
            for (col, tap) in taps.iter().enumerate() {
                out[row][col] = tap / self.divisor;
            }
        }
        out
    }

    /// Sum of effective weights (1.0 for brightness-preserving kernels).
    pub fn sum(&self) -> f64 {
        self.taps.iter().flatten().sum::<f64>() / self.divisor
    }

    #[inline]
    pub(crate) fn taps(&self) -> &[[f64; 3]; 3] {
        &self.taps
    }

    #[inline]
    pub(crate) fn divisor(&self) -> f64 {
        self.divisor
    }
}

const EDGE: Kernel = Kernel::new([[0.0, -1.0, 0.0], [-1.0, 4.0, -1.0], [0.0, -1.0, 0.0]]);
const SHARPEN: Kernel = Kernel::new([[0.0, -1.0, 0.0], [-1.0, 5.0, -1.0], [0.0, -1.0, 0.0]]);
const BLUR: Kernel = Kernel::fixed([[1.0; 3]; 3], 9.0);
const GAUSSIAN_BLUR: Kernel =
    Kernel::fixed([[1.0, 2.0, 1.0], [2.0, 4.0, 2.0], [1.0, 2.0, 1.0]], 16.0);
const EMBOSS: Kernel = Kernel::new([[-2.0, -1.0, 0.0], [-1.0, 1.0, 1.0], [0.0, 1.0, 2.0]]);
const IDENTITY: Kernel = Kernel::new([[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]]);

/// The closed set of built-in kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KernelKind {
    /// Laplacian edge detection.
    Edge,
    /// Laplacian sharpening.
    Sharpen,
    /// Uniform 3x3 box blur.
    Blur,
    /// Binomial-weighted blur.
    GaussianBlur,
    /// Diagonal emboss.
    Emboss,
    /// Pass-through.
    #[default]
    Identity,
}

impl KernelKind {
    /// Every kernel, in catalog order.
    pub const ALL: [KernelKind; 6] = [
        KernelKind::Edge,
        KernelKind::Sharpen,
        KernelKind::Blur,
        KernelKind::GaussianBlur,
        KernelKind::Emboss,
        KernelKind::Identity,
    ];

    /// Canonical lookup name.
    pub fn name(&self) -> &'static str {
        match self {
            KernelKind::Edge => "edge",
            KernelKind::Sharpen => "sharpen",
            KernelKind::Blur => "blur",
            KernelKind::GaussianBlur => "gaussian-blur",
            KernelKind::Emboss => "emboss",
            KernelKind::Identity => "identity",
        }
    }

    /// Weight matrix for this kernel.
    pub fn kernel(&self) -> Kernel {
        match self {
            KernelKind::Edge => EDGE,
            KernelKind::Sharpen => SHARPEN,
            KernelKind::Blur => BLUR,
            KernelKind::GaussianBlur => GAUSSIAN_BLUR,
            KernelKind::Emboss => EMBOSS,
            KernelKind::Identity => IDENTITY,
        }
    }
}

impl fmt::Display for KernelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable mapping from kernel name to [`KernelKind`].
///
/// Built once per run. Lookup is by exact, case-sensitive name; `gauss` is
/// accepted as an alias for `gaussian-blur`.
#[derive(Debug, Clone)]
pub struct KernelCatalog {
    entries: HashMap<&'static str, KernelKind>,
}

impl KernelCatalog {
    /// Builds the catalog of built-in kernels.
    pub fn new() -> Self {
        let mut entries: HashMap<&'static str, KernelKind> =
            KernelKind::ALL.iter().map(|k| (k.name(), *k)).collect();
        entries.insert("gauss", KernelKind::GaussianBlur);
        Self { entries }
    }

    /// Exact lookup, `None` for unknown names.
    pub fn get(&self, name: &str) -> Option<KernelKind> {
        self.entries.get(name).copied()
    }

    /// Resolves a name, falling back to [`KernelKind::Identity`] for unknown names.
    ///
    /// The fallback is not an error; it is logged at `warn` level.
    pub fn resolve(&self, name: &str) -> KernelKind {
        match self.get(name) {
            Some(kind) => kind,
            None => {
                warn!(name, "unknown kernel name, using identity");
                KernelKind::Identity
            }
        }
    }

    /// Canonical kernel names, in catalog order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        KernelKind::ALL.iter().map(|k| k.name())
    }
}

impl Default for KernelCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_every_name_resolves_to_itself() {
        let catalog = KernelCatalog::new();
        for kind in KernelKind::ALL {
            assert_eq!(catalog.get(kind.name()), Some(kind));
        }
        assert_eq!(catalog.names().count(), 6);
    }

    #[test]
    fn test_gauss_alias() {
        let catalog = KernelCatalog::new();
        assert_eq!(catalog.get("gauss"), Some(KernelKind::GaussianBlur));
        assert!(catalog.names().all(|n| n != "gauss"));
    }

    #[test]
    fn test_unknown_falls_back_to_identity() {
        let catalog = KernelCatalog::new();
        assert_eq!(catalog.get("frobnicate"), None);
        assert_eq!(catalog.resolve("frobnicate"), KernelKind::Identity);
        assert_eq!(catalog.resolve("frobnicate").kernel(), IDENTITY);
        // exact match only
        assert_eq!(catalog.resolve("Edge"), KernelKind::Identity);
        assert_eq!(catalog.resolve(" edge"), KernelKind::Identity);
    }

    #[test]
    fn test_weights() {
        assert_eq!(KernelKind::Edge.kernel().weight(1, 1), 4.0);
        assert_eq!(KernelKind::Sharpen.kernel().weight(1, 1), 5.0);
        assert_eq!(KernelKind::Emboss.kernel().weight(0, 0), -2.0);
        assert_eq!(KernelKind::Emboss.kernel().weight(2, 2), 2.0);

        let blur = KernelKind::Blur.kernel().weights();
        for w in blur.iter().flatten() {
            assert_relative_eq!(*w, 1.0 / 9.0);
        }

        let gauss = KernelKind::GaussianBlur.kernel();
        assert_relative_eq!(gauss.weight(0, 0), 1.0 / 16.0);
        assert_relative_eq!(gauss.weight(0, 1), 1.0 / 8.0);
        assert_relative_eq!(gauss.weight(1, 1), 1.0 / 4.0);
    }

    #[test]
    fn test_sums() {
        assert_relative_eq!(KernelKind::Edge.kernel().sum(), 0.0);
        for kind in [
            KernelKind::Sharpen,
            KernelKind::Blur,
            KernelKind::GaussianBlur,
            KernelKind::Emboss,
            KernelKind::Identity,
        ] {
            assert_relative_eq!(kind.kernel().sum(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(KernelKind::GaussianBlur.to_string(), "gaussian-blur");
    }
}
