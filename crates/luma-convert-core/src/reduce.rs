//! RGB to intensity reduction.
//!
//! Two policies are supported:
//! - [`ReductionMethod::Average`]: `(r + g + b) / 3` with integer truncation.
//! - [`ReductionMethod::Luminosity`]: ITU-R BT.709 weights
//!   `0.2126 r + 0.7152 g + 0.0722 b`, truncated toward zero.
//!
//! Both are per-pixel pure functions; the grid loop is shared.

use crate::{GrayscaleImage, LumaError, RgbImageView};
use serde::{Deserialize, Serialize};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// BT.709 luma coefficients for red, green and blue.
pub const LUMINOSITY_WEIGHTS: [f64; 3] = [0.2126, 0.7152, 0.0722];

// Same weights in 1/10000 units. They sum to exactly 10000, so an equal-channel
// pixel reduces to itself without floating-point undershoot.
const LUMINOSITY_WEIGHTS_FIXED: [u32; 3] = [2126, 7152, 722];
const LUMINOSITY_SCALE: u32 = 10_000;

/// How an RGB triple is reduced to a single intensity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReductionMethod {
    /// Method A: truncated mean of the three channels.
    #[serde(alias = "a", alias = "A")]
    Average,
    /// Method B: BT.709 weighted luminosity.
    #[serde(alias = "b", alias = "B")]
    Luminosity,
}

impl ReductionMethod {
    pub const ALL: [ReductionMethod; 2] = [ReductionMethod::Average, ReductionMethod::Luminosity];

    /// Intensity of one pixel. Always within `0..=255` for 8-bit inputs.
    #[inline]
    pub fn apply(self, r: u8, g: u8, b: u8) -> u16 {
        let (r, g, b) = (u32::from(r), u32::from(g), u32::from(b));
        let gray = match self {
            ReductionMethod::Average => (r + g + b) / 3,
            ReductionMethod::Luminosity => {
                let [wr, wg, wb] = LUMINOSITY_WEIGHTS_FIXED;
                (wr * r + wg * g + wb * b) / LUMINOSITY_SCALE
            }
        };
        gray as u16
    }

    /// Short tag used in default output file names.
    pub fn label(self) -> &'static str {
        match self {
            ReductionMethod::Average => "A",
            ReductionMethod::Luminosity => "B",
        }
    }
}

impl std::fmt::Display for ReductionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReductionMethod::Average => f.write_str("average"),
            ReductionMethod::Luminosity => f.write_str("luminosity"),
        }
    }
}

#[inline]
fn reduce_row(method: ReductionMethod, src: &[u8], dst: &mut [u16]) {
    for (rgb, out) in src.chunks_exact(3).zip(dst.iter_mut()) {
        *out = method.apply(rgb[0], rgb[1], rgb[2]);
    }
}

/// Reduce every pixel of `src` with `method`. The output has the same shape.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(src), fields(width = src.width, height = src.height))
)]
pub fn reduce(src: &RgbImageView<'_>, method: ReductionMethod) -> Result<GrayscaleImage, LumaError> {
    let mut out = GrayscaleImage::new(src.width, src.height)?;
    let width = src.width;

    #[cfg(feature = "rayon")]
    out.samples_mut()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, dst)| reduce_row(method, src.row(y), dst));

    #[cfg(not(feature = "rayon"))]
    out.samples_mut()
        .chunks_mut(width)
        .enumerate()
        .for_each(|(y, dst)| reduce_row(method, src.row(y), dst));

    log::debug!("reduced {}x{} grid with {method}", src.width, src.height);
    Ok(out)
}

/// Method A over a whole grid.
pub fn convert_method_a(src: &RgbImageView<'_>) -> Result<GrayscaleImage, LumaError> {
    reduce(src, ReductionMethod::Average)
}

/// Method B over a whole grid.
pub fn convert_method_b(src: &RgbImageView<'_>) -> Result<GrayscaleImage, LumaError> {
    reduce(src, ReductionMethod::Luminosity)
}
