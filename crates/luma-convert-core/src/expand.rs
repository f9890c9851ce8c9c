//! Intensity grid to opaque RGB.
//!
//! Every sample becomes a gray level `v` and is written to all three
//! channels. Alpha is not stored; the output is always fully opaque.

use std::str::FromStr;

use crate::{GrayscaleImage, LumaError, RgbImage};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// How a stored sample becomes a gray level.
///
/// Serialized as its numeric selector (`0` or `1`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum ExpansionMode {
    /// Selector `0`: the sample is multiplied by 255.
    ///
    /// This treats samples as normalized `0..=1` intensities. Neither
    /// reduction method produces such values, so on their output any
    /// non-zero sample overflows the 8-bit range and the result is decided
    /// by the [`PackPolicy`].
    Normalize,
    /// Selector `1`: the sample is the gray level.
    #[default]
    Direct,
}

impl TryFrom<u32> for ExpansionMode {
    type Error = LumaError;

    fn try_from(mode: u32) -> Result<Self, Self::Error> {
        match mode {
            0 => Ok(ExpansionMode::Normalize),
            1 => Ok(ExpansionMode::Direct),
            other => Err(LumaError::UnsupportedMode(other)),
        }
    }
}

impl From<ExpansionMode> for u32 {
    fn from(mode: ExpansionMode) -> Self {
        match mode {
            ExpansionMode::Normalize => 0,
            ExpansionMode::Direct => 1,
        }
    }
}

/// Narrowing applied when a gray level does not fit in 8 bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackPolicy {
    /// Keep the low 8 bits, as a fixed-width pixel pack would.
    #[default]
    Truncate,
    /// Saturate at 255.
    Clamp,
}

impl FromStr for PackPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "truncate" => Ok(PackPolicy::Truncate),
            "clamp" => Ok(PackPolicy::Clamp),
            other => Err(format!(
                "unknown pack policy '{other}' (expected 'truncate' or 'clamp')"
            )),
        }
    }
}

/// Narrow a gray level to one channel byte.
#[inline]
pub fn pack_gray(level: u32, policy: PackPolicy) -> u8 {
    match policy {
        PackPolicy::Truncate => (level & 0xFF) as u8,
        PackPolicy::Clamp => level.min(255) as u8,
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandParams {
    #[serde(default)]
    pub mode: ExpansionMode,
    #[serde(default)]
    pub pack: PackPolicy,
}

impl ExpandParams {
    pub fn new(mode: ExpansionMode, pack: PackPolicy) -> Self {
        Self { mode, pack }
    }

    #[inline]
    fn gray_level(&self, sample: u16) -> u32 {
        match self.mode {
            ExpansionMode::Normalize => u32::from(sample) * 255,
            ExpansionMode::Direct => u32::from(sample),
        }
    }
}

/// Expand `image` into an RGB grid of the same shape.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "info",
        skip(image, params),
        fields(width = image.width(), height = image.height(), mode = ?params.mode)
    )
)]
pub fn expand(image: &GrayscaleImage, params: &ExpandParams) -> RgbImage {
    let data = image
        .samples()
        .iter()
        .flat_map(|&s| {
            let v = pack_gray(params.gray_level(s), params.pack);
            [v, v, v]
        })
        .collect();

    RgbImage {
        width: image.width(),
        height: image.height(),
        data,
    }
}

/// Expand with a raw mode selector and the default pack policy.
///
/// Fails with [`LumaError::UnsupportedMode`] for anything but `0` or `1`;
/// no grid is produced in that case.
pub fn expand_to_rgb(image: &GrayscaleImage, mode: u32) -> Result<RgbImage, LumaError> {
    let mode = ExpansionMode::try_from(mode)?;
    Ok(expand(image, &ExpandParams::new(mode, PackPolicy::default())))
}
