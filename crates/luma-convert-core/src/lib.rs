//! Core grayscale kernels for dense RGB raster grids.
//!
//! This crate is intentionally small and does no file I/O. An input provider
//! hands in an [`RgbImageView`], one of the [`ReductionMethod`]s turns it into
//! a [`GrayscaleImage`], and [`expand`] turns that back into an opaque
//! [`RgbImage`] ready for an encoder.

mod error;
mod expand;
mod image;
mod logger;
mod reduce;

pub use error::LumaError;
pub use expand::{expand, expand_to_rgb, pack_gray, ExpandParams, ExpansionMode, PackPolicy};
pub use image::{GrayscaleImage, RgbImage, RgbImageView};
pub use reduce::{convert_method_a, convert_method_b, reduce, ReductionMethod, LUMINOSITY_WEIGHTS};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_with_level, level_from_name};
