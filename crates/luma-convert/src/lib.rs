//! Colour to grayscale conversion with two reduction policies.
//!
//! This crate provides:
//! - re-exports of the pixel kernels in `luma-convert-core`
//! - image file loading and saving on top of the `image` crate
//! - a JSON-configurable pipeline that writes one grayscale file per
//!   requested method, plus an optional JSON report
//!
//! ## Quickstart
//!
//! ```no_run
//! use luma_convert::{convert, ConvertConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = ConvertConfig::for_input("photo.png");
//! let report = convert::run(&cfg)?;
//! for out in &report.outputs {
//!     println!("{} -> {}", out.method, out.path);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `luma_convert::core`: grids, reduction methods, expansion modes.
//! - `luma_convert::io`: file I/O, [`ConvertConfig`] and [`ConvertReport`].
//! - `luma_convert::convert`: the end-to-end pipeline.

pub use luma_convert_core as core;

pub use luma_convert_core::{
    ExpandParams, ExpansionMode, GrayscaleImage, LumaError, PackPolicy, ReductionMethod, RgbImage,
};

pub mod convert;
mod error;
pub mod io;

pub use error::ConvertError;
pub use io::{ConvertConfig, ConvertReport, OutputReport, OutputSpec, TimingsMs};
