//! Image file I/O plus JSON configuration and report helpers.

use std::{
    fs,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use image::{ImageError, ImageFormat, ImageReader};
use luma_convert_core::{ExpandParams, ExpansionMode, LumaError, PackPolicy, ReductionMethod, RgbImage};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::ConvertError;

fn default_input_path() -> String {
    "input.png".to_string()
}

/// Decode any format the `image` crate understands into an RGB8 grid.
///
/// The format is sniffed from the file contents, falling back to the
/// extension. Alpha, if present, is dropped.
pub fn load_rgb(path: impl AsRef<Path>) -> Result<RgbImage, ConvertError> {
    let path = path.as_ref();
    let load_err = |source| ConvertError::Load {
        path: path.to_path_buf(),
        source,
    };
    let decoded = ImageReader::open(path)
        .and_then(ImageReader::with_guessed_format)
        .map_err(|e| load_err(ImageError::IoError(e)))?
        .decode()
        .map_err(load_err)?
        .to_rgb8();
    Ok(from_image_buffer(decoded)?)
}

/// Encode `img` into a hidden temporary file next to `path`.
///
/// The format follows the extension of `path`. Nothing exists at `path`
/// until the returned file is persisted; dropping it removes the temporary.
pub fn stage_rgb(img: &RgbImage, path: &Path) -> Result<NamedTempFile, ConvertError> {
    let save_err = |source| ConvertError::Save {
        path: path.to_path_buf(),
        source,
    };
    let format = ImageFormat::from_path(path).map_err(save_err)?;
    let buf = to_image_buffer(img)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = tempfile::Builder::new()
        .prefix(".luma-convert-")
        .tempfile_in(dir)
        .map_err(|e| save_err(ImageError::IoError(e)))?;

    let mut writer = BufWriter::new(staged.as_file_mut());
    buf.write_to(&mut writer, format).map_err(save_err)?;
    writer
        .flush()
        .map_err(|e| save_err(ImageError::IoError(e)))?;
    drop(writer);
    Ok(staged)
}

/// Move a staged file into its final place.
pub fn commit_staged(staged: NamedTempFile, path: &Path) -> Result<(), ConvertError> {
    staged
        .persist(path)
        .map(|_| ())
        .map_err(|e| ConvertError::Save {
            path: path.to_path_buf(),
            source: ImageError::IoError(e.error),
        })
}

/// Encode `img` to `path`; the format follows the file extension.
///
/// The file appears at `path` only once it is completely written.
pub fn save_rgb(img: &RgbImage, path: impl AsRef<Path>) -> Result<(), ConvertError> {
    let path = path.as_ref();
    let staged = stage_rgb(img, path)?;
    commit_staged(staged, path)
}

/// Convert an `image::RgbImage` into the core grid type.
pub fn from_image_buffer(buf: image::RgbImage) -> Result<RgbImage, LumaError> {
    let (w, h) = buf.dimensions();
    RgbImage::from_raw(w as usize, h as usize, buf.into_raw())
}

/// Convert a core grid into an `image::RgbImage`.
pub fn to_image_buffer(img: &RgbImage) -> Result<image::RgbImage, LumaError> {
    let invalid = LumaError::InvalidDimension {
        width: img.width(),
        height: img.height(),
    };
    let w = u32::try_from(img.width()).map_err(|_| invalid.clone())?;
    let h = u32::try_from(img.height()).map_err(|_| invalid)?;
    image::RgbImage::from_raw(w, h, img.data().to_vec()).ok_or(LumaError::InvalidBuffer {
        expected: img.width() * img.height() * 3,
        got: img.data().len(),
    })
}

/// One requested output file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSpec {
    pub method: ReductionMethod,
    #[serde(default)]
    pub mode: ExpansionMode,
    #[serde(default)]
    pub pack: PackPolicy,
    /// Destination; defaults to a name derived from the input, see
    /// [`ConvertConfig::output_path`].
    #[serde(default)]
    pub path: Option<String>,
}

impl OutputSpec {
    pub fn new(method: ReductionMethod) -> Self {
        Self {
            method,
            mode: ExpansionMode::default(),
            pack: PackPolicy::default(),
            path: None,
        }
    }

    pub fn expand_params(&self) -> ExpandParams {
        ExpandParams::new(self.mode, self.pack)
    }
}

/// Configuration for a conversion run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertConfig {
    #[serde(default = "default_input_path")]
    pub input_path: String,
    /// Empty means one direct-mode output per reduction method.
    #[serde(default)]
    pub outputs: Vec<OutputSpec>,
    #[serde(default)]
    pub output_dir: Option<String>,
    #[serde(default)]
    pub report_path: Option<String>,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self::for_input(default_input_path())
    }
}

impl ConvertConfig {
    /// Method A and Method B, both in direct mode, written beside `input`.
    pub fn for_input(input: impl Into<String>) -> Self {
        Self {
            input_path: input.into(),
            outputs: ReductionMethod::ALL.into_iter().map(OutputSpec::new).collect(),
            output_dir: None,
            report_path: None,
        }
    }

    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConvertError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConvertError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Requested outputs, falling back to the two-method default.
    pub fn output_specs(&self) -> Vec<OutputSpec> {
        if self.outputs.is_empty() {
            ReductionMethod::ALL.into_iter().map(OutputSpec::new).collect()
        } else {
            self.outputs.clone()
        }
    }

    /// Resolve the destination of `spec`.
    ///
    /// Explicit paths are used verbatim. Generated names are
    /// `<stem>_gray_<A|B>[_m0][_clamp].png`, where the suffixes mark a
    /// non-default mode or pack policy, and land in `output_dir` when set,
    /// otherwise next to the input.
    pub fn output_path(&self, spec: &OutputSpec) -> PathBuf {
        if let Some(path) = spec.path.as_ref() {
            return PathBuf::from(path);
        }
        let input = Path::new(&self.input_path);
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let mut name = format!("{stem}_gray_{}", spec.method.label());
        if spec.mode != ExpansionMode::default() {
            name.push_str(&format!("_m{}", u32::from(spec.mode)));
        }
        if spec.pack != PackPolicy::default() {
            name.push_str("_clamp");
        }
        name.push_str(".png");
        match self.output_dir.as_ref() {
            Some(dir) => Path::new(dir).join(name),
            None => input.with_file_name(name),
        }
    }

    pub fn report_path(&self) -> Option<PathBuf> {
        self.report_path.as_ref().map(PathBuf::from)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimingsMs {
    pub load_image: u64,
    pub convert: u64,
    pub save: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputReport {
    pub method: ReductionMethod,
    pub mode: ExpansionMode,
    pub pack: PackPolicy,
    pub path: String,
}

/// Summary of a finished run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertReport {
    pub input_path: String,
    pub width: usize,
    pub height: usize,
    pub outputs: Vec<OutputReport>,
    pub timings_ms: TimingsMs,
}

impl ConvertReport {
    /// Load a report from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConvertError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConvertError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
