use std::path::PathBuf;

use luma_convert_core::LumaError;

/// Errors produced by the file-level pipeline.
#[derive(thiserror::Error, Debug)]
pub enum ConvertError {
    #[error(transparent)]
    Luma(#[from] LumaError),

    #[error("failed to load image {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to save image {}: {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("two outputs resolve to the same file {}", path.display())]
    DuplicateOutput { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
