/// Errors returned by the grayscale kernels.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LumaError {
    #[error("invalid image dimensions (width={width}, height={height})")]
    InvalidDimension { width: usize, height: usize },

    #[error("pixel ({x}, {y}) is outside a {width}x{height} grid")]
    IndexOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    #[error("unsupported expansion mode {0} (expected 0 or 1)")]
    UnsupportedMode(u32),

    #[error("invalid RGB buffer length (expected {expected} bytes, got {got})")]
    InvalidBuffer { expected: usize, got: usize },
}
