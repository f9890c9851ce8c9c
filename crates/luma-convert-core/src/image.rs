use crate::LumaError;

const RGB_CHANNELS: usize = 3;

fn checked_len(width: usize, height: usize, channels: usize) -> Result<usize, LumaError> {
    if width == 0 || height == 0 {
        return Err(LumaError::InvalidDimension { width, height });
    }
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(channels))
        .ok_or(LumaError::InvalidDimension { width, height })
}

#[inline]
fn check_bounds(x: usize, y: usize, width: usize, height: usize) -> Result<usize, LumaError> {
    if x >= width || y >= height {
        return Err(LumaError::IndexOutOfBounds {
            x,
            y,
            width,
            height,
        });
    }
    Ok(y * width + x)
}

/// Borrowed RGB8 grid, row-major, 3 bytes per pixel. Alpha is implicitly 255.
///
/// Only built through [`RgbImageView::new`] or [`RgbImage::view`], so the
/// buffer length always matches the dimensions.
#[derive(Clone, Copy, Debug)]
pub struct RgbImageView<'a> {
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) data: &'a [u8], // len = w*h*3
}

impl<'a> RgbImageView<'a> {
    pub fn new(width: usize, height: usize, data: &'a [u8]) -> Result<Self, LumaError> {
        let expected = checked_len(width, height, RGB_CHANNELS)?;
        if data.len() != expected {
            return Err(LumaError::InvalidBuffer {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn pixel(&self, x: usize, y: usize) -> Result<[u8; 3], LumaError> {
        let i = check_bounds(x, y, self.width, self.height)? * RGB_CHANNELS;
        Ok([self.data[i], self.data[i + 1], self.data[i + 2]])
    }

    /// Row `y` as a slice of `width * 3` bytes.
    #[inline]
    pub(crate) fn row(&self, y: usize) -> &'a [u8] {
        let stride = self.width * RGB_CHANNELS;
        &self.data[y * stride..(y + 1) * stride]
    }
}

/// Owned RGB8 grid, the format handed to and produced by the I/O layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbImage {
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) data: Vec<u8>,
}

impl RgbImage {
    /// A black `width x height` grid.
    pub fn new(width: usize, height: usize) -> Result<Self, LumaError> {
        let len = checked_len(width, height, RGB_CHANNELS)?;
        Ok(Self {
            width,
            height,
            data: vec![0; len],
        })
    }

    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, LumaError> {
        RgbImageView::new(width, height, &data)?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Interleaved row-major RGB bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    pub fn view(&self) -> RgbImageView<'_> {
        RgbImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Result<[u8; 3], LumaError> {
        self.view().pixel(x, y)
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, rgb: [u8; 3]) -> Result<(), LumaError> {
        let i = check_bounds(x, y, self.width, self.height)? * RGB_CHANNELS;
        self.data[i..i + RGB_CHANNELS].copy_from_slice(&rgb);
        Ok(())
    }
}

/// Dense grid of intensity samples addressed by `(x, y)`.
///
/// Samples are 16-bit cells and are stored exactly as written: nothing on
/// this type clamps them to `0..=255`. Values above 255 only get narrowed
/// when the grid is packed back into RGB, under the chosen
/// [`PackPolicy`](crate::PackPolicy).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayscaleImage {
    width: usize,
    height: usize,
    samples: Vec<u16>, // row-major, len = w*h
}

impl GrayscaleImage {
    /// Allocate a zero-filled grid. Both dimensions must be positive.
    pub fn new(width: usize, height: usize) -> Result<Self, LumaError> {
        let len = checked_len(width, height, 1)?;
        Ok(Self {
            width,
            height,
            samples: vec![0; len],
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Result<u16, LumaError> {
        let i = check_bounds(x, y, self.width, self.height)?;
        Ok(self.samples[i])
    }

    pub fn set(&mut self, x: usize, y: usize, value: u16) -> Result<(), LumaError> {
        let i = check_bounds(x, y, self.width, self.height)?;
        self.samples[i] = value;
        Ok(())
    }

    /// Row-major sample buffer.
    pub fn samples(&self) -> &[u16] {
        &self.samples
    }

    pub(crate) fn samples_mut(&mut self) -> &mut [u16] {
        &mut self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_zero_filled() {
        let img = GrayscaleImage::new(4, 3).expect("valid dims");
        assert_eq!(img.width(), 4);
        assert_eq!(img.height(), 3);
        assert_eq!(img.samples().len(), 12);
        assert!(img.samples().iter().all(|&s| s == 0));
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        assert_eq!(
            GrayscaleImage::new(0, 5),
            Err(LumaError::InvalidDimension {
                width: 0,
                height: 5
            })
        );
        assert!(matches!(
            GrayscaleImage::new(5, 0),
            Err(LumaError::InvalidDimension { .. })
        ));
        assert!(matches!(
            RgbImage::new(0, 0),
            Err(LumaError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn set_then_get_addresses_by_x_then_y() {
        let mut img = GrayscaleImage::new(3, 2).unwrap();
        img.set(2, 0, 7).unwrap();
        img.set(0, 1, 9).unwrap();
        assert_eq!(img.get(2, 0), Ok(7));
        assert_eq!(img.get(0, 1), Ok(9));
        assert_eq!(img.samples(), &[0, 0, 7, 9, 0, 0]);
    }

    #[test]
    fn samples_above_u8_range_are_kept() {
        let mut img = GrayscaleImage::new(1, 1).unwrap();
        img.set(0, 0, 1000).unwrap();
        assert_eq!(img.get(0, 0), Ok(1000));
    }

    #[test]
    fn out_of_bounds_access_fails() {
        let mut img = GrayscaleImage::new(2, 2).unwrap();
        let err = LumaError::IndexOutOfBounds {
            x: 2,
            y: 0,
            width: 2,
            height: 2,
        };
        assert_eq!(img.set(2, 0, 1), Err(err.clone()));
        assert_eq!(img.get(2, 0), Err(err));
        assert!(img.get(0, 2).is_err());
    }

    #[test]
    fn rgb_buffer_length_is_checked() {
        let err = RgbImage::from_raw(2, 2, vec![0; 11]).unwrap_err();
        assert_eq!(
            err,
            LumaError::InvalidBuffer {
                expected: 12,
                got: 11
            }
        );
    }

    #[test]
    fn short_view_buffer_is_rejected() {
        let data = [0u8; 3];
        assert_eq!(
            RgbImageView::new(2, 2, &data).unwrap_err(),
            LumaError::InvalidBuffer {
                expected: 12,
                got: 3
            }
        );
        let ok = RgbImageView::new(1, 1, &data).unwrap();
        assert_eq!((ok.width(), ok.height(), ok.data().len()), (1, 1, 3));
    }

    #[test]
    fn rgb_pixel_round_trips_through_set() {
        let mut img = RgbImage::new(2, 2).unwrap();
        img.set_pixel(1, 1, [10, 20, 30]).unwrap();
        assert_eq!(img.pixel(1, 1), Ok([10, 20, 30]));
        assert_eq!(&img.data()[9..12], &[10, 20, 30]);
        assert!(img.set_pixel(0, 2, [0, 0, 0]).is_err());
    }
}
