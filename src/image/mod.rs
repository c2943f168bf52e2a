//! RGBA pixel views and grayscale conversion.
//!
//! `RgbaView` borrows an interleaved 8-bit RGBA buffer with an explicit
//! stride. The stride counts pixels between the starts of consecutive rows,
//! so a stride larger than the width represents padded rows. Alpha is carried
//! but never read by the luma formulas.

use crate::matrix::Matrix;
use crate::ssim::LumaVersion;
use crate::util::{SsimError, SsimResult};

#[cfg(feature = "image-io")]
pub mod io;

/// Bytes per RGBA pixel.
pub const CHANNELS: usize = 4;

/// ITU-R BT.709 luma weights for `[r, g, b]`.
pub const BT709_WEIGHTS: [f64; 3] = [0.2126, 0.7152, 0.0722];

/// MATLAB `rgb2gray` weights for `[r, g, b]`.
pub const MATLAB_WEIGHTS: [f64; 3] = [0.29894, 0.58704, 0.11402];

/// Borrowed RGBA image with an explicit stride.
#[derive(Copy, Clone, Debug)]
pub struct RgbaView<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a> RgbaView<'a> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [u8], width: usize, height: usize) -> SsimResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride in pixels.
    pub fn new(data: &'a [u8], width: usize, height: usize, stride: usize) -> SsimResult<Self> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(SsimError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in pixels between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the `[r, g, b, a]` pixel at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = (y.checked_mul(self.stride)?.checked_add(x)?).checked_mul(CHANNELS)?;
        let px = self.data.get(start..start + CHANNELS)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Returns the interleaved bytes of row `y`, `width * 4` long.
    pub fn row(&self, y: usize) -> Option<&'a [u8]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?.checked_mul(CHANNELS)?;
        let end = start.checked_add(self.width * CHANNELS)?;
        self.data.get(start..end)
    }
}

fn required_len(width: usize, height: usize, stride: usize) -> SsimResult<usize> {
    if width == 0 || height == 0 {
        return Err(SsimError::InvalidDimensions { width, height });
    }
    if stride < width {
        return Err(SsimError::InvalidDimensions {
            width: stride,
            height,
        });
    }
    (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width))
        .and_then(|v| v.checked_mul(CHANNELS))
        .ok_or(SsimError::InvalidDimensions { width, height })
}

/// Converts an RGBA view to a grayscale matrix.
///
/// `Original` keeps the fractional BT.709 luma. `Integer` applies the MATLAB
/// weights and rounds to the nearest integer, as 8-bit MATLAB images do.
pub fn rgb2gray(view: RgbaView<'_>, version: LumaVersion) -> Matrix {
    let (weights, round) = match version {
        LumaVersion::Original => (BT709_WEIGHTS, false),
        LumaVersion::Integer => (MATLAB_WEIGHTS, true),
    };
    let mut data = Vec::with_capacity(view.width() * view.height());
    for y in 0..view.height() {
        let Some(row) = view.row(y) else { break };
        data.extend(row.chunks_exact(CHANNELS).map(|px| {
            let luma = weights[0] * f64::from(px[0])
                + weights[1] * f64::from(px[1])
                + weights[2] * f64::from(px[2]);
            if round {
                (luma + 0.5).floor().min(255.0)
            } else {
                luma
            }
        }));
    }
    Matrix::from_parts(data, view.width(), view.height())
}

#[cfg(test)]
mod tests {
    use super::{rgb2gray, RgbaView};
    use crate::ssim::LumaVersion;
    use crate::util::SsimError;

    #[test]
    fn rejects_short_buffers_and_bad_strides() {
        let data = [0u8; 15];
        assert_eq!(
            RgbaView::from_slice(&data, 2, 2).unwrap_err(),
            SsimError::BufferTooSmall { needed: 16, got: 15 }
        );
        assert!(RgbaView::new(&data, 3, 1, 2).is_err());
        assert!(RgbaView::from_slice(&data, 0, 1).is_err());
    }

    #[test]
    fn stride_skips_padding_pixels() {
        #[rustfmt::skip]
        let data = [
            1, 2, 3, 255,  4, 5, 6, 255,  9, 9, 9, 9,
            7, 8, 9, 255,  10, 11, 12, 255,
        ];
        let view = RgbaView::new(&data, 2, 2, 3).unwrap();
        assert_eq!(view.get(1, 1), Some([10, 11, 12, 255]));
        assert_eq!(view.get(2, 0), None);
        assert_eq!(view.row(1).unwrap().len(), 8);
    }

    #[test]
    fn integer_luma_rounds_matlab_weights() {
        let data = [255, 255, 255, 0, 10, 200, 30, 255, 0, 0, 0, 255, 255, 0, 0, 7];
        let gray = rgb2gray(RgbaView::from_slice(&data, 4, 1).unwrap(), LumaVersion::Integer);
        // 0.29894*10 + 0.58704*200 + 0.11402*30 = 120.8968
        assert_eq!(gray.data(), &[255.0, 121.0, 0.0, 76.0]);
    }

    #[test]
    fn original_luma_keeps_fractions() {
        let data = [100, 50, 25, 0];
        let gray = rgb2gray(RgbaView::from_slice(&data, 1, 1).unwrap(), LumaVersion::Original);
        let expected = 0.2126 * 100.0 + 0.7152 * 50.0 + 0.0722 * 25.0;
        assert!((gray.data()[0] - expected).abs() < 1e-12);
    }
}
