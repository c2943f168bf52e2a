//! Shape cropping shared by every convolution path.

use super::Shape;
use crate::matrix::Matrix;
use crate::util::math::ceil_div;

/// Sub-rectangle of a full convolution selected by a [`Shape`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropWindow {
    /// First row of the full result to keep.
    pub row: usize,
    /// First column of the full result to keep.
    pub col: usize,
    /// Number of rows kept.
    pub height: usize,
    /// Number of columns kept.
    pub width: usize,
}

/// Computes the crop for an `a_height x a_width` input convolved with a
/// `k_height x k_width` kernel.
///
/// The full result is `(a_height + k_height - 1) x (a_width + k_width - 1)`.
/// `Same` keeps the centered `a_height x a_width` block starting at
/// `ceil((full - a) / 2)`; `Valid` keeps the cells computed without implicit
/// zero padding, starting at `(k_height - 1, k_width - 1)`.
pub fn crop_window(
    shape: Shape,
    a_height: usize,
    a_width: usize,
    k_height: usize,
    k_width: usize,
) -> CropWindow {
    let full_height = a_height + k_height - 1;
    let full_width = a_width + k_width - 1;
    match shape {
        Shape::Full => CropWindow {
            row: 0,
            col: 0,
            height: full_height,
            width: full_width,
        },
        Shape::Same => CropWindow {
            row: ceil_div(full_height - a_height, 2),
            col: ceil_div(full_width - a_width, 2),
            height: a_height,
            width: a_width,
        },
        Shape::Valid => {
            let height = (a_height + 1).saturating_sub(k_height);
            let width = (a_width + 1).saturating_sub(k_width);
            CropWindow {
                row: k_height - 1,
                col: k_width - 1,
                height: if width == 0 { 0 } else { height },
                width: if height == 0 { 0 } else { width },
            }
        }
    }
}

/// Applies `shape` to a full convolution result.
pub(crate) fn crop(
    full: Matrix,
    shape: Shape,
    a_height: usize,
    a_width: usize,
    k_height: usize,
    k_width: usize,
) -> Matrix {
    let window = crop_window(shape, a_height, a_width, k_height, k_width);
    if window.row == 0
        && window.col == 0
        && window.height == full.height()
        && window.width == full.width()
    {
        return full;
    }
    full.sub_unchecked(window.row, window.col, window.height, window.width)
}
