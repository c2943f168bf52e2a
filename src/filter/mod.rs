//! MATLAB image filtering on top of [`crate::conv`].

use crate::conv::{conv2_auto, Shape};
use crate::matrix::Matrix;
use crate::util::SsimResult;

mod gaussian;
mod pad;

pub use gaussian::{fspecial, gaussian_window, normpdf};
pub use pad::padarray;

/// MATLAB `filter2(h, X, shape)`: correlation of `x` with `h`, i.e. the
/// convolution of `x` with `h` rotated by 180 degrees.
pub fn filter2(h: &Matrix, x: &Matrix, shape: Shape) -> SsimResult<Matrix> {
    conv2_auto(x, &h.rotate180(), shape)
}

/// MATLAB `imfilter(A, f, 'symmetric', shape)` without integer rounding.
///
/// `a` is mirror-padded by half the kernel on each axis so that a `Same`
/// result keeps the input size. `Same` is evaluated as a `valid` correlation
/// of the padded input; `Full` and `Valid` pass through to [`filter2`] on
/// the padded input unchanged.
pub fn imfilter(a: &Matrix, f: &Matrix, shape: Shape) -> SsimResult<Matrix> {
    let padded = pad_for_kernel(a, f.height(), f.width())?;
    let shape = match shape {
        Shape::Same => Shape::Valid,
        other => other,
    };
    filter2(f, &padded, shape)
}

/// Pads by `floor(k / 2)` per axis and drops the trailing row or column on
/// axes where the kernel dimension is even.
fn pad_for_kernel(a: &Matrix, k_height: usize, k_width: usize) -> SsimResult<Matrix> {
    let padded = padarray(a, (k_height / 2, k_width / 2))?;
    let height = padded.height() - usize::from(k_height % 2 == 0);
    let width = padded.width() - usize::from(k_width % 2 == 0);
    if height == padded.height() && width == padded.width() {
        return Ok(padded);
    }
    Ok(padded.sub_unchecked(0, 0, height, width))
}
