//! Reduces large images before comparison.
//!
//! `Downsample::Original` reproduces the reference scripts: with
//! `f = round(min(w, h) / max_size)`, an image whose factor exceeds one is
//! low-pass filtered by an `f x f` average and then every `f`-th row and
//! column is kept, starting at the first. `Downsample::Fast` resizes while
//! decoding (see `io::load_rgba_limited`), so in memory it is a no-op, as is
//! `Downsample::Off`.

use std::borrow::Cow;

use crate::conv::Shape;
use crate::filter::imfilter;
use crate::matrix::Matrix;
use crate::ssim::{Downsample, Options};
use crate::trace::trace_event;
use crate::util::SsimResult;

/// Downsampling factor for a `width x height` image.
pub fn factor(width: usize, height: usize, max_size: usize) -> usize {
    (width.min(height) as f64 / max_size as f64).round() as usize
}

/// Applies `options.downsample` to both images.
///
/// Images are borrowed unchanged unless the original mode actually reduces them.
pub fn downsample<'a>(
    a: &'a Matrix,
    b: &'a Matrix,
    options: &Options,
) -> SsimResult<(Cow<'a, Matrix>, Cow<'a, Matrix>)> {
    match options.downsample {
        Downsample::Original => {
            let f = factor(a.width(), a.height(), options.max_size);
            if f <= 1 {
                return Ok((Cow::Borrowed(a), Cow::Borrowed(b)));
            }
            trace_event!("downsample", factor = f);
            let lpf = Matrix::filled(f, f, 1.0 / (f * f) as f64)?;
            Ok((
                Cow::Owned(reduce(a, &lpf, f)?),
                Cow::Owned(reduce(b, &lpf, f)?),
            ))
        }
        Downsample::Fast | Downsample::Off => Ok((Cow::Borrowed(a), Cow::Borrowed(b))),
    }
}

/// `imfilter(pixels, lpf, 'symmetric', 'same')` followed by a stride of `f`.
///
/// `lpf` is uniform, so the filter runs on the running-sum path.
fn reduce(pixels: &Matrix, lpf: &Matrix, f: usize) -> SsimResult<Matrix> {
    let filtered = imfilter(pixels, lpf, Shape::Same)?;
    filtered.skip2d((0, f, filtered.height()), (0, f, filtered.width()))
}
