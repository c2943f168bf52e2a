//! Gaussian-window statistics: the dense reference and the separable fast path.
//!
//! Both providers compute the same five filtered moments
//!
//! ```text
//! μx = F(x)   μy = F(y)   σx² = F(x²) - μx²   σy² = F(y²) - μy²   σxy = F(xy) - μx·μy
//! ```
//!
//! and differ only in how `F` is evaluated. With the `rayon` feature the five
//! filters run concurrently; each one is computed by the same code either way.
//!
//! A window larger than the image leaves no valid position, so the maps come
//! back empty and the mean score is `NaN`.

use crate::conv::{conv2, Kernel, Shape};
use crate::filter::{filter2, fspecial, gaussian_window};
use crate::matrix::{multiply2d, square2d, subtract2d, Matrix};
use crate::trace::trace_span;
use crate::util::SsimResult;

use super::combine::{LocalStats, ScoreForm, Stabilizers};
use super::StatisticsProvider;

/// Standard deviation of the SSIM Gaussian window.
pub const WINDOW_SIGMA: f64 = 1.5;

/// MATLAB reference: `filter2(fspecial('gaussian', ws, 1.5), X, 'valid')`.
#[derive(Clone, Debug)]
pub struct ReferenceGaussian {
    window: Matrix,
    parallel: bool,
}

impl ReferenceGaussian {
    /// Builds the normalized `window_size x window_size` window.
    pub fn new(window_size: usize) -> SsimResult<Self> {
        Ok(Self {
            window: fspecial(window_size, WINDOW_SIGMA)?,
            parallel: cfg!(feature = "rayon"),
        })
    }

    /// Chooses concurrent moment filtering. Without the `rayon` feature the
    /// filters always run in sequence.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// The 2-D window.
    pub fn window(&self) -> &Matrix {
        &self.window
    }
}

impl StatisticsProvider for ReferenceGaussian {
    fn name(&self) -> &'static str {
        "original"
    }

    fn local_stats(&self, a: &Matrix, b: &Matrix) -> SsimResult<LocalStats> {
        let _span = trace_span!("reference_moments", window = self.window.width()).entered();
        moments(a, b, self.parallel, &|m: &Matrix| {
            filter2(&self.window, m, Shape::Valid)
        })
    }

    fn score_form(&self, k: Stabilizers) -> ScoreForm {
        ScoreForm::gaussian(k)
    }
}

/// Separable path: a normalized 1-D `normpdf` row and its transpose through
/// `conv2(..., 'valid')`.
#[derive(Clone, Debug)]
pub struct SeparableGaussian {
    row: Matrix,
    column: Matrix,
    parallel: bool,
}

impl SeparableGaussian {
    /// Builds the 1-D window of length `2 * (window_size / 2) + 1`.
    pub fn new(window_size: usize) -> SsimResult<Self> {
        let row = gaussian_window(window_size, WINDOW_SIGMA)?;
        let column = row.transpose();
        Ok(Self {
            row,
            column,
            parallel: cfg!(feature = "rayon"),
        })
    }

    /// See [`ReferenceGaussian::with_parallel`].
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// The 1-D window as a row vector.
    pub fn window(&self) -> &Matrix {
        &self.row
    }
}

impl StatisticsProvider for SeparableGaussian {
    fn name(&self) -> &'static str {
        "fast"
    }

    fn local_stats(&self, a: &Matrix, b: &Matrix) -> SsimResult<LocalStats> {
        let extent = self.row.width();
        let _span = trace_span!("separable_moments", window = extent).entered();
        let kernel = Kernel::separable(&self.row, &self.column)?;
        moments(a, b, self.parallel, &|m: &Matrix| conv2(m, kernel, Shape::Valid))
    }

    fn score_form(&self, k: Stabilizers) -> ScoreForm {
        ScoreForm::gaussian(k)
    }
}

type Filter<'f> = dyn Fn(&Matrix) -> SsimResult<Matrix> + Sync + 'f;

fn moments(a: &Matrix, b: &Matrix, parallel: bool, filter: &Filter<'_>) -> SsimResult<LocalStats> {
    a.same_shape(b)?;
    let a_sq = square2d(a);
    let b_sq = square2d(b);
    let ab = multiply2d(a, b)?;

    let [mean_x, mean_y, filt_a_sq, filt_b_sq, filt_ab] = if parallel {
        filter_all_parallel(filter, [a, b, &a_sq, &b_sq, &ab])?
    } else {
        filter_all_sequential(filter, [a, b, &a_sq, &b_sq, &ab])?
    };

    let var_x = subtract2d(&filt_a_sq, &square2d(&mean_x))?;
    let var_y = subtract2d(&filt_b_sq, &square2d(&mean_y))?;
    let cov_xy = subtract2d(&filt_ab, &multiply2d(&mean_x, &mean_y)?)?;

    Ok(LocalStats {
        mean_x,
        mean_y,
        var_x,
        var_y,
        cov_xy,
    })
}

fn filter_all_sequential(filter: &Filter<'_>, inputs: [&Matrix; 5]) -> SsimResult<[Matrix; 5]> {
    let [a, b, c, d, e] = inputs;
    Ok([filter(a)?, filter(b)?, filter(c)?, filter(d)?, filter(e)?])
}

#[cfg(feature = "rayon")]
fn filter_all_parallel(filter: &Filter<'_>, inputs: [&Matrix; 5]) -> SsimResult<[Matrix; 5]> {
    let [a, b, c, d, e] = inputs;
    let ((fa, fb), (fc, (fd, fe))) = rayon::join(
        || rayon::join(|| filter(a), || filter(b)),
        || rayon::join(|| filter(c), || rayon::join(|| filter(d), || filter(e))),
    );
    Ok([fa?, fb?, fc?, fd?, fe?])
}

#[cfg(not(feature = "rayon"))]
fn filter_all_parallel(filter: &Filter<'_>, inputs: [&Matrix; 5]) -> SsimResult<[Matrix; 5]> {
    filter_all_sequential(filter, inputs)
}
