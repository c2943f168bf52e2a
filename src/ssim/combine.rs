//! The SSIM formula shared by every statistics provider.

use crate::matrix::Matrix;
use crate::sat::WindowMoments;
use crate::util::SsimResult;

use super::options::Options;

/// Luminance and contrast stabilizers `c1 = (k1·L)²`, `c2 = (k2·L)²`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stabilizers {
    pub c1: f64,
    pub c2: f64,
}

impl Stabilizers {
    /// Derives the constants from `k1`, `k2` and the bit depth.
    pub fn from_options(options: &Options) -> Self {
        let range = options.dynamic_range();
        let c1 = options.k1 * range;
        let c2 = options.k2 * range;
        Self {
            c1: c1 * c1,
            c2: c2 * c2,
        }
    }

    /// True when either constant is zero.
    pub fn is_degenerate(&self) -> bool {
        self.c1 == 0.0 || self.c2 == 0.0
    }
}

/// Closed form used to turn window moments into a score.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScoreForm {
    /// Stabilized SSIM. `c1` and `c2` are added even when zero.
    #[default]
    Stabilized,
    /// Universal Quality Index: both stabilizers are left out.
    Uqi,
}

impl ScoreForm {
    /// Gaussian-window rule: a zero `c1` or `c2` drops both stabilizers.
    pub fn gaussian(k: Stabilizers) -> Self {
        if k.is_degenerate() {
            ScoreForm::Uqi
        } else {
            ScoreForm::Stabilized
        }
    }
}

/// Per-window statistics of an image pair laid out as maps of equal size.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalStats {
    pub mean_x: Matrix,
    pub mean_y: Matrix,
    pub var_x: Matrix,
    pub var_y: Matrix,
    pub cov_xy: Matrix,
}

impl LocalStats {
    /// Shape shared by all five maps.
    pub fn size(&self) -> (usize, usize) {
        self.mean_x.size()
    }

    fn check_shapes(&self) -> SsimResult<()> {
        self.mean_x.same_shape(&self.mean_y)?;
        self.mean_x.same_shape(&self.var_x)?;
        self.mean_x.same_shape(&self.var_y)?;
        self.mean_x.same_shape(&self.cov_xy)
    }

    /// Moments at row-major cell `index`.
    fn at(&self, index: usize) -> WindowMoments {
        WindowMoments {
            mean_x: self.mean_x.data()[index],
            mean_y: self.mean_y.data()[index],
            var_x: self.var_x.data()[index],
            var_y: self.var_y.data()[index],
            cov_xy: self.cov_xy.data()[index],
        }
    }
}

/// SSIM score of one window.
///
/// ```text
/// (2·μx·μy + c1)(2·σxy + c2) / ((μx² + μy² + c1)(σx² + σy² + c2))
/// ```
///
/// [`ScoreForm::Uqi`] leaves the stabilizers out entirely, so flat windows
/// yield `NaN` rather than 1.
#[inline]
pub fn window_score(m: &WindowMoments, k: Stabilizers, form: ScoreForm) -> f64 {
    let mean_xy = m.mean_x * m.mean_y;
    let mean_sq = m.mean_x * m.mean_x + m.mean_y * m.mean_y;
    let var_sum = m.var_x + m.var_y;
    match form {
        ScoreForm::Uqi => (mean_xy * 2.0) * (m.cov_xy * 2.0) / (mean_sq * var_sum),
        ScoreForm::Stabilized => {
            (mean_xy * 2.0 + k.c1) * (m.cov_xy * 2.0 + k.c2)
                / ((mean_sq + k.c1) * (var_sum + k.c2))
        }
    }
}

/// Applies [`window_score`] to every cell of `stats`.
pub fn combine(stats: &LocalStats, k: Stabilizers, form: ScoreForm) -> SsimResult<Matrix> {
    stats.check_shapes()?;
    let (height, width) = stats.size();
    let data = (0..width * height)
        .map(|i| window_score(&stats.at(i), k, form))
        .collect();
    Ok(Matrix::from_parts(data, width, height))
}
