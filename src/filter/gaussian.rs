//! Gaussian kernels: MATLAB `fspecial('gaussian')` and `normpdf`.

use crate::matrix::{divide2d, sum2d, Matrix};
use crate::util::{SsimError, SsimResult};

/// `sqrt(2 * pi)`.
const SQRT_2PI: f64 = 2.506_628_274_631_000_5;

/// Normalized `size x size` Gaussian with standard deviation `sigma`.
///
/// Cell `(x, y)` holds `exp(-((x-c)² + (y-c)²) / (2σ²))` with
/// `c = (size - 1) / 2`, divided by the sum of all cells. Even sizes center
/// between samples.
pub fn fspecial(size: usize, sigma: f64) -> SsimResult<Matrix> {
    if size == 0 {
        return Err(SsimError::InvalidDimensions {
            width: size,
            height: size,
        });
    }
    if !(sigma.is_finite() && sigma > 0.0) {
        return Err(SsimError::invalid_option("sigma", "must be a positive number"));
    }
    let center = (size as f64 - 1.0) / 2.0;
    let denom = 2.0 * sigma * sigma;
    let mut data = Vec::with_capacity(size * size);
    for x in 0..size {
        let dx = x as f64 - center;
        for y in 0..size {
            let dy = y as f64 - center;
            data.push((-(dx * dx + dy * dy) / denom).exp());
        }
    }
    let gauss = Matrix::new(data, size, size)?;
    let total = sum2d(&gauss);
    divide2d(&gauss, total)
}

/// Normal probability density of every cell: `exp(-z²/2) / (σ√(2π))`,
/// `z = (x - mu) / sigma`.
pub fn normpdf(x: &Matrix, mu: f64, sigma: f64) -> Matrix {
    x.map(|v| {
        let z = (v - mu) / sigma;
        (-(z * z) / 2.0).exp() / (sigma * SQRT_2PI)
    })
}

/// Normalized 1-D Gaussian weights as a row vector.
///
/// Samples `normpdf` at the distances `|-r..=r|`, `r = window_size / 2`, and
/// divides by their sum. The outer product of this vector with its transpose
/// equals `fspecial(2r + 1, sigma)`.
pub fn gaussian_window(window_size: usize, sigma: f64) -> SsimResult<Matrix> {
    if window_size == 0 {
        return Err(SsimError::InvalidDimensions {
            width: 0,
            height: 1,
        });
    }
    let radius = (window_size / 2) as isize;
    let distances: Vec<f64> = (-radius..=radius).map(|d| d.unsigned_abs() as f64).collect();
    let len = distances.len();
    let w = normpdf(&Matrix::new(distances, len, 1)?, 0.0, sigma);
    let total = sum2d(&w);
    divide2d(&w, total)
}
