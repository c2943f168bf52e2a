//! Reductions over matrices and 1-D sample sequences.
//!
//! All reductions use a single running accumulator. Variance and covariance
//! are population forms (divide by `n`).

use super::Matrix;

/// Sum of every cell.
pub fn sum2d(m: &Matrix) -> f64 {
    let mut out = 0.0;
    for &v in m.data() {
        out += v;
    }
    out
}

/// Arithmetic mean of every cell. `NaN` for an empty matrix.
pub fn mean2d(m: &Matrix) -> f64 {
    sum2d(m) / m.data().len() as f64
}

/// Arithmetic mean of a sequence.
pub fn average(values: &[f64]) -> f64 {
    let mut out = 0.0;
    for &v in values {
        out += v;
    }
    out / values.len() as f64
}

/// Population variance `Σ(x - avg)² / n`.
///
/// Pass `avg` when the mean is already known to skip recomputing it.
pub fn variance(values: &[f64], avg: Option<f64>) -> f64 {
    let avg = avg.unwrap_or_else(|| average(values));
    let mut acc = 0.0;
    for &v in values.iter().rev() {
        let d = v - avg;
        acc += d * d;
    }
    acc / values.len() as f64
}

/// Population covariance `Σ(x - avg_x)(y - avg_y) / n`.
///
/// `xs` and `ys` must have the same length; debug builds panic otherwise.
pub fn covariance(xs: &[f64], ys: &[f64], avg_x: Option<f64>, avg_y: Option<f64>) -> f64 {
    debug_assert_eq!(xs.len(), ys.len(), "covariance of sequences of unequal length");
    let avg_x = avg_x.unwrap_or_else(|| average(xs));
    let avg_y = avg_y.unwrap_or_else(|| average(ys));
    let mut acc = 0.0;
    for (&x, &y) in xs.iter().zip(ys.iter()).rev() {
        acc += (x - avg_x) * (y - avg_y);
    }
    acc / xs.len() as f64
}

#[cfg(test)]
mod tests {
    use super::{average, covariance, mean2d, sum2d, variance};
    use crate::matrix::Matrix;

    #[test]
    fn sum_and_mean_cover_all_cells() {
        let m = Matrix::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3, 2).unwrap();
        assert_eq!(sum2d(&m), 21.0);
        assert_eq!(mean2d(&m), 3.5);
    }

    #[test]
    fn variance_is_population_form() {
        let xs = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(average(&xs), 5.0);
        assert_eq!(variance(&xs, None), 4.0);
        assert_eq!(variance(&xs, Some(5.0)), 4.0);
    }

    #[test]
    fn covariance_of_sequence_with_itself_is_variance() {
        let xs = [1.0, 3.0, 7.0, 2.0, 8.0];
        let avg = average(&xs);
        assert_eq!(
            covariance(&xs, &xs, Some(avg), Some(avg)),
            variance(&xs, Some(avg))
        );
        let ys = [2.0, 6.0, 14.0, 4.0, 16.0];
        assert!((covariance(&xs, &ys, None, None) - 2.0 * variance(&xs, None)).abs() < 1e-12);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "unequal length")]
    fn covariance_rejects_unequal_lengths() {
        covariance(&[1.0, 2.0, 3.0], &[1.0, 2.0], None, None);
    }
}
