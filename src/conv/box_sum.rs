//! Box-kernel convolution with running sums.
//!
//! A kernel whose cells all equal `v` is `v * ones(kh, kw)`, and
//! `ones(kh, kw)` is the outer product of two all-ones vectors. The full
//! convolution is therefore a vertical then a horizontal moving sum, each
//! maintained incrementally: add the element entering the window, subtract
//! the one leaving it. Both passes are `O(n)` regardless of kernel size.

use crate::matrix::Matrix;

/// Full convolution of `a` with a `k_height x k_width` box of `value`.
pub(crate) fn conv_full(a: &Matrix, k_height: usize, k_width: usize, value: f64) -> Matrix {
    let vertical = running_sum_cols(a, k_height);
    let mut full = running_sum_rows(&vertical, k_width);
    if value != 1.0 {
        full = full.map(|v| v * value);
    }
    full
}

/// Full moving sum of length `k` down every column: output height `h + k - 1`.
fn running_sum_cols(a: &Matrix, k: usize) -> Matrix {
    let width = a.width();
    let height = a.height();
    let out_height = height + k - 1;
    let src = a.data();
    let mut out = vec![0.0f64; width * out_height];
    let mut sums = vec![0.0f64; width];

    for r in 0..out_height {
        if r < height {
            let row = &src[r * width..(r + 1) * width];
            for (s, &v) in sums.iter_mut().zip(row) {
                *s += v;
            }
        }
        if r >= k {
            let leaving = r - k;
            let row = &src[leaving * width..(leaving + 1) * width];
            for (s, &v) in sums.iter_mut().zip(row) {
                *s -= v;
            }
        }
        out[r * width..(r + 1) * width].copy_from_slice(&sums);
    }

    Matrix::from_parts(out, width, out_height)
}

/// Full moving sum of length `k` along every row: output width `w + k - 1`.
fn running_sum_rows(a: &Matrix, k: usize) -> Matrix {
    let width = a.width();
    let height = a.height();
    let out_width = width + k - 1;
    let src = a.data();
    let mut out = vec![0.0f64; out_width * height];

    for r in 0..height {
        let row = &src[r * width..(r + 1) * width];
        let dst = &mut out[r * out_width..(r + 1) * out_width];
        let mut sum = 0.0f64;
        for (c, d) in dst.iter_mut().enumerate() {
            if c < width {
                sum += row[c];
            }
            if c >= k {
                sum -= row[c - k];
            }
            *d = sum;
        }
    }

    Matrix::from_parts(out, out_width, height)
}
