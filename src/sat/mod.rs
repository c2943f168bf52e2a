//! Summed-area tables and constant-time window moments.
//!
//! Tables are accumulated from the bottom-right corner towards the top-left,
//! so cell `(i, j)` holds the sum over rows `>= i` and columns `>= j`. The
//! extra trailing row and column are zero, which lets every window query use
//! the same four-corner formula without edge cases:
//!
//! ```text
//! S(r, c, n) = T[r][c] - T[r][c+n] - T[r+n][c] + T[r+n][c+n]
//! ```
//!
//! Building is one pass per table and each query is four lookups, so the
//! cost of a full sliding-window sweep does not depend on the window size.

use crate::matrix::Matrix;
use crate::util::{SsimError, SsimResult};

/// Operation counter for table builds and window queries.
///
/// Accumulates across calls that share the counter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SatWork {
    /// Table cells written while building.
    pub table_updates: usize,
    /// Table cells read while answering window queries.
    pub window_lookups: usize,
}

/// A `(height + 1) x (width + 1)` suffix-sum table over one derived image.
#[derive(Clone, Debug)]
pub struct SummedAreaTable {
    cells: Vec<f64>,
    width: usize,
    height: usize,
}

impl SummedAreaTable {
    /// Builds a table over `width x height` samples where `sample(i)` returns
    /// the value at row-major index `i`.
    pub fn from_fn(width: usize, height: usize, sample: impl Fn(usize) -> f64) -> Self {
        Self::from_fn_counted(width, height, sample, &mut SatWork::default())
    }

    /// [`SummedAreaTable::from_fn`], adding one to `work.table_updates` per
    /// cell written.
    pub fn from_fn_counted(
        width: usize,
        height: usize,
        sample: impl Fn(usize) -> f64,
        work: &mut SatWork,
    ) -> Self {
        let stride = width + 1;
        let mut cells = vec![0.0f64; stride * (height + 1)];
        for h in (0..height).rev() {
            for w in (0..width).rev() {
                let here = h * stride + w;
                let below = here + stride;
                cells[here] =
                    sample(h * width + w) + cells[here + 1] + cells[below] - cells[below + 1];
                work.table_updates += 1;
            }
        }
        Self {
            cells,
            width,
            height,
        }
    }

    /// Table over the samples of `a`.
    pub fn of_values(a: &Matrix) -> Self {
        let data = a.data();
        Self::from_fn(a.width(), a.height(), |i| data[i])
    }

    /// Table over the squared samples of `a`.
    pub fn of_squares(a: &Matrix) -> Self {
        let data = a.data();
        Self::from_fn(a.width(), a.height(), |i| data[i] * data[i])
    }

    /// Table over the cell-by-cell product of `a` and `b`.
    pub fn of_products(a: &Matrix, b: &Matrix) -> SsimResult<Self> {
        a.same_shape(b)?;
        let (x, y) = (a.data(), b.data());
        Ok(Self::from_fn(a.width(), a.height(), |i| x[i] * y[i]))
    }

    /// Width of the source image.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the source image.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of table cells, including the zero border.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true when the source image has no samples.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns table cell `(row, col)`; valid up to `height` and `width` inclusive.
    pub fn at(&self, row: usize, col: usize) -> Option<f64> {
        if row > self.height || col > self.width {
            return None;
        }
        self.cells.get(row * (self.width + 1) + col).copied()
    }

    /// Sum of the `rows x cols` block whose top-left sample is `(row, col)`.
    pub fn rect_sum(&self, row: usize, col: usize, rows: usize, cols: usize) -> Option<f64> {
        if row + rows > self.height || col + cols > self.width {
            return None;
        }
        Some(self.corners(row, col, rows, cols, &mut SatWork::default()))
    }

    /// Four-corner block sum; each table read adds one to
    /// `work.window_lookups`.
    #[inline]
    fn corners(
        &self,
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
        work: &mut SatWork,
    ) -> f64 {
        let stride = self.width + 1;
        let top = row * stride;
        let bottom = (row + rows) * stride;
        let mut read = |index: usize| {
            work.window_lookups += 1;
            self.cells[index]
        };
        read(top + col) - read(top + col + cols) - read(bottom + col) + read(bottom + col + cols)
    }
}

/// Mean, variance and covariance of one window pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowMoments {
    pub mean_x: f64,
    pub mean_y: f64,
    pub var_x: f64,
    pub var_y: f64,
    pub cov_xy: f64,
}

/// The five tables needed for sliding-window SSIM moments of an image pair.
#[derive(Clone, Debug)]
pub struct MomentTables {
    x: SummedAreaTable,
    y: SummedAreaTable,
    xx: SummedAreaTable,
    yy: SummedAreaTable,
    xy: SummedAreaTable,
    window_size: usize,
}

impl MomentTables {
    /// Builds all five tables for `ws x ws` windows over `a` and `b`.
    pub fn build(
        a: &Matrix,
        b: &Matrix,
        window_size: usize,
        work: &mut SatWork,
    ) -> SsimResult<Self> {
        a.same_shape(b)?;
        if window_size == 0 || window_size > a.width() || window_size > a.height() {
            return Err(SsimError::WindowTooLarge {
                window_size,
                width: a.width(),
                height: a.height(),
            });
        }
        let (width, height) = (a.width(), a.height());
        let (x, y) = (a.data(), b.data());
        let mut table = |sample: &dyn Fn(usize) -> f64| {
            SummedAreaTable::from_fn_counted(width, height, sample, work)
        };
        Ok(Self {
            x: table(&|i: usize| x[i]),
            y: table(&|i: usize| y[i]),
            xx: table(&|i: usize| x[i] * x[i]),
            yy: table(&|i: usize| y[i] * y[i]),
            xy: table(&|i: usize| x[i] * y[i]),
            window_size,
        })
    }

    /// Window edge length.
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Number of window positions as `(height, width)`.
    pub fn output_size(&self) -> (usize, usize) {
        (
            self.x.height() - self.window_size + 1,
            self.x.width() - self.window_size + 1,
        )
    }

    /// Moments of the window whose top-left sample is `(row, col)`.
    ///
    /// `(row, col)` must lie inside [`MomentTables::output_size`].
    pub fn moments(&self, row: usize, col: usize, work: &mut SatWork) -> WindowMoments {
        let n = self.window_size;
        let count = (n * n) as f64;
        let mut sum = |t: &SummedAreaTable| t.corners(row, col, n, n, work) / count;

        let mean_x = sum(&self.x);
        let mean_y = sum(&self.y);
        WindowMoments {
            mean_x,
            mean_y,
            var_x: sum(&self.xx) - mean_x * mean_x,
            var_y: sum(&self.yy) - mean_y * mean_y,
            cov_xy: sum(&self.xy) - mean_x * mean_y,
        }
    }
}
