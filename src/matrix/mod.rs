//! Row-major `f64` matrices and the primitives the SSIM pipelines build on.
//!
//! `Matrix` owns a flat buffer with `data.len() == width * height`. Public
//! constructors reject zero dimensions; convolution crops are the only
//! producers of empty matrices (a `valid` result whose kernel is larger than
//! the input), mirroring MATLAB's empty results.

use crate::util::{SsimError, SsimResult};

mod arith;
mod stats;

pub use arith::{add2d, divide2d, multiply2d, square2d, subtract2d, Operand};
pub use stats::{average, covariance, mean2d, sum2d, variance};

/// Owned row-major matrix of `f64` cells.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    data: Vec<f64>,
    width: usize,
    height: usize,
}

impl Matrix {
    /// Creates a matrix from a row-major buffer.
    pub fn new(data: Vec<f64>, width: usize, height: usize) -> SsimResult<Self> {
        if width == 0 || height == 0 {
            return Err(SsimError::InvalidDimensions { width, height });
        }
        let needed = width
            .checked_mul(height)
            .ok_or(SsimError::InvalidDimensions { width, height })?;
        if data.len() != needed {
            return Err(SsimError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Creates a matrix from 8-bit grayscale samples.
    pub fn from_u8(data: &[u8], width: usize, height: usize) -> SsimResult<Self> {
        Self::new(data.iter().map(|&v| f64::from(v)).collect(), width, height)
    }

    /// Creates a matrix from nested rows. All rows must share one length.
    pub fn from_rows(rows: &[Vec<f64>]) -> SsimResult<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(width * height);
        for row in rows {
            if row.len() != width {
                return Err(SsimError::InvalidDimensions {
                    width: row.len(),
                    height,
                });
            }
            data.extend_from_slice(row);
        }
        Self::new(data, width, height)
    }

    /// Builds a matrix without validating dimensions. Empty results are allowed.
    pub(crate) fn from_parts(data: Vec<f64>, width: usize, height: usize) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self {
            data,
            width,
            height,
        }
    }

    /// Matrix of `height x width` cells all equal to `value`.
    pub fn filled(height: usize, width: usize, value: f64) -> SsimResult<Self> {
        let len = width
            .checked_mul(height)
            .ok_or(SsimError::InvalidDimensions { width, height })?;
        Self::new(vec![value; len], width, height)
    }

    /// MATLAB `ones(height, width)`.
    pub fn ones(height: usize, width: usize) -> SsimResult<Self> {
        Self::filled(height, width, 1.0)
    }

    /// MATLAB `zeros(height, width)`.
    pub fn zeros(height: usize, width: usize) -> SsimResult<Self> {
        Self::filled(height, width, 0.0)
    }

    /// Returns the number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `(height, width)` in MATLAB `size` order.
    pub fn size(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Returns true when the matrix holds no cells.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the row-major cell buffer.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Consumes the matrix and returns its buffer.
    pub fn into_data(self) -> Vec<f64> {
        self.data
    }

    /// Returns the cell at `(row, col)` if it is within bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.data.get(row * self.width + col).copied()
    }

    /// Returns row `row` as a slice of length `width`.
    pub fn row(&self, row: usize) -> Option<&[f64]> {
        if row >= self.height {
            return None;
        }
        let start = row * self.width;
        self.data.get(start..start + self.width)
    }

    pub(crate) fn same_shape(&self, other: &Matrix) -> SsimResult<()> {
        if self.width != other.width || self.height != other.height {
            return Err(SsimError::DimensionMismatch {
                left_width: self.width,
                left_height: self.height,
                right_width: other.width,
                right_height: other.height,
            });
        }
        Ok(())
    }

    /// Applies `f` to every cell.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Matrix {
        Matrix::from_parts(
            self.data.iter().map(|&v| f(v)).collect(),
            self.width,
            self.height,
        )
    }

    /// Swaps rows and columns.
    pub fn transpose(&self) -> Matrix {
        let mut data = vec![0.0; self.data.len()];
        for i in 0..self.height {
            for j in 0..self.width {
                data[j * self.height + i] = self.data[i * self.width + j];
            }
        }
        Matrix::from_parts(data, self.height, self.width)
    }

    /// Rotates the matrix by 180 degrees: `out[i][j] = in[h-1-i][w-1-j]`.
    pub fn rotate180(&self) -> Matrix {
        let mut data = self.data.clone();
        data.reverse();
        Matrix::from_parts(data, self.width, self.height)
    }

    /// Copies the `height x width` block whose top-left cell is `(row, col)`.
    pub fn sub(&self, row: usize, col: usize, height: usize, width: usize) -> SsimResult<Matrix> {
        let end_row = row.checked_add(height);
        let end_col = col.checked_add(width);
        match (end_row, end_col) {
            (Some(r), Some(c)) if r <= self.height && c <= self.width => {}
            _ => {
                return Err(SsimError::DimensionMismatch {
                    left_width: self.width,
                    left_height: self.height,
                    right_width: col.saturating_add(width),
                    right_height: row.saturating_add(height),
                })
            }
        }
        Ok(self.sub_unchecked(row, col, height, width))
    }

    pub(crate) fn sub_unchecked(&self, row: usize, col: usize, height: usize, width: usize) -> Matrix {
        let mut data = Vec::with_capacity(width * height);
        for i in 0..height {
            let start = (row + i) * self.width + col;
            data.extend_from_slice(&self.data[start..start + width]);
        }
        Matrix::from_parts(data, width, height)
    }

    /// Keeps every `row_step`-th row from `row_start` up to `row_end` (exclusive),
    /// and likewise for columns. Mirrors MATLAB `A(r0:step:r1, c0:step:c1)`.
    pub fn skip2d(
        &self,
        (row_start, row_step, row_end): (usize, usize, usize),
        (col_start, col_step, col_end): (usize, usize, usize),
    ) -> SsimResult<Matrix> {
        if row_step == 0 || col_step == 0 {
            return Err(SsimError::InvalidDimensions {
                width: col_step,
                height: row_step,
            });
        }
        let row_end = row_end.min(self.height);
        let col_end = col_end.min(self.width);
        let rows: Vec<usize> = (row_start..row_end).step_by(row_step).collect();
        let cols: Vec<usize> = (col_start..col_end).step_by(col_step).collect();
        let mut data = Vec::with_capacity(rows.len() * cols.len());
        for &r in &rows {
            let base = r * self.width;
            for &c in &cols {
                data.push(self.data[base + c]);
            }
        }
        Ok(Matrix::from_parts(data, cols.len(), rows.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::Matrix;
    use crate::util::SsimError;

    fn counting(width: usize, height: usize) -> Matrix {
        Matrix::new((1..=width * height).map(|v| v as f64).collect(), width, height).unwrap()
    }

    #[test]
    fn rejects_zero_dimensions_and_bad_lengths() {
        assert_eq!(
            Matrix::new(vec![], 0, 3).unwrap_err(),
            SsimError::InvalidDimensions {
                width: 0,
                height: 3
            }
        );
        assert_eq!(
            Matrix::new(vec![1.0; 5], 2, 3).unwrap_err(),
            SsimError::BufferTooSmall { needed: 6, got: 5 }
        );
    }

    #[test]
    fn transpose_swaps_axes() {
        let m = counting(3, 2);
        let t = m.transpose();
        assert_eq!(t.size(), (3, 2));
        assert_eq!(t.data(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    }

    #[test]
    fn rotate180_reverses_rows_and_columns() {
        let m = counting(4, 2);
        assert_eq!(
            m.rotate180().data(),
            &[8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0]
        );
    }

    #[test]
    fn sub_copies_window() {
        let m = counting(4, 4);
        let s = m.sub(1, 2, 2, 2).unwrap();
        assert_eq!(s.data(), &[7.0, 8.0, 11.0, 12.0]);
        assert!(m.sub(3, 3, 2, 2).is_err());
    }

    #[test]
    fn skip2d_strides_both_axes() {
        let m = counting(3, 3);
        let w = m.skip2d((1, 1, 2), (1, 1, 2)).unwrap();
        assert_eq!(w.data(), &[5.0]);
        let s = m.skip2d((0, 2, 3), (0, 2, 3)).unwrap();
        assert_eq!(s.size(), (2, 2));
        assert_eq!(s.data(), &[1.0, 3.0, 7.0, 9.0]);
    }

    #[test]
    fn ones_defaults_to_constant_cells() {
        let m = Matrix::ones(2, 3).unwrap();
        assert_eq!(m.size(), (2, 3));
        assert!(m.data().iter().all(|&v| v == 1.0));
    }
}
