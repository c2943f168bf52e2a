//! Cell-by-cell and broadcast arithmetic.

use super::Matrix;
use crate::util::SsimResult;

/// Right-hand side of a binary matrix operation.
#[derive(Clone, Copy, Debug)]
pub enum Operand<'a> {
    /// Combine cell by cell; shapes must match.
    Matrix(&'a Matrix),
    /// Broadcast a constant over every cell.
    Scalar(f64),
}

impl<'a> From<&'a Matrix> for Operand<'a> {
    fn from(value: &'a Matrix) -> Self {
        Operand::Matrix(value)
    }
}

impl From<f64> for Operand<'_> {
    fn from(value: f64) -> Self {
        Operand::Scalar(value)
    }
}

fn zip_with<'a>(
    lhs: &Matrix,
    rhs: impl Into<Operand<'a>>,
    op: impl Fn(f64, f64) -> f64,
) -> SsimResult<Matrix> {
    let data = match rhs.into() {
        Operand::Matrix(other) => {
            lhs.same_shape(other)?;
            lhs.data
                .iter()
                .zip(other.data.iter())
                .map(|(&a, &b)| op(a, b))
                .collect()
        }
        Operand::Scalar(value) => lhs.data.iter().map(|&a| op(a, value)).collect(),
    };
    Ok(Matrix::from_parts(data, lhs.width, lhs.height))
}

/// `A + B` or `A + k`.
pub fn add2d<'a>(lhs: &Matrix, rhs: impl Into<Operand<'a>>) -> SsimResult<Matrix> {
    zip_with(lhs, rhs, |a, b| a + b)
}

/// `A - B` or `A - k`.
pub fn subtract2d<'a>(lhs: &Matrix, rhs: impl Into<Operand<'a>>) -> SsimResult<Matrix> {
    zip_with(lhs, rhs, |a, b| a - b)
}

/// `A .* B` or `A * k`.
pub fn multiply2d<'a>(lhs: &Matrix, rhs: impl Into<Operand<'a>>) -> SsimResult<Matrix> {
    zip_with(lhs, rhs, |a, b| a * b)
}

/// `A ./ B` or `A / k`.
pub fn divide2d<'a>(lhs: &Matrix, rhs: impl Into<Operand<'a>>) -> SsimResult<Matrix> {
    zip_with(lhs, rhs, |a, b| a / b)
}

/// `A .* A`.
pub fn square2d(m: &Matrix) -> Matrix {
    m.map(|v| v * v)
}

#[cfg(test)]
mod tests {
    use super::{add2d, divide2d, multiply2d, square2d, subtract2d};
    use crate::matrix::Matrix;
    use crate::util::SsimError;

    fn m(data: &[f64], width: usize, height: usize) -> Matrix {
        Matrix::new(data.to_vec(), width, height).unwrap()
    }

    #[test]
    fn binary_ops_work_cell_by_cell() {
        let a = m(&[1.0, 2.0, 3.0, 4.0], 2, 2);
        let b = m(&[4.0, 3.0, 2.0, 1.0], 2, 2);
        assert_eq!(add2d(&a, &b).unwrap().data(), &[5.0; 4]);
        assert_eq!(subtract2d(&a, &b).unwrap().data(), &[-3.0, -1.0, 1.0, 3.0]);
        assert_eq!(multiply2d(&a, &b).unwrap().data(), &[4.0, 6.0, 6.0, 4.0]);
        assert_eq!(divide2d(&a, &b).unwrap().data(), &[0.25, 2.0 / 3.0, 1.5, 4.0]);
    }

    #[test]
    fn scalar_ops_broadcast() {
        let a = m(&[1.0, 2.0, 3.0], 3, 1);
        assert_eq!(add2d(&a, 1.0).unwrap().data(), &[2.0, 3.0, 4.0]);
        assert_eq!(subtract2d(&a, 1.0).unwrap().data(), &[0.0, 1.0, 2.0]);
        assert_eq!(multiply2d(&a, 2.0).unwrap().data(), &[2.0, 4.0, 6.0]);
        assert_eq!(divide2d(&a, 2.0).unwrap().data(), &[0.5, 1.0, 1.5]);
        assert_eq!(square2d(&a).data(), &[1.0, 4.0, 9.0]);
    }

    #[test]
    fn mismatched_shapes_are_rejected() {
        let a = m(&[1.0; 6], 3, 2);
        let b = m(&[1.0; 6], 2, 3);
        assert_eq!(
            add2d(&a, &b).unwrap_err(),
            SsimError::DimensionMismatch {
                left_width: 3,
                left_height: 2,
                right_width: 2,
                right_height: 3,
            }
        );
    }
}
