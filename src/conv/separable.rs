//! Rank-1 kernels applied as two 1-D passes.

use super::dense;
use crate::matrix::Matrix;

/// Full convolution of `a` with the outer product of `first` and `second`.
///
/// One operand is a column (width 1) and the other a row (height 1), in
/// either order. Each pass is a 1-D convolution, so the cost is
/// `O(n * (k1 + k2))` instead of `O(n * k1 * k2)`. The result equals the
/// dense convolution with `first ⊗ second` only when that product is the
/// intended kernel; callers own that precondition.
pub(crate) fn conv_full(a: &Matrix, first: &Matrix, second: &Matrix) -> Matrix {
    let temp = dense::conv_full(a, first);
    dense::conv_full(&temp, second)
}

/// Height and width of the 2-D kernel the two 1-D operands represent.
pub(crate) fn combined_extent(first: &Matrix, second: &Matrix) -> (usize, usize) {
    (
        first.height() + second.height() - 1,
        first.width() + second.width() - 1,
    )
}

#[cfg(test)]
mod tests {
    use super::{combined_extent, conv_full};
    use crate::conv::dense;
    use crate::matrix::Matrix;

    #[test]
    fn column_then_row_matches_outer_product() {
        let a = Matrix::new((1..=12).map(f64::from).collect(), 4, 3).unwrap();
        let col = Matrix::new(vec![1.0, 2.0], 1, 2).unwrap();
        let row = Matrix::new(vec![3.0, 0.0, 1.0], 3, 1).unwrap();
        let outer = Matrix::new(vec![3.0, 0.0, 1.0, 6.0, 0.0, 2.0], 3, 2).unwrap();

        assert_eq!(combined_extent(&col, &row), (2, 3));
        assert_eq!(conv_full(&a, &col, &row), dense::conv_full(&a, &outer));
        assert_eq!(conv_full(&a, &row, &col), dense::conv_full(&a, &outer));
    }
}
