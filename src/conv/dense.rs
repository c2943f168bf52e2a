//! Direct double-sum convolution.

use crate::matrix::Matrix;

/// Full 2-D convolution by scatter-accumulation.
///
/// Each non-zero kernel cell adds a scaled, shifted copy of `a` into the
/// output, so sparse kernels skip whole passes. Cost is
/// `O(a_height * a_width * nnz(kernel))`.
pub(crate) fn conv_full(a: &Matrix, kernel: &Matrix) -> Matrix {
    let a_width = a.width();
    let a_height = a.height();
    let out_width = a_width + kernel.width() - 1;
    let out_height = a_height + kernel.height() - 1;
    let mut out = vec![0.0f64; out_width * out_height];
    let src = a.data();

    for kr in 0..kernel.height() {
        let krow = kernel.row(kr).unwrap_or(&[]);
        for (kc, &kv) in krow.iter().enumerate() {
            if kv == 0.0 {
                continue;
            }
            for i in 0..a_height {
                let src_row = &src[i * a_width..(i + 1) * a_width];
                let base = (i + kr) * out_width + kc;
                let dst_row = &mut out[base..base + a_width];
                for (d, &s) in dst_row.iter_mut().zip(src_row) {
                    *d += s * kv;
                }
            }
        }
    }

    Matrix::from_parts(out, out_width, out_height)
}

#[cfg(test)]
mod tests {
    use super::conv_full;
    use crate::matrix::Matrix;

    #[test]
    fn full_convolution_of_small_kernels() {
        let a = Matrix::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2).unwrap();
        let b = Matrix::ones(2, 2).unwrap();
        let c = conv_full(&a, &b);
        assert_eq!(c.size(), (3, 3));
        assert_eq!(
            c.data(),
            &[1.0, 3.0, 2.0, 4.0, 10.0, 6.0, 3.0, 7.0, 4.0]
        );
    }

    #[test]
    fn kernel_offsets_shift_the_input() {
        let a = Matrix::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2).unwrap();
        let b = Matrix::new(vec![0.0, 1.0], 2, 1).unwrap();
        let c = conv_full(&a, &b);
        assert_eq!(c.data(), &[0.0, 1.0, 2.0, 0.0, 3.0, 4.0]);
    }
}
