//! Symmetric (mirror) padding, MATLAB `padarray(A, [ph pw], 'symmetric')`.

use crate::matrix::Matrix;
use crate::util::math::mirror_index;
use crate::util::{SsimError, SsimResult};

/// Pads `a` with `pad_height` mirrored rows above and below and `pad_width`
/// mirrored columns on each side.
///
/// Reflection repeats the edge sample (`3 2 1 | 1 2 3 | 3 2 1`). When a pad
/// exceeds the source dimension the mirrored copies keep tiling, so a
/// 2-row source padded by 3 reads `A, flip(A), A, ...` outward.
pub fn padarray(a: &Matrix, (pad_height, pad_width): (usize, usize)) -> SsimResult<Matrix> {
    if a.is_empty() && (pad_height > 0 || pad_width > 0) {
        return Err(SsimError::InvalidDimensions {
            width: a.width(),
            height: a.height(),
        });
    }
    if pad_height <= a.height() && pad_width <= a.width() {
        Ok(pad_within(a, pad_height, pad_width))
    } else {
        Ok(pad_tiled(a, pad_height, pad_width))
    }
}

/// Single reflection per side: valid while `pad <= dim` on both axes.
fn pad_within(a: &Matrix, pad_height: usize, pad_width: usize) -> Matrix {
    let src_width = a.width();
    let src_height = a.height();
    let width = src_width + 2 * pad_width;
    let height = src_height + 2 * pad_height;
    let src = a.data();

    let source_col = |x: usize| -> usize {
        if x < pad_width {
            pad_width - 1 - x
        } else if x < pad_width + src_width {
            x - pad_width
        } else {
            2 * src_width + pad_width - 1 - x
        }
    };
    let cols: Vec<usize> = (0..width).map(source_col).collect();

    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        let sy = if y < pad_height {
            pad_height - 1 - y
        } else if y < pad_height + src_height {
            y - pad_height
        } else {
            2 * src_height + pad_height - 1 - y
        };
        let row = &src[sy * src_width..(sy + 1) * src_width];
        data.extend(cols.iter().map(|&sx| row[sx]));
    }

    Matrix::from_parts(data, width, height)
}

/// General reflection through `mod(offset, 2d)` for pads larger than the source.
fn pad_tiled(a: &Matrix, pad_height: usize, pad_width: usize) -> Matrix {
    let src_width = a.width();
    let src_height = a.height();
    let width = src_width + 2 * pad_width;
    let height = src_height + 2 * pad_height;
    let src = a.data();

    let cols: Vec<usize> = (0..width)
        .map(|x| mirror_index(x as isize - pad_width as isize, src_width))
        .collect();

    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        let sy = mirror_index(y as isize - pad_height as isize, src_height);
        let row = &src[sy * src_width..(sy + 1) * src_width];
        data.extend(cols.iter().map(|&sx| row[sx]));
    }

    Matrix::from_parts(data, width, height)
}

#[cfg(test)]
mod tests {
    use super::{pad_tiled, pad_within, padarray};
    use crate::matrix::Matrix;

    fn m(data: &[f64], width: usize, height: usize) -> Matrix {
        Matrix::new(data.to_vec(), width, height).unwrap()
    }

    #[test]
    fn pads_by_one_repeat_edges() {
        let a = m(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3, 2);
        let p = padarray(&a, (1, 1)).unwrap();
        assert_eq!(p.size(), (4, 5));
        assert_eq!(
            p.data(),
            &[
                1.0, 1.0, 2.0, 3.0, 3.0, //
                1.0, 1.0, 2.0, 3.0, 3.0, //
                4.0, 4.0, 5.0, 6.0, 6.0, //
                4.0, 4.0, 5.0, 6.0, 6.0,
            ]
        );
    }

    #[test]
    fn pads_within_bounds_mirror_deeper_samples() {
        let a = m(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3, 2);
        let p = padarray(&a, (2, 3)).unwrap();
        assert_eq!(p.size(), (6, 9));
        assert_eq!(p.row(0).unwrap(), &[6.0, 5.0, 4.0, 4.0, 5.0, 6.0, 6.0, 5.0, 4.0]);
        assert_eq!(p.row(1).unwrap(), &[3.0, 2.0, 1.0, 1.0, 2.0, 3.0, 3.0, 2.0, 1.0]);
        assert_eq!(p.row(5).unwrap(), p.row(1).unwrap());
        assert_eq!(p.row(4).unwrap(), p.row(0).unwrap());
    }

    #[test]
    fn tiled_and_direct_formulas_agree_when_both_apply() {
        let a = m(&(0..20).map(f64::from).collect::<Vec<_>>(), 5, 4);
        for ph in 0..=4 {
            for pw in 0..=5 {
                assert_eq!(pad_within(&a, ph, pw), pad_tiled(&a, ph, pw));
            }
        }
    }

    #[test]
    fn zero_padding_is_identity() {
        let a = m(&[1.0, 2.0, 3.0, 4.0], 2, 2);
        assert_eq!(padarray(&a, (0, 0)).unwrap(), a);
    }
}
