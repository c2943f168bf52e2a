//! Integer helpers mirroring MATLAB indexing arithmetic.

/// MATLAB `mod`: the remainder takes the sign of the divisor.
///
/// `divisor` must be positive.
pub(crate) fn mod_floor(value: isize, divisor: isize) -> isize {
    let rem = value % divisor;
    if rem < 0 {
        rem + divisor
    } else {
        rem
    }
}

/// Ceiling of `num / den` for non-negative integers.
pub(crate) fn ceil_div(num: usize, den: usize) -> usize {
    if num == 0 {
        0
    } else {
        (num - 1) / den + 1
    }
}

/// Folds a signed offset into `[0, len)` by symmetric reflection.
///
/// The source is treated as tiled `A, flip(A), A, flip(A), ...` in both
/// directions, so offsets further than `len` away keep re-mirroring.
pub(crate) fn mirror_index(offset: isize, len: usize) -> usize {
    let len = len as isize;
    let folded = mod_floor(offset, 2 * len);
    if folded < len {
        folded as usize
    } else {
        (2 * len - 1 - folded) as usize
    }
}
