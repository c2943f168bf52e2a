//! MATLAB-compatible 2-D convolution.
//!
//! `conv2` computes the true 2-D convolution `C[m][n] = Σ A[m-r][n-c]·B[r][c]`
//! over the full `(ha+hb-1) x (wa+wb-1)` extent and then crops it according
//! to a [`Shape`]. Three implementations share the crop step:
//!
//! - [`Kernel::Separable`]: two 1-D passes for a rank-1 kernel.
//! - [`Kernel::Box`]: running sums for a kernel whose cells are all equal.
//! - [`Kernel::Dense`]: direct accumulation for everything else.
//!
//! Use [`Kernel::classify`] to pick between `Box` and `Dense` once, or build
//! a variant explicitly when the kernel structure is known up front.

use std::fmt;
use std::str::FromStr;

use crate::matrix::Matrix;
use crate::trace::trace_debug;
use crate::util::{SsimError, SsimResult};

mod box_sum;
mod crop;
pub(crate) mod dense;
mod separable;

pub use crop::{crop_window, CropWindow};

/// Portion of the full convolution to return.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Shape {
    /// The entire `(ha+hb-1) x (wa+wb-1)` result.
    #[default]
    Full,
    /// The centered block with the size of the input.
    Same,
    /// Only cells computed without implicit zero padding.
    Valid,
}

impl FromStr for Shape {
    type Err = SsimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(Shape::Full),
            "same" => Ok(Shape::Same),
            "valid" => Ok(Shape::Valid),
            other => Err(SsimError::invalid_option(
                "shape",
                format!("{other:?} is not one of full, same, valid"),
            )),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Shape::Full => "full",
            Shape::Same => "same",
            Shape::Valid => "valid",
        };
        f.write_str(name)
    }
}

/// Second operand of a convolution, tagged with the path that evaluates it.
#[derive(Clone, Copy, Debug)]
pub enum Kernel<'a> {
    /// Arbitrary 2-D kernel.
    Dense(&'a Matrix),
    /// Kernel whose cells are all numerically equal.
    Box(&'a Matrix),
    /// Rank-1 kernel given as a column and a row vector (either order).
    Separable(&'a Matrix, &'a Matrix),
}

impl<'a> Kernel<'a> {
    /// Chooses `Box` when every cell equals the first one, `Dense` otherwise.
    pub fn classify(kernel: &'a Matrix) -> Self {
        if is_uniform(kernel) {
            Kernel::Box(kernel)
        } else {
            Kernel::Dense(kernel)
        }
    }

    /// Builds a `Box` kernel, rejecting non-uniform matrices.
    pub fn boxed(kernel: &'a Matrix) -> SsimResult<Self> {
        if !is_uniform(kernel) {
            return Err(SsimError::InvalidKernel {
                reason: "box kernel cells are not all equal",
            });
        }
        Ok(Kernel::Box(kernel))
    }

    /// Builds a `Separable` kernel, rejecting operands that are not 1-D.
    pub fn separable(first: &'a Matrix, second: &'a Matrix) -> SsimResult<Self> {
        check_separable(first, second)?;
        Ok(Kernel::Separable(first, second))
    }

    /// Short name of the evaluation path.
    pub fn path(&self) -> &'static str {
        match self {
            Kernel::Dense(_) => "dense",
            Kernel::Box(_) => "box",
            Kernel::Separable(..) => "separable",
        }
    }

    /// Height and width of the 2-D kernel this variant stands for.
    pub fn extent(&self) -> (usize, usize) {
        match self {
            Kernel::Dense(k) | Kernel::Box(k) => k.size(),
            Kernel::Separable(first, second) => separable::combined_extent(first, second),
        }
    }
}

fn is_uniform(kernel: &Matrix) -> bool {
    match kernel.data().split_first() {
        Some((&first, rest)) => rest.iter().all(|&v| v == first),
        None => false,
    }
}

fn check_separable(first: &Matrix, second: &Matrix) -> SsimResult<()> {
    let column_row = first.width() == 1 && second.height() == 1;
    let row_column = first.height() == 1 && second.width() == 1;
    if !(column_row || row_column) {
        return Err(SsimError::InvalidKernel {
            reason: "separable operands must be one column and one row vector",
        });
    }
    if first.is_empty() || second.is_empty() {
        return Err(SsimError::InvalidKernel {
            reason: "separable operands must not be empty",
        });
    }
    Ok(())
}

/// Convolves `a` with `kernel` and crops the result to `shape`.
pub fn conv2(a: &Matrix, kernel: Kernel<'_>, shape: Shape) -> SsimResult<Matrix> {
    let (k_height, k_width) = kernel.extent();
    if k_height == 0 || k_width == 0 {
        return Err(SsimError::InvalidKernel {
            reason: "kernel must not be empty",
        });
    }
    trace_debug!(
        "conv2",
        path = kernel.path(),
        k_height = k_height,
        k_width = k_width
    );
    let full = match kernel {
        Kernel::Dense(k) => dense::conv_full(a, k),
        Kernel::Box(k) => {
            if !is_uniform(k) {
                return Err(SsimError::InvalidKernel {
                    reason: "box kernel cells are not all equal",
                });
            }
            box_sum::conv_full(a, k_height, k_width, k.data()[0])
        }
        Kernel::Separable(first, second) => {
            check_separable(first, second)?;
            separable::conv_full(a, first, second)
        }
    };
    Ok(crop::crop(
        full,
        shape,
        a.height(),
        a.width(),
        k_height,
        k_width,
    ))
}

/// `conv2` with the kernel path inferred by [`Kernel::classify`].
pub fn conv2_auto(a: &Matrix, kernel: &Matrix, shape: Shape) -> SsimResult<Matrix> {
    conv2(a, Kernel::classify(kernel), shape)
}
