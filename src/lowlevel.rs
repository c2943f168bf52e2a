//! Low-level building blocks for custom SSIM pipelines.
//!
//! These items expose the individual statistics providers, the scoring
//! formula, summed-area tables and the convolution crop arithmetic. Most
//! users should prefer the top-level [`crate::ssim`] entry point.

pub use crate::conv::{crop_window, CropWindow};
pub use crate::downsample::factor as downsample_factor;
pub use crate::filter::gaussian_window;
pub use crate::sat::{MomentTables, SatWork, SummedAreaTable, WindowMoments};
pub use crate::ssim::combine::{combine, window_score, LocalStats, ScoreForm, Stabilizers};
pub use crate::ssim::{
    provider_for, BlockStats, ReferenceGaussian, SeparableGaussian, SummedAreaStats,
    WINDOW_SIGMA,
};
