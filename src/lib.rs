//! ssimmap computes MATLAB-compatible SSIM maps for pairs of images.
//!
//! Four statistics pipelines share one scoring formula: the dense Gaussian
//! reference, a separable Gaussian fast path, non-overlapping blocks, and
//! sliding windows over summed-area tables. The MATLAB building blocks they
//! rely on (`conv2`, `filter2`, `imfilter`, `padarray`, `fspecial`,
//! `normpdf`) are public as well. Optional features add `rayon`
//! parallelism, image decoding via the `image` crate, and `tracing` spans.

pub mod conv;
pub mod downsample;
pub mod filter;
pub mod image;
pub mod lowlevel;
pub mod matrix;
pub mod sat;
pub mod ssim;
mod trace;
pub mod util;

#[cfg(feature = "image-io")]
pub use image::io;

pub use conv::{conv2, conv2_auto, Kernel, Shape};
pub use filter::{filter2, fspecial, imfilter, normpdf, padarray};
pub use image::{rgb2gray, RgbaView};
pub use matrix::Matrix;
pub use ssim::{
    ssim, ssim_rgba, Algorithm, Downsample, LumaVersion, Options, SsimMap, SsimOutput,
    StatisticsProvider,
};
pub use util::{SsimError, SsimResult};
