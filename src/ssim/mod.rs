//! SSIM orchestration: options, statistics providers and the top-level entry points.
//!
//! A comparison validates [`Options`], checks that both images share one
//! size, optionally downsamples, and then asks a [`StatisticsProvider`] for
//! the SSIM map. Providers only differ in how they obtain per-window means,
//! variances and covariance; the score itself always comes from
//! [`combine::window_score`].

use std::time::Instant;

use crate::downsample::downsample;
use crate::image::{rgb2gray, RgbaView};
use crate::matrix::{mean2d, Matrix};
use crate::trace::{trace_event, trace_span};
use crate::util::{SsimError, SsimResult};

mod block;
pub mod combine;
mod gaussian;
mod options;
mod summed;

pub use block::BlockStats;
pub use combine::{LocalStats, ScoreForm, Stabilizers};
pub use gaussian::{ReferenceGaussian, SeparableGaussian, WINDOW_SIGMA};
pub use options::{Algorithm, Downsample, LumaVersion, Options};
pub use summed::SummedAreaStats;

/// An SSIM map plus the mean score when the provider computed it on the way.
#[derive(Clone, Debug, PartialEq)]
pub struct SsimMap {
    pub map: Matrix,
    pub mssim: Option<f64>,
}

/// Source of per-window statistics for an image pair.
pub trait StatisticsProvider {
    /// Algorithm key this provider implements.
    fn name(&self) -> &'static str;

    /// Per-window moments of `a` and `b`.
    fn local_stats(&self, a: &Matrix, b: &Matrix) -> SsimResult<LocalStats>;

    /// Closed form applied for the constants `k`. Stabilized unless a
    /// provider overrides it.
    fn score_form(&self, _k: Stabilizers) -> ScoreForm {
        ScoreForm::Stabilized
    }

    /// SSIM map of `a` against `b`.
    fn similarity(&self, a: &Matrix, b: &Matrix, k: Stabilizers) -> SsimResult<SsimMap> {
        let stats = self.local_stats(a, b)?;
        Ok(SsimMap {
            map: combine::combine(&stats, k, self.score_form(k))?,
            mssim: None,
        })
    }
}

/// Result of one comparison.
#[derive(Clone, Debug, PartialEq)]
pub struct SsimOutput {
    pub ssim_map: Matrix,
    /// Mean of `ssim_map`.
    pub mssim: f64,
    /// Wall-clock time spent in [`ssim`] or [`ssim_rgba`], in milliseconds.
    pub elapsed_ms: f64,
}

/// Builds the provider selected by `options.algorithm`.
pub fn provider_for(options: &Options) -> SsimResult<Box<dyn StatisticsProvider>> {
    let ws = options.window_size;
    Ok(match options.algorithm {
        Algorithm::Fast => Box::new(SeparableGaussian::new(ws)?),
        Algorithm::Original => Box::new(ReferenceGaussian::new(ws)?),
        Algorithm::Bezkrovny => Box::new(BlockStats::new(ws)?),
        Algorithm::Weber => Box::new(SummedAreaStats::new(ws)),
    })
}

/// Compares two grayscale images.
///
/// Once options and sizes validate the comparison always produces a map.
/// When the window does not fit the (possibly downsampled) image, the
/// sliding variants return an empty map and `mssim` is `NaN`.
pub fn ssim(a: &Matrix, b: &Matrix, options: &Options) -> SsimResult<SsimOutput> {
    let start = Instant::now();
    options.validate()?;
    a.same_shape(b)?;
    compare(a, b, options, start)
}

/// Compares two RGBA images after converting them with
/// `options.rgb2gray_version`.
pub fn ssim_rgba(a: RgbaView<'_>, b: RgbaView<'_>, options: &Options) -> SsimResult<SsimOutput> {
    let start = Instant::now();
    options.validate()?;
    if a.width() != b.width() || a.height() != b.height() {
        return Err(SsimError::DimensionMismatch {
            left_width: a.width(),
            left_height: a.height(),
            right_width: b.width(),
            right_height: b.height(),
        });
    }
    let gray_a = rgb2gray(a, options.rgb2gray_version);
    let gray_b = rgb2gray(b, options.rgb2gray_version);
    compare(&gray_a, &gray_b, options, start)
}

fn compare(a: &Matrix, b: &Matrix, options: &Options, start: Instant) -> SsimResult<SsimOutput> {
    let _span = trace_span!(
        "ssim",
        algorithm = options.algorithm.name(),
        width = a.width(),
        height = a.height()
    )
    .entered();

    let (a, b) = downsample(a, b, options)?;
    let provider = provider_for(options)?;
    let k = Stabilizers::from_options(options);
    let SsimMap { map, mssim } = provider.similarity(&a, &b, k)?;
    let mssim = mssim.unwrap_or_else(|| mean2d(&map));
    let elapsed_ms = start.elapsed().as_secs_f64() * 1e3;

    trace_event!(
        "ssim_done",
        map_width = map.width(),
        map_height = map.height(),
        mssim = mssim,
        elapsed_ms = elapsed_ms
    );

    Ok(SsimOutput {
        ssim_map: map,
        mssim,
        elapsed_ms,
    })
}
