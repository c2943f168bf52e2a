//! SSIM options and their keyed parsing.

use std::fmt;
use std::str::FromStr;

use crate::util::{SsimError, SsimResult};

/// Statistics pipeline used to build the SSIM map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Algorithm {
    /// Separable Gaussian window through `conv2`.
    #[default]
    Fast,
    /// Dense `fspecial` window through `filter2`, matching the MATLAB script.
    Original,
    /// Non-overlapping tiles with plain means and variances.
    Bezkrovny,
    /// Sliding uniform windows over summed-area tables.
    Weber,
}

impl Algorithm {
    /// Every algorithm in declaration order.
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Fast,
        Algorithm::Original,
        Algorithm::Bezkrovny,
        Algorithm::Weber,
    ];

    /// The key used in options and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Fast => "fast",
            Algorithm::Original => "original",
            Algorithm::Bezkrovny => "bezkrovny",
            Algorithm::Weber => "weber",
        }
    }
}

impl FromStr for Algorithm {
    type Err = SsimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| SsimError::InvalidAlgorithm {
                name: s.to_string(),
            })
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How images are reduced before comparison.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Downsample {
    /// Box-filter and stride by `round(min(w, h) / max_size)`.
    #[default]
    Original,
    /// Resize while decoding; a no-op once pixels are in memory.
    Fast,
    /// Compare at full resolution.
    Off,
}

impl FromStr for Downsample {
    type Err = SsimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "original" => Ok(Downsample::Original),
            "fast" => Ok(Downsample::Fast),
            "off" | "false" => Ok(Downsample::Off),
            other => Err(SsimError::invalid_option(
                "downsample",
                format!("{other:?} is not one of original, fast, off"),
            )),
        }
    }
}

/// Luma weights used to turn RGBA pixels into grayscale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LumaVersion {
    /// ITU-R BT.709 weights, kept fractional.
    Original,
    /// MATLAB `rgb2gray` weights rounded to the nearest integer.
    #[default]
    Integer,
}

impl FromStr for LumaVersion {
    type Err = SsimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "original" => Ok(LumaVersion::Original),
            "integer" => Ok(LumaVersion::Integer),
            other => Err(SsimError::invalid_option(
                "rgb2grayVersion",
                format!("{other:?} is not one of original, integer"),
            )),
        }
    }
}

/// Parameters of one SSIM comparison.
///
/// Construct with struct-update syntax over [`Options::default`] or from
/// string pairs with [`Options::from_pairs`]; either way, [`crate::ssim`]
/// calls [`Options::validate`] before doing any work.
#[derive(Clone, Debug, PartialEq)]
pub struct Options {
    /// Window edge length in pixels.
    pub window_size: usize,
    /// Luminance stabilizer factor.
    pub k1: f64,
    /// Contrast stabilizer factor.
    pub k2: f64,
    /// Bits per sample; the dynamic range is `2^bit_depth - 1`.
    pub bit_depth: u32,
    pub downsample: Downsample,
    pub algorithm: Algorithm,
    /// Target size of the smaller image dimension when downsampling.
    pub max_size: usize,
    pub rgb2gray_version: LumaVersion,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            window_size: 11,
            k1: 0.01,
            k2: 0.03,
            bit_depth: 8,
            downsample: Downsample::Original,
            algorithm: Algorithm::Fast,
            max_size: 256,
            rgb2gray_version: LumaVersion::Integer,
        }
    }
}

impl Options {
    /// Keys accepted by [`Options::set`].
    pub const KEYS: [&'static str; 8] = [
        "windowSize",
        "k1",
        "k2",
        "bitDepth",
        "downsample",
        "ssim",
        "maxSize",
        "rgb2grayVersion",
    ];

    /// Defaults overridden by `key = value` pairs, then validated.
    pub fn from_pairs<I, K, V>(pairs: I) -> SsimResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut options = Options::default();
        for (key, value) in pairs {
            options.set(key.as_ref(), value.as_ref())?;
        }
        options.validate()?;
        Ok(options)
    }

    /// Parses `value` into the field named by `key`.
    pub fn set(&mut self, key: &str, value: &str) -> SsimResult<()> {
        let value = value.trim();
        match key {
            "windowSize" => self.window_size = parse_number(key, value)?,
            "k1" => self.k1 = parse_number(key, value)?,
            "k2" => self.k2 = parse_number(key, value)?,
            "bitDepth" => self.bit_depth = parse_number(key, value)?,
            "downsample" => self.downsample = value.parse()?,
            "ssim" => self.algorithm = value.parse()?,
            "maxSize" => self.max_size = parse_number(key, value)?,
            "rgb2grayVersion" => self.rgb2gray_version = value.parse()?,
            other => {
                return Err(SsimError::invalid_option(
                    other,
                    format!("not a valid option (use: {})", Options::KEYS.join(", ")),
                ))
            }
        }
        Ok(())
    }

    /// Checks ranges that the field types alone do not enforce.
    pub fn validate(&self) -> SsimResult<()> {
        check_stabilizer("k1", self.k1)?;
        check_stabilizer("k2", self.k2)?;
        if self.window_size == 0 {
            return Err(SsimError::invalid_option("windowSize", "must be at least 1"));
        }
        if !(1..=32).contains(&self.bit_depth) {
            return Err(SsimError::invalid_option(
                "bitDepth",
                format!("{} is outside 1..=32", self.bit_depth),
            ));
        }
        if self.max_size == 0 {
            return Err(SsimError::invalid_option("maxSize", "must be at least 1"));
        }
        Ok(())
    }

    /// Dynamic range `L = 2^bit_depth - 1`.
    pub fn dynamic_range(&self) -> f64 {
        2f64.powi(self.bit_depth as i32) - 1.0
    }
}

fn check_stabilizer(key: &str, value: f64) -> SsimResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(SsimError::invalid_option(
            key,
            format!("{value} must be a finite, non-negative number"),
        ));
    }
    Ok(())
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> SsimResult<T> {
    value
        .parse()
        .map_err(|_| SsimError::invalid_option(key, format!("{value:?} is not a valid number")))
}
