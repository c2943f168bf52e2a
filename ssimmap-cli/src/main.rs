use clap::Parser;
use serde::{Deserialize, Serialize};
use ssimmap::io::{load_rgba, load_rgba_limited, view_from_rgba_image, RgbaImage};
use ssimmap::{ssim_rgba, Algorithm, Downsample, LumaVersion, Matrix, Options};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Structural similarity between two images")]
struct Cli {
    /// Reference image.
    #[arg(required_unless_present_any = ["print_schema", "print_example"])]
    reference: Option<PathBuf>,
    /// Image compared against the reference.
    #[arg(required_unless_present_any = ["print_schema", "print_example"])]
    target: Option<PathBuf>,
    /// JSON options file; keys as in `--print-example`.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Override one option, e.g. `--set ssim=weber`. Applied after `--config`.
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    overrides: Vec<(String, String)>,
    /// Write the SSIM map as JSON to this file.
    #[arg(long, value_name = "FILE")]
    map: Option<PathBuf>,
    /// Print the JSON schema of the options file and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example options file and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {s:?}"))?;
    Ok((key.trim().to_string(), value.trim().to_string()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum AlgorithmConfig {
    Fast,
    Original,
    Bezkrovny,
    Weber,
}

impl From<AlgorithmConfig> for Algorithm {
    fn from(value: AlgorithmConfig) -> Self {
        match value {
            AlgorithmConfig::Fast => Algorithm::Fast,
            AlgorithmConfig::Original => Algorithm::Original,
            AlgorithmConfig::Bezkrovny => Algorithm::Bezkrovny,
            AlgorithmConfig::Weber => Algorithm::Weber,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum DownsampleConfig {
    Original,
    Fast,
    Off,
}

impl From<DownsampleConfig> for Downsample {
    fn from(value: DownsampleConfig) -> Self {
        match value {
            DownsampleConfig::Original => Downsample::Original,
            DownsampleConfig::Fast => Downsample::Fast,
            DownsampleConfig::Off => Downsample::Off,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum LumaConfig {
    Original,
    Integer,
}

impl From<LumaConfig> for LumaVersion {
    fn from(value: LumaConfig) -> Self {
        match value {
            LumaConfig::Original => LumaVersion::Original,
            LumaConfig::Integer => LumaVersion::Integer,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
struct Config {
    window_size: usize,
    k1: f64,
    k2: f64,
    bit_depth: u32,
    downsample: Option<DownsampleConfig>,
    ssim: Option<AlgorithmConfig>,
    max_size: usize,
    rgb2gray_version: Option<LumaConfig>,
}

impl Default for Config {
    fn default() -> Self {
        let opts = Options::default();
        Self {
            window_size: opts.window_size,
            k1: opts.k1,
            k2: opts.k2,
            bit_depth: opts.bit_depth,
            downsample: None,
            ssim: None,
            max_size: opts.max_size,
            rgb2gray_version: None,
        }
    }
}

impl From<Config> for Options {
    fn from(value: Config) -> Self {
        let defaults = Options::default();
        Options {
            window_size: value.window_size,
            k1: value.k1,
            k2: value.k2,
            bit_depth: value.bit_depth,
            downsample: value.downsample.map_or(defaults.downsample, Into::into),
            algorithm: value.ssim.map_or(defaults.algorithm, Into::into),
            max_size: value.max_size,
            rgb2gray_version: value
                .rgb2gray_version
                .map_or(defaults.rgb2gray_version, Into::into),
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    mssim: f64,
    elapsed_ms: f64,
    width: usize,
    height: usize,
}

#[derive(Debug, Serialize)]
struct MapRecord<'a> {
    width: usize,
    height: usize,
    data: &'a [f64],
}

impl<'a> From<&'a Matrix> for MapRecord<'a> {
    fn from(value: &'a Matrix) -> Self {
        Self {
            width: value.width(),
            height: value.height(),
            data: value.data(),
        }
    }
}

fn load(path: &Path, options: &Options) -> ssimmap::SsimResult<RgbaImage> {
    match options.downsample {
        Downsample::Fast => load_rgba_limited(path, options.max_size),
        Downsample::Original | Downsample::Off => load_rgba(path),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("ssimmap=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let (Some(reference), Some(target)) = (cli.reference.as_deref(), cli.target.as_deref()) else {
        return Err("both image paths are required".into());
    };

    let config: Config = match &cli.config {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => Config::default(),
    };
    let mut options = Options::from(config);
    for (key, value) in &cli.overrides {
        options.set(key, value)?;
    }
    options.validate()?;

    let image_a = load(reference, &options)?;
    let image_b = load(target, &options)?;
    tracing::info!(
        width = image_a.width(),
        height = image_a.height(),
        algorithm = %options.algorithm,
        "images decoded"
    );
    let out = ssim_rgba(
        view_from_rgba_image(&image_a)?,
        view_from_rgba_image(&image_b)?,
        &options,
    )?;

    if let Some(path) = &cli.map {
        let json = serde_json::to_string(&MapRecord::from(&out.ssim_map))?;
        fs::write(path, json)?;
    }

    let output = Output {
        mssim: out.mssim,
        elapsed_ms: out.elapsed_ms,
        width: out.ssim_map.width(),
        height: out.ssim_map.height(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
