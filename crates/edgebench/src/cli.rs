//! Command-line interface for the `edgebench` binary.
//!
//! # Examples
//!
//! ```bash
//! # Default 256x256 synthetic image, one iteration per pipeline
//! edgebench
//!
//! # Ten timed iterations, tighter tolerance, debug dump of both magnitudes
//! edgebench -n 10 -t 0.001 --debug --dump
//! ```

use benchlog::ColorMode;
use clap::{ArgAction, Parser, ValueEnum};

/// Time a reference and a candidate edge pipeline on the same image and
/// compare their gradient magnitudes.
#[derive(Parser, Debug, Clone)]
#[command(name = "edgebench", author, version, about)]
pub struct Cli {
    /// Image height in pixels
    #[arg(long, default_value_t = 256)]
    pub rows: usize,

    /// Image width in pixels
    #[arg(long, default_value_t = 256)]
    pub cols: usize,

    /// Timed iterations per pipeline
    #[arg(long, short = 'n', default_value_t = 1)]
    pub iterations: u32,

    /// Absolute tolerance for the magnitude comparison
    #[arg(long, short = 't', default_value_t = 0.01, allow_negative_numbers = true)]
    pub tolerance: f32,

    /// Median blur window size (odd)
    #[arg(long, default_value_t = 9)]
    pub ksize: usize,

    /// Seed for the synthetic image speckles
    #[arg(long, default_value_t = 25)]
    pub seed: u64,

    /// Enable the debug channel
    ///
    /// Also enabled by `EDGEBENCH_DEBUG=1` or the `debug-log` build feature
    #[arg(long)]
    pub debug: bool,

    /// Dump both magnitude grids to the debug channel
    #[arg(long)]
    pub dump: bool,

    /// When to color channel output
    ///
    /// Falls back to `EDGEBENCH_COLOR`, then `auto`
    #[arg(long, value_enum)]
    pub color: Option<ColorChoice>,

    /// Increase internal tracing verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Color choice as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Color terminals only.
    Auto,
    /// Always color.
    Always,
    /// Never color.
    Never,
}

impl From<ColorChoice> for ColorMode {
    fn from(choice: ColorChoice) -> Self {
        match choice {
            ColorChoice::Auto => Self::Auto,
            ColorChoice::Always => Self::Always,
            ColorChoice::Never => Self::Never,
        }
    }
}
