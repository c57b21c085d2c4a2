#![forbid(unsafe_code)]

//! # Edgebench CLI
//!
//! Runs the reference and candidate edge pipelines on a synthetic image,
//! times each, then compares the two gradient magnitudes once.
//!
//! Exit status: `0` when the magnitudes agree, `1` when they diverge, `2`
//! when the run itself is rejected.

mod cli;

use std::process::ExitCode;

use anyhow::Context;
use benchlog::{LogConfig, LogStream, Logs};
use clap::Parser;
use edgebench::pipeline::{candidate_pipeline, kernel_area, reference_pipeline, synthetic_image};
use edgebench::{
    Grid, Harness, HarnessError, check_tolerance, compare, dump_grid, report_comparison,
};
use tracing_subscriber::EnvFilter;

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            // No channels yet; fall back to a plain error channel.
            let mut logs = Logs::new(&LogConfig::default());
            logs.error().write(format_args!("{err:#}")).end_line();
            return ExitCode::from(2);
        }
    };
    let mut logs = Logs::new(&config);

    match run(&cli, &mut logs) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            logs.error().write(format_args!("{err:#}")).end_line();
            ExitCode::from(2)
        }
    }
}

/// Environment first, command-line flags on top.
fn resolve_config(cli: &Cli) -> anyhow::Result<LogConfig> {
    let mut config = LogConfig::from_env().context("reading log configuration")?;
    config.debug |= cli.debug;
    if let Some(color) = cli.color {
        config.color = color.into();
    }
    Ok(config)
}

fn init_tracing(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Rejects misuse before anything is announced or measured.
fn validate(cli: &Cli) -> edgebench::Result<()> {
    if cli.iterations == 0 {
        return Err(HarnessError::ZeroIterations {
            label: "--iterations".to_string(),
        });
    }
    Grid::check_shape(cli.rows, cli.cols)?;
    kernel_area(cli.ksize)?;
    check_tolerance(cli.tolerance)
}

fn run(cli: &Cli, logs: &mut Logs) -> anyhow::Result<bool> {
    validate(cli).context("invalid arguments")?;

    logs.info()
        .write("edge pipelines on a ")
        .write(cli.rows)
        .write('x')
        .write(cli.cols)
        .write(" synthetic image, ")
        .write(cli.iterations)
        .write(" iteration(s), median ksize ")
        .write(cli.ksize)
        .end_line();
    tracing::debug!(seed = cli.seed, tolerance = cli.tolerance, "starting run");

    let image = synthetic_image(cli.rows, cli.cols, cli.seed);

    let mut harness = Harness::new(logs);
    let reference = harness
        .try_run("reference calculate time", cli.iterations, || {
            reference_pipeline(&image, cli.ksize)
        })
        .context("reference pipeline")?;
    let candidate = harness
        .try_run("candidate calculate time", cli.iterations, || {
            candidate_pipeline(&image, cli.ksize)
        })
        .context("candidate pipeline")?;

    if cli.dump {
        dump_grid(logs.debug(), "reference magnitude", &reference);
        dump_grid(logs.debug(), "candidate magnitude", &candidate);
    }

    let result = compare(&reference, &candidate, cli.tolerance).context("comparing magnitudes")?;
    report_comparison(logs, "reference vs candidate magnitude", &result);
    Ok(result.passed())
}
