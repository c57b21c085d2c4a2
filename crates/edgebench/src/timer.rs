//! Monotonic timing and the multi-iteration run harness.
//!
//! A run times `iterations` calls of an operation, keeps only the last
//! output, and writes exactly one summary line to the info channel:
//!
//! ```text
//! [ INFO ] median+sobel : 12.345 ms total, 3 iteration(s), 4.115 ms per iteration
//! ```

use std::fmt;
use std::time::{Duration, Instant};

use benchlog::{LogStream, Logs};
use tracing::trace;

use crate::error::{HarnessError, Result};

/// Monotonic elapsed-time counter.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    start: Instant,
}

impl Stopwatch {
    /// Starts counting now.
    #[must_use]
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Time since start.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Accumulated timing of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingSample {
    /// What was measured.
    pub label: String,
    /// Number of timed calls. Never zero.
    pub iterations: u32,
    /// Sum of the per-call durations.
    pub elapsed: Duration,
}

impl TimingSample {
    /// Mean duration of one call.
    #[must_use]
    pub fn mean(&self) -> Duration {
        self.elapsed / self.iterations.max(1)
    }
}

impl fmt::Display for TimingSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} : {:.3} ms total, {} iteration(s), {:.3} ms per iteration",
            self.label,
            millis(self.elapsed),
            self.iterations,
            millis(self.mean())
        )
    }
}

fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Output of the final iteration together with the run's timing.
#[derive(Debug, Clone, PartialEq)]
pub struct Measured<T> {
    /// Value returned by the last call.
    pub output: T,
    /// Timing of all calls.
    pub sample: TimingSample,
}

/// Times `iterations` calls of `op` without logging.
///
/// # Errors
///
/// Returns [`HarnessError::ZeroIterations`] if `iterations` is zero; `op` is
/// not called in that case.
pub fn measure<T, F>(label: &str, iterations: u32, mut op: F) -> Result<Measured<T>>
where
    F: FnMut() -> T,
{
    try_measure(label, iterations, || Ok::<T, HarnessError>(op()))
}

/// Like [`measure`] for fallible operations; the first error stops the run.
///
/// # Errors
///
/// Returns the operation's error unchanged, or
/// [`HarnessError::ZeroIterations`] converted into `E`.
pub fn try_measure<T, E, F>(
    label: &str,
    iterations: u32,
    mut op: F,
) -> std::result::Result<Measured<T>, E>
where
    F: FnMut() -> std::result::Result<T, E>,
    E: From<HarnessError>,
{
    if iterations == 0 {
        return Err(HarnessError::ZeroIterations {
            label: label.to_string(),
        }
        .into());
    }

    let mut elapsed = Duration::ZERO;
    let mut output = timed_call(&mut op, label, 1, &mut elapsed)?;
    for iteration in 2..=iterations {
        output = timed_call(&mut op, label, iteration, &mut elapsed)?;
    }

    Ok(Measured {
        output,
        sample: TimingSample {
            label: label.to_string(),
            iterations,
            elapsed,
        },
    })
}

fn timed_call<T, E, F>(
    op: &mut F,
    label: &str,
    iteration: u32,
    elapsed: &mut Duration,
) -> std::result::Result<T, E>
where
    F: FnMut() -> std::result::Result<T, E>,
{
    let watch = Stopwatch::start();
    let output = op();
    let took = watch.elapsed();
    *elapsed += took;
    trace!(
        target: "edgebench::timer",
        label,
        iteration,
        micros = took.as_micros() as u64,
        "iteration finished"
    );
    output
}

/// Runs operations and reports their timing through a [`Logs`] context.
#[derive(Debug)]
pub struct Harness<'a> {
    logs: &'a mut Logs,
}

impl<'a> Harness<'a> {
    /// Binds the harness to the channels it reports through.
    pub fn new(logs: &'a mut Logs) -> Self {
        Self { logs }
    }

    /// Times `iterations` calls of `op`, logs one timing line and returns the
    /// last call's output.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::ZeroIterations`] if `iterations` is zero.
    /// Nothing is logged in that case.
    pub fn run<T, F>(&mut self, label: &str, iterations: u32, op: F) -> Result<T>
    where
        F: FnMut() -> T,
    {
        let measured = measure(label, iterations, op)?;
        self.report(&measured.sample);
        Ok(measured.output)
    }

    /// Like [`run`](Self::run) for fallible operations.
    ///
    /// The first error from `op` stops the loop and is returned unchanged;
    /// no timing line is written for an aborted run.
    ///
    /// # Errors
    ///
    /// Returns the operation's error, or [`HarnessError::ZeroIterations`]
    /// converted into `E`.
    pub fn try_run<T, E, F>(
        &mut self,
        label: &str,
        iterations: u32,
        op: F,
    ) -> std::result::Result<T, E>
    where
        F: FnMut() -> std::result::Result<T, E>,
        E: From<HarnessError>,
    {
        let measured = try_measure(label, iterations, op)?;
        self.report(&measured.sample);
        Ok(measured.output)
    }

    /// Writes one timing line to the info channel.
    pub fn report(&mut self, sample: &TimingSample) {
        self.logs.info().write(sample).end_line();
    }
}
