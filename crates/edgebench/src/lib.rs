#![forbid(unsafe_code)]
// Numeric code casts between index and float types freely.
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

//! # Edgebench
//!
//! Timed reference-vs-candidate comparison harness for image pipelines.
//!
//! Edgebench provides:
//! - **Harness**: run an operation N times on a monotonic clock and log one
//!   timing line per run
//! - **Comparator**: absolute-tolerance comparison of two equally shaped grids
//! - **Reports**: pass/fail lines and grid dumps through [`benchlog`] channels
//! - **Pipelines**: a reference and a candidate edge detector for the demo
//!
//! ## Example
//!
//! ```rust
//! use benchlog::{ColorMode, LogConfig, Logs, MemorySink, Sink};
//! use edgebench::{Grid, Harness, compare, report_comparison};
//!
//! let out = MemorySink::new();
//! let config = LogConfig { debug: false, color: ColorMode::Never };
//! let mut logs = Logs::with_sinks(&config, Sink::new(out.clone()), Sink::stderr());
//!
//! let mut harness = Harness::new(&mut logs);
//! let reference = harness.run("reference", 3, || Grid::filled(3, 3, 1.0)).unwrap();
//! let candidate = harness.run("candidate", 3, || Grid::filled(3, 3, 1.0)).unwrap();
//!
//! // Time N runs, compare once.
//! let result = compare(&reference, &candidate, 0.01).unwrap();
//! report_comparison(&mut logs, "magnitude", &result);
//!
//! assert!(result.passed());
//! assert_eq!(out.contents().lines().count(), 3);
//! ```

pub mod compare;
pub mod error;
pub mod grid;
pub mod pipeline;
pub mod report;
pub mod timer;

pub use compare::{ComparisonResult, check_tolerance, compare};
pub use error::{HarnessError, Result};
pub use grid::Grid;
pub use report::{dump_grid, report_comparison};
pub use timer::{Harness, Measured, Stopwatch, TimingSample, measure, try_measure};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::compare::{ComparisonResult, check_tolerance, compare};
    pub use crate::error::{HarnessError, Result};
    pub use crate::grid::Grid;
    pub use crate::report::{dump_grid, report_comparison};
    pub use crate::timer::{Harness, Measured, Stopwatch, TimingSample, measure, try_measure};
    pub use benchlog::prelude::*;
}
