//! Tolerance comparison of two equally shaped grids.

use tracing::debug;

use crate::error::{HarnessError, Result};
use crate::grid::Grid;

/// Outcome of [`compare`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonResult {
    /// Absolute tolerance the comparison used.
    pub tolerance: f32,
    /// Number of compared element pairs.
    pub elements: usize,
    /// Pairs whose absolute difference exceeds the tolerance (or is NaN).
    pub divergent: usize,
    /// Largest finite-or-infinite absolute difference seen. NaN differences
    /// are counted as divergent but never stored here.
    pub max_diff: f32,
    /// `(row, col)` of the first divergent pair in row-major order.
    pub first_divergence: Option<(usize, usize)>,
}

impl ComparisonResult {
    /// True when no pair diverged.
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.divergent == 0
    }
}

/// Accepts finite, non-negative tolerances.
///
/// # Errors
///
/// Returns [`HarnessError::InvalidTolerance`] otherwise.
pub fn check_tolerance(tolerance: f32) -> Result<()> {
    if tolerance.is_finite() && tolerance >= 0.0 {
        Ok(())
    } else {
        Err(HarnessError::InvalidTolerance(tolerance))
    }
}

/// Compares `candidate` against `reference` element by element.
///
/// A pair diverges when `|reference - candidate| > tolerance`. The test is
/// absolute: values near zero get no relative slack.
///
/// # Errors
///
/// - [`HarnessError::ShapeMismatch`] if the shapes differ.
/// - [`HarnessError::InvalidTolerance`] if `tolerance` is negative or not
///   finite.
pub fn compare(reference: &Grid, candidate: &Grid, tolerance: f32) -> Result<ComparisonResult> {
    if reference.shape() != candidate.shape() {
        return Err(HarnessError::ShapeMismatch {
            reference: reference.shape(),
            candidate: candidate.shape(),
        });
    }
    check_tolerance(tolerance)?;

    let cols = reference.cols();
    let mut divergent = 0;
    let mut max_diff = 0.0_f32;
    let mut first_divergence = None;

    for (i, (r, c)) in reference
        .as_slice()
        .iter()
        .zip(candidate.as_slice())
        .enumerate()
    {
        let diff = (r - c).abs();
        if diff > max_diff {
            max_diff = diff;
        }
        let within = diff <= tolerance;
        if !within {
            divergent += 1;
            if first_divergence.is_none() {
                first_divergence = Some((i / cols, i % cols));
            }
        }
    }

    debug!(
        elements = reference.len(),
        divergent,
        max_diff,
        tolerance,
        "comparison finished"
    );

    Ok(ComparisonResult {
        tolerance,
        elements: reference.len(),
        divergent,
        max_diff,
        first_divergence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_grids_pass_at_zero_tolerance() {
        let grid = Grid::from_fn(4, 5, |r, c| (r as f32).sin() * c as f32);
        let result = compare(&grid, &grid, 0.0).unwrap();
        assert!(result.passed());
        assert_eq!(result.divergent, 0);
        assert_eq!(result.max_diff, 0.0);
        assert_eq!(result.first_divergence, None);
        assert_eq!(result.elements, 20);
    }

    #[test]
    fn test_single_divergent_element() {
        let reference = Grid::filled(3, 3, 2.0);
        let mut candidate = reference.clone();
        candidate.set(1, 2, 2.5);
        let result = compare(&reference, &candidate, 0.25).unwrap();
        assert!(!result.passed());
        assert_eq!(result.divergent, 1);
        assert_eq!(result.max_diff, 0.5);
        assert_eq!(result.first_divergence, Some((1, 2)));
    }

    #[test]
    fn test_difference_equal_to_tolerance_passes() {
        let reference = Grid::filled(1, 2, 1.0);
        let candidate = Grid::filled(1, 2, 1.5);
        let result = compare(&reference, &candidate, 0.5).unwrap();
        assert!(result.passed());
        assert_eq!(result.max_diff, 0.5);
    }

    #[test]
    fn test_absolute_not_relative() {
        let reference = Grid::from_vec(1, 2, vec![1e-6, 1000.0]).unwrap();
        let candidate = Grid::from_vec(1, 2, vec![3e-6, 1000.0005]).unwrap();
        let result = compare(&reference, &candidate, 1e-3).unwrap();
        assert!(result.passed());
    }

    #[test]
    fn test_shape_mismatch() {
        let err = compare(&Grid::new(2, 3), &Grid::new(3, 2), 1.0).unwrap_err();
        assert_eq!(
            err,
            HarnessError::ShapeMismatch {
                reference: (2, 3),
                candidate: (3, 2)
            }
        );
    }

    #[test]
    fn test_check_tolerance() {
        assert!(check_tolerance(0.0).is_ok());
        assert!(check_tolerance(1e-3).is_ok());
        assert_eq!(
            check_tolerance(-1.0),
            Err(HarnessError::InvalidTolerance(-1.0))
        );
        assert!(check_tolerance(f32::NAN).is_err());
    }

    #[test]
    fn test_invalid_tolerance() {
        let grid = Grid::new(1, 1);
        for tolerance in [-0.1, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                compare(&grid, &grid, tolerance),
                Err(HarnessError::InvalidTolerance(_))
            ));
        }
    }

    #[test]
    fn test_nan_counts_as_divergent() {
        let reference = Grid::from_vec(1, 2, vec![1.0, f32::NAN]).unwrap();
        let candidate = Grid::from_vec(1, 2, vec![1.0, 1.0]).unwrap();
        let result = compare(&reference, &candidate, 10.0).unwrap();
        assert_eq!(result.divergent, 1);
        assert_eq!(result.first_divergence, Some((0, 1)));
        assert_eq!(result.max_diff, 0.0);
    }

    #[test]
    fn test_empty_grids_pass() {
        let result = compare(&Grid::new(0, 0), &Grid::new(0, 0), 0.0).unwrap();
        assert!(result.passed());
        assert_eq!(result.elements, 0);
    }
}
