//! Edge-detection pipelines used by the demo binary.
//!
//! Both pipelines run a median blur followed by Sobel gradients and the
//! gradient magnitude. The reference applies the 3×3 Sobel kernels directly;
//! the candidate uses the separable form (smooth, then differentiate) and
//! `f32::hypot`. They agree up to float rounding. Borders are replicated.

use crate::error::{HarnessError, Result};
use crate::grid::Grid;

/// Sobel smoothing taps.
const SMOOTH: [f32; 3] = [1.0, 2.0, 1.0];
/// Sobel derivative taps.
const DERIV: [f32; 3] = [-1.0, 0.0, 1.0];

/// Deterministic grayscale test image in `0.0..=255.0`.
///
/// A diagonal ramp overlaid with an 8-pixel checkerboard and sparse bright
/// speckles, so the median blur and the edge filters both have work to do.
#[must_use]
pub fn synthetic_image(rows: usize, cols: usize, seed: u64) -> Grid {
    let span = (rows + cols).max(1) as f32;
    Grid::from_fn(rows, cols, |r, c| {
        if speckle(r, c, seed) % 61 == 0 {
            return 255.0;
        }
        let ramp = (r + c) as f32 / span * 160.0;
        let checker = if (r / 8 + c / 8) % 2 == 0 { 64.0 } else { 0.0 };
        ramp + checker
    })
}

/// splitmix64 over the pixel coordinates.
fn speckle(r: usize, c: usize, seed: u64) -> u64 {
    let mut z = seed
        .wrapping_add(((r as u64) << 32) | c as u64)
        .wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Median filter with a `ksize × ksize` window.
///
/// # Errors
///
/// Returns [`HarnessError::InvalidKernelSize`] unless `ksize` is odd, or
/// [`HarnessError::KernelTooLarge`] if the window size overflows.
pub fn median_blur(image: &Grid, ksize: usize) -> Result<Grid> {
    let area = kernel_area(ksize)?;
    if ksize == 1 || image.is_empty() {
        return Ok(image.clone());
    }

    let radius = (ksize / 2) as isize;
    let mid = area / 2;
    let mut window = Vec::with_capacity(area);
    Ok(Grid::from_fn(image.rows(), image.cols(), |r, c| {
        window.clear();
        for dr in -radius..=radius {
            for dc in -radius..=radius {
                window.push(image.clamped(r as isize + dr, c as isize + dc));
            }
        }
        *window.select_nth_unstable_by(mid, f32::total_cmp).1
    }))
}

/// Validates a median kernel size and returns its window area.
///
/// # Errors
///
/// Returns [`HarnessError::InvalidKernelSize`] for an even size and
/// [`HarnessError::KernelTooLarge`] when `ksize * ksize` overflows.
pub fn kernel_area(ksize: usize) -> Result<usize> {
    if ksize % 2 == 0 {
        return Err(HarnessError::InvalidKernelSize(ksize));
    }
    ksize
        .checked_mul(ksize)
        .ok_or(HarnessError::KernelTooLarge(ksize))
}

/// Gradient magnitude from the direct 3×3 Sobel kernels.
#[must_use]
pub fn reference_magnitude(image: &Grid) -> Grid {
    if image.is_empty() {
        return image.clone();
    }
    Grid::from_fn(image.rows(), image.cols(), |r, c| {
        let mut dx = 0.0_f32;
        let mut dy = 0.0_f32;
        for (i, di) in (-1..=1_isize).enumerate() {
            for (j, dj) in (-1..=1_isize).enumerate() {
                let v = image.clamped(r as isize + di, c as isize + dj);
                dx += SMOOTH[i] * DERIV[j] * v;
                dy += DERIV[i] * SMOOTH[j] * v;
            }
        }
        (dx * dx + dy * dy).sqrt()
    })
}

/// Gradient magnitude from separable Sobel passes.
#[must_use]
pub fn candidate_magnitude(image: &Grid) -> Grid {
    if image.is_empty() {
        return image.clone();
    }
    let smooth_cols = vertical_pass(image, &SMOOTH);
    let deriv_cols = vertical_pass(image, &DERIV);
    let dx = horizontal_pass(&smooth_cols, &DERIV);
    let dy = horizontal_pass(&deriv_cols, &SMOOTH);

    let cols = image.cols();
    Grid::from_fn(image.rows(), cols, |r, c| {
        let i = r * cols + c;
        dx.as_slice()[i].hypot(dy.as_slice()[i])
    })
}

fn vertical_pass(image: &Grid, taps: &[f32; 3]) -> Grid {
    Grid::from_fn(image.rows(), image.cols(), |r, c| {
        let r = r as isize;
        let c = c as isize;
        taps[0] * image.clamped(r - 1, c)
            + taps[1] * image.clamped(r, c)
            + taps[2] * image.clamped(r + 1, c)
    })
}

fn horizontal_pass(image: &Grid, taps: &[f32; 3]) -> Grid {
    Grid::from_fn(image.rows(), image.cols(), |r, c| {
        let r = r as isize;
        let c = c as isize;
        taps[0] * image.clamped(r, c - 1)
            + taps[1] * image.clamped(r, c)
            + taps[2] * image.clamped(r, c + 1)
    })
}

/// Median blur, then [`reference_magnitude`].
///
/// # Errors
///
/// Propagates [`median_blur`] errors.
pub fn reference_pipeline(image: &Grid, ksize: usize) -> Result<Grid> {
    Ok(reference_magnitude(&median_blur(image, ksize)?))
}

/// Median blur, then [`candidate_magnitude`].
///
/// # Errors
///
/// Propagates [`median_blur`] errors.
pub fn candidate_pipeline(image: &Grid, ksize: usize) -> Result<Grid> {
    Ok(candidate_magnitude(&median_blur(image, ksize)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::compare;

    #[test]
    fn test_synthetic_image_is_deterministic_and_in_range() {
        let a = synthetic_image(20, 30, 7);
        let b = synthetic_image(20, 30, 7);
        assert_eq!(a, b);
        assert!(a.as_slice().iter().all(|v| (0.0..=255.0).contains(v)));
        assert_ne!(a, synthetic_image(20, 30, 8));
    }

    #[test]
    fn test_median_blur_rejects_even_kernel() {
        let image = Grid::new(3, 3);
        assert_eq!(
            median_blur(&image, 4).unwrap_err(),
            HarnessError::InvalidKernelSize(4)
        );
        assert_eq!(
            median_blur(&image, 0).unwrap_err(),
            HarnessError::InvalidKernelSize(0)
        );
    }

    #[test]
    fn test_kernel_area_rejects_overflow() {
        assert_eq!(kernel_area(1), Ok(1));
        assert_eq!(kernel_area(9), Ok(81));
        let huge = usize::MAX | 1;
        assert_eq!(kernel_area(huge), Err(HarnessError::KernelTooLarge(huge)));
        assert_eq!(
            median_blur(&Grid::new(2, 2), huge).unwrap_err(),
            HarnessError::KernelTooLarge(huge)
        );
    }

    #[test]
    fn test_median_blur_removes_isolated_spike() {
        let mut image = Grid::filled(5, 5, 10.0);
        image.set(2, 2, 255.0);
        let blurred = median_blur(&image, 3).unwrap();
        assert_eq!(blurred, Grid::filled(5, 5, 10.0));
    }

    #[test]
    fn test_flat_image_has_zero_gradient() {
        let image = Grid::filled(4, 6, 42.0);
        assert!(reference_magnitude(&image).as_slice().iter().all(|v| *v == 0.0));
        assert!(candidate_magnitude(&image).as_slice().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_vertical_edge_response() {
        // Columns 0..2 dark, 2..4 bright: dx peaks on the boundary.
        let image = Grid::from_fn(3, 4, |_, c| if c < 2 { 0.0 } else { 10.0 });
        let mag = reference_magnitude(&image);
        assert_eq!(mag.get(1, 1), Some(40.0));
        assert_eq!(mag.get(1, 2), Some(40.0));
        assert_eq!(mag.get(1, 0), Some(0.0));
    }

    #[test]
    fn test_pipelines_agree() {
        let image = synthetic_image(40, 48, 25);
        let reference = reference_pipeline(&image, 3).unwrap();
        let candidate = candidate_pipeline(&image, 3).unwrap();
        let result = compare(&reference, &candidate, 1e-2).unwrap();
        assert!(result.passed(), "{result:?}");
    }
}
