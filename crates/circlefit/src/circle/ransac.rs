//! RANSAC wrapper for outlier-robust circle fitting.

use super::fit::{fit_circle, MIN_FIT_POINTS};
use super::types::{Circle, FitError, RansacConfig, RansacResult};

/// Fit a circle robustly using RANSAC.
///
/// Samples 3-point minimal subsets, solves the circumcircle in closed form,
/// and selects the model with the most radial-distance inliers. The final
/// model is re-fit to all inliers.
pub fn fit_circle_ransac(points: &[[f64; 2]], config: &RansacConfig) -> Option<RansacResult> {
    use rand::prelude::*;

    let n = points.len();
    if n < MIN_FIT_POINTS {
        return None;
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut best_inlier_count = 0usize;
    let mut best_circle: Option<Circle> = None;
    let mut best_mask: Vec<bool> = vec![false; n];

    for it in 0..config.max_iters {
        // Sample 3 random points
        let sample = sample_indices(&mut rng, n, MIN_FIT_POINTS);

        let Some(circle) =
            circumcircle(points[sample[0]], points[sample[1]], points[sample[2]])
        else {
            continue;
        };

        // Count inliers on absolute radial distance, which is directly
        // threshold-interpretable in the input units.
        let mut inlier_count = 0usize;
        let mut mask = vec![false; n];
        for (i, &[x, y]) in points.iter().enumerate() {
            if circle.signed_distance(x, y).abs() < config.inlier_threshold {
                mask[i] = true;
                inlier_count += 1;
            }
        }

        if inlier_count > best_inlier_count {
            best_inlier_count = inlier_count;
            best_circle = Some(circle);
            best_mask = mask;

            // Early exit: if >90% of points are inliers, stop searching
            if best_inlier_count * 10 > n * 9 {
                tracing::debug!(
                    "ransac early exit after {} iterations ({} of {} inliers)",
                    it + 1,
                    best_inlier_count,
                    n
                );
                break;
            }
        }
    }

    // Check minimum inlier count
    if best_inlier_count < config.min_inliers {
        return None;
    }

    // Re-fit to all inliers
    let inlier_pts: Vec<[f64; 2]> = best_mask
        .iter()
        .zip(points.iter())
        .filter(|(&m, _)| m)
        .map(|(_, &p)| p)
        .collect();

    let final_circle = fit_circle(&inlier_pts).ok().or(best_circle)?;

    // Recompute inlier count with the final model
    let mut final_count = 0;
    for &[x, y] in points {
        if final_circle.signed_distance(x, y).abs() < config.inlier_threshold {
            final_count += 1;
        }
    }

    Some(RansacResult {
        circle: final_circle,
        num_inliers: final_count,
    })
}

/// Fit a circle robustly via RANSAC, returning detailed errors.
pub fn try_fit_circle_ransac(
    points: &[[f64; 2]],
    config: &RansacConfig,
) -> Result<RansacResult, FitError> {
    let n = points.len();
    if n < MIN_FIT_POINTS {
        return Err(FitError::TooFewPoints {
            needed: MIN_FIT_POINTS,
            got: n,
        });
    }
    fit_circle_ransac(points, config).ok_or(FitError::InsufficientInliers {
        needed: config.min_inliers,
        found: 0,
    })
}

/// Exact circle through three points (circumcircle), solved from the
/// perpendicular-bisector intersection in determinant form.
/// Returns `None` for collinear points.
pub(crate) fn circumcircle(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> Option<Circle> {
    let d = 2.0 * (a[0] * (b[1] - c[1]) + b[0] * (c[1] - a[1]) + c[0] * (a[1] - b[1]));
    if !d.is_finite() || d.abs() < 1e-12 {
        return None;
    }

    let aa = a[0] * a[0] + a[1] * a[1];
    let bb = b[0] * b[0] + b[1] * b[1];
    let cc = c[0] * c[0] + c[1] * c[1];

    let ux = (aa * (b[1] - c[1]) + bb * (c[1] - a[1]) + cc * (a[1] - b[1])) / d;
    let uy = (aa * (c[0] - b[0]) + bb * (a[0] - c[0]) + cc * (b[0] - a[0])) / d;
    let r = ((a[0] - ux).powi(2) + (a[1] - uy).powi(2)).sqrt();

    let circle = Circle {
        cx: ux,
        cy: uy,
        r,
    };
    circle.is_valid().then_some(circle)
}

/// Sample `k` distinct indices from `0..n` using Fisher–Yates partial shuffle.
fn sample_indices(rng: &mut impl rand::Rng, n: usize, k: usize) -> Vec<usize> {
    debug_assert!(k <= n);
    let mut indices: Vec<usize> = (0..n).collect();
    for i in 0..k {
        let j = rng.gen_range(i..n);
        indices.swap(i, j);
    }
    indices.truncate(k);
    indices
}
