//! Kåsa linear least-squares circle fitting.

use nalgebra::{Matrix3, Vector3};

use super::types::{Circle, FitError};

/// Minimum number of points for a determined circle fit.
pub(crate) const MIN_FIT_POINTS: usize = 3;

/// Determinant gate for the normalized normal matrix, relative to n³.
/// Below this the configuration is treated as collinear/coincident.
const DEGENERACY_TOL: f64 = 1e-10;

/// Fit a circle to a set of 2D points using the Kåsa linear least-squares
/// method.
///
/// The algebraic circle equation x² + y² + D·x + E·y + F = 0 is solved for
/// (D, E, F) via the 3×3 normal equations over rows [x, y, 1], then center
/// (−D/2, −E/2) and radius √((D/2)² + (E/2)² − F) are recovered. Fast and
/// non-iterative, but biased toward smaller circles on sparse noisy arcs.
///
/// Requires at least 3 non-collinear points.
pub fn fit_circle(points: &[[f64; 2]]) -> Result<Circle, FitError> {
    let n = points.len();
    if n < MIN_FIT_POINTS {
        return Err(FitError::TooFewPoints {
            needed: MIN_FIT_POINTS,
            got: n,
        });
    }
    if points
        .iter()
        .any(|p| !p[0].is_finite() || !p[1].is_finite())
    {
        return Err(FitError::NumericFailure);
    }

    // Normalize points for numerical stability: shift to centroid, scale so
    // that mean distance from centroid ≈ √2.
    let (mean_x, mean_y, scale, inv_scale) = normalization_params(points);

    // Normal equations (AᵀA)·[D, E, F]ᵀ = Aᵀb with rows aᵢ = [xᵢ, yᵢ, 1]
    // and bᵢ = −(xᵢ² + yᵢ²), accumulated in normalized coordinates.
    let mut ata = Matrix3::<f64>::zeros();
    let mut atb = Vector3::<f64>::zeros();
    for &[px, py] in points {
        let x = (px - mean_x) * scale;
        let y = (py - mean_y) * scale;
        let b = -(x * x + y * y);

        ata[(0, 0)] += x * x;
        ata[(0, 1)] += x * y;
        ata[(0, 2)] += x;
        ata[(1, 1)] += y * y;
        ata[(1, 2)] += y;
        ata[(2, 2)] += 1.0;

        atb[0] += x * b;
        atb[1] += y * b;
        atb[2] += b;
    }
    ata[(1, 0)] = ata[(0, 1)];
    ata[(2, 0)] = ata[(0, 2)];
    ata[(2, 1)] = ata[(1, 2)];

    // Collinear or coincident points leave AᵀA (numerically) singular.
    // Entries are O(n) after normalization, so gate the determinant
    // against n³.
    let det = ata.determinant();
    if !det.is_finite() || det.abs() < DEGENERACY_TOL * (n as f64).powi(3) {
        return Err(FitError::DegenerateInput);
    }

    let sol = ata.lu().solve(&atb).ok_or(FitError::DegenerateInput)?;
    let (d, e, f) = (sol[0], sol[1], sol[2]);

    // Recover center and radius in normalized coordinates.
    let ncx = -d / 2.0;
    let ncy = -e / 2.0;
    let r2 = ncx * ncx + ncy * ncy - f;
    if !r2.is_finite() || r2 <= 0.0 {
        return Err(FitError::NumericFailure);
    }

    let circle = Circle {
        cx: mean_x + ncx * inv_scale,
        cy: mean_y + ncy * inv_scale,
        r: r2.sqrt() * inv_scale,
    };
    if !circle.is_valid() {
        return Err(FitError::NumericFailure);
    }
    Ok(circle)
}

/// Compute normalization parameters for a point set.
/// Returns (mean_x, mean_y, scale, inv_scale).
pub(crate) fn normalization_params(points: &[[f64; 2]]) -> (f64, f64, f64, f64) {
    let n = points.len() as f64;
    let mean_x: f64 = points.iter().map(|p| p[0]).sum::<f64>() / n;
    let mean_y: f64 = points.iter().map(|p| p[1]).sum::<f64>() / n;

    let mean_dist: f64 = points
        .iter()
        .map(|p| ((p[0] - mean_x).powi(2) + (p[1] - mean_y).powi(2)).sqrt())
        .sum::<f64>()
        / n;

    let scale = if mean_dist > 1e-15 {
        std::f64::consts::SQRT_2 / mean_dist
    } else {
        1.0
    };

    (mean_x, mean_y, scale, 1.0 / scale)
}

/// RMS radial residual of points against a circle.
pub fn rms_radial_residual(circle: &Circle, points: &[[f64; 2]]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = points
        .iter()
        .map(|&[x, y]| {
            let d = circle.signed_distance(x, y);
            d * d
        })
        .sum();
    (sum_sq / points.len() as f64).sqrt()
}
