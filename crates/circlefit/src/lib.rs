//! circlefit — least-squares circle fitting for 2D point samples.
//!
//! The fitting stage of a hand-tracking pipeline, extracted as a library:
//! upstream code supplies sampled contour points, this crate estimates the
//! best-fit circle (center and radius). The stages are:
//!
//! 1. **Algebraic fit** – Kåsa linear least squares on the implicit circle
//!    equation. Fast, non-iterative, the default.
//! 2. **Geometric refinement** – robust Gauss-Newton / IRLS on true radial
//!    residuals, seeded by the algebraic fit (opt-in).
//! 3. **Robust fit** – RANSAC over 3-point circumcircle hypotheses for
//!    outlier-contaminated samples (opt-in).
//!
//! # Public API
//! - [`fit_circle`], [`refine_circle`], [`try_fit_circle_ransac`] as entry
//!   points, with [`Circle`] and [`FitError`] as the result vocabulary
//! - [`fit_report`] for a serializable one-shot fit summary
//!
//! All computation is synchronous, stateless, and free of global state;
//! calls are safe to issue concurrently on independent inputs.

mod circle;

pub use circle::{
    fit_circle, fit_circle_ransac, points_from_interleaved, refine_circle, rms_radial_residual,
    try_fit_circle_ransac, Circle, FitError, RansacConfig, RansacResult, RefineConfig,
};

/// Fitting strategy selector for [`fit_report`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitMethod {
    /// Kåsa linear least squares only.
    Kasa,
    /// Kåsa seed followed by IRLS geometric refinement.
    Geometric,
    /// RANSAC robust fit.
    Ransac,
}

/// Summary of one circle fit (serialization-friendly).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FitReport {
    /// Fitted circle in the caller's coordinate frame.
    pub circle: Circle,
    /// Method that produced the fit.
    pub method: FitMethod,
    /// Number of input points.
    pub n_points: usize,
    /// Number of RANSAC inliers (robust fits only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_inliers: Option<usize>,
    /// RMS radial residual of all input points against the fitted circle.
    pub rms_residual: f64,
}

/// Fit with the selected method and produce a serializable report.
///
/// `ransac` and `refine` are consulted only by the methods that use them.
pub fn fit_report(
    points: &[[f64; 2]],
    method: FitMethod,
    ransac: &RansacConfig,
    refine: &RefineConfig,
) -> Result<FitReport, FitError> {
    let (circle, num_inliers) = match method {
        FitMethod::Kasa => (fit_circle(points)?, None),
        FitMethod::Geometric => {
            let seed = fit_circle(points)?;
            (refine_circle(points, &seed, refine)?, None)
        }
        FitMethod::Ransac => {
            let result = try_fit_circle_ransac(points, ransac)?;
            (result.circle, Some(result.num_inliers))
        }
    };

    Ok(FitReport {
        circle,
        method,
        n_points: points.len(),
        num_inliers,
        rms_residual: rms_radial_residual(&circle, points),
    })
}
