//! Circle fitting primitives.
//!
//! Implements:
//! - Kåsa linear least-squares algebraic fit (normal equations over the
//!   algebraic circle equation).
//! - Robust Gauss-Newton / IRLS geometric refinement.
//! - RANSAC wrapper for outlier-robust fitting.
//! - Radial residual metrics.

mod fit;
mod ransac;
mod refine;
mod types;

pub use fit::{fit_circle, rms_radial_residual};
pub use ransac::{fit_circle_ransac, try_fit_circle_ransac};
pub use refine::refine_circle;
pub use types::{
    points_from_interleaved, Circle, FitError, RansacConfig, RansacResult, RefineConfig,
};
