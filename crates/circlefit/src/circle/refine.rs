//! Geometric circle refinement via robust Gauss-Newton / IRLS.

use nalgebra::{Matrix3, Vector3};

use super::fit::MIN_FIT_POINTS;
use super::types::{Circle, FitError, RefineConfig};

#[inline]
fn huber_weight(abs_r: f64, delta: f64) -> f64 {
    if abs_r <= delta {
        1.0
    } else {
        delta / abs_r
    }
}

/// Refine a circle estimate by minimizing robust geometric residuals
/// rᵢ = ‖pᵢ − c‖ − r over center and radius.
///
/// Seeded by an initial estimate, typically the Kåsa fit. Each iteration
/// solves the Huber-weighted normal equations for a Gauss-Newton step on
/// (cx, cy, r) and stops on step-norm convergence.
pub fn refine_circle(
    points: &[[f64; 2]],
    seed: &Circle,
    config: &RefineConfig,
) -> Result<Circle, FitError> {
    if points.len() < MIN_FIT_POINTS {
        return Err(FitError::TooFewPoints {
            needed: MIN_FIT_POINTS,
            got: points.len(),
        });
    }
    if !seed.is_valid() || seed.r <= 0.0 {
        return Err(FitError::NumericFailure);
    }

    let mut cx = seed.cx;
    let mut cy = seed.cy;
    let mut r = seed.r;
    let iters = config.max_iters.clamp(1, 80);
    let delta = config.huber_delta.max(1e-6);
    let mut converged = false;

    for it in 0..iters {
        let mut h = Matrix3::<f64>::zeros();
        let mut g = Vector3::<f64>::zeros();
        let mut n_used = 0usize;

        for p in points {
            let x = p[0];
            let y = p[1];
            if !x.is_finite() || !y.is_finite() {
                continue;
            }

            let dx = cx - x;
            let dy = cy - y;
            let dist = (dx * dx + dy * dy).sqrt();
            if !dist.is_finite() || dist <= 1e-12 {
                continue;
            }
            let res = dist - r;
            let w = huber_weight(res.abs(), delta);
            if !w.is_finite() || w <= 0.0 {
                continue;
            }

            // Jacobian of the residual wrt (cx, cy, r).
            let j = Vector3::new(dx / dist, dy / dist, -1.0);
            h += w * (j * j.transpose());
            g += w * (j * res);
            n_used += 1;
        }

        if n_used < MIN_FIT_POINTS {
            return Err(FitError::DegenerateInput);
        }

        // Light damping for near-degenerate arcs.
        h += Matrix3::<f64>::identity() * 1e-9;

        let step = h.lu().solve(&(-g)).ok_or(FitError::DegenerateInput)?;
        if !step[0].is_finite() || !step[1].is_finite() || !step[2].is_finite() {
            return Err(FitError::NumericFailure);
        }

        cx += step[0];
        cy += step[1];
        r += step[2];

        if (step[0] * step[0] + step[1] * step[1] + step[2] * step[2]).sqrt() < 1e-9 {
            converged = true;
            tracing::debug!("refine converged after {} iterations", it + 1);
            break;
        }
    }

    if !converged {
        tracing::debug!("refine stopped at iteration cap ({})", iters);
    }

    let circle = Circle { cx, cy, r };
    if !circle.is_valid() || circle.r <= 0.0 {
        return Err(FitError::NumericFailure);
    }
    Ok(circle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circle::fit::{fit_circle, rms_radial_residual};
    use approx::assert_relative_eq;
    use rand::prelude::*;

    fn make_test_circle() -> Circle {
        Circle {
            cx: 100.0,
            cy: 80.0,
            r: 25.0,
        }
    }

    #[test]
    fn test_refine_exact_points_is_stable() {
        let c = make_test_circle();
        let pts = c.sample_points(60);
        let refined =
            refine_circle(&pts, &c, &RefineConfig::default()).expect("refine should succeed");
        assert_relative_eq!(refined.cx, c.cx, epsilon = 1e-9);
        assert_relative_eq!(refined.cy, c.cy, epsilon = 1e-9);
        assert_relative_eq!(refined.r, c.r, epsilon = 1e-9);
    }

    #[test]
    fn test_refine_does_not_worsen_noisy_fit() {
        let c = make_test_circle();
        let mut pts = c.sample_points(150);
        let mut rng = StdRng::seed_from_u64(321);
        for p in &mut pts {
            p[0] += (rng.gen::<f64>() - 0.5) * 0.4;
            p[1] += (rng.gen::<f64>() - 0.5) * 0.4;
        }

        let seed = fit_circle(&pts).expect("seed fit should succeed");
        let refined =
            refine_circle(&pts, &seed, &RefineConfig::default()).expect("refine should succeed");

        // With huber_delta well above the noise level this is plain
        // Gauss-Newton on the L2 radial objective, whose optimum cannot be
        // worse than the algebraic seed.
        let rms_seed = rms_radial_residual(&seed, &pts);
        let rms_refined = rms_radial_residual(&refined, &pts);
        assert!(
            rms_refined <= rms_seed + 1e-9,
            "refined rms {} worse than seed rms {}",
            rms_refined,
            rms_seed
        );
    }

    #[test]
    fn test_refine_recovers_arc_radius() {
        // Kåsa shrinks the radius on sparse noisy arcs; the geometric fit
        // should pull it back toward the truth.
        let c = make_test_circle();
        let mut pts = c.sample_arc(80, 0.2, std::f64::consts::FRAC_PI_2);
        let mut rng = StdRng::seed_from_u64(777);
        for p in &mut pts {
            p[0] += (rng.gen::<f64>() - 0.5) * 0.2;
            p[1] += (rng.gen::<f64>() - 0.5) * 0.2;
        }

        let seed = fit_circle(&pts).expect("seed fit should succeed");
        let refined =
            refine_circle(&pts, &seed, &RefineConfig::default()).expect("refine should succeed");

        assert_relative_eq!(refined.cx, c.cx, epsilon = 1.0);
        assert_relative_eq!(refined.cy, c.cy, epsilon = 1.0);
        assert_relative_eq!(refined.r, c.r, epsilon = 1.0);
        assert!((refined.r - c.r).abs() <= (seed.r - c.r).abs() + 0.05);
    }

    #[test]
    fn test_refine_huber_downweights_outlier() {
        let c = make_test_circle();
        let mut pts = c.sample_points(50);
        pts.push([c.cx + 3.0 * c.r, c.cy]); // single gross outlier

        let seed = c;
        let config = RefineConfig {
            max_iters: 50,
            huber_delta: 0.5,
        };
        let refined = refine_circle(&pts, &seed, &config).expect("refine should succeed");

        // The outlier must not drag the radius far from the truth.
        assert_relative_eq!(refined.r, c.r, epsilon = 0.5);
        assert_relative_eq!(refined.cx, c.cx, epsilon = 0.5);
    }

    #[test]
    fn test_refine_too_few_points() {
        let c = make_test_circle();
        let pts = c.sample_points(2);
        assert_eq!(
            refine_circle(&pts, &c, &RefineConfig::default()),
            Err(FitError::TooFewPoints { needed: 3, got: 2 })
        );
    }

    #[test]
    fn test_refine_rejects_invalid_seed() {
        let pts = make_test_circle().sample_points(20);
        let bad = Circle {
            cx: 0.0,
            cy: 0.0,
            r: -1.0,
        };
        assert_eq!(
            refine_circle(&pts, &bad, &RefineConfig::default()),
            Err(FitError::NumericFailure)
        );
        let nan = Circle {
            cx: f64::NAN,
            cy: 0.0,
            r: 1.0,
        };
        assert_eq!(
            refine_circle(&pts, &nan, &RefineConfig::default()),
            Err(FitError::NumericFailure)
        );
    }

    #[test]
    fn test_refine_skips_non_finite_points() {
        let c = make_test_circle();
        let mut pts = c.sample_points(40);
        pts.push([f64::NAN, 0.0]);
        let refined =
            refine_circle(&pts, &c, &RefineConfig::default()).expect("refine should succeed");
        assert_relative_eq!(refined.r, c.r, epsilon = 1e-6);
    }
}
