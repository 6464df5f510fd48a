//! Core circle type, fit configurations, and error taxonomy.

use serde::{Deserialize, Serialize};

// ── Error type ─────────────────────────────────────────────────────────────

/// Errors that can occur during circle fitting.
#[derive(Debug, Clone, PartialEq)]
pub enum FitError {
    /// Too few points for the requested operation.
    TooFewPoints {
        /// Required minimum number of points.
        needed: usize,
        /// Provided number of points.
        got: usize,
    },
    /// Points are collinear or coincident within numerical tolerance; no
    /// unique finite circle passes through them.
    DegenerateInput,
    /// Non-finite input or numerical breakdown in the solve.
    NumericFailure,
    /// RANSAC could not find enough inliers.
    InsufficientInliers {
        /// Required minimum number of inliers.
        needed: usize,
        /// Number of inliers found by RANSAC.
        found: usize,
    },
}

impl std::fmt::Display for FitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooFewPoints { needed, got } => {
                write!(f, "too few points: need {}, got {}", needed, got)
            }
            Self::DegenerateInput => write!(f, "degenerate input: no unique circle"),
            Self::NumericFailure => write!(f, "numeric failure in circle solve"),
            Self::InsufficientInliers { needed, found } => {
                write!(f, "insufficient inliers: need {}, found {}", needed, found)
            }
        }
    }
}

impl std::error::Error for FitError {}

// ── Types ──────────────────────────────────────────────────────────────────

/// Geometric circle parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    /// Center x, in the caller's coordinate frame.
    pub cx: f64,
    /// Center y.
    pub cy: f64,
    /// Radius. Non-negative for any circle produced by a fit.
    pub r: f64,
}

impl Circle {
    /// Check basic validity: non-negative radius, finite values.
    pub fn is_valid(&self) -> bool {
        self.r >= 0.0 && self.r.is_finite() && self.cx.is_finite() && self.cy.is_finite()
    }

    /// Signed radial distance of a point to the circle boundary
    /// (negative inside, positive outside).
    pub fn signed_distance(&self, x: f64, y: f64) -> f64 {
        let dx = x - self.cx;
        let dy = y - self.cy;
        (dx * dx + dy * dy).sqrt() - self.r
    }

    /// Algebraic distance (x−cx)² + (y−cy)² − r².
    pub fn algebraic_distance(&self, x: f64, y: f64) -> f64 {
        let dx = x - self.cx;
        let dy = y - self.cy;
        dx * dx + dy * dy - self.r * self.r
    }

    /// Sample `n` points on the circle boundary.
    pub fn sample_points(&self, n: usize) -> Vec<[f64; 2]> {
        self.sample_arc(n, 0.0, 2.0 * std::f64::consts::PI)
    }

    /// Sample `n` points on the arc starting at angle `start` (radians from
    /// +x) and sweeping `sweep` radians counter-clockwise.
    pub fn sample_arc(&self, n: usize, start: f64, sweep: f64) -> Vec<[f64; 2]> {
        (0..n)
            .map(|i| {
                let t = start + sweep * (i as f64) / (n as f64);
                [self.cx + self.r * t.cos(), self.cy + self.r * t.sin()]
            })
            .collect()
    }
}

/// Configuration for RANSAC circle fitting.
#[derive(Debug, Clone)]
pub struct RansacConfig {
    /// Maximum number of RANSAC iterations.
    pub max_iters: usize,
    /// Inlier threshold (absolute radial distance to the hypothesis).
    pub inlier_threshold: f64,
    /// Minimum number of inliers for a valid model.
    pub min_inliers: usize,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

impl Default for RansacConfig {
    fn default() -> Self {
        Self {
            max_iters: 500,
            inlier_threshold: 1.0, // radial distance in the input units
            min_inliers: 10,
            seed: 42,
        }
    }
}

/// Result of a RANSAC fit.
#[derive(Debug, Clone, PartialEq)]
pub struct RansacResult {
    /// Final circle fitted on the inlier set.
    pub circle: Circle,
    /// Number of inliers under the configured radial threshold.
    pub num_inliers: usize,
}

/// Configuration for geometric (IRLS) refinement.
#[derive(Debug, Clone)]
pub struct RefineConfig {
    /// Maximum solver iterations.
    pub max_iters: usize,
    /// Huber delta used for robust residual weighting, in input units.
    pub huber_delta: f64,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            max_iters: 30,
            huber_delta: 1.0,
        }
    }
}

// ── Buffer layout ──────────────────────────────────────────────────────────

/// Reinterpret a flat interleaved buffer (x0,y0,x1,y1,...) as point pairs.
///
/// A trailing unpaired value is ignored.
pub fn points_from_interleaved(data: &[f64]) -> Vec<[f64; 2]> {
    data.chunks_exact(2).map(|c| [c[0], c[1]]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_signed_distance_sign_convention() {
        let c = Circle {
            cx: 10.0,
            cy: -4.0,
            r: 5.0,
        };
        assert!(c.signed_distance(10.0, -4.0) < 0.0, "center is inside");
        assert!(c.signed_distance(30.0, -4.0) > 0.0, "far point is outside");
        assert_relative_eq!(c.signed_distance(15.0, -4.0), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_algebraic_distance_matches_boundary() {
        let c = Circle {
            cx: -2.0,
            cy: 6.0,
            r: 4.0,
        };
        for &[x, y] in &c.sample_points(16) {
            assert_relative_eq!(c.algebraic_distance(x, y), 0.0, epsilon = 1e-10);
        }
        // One unit outside along +x: (r+1)² − r².
        let d = c.algebraic_distance(c.cx + c.r + 1.0, c.cy);
        assert_relative_eq!(d, 2.0 * c.r + 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sample_points_lie_on_circle() {
        let c = Circle {
            cx: 3.0,
            cy: 7.0,
            r: 2.5,
        };
        for &[x, y] in &c.sample_points(64) {
            assert_relative_eq!(c.signed_distance(x, y), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_sample_arc_stays_in_sweep() {
        let c = Circle {
            cx: 0.0,
            cy: 0.0,
            r: 1.0,
        };
        // Quarter arc in the first quadrant.
        let pts = c.sample_arc(32, 0.0, std::f64::consts::FRAC_PI_2);
        assert_eq!(pts.len(), 32);
        for &[x, y] in &pts {
            assert!(x >= -1e-12 && y >= -1e-12, "point ({}, {}) left the arc", x, y);
        }
    }

    #[test]
    fn test_is_valid() {
        assert!(Circle {
            cx: 0.0,
            cy: 0.0,
            r: 0.0
        }
        .is_valid());
        assert!(!Circle {
            cx: 0.0,
            cy: 0.0,
            r: -1.0
        }
        .is_valid());
        assert!(!Circle {
            cx: f64::NAN,
            cy: 0.0,
            r: 1.0
        }
        .is_valid());
        assert!(!Circle {
            cx: 0.0,
            cy: 0.0,
            r: f64::INFINITY
        }
        .is_valid());
    }

    #[test]
    fn test_points_from_interleaved() {
        let flat = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let pts = points_from_interleaved(&flat);
        assert_eq!(pts, vec![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]);

        // Trailing unpaired value is dropped.
        let odd = [1.0, 2.0, 3.0];
        assert_eq!(points_from_interleaved(&odd), vec![[1.0, 2.0]]);

        assert!(points_from_interleaved(&[]).is_empty());
    }

    #[test]
    fn test_circle_serde_roundtrip() {
        let c = Circle {
            cx: 1.5,
            cy: -2.25,
            r: 0.75,
        };
        let json = serde_json::to_string(&c).expect("serialize");
        let back: Circle = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(c, back);
    }
}
