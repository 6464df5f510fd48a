//! C bindings for circlefit.
//!
//! Exposes the hand-tracking pipeline's original entry point:
//!
//! ```c
//! int CircleFit(int n, const float data[], float *x, float *y, float *r);
//! ```
//!
//! `data` holds `2 * n` interleaved coordinates (x0,y0,x1,y1,...). The
//! return value is a stable status code; on any failure the three outputs
//! are zeroed so stale values can never be mistaken for a fit. Failures are
//! reported through the status code only; no panic crosses this boundary.
//!
//! Computation runs in f64 internally and truncates to f32 on output.

#![allow(non_snake_case)]

use std::os::raw::{c_float, c_int};
use std::panic::{catch_unwind, AssertUnwindSafe};

use circlefit::{fit_circle, FitError};

/// Fit succeeded; outputs hold the circle.
pub const CIRCLE_FIT_OK: c_int = 0;
/// Null pointer or negative `n`.
pub const CIRCLE_FIT_INVALID_ARGUMENT: c_int = 1;
/// Fewer than 3 points.
pub const CIRCLE_FIT_TOO_FEW_POINTS: c_int = 2;
/// Collinear or coincident points; no unique circle.
pub const CIRCLE_FIT_DEGENERATE: c_int = 3;
/// Non-finite input or numerical breakdown.
pub const CIRCLE_FIT_NUMERIC: c_int = 4;

fn status_of(err: &FitError) -> c_int {
    match err {
        FitError::TooFewPoints { .. } => CIRCLE_FIT_TOO_FEW_POINTS,
        FitError::DegenerateInput => CIRCLE_FIT_DEGENERATE,
        FitError::NumericFailure => CIRCLE_FIT_NUMERIC,
        // The plain fit never reports inlier counts; map defensively.
        FitError::InsufficientInliers { .. } => CIRCLE_FIT_DEGENERATE,
    }
}

/// Least-squares circle fit over `n` interleaved x/y samples.
///
/// Writes the fitted center to `*x`, `*y` and the radius to `*r`, and
/// returns [`CIRCLE_FIT_OK`]. On failure the outputs are zeroed and the
/// return value identifies the cause ([`CIRCLE_FIT_INVALID_ARGUMENT`],
/// [`CIRCLE_FIT_TOO_FEW_POINTS`], [`CIRCLE_FIT_DEGENERATE`],
/// [`CIRCLE_FIT_NUMERIC`]).
///
/// The input buffer is read-only and not retained after the call returns.
///
/// # Safety
/// `data` must be valid for reads of `2 * n` floats (may be null only when
/// `n == 0`); `x`, `y`, `r` must each be valid for a single float write.
#[no_mangle]
pub unsafe extern "C" fn CircleFit(
    n: c_int,
    data: *const c_float,
    x: *mut c_float,
    y: *mut c_float,
    r: *mut c_float,
) -> c_int {
    if x.is_null() || y.is_null() || r.is_null() {
        return CIRCLE_FIT_INVALID_ARGUMENT;
    }
    *x = 0.0;
    *y = 0.0;
    *r = 0.0;

    if n < 0 || (n > 0 && data.is_null()) {
        return CIRCLE_FIT_INVALID_ARGUMENT;
    }

    let points: Vec<[f64; 2]> = if n == 0 {
        Vec::new()
    } else {
        std::slice::from_raw_parts(data, 2 * n as usize)
            .chunks_exact(2)
            .map(|c| [c[0] as f64, c[1] as f64])
            .collect()
    };

    match catch_unwind(AssertUnwindSafe(|| fit_circle(&points))) {
        Ok(Ok(circle)) => {
            *x = circle.cx as c_float;
            *y = circle.cy as c_float;
            *r = circle.r as c_float;
            CIRCLE_FIT_OK
        }
        Ok(Err(err)) => status_of(&err),
        Err(_) => CIRCLE_FIT_NUMERIC,
    }
}
