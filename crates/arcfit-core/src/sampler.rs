//! Radial-error evaluation of a candidate ellipse against the target circle.
//!
//! A candidate is scored over the ellipse-parameter range actually covered by
//! the arc: from the endpoint parameter `t0` up to the apex at `π/2`. The arc
//! is symmetric about the apex, so the half-curve is sufficient; renderers
//! mirror it for the full span.

use std::f64::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};

use crate::conic::{CanonicalEllipse, Rejection};

/// One sampled point of the error curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorSample {
    /// Ellipse parameter angle in degrees.
    pub t_deg: f64,
    /// Polar angle of the sampled point as seen from the circle center, degrees.
    pub polar_deg: f64,
    /// Signed radial error `ρ − R`.
    pub error: f64,
}

/// Error curve of one candidate over the arc's half-span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorProfile {
    /// Samples ordered from the arc endpoint (`t0`) to the apex (`π/2`).
    pub samples: Vec<ErrorSample>,
    /// Maximum absolute radial error over the samples.
    pub max_abs_error: f64,
}

/// Score how closely `ellipse` matches a circle of radius `radius` centered
/// at the origin, over the span ending at the arc endpoint with x-coordinate
/// `x_end`.
///
/// Rejects candidates whose x-extent cannot reach the endpoint, and
/// candidates whose endpoint parameter does not lie on the outer lobe
/// relevant to the arc (`t0 < π/2 < t1`). Acceptance against a tolerance is
/// the caller's decision.
pub fn sample_radial_errors(
    ellipse: &CanonicalEllipse,
    radius: f64,
    x_end: f64,
    steps: usize,
) -> Result<ErrorProfile, Rejection> {
    debug_assert!(steps >= 2, "at least two samples are required");

    let ratio = x_end / ellipse.a;
    if ratio.abs() > 1.0 {
        return Err(Rejection::EndpointOutsideEllipse);
    }

    let t0 = ratio.acos();
    let t1 = PI - t0;
    if !(t0 < FRAC_PI_2 && t1 > t0) {
        return Err(Rejection::InvalidParameterRange);
    }

    let mut samples = Vec::with_capacity(steps);
    let mut max_abs_error = 0.0_f64;
    for i in 0..steps {
        let t = t0 + (FRAC_PI_2 - t0) * (i as f64) / ((steps - 1) as f64);
        let pt = ellipse.point_at(t);
        let rho = pt.norm();
        let error = rho - radius;
        let polar_deg = if rho > 0.0 {
            (pt.x / rho).clamp(-1.0, 1.0).acos().to_degrees()
        } else {
            0.0
        };
        samples.push(ErrorSample {
            t_deg: t.to_degrees(),
            polar_deg,
            error,
        });
        max_abs_error = max_abs_error.max(error.abs());
    }

    Ok(ErrorProfile {
        samples,
        max_abs_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn identity_circle_has_zero_error() {
        // A candidate identical to the target circle scores ~0 regardless of
        // tolerance.
        let circle = CanonicalEllipse {
            a: 100.0,
            b: 100.0,
            h: 0.0,
        };
        let x_end = 100.0 * 20f64.to_radians().sin();
        let profile = sample_radial_errors(&circle, 100.0, x_end, 16).expect("valid range");

        assert_eq!(profile.samples.len(), 16);
        assert!(profile.max_abs_error < 1e-9);
        for s in &profile.samples {
            assert_relative_eq!(s.error, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn samples_span_endpoint_to_apex() {
        let e = CanonicalEllipse {
            a: 5.0,
            b: 2.0,
            h: 1.0,
        };
        let profile = sample_radial_errors(&e, 4.0, 2.5, 8).expect("valid range");
        let t0 = (2.5_f64 / 5.0).acos().to_degrees();
        assert_relative_eq!(profile.samples[0].t_deg, t0, epsilon = 1e-9);
        assert_relative_eq!(profile.samples[7].t_deg, 90.0, epsilon = 1e-9);
    }

    #[test]
    fn endpoint_beyond_x_extent_is_rejected() {
        let e = CanonicalEllipse {
            a: 1.0,
            b: 1.0,
            h: 0.0,
        };
        assert_eq!(
            sample_radial_errors(&e, 1.0, 2.0, 8),
            Err(Rejection::EndpointOutsideEllipse)
        );
    }

    #[test]
    fn negative_endpoint_parameter_is_rejected() {
        // x_end ≤ 0 puts t0 at or beyond the apex.
        let e = CanonicalEllipse {
            a: 1.0,
            b: 1.0,
            h: 0.0,
        };
        assert_eq!(
            sample_radial_errors(&e, 1.0, -0.5, 8),
            Err(Rejection::InvalidParameterRange)
        );
    }
}
