//! Conic fitting through three arc anchors and canonical-form reduction.
//!
//! The fitted curve family is `x² = A·y² + B·y + C`: axis-aligned conics
//! symmetric about the y-axis, which is exactly the shape an elliptical
//! trammel centered on the chord's perpendicular bisector can draw. With the
//! apex anchor pinned at `x = 0` the three-point fit collapses to a closed
//! form; no iteration is involved.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Magnitudes below this are treated as degenerate during canonicalization.
const EPS_DEGENERATE: f64 = 1e-12;

// ── Rejection type ─────────────────────────────────────────────────────────

/// Reasons a candidate fit is rejected.
///
/// Every variant corresponds to a geometrically meaningless or numerically
/// unstable configuration that occurs routinely across a dense perturbation
/// grid; the sweep skips the affected cell and continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Two anchors share a y-coordinate; the reduced system is underdetermined.
    CoincidentOrdinates,
    /// The y-spread product is numerically zero (anchors nearly collinear in y).
    NearSingularSystem,
    /// |A| below epsilon: the curve degenerates to a non-quadratic in y.
    VanishingQuadraticTerm,
    /// The squared semi-axis magnitude is numerically zero.
    DegenerateSemiAxis,
    /// The y-axis denominator magnitude is numerically zero.
    DegenerateYDenominator,
    /// The three anchors determine a hyperbola, not an ellipse.
    Hyperbola,
    /// The arc endpoint lies outside the ellipse's x-extent.
    EndpointOutsideEllipse,
    /// The parameter range does not straddle the arc apex.
    InvalidParameterRange,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CoincidentOrdinates => write!(f, "anchor ordinates are not pairwise distinct"),
            Self::NearSingularSystem => {
                write!(f, "near-singular fit system (anchors nearly collinear in y)")
            }
            Self::VanishingQuadraticTerm => write!(f, "quadratic term vanishes"),
            Self::DegenerateSemiAxis => write!(f, "degenerate squared semi-axis"),
            Self::DegenerateYDenominator => write!(f, "degenerate y-axis denominator"),
            Self::Hyperbola => write!(f, "fit is a hyperbola, not an ellipse"),
            Self::EndpointOutsideEllipse => {
                write!(f, "arc endpoint lies outside the ellipse x-extent")
            }
            Self::InvalidParameterRange => {
                write!(f, "parameter range does not straddle the arc apex")
            }
        }
    }
}

impl std::error::Error for Rejection {}

// ── Types ──────────────────────────────────────────────────────────────────

/// Conic coefficients (A, B, C) with `x² = A·y² + B·y + C`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConicCoeffs(pub [f64; 3]);

impl ConicCoeffs {
    /// Evaluate the right-hand side `A·y² + B·y + C` (the predicted `x²`).
    pub fn eval_at(&self, y: f64) -> f64 {
        let [a, b, c] = self.0;
        a * y * y + b * y + c
    }
}

/// Canonical ellipse centered on the y-axis: `x²/a² + (y−h)²/b² = 1`.
///
/// Only constructed for real ellipses, so `a > 0` and `b > 0` hold by
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanonicalEllipse {
    /// Semi-axis along x.
    pub a: f64,
    /// Semi-axis along y.
    pub b: f64,
    /// Center's y-offset.
    pub h: f64,
}

impl CanonicalEllipse {
    /// Point at parameter angle `t`: `(a·cos t, b·sin t + h)`.
    pub fn point_at(&self, t: f64) -> Vector2<f64> {
        Vector2::new(self.a * t.cos(), self.b * t.sin() + self.h)
    }

    /// Forward conversion back to conic coefficients.
    pub fn to_coeffs(&self) -> ConicCoeffs {
        let k = (self.a * self.a) / (self.b * self.b);
        ConicCoeffs([
            -k,
            2.0 * k * self.h,
            self.a * self.a - k * self.h * self.h,
        ])
    }
}

// ── Three-anchor fit ───────────────────────────────────────────────────────

/// Solve `x² = A·y² + B·y + C` through the three anchors.
///
/// `p` is the apex anchor and must have `x = 0` by construction; this reduces
/// the 3×3 linear system to two unknowns solved in closed form. The anchors'
/// y-coordinates must be pairwise distinct and well separated; otherwise the
/// fit is rejected.
pub fn fit_anchor_conic(
    p: Vector2<f64>,
    q: Vector2<f64>,
    r: Vector2<f64>,
) -> Result<ConicCoeffs, Rejection> {
    debug_assert_eq!(p.x, 0.0, "apex anchor must be pinned to x = 0");

    if p.y == q.y || p.y == r.y || q.y == r.y {
        return Err(Rejection::CoincidentOrdinates);
    }

    let d = (p.y - q.y) * (p.y - r.y) * (q.y - r.y);
    if d.abs() < EPS_DEGENERATE {
        return Err(Rejection::NearSingularSystem);
    }

    let qx2 = q.x * q.x;
    let rx2 = r.x * r.x;

    let a = (qx2 * (r.y - p.y) + rx2 * (p.y - q.y)) / d;
    let b = (qx2 * (p.y * p.y - r.y * r.y) + rx2 * (q.y * q.y - p.y * p.y)) / d;
    let c = -a * p.y * p.y - b * p.y;

    Ok(ConicCoeffs([a, b, c]))
}

// ── Canonicalization ───────────────────────────────────────────────────────

/// Reduce conic coefficients to canonical ellipse parameters.
///
/// Completes the square in y: `x² = A·(y − h)² + K` with `h = −B/(2A)` and
/// `K = C − B²/(4A)`. The sign of `−K/A` decides the orientation: positive
/// for a real ellipse, negative for a hyperbola (rejected).
pub fn canonicalize(coeffs: &ConicCoeffs) -> Result<CanonicalEllipse, Rejection> {
    let [a_quad, b_lin, c_const] = coeffs.0;

    if a_quad.abs() < EPS_DEGENERATE {
        return Err(Rejection::VanishingQuadraticTerm);
    }

    let h = -b_lin / (2.0 * a_quad);
    let k = c_const - (b_lin * b_lin) / (4.0 * a_quad);
    let signed_a2 = -k;
    if signed_a2.abs() < EPS_DEGENERATE {
        return Err(Rejection::DegenerateSemiAxis);
    }

    let denom_y = signed_a2 / a_quad;
    if denom_y.abs() < EPS_DEGENERATE {
        return Err(Rejection::DegenerateYDenominator);
    }
    if denom_y < 0.0 {
        return Err(Rejection::Hyperbola);
    }

    Ok(CanonicalEllipse {
        a: signed_a2.abs().sqrt(),
        b: denom_y.sqrt(),
        h,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn fit_reproduces_anchor_abscissae() {
        let p = Vector2::new(0.0, 3.0);
        let q = Vector2::new(2.0, 2.0);
        let r = Vector2::new(1.5, -1.0);

        let coeffs = fit_anchor_conic(p, q, r).expect("fit should succeed");
        for pt in [p, q, r] {
            assert_relative_eq!(coeffs.eval_at(pt.y), pt.x * pt.x, epsilon = 1e-10);
        }
    }

    #[test]
    fn fit_on_circle_points_recovers_circle_coefficients() {
        // Three points of x² + y² = R² must yield A = −1, B = 0, C = R².
        let r = 700.0_f64;
        let p = Vector2::new(0.0, r);
        let q = Vector2::new(r * 85f64.to_radians().cos(), r * 85f64.to_radians().sin());
        let e = Vector2::new(r * 80f64.to_radians().cos(), r * 80f64.to_radians().sin());

        let coeffs = fit_anchor_conic(p, q, e).expect("fit should succeed");
        let [a, b, c] = coeffs.0;
        assert_relative_eq!(a, -1.0, epsilon = 1e-9);
        assert_relative_eq!(b, 0.0, epsilon = 1e-6 * r);
        assert_relative_eq!(c, r * r, epsilon = 1e-6 * r * r);
    }

    #[test]
    fn shared_ordinate_is_rejected() {
        let p = Vector2::new(0.0, 5.0);
        let q = Vector2::new(3.0, 5.0);
        let r = Vector2::new(4.0, 1.0);
        assert_eq!(
            fit_anchor_conic(p, q, r),
            Err(Rejection::CoincidentOrdinates)
        );
    }

    #[test]
    fn near_collinear_ordinates_are_rejected() {
        let p = Vector2::new(0.0, 1.0);
        let q = Vector2::new(1.0, 1.00001);
        let r = Vector2::new(2.0, 1.00002);
        assert_eq!(fit_anchor_conic(p, q, r), Err(Rejection::NearSingularSystem));
    }

    #[test]
    fn canonicalize_circle_coefficients() {
        let e = canonicalize(&ConicCoeffs([-1.0, 0.0, 10_000.0])).expect("real ellipse");
        assert_relative_eq!(e.a, 100.0, epsilon = 1e-12);
        assert_relative_eq!(e.b, 100.0, epsilon = 1e-12);
        assert_relative_eq!(e.h, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn canonicalize_recovers_forward_converted_ellipse() {
        let e0 = CanonicalEllipse {
            a: 5.0,
            b: 3.0,
            h: 1.5,
        };
        let e = canonicalize(&e0.to_coeffs()).expect("real ellipse");
        assert_relative_eq!(e.a, e0.a, epsilon = 1e-12);
        assert_relative_eq!(e.b, e0.b, epsilon = 1e-12);
        assert_relative_eq!(e.h, e0.h, epsilon = 1e-12);
    }

    #[test]
    fn hyperbola_is_rejected() {
        // x² = 2y² + 8 opens along x: a hyperbola.
        assert_eq!(
            canonicalize(&ConicCoeffs([2.0, 0.0, 8.0])),
            Err(Rejection::Hyperbola)
        );
    }

    #[test]
    fn degenerate_coefficients_are_rejected() {
        assert_eq!(
            canonicalize(&ConicCoeffs([1e-15, 1.0, 1.0])),
            Err(Rejection::VanishingQuadraticTerm)
        );
        assert_eq!(
            canonicalize(&ConicCoeffs([-1.0, 0.0, 0.0])),
            Err(Rejection::DegenerateSemiAxis)
        );
    }

    #[test]
    fn point_at_parameterizes_the_ellipse() {
        let e = CanonicalEllipse {
            a: 4.0,
            b: 2.0,
            h: 1.0,
        };
        let top = e.point_at(std::f64::consts::FRAC_PI_2);
        assert_relative_eq!(top.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(top.y, 3.0, epsilon = 1e-12);

        let coeffs = e.to_coeffs();
        for i in 0..8 {
            let t = std::f64::consts::PI * (i as f64) / 8.0;
            let pt = e.point_at(t);
            assert_relative_eq!(coeffs.eval_at(pt.y), pt.x * pt.x, epsilon = 1e-10);
        }
    }
}
