//! Arc specification and anchor-point geometry.

use std::f64::consts::FRAC_PI_2;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Target circular arc: radius and full central angle.
///
/// The arc lies on a circle of radius `radius` centered at the origin and is
/// symmetric about the vertical bearing, spanning polar angles
/// `90° − θ/2 ..= 90° + θ/2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcSpec {
    /// Circle radius, in the same unit as the search tolerance.
    pub radius: f64,
    /// Full central angle in degrees, expected in (0, 180].
    pub central_angle_deg: f64,
}

impl ArcSpec {
    /// Construct an arc from radius and central angle in degrees.
    pub fn new(radius: f64, central_angle_deg: f64) -> Self {
        Self {
            radius,
            central_angle_deg,
        }
    }

    /// Construct an arc from radius and chord length.
    ///
    /// The chord is an interchangeable representation of the central angle
    /// (`chord = 2R·sin(θ/2)`). Returns `None` when the chord cannot be
    /// subtended by the circle (`|chord| > 2R`) or the inputs are unusable.
    pub fn from_radius_and_chord(radius: f64, chord: f64) -> Option<Self> {
        if !(radius.is_finite() && radius > 0.0 && chord.is_finite()) {
            return None;
        }
        let ratio = chord / (2.0 * radius);
        if ratio.abs() > 1.0 {
            return None;
        }
        Some(Self::new(radius, 2.0 * ratio.asin().to_degrees()))
    }

    /// Check basic validity: positive finite radius, angle in (0, 180].
    pub fn is_valid(&self) -> bool {
        self.radius.is_finite()
            && self.radius > 0.0
            && self.central_angle_deg.is_finite()
            && self.central_angle_deg > 0.0
            && self.central_angle_deg <= 180.0
    }

    /// Full central angle in radians.
    pub fn central_angle_rad(&self) -> f64 {
        self.central_angle_deg.to_radians()
    }

    /// Half of the central angle in radians (apex to endpoint).
    pub fn half_angle_rad(&self) -> f64 {
        self.central_angle_rad() / 2.0
    }

    /// Quarter of the central angle in radians (apex to quarter point).
    pub fn quarter_angle_rad(&self) -> f64 {
        self.central_angle_rad() / 4.0
    }

    /// Chord length subtended by the arc: `2R·sin(θ/2)`.
    pub fn chord_length(&self) -> f64 {
        2.0 * self.radius * self.half_angle_rad().sin()
    }

    /// Arc endpoint on the positive-x side.
    pub fn endpoint(&self) -> Vector2<f64> {
        anchor_point(self.radius, FRAC_PI_2 - self.half_angle_rad())
    }

    /// Ordinate of the chord midpoint: `R·cos(θ/2)`. The chord is horizontal,
    /// so its midpoint sits on the y-axis.
    pub fn chord_midpoint_y(&self) -> f64 {
        self.radius * self.half_angle_rad().cos()
    }
}

/// Point at `radius` along `bearing_rad` (measured from the +x axis).
pub fn anchor_point(radius: f64, bearing_rad: f64) -> Vector2<f64> {
    Vector2::new(radius * bearing_rad.cos(), radius * bearing_rad.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn chord_of_sixty_degree_unit_arc() {
        let arc = ArcSpec::new(1.0, 60.0);
        assert_relative_eq!(arc.chord_length(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn chord_round_trip() {
        let arc = ArcSpec::new(700.0, 20.0);
        let chord = arc.chord_length();
        let back = ArcSpec::from_radius_and_chord(700.0, chord).expect("valid chord");
        assert_relative_eq!(back.central_angle_deg, 20.0, epsilon = 1e-9);
    }

    #[test]
    fn chord_longer_than_diameter_is_rejected() {
        assert!(ArcSpec::from_radius_and_chord(10.0, 20.5).is_none());
        assert!(ArcSpec::from_radius_and_chord(0.0, 5.0).is_none());
        assert!(ArcSpec::from_radius_and_chord(10.0, f64::NAN).is_none());
    }

    #[test]
    fn validity_bounds() {
        assert!(ArcSpec::new(120.0, 45.0).is_valid());
        assert!(ArcSpec::new(100.0, 180.0).is_valid());
        assert!(!ArcSpec::new(0.0, 45.0).is_valid());
        assert!(!ArcSpec::new(-3.0, 45.0).is_valid());
        assert!(!ArcSpec::new(100.0, 0.0).is_valid());
        assert!(!ArcSpec::new(100.0, 200.0).is_valid());
        assert!(!ArcSpec::new(f64::INFINITY, 45.0).is_valid());
        assert!(!ArcSpec::new(100.0, f64::NAN).is_valid());
    }

    #[test]
    fn semicircle_endpoint_lies_on_x_axis() {
        let arc = ArcSpec::new(100.0, 180.0);
        let end = arc.endpoint();
        assert_relative_eq!(end.x, 100.0, epsilon = 1e-9);
        assert_relative_eq!(end.y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(arc.chord_midpoint_y(), 0.0, epsilon = 1e-9);
    }
}
