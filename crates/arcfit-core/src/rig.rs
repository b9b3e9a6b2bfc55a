//! Trammel rod segment lengths derived from a fitted ellipse.
//!
//! An Archimedean trammel drawing the canonical ellipse runs a rod of arm
//! length `a − b` along two perpendicular tracks through the ellipse center.
//! The segment lengths locate the rig relative to the chord: `l1` from the
//! chord midpoint down to the ellipse center, `l2` the horizontal track
//! half-extent actually used over the arc span, and `l3` the vertical track
//! extent (the full arm).

use serde::{Deserialize, Serialize};

use crate::arc::ArcSpec;
use crate::conic::CanonicalEllipse;

/// Trammel rod segment lengths (L1, L2, L3).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigLengths {
    /// Chord midpoint to ellipse center, along the y-axis.
    pub l1: f64,
    /// Horizontal track half-extent: `(a − b)·cos(t0)`.
    pub l2: f64,
    /// Vertical track extent: the arm length `a − b`.
    pub l3: f64,
}

impl RigLengths {
    /// Derive the rig geometry for `ellipse` standing in for the arc.
    ///
    /// `t0` is taken from the unperturbed arc endpoint, clamped into the
    /// ellipse's x-extent.
    pub fn derive(arc: &ArcSpec, ellipse: &CanonicalEllipse) -> Self {
        let arm = (ellipse.a - ellipse.b).max(0.0);
        let ratio = (arc.endpoint().x / ellipse.a).clamp(-1.0, 1.0);
        let t0 = ratio.acos();
        Self {
            l1: (arc.chord_midpoint_y() - ellipse.h).abs(),
            l2: arm * t0.cos(),
            l3: arm,
        }
    }

    /// Combined rod length `L1 + L3`, the quantity minimized by the
    /// rig-length objective.
    pub fn rod_sum(&self) -> f64 {
        self.l1 + self.l3
    }
}
