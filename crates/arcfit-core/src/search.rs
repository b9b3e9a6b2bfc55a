//! Grid sweep over anchor-radius perturbations and candidate selection.
//!
//! Three anchors are placed on fixed bearings of the arc — apex (P), quarter
//! point (Q), and endpoint (R) — at radii perturbed by per-axis offsets
//! (d1, d, d2) drawn from evenly spaced grids over `[−ε, ε]`. Each grid cell
//! yields one conic fit; cells whose fit canonicalizes to a real ellipse are
//! scored against the circle and recorded as attempts. The best accepted
//! attempt under the configured objective wins, ties broken by traversal
//! order.

use std::f64::consts::FRAC_PI_2;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::arc::{anchor_point, ArcSpec};
use crate::conic::{canonicalize, fit_anchor_conic, CanonicalEllipse};
use crate::rig::RigLengths;
use crate::sampler::{sample_radial_errors, ErrorSample};

// ── Parameters ─────────────────────────────────────────────────────────────

/// Selection objective for the best accepted attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    /// Smallest semi-axis `a`.
    MinimizeA,
    /// Smallest `a + b`.
    #[default]
    MinimizeAPlusB,
    /// Smallest combined trammel rod length `L1 + L3`.
    MinimizeRigLengthSum,
}

/// Sweep configuration.
///
/// Step counts outside the supported ranges are clamped by [`normalized`],
/// which every search applies up front; the stored values can therefore be
/// set freely from user input.
///
/// [`normalized`]: SearchParams::normalized
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchParams {
    /// Maximum allowed radial deviation ε between candidate and circle.
    pub tolerance: f64,
    /// Grid steps for the quarter-point offset axis `d`.
    pub steps_d: usize,
    /// Grid steps for the apex offset axis `d1`.
    pub steps_d1: usize,
    /// Grid steps for the endpoint offset axis `d2`.
    pub steps_d2: usize,
    /// Number of error samples per candidate over the arc half-span.
    pub error_samples: usize,
    /// Skip error sampling for cells that cannot improve the incumbent.
    pub prune_worse_than_best: bool,
    /// Pin the apex anchor exactly on the arc (collapses the d1 axis to {0}).
    pub force_anchor_p_zero: bool,
    /// Pin the endpoint anchor exactly on the arc (collapses the d2 axis to {0}).
    pub force_anchor_r_zero: bool,
    /// Selection objective.
    pub objective: Objective,
}

impl SearchParams {
    const MIN_GRID_STEPS: usize = 2;
    const MAX_GRID_STEPS: usize = 30;
    const MIN_ERROR_SAMPLES: usize = 4;
    const MAX_ERROR_SAMPLES: usize = 30;

    /// Return a copy with all step counts clamped into their supported ranges.
    pub fn normalized(&self) -> Self {
        let mut out = self.clone();
        out.steps_d = out.steps_d.clamp(Self::MIN_GRID_STEPS, Self::MAX_GRID_STEPS);
        out.steps_d1 = out.steps_d1.clamp(Self::MIN_GRID_STEPS, Self::MAX_GRID_STEPS);
        out.steps_d2 = out.steps_d2.clamp(Self::MIN_GRID_STEPS, Self::MAX_GRID_STEPS);
        out.error_samples = out
            .error_samples
            .clamp(Self::MIN_ERROR_SAMPLES, Self::MAX_ERROR_SAMPLES);
        out
    }
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            tolerance: 0.01,
            steps_d: 10,
            steps_d1: 10,
            steps_d2: 10,
            error_samples: 10,
            prune_worse_than_best: false,
            force_anchor_p_zero: false,
            force_anchor_r_zero: false,
            objective: Objective::default(),
        }
    }
}

// ── Results ────────────────────────────────────────────────────────────────

/// One evaluated candidate ellipse from the sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attempt {
    /// Index in grid traversal order among recorded attempts.
    pub id: usize,
    /// Semi-axis along x.
    pub a: f64,
    /// Semi-axis along y.
    pub b: f64,
    /// Ellipse center's y-offset.
    pub h: f64,
    /// Maximum absolute radial error over the sampled half-span.
    pub max_error: f64,
    /// Whether `max_error` stayed within the tolerance.
    pub accepted: bool,
    /// Error half-curve from arc endpoint to apex.
    pub series: Vec<ErrorSample>,
}

impl Attempt {
    /// Canonical ellipse parameters of this attempt.
    pub fn ellipse(&self) -> CanonicalEllipse {
        CanonicalEllipse {
            a: self.a,
            b: self.b,
            h: self.h,
        }
    }
}

/// Full sweep output: every recorded attempt plus the selected best.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Attempts in grid traversal order.
    pub attempts: Vec<Attempt>,
    /// Best accepted attempt under the objective, if any.
    pub best: Option<Attempt>,
    /// The best attempt's error series, or empty.
    pub error_series: Vec<ErrorSample>,
}

impl SearchResult {
    /// The empty result returned for malformed top-level input.
    pub fn empty() -> Self {
        Self::default()
    }
}

// ── Sweep ──────────────────────────────────────────────────────────────────

/// Run the full perturbation sweep for `arc` under `params`.
///
/// Malformed top-level input (invalid arc, non-finite or non-positive
/// tolerance) yields [`SearchResult::empty`] — there is nothing to search,
/// which is not a fault. Rejected grid cells (degenerate fits, hyperbolas,
/// out-of-range endpoints) are skipped individually and never abort the
/// sweep.
///
/// The traversal order is fixed — d outer, d1 middle, d2 inner, each
/// ascending — so repeated invocations with identical inputs produce
/// identical results.
pub fn run_search(arc: &ArcSpec, params: &SearchParams) -> SearchResult {
    let params = params.normalized();
    if !arc.is_valid() || !params.tolerance.is_finite() || params.tolerance <= 0.0 {
        return SearchResult::empty();
    }

    let eps = params.tolerance;
    let quarter_bearing = FRAC_PI_2 - arc.quarter_angle_rad();
    let end_bearing = FRAC_PI_2 - arc.half_angle_rad();

    let ds = offset_grid(params.steps_d, eps);
    let d1s = if params.force_anchor_p_zero {
        vec![0.0]
    } else {
        offset_grid(params.steps_d1, eps)
    };
    let d2s = if params.force_anchor_r_zero {
        vec![0.0]
    } else {
        offset_grid(params.steps_d2, eps)
    };
    let n_cells = ds.len() * d1s.len() * d2s.len();

    let mut attempts: Vec<Attempt> = Vec::new();
    // Incumbent accepted candidate: (attempt index, objective value). Drives
    // pruning and final selection; ties keep the earlier attempt.
    let mut best: Option<(usize, f64)> = None;

    for &d in &ds {
        for &d1 in &d1s {
            for &d2 in &d2s {
                // The apex anchor is pinned to x = 0 by construction.
                let p = Vector2::new(0.0, arc.radius + d1);
                let q = anchor_point(arc.radius + d, quarter_bearing);
                let r_pt = anchor_point(arc.radius + d2, end_bearing);

                let ellipse = match fit_anchor_conic(p, q, r_pt).and_then(|c| canonicalize(&c)) {
                    Ok(e) => e,
                    Err(_) => continue,
                };

                let objective = objective_value(arc, &ellipse, params.objective);
                if params.prune_worse_than_best {
                    if let Some((_, incumbent)) = best {
                        if objective >= incumbent {
                            continue;
                        }
                    }
                }

                let profile = match sample_radial_errors(
                    &ellipse,
                    arc.radius,
                    r_pt.x,
                    params.error_samples,
                ) {
                    Ok(p) => p,
                    Err(_) => continue,
                };

                let accepted = profile.max_abs_error <= eps;
                let id = attempts.len();
                attempts.push(Attempt {
                    id,
                    a: ellipse.a,
                    b: ellipse.b,
                    h: ellipse.h,
                    max_error: profile.max_abs_error,
                    accepted,
                    series: profile.samples,
                });

                if accepted && best.map_or(true, |(_, incumbent)| objective < incumbent) {
                    best = Some((id, objective));
                }
            }
        }
    }

    let n_accepted = attempts.iter().filter(|a| a.accepted).count();
    tracing::debug!(
        "sweep complete: {} cells, {} attempts recorded, {} accepted",
        n_cells,
        attempts.len(),
        n_accepted
    );

    let best_attempt = best.map(|(idx, _)| attempts[idx].clone());
    let error_series = best_attempt
        .as_ref()
        .map(|a| a.series.clone())
        .unwrap_or_default();

    SearchResult {
        attempts,
        best: best_attempt,
        error_series,
    }
}

/// Evenly spaced offsets over `[−span, span]`, endpoints included.
fn offset_grid(steps: usize, span: f64) -> Vec<f64> {
    let step = 2.0 * span / (steps - 1) as f64;
    (0..steps).map(|i| -span + i as f64 * step).collect()
}

fn objective_value(arc: &ArcSpec, ellipse: &CanonicalEllipse, objective: Objective) -> f64 {
    match objective {
        Objective::MinimizeA => ellipse.a,
        Objective::MinimizeAPlusB => ellipse.a + ellipse.b,
        Objective::MinimizeRigLengthSum => RigLengths::derive(arc, ellipse).rod_sum(),
    }
}
