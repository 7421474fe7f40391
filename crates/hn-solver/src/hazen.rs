//! Hazen-Williams head loss and flow velocity in practical units.

use hn_core::{Real, flow_area_m2, lps_to_m3s, mm_to_m};

use crate::degeneracy::DegeneracyCounters;

/// Hazen-Williams constant for Q in l/s, D in mm, L in m, head in m.
pub const HAZEN_WILLIAMS_K: Real = 10.674;

/// Hazen-Williams flow exponent.
pub const HAZEN_WILLIAMS_N: Real = 1.852;

/// Diameter exponent of the Hazen-Williams relation.
pub const DIAMETER_EXPONENT: Real = 4.8704;

/// The Hazen-Williams relation with caller-supplied empirical constants.
///
/// The defaults are the standard K = 10.674, n = 1.852; both are inputs so a
/// caller can match whatever calibration its data set uses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HazenWilliams {
    pub k: Real,
    pub n: Real,
}

impl Default for HazenWilliams {
    fn default() -> Self {
        Self {
            k: HAZEN_WILLIAMS_K,
            n: HAZEN_WILLIAMS_N,
        }
    }
}

impl HazenWilliams {
    /// Geometric part of the head-loss relation: `L / (C^n * D^4.8704)`.
    ///
    /// Head loss is `K * Q^n * resistance`; the loop-correction gradient
    /// reuses the same factor.
    pub fn resistance(&self, length_m: Real, diameter_mm: Real, c: Real) -> Real {
        length_m / (c.powf(self.n) * diameter_mm.powf(DIAMETER_EXPONENT))
    }

    /// Head loss in meters for a non-negative flow.
    ///
    /// `h_f = K * Q^n * L / (C^n * D^4.8704)` with Q in l/s, D in mm, L in m.
    /// Zero or negative flow loses no head.
    pub fn head_loss_m(&self, flow_lps: Real, diameter_mm: Real, length_m: Real, c: Real) -> Real {
        if flow_lps <= 0.0 {
            return 0.0;
        }
        self.k * flow_lps.powf(self.n) * self.resistance(length_m, diameter_mm, c)
    }

    /// Derivative of head loss with respect to flow at `q_abs`:
    /// `n * K * Q^(n-1) * resistance`.
    pub fn loss_gradient(&self, q_abs: Real, resistance: Real) -> Real {
        self.n * self.k * q_abs.powf(self.n - 1.0) * resistance
    }
}

/// `HazenWilliams::resistance` with the standard constants.
pub fn link_resistance(length_m: Real, diameter_mm: Real, c: Real) -> Real {
    HazenWilliams::default().resistance(length_m, diameter_mm, c)
}

/// `HazenWilliams::head_loss_m` with the standard constants.
pub fn head_loss_m(flow_lps: Real, diameter_mm: Real, length_m: Real, c: Real) -> Real {
    HazenWilliams::default().head_loss_m(flow_lps, diameter_mm, length_m, c)
}

/// Flow velocity in m/s: `v = Q / A` for a circular section.
///
/// A non-positive diameter short-circuits to zero velocity; the occurrence is
/// counted and logged, never raised.
pub fn velocity_ms(flow_lps: Real, diameter_mm: Real, degeneracy: &mut DegeneracyCounters) -> Real {
    if diameter_mm <= 0.0 {
        tracing::warn!(diameter_mm, "velocity short-circuited: non-positive diameter");
        degeneracy.zero_diameter_velocities += 1;
        return 0.0;
    }

    let area = flow_area_m2(mm_to_m(diameter_mm));
    lps_to_m3s(flow_lps.abs()) / area
}
