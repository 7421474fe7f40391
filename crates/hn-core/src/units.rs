//! Practical-unit helpers for hydraulic quantities.
//!
//! The Hazen-Williams relation is empirical and assumes a fixed unit system:
//! flow in l/s, diameter in mm, length in m, head in m of water column.
//! Quantities therefore travel as plain `Real` with the unit in the field or
//! parameter name, and conversions are explicit.

use crate::numeric::Real;
use core::f64::consts::PI;

/// Convert a flow in liters per second to cubic meters per second.
pub fn lps_to_m3s(q_lps: Real) -> Real {
    q_lps / 1000.0
}

/// Convert a diameter in millimeters to meters.
pub fn mm_to_m(d_mm: Real) -> Real {
    d_mm / 1000.0
}

/// Cross-sectional flow area in m² for a circular pipe of diameter `d_m` meters.
pub fn flow_area_m2(d_m: Real) -> Real {
    PI * d_m * d_m / 4.0
}
