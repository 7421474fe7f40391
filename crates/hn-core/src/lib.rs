//! hn-core: stable foundation for hydronet.
//!
//! Contains:
//! - ids (stable compact IDs for network objects)
//! - numeric (Real + tolerances + float helpers)
//! - units (practical-unit conversions for hydraulic quantities)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{HnError, HnResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
