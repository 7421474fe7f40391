//! hn-network: immutable network model and topology analysis.
//!
//! A `NetworkModel` is the frozen input view of a piped water-distribution
//! system: nodes (reservoirs, tanks, junctions, ...) and links (pipes) with
//! their physical attributes, plus compact adjacency for traversal. Computed
//! quantities live in a separate `NetworkState` overlay so the solver's write
//! surface stays explicit.

pub mod builder;
pub mod classify;
pub mod error;
pub mod loops;
pub mod model;
pub mod results;
mod validate;

pub use builder::NetworkBuilder;
pub use classify::{NetworkClass, classify};
pub use error::NetworkError;
pub use loops::{Loop, LoopLink, find_loops};
pub use model::{Link, NetworkModel, Node, NodeKind, PipeSpec};
pub use results::{LinkState, NetworkState, NodeState};
