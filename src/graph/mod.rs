//! Graph model and fire propagation.
//!
//! The model is read-only for the whole run: nodes, directed arcs with
//! non-negative base weights, and each node's structural neighborhood. The
//! propagation engine recomputes arrival times from scratch for every
//! resource placement it is asked about.

mod model;
mod propagation;

pub use model::{Cell, FireGraph, NodeKey};
pub use propagation::{propagate, Propagation};
