//! Time-phased placement of wildfire suppression resources.
//!
//! A fire spreads from a set of ignition nodes across a directed graph;
//! each node holding a suppression resource delays the fire's progress
//! along its outgoing arcs. Resources become available over time and this
//! crate searches for the placement minimizing how many nodes the fire
//! reaches before a target time, using Iterated Local Search:
//!
//! - **Graph + propagation** ([`graph`]): the static weighted graph and the
//!   interdiction-aware multi-origin shortest-path engine.
//! - **Scenario** ([`scenario`]): the immutable inputs of one run:
//!   ignitions, delay, target time, and the resource release schedule.
//! - **Solution** ([`solution`]): the mutable placement state with its
//!   occupancy and capacity invariants.
//! - **ILS** ([`ils`]): constructive multistart, best-improvement local
//!   search over resource relocations, three perturbation operators, and
//!   the driver tying them together.
//!
//! The search is single-threaded and deterministic for a fixed seed; all
//! randomness flows through one explicit seeded generator. Exact
//! formulations (branch-and-cut, Benders) are out of scope, but share the
//! propagation contract through [`scenario::Scenario::propagate`].

pub mod error;
pub mod graph;
pub mod ils;
pub mod scenario;
pub mod solution;

pub use error::{ModelError, SearchError};
pub use graph::{Cell, FireGraph, NodeKey, Propagation};
pub use ils::{FireIls, IlsConfig, IlsResult};
pub use scenario::{ReleaseSchedule, Scenario};
pub use solution::Placement;
