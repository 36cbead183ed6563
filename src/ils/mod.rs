//! Iterated Local Search (ILS).
//!
//! A single-solution trajectory metaheuristic: repeated local search to a
//! fixed point, with randomized perturbations between descents and a
//! strict-improvement acceptance rule.
//!
//! # References
//!
//! - Lourenço, Martin & Stützle (2003), "Iterated Local Search",
//!   *Handbook of Metaheuristics*
//! - Mendes & Alvelos (2022), "Iterated local search for the placement of
//!   wildfire suppression resources", *European Journal of Operational
//!   Research* 304(3), 887-900

mod config;
mod construct;
mod local_search;
mod perturb;
mod runner;

pub use config::IlsConfig;
pub use construct::{construct, multistart};
pub use local_search::local_search;
pub use perturb::{add_one, drop_latest, perturb, random_walk};
pub use runner::{FireIls, IlsResult};
