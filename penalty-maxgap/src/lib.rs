//! Maximum-gap penalty model generation.
//!
//! Given an interaction graph, a table of feasible decision-variable
//! configurations, and per-coefficient energy ranges, [`generate`] searches
//! for Ising coefficients whose ground states are exactly the feasible
//! configurations, with every infeasible configuration penalized by the
//! largest achievable classical gap at or above a requested minimum.
//!
//! The pipeline splits the graph into connected components
//! ([`decompose`]), encodes each component's energy landscape as a
//! linear-arithmetic constraint system ([`encode`]), asks a satisfiability
//! oracle whether coefficients exist at a candidate gap ([`oracle`]), and
//! binary-searches the gap upward ([`search`]) before merging the
//! per-component results into one model.

pub mod decompose;
pub mod encode;
pub mod oracle;
pub mod search;

mod generate;

pub use generate::{generate, generate_ising};
pub use penalty_core::{EnergyRange, Error, FeasibleTable, Graph, Model, OracleError, Spin};
