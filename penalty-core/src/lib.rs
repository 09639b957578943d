//! Shared vocabulary for penalty-model generation.
//!
//! A penalty model is a classical Ising model whose ground states reproduce a
//! caller-specified set of feasible assignments over a subset of the model's
//! variables. This crate holds the types every generation backend needs:
//! the interaction [`Graph`], the [`FeasibleTable`] of target configurations,
//! per-coefficient [`EnergyRange`] bounds, the returned [`Model`], and the
//! shared [`Error`] taxonomy.

mod error;
mod graph;
mod model;
mod range;
mod table;

pub use error::{Error, OracleError};
pub use graph::{Graph, Variable};
pub use model::Model;
pub use range::EnergyRange;
pub use table::{FeasibleTable, Spin};
