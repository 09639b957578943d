use std::error::Error as StdError;

use thiserror::Error;

/// Errors that can occur while generating a penalty model.
#[derive(Debug, Error)]
pub enum Error {
    /// The caller supplied malformed arguments.
    ///
    /// Always detected before any oracle call and never retried.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// No coefficient assignment within the energy ranges satisfies even the
    /// requested minimum classical gap.
    ///
    /// Fatal to the generation call; partial per-component results are
    /// discarded.
    #[error("no penalty model within the energy ranges achieves a classical gap of {min_classical_gap}")]
    ImpossiblePenaltyModel { min_classical_gap: f64 },

    /// The decision procedure itself failed, as opposed to proving the
    /// constraint system unsatisfiable.
    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl Error {
    /// Shorthand for an [`Error::InvalidInput`] with a formatted reason.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}

/// An internal failure of the satisfiability oracle.
///
/// Kept distinct from [`Error::ImpossiblePenaltyModel`] so callers never
/// mistake a solver malfunction for a genuine infeasibility proof.
#[derive(Debug, Error)]
#[error("oracle failure: {reason}")]
pub struct OracleError {
    reason: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl OracleError {
    /// Creates an oracle error with the given reason.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            source: None,
        }
    }

    /// Attaches the underlying solver error as the source.
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}
