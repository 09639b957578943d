//! Binary search for the largest achievable classical gap.

mod config;

pub use config::SearchConfig;

use log::debug;
use penalty_core::Error;

use crate::{
    encode::Encoding,
    oracle::{Answer, Oracle, Witness},
};

/// The result of a successful gap search for one component.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Coefficients from the best satisfiable probe.
    pub witness: Witness,
    /// The gap the witness was certified at; `f64::INFINITY` when no
    /// infeasible configuration constrains the component.
    pub gap: f64,
}

/// Finds the maximum gap at or above `min_classical_gap` for which the
/// component is satisfiable, returning the witness of the best probe.
///
/// The search floor is `max(min_classical_gap, gap_tol)`: a negative or zero
/// requested minimum only lowers the bar, it never weakens a feasible
/// problem's achievable gap, and a gap below the convergence tolerance is no
/// separation at all, so a problem that admits only a degenerate gap is
/// reported impossible. The ceiling is the sum of the largest coefficient
/// magnitudes the ranges allow; gaps are never certified beyond it, and a
/// satisfiable ceiling probe is returned as the gap, so the interval is
/// finite and the bisection terminates.
///
/// # Errors
///
/// Returns [`Error::ImpossiblePenaltyModel`] if the floor probe is
/// unsatisfiable, [`Error::InvalidInput`] for an invalid config, and
/// propagates any [`Error::Oracle`] failure unchanged.
pub fn maximize_gap(
    oracle: &impl Oracle,
    encoding: &Encoding,
    min_classical_gap: f64,
    config: &SearchConfig,
) -> Result<SearchOutcome, Error> {
    config
        .validate()
        .map_err(|reason| Error::invalid_input(format!("invalid search config: {reason}")))?;

    // Nothing to separate from ground: one probe certifies the equalities
    // and the gap is unconstrained.
    if !encoding.has_infeasible() {
        return match oracle.check(encoding, 0.0)? {
            Answer::Sat(witness) => Ok(SearchOutcome {
                witness,
                gap: f64::INFINITY,
            }),
            Answer::Unsat => Err(Error::ImpossiblePenaltyModel { min_classical_gap }),
        };
    }

    let mut lo = min_classical_gap.max(config.gap_tol);
    let mut hi = encoding.max_spread().max(lo);

    let mut best = match oracle.check(encoding, lo)? {
        Answer::Sat(witness) => witness,
        Answer::Unsat => return Err(Error::ImpossiblePenaltyModel { min_classical_gap }),
    };
    debug!("gap floor {lo} is satisfiable, searching up to {hi}");

    if hi - lo <= config.gap_tol {
        return Ok(SearchOutcome { witness: best, gap: lo });
    }

    // The whole interval may be satisfiable; probing the ceiling first
    // also certifies the boundary case exactly instead of bisecting to it.
    if let Answer::Sat(witness) = oracle.check(encoding, hi)? {
        debug!("gap ceiling {hi} is satisfiable");
        return Ok(SearchOutcome { witness, gap: hi });
    }

    for iter in 0..config.max_iters {
        if hi - lo <= config.gap_tol {
            break;
        }
        let mid = 0.5 * (lo + hi);
        match oracle.check(encoding, mid)? {
            Answer::Sat(witness) => {
                debug!("iter {iter}: gap {mid} satisfiable");
                best = witness;
                lo = mid;
            }
            Answer::Unsat => {
                debug!("iter {iter}: gap {mid} unsatisfiable");
                hi = mid;
            }
        }
    }

    Ok(SearchOutcome { witness: best, gap: lo })
}
