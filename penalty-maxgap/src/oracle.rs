//! The satisfiability oracle behind the gap search.
//!
//! An [`Oracle`] answers one question: do coefficients exist, within their
//! energy ranges, that hold every feasible configuration at its target
//! energy while keeping every infeasible configuration at least `gap` above
//! ground? The trait keeps the search and encoding layers independent of the
//! decision procedure, so alternative backends can be substituted.
//!
//! [`LpOracle`], the default backend, reduces the question to a sequence of
//! linear-programming feasibility checks. The only non-linear part of the
//! constraint system is the requirement that each feasible configuration's
//! minimum over auxiliary completions *equals* its target: some completion
//! must attain the target while the rest stay at or above it. The oracle
//! branches over which completion is pinned to equality (the "elite"
//! completion per feasible configuration); each branch is a pure linear
//! program. The system is satisfiable exactly when some branch is, since an
//! LP witness picks out its own minimizing completion.

use good_lp::{
    Expression, ResolutionError, Solution, SolverModel, Variable, constraint, default_solver,
    variable, variables,
};
use log::trace;
use penalty_core::OracleError;

use crate::encode::{Encoding, EnergyRow};

/// The oracle's verdict on one gap probe.
#[derive(Debug, Clone)]
pub enum Answer {
    /// Satisfiable, with the witness coefficients.
    Sat(Witness),
    /// Proven unsatisfiable at the probed gap.
    Unsat,
}

/// Coefficients extracted from a satisfiable probe, in encoding column order.
#[derive(Debug, Clone)]
pub struct Witness {
    pub linear: Vec<f64>,
    pub quadratic: Vec<f64>,
    pub offset: f64,
}

/// A decision procedure for one component's constraint system.
pub trait Oracle {
    /// Checks whether the encoded constraints are satisfiable at the given
    /// gap.
    ///
    /// Must be deterministic: the same encoding and gap always produce the
    /// same verdict.
    ///
    /// # Errors
    ///
    /// Returns an [`OracleError`] only if the procedure itself fails; an
    /// unsatisfiable system is a verdict, not an error.
    fn check(&self, encoding: &Encoding, gap: f64) -> Result<Answer, OracleError>;
}

/// The default oracle: linear-programming feasibility with elite-completion
/// branching.
///
/// Holds no state; every [`check`](Oracle::check) builds its problem from
/// scratch, so nothing leaks between generation calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct LpOracle;

impl Oracle for LpOracle {
    fn check(&self, encoding: &Encoding, gap: f64) -> Result<Answer, OracleError> {
        // Elite indices form an odometer over the feasible groups, giving a
        // fixed branch order and therefore a reproducible verdict.
        let mut elites = vec![0_usize; encoding.feasible().len()];
        let mut branches = 0_u64;
        loop {
            branches += 1;
            if let Some(witness) = solve_branch(encoding, gap, &elites)? {
                trace!("gap {gap}: satisfiable after {branches} branch(es)");
                return Ok(Answer::Sat(witness));
            }
            if !advance(&mut elites, encoding) {
                trace!("gap {gap}: unsatisfiable across {branches} branch(es)");
                return Ok(Answer::Unsat);
            }
        }
    }
}

/// Solves the linear program for one elite selection.
///
/// Returns `None` if this branch is infeasible.
fn solve_branch(
    encoding: &Encoding,
    gap: f64,
    elites: &[usize],
) -> Result<Option<Witness>, OracleError> {
    let mut problem = variables!();
    let mut columns: Vec<Variable> = Vec::with_capacity(encoding.columns());
    for range in encoding.linear_bounds() {
        columns.push(problem.add(variable().min(range.min).max(range.max)));
    }
    for range in encoding.quadratic_bounds() {
        columns.push(problem.add(variable().min(range.min).max(range.max)));
    }
    // The offset is a free unknown.
    columns.push(problem.add(variable()));

    // Pure feasibility: any point satisfying the constraints will do.
    let mut model = problem.minimise(Expression::default()).using(default_solver);

    for (group, &elite) in encoding.feasible().iter().zip(elites) {
        for (i, row) in group.rows.iter().enumerate() {
            let energy = row_expression(row, &columns);
            model = if i == elite {
                model.with(constraint::eq(energy, group.target))
            } else {
                model.with(constraint::geq(energy, group.target))
            };
        }
    }

    let threshold = encoding.ground_energy() + gap;
    for group in encoding.infeasible() {
        for row in &group.rows {
            model = model.with(constraint::geq(row_expression(row, &columns), threshold));
        }
    }

    match model.solve() {
        Ok(solution) => {
            let values: Vec<f64> = columns.iter().map(|&column| solution.value(column)).collect();
            let (linear, rest) = values.split_at(encoding.node_count());
            let (quadratic, offset) = rest.split_at(encoding.edge_count());
            Ok(Some(Witness {
                linear: linear.to_vec(),
                quadratic: quadratic.to_vec(),
                offset: offset[0],
            }))
        }
        Err(ResolutionError::Infeasible) => Ok(None),
        Err(err) => Err(OracleError::new("linear solver failed").with_source(err)),
    }
}

fn row_expression(row: &EnergyRow, columns: &[Variable]) -> Expression {
    let mut expression = Expression::default();
    for (&coefficient, &column) in row.coefficients.iter().zip(columns) {
        expression += coefficient * column;
    }
    expression
}

/// Steps the elite odometer; returns `false` once every branch is exhausted.
fn advance(elites: &mut [usize], encoding: &Encoding) -> bool {
    for (elite, group) in elites.iter_mut().zip(encoding.feasible()) {
        *elite += 1;
        if *elite < group.rows.len() {
            return true;
        }
        *elite = 0;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    use approx::assert_relative_eq;
    use penalty_core::{EnergyRange, FeasibleTable, Graph, Spin};

    use crate::decompose;

    fn spins(values: &[i8]) -> Vec<Spin> {
        values
            .iter()
            .map(|&v| Spin::from_i8(v).expect("spin must be -1 or +1"))
            .collect()
    }

    fn single_variable_encoding(linear: EnergyRange, target: f64) -> Encoding {
        let mut graph = Graph::new();
        graph.add_variable('a');
        let configurations: FeasibleTable = [(spins(&[-1]), target)].into_iter().collect();
        let components = decompose::split(&graph, &['a'], &configurations);
        let linear_ranges = HashMap::from([('a', linear)]);
        Encoding::new(&components[0], &linear_ranges, &HashMap::new())
            .expect("encoding should build")
    }

    #[test]
    fn satisfiable_probe_returns_in_range_witness() {
        let encoding = single_variable_encoding(EnergyRange::LINEAR, 0.0);

        let answer = LpOracle.check(&encoding, 1.0).expect("oracle should run");
        let witness = match answer {
            Answer::Sat(witness) => witness,
            Answer::Unsat => panic!("probe at gap 1 should be satisfiable"),
        };

        let h = witness.linear[0];
        assert!(EnergyRange::LINEAR.contains(h));
        // Feasible (-1) sits at ground: -h + offset == 0.
        assert_relative_eq!(-h + witness.offset, 0.0, epsilon = 1e-6);
        // Infeasible (+1) clears the gap: h + offset >= 1.
        assert!(h + witness.offset >= 1.0 - 1e-6);
    }

    #[test]
    fn unsatisfiable_probe_is_a_verdict_not_an_error() {
        // With h pinned to zero both assignments have equal energy, so no
        // positive gap is achievable.
        let encoding = single_variable_encoding(EnergyRange::new(0.0, 0.0), 0.0);

        let answer = LpOracle.check(&encoding, 1.0).expect("oracle should run");
        assert!(matches!(answer, Answer::Unsat));
    }

    #[test]
    fn branching_finds_the_elite_completion() {
        // Path a-c-b with auxiliary c: equal-spin pairs must be ground.
        let mut graph = Graph::new();
        graph.add_interaction('a', 'c');
        graph.add_interaction('b', 'c');
        let configurations: FeasibleTable = [
            (spins(&[-1, -1]), 0.0),
            (spins(&[1, 1]), 0.0),
        ]
        .into_iter()
        .collect();
        let components = decompose::split(&graph, &['a', 'b'], &configurations);
        let linear_ranges: HashMap<char, EnergyRange> = graph
            .variables()
            .map(|&v| (v, EnergyRange::LINEAR))
            .collect();
        let quadratic_ranges: HashMap<(char, char), EnergyRange> = graph
            .interactions()
            .map(|(&u, &v)| ((u, v), EnergyRange::QUADRATIC))
            .collect();
        let encoding = Encoding::new(&components[0], &linear_ranges, &quadratic_ranges)
            .expect("encoding should build");

        let answer = LpOracle.check(&encoding, 1.0).expect("oracle should run");
        assert!(matches!(answer, Answer::Sat(_)));
    }

    #[test]
    fn elite_odometer_covers_all_branches() {
        let mut graph = Graph::new();
        graph.add_interaction('a', 'c');
        graph.add_interaction('b', 'c');
        let configurations: FeasibleTable = [
            (spins(&[-1, -1]), 0.0),
            (spins(&[1, 1]), 0.0),
        ]
        .into_iter()
        .collect();
        let components = decompose::split(&graph, &['a', 'b'], &configurations);
        let linear_ranges: HashMap<char, EnergyRange> = graph
            .variables()
            .map(|&v| (v, EnergyRange::LINEAR))
            .collect();
        let quadratic_ranges: HashMap<(char, char), EnergyRange> = graph
            .interactions()
            .map(|(&u, &v)| ((u, v), EnergyRange::QUADRATIC))
            .collect();
        let encoding = Encoding::new(&components[0], &linear_ranges, &quadratic_ranges)
            .expect("encoding should build");

        // Two feasible groups with two completions each: four branches.
        let mut elites = vec![0, 0];
        let mut seen = vec![elites.clone()];
        while advance(&mut elites, &encoding) {
            seen.push(elites.clone());
        }
        assert_eq!(seen.len(), 4);
        assert_eq!(seen, vec![vec![0, 0], vec![1, 0], vec![0, 1], vec![1, 1]]);
    }
}
