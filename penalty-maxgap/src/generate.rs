//! Entry points: validate, decompose, search per component, assemble.

use std::collections::{HashMap, HashSet};

use penalty_core::{EnergyRange, Error, FeasibleTable, Graph, Model, Variable};

use crate::{
    decompose,
    encode::Encoding,
    oracle::LpOracle,
    search::{self, SearchConfig},
};

/// Generates a penalty model over the interaction graph.
///
/// Searches for linear and quadratic coefficients, each within its energy
/// range, such that every configuration in `configurations` achieves its
/// target energy as the minimum over auxiliary-variable completions, while
/// every other decision-variable assignment lies at least `min_classical_gap`
/// above ground. The achieved gap is maximized per connected component; the
/// returned gap is the weakest component's.
///
/// The returned model has exactly one linear coefficient per graph variable
/// and one quadratic coefficient per interaction. Connected components
/// without decision variables contribute zero coefficients, clamped into
/// their ranges.
///
/// # Errors
///
/// - [`Error::InvalidInput`] for malformed arguments: a decision variable
///   outside the graph, a configuration of the wrong length, a missing or
///   non-finite energy range, or a non-finite gap or target energy.
/// - [`Error::ImpossiblePenaltyModel`] if some component admits no
///   coefficients achieving `min_classical_gap`.
/// - [`Error::Oracle`] if the decision procedure itself fails.
pub fn generate<V: Variable>(
    graph: &Graph<V>,
    configurations: &FeasibleTable,
    decision_variables: &[V],
    linear_ranges: &HashMap<V, EnergyRange>,
    quadratic_ranges: &HashMap<(V, V), EnergyRange>,
    min_classical_gap: f64,
) -> Result<(Model<V>, f64), Error> {
    generate_model(
        graph,
        configurations,
        decision_variables,
        linear_ranges,
        quadratic_ranges,
        min_classical_gap,
        None,
    )
}

/// Generates a penalty model and returns its Ising representation
/// `(h, J, offset, classical_gap)`.
///
/// Identical semantics to [`generate`], with one addition: `aux_hint`, when
/// present, caps the number of auxiliary variables any single component may
/// enumerate; a component exceeding the cap fails with
/// [`Error::InvalidInput`] before any oracle call.
///
/// # Errors
///
/// As for [`generate`].
pub fn generate_ising<V: Variable>(
    graph: &Graph<V>,
    configurations: &FeasibleTable,
    decision_variables: &[V],
    linear_ranges: &HashMap<V, EnergyRange>,
    quadratic_ranges: &HashMap<(V, V), EnergyRange>,
    min_classical_gap: f64,
    aux_hint: Option<usize>,
) -> Result<(HashMap<V, f64>, HashMap<(V, V), f64>, f64, f64), Error> {
    let (model, gap) = generate_model(
        graph,
        configurations,
        decision_variables,
        linear_ranges,
        quadratic_ranges,
        min_classical_gap,
        aux_hint,
    )?;
    let (h, j, offset, _) = model.into_ising();
    Ok((h, j, offset, gap))
}

fn generate_model<V: Variable>(
    graph: &Graph<V>,
    configurations: &FeasibleTable,
    decision_variables: &[V],
    linear_ranges: &HashMap<V, EnergyRange>,
    quadratic_ranges: &HashMap<(V, V), EnergyRange>,
    min_classical_gap: f64,
    aux_hint: Option<usize>,
) -> Result<(Model<V>, f64), Error> {
    validate(
        graph,
        configurations,
        decision_variables,
        linear_ranges,
        quadratic_ranges,
        min_classical_gap,
    )?;

    let components = decompose::split(graph, decision_variables, configurations);

    // Build every encoding up front so invalid input surfaces before the
    // first oracle call.
    let mut encodings = Vec::with_capacity(components.len());
    for component in &components {
        if let Some(cap) = aux_hint {
            let aux = component.auxiliary_variables().len();
            if aux > cap {
                return Err(Error::invalid_input(format!(
                    "component has {aux} auxiliary variables, exceeding the hint of {cap}"
                )));
            }
        }
        encodings.push(Encoding::new(component, linear_ranges, quadratic_ranges)?);
    }

    // Dropped components keep zero coefficients, clamped into range so the
    // assembled model stays bound-compliant.
    let mut linear: HashMap<V, f64> = graph
        .variables()
        .map(|v| {
            let range = linear_ranges.get(v).copied().unwrap_or(EnergyRange::LINEAR);
            (v.clone(), range.clamp(0.0))
        })
        .collect();
    let mut quadratic: HashMap<(V, V), f64> = graph
        .interactions()
        .map(|(u, v)| {
            let range = edge_range(quadratic_ranges, u, v).unwrap_or(EnergyRange::QUADRATIC);
            ((u.clone(), v.clone()), range.clamp(0.0))
        })
        .collect();
    let mut offset = 0.0;
    let mut gap = f64::INFINITY;

    // The oracle lives exactly as long as this generation call.
    let oracle = LpOracle;
    let config = SearchConfig::default();

    for (component, encoding) in components.iter().zip(&encodings) {
        let outcome = search::maximize_gap(&oracle, encoding, min_classical_gap, &config)?;

        let subgraph = component.subgraph();
        for (v, &h) in subgraph.variables().zip(&outcome.witness.linear) {
            linear.insert(v.clone(), h);
        }
        for ((u, v), &j) in subgraph.interactions().zip(&outcome.witness.quadratic) {
            quadratic.insert((u.clone(), v.clone()), j);
        }
        offset += outcome.witness.offset;
        gap = gap.min(outcome.gap);
    }

    Ok((Model::new(linear, quadratic, offset, gap), gap))
}

fn validate<V: Variable>(
    graph: &Graph<V>,
    configurations: &FeasibleTable,
    decision_variables: &[V],
    linear_ranges: &HashMap<V, EnergyRange>,
    quadratic_ranges: &HashMap<(V, V), EnergyRange>,
    min_classical_gap: f64,
) -> Result<(), Error> {
    if !min_classical_gap.is_finite() {
        return Err(Error::invalid_input("min_classical_gap must be finite"));
    }

    let mut seen = HashSet::new();
    for v in decision_variables {
        if !graph.contains_variable(v) {
            return Err(Error::invalid_input(format!(
                "decision variable {v:?} is not a variable of the graph"
            )));
        }
        if !seen.insert(v) {
            return Err(Error::invalid_input(format!(
                "decision variable {v:?} appears more than once"
            )));
        }
    }

    if configurations.is_empty() && !decision_variables.is_empty() {
        return Err(Error::invalid_input(
            "at least one feasible configuration is required when decision variables are present",
        ));
    }
    for (configuration, energy) in configurations.iter() {
        if configuration.len() != decision_variables.len() {
            return Err(Error::invalid_input(format!(
                "configuration length {} does not match the {} decision variables",
                configuration.len(),
                decision_variables.len()
            )));
        }
        if !energy.is_finite() {
            return Err(Error::invalid_input("target energies must be finite"));
        }
    }

    for v in graph.variables() {
        let range = linear_ranges
            .get(v)
            .ok_or_else(|| Error::invalid_input(format!("missing linear range for {v:?}")))?;
        range
            .validate()
            .map_err(|reason| Error::invalid_input(format!("linear range for {v:?}: {reason}")))?;
    }
    for (u, v) in graph.interactions() {
        let range = edge_range(quadratic_ranges, u, v).ok_or_else(|| {
            Error::invalid_input(format!("missing quadratic range for ({u:?}, {v:?})"))
        })?;
        range.validate().map_err(|reason| {
            Error::invalid_input(format!("quadratic range for ({u:?}, {v:?}): {reason}"))
        })?;
    }

    Ok(())
}

/// Looks up the range of an undirected edge, accepting either key order.
fn edge_range<V: Variable>(
    quadratic_ranges: &HashMap<(V, V), EnergyRange>,
    u: &V,
    v: &V,
) -> Option<EnergyRange> {
    quadratic_ranges
        .get(&(u.clone(), v.clone()))
        .or_else(|| quadratic_ranges.get(&(v.clone(), u.clone())))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    use penalty_core::Spin;

    fn spins(values: &[i8]) -> Vec<Spin> {
        values
            .iter()
            .map(|&v| Spin::from_i8(v).expect("spin must be -1 or +1"))
            .collect()
    }

    fn ranges_for(
        graph: &Graph<char>,
    ) -> (HashMap<char, EnergyRange>, HashMap<(char, char), EnergyRange>) {
        let linear = graph
            .variables()
            .map(|&v| (v, EnergyRange::LINEAR))
            .collect();
        let quadratic = graph
            .interactions()
            .map(|(&u, &v)| ((u, v), EnergyRange::QUADRATIC))
            .collect();
        (linear, quadratic)
    }

    #[test]
    fn rejects_unknown_decision_variable() {
        let mut graph = Graph::new();
        graph.add_variable('a');
        let (linear, quadratic) = ranges_for(&graph);
        let configurations: FeasibleTable = [(spins(&[-1]), 0.0)].into_iter().collect();

        let result = generate(&graph, &configurations, &['z'], &linear, &quadratic, 0.0);
        assert!(matches!(result, Err(Error::InvalidInput { .. })));
    }

    #[test]
    fn rejects_mismatched_configuration_length() {
        let mut graph = Graph::new();
        graph.add_variable('a');
        let (linear, quadratic) = ranges_for(&graph);
        let configurations: FeasibleTable = [(spins(&[-1, 1]), 0.0)].into_iter().collect();

        let result = generate(&graph, &configurations, &['a'], &linear, &quadratic, 0.0);
        assert!(matches!(result, Err(Error::InvalidInput { .. })));
    }

    #[test]
    fn rejects_missing_ranges() {
        let mut graph = Graph::new();
        graph.add_interaction('a', 'b');
        let configurations: FeasibleTable = [(spins(&[-1, -1]), 0.0)].into_iter().collect();
        let (linear, quadratic) = ranges_for(&graph);

        let result = generate(
            &graph,
            &configurations,
            &['a', 'b'],
            &HashMap::new(),
            &quadratic,
            0.0,
        );
        assert!(matches!(result, Err(Error::InvalidInput { .. })));

        let result = generate(
            &graph,
            &configurations,
            &['a', 'b'],
            &linear,
            &HashMap::new(),
            0.0,
        );
        assert!(matches!(result, Err(Error::InvalidInput { .. })));
    }

    #[test]
    fn rejects_non_finite_bounds_and_gap() {
        let mut graph = Graph::new();
        graph.add_variable('a');
        let configurations: FeasibleTable = [(spins(&[-1]), 0.0)].into_iter().collect();
        let bad_linear = HashMap::from([('a', EnergyRange::new(f64::NEG_INFINITY, 2.0))]);
        let (linear, quadratic) = ranges_for(&graph);

        let result = generate(
            &graph,
            &configurations,
            &['a'],
            &bad_linear,
            &quadratic,
            0.0,
        );
        assert!(matches!(result, Err(Error::InvalidInput { .. })));

        let result = generate(
            &graph,
            &configurations,
            &['a'],
            &linear,
            &quadratic,
            f64::NAN,
        );
        assert!(matches!(result, Err(Error::InvalidInput { .. })));
    }

    #[test]
    fn aux_hint_caps_component_auxiliaries() {
        // Triangle with one auxiliary variable 'c'.
        let mut graph = Graph::new();
        graph.add_interaction('a', 'b');
        graph.add_interaction('b', 'c');
        graph.add_interaction('a', 'c');
        let (linear, quadratic) = ranges_for(&graph);
        let configurations: FeasibleTable = [
            (spins(&[-1, -1]), 0.0),
            (spins(&[1, 1]), 0.0),
        ]
        .into_iter()
        .collect();

        let result = generate_ising(
            &graph,
            &configurations,
            &['a', 'b'],
            &linear,
            &quadratic,
            0.0,
            Some(0),
        );
        assert!(matches!(result, Err(Error::InvalidInput { .. })));

        let result = generate_ising(
            &graph,
            &configurations,
            &['a', 'b'],
            &linear,
            &quadratic,
            0.0,
            Some(1),
        );
        assert!(result.is_ok());
    }
}
