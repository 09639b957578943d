//! Splits the interaction graph into independently solvable components.

use std::collections::BTreeMap;

use penalty_core::{FeasibleTable, Graph, Spin, Variable};

/// One connected component of the interaction graph, carrying its share of
/// the decision variables and the projected feasible configurations.
#[derive(Debug, Clone)]
pub struct Component<V: Variable> {
    subgraph: Graph<V>,
    decision: Vec<V>,
    auxiliary: Vec<V>,
    table: FeasibleTable,
}

impl<V: Variable> Component<V> {
    /// The component's subgraph.
    #[must_use]
    pub fn subgraph(&self) -> &Graph<V> {
        &self.subgraph
    }

    /// The component's decision variables, in global decision order.
    #[must_use]
    pub fn decision_variables(&self) -> &[V] {
        &self.decision
    }

    /// The component's auxiliary variables, in subgraph order.
    #[must_use]
    pub fn auxiliary_variables(&self) -> &[V] {
        &self.auxiliary
    }

    /// The feasible configurations projected onto this component.
    #[must_use]
    pub fn table(&self) -> &FeasibleTable {
        &self.table
    }
}

/// Partitions the graph into connected components and projects the feasible
/// configurations onto each.
///
/// Every global configuration contributes its restriction to the component's
/// decision variables; duplicate projections collapse to the minimum target
/// energy among the rows that produced them, so projections of ground rows
/// stay ground locally. Components without decision variables are dropped
/// here and contribute only zero coefficients at assembly.
pub fn split<V: Variable>(
    graph: &Graph<V>,
    decision_variables: &[V],
    configurations: &FeasibleTable,
) -> Vec<Component<V>> {
    let mut components = Vec::new();

    for subgraph in graph.connected_components() {
        let local: Vec<(usize, &V)> = decision_variables
            .iter()
            .enumerate()
            .filter(|&(_, v)| subgraph.contains_variable(v))
            .collect();
        if local.is_empty() {
            continue;
        }

        let decision: Vec<V> = local.iter().map(|(_, v)| (*v).clone()).collect();
        let auxiliary: Vec<V> = subgraph
            .variables()
            .filter(|v| !decision.contains(*v))
            .cloned()
            .collect();

        let mut projected: BTreeMap<Vec<Spin>, f64> = BTreeMap::new();
        for (configuration, energy) in configurations.iter() {
            let projection: Vec<Spin> = local.iter().map(|&(i, _)| configuration[i]).collect();
            projected
                .entry(projection)
                .and_modify(|e| *e = e.min(energy))
                .or_insert(energy);
        }

        components.push(Component {
            subgraph,
            decision,
            auxiliary,
            table: projected.into_iter().collect(),
        });
    }

    components
}
