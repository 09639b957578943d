use std::{collections::HashMap, fmt, hash::Hash};

use petgraph::{
    graph::{NodeIndex, UnGraph},
    unionfind::UnionFind,
    visit::EdgeRef,
};

/// Types usable as variable labels in an interaction graph.
///
/// Implemented automatically for anything clonable, hashable, and totally
/// ordered; the ordering fixes the orientation of undirected edge keys.
pub trait Variable: Clone + Eq + Hash + Ord + fmt::Debug {}

impl<T: Clone + Eq + Hash + Ord + fmt::Debug> Variable for T {}

/// An undirected interaction graph.
///
/// Nodes are variables (decision and auxiliary alike) and edges are the
/// allowed quadratic interactions between them. Variables keep their
/// insertion order, which makes component enumeration and coefficient layout
/// deterministic.
#[derive(Debug, Clone)]
pub struct Graph<V: Variable> {
    graph: UnGraph<V, ()>,
    index: HashMap<V, NodeIndex>,
}

impl<V: Variable> Graph<V> {
    /// Creates an empty interaction graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: UnGraph::default(),
            index: HashMap::new(),
        }
    }

    /// Adds a variable if it is not already present.
    pub fn add_variable(&mut self, var: V) {
        self.get_or_add(var);
    }

    /// Adds an interaction between two variables.
    ///
    /// Missing endpoints are added automatically. Duplicate interactions are
    /// ignored, as is a self interaction (`s_v * s_v` is constant and folds
    /// into the offset, so it never carries a coefficient).
    pub fn add_interaction(&mut self, u: V, v: V) {
        if u == v {
            self.add_variable(u);
            return;
        }
        let a = self.get_or_add(u);
        let b = self.get_or_add(v);
        if self.graph.find_edge(a, b).is_none() {
            self.graph.add_edge(a, b, ());
        }
    }

    /// Returns whether the variable is a node of the graph.
    #[must_use]
    pub fn contains_variable(&self, var: &V) -> bool {
        self.index.contains_key(var)
    }

    /// Returns whether the two variables share an interaction.
    #[must_use]
    pub fn contains_interaction(&self, u: &V, v: &V) -> bool {
        match (self.index.get(u), self.index.get(v)) {
            (Some(&a), Some(&b)) => self.graph.find_edge(a, b).is_some(),
            _ => false,
        }
    }

    /// The number of variables.
    #[must_use]
    pub fn num_variables(&self) -> usize {
        self.graph.node_count()
    }

    /// The number of interactions.
    #[must_use]
    pub fn num_interactions(&self) -> usize {
        self.graph.edge_count()
    }

    /// Iterates over the variables in insertion order.
    pub fn variables(&self) -> impl Iterator<Item = &V> {
        self.graph.node_indices().map(|i| &self.graph[i])
    }

    /// Iterates over the interactions in insertion order.
    ///
    /// Each pair is oriented so the smaller label comes first, making edge
    /// keys unambiguous.
    pub fn interactions(&self) -> impl Iterator<Item = (&V, &V)> {
        self.graph.edge_references().map(|edge| {
            let u = &self.graph[edge.source()];
            let v = &self.graph[edge.target()];
            if u <= v { (u, v) } else { (v, u) }
        })
    }

    /// Splits the graph into its connected components.
    ///
    /// Components are returned in order of their first variable's insertion,
    /// and each component preserves the parent graph's variable and
    /// interaction order.
    #[must_use]
    pub fn connected_components(&self) -> Vec<Self> {
        let mut union: UnionFind<usize> = UnionFind::new(self.graph.node_count());
        for edge in self.graph.edge_references() {
            union.union(edge.source().index(), edge.target().index());
        }

        let mut slot_of_root: HashMap<usize, usize> = HashMap::new();
        let mut parts: Vec<Self> = Vec::new();

        for node in self.graph.node_indices() {
            let root = union.find(node.index());
            let slot = *slot_of_root.entry(root).or_insert_with(|| {
                parts.push(Self::new());
                parts.len() - 1
            });
            parts[slot].add_variable(self.graph[node].clone());
        }

        for edge in self.graph.edge_references() {
            let slot = slot_of_root[&union.find(edge.source().index())];
            parts[slot].add_interaction(
                self.graph[edge.source()].clone(),
                self.graph[edge.target()].clone(),
            );
        }

        parts
    }

    fn get_or_add(&mut self, var: V) -> NodeIndex {
        if let Some(&index) = self.index.get(&var) {
            return index;
        }
        let index = self.graph.add_node(var.clone());
        self.index.insert(var, index);
        index
    }
}

impl<V: Variable> Default for Graph<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Variable> FromIterator<(V, V)> for Graph<V> {
    fn from_iter<I: IntoIterator<Item = (V, V)>>(edges: I) -> Self {
        let mut graph = Self::new();
        for (u, v) in edges {
            graph.add_interaction(u, v);
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_variables_and_interactions() {
        let mut graph = Graph::new();
        graph.add_interaction("a", "b");
        graph.add_interaction("b", "c");
        graph.add_variable("d");

        assert_eq!(graph.num_variables(), 4);
        assert_eq!(graph.num_interactions(), 2);
        assert!(graph.contains_variable(&"d"));
        assert!(graph.contains_interaction(&"a", &"b"));
        assert!(graph.contains_interaction(&"b", &"a"));
        assert!(!graph.contains_interaction(&"a", &"c"));
    }

    #[test]
    fn ignores_duplicate_and_self_interactions() {
        let mut graph = Graph::new();
        graph.add_interaction(0, 1);
        graph.add_interaction(1, 0);
        graph.add_interaction(2, 2);

        assert_eq!(graph.num_variables(), 3);
        assert_eq!(graph.num_interactions(), 1);
    }

    #[test]
    fn orients_interactions_by_label_order() {
        let mut graph = Graph::new();
        graph.add_interaction(5, 2);

        let edges: Vec<_> = graph.interactions().collect();
        assert_eq!(edges, vec![(&2, &5)]);
    }

    #[test]
    fn splits_into_connected_components() {
        let mut graph = Graph::new();
        graph.add_interaction(0, 1);
        graph.add_interaction(1, 2);
        graph.add_interaction(8, 9);
        graph.add_variable(4);

        let parts = graph.connected_components();
        assert_eq!(parts.len(), 3);

        let vars: Vec<Vec<i32>> = parts
            .iter()
            .map(|part| part.variables().copied().collect())
            .collect();
        assert_eq!(vars, vec![vec![0, 1, 2], vec![8, 9], vec![4]]);

        assert_eq!(parts[0].num_interactions(), 2);
        assert_eq!(parts[1].num_interactions(), 1);
        assert_eq!(parts[2].num_interactions(), 0);
    }

    #[test]
    fn empty_graph_has_no_components() {
        let graph: Graph<u32> = Graph::new();
        assert!(graph.connected_components().is_empty());
    }
}
