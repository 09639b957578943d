use std::collections::HashMap;

use crate::{graph::Variable, table::Spin};

/// A generated penalty model.
///
/// Linear coefficients cover every variable of the source graph and quadratic
/// coefficients cover every interaction, with edge keys oriented so the
/// smaller label comes first. The classical gap is the energy separation
/// between the ground level and the best infeasible assignment, or
/// `f64::INFINITY` when no infeasible assignment exists.
#[derive(Debug, Clone)]
pub struct Model<V: Variable> {
    linear: HashMap<V, f64>,
    quadratic: HashMap<(V, V), f64>,
    offset: f64,
    classical_gap: f64,
}

impl<V: Variable> Model<V> {
    /// Assembles a model from its coefficient maps.
    ///
    /// Quadratic keys must already be oriented with the smaller label first,
    /// as produced by the interaction graph.
    #[must_use]
    pub fn new(
        linear: HashMap<V, f64>,
        quadratic: HashMap<(V, V), f64>,
        offset: f64,
        classical_gap: f64,
    ) -> Self {
        Self {
            linear,
            quadratic,
            offset,
            classical_gap,
        }
    }

    /// The linear coefficients, one per graph variable.
    #[must_use]
    pub fn linear(&self) -> &HashMap<V, f64> {
        &self.linear
    }

    /// The quadratic coefficients, one per graph interaction.
    #[must_use]
    pub fn quadratic(&self) -> &HashMap<(V, V), f64> {
        &self.quadratic
    }

    /// The constant energy offset.
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// The achieved classical gap.
    #[must_use]
    pub fn classical_gap(&self) -> f64 {
        self.classical_gap
    }

    /// Evaluates the model energy of a full assignment.
    ///
    /// Returns `None` if the sample is missing any model variable.
    #[must_use]
    pub fn energy(&self, sample: &HashMap<V, Spin>) -> Option<f64> {
        let mut energy = self.offset;
        for (v, h) in &self.linear {
            energy += h * sample.get(v)?.value();
        }
        for ((u, v), j) in &self.quadratic {
            energy += j * sample.get(u)?.value() * sample.get(v)?.value();
        }
        Some(energy)
    }

    /// Decomposes the model into its Ising representation
    /// `(h, J, offset, classical_gap)`.
    #[must_use]
    pub fn into_ising(self) -> (HashMap<V, f64>, HashMap<(V, V), f64>, f64, f64) {
        (self.linear, self.quadratic, self.offset, self.classical_gap)
    }
}
