//! Encodes one component's energy landscape as a linear constraint system.
//!
//! The unknowns are the component's linear coefficients (one column per
//! variable, in subgraph order), its quadratic coefficients (one column per
//! interaction, in subgraph order), and the energy offset (last column).
//! Every decision-variable assignment, crossed with every auxiliary
//! completion, becomes one [`EnergyRow`]: the coefficients of the energy
//! expression `E = Σ h_v s_v + Σ J_uv s_u s_v + offset` over those columns.
//!
//! The encoding is built once per component and reused across every gap
//! probe of the binary search; only the infeasible right-hand side
//! (`ground + gap`) moves between probes.

use std::collections::HashMap;

use penalty_core::{EnergyRange, Error, Spin, Variable};

use crate::decompose::Component;

/// Enumerating assignments uses one bit per variable, so component sizes
/// beyond this are rejected rather than silently overflowing.
const MAX_ENUMERATED_VARIABLES: usize = 24;

/// The coefficients of one energy expression over the unknown columns.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyRow {
    pub coefficients: Vec<f64>,
}

/// The energy rows of one feasible configuration: one row per auxiliary
/// completion, each required to stay at or above `target`, with at least one
/// (the oracle's "elite" choice) pinned to equality.
#[derive(Debug, Clone)]
pub struct FeasibleGroup {
    pub target: f64,
    pub rows: Vec<EnergyRow>,
}

/// The energy rows of one infeasible configuration: one row per auxiliary
/// completion, each required to stay at or above `ground + gap`.
#[derive(Debug, Clone)]
pub struct InfeasibleGroup {
    pub rows: Vec<EnergyRow>,
}

/// The constraint system of one component, parameterized by the gap.
#[derive(Debug, Clone)]
pub struct Encoding {
    node_count: usize,
    edge_count: usize,
    linear_bounds: Vec<EnergyRange>,
    quadratic_bounds: Vec<EnergyRange>,
    feasible: Vec<FeasibleGroup>,
    infeasible: Vec<InfeasibleGroup>,
    ground_energy: f64,
    max_spread: f64,
}

impl Encoding {
    /// Builds the constraint system for a component.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if a variable or interaction has no
    /// energy range, if the component has no feasible configurations, or if
    /// its decision or auxiliary variable count exceeds the enumeration
    /// limit.
    pub fn new<V: Variable>(
        component: &Component<V>,
        linear_ranges: &HashMap<V, EnergyRange>,
        quadratic_ranges: &HashMap<(V, V), EnergyRange>,
    ) -> Result<Self, Error> {
        let subgraph = component.subgraph();
        let nodes: Vec<&V> = subgraph.variables().collect();
        let edges: Vec<(&V, &V)> = subgraph.interactions().collect();

        let decision = component.decision_variables();
        let auxiliary = component.auxiliary_variables();
        if decision.len() > MAX_ENUMERATED_VARIABLES {
            return Err(Error::invalid_input(format!(
                "component has {} decision variables; enumeration supports at most {MAX_ENUMERATED_VARIABLES}",
                decision.len(),
            )));
        }
        if auxiliary.len() > MAX_ENUMERATED_VARIABLES {
            return Err(Error::invalid_input(format!(
                "component has {} auxiliary variables; enumeration supports at most {MAX_ENUMERATED_VARIABLES}",
                auxiliary.len(),
            )));
        }

        let ground_energy = component.table().ground_energy().ok_or_else(|| {
            Error::invalid_input(
                "no feasible configuration projects onto a component with decision variables",
            )
        })?;

        let linear_bounds = nodes
            .iter()
            .map(|&v| {
                linear_ranges
                    .get(v)
                    .copied()
                    .ok_or_else(|| Error::invalid_input(format!("missing linear range for {v:?}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let quadratic_bounds = edges
            .iter()
            .map(|&(u, v)| {
                edge_range(quadratic_ranges, u, v).ok_or_else(|| {
                    Error::invalid_input(format!("missing quadratic range for ({u:?}, {v:?})"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        // Each node's spin comes either from the decision tuple or from the
        // auxiliary completion bits.
        let mut role: HashMap<&V, SpinSource> = HashMap::new();
        for (i, v) in decision.iter().enumerate() {
            role.insert(v, SpinSource::Decision(i));
        }
        for (i, v) in auxiliary.iter().enumerate() {
            role.entry(v).or_insert(SpinSource::Auxiliary(i));
        }
        let sources: Vec<SpinSource> = nodes
            .iter()
            .map(|&node| {
                role.get(node).copied().ok_or_else(|| {
                    Error::invalid_input(format!(
                        "variable {node:?} is neither a decision nor an auxiliary variable"
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let endpoint_columns: Vec<(usize, usize)> = {
            let column: HashMap<&V, usize> =
                nodes.iter().enumerate().map(|(i, &v)| (v, i)).collect();
            edges.iter().map(|&(u, v)| (column[u], column[v])).collect()
        };

        let layout = Layout {
            sources,
            endpoint_columns,
            aux_count: auxiliary.len(),
        };

        let feasible: Vec<FeasibleGroup> = component
            .table()
            .iter()
            .map(|(configuration, target)| FeasibleGroup {
                target,
                rows: layout.rows_for(configuration),
            })
            .collect();

        let mut infeasible = Vec::new();
        for pattern in 0u32..1 << decision.len() {
            let configuration: Vec<Spin> = (0..decision.len())
                .map(|i| Spin::from_bit(pattern >> i & 1 == 1))
                .collect();
            if !component.table().contains(&configuration) {
                infeasible.push(InfeasibleGroup {
                    rows: layout.rows_for(&configuration),
                });
            }
        }

        let max_spread = linear_bounds
            .iter()
            .chain(&quadratic_bounds)
            .map(EnergyRange::max_abs)
            .sum();

        Ok(Self {
            node_count: nodes.len(),
            edge_count: edges.len(),
            linear_bounds,
            quadratic_bounds,
            feasible,
            infeasible,
            ground_energy,
            max_spread,
        })
    }

    /// Total unknown columns: linear, then quadratic, then the offset.
    #[must_use]
    pub fn columns(&self) -> usize {
        self.node_count + self.edge_count + 1
    }

    /// The number of linear-coefficient columns.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// The number of quadratic-coefficient columns.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Bounds for the linear columns, in column order.
    #[must_use]
    pub fn linear_bounds(&self) -> &[EnergyRange] {
        &self.linear_bounds
    }

    /// Bounds for the quadratic columns, in column order.
    #[must_use]
    pub fn quadratic_bounds(&self) -> &[EnergyRange] {
        &self.quadratic_bounds
    }

    /// The constrained groups of the feasible configurations.
    #[must_use]
    pub fn feasible(&self) -> &[FeasibleGroup] {
        &self.feasible
    }

    /// The constrained groups of the infeasible configurations.
    #[must_use]
    pub fn infeasible(&self) -> &[InfeasibleGroup] {
        &self.infeasible
    }

    /// Returns whether any infeasible configuration constrains the gap.
    #[must_use]
    pub fn has_infeasible(&self) -> bool {
        !self.infeasible.is_empty()
    }

    /// The shared ground energy: the minimum feasible target.
    #[must_use]
    pub fn ground_energy(&self) -> f64 {
        self.ground_energy
    }

    /// An upper cap on any achievable gap, from the energy ranges.
    ///
    /// The sum of the largest coefficient magnitudes caps the gap the bounded
    /// coefficients are allowed to produce, and with it the binary search
    /// interval. A satisfiable probe at this ceiling is returned as the gap.
    #[must_use]
    pub fn max_spread(&self) -> f64 {
        self.max_spread
    }
}

/// Where each subgraph node takes its spin from when a row is materialized.
#[derive(Debug, Clone, Copy)]
enum SpinSource {
    /// Index into the local decision configuration.
    Decision(usize),
    /// Bit position in the auxiliary completion pattern.
    Auxiliary(usize),
}

struct Layout {
    sources: Vec<SpinSource>,
    endpoint_columns: Vec<(usize, usize)>,
    aux_count: usize,
}

impl Layout {
    /// Builds one row per auxiliary completion of the given configuration.
    fn rows_for(&self, configuration: &[Spin]) -> Vec<EnergyRow> {
        (0u32..1 << self.aux_count)
            .map(|bits| self.row(configuration, bits))
            .collect()
    }

    fn row(&self, configuration: &[Spin], aux_bits: u32) -> EnergyRow {
        let spins: Vec<f64> = self
            .sources
            .iter()
            .map(|source| match *source {
                SpinSource::Decision(i) => configuration[i].value(),
                SpinSource::Auxiliary(i) => Spin::from_bit(aux_bits >> i & 1 == 1).value(),
            })
            .collect();

        let mut coefficients = Vec::with_capacity(spins.len() + self.endpoint_columns.len() + 1);
        coefficients.extend_from_slice(&spins);
        coefficients.extend(
            self.endpoint_columns
                .iter()
                .map(|&(u, v)| spins[u] * spins[v]),
        );
        coefficients.push(1.0);
        EnergyRow { coefficients }
    }
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
