use std::collections::BTreeMap;

/// A classical spin value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Spin {
    /// Spin down, valued `-1`.
    Down,
    /// Spin up, valued `+1`.
    Up,
}

impl Spin {
    /// The spin as a real value, `-1.0` or `+1.0`.
    #[must_use]
    pub fn value(self) -> f64 {
        match self {
            Self::Down => -1.0,
            Self::Up => 1.0,
        }
    }

    /// Converts from the `-1`/`+1` integer convention.
    ///
    /// Returns `None` for any other value.
    #[must_use]
    pub fn from_i8(value: i8) -> Option<Self> {
        match value {
            -1 => Some(Self::Down),
            1 => Some(Self::Up),
            _ => None,
        }
    }

    /// Converts from the binary convention, `false` meaning spin down.
    #[must_use]
    pub fn from_bit(bit: bool) -> Self {
        if bit { Self::Up } else { Self::Down }
    }

    /// The spin in the `-1`/`+1` integer convention.
    #[must_use]
    pub fn as_i8(self) -> i8 {
        match self {
            Self::Down => -1,
            Self::Up => 1,
        }
    }
}

/// The feasible configurations of the decision variables.
///
/// Maps each feasible assignment (one spin per decision variable, matching
/// the decision-variable order) to its target relative energy. The entries
/// with the minimum target form the ground level; only differences between
/// targets are meaningful, since the model offset absorbs any global shift.
///
/// Entries iterate in a fixed sorted order, which keeps downstream encoding
/// and oracle branching deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeasibleTable {
    entries: BTreeMap<Vec<Spin>, f64>,
}

impl FeasibleTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a feasible configuration with its target energy.
    ///
    /// Returns the previous target if the configuration was already present.
    pub fn insert(&mut self, configuration: Vec<Spin>, target_energy: f64) -> Option<f64> {
        self.entries.insert(configuration, target_energy)
    }

    /// Returns the target energy of a configuration, if it is feasible.
    #[must_use]
    pub fn get(&self, configuration: &[Spin]) -> Option<f64> {
        self.entries.get(configuration).copied()
    }

    /// Returns whether the configuration is feasible.
    #[must_use]
    pub fn contains(&self, configuration: &[Spin]) -> bool {
        self.entries.contains_key(configuration)
    }

    /// The number of feasible configurations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The length of each configuration tuple, from the first entry.
    #[must_use]
    pub fn tuple_len(&self) -> Option<usize> {
        self.entries.keys().next().map(Vec::len)
    }

    /// The minimum target energy across all entries.
    #[must_use]
    pub fn ground_energy(&self) -> Option<f64> {
        self.entries.values().copied().reduce(f64::min)
    }

    /// Iterates over the entries in sorted configuration order.
    pub fn iter(&self) -> impl Iterator<Item = (&[Spin], f64)> {
        self.entries
            .iter()
            .map(|(configuration, &energy)| (configuration.as_slice(), energy))
    }
}

impl FromIterator<(Vec<Spin>, f64)> for FeasibleTable {
    fn from_iter<I: IntoIterator<Item = (Vec<Spin>, f64)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
