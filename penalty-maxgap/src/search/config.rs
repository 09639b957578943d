/// Configuration for the gap binary search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    /// Iteration cap on the bisection loop.
    pub max_iters: usize,
    /// Absolute convergence tolerance on the gap.
    pub gap_tol: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_iters: 100,
            gap_tol: 1e-6,
        }
    }
}

impl SearchConfig {
    /// Validates that the tolerance is finite and positive.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if the tolerance is non-finite,
    /// zero, or negative.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.gap_tol.is_finite() || self.gap_tol <= 0.0 {
            return Err("gap_tol must be finite and positive");
        }
        Ok(())
    }
}
