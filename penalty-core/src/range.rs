/// Tolerance applied when checking a solved coefficient against its range,
/// absorbing solver round-off at the interval endpoints.
const BOUND_TOL: f64 = 1e-9;

/// A closed interval bounding one model coefficient.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnergyRange {
    pub min: f64,
    pub max: f64,
}

impl EnergyRange {
    /// The conventional default range for linear coefficients.
    pub const LINEAR: Self = Self::new(-2.0, 2.0);

    /// The conventional default range for quadratic coefficients.
    pub const QUADRATIC: Self = Self::new(-1.0, 1.0);

    /// Creates a new range.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Validates that the endpoints are finite and ordered.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if either endpoint is non-finite
    /// or `min` exceeds `max`.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err("range endpoints must be finite");
        }
        if self.min > self.max {
            return Err("range min must not exceed max");
        }
        Ok(())
    }

    /// Returns whether the value lies in the range, up to solver round-off.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min - BOUND_TOL && value <= self.max + BOUND_TOL
    }

    /// Clamps the value into the range.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// The largest magnitude a coefficient in this range can take.
    #[must_use]
    pub fn max_abs(&self) -> f64 {
        self.min.abs().max(self.max.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn validates_endpoints() {
        assert!(EnergyRange::new(-1.0, 1.0).validate().is_ok());
        assert!(EnergyRange::new(0.5, 0.5).validate().is_ok());
        assert!(EnergyRange::new(1.0, -1.0).validate().is_err());
        assert!(EnergyRange::new(f64::NAN, 1.0).validate().is_err());
        assert!(EnergyRange::new(0.0, f64::INFINITY).validate().is_err());
    }

    #[test]
    fn contains_allows_round_off_at_endpoints() {
        let range = EnergyRange::new(-1.0, 1.0);
        assert!(range.contains(0.0));
        assert!(range.contains(1.0 + 1e-12));
        assert!(range.contains(-1.0 - 1e-12));
        assert!(!range.contains(1.1));
    }

    #[test]
    fn clamps_into_range() {
        let range = EnergyRange::new(1.0, 2.0);
        assert_relative_eq!(range.clamp(0.0), 1.0);
        assert_relative_eq!(range.clamp(3.0), 2.0);
        assert_relative_eq!(range.clamp(1.5), 1.5);
    }

    #[test]
    fn max_abs_uses_widest_endpoint() {
        assert_relative_eq!(EnergyRange::new(-2.0, 1.0).max_abs(), 2.0);
        assert_relative_eq!(EnergyRange::new(-0.5, 3.0).max_abs(), 3.0);
    }
}
