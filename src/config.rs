//! Limits and tolerances for bracket search and root solving.

use crate::error::{AnycountError, Result};

/// Default significance level for every confidence sequence.
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Configuration for inverting a test statistic into interval bounds.
///
/// # Example
/// ```rust
/// use anycount::config::SearchOptions;
///
/// let options = SearchOptions {
///     bracket_growth: 1.0, // plain linear scan
///     ..SearchOptions::default()
/// };
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchOptions {
    /// Maximum number of steps an outward bracket search may make.
    pub max_bracket_steps: usize,
    /// Factor applied to the step after each step (1.0 keeps it constant).
    pub bracket_growth: f64,
    /// Absolute tolerance on the root.
    pub xtol: f64,
    /// Relative tolerance on the root.
    pub rtol: f64,
    /// Maximum number of Brent iterations.
    pub max_solver_iterations: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_bracket_steps: 200,
            bracket_growth: 2.0,
            xtol: 2e-12,
            rtol: 4.0 * f64::EPSILON,
            max_solver_iterations: 100,
        }
    }
}

impl SearchOptions {
    /// Validate the configured limits.
    ///
    /// # Errors
    /// Returns [`AnycountError::InvalidParameter`] for a zero step or iteration
    /// cap, a growth factor below 1, or a non-positive tolerance.
    pub fn validate(&self) -> Result<()> {
        if self.max_bracket_steps == 0 {
            return Err(AnycountError::invalid_parameter(
                "max_bracket_steps",
                0.0,
                "must be at least 1",
            ));
        }
        if !self.bracket_growth.is_finite() || self.bracket_growth < 1.0 {
            return Err(AnycountError::invalid_parameter(
                "bracket_growth",
                self.bracket_growth,
                "must be finite and >= 1",
            ));
        }
        if self.xtol.is_nan() || self.xtol <= 0.0 {
            return Err(AnycountError::invalid_parameter(
                "xtol",
                self.xtol,
                "must be positive",
            ));
        }
        if self.rtol.is_nan() || self.rtol <= 0.0 {
            return Err(AnycountError::invalid_parameter(
                "rtol",
                self.rtol,
                "must be positive",
            ));
        }
        if self.max_solver_iterations == 0 {
            return Err(AnycountError::invalid_parameter(
                "max_solver_iterations",
                0.0,
                "must be at least 1",
            ));
        }
        Ok(())
    }
}
