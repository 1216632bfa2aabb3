//! Error types for the anycount library.
//!
//! Every error is local to a single call and returned to the caller. Nothing is
//! recovered or clamped internally, since an approximate interval would no
//! longer carry the coverage guarantee.

use thiserror::Error;

/// The main error type for the anycount library.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnycountError {
    /// A precondition on a count, prior shape or significance level was violated.
    #[error("Invalid parameter '{parameter}': value {value} {constraint}")]
    InvalidParameter {
        /// The name of the parameter
        parameter: &'static str,
        /// The invalid value
        value: f64,
        /// A description of the constraint that was violated
        constraint: &'static str,
    },

    /// Error when a parameter is not finite (NaN or infinite).
    #[error("Non-finite parameter '{parameter}': {value}")]
    NonFiniteParameter {
        /// The name of the parameter
        parameter: &'static str,
        /// The non-finite value
        value: f64,
    },

    /// The interval handed to the root solver does not straddle a zero.
    #[error("Invalid bracket [{low}, {high}]: f(low) = {f_low}, f(high) = {f_high} do not change sign")]
    InvalidBracket {
        /// Lower end of the bracket
        low: f64,
        /// Upper end of the bracket
        high: f64,
        /// Function value at the lower end
        f_low: f64,
        /// Function value at the upper end
        f_high: f64,
    },

    /// A closed-form intermediate left its real domain.
    #[error("Domain error in {expression} at {at}: value {value}")]
    Domain {
        /// The expression that failed
        expression: &'static str,
        /// The argument it was evaluated at
        at: f64,
        /// The offending intermediate value
        value: f64,
    },

    /// Outward bracket search gave up before finding a sign change.
    #[error("Bracket search from {start} exhausted after {steps} steps without a sign change")]
    BracketSearchExhausted {
        /// The pivot the search started from
        start: f64,
        /// Number of steps taken
        steps: usize,
    },

    /// Root solver hit its iteration cap before converging.
    #[error("Root solver on [{low}, {high}] did not converge within {iterations} iterations")]
    SolverExhausted {
        /// Lower end of the bracket
        low: f64,
        /// Upper end of the bracket
        high: f64,
        /// Iterations performed
        iterations: usize,
    },
}

/// A specialized `Result` type for anycount operations.
pub type Result<T> = std::result::Result<T, AnycountError>;

impl AnycountError {
    /// Create an error for invalid parameter with constraint.
    ///
    /// # Example
    /// ```
    /// use anycount::error::AnycountError;
    ///
    /// let error = AnycountError::invalid_parameter("phi", -1.0, "must be positive");
    /// assert!(error.to_string().contains("phi"));
    /// ```
    pub fn invalid_parameter(
        parameter: &'static str,
        value: f64,
        constraint: &'static str,
    ) -> Self {
        Self::InvalidParameter {
            parameter,
            value,
            constraint,
        }
    }

    /// Create an error for non-finite parameter.
    ///
    /// # Example
    /// ```
    /// use anycount::error::AnycountError;
    ///
    /// let error = AnycountError::non_finite("alpha", f64::NAN);
    /// assert!(error.to_string().contains("alpha"));
    /// ```
    pub fn non_finite(parameter: &'static str, value: f64) -> Self {
        Self::NonFiniteParameter { parameter, value }
    }

    /// Create an error for a bracket whose endpoints share a sign.
    pub fn invalid_bracket(low: f64, high: f64, f_low: f64, f_high: f64) -> Self {
        Self::InvalidBracket {
            low,
            high,
            f_low,
            f_high,
        }
    }

    /// Create an error for an expression evaluated outside its domain.
    ///
    /// # Example
    /// ```
    /// use anycount::error::AnycountError;
    ///
    /// let error = AnycountError::domain("sqrt", 3.0, -0.5);
    /// assert!(error.to_string().contains("sqrt"));
    /// ```
    pub fn domain(expression: &'static str, at: f64, value: f64) -> Self {
        Self::Domain {
            expression,
            at,
            value,
        }
    }

    /// Create an error for an exhausted bracket search.
    pub fn bracket_exhausted(start: f64, steps: usize) -> Self {
        Self::BracketSearchExhausted { start, steps }
    }

    /// Create an error for a solver that ran out of iterations.
    pub fn solver_exhausted(low: f64, high: f64, iterations: usize) -> Self {
        Self::SolverExhausted {
            low,
            high,
            iterations,
        }
    }

    /// Whether this error reports a caller-supplied input that failed validation.
    #[must_use]
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(
            self,
            Self::InvalidParameter { .. } | Self::NonFiniteParameter { .. }
        )
    }
}
