//! Confidence sequences for one stream, each marginal of two streams, and the
//! difference of two streams.
//!
//! Every procedure follows the same pattern: write the test as
//! `root(x) = statistic(x) - threshold`, which is negative exactly on the
//! values the test does not reject, then bracket and solve for the crossings on
//! each side of a pivot where `root` is known to be negative.
//!
//! The bounds hold simultaneously over all observation times, so they can be
//! recomputed after every new event without inflating the error rate.

use crate::bracket::{Direction, find_outward_bracket};
use crate::config::SearchOptions;
use crate::error::{AnycountError, Result};
use crate::kernel::{
    joint_profile_root, joint_threshold, log_bayes_factor, marginal_statistic,
    marginal_threshold,
};
use crate::solver::brent;

/// Smallest step used when walking away from a pivot; a zero count would
/// otherwise give a zero step.
const MIN_STEP: f64 = 1.0;

/// A `(lower, upper)` pair bounding a cumulative intensity, or a difference of
/// two intensities.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConfidenceSequence {
    /// Lower bound
    pub lower: f64,
    /// Upper bound
    pub upper: f64,
}

impl ConfidenceSequence {
    /// Width of the interval.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Whether `value` lies inside the closed interval.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }

    /// Whether zero has been ruled out. For a difference this is a detected
    /// rate change.
    #[must_use]
    pub fn excludes_zero(&self) -> bool {
        !self.contains(0.0)
    }
}

impl From<ConfidenceSequence> for (f64, f64) {
    fn from(sequence: ConfidenceSequence) -> Self {
        (sequence.lower, sequence.upper)
    }
}

/// Confidence sequence for the cumulative intensity of a single stream.
///
/// # Arguments
/// * `n` - Events observed so far
/// * `phi` - Shape of the Gamma mixing prior
/// * `alpha` - Significance level (see [`crate::config::DEFAULT_ALPHA`])
///
/// # Errors
/// [`crate::AnycountError::InvalidParameter`] for `n < 0`, `phi <= 0` or `alpha`
/// outside (0, 1); search and solver errors otherwise.
///
/// # Example
/// ```rust
/// use anycount::confidence_sequence;
///
/// let cs = confidence_sequence(10.0, 1.0, 0.05).unwrap();
/// assert!(cs.lower < 10.0 && 10.0 < cs.upper);
/// ```
pub fn confidence_sequence(n: f64, phi: f64, alpha: f64) -> Result<ConfidenceSequence> {
    confidence_sequence_with_options(n, phi, alpha, &SearchOptions::default())
}

/// [`confidence_sequence`] with explicit search limits.
///
/// # Errors
/// See [`confidence_sequence`]; invalid `options` are also rejected.
pub fn confidence_sequence_with_options(
    n: f64,
    phi: f64,
    alpha: f64,
    options: &SearchOptions,
) -> Result<ConfidenceSequence> {
    check_count("n", n)?;
    check_shape(phi)?;
    check_alpha(alpha)?;
    options.validate()?;

    let log_alpha = alpha.ln();
    let root =
        |lambda: f64| -> Result<f64> { Ok(log_bayes_factor(n, phi, lambda) + log_alpha) };

    nonnegative_bounds(root, n, options)
}

/// Confidence sequence for stream A's intensity, with stream B's intensity
/// treated as a nuisance parameter.
///
/// # Errors
/// See [`confidence_sequence`].
pub fn a_confidence_sequence(
    n_a: f64,
    n_b: f64,
    phi: f64,
    alpha: f64,
) -> Result<ConfidenceSequence> {
    a_confidence_sequence_with_options(n_a, n_b, phi, alpha, &SearchOptions::default())
}

/// [`a_confidence_sequence`] with explicit search limits.
///
/// # Errors
/// See [`confidence_sequence`].
pub fn a_confidence_sequence_with_options(
    n_a: f64,
    n_b: f64,
    phi: f64,
    alpha: f64,
    options: &SearchOptions,
) -> Result<ConfidenceSequence> {
    check_two_sample(n_a, n_b, phi, alpha, options)?;
    marginal_bounds(n_a, n_b, phi, alpha, options)
}

/// Confidence sequence for stream B's intensity, with stream A's intensity
/// treated as a nuisance parameter.
///
/// # Errors
/// See [`confidence_sequence`].
pub fn b_confidence_sequence(
    n_a: f64,
    n_b: f64,
    phi: f64,
    alpha: f64,
) -> Result<ConfidenceSequence> {
    b_confidence_sequence_with_options(n_a, n_b, phi, alpha, &SearchOptions::default())
}

/// [`b_confidence_sequence`] with explicit search limits.
///
/// # Errors
/// See [`confidence_sequence`].
pub fn b_confidence_sequence_with_options(
    n_a: f64,
    n_b: f64,
    phi: f64,
    alpha: f64,
    options: &SearchOptions,
) -> Result<ConfidenceSequence> {
    check_two_sample(n_a, n_b, phi, alpha, options)?;
    marginal_bounds(n_b, n_a, phi, alpha, options)
}

/// Confidence sequence for the difference `Λ_B - Λ_A` of two streams.
///
/// For each candidate difference `w` the sum `Λ_A + Λ_B` is profiled out in
/// closed form, leaving a one-dimensional test that is bracketed both above and
/// below the pivot `n_b - n_a`.
///
/// # Errors
/// See [`confidence_sequence`]. [`crate::AnycountError::Domain`] if the profile
/// ever leaves the reals.
///
/// # Example
/// ```rust
/// use anycount::ab_confidence_sequence;
///
/// let cs = ab_confidence_sequence(100.0, 10.0, 2.0, 0.05).unwrap();
/// assert!(cs.excludes_zero());
/// assert!(cs.upper < 0.0);
/// ```
pub fn ab_confidence_sequence(
    n_a: f64,
    n_b: f64,
    phi: f64,
    alpha: f64,
) -> Result<ConfidenceSequence> {
    ab_confidence_sequence_with_options(n_a, n_b, phi, alpha, &SearchOptions::default())
}

/// [`ab_confidence_sequence`] with explicit search limits.
///
/// # Errors
/// See [`ab_confidence_sequence`].
pub fn ab_confidence_sequence_with_options(
    n_a: f64,
    n_b: f64,
    phi: f64,
    alpha: f64,
    options: &SearchOptions,
) -> Result<ConfidenceSequence> {
    check_two_sample(n_a, n_b, phi, alpha, options)?;

    let threshold = joint_threshold(n_a, n_b, phi, alpha);
    let root = |w: f64| joint_profile_root(n_a, n_b, phi, threshold, w);

    let pivot = n_b - n_a;
    let step = (n_b - n_a).abs().max(MIN_STEP);

    let above = find_outward_bracket(&root, pivot, step, Direction::Up, options)?;
    let below = find_outward_bracket(&root, pivot, step, Direction::Down, options)?;

    let (low, high) = above.ordered();
    let upper = brent(&root, low, high, options)?;
    let (low, high) = below.ordered();
    let lower = brent(&root, low, high, options)?;

    Ok(ConfidenceSequence { lower, upper })
}

fn check_two_sample(
    n_a: f64,
    n_b: f64,
    phi: f64,
    alpha: f64,
    options: &SearchOptions,
) -> Result<()> {
    check_count("n_a", n_a)?;
    check_count("n_b", n_b)?;
    check_shape(phi)?;
    check_alpha(alpha)?;
    options.validate()
}

fn marginal_bounds(
    n_own: f64,
    n_other: f64,
    phi: f64,
    alpha: f64,
    options: &SearchOptions,
) -> Result<ConfidenceSequence> {
    let threshold = marginal_threshold(n_own, n_other, phi, alpha);
    let root =
        |lambda: f64| -> Result<f64> { Ok(marginal_statistic(n_own, phi, lambda) - threshold) };

    nonnegative_bounds(root, n_own, options)
}

pub(crate) fn check_count(parameter: &'static str, n: f64) -> Result<()> {
    if !n.is_finite() {
        return Err(AnycountError::non_finite(parameter, n));
    }
    if n < 0.0 {
        return Err(AnycountError::invalid_parameter(
            parameter,
            n,
            "must be nonnegative",
        ));
    }
    Ok(())
}

pub(crate) fn check_shape(phi: f64) -> Result<()> {
    if !phi.is_finite() {
        return Err(AnycountError::non_finite("phi", phi));
    }
    if phi <= 0.0 {
        return Err(AnycountError::invalid_parameter(
            "phi",
            phi,
            "must be positive",
        ));
    }
    Ok(())
}

pub(crate) fn check_alpha(alpha: f64) -> Result<()> {
    if !alpha.is_finite() {
        return Err(AnycountError::non_finite("alpha", alpha));
    }
    if alpha <= 0.0 || alpha >= 1.0 {
        return Err(AnycountError::invalid_parameter(
            "alpha",
            alpha,
            "must be in (0, 1)",
        ));
    }
    Ok(())
}

/// Bounds for a nonnegative intensity whose test is minimised at `pivot`.
fn nonnegative_bounds<F>(
    mut root: F,
    pivot: f64,
    options: &SearchOptions,
) -> Result<ConfidenceSequence>
where
    F: FnMut(f64) -> Result<f64>,
{
    let step = pivot.max(MIN_STEP);
    let above = find_outward_bracket(&mut root, pivot, step, Direction::Up, options)?;
    let (low, high) = above.ordered();
    let upper = brent(&mut root, low, high, options)?;

    // Zero is not rejected, so the interval reaches down to it.
    let lower = if root(0.0)? < 0.0 {
        0.0
    } else {
        brent(&mut root, 0.0, pivot, options)?
    };

    Ok(ConfidenceSequence { lower, upper })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_zero_count_has_zero_lower_bound() {
        for phi in [0.5, 1.0, 10.0] {
            let cs = confidence_sequence(0.0, phi, 0.05).unwrap();
            assert_eq!(cs.lower, 0.0);
            assert!(cs.upper > 0.0 && cs.upper.is_finite());
        }
    }

    #[test]
    fn test_single_stream_round_trip() {
        let (n, phi, alpha) = (25.0, 3.0, 0.01_f64);
        let cs = confidence_sequence(n, phi, alpha).unwrap();
        let at_upper = log_bayes_factor(n, phi, cs.upper) + alpha.ln();
        let at_lower = log_bayes_factor(n, phi, cs.lower) + alpha.ln();
        assert!(at_upper.abs() < 1e-9, "root at upper = {at_upper}");
        assert!(at_lower.abs() < 1e-9, "root at lower = {at_lower}");
    }

    #[test]
    fn test_linear_and_geometric_search_agree() {
        let linear = SearchOptions {
            bracket_growth: 1.0,
            ..SearchOptions::default()
        };
        let a = confidence_sequence_with_options(40.0, 2.0, 0.05, &linear).unwrap();
        let b = confidence_sequence(40.0, 2.0, 0.05).unwrap();
        assert!((a.lower - b.lower).abs() < 1e-9);
        assert!((a.upper - b.upper).abs() < 1e-9);
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_marginal_zero_count() {
        let cs = a_confidence_sequence(0.0, 12.0, 1.0, 0.05).unwrap();
        assert_eq!(cs.lower, 0.0);
        assert!(cs.upper > 0.0);
    }

    #[test]
    fn test_marginal_is_wider_than_single_stream() {
        // The marginal spends part of the error budget on the nuisance stream.
        let single = confidence_sequence(30.0, 2.0, 0.05).unwrap();
        let marginal = a_confidence_sequence(30.0, 30.0, 2.0, 0.05).unwrap();
        assert!(marginal.lower <= single.lower);
        assert!(marginal.upper >= single.upper);
    }

    #[test]
    fn test_difference_contains_pivot() {
        let cs = ab_confidence_sequence(20.0, 35.0, 1.0, 0.05).unwrap();
        assert!(cs.contains(15.0));
        assert!(cs.lower < cs.upper);
    }

    #[test]
    fn test_difference_bounds_solve_both_sides() {
        let (n_a, n_b, phi, alpha) = (20.0, 35.0, 1.0, 0.05);
        let threshold = joint_threshold(n_a, n_b, phi, alpha);
        let linear = SearchOptions {
            bracket_growth: 1.0,
            ..SearchOptions::default()
        };
        let geometric = ab_confidence_sequence(n_a, n_b, phi, alpha).unwrap();
        let scanned = ab_confidence_sequence_with_options(n_a, n_b, phi, alpha, &linear).unwrap();

        for cs in [geometric, scanned] {
            let at_lower = joint_profile_root(n_a, n_b, phi, threshold, cs.lower).unwrap();
            let at_upper = joint_profile_root(n_a, n_b, phi, threshold, cs.upper).unwrap();
            assert!(at_lower.abs() < 1e-9, "root at lower = {at_lower}");
            assert!(at_upper.abs() < 1e-9, "root at upper = {at_upper}");
        }
        assert!((geometric.lower - scanned.lower).abs() < 1e-9);
        assert!((geometric.upper - scanned.upper).abs() < 1e-9);
    }

    #[test]
    fn test_tiny_search_budget_is_reported() {
        let options = SearchOptions {
            max_bracket_steps: 1,
            bracket_growth: 1.0,
            ..SearchOptions::default()
        };
        let result = ab_confidence_sequence_with_options(0.0, 0.0, 50.0, 0.001, &options);
        assert!(matches!(
            result,
            Err(AnycountError::BracketSearchExhausted { .. })
        ));
    }

    #[test]
    fn test_invalid_options_rejected() {
        let options = SearchOptions {
            max_solver_iterations: 0,
            ..SearchOptions::default()
        };
        let result = confidence_sequence_with_options(3.0, 1.0, 0.05, &options);
        assert!(result.unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn test_tuple_conversion() {
        let cs = ConfidenceSequence {
            lower: 1.0,
            upper: 4.0,
        };
        let (lower, upper): (f64, f64) = cs.into();
        assert!((lower - 1.0).abs() < f64::EPSILON);
        assert!((upper - 4.0).abs() < f64::EPSILON);
        assert!((cs.width() - 3.0).abs() < f64::EPSILON);
        assert!(cs.excludes_zero());
    }

    #[test]
    fn test_parameter_checks() {
        assert!(check_count("n", 0.0).is_ok());
        assert!(check_count("n", -1.0).unwrap_err().is_invalid_parameter());
        assert!(check_count("n", f64::INFINITY).unwrap_err().is_invalid_parameter());
        assert!(check_shape(0.0).is_err());
        assert!(check_shape(-2.0).is_err());
        assert!(check_alpha(0.0).is_err());
        assert!(check_alpha(1.0).is_err());
        assert!(check_alpha(0.05).is_ok());
    }
}
