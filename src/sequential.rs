//! Anytime-valid p-value for "both streams share one intensity".
//!
//! The p-value is the reciprocal of a test martingale, so it stays valid under
//! optional stopping: it may be checked after every event and acted on as soon
//! as it drops below the chosen level. It is not a fixed-sample p-value.

use crate::config::SearchOptions;
use crate::error::Result;
use crate::kernel::log_bayes_factor;
use crate::sequence::{
    ConfidenceSequence, ab_confidence_sequence_with_options, check_alpha, check_count, check_shape,
};

/// Joint interval on `Λ_B - Λ_A` together with the sequential p-value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbStats {
    /// Lower bound on `Λ_B - Λ_A`
    pub lower: f64,
    /// Upper bound on `Λ_B - Λ_A`
    pub upper: f64,
    /// Sequential p-value for equal intensities
    pub p_value: f64,
}

impl AbStats {
    /// The interval part of the record.
    #[must_use]
    pub fn confidence_sequence(&self) -> ConfidenceSequence {
        ConfidenceSequence {
            lower: self.lower,
            upper: self.upper,
        }
    }
}

/// Natural log of the sequential p-value for equal intensities.
///
/// Under the null both intensities equal `(n_a + n_b) / 2`; the statistic is
/// minus the sum of both streams' log Bayes factors at that value, capped at
/// zero.
///
/// # Errors
/// [`crate::AnycountError::InvalidParameter`] for a negative count or
/// non-positive `phi`.
pub fn sequential_log_p_value(n_a: f64, n_b: f64, phi: f64) -> Result<f64> {
    check_count("n_a", n_a)?;
    check_count("n_b", n_b)?;
    check_shape(phi)?;

    let shared = 0.5 * (n_a + n_b);
    let log_p = -log_bayes_factor(n_a, phi, shared) - log_bayes_factor(n_b, phi, shared);

    Ok(log_p.min(0.0))
}

/// Sequential p-value for equal intensities, in (0, 1].
///
/// # Errors
/// See [`sequential_log_p_value`].
///
/// # Example
/// ```rust
/// use anycount::sequential_p_value;
///
/// let similar = sequential_p_value(50.0, 50.0, 2.0).unwrap();
/// let different = sequential_p_value(100.0, 10.0, 2.0).unwrap();
/// assert!(similar > 0.99);
/// assert!(different < 1e-6);
/// ```
pub fn sequential_p_value(n_a: f64, n_b: f64, phi: f64) -> Result<f64> {
    Ok(sequential_log_p_value(n_a, n_b, phi)?.exp())
}

/// Joint confidence sequence plus sequential p-value.
///
/// # Errors
/// Any error from [`crate::ab_confidence_sequence`] or [`sequential_p_value`].
pub fn compute_stats(n_a: f64, n_b: f64, phi: f64, alpha: f64) -> Result<AbStats> {
    compute_stats_with_options(n_a, n_b, phi, alpha, &SearchOptions::default())
}

/// [`compute_stats`] with explicit search limits.
///
/// # Errors
/// See [`compute_stats`].
pub fn compute_stats_with_options(
    n_a: f64,
    n_b: f64,
    phi: f64,
    alpha: f64,
    options: &SearchOptions,
) -> Result<AbStats> {
    check_alpha(alpha)?;
    let interval = ab_confidence_sequence_with_options(n_a, n_b, phi, alpha, options)?;
    let p_value = sequential_p_value(n_a, n_b, phi)?;

    log::debug!(
        "n_a={n_a} n_b={n_b} phi={phi}: [{}, {}] p={p_value}",
        interval.lower,
        interval.upper
    );

    Ok(AbStats {
        lower: interval.lower,
        upper: interval.upper,
        p_value,
    })
}
