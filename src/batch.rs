//! Element-wise evaluation over slices of counts.
//!
//! With the `parallel` feature enabled the elements are spread over the rayon
//! thread pool. Every element is independent, so results are identical either
//! way. The first failing element aborts the batch with its error.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::Result;
use crate::sequence::{
    ConfidenceSequence, a_confidence_sequence, ab_confidence_sequence, b_confidence_sequence,
    confidence_sequence,
};
use crate::sequential::{AbStats, compute_stats, sequential_p_value};

#[cfg(feature = "parallel")]
fn map_elements<T, U, F>(items: &[T], f: F) -> Result<Vec<U>>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> Result<U> + Sync + Send,
{
    items.par_iter().map(f).collect()
}

#[cfg(not(feature = "parallel"))]
fn map_elements<T, U, F>(items: &[T], f: F) -> Result<Vec<U>>
where
    F: Fn(&T) -> Result<U>,
{
    items.iter().map(f).collect()
}

/// [`confidence_sequence`] for each count.
///
/// # Errors
/// The first error produced by any element.
///
/// # Example
/// ```rust
/// use anycount::batch::confidence_sequences;
///
/// let path = confidence_sequences(&[0.0, 3.0, 8.0], 1.0, 0.05).unwrap();
/// assert_eq!(path.len(), 3);
/// assert!(path[2].upper > path[1].upper);
/// ```
pub fn confidence_sequences(
    counts: &[f64],
    phi: f64,
    alpha: f64,
) -> Result<Vec<ConfidenceSequence>> {
    map_elements(counts, |&n| confidence_sequence(n, phi, alpha))
}

/// [`a_confidence_sequence`] for each `(n_a, n_b)` pair.
///
/// # Errors
/// The first error produced by any element.
pub fn a_confidence_sequences(
    counts: &[(f64, f64)],
    phi: f64,
    alpha: f64,
) -> Result<Vec<ConfidenceSequence>> {
    map_elements(counts, |&(n_a, n_b)| a_confidence_sequence(n_a, n_b, phi, alpha))
}

/// [`b_confidence_sequence`] for each `(n_a, n_b)` pair.
///
/// # Errors
/// The first error produced by any element.
pub fn b_confidence_sequences(
    counts: &[(f64, f64)],
    phi: f64,
    alpha: f64,
) -> Result<Vec<ConfidenceSequence>> {
    map_elements(counts, |&(n_a, n_b)| b_confidence_sequence(n_a, n_b, phi, alpha))
}

/// [`ab_confidence_sequence`] for each `(n_a, n_b)` pair.
///
/// # Errors
/// The first error produced by any element.
pub fn ab_confidence_sequences(
    counts: &[(f64, f64)],
    phi: f64,
    alpha: f64,
) -> Result<Vec<ConfidenceSequence>> {
    map_elements(counts, |&(n_a, n_b)| ab_confidence_sequence(n_a, n_b, phi, alpha))
}

/// [`sequential_p_value`] for each `(n_a, n_b)` pair.
///
/// # Errors
/// The first error produced by any element.
pub fn sequential_p_values(counts: &[(f64, f64)], phi: f64) -> Result<Vec<f64>> {
    map_elements(counts, |&(n_a, n_b)| sequential_p_value(n_a, n_b, phi))
}

/// [`compute_stats`] for each `(n_a, n_b)` pair.
///
/// # Errors
/// The first error produced by any element.
pub fn compute_stats_batch(counts: &[(f64, f64)], phi: f64, alpha: f64) -> Result<Vec<AbStats>> {
    map_elements(counts, |&(n_a, n_b)| compute_stats(n_a, n_b, phi, alpha))
}
