//! Closed-form statistics of the Gamma-Poisson sequential test.
//!
//! The one-sample primitive is [`log_bayes_factor`]. The two-sample functions
//! below are written out directly rather than assembled from repeated calls to
//! the primitive, so the shared `phi*ln(phi)` and log-gamma terms cancel once.

use crate::error::{AnycountError, Result};

/// Natural log of the gamma function.
#[inline]
#[must_use]
pub fn ln_gamma(x: f64) -> f64 {
    libm::lgamma(x)
}

/// Log Bayes factor of "the cumulative intensity equals `lambda`" against the
/// Gamma(`phi`) mixture, for `n` Poisson events.
///
/// `phi*ln(phi) - (phi+n)*ln(phi+lambda) + lnGamma(phi+n) - lnGamma(phi) + lambda`
///
/// The confidence sequence is the set of `lambda` where this stays below
/// `ln(1/alpha)`. No validation is done here; callers check inputs first.
///
/// # Example
/// ```rust
/// use anycount::kernel::log_bayes_factor;
///
/// assert_eq!(log_bayes_factor(0.0, 2.0, 0.0), 0.0);
/// ```
#[must_use]
pub fn log_bayes_factor(n: f64, phi: f64, lambda: f64) -> f64 {
    phi * phi.ln() - (phi + n) * (phi + lambda).ln() + ln_gamma(phi + n) - ln_gamma(phi)
        + lambda
}

/// Threshold for the marginal test on one stream, with the other stream's
/// intensity profiled out at its maximum-likelihood value `n_other`.
#[must_use]
pub fn marginal_threshold(n_own: f64, n_other: f64, phi: f64, alpha: f64) -> f64 {
    -alpha.ln() - 2.0 * phi * phi.ln() + (phi + n_other) * (phi + n_other).ln() - n_other
        + 2.0 * ln_gamma(phi)
        - ln_gamma(phi + n_own)
        - ln_gamma(phi + n_other)
}

/// The part of the joint statistic that depends on one stream's intensity.
#[inline]
#[must_use]
pub fn marginal_statistic(n_own: f64, phi: f64, lambda: f64) -> f64 {
    lambda - (phi + n_own) * (phi + lambda).ln()
}

/// Threshold for the joint test on both intensities.
#[must_use]
pub fn joint_threshold(n_a: f64, n_b: f64, phi: f64, alpha: f64) -> f64 {
    (1.0 / alpha).ln() - 2.0 * phi * phi.ln() + 2.0 * ln_gamma(phi)
        - ln_gamma(phi + n_a)
        - ln_gamma(phi + n_b)
}

/// Joint statistic in difference/sum coordinates, `w = Λ_B - Λ_A` and
/// `v = Λ_B + Λ_A`.
#[must_use]
pub fn joint_statistic(n_a: f64, n_b: f64, phi: f64, w: f64, v: f64) -> f64 {
    v - (phi + n_b) * (phi + 0.5 * (v + w)).ln() - (phi + n_a) * (phi + 0.5 * (v - w)).ln()
}

/// The sum `v` at which the joint statistic is stationary for a fixed
/// difference `w`.
///
/// # Errors
/// Returns [`AnycountError::Domain`] if the radicand is negative or NaN. For
/// valid counts and shape the radicand is a quadratic in `w` with negative
/// discriminant, so this only fires on a numerical defect upstream.
pub fn profile_sum(n_a: f64, n_b: f64, phi: f64, w: f64) -> Result<f64> {
    let radicand = 0.25 * n_a * n_a
        + 0.5 * n_a * n_b
        + n_a * phi
        + n_a * w
        + 0.25 * n_b * n_b
        + n_b * phi
        - n_b * w
        + phi * phi
        + w * w;

    if radicand.is_nan() || radicand < 0.0 {
        return Err(AnycountError::domain("profile_sum radicand", w, radicand));
    }

    Ok(0.5 * (n_a + n_b) - phi + radicand.sqrt())
}

/// Joint statistic minus threshold along the profile `v = profile_sum(w)`.
///
/// # Errors
/// Propagates [`AnycountError::Domain`] from [`profile_sum`].
pub fn joint_profile_root(n_a: f64, n_b: f64, phi: f64, threshold: f64, w: f64) -> Result<f64> {
    let v = profile_sum(n_a, n_b, phi, w)?;
    Ok(joint_statistic(n_a, n_b, phi, w, v) - threshold)
}
