//! Bracketed root finding with Brent's method.

use crate::config::SearchOptions;
use crate::error::{AnycountError, Result};

/// Finds a zero of `f` inside `[low, high]` with Brent's method.
///
/// Combines inverse quadratic interpolation, the secant step and bisection,
/// falling back to bisection whenever the interpolated step would not shrink
/// the bracket fast enough. Converges once the bracket half-width drops below
/// `(xtol + rtol * |x|) / 2`.
///
/// # Errors
/// - [`AnycountError::InvalidBracket`] if `f(low)` and `f(high)` share a sign
/// - [`AnycountError::Domain`] if `f` returns NaN
/// - [`AnycountError::SolverExhausted`] after `options.max_solver_iterations`
///
/// # Example
/// ```rust
/// use anycount::config::SearchOptions;
/// use anycount::solver::brent;
///
/// let root = brent(|x| Ok(x * x - 2.0), 0.0, 2.0, &SearchOptions::default()).unwrap();
/// assert!((root - 2.0_f64.sqrt()).abs() < 1e-12);
/// ```
#[allow(clippy::float_cmp)]
pub fn brent<F>(mut f: F, low: f64, high: f64, options: &SearchOptions) -> Result<f64>
where
    F: FnMut(f64) -> Result<f64>,
{
    let mut xpre = low;
    let mut xcur = high;
    let mut fpre = f(xpre)?;
    let mut fcur = f(xcur)?;

    if fpre.is_nan() {
        return Err(AnycountError::domain("solver endpoint", xpre, fpre));
    }
    if fcur.is_nan() {
        return Err(AnycountError::domain("solver endpoint", xcur, fcur));
    }
    if fpre * fcur > 0.0 {
        return Err(AnycountError::invalid_bracket(low, high, fpre, fcur));
    }
    if fpre == 0.0 {
        return Ok(xpre);
    }
    if fcur == 0.0 {
        return Ok(xcur);
    }

    // xblk is the contrapoint: f(xblk) and f(xcur) always have opposite signs.
    let mut xblk = 0.0;
    let mut fblk = 0.0;
    let mut spre = 0.0;
    let mut scur = 0.0;

    for iteration in 1..=options.max_solver_iterations {
        if fpre != 0.0 && fcur != 0.0 && fpre.is_sign_negative() != fcur.is_sign_negative() {
            xblk = xpre;
            fblk = fpre;
            spre = xcur - xpre;
            scur = spre;
        }
        if fblk.abs() < fcur.abs() {
            xpre = xcur;
            xcur = xblk;
            xblk = xpre;

            fpre = fcur;
            fcur = fblk;
            fblk = fpre;
        }

        let delta = (options.xtol + options.rtol * xcur.abs()) / 2.0;
        let sbis = (xblk - xcur) / 2.0;
        if fcur == 0.0 || sbis.abs() < delta {
            log::trace!("brent converged to {xcur} after {iteration} iterations");
            return Ok(xcur);
        }

        if spre.abs() > delta && fcur.abs() < fpre.abs() {
            let stry = if xpre == xblk {
                // secant
                -fcur * (xcur - xpre) / (fcur - fpre)
            } else {
                // inverse quadratic
                let dpre = (fpre - fcur) / (xpre - xcur);
                let dblk = (fblk - fcur) / (xblk - xcur);
                -fcur * (fblk * dblk - fpre * dpre) / (dblk * dpre * (fblk - fpre))
            };

            if 2.0 * stry.abs() < spre.abs().min(3.0 * sbis.abs() - delta) {
                spre = scur;
                scur = stry;
            } else {
                spre = sbis;
                scur = sbis;
            }
        } else {
            spre = sbis;
            scur = sbis;
        }

        xpre = xcur;
        fpre = fcur;
        if scur.abs() > delta {
            xcur += scur;
        } else {
            xcur += if sbis > 0.0 { delta } else { -delta };
        }

        fcur = f(xcur)?;
        if fcur.is_nan() {
            return Err(AnycountError::domain("solver iterate", xcur, fcur));
        }
    }

    Err(AnycountError::solver_exhausted(
        low,
        high,
        options.max_solver_iterations,
    ))
}
