//! Outward search for a sign change starting from a pivot.

use crate::config::SearchOptions;
use crate::error::{AnycountError, Result};

/// Which way a bracket search walks away from its pivot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards larger arguments
    Up,
    /// Towards smaller arguments
    Down,
}

impl Direction {
    fn sign(self) -> f64 {
        match self {
            Direction::Up => 1.0,
            Direction::Down => -1.0,
        }
    }
}

/// Two points straddling the first sign change found by the search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    /// Last evaluated point where the function was still negative
    pub inside: f64,
    /// First evaluated point where the function became nonnegative
    pub outside: f64,
}

impl Bracket {
    /// The bracket as an ordered `(low, high)` pair.
    #[must_use]
    pub fn ordered(&self) -> (f64, f64) {
        if self.inside <= self.outside {
            (self.inside, self.outside)
        } else {
            (self.outside, self.inside)
        }
    }
}

/// Walks from `start` in `direction` until `f` turns nonnegative.
///
/// Evaluates `start ± step`, then keeps going, multiplying the step by
/// `options.bracket_growth` after every evaluation. A growth of 1.0 gives a plain
/// linear scan. `f` is fallible so that statistics with a restricted domain can
/// report the failure instead of producing NaN.
///
/// # Errors
/// - [`AnycountError::InvalidParameter`] if `step` is not finite and positive
/// - [`AnycountError::InvalidBracket`] if `f(start)` is not negative
/// - [`AnycountError::Domain`] if `f` returns NaN
/// - [`AnycountError::BracketSearchExhausted`] after `options.max_bracket_steps` steps
///
/// # Example
/// ```rust
/// use anycount::bracket::{Direction, find_outward_bracket};
/// use anycount::config::SearchOptions;
///
/// let bracket = find_outward_bracket(
///     |x| Ok(x * x - 50.0),
///     0.0,
///     1.0,
///     Direction::Up,
///     &SearchOptions::default(),
/// )
/// .unwrap();
/// assert!(bracket.inside < 50.0_f64.sqrt() && 50.0_f64.sqrt() <= bracket.outside);
/// ```
pub fn find_outward_bracket<F>(
    mut f: F,
    start: f64,
    step: f64,
    direction: Direction,
    options: &SearchOptions,
) -> Result<Bracket>
where
    F: FnMut(f64) -> Result<f64>,
{
    if !step.is_finite() || step <= 0.0 {
        return Err(AnycountError::invalid_parameter(
            "step",
            step,
            "must be finite and positive",
        ));
    }

    let f_start = f(start)?;
    if f_start.is_nan() {
        return Err(AnycountError::domain("bracket pivot", start, f_start));
    }
    if f_start >= 0.0 {
        return Err(AnycountError::invalid_bracket(start, start, f_start, f_start));
    }

    let sign = direction.sign();
    let mut inside = start;
    let mut step = step;

    for taken in 1..=options.max_bracket_steps {
        let candidate = inside + sign * step;
        let value = f(candidate)?;
        log::trace!("bracket step {taken}: f({candidate}) = {value}");

        if value.is_nan() {
            return Err(AnycountError::domain("bracket step", candidate, value));
        }
        if value >= 0.0 {
            log::debug!(
                "bracket from {start} ({direction:?}) closed after {taken} steps at {candidate}"
            );
            return Ok(Bracket {
                inside,
                outside: candidate,
            });
        }

        inside = candidate;
        step *= options.bracket_growth;
    }

    Err(AnycountError::bracket_exhausted(
        start,
        options.max_bracket_steps,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_scan() -> SearchOptions {
        SearchOptions {
            bracket_growth: 1.0,
            ..SearchOptions::default()
        }
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_linear_scan_returns_first_crossing() {
        let bracket =
            find_outward_bracket(|x| Ok(x - 3.5), 0.0, 1.0, Direction::Up, &linear_scan()).unwrap();
        assert_eq!(bracket.inside, 3.0);
        assert_eq!(bracket.outside, 4.0);
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_downward_search() {
        let bracket =
            find_outward_bracket(|x| Ok(-x - 2.5), 0.0, 1.0, Direction::Down, &linear_scan())
                .unwrap();
        assert_eq!(bracket.inside, -2.0);
        assert_eq!(bracket.outside, -3.0);
        assert_eq!(bracket.ordered(), (-3.0, -2.0));
    }

    #[test]
    fn test_geometric_growth_takes_fewer_steps() {
        let mut linear_calls = 0;
        find_outward_bracket(
            |x| {
                linear_calls += 1;
                Ok(x - 1000.0)
            },
            0.0,
            1.0,
            Direction::Up,
            &SearchOptions {
                max_bracket_steps: 2000,
                ..linear_scan()
            },
        )
        .unwrap();

        let mut doubling_calls = 0;
        let bracket = find_outward_bracket(
            |x| {
                doubling_calls += 1;
                Ok(x - 1000.0)
            },
            0.0,
            1.0,
            Direction::Up,
            &SearchOptions::default(),
        )
        .unwrap();

        assert!(bracket.inside < 1000.0 && bracket.outside >= 1000.0);
        assert!(doubling_calls < 15);
        assert!(linear_calls > 1000);
    }

    #[test]
    fn test_zero_step_is_rejected() {
        let result = find_outward_bracket(|x| Ok(x - 1.0), 0.0, 0.0, Direction::Up, &linear_scan());
        assert!(matches!(
            result,
            Err(AnycountError::InvalidParameter { parameter: "step", .. })
        ));
    }

    #[test]
    fn test_nonnegative_pivot_is_rejected() {
        let result = find_outward_bracket(|x| Ok(x + 1.0), 0.0, 1.0, Direction::Up, &linear_scan());
        assert!(matches!(result, Err(AnycountError::InvalidBracket { .. })));
    }

    #[test]
    fn test_search_exhaustion() {
        let options = SearchOptions {
            max_bracket_steps: 10,
            ..linear_scan()
        };
        let result = find_outward_bracket(|_| Ok(-1.0), 0.0, 1.0, Direction::Up, &options);
        assert_eq!(result, Err(AnycountError::bracket_exhausted(0.0, 10)));
    }

    #[test]
    fn test_nan_value_is_a_domain_error() {
        let result = find_outward_bracket(
            |x| Ok(if x > 2.0 { f64::NAN } else { -1.0 }),
            0.0,
            1.0,
            Direction::Up,
            &linear_scan(),
        );
        assert!(matches!(result, Err(AnycountError::Domain { .. })));
    }

    #[test]
    fn test_errors_from_function_propagate() {
        let result = find_outward_bracket(
            |x| {
                if x > 1.0 {
                    Err(AnycountError::domain("test", x, -1.0))
                } else {
                    Ok(-1.0)
                }
            },
            0.0,
            1.0,
            Direction::Up,
            &linear_scan(),
        );
        assert!(matches!(result, Err(AnycountError::Domain { .. })));
    }
}
