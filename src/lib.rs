//! # anycount
//!
//! Anytime-valid confidence sequences and sequential p-values for the rate of
//! one or two counting processes, built on the Gamma-Poisson conjugate model.
//!
//! ## Core Concept: Bounds That Survive Peeking
//!
//! A classical confidence interval is valid at one pre-chosen sample size. The
//! bounds here are valid at every observation time simultaneously, so they can
//! be recomputed after each new event and acted on whenever they become
//! informative:
//!
//! ```rust
//! use anycount::{compute_stats, confidence_sequence};
//!
//! // 10 events so far: bound the cumulative intensity Λ(t)
//! let cs = confidence_sequence(10.0, 1.0, 0.05).unwrap();
//! assert!(cs.lower < 10.0 && 10.0 < cs.upper);
//!
//! // Two streams: interval on Λ_B - Λ_A plus a sequential p-value
//! let stats = compute_stats(100.0, 10.0, 2.0, 0.05).unwrap();
//! if stats.p_value < 0.05 {
//!     println!("rates differ: Λ_B - Λ_A in [{}, {}]", stats.lower, stats.upper);
//! }
//! ```
//!
//! ## Features
//!
//! - **Single stream**: [`confidence_sequence`]
//! - **Two streams**: marginal bounds ([`a_confidence_sequence`],
//!   [`b_confidence_sequence`]) and the difference ([`ab_confidence_sequence`])
//! - **Sequential testing**: [`sequential_p_value`] and [`compute_stats`]
//! - **Batch evaluation**: [`batch`], parallel with the `parallel` feature
//! - **Numerics**: reusable [`bracket::find_outward_bracket`] and [`solver::brent`]

pub mod batch;
pub mod bracket;
pub mod config;
pub mod error;
pub mod kernel;
pub mod sequence;
pub mod sequential;
pub mod solver;

pub use config::{DEFAULT_ALPHA, SearchOptions};
pub use error::{AnycountError, Result};
pub use kernel::log_bayes_factor;
pub use sequence::{
    ConfidenceSequence, a_confidence_sequence, a_confidence_sequence_with_options,
    ab_confidence_sequence, ab_confidence_sequence_with_options, b_confidence_sequence,
    b_confidence_sequence_with_options, confidence_sequence, confidence_sequence_with_options,
};
pub use sequential::{
    AbStats, compute_stats, compute_stats_with_options, sequential_log_p_value,
    sequential_p_value,
};
