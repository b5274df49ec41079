//! Expectation-value reckoning from measurement frequencies.
//!
//! Four levels build on each other:
//!
//! | Level | Entry point                          | Input                              |
//! |-------|--------------------------------------|------------------------------------|
//! | 0     | [`Reckoner::reckon_frequencies`]     | one (already masked) table         |
//! | 1     | [`Reckoner::reckon_pauli`]           | one table, one Pauli term          |
//! | 2     | [`Reckoner::reckon_operator`]        | one table, one weighted operator   |
//! | 3     | [`Reckoner::reckon`]                 | paired tables and operators        |
//!
//! The eigenvalue of outcome `o` under a diagonalized Pauli is `+1` for even
//! parity and `-1` for odd parity, so every level reduces to weighted parity
//! sums over bitmasked tables.
//!
//! Terms of one operator are combined as if statistically independent even
//! though they share a frequency table. Separate executions (Level 3) are
//! independent, so their variances add exactly.
//!
//! # Example
//!
//! ```rust
//! use qreckon::frequencies::Counts;
//! use qreckon::reckoning::Reckoner;
//!
//! let reckoner = Reckoner::default();
//! let counts = Counts::from([(0b00, 0), (0b01, 1), (0b10, 2), (0b11, 3)]);
//!
//! let result = reckoner.reckon_pauli(counts, "ZZ").unwrap();
//! assert!(result.expval().is_real());
//! assert!(result.expval().re().abs() < 1e-12);
//! ```

use std::fmt;

use num_complex::Complex64;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use crate::binary::parity_bit;
use crate::error::{ReckonError, ReckonResult};
use crate::frequencies::{
    FrequenciesLike, FrequencyTable, QuasiDistribution, counts_to_quasi_dist, weights_to_quasi_dist,
};
use crate::input::Batch;
use crate::operator::{OperatorLike, PauliLike, PauliOperator};
use crate::pauli::PauliTerm;

/// Default tolerance under which an imaginary part is dropped.
pub const DEFAULT_REAL_TOLERANCE: f64 = 100.0 * f64::EPSILON;

/// Default minimum number of pairs before Level 3 fans out.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// An expectation value, real unless a phase or coefficient leaves a
/// non-negligible imaginary part.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expval {
    /// Real-valued expectation.
    Real(f64),
    /// Complex-valued expectation.
    Complex(Complex64),
}

impl Expval {
    /// Drop the imaginary part when `|im| < tolerance`.
    pub fn from_complex(value: Complex64, tolerance: f64) -> Self {
        if value.im.abs() < tolerance {
            Expval::Real(value.re)
        } else {
            Expval::Complex(value)
        }
    }

    /// The value as a complex number.
    pub fn as_complex(&self) -> Complex64 {
        match *self {
            Expval::Real(re) => Complex64::new(re, 0.0),
            Expval::Complex(c) => c,
        }
    }

    /// Real part.
    pub fn re(&self) -> f64 {
        self.as_complex().re
    }

    /// Imaginary part (zero for the real variant).
    pub fn im(&self) -> f64 {
        self.as_complex().im
    }

    /// True for the real variant.
    pub fn is_real(&self) -> bool {
        matches!(self, Expval::Real(_))
    }

    /// The real value, if this is the real variant.
    pub fn as_real(&self) -> Option<f64> {
        match *self {
            Expval::Real(re) => Some(re),
            Expval::Complex(_) => None,
        }
    }
}

impl fmt::Display for Expval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Expval::Real(re) => write!(f, "{re}"),
            Expval::Complex(c) if c.im < 0.0 => write!(f, "{}-{}i", c.re, -c.im),
            Expval::Complex(c) => write!(f, "{}+{}i", c.re, c.im),
        }
    }
}

/// Expectation value and its standard error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReckoningResult {
    expval: Expval,
    std_error: f64,
}

impl ReckoningResult {
    /// Bundle an expectation value with its standard error.
    pub fn new(expval: Expval, std_error: f64) -> Self {
        Self { expval, std_error }
    }

    /// The expectation value.
    pub fn expval(&self) -> Expval {
        self.expval
    }

    /// The standard error, always `>= 0`.
    pub fn std_error(&self) -> f64 {
        self.std_error
    }

    /// Split into `(expval, std_error)`.
    pub fn into_parts(self) -> (Expval, f64) {
        (self.expval, self.std_error)
    }
}

impl fmt::Display for ReckoningResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ± {}", self.expval, self.std_error)
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Reckoner settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReckonerConfig {
    /// Absolute tolerance below which an imaginary part is dropped.
    pub real_tolerance: f64,
    /// Evaluate Level 3 pairs on the rayon pool.
    pub parallel: bool,
    /// Minimum number of pairs before `parallel` takes effect.
    pub parallel_threshold: usize,
}

impl Default for ReckonerConfig {
    fn default() -> Self {
        Self {
            real_tolerance: DEFAULT_REAL_TOLERANCE,
            parallel: true,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Normalize one frequencies input into a quasi-distribution.
///
/// Plain maps are normalized by their total weight, the way counts are
/// normalized by their shots.
pub fn validate_frequencies(frequencies: FrequenciesLike) -> ReckonResult<QuasiDistribution> {
    match frequencies {
        FrequenciesLike::Counts(counts) => Ok(counts_to_quasi_dist(&counts)),
        FrequenciesLike::QuasiDist(quasi) => Ok(quasi),
        FrequenciesLike::Map(map) => Ok(weights_to_quasi_dist(&map)),
    }
}

/// Normalize a batch of frequencies inputs.
pub fn validate_frequencies_list(
    frequencies: Batch<FrequenciesLike>,
) -> ReckonResult<Vec<QuasiDistribution>> {
    frequencies
        .into_vec()
        .into_iter()
        .map(validate_frequencies)
        .collect()
}

/// Normalize one operator input.
pub fn validate_operator(operator: OperatorLike) -> ReckonResult<PauliOperator> {
    operator.into_operator()
}

/// Normalize a batch of operator inputs.
pub fn validate_operator_list(operators: Batch<OperatorLike>) -> ReckonResult<Vec<PauliOperator>> {
    operators
        .into_vec()
        .into_iter()
        .map(validate_operator)
        .collect()
}

/// Normalize a single Pauli input.
pub fn validate_pauli(pauli: PauliLike) -> ReckonResult<PauliTerm> {
    pauli.into_term()
}

/// Check that paired lists have equal lengths.
pub fn cross_validate_lists<A, B>(frequencies: &[A], operators: &[B]) -> ReckonResult<()> {
    if frequencies.len() != operators.len() {
        return Err(ReckonError::LengthMismatch {
            frequencies: frequencies.len(),
            operators: operators.len(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Estimation on canonical types
// ---------------------------------------------------------------------------

/// Running sum of expectation values and variances.
#[derive(Debug, Clone, Copy, Default)]
struct Estimate {
    expval: Complex64,
    variance: f64,
}

impl Estimate {
    fn merge(self, other: Self) -> Self {
        Self {
            expval: self.expval + other.expval,
            variance: self.variance + other.variance,
        }
    }

    fn std_error(&self) -> f64 {
        self.variance.max(0.0).sqrt()
    }
}

fn frequencies_estimate(quasi: &QuasiDistribution) -> (f64, f64) {
    if quasi.is_empty() || quasi.shots() == Some(0) {
        return (0.0, 1.0);
    }
    let expval: f64 = quasi
        .iter()
        .map(|(outcome, weight)| {
            if parity_bit(outcome, true) == 0 {
                weight
            } else {
                -weight
            }
        })
        .sum();
    let variance = (1.0 - expval * expval).max(0.0);
    let scale = match (quasi.shots(), quasi.stddev_upper_bound()) {
        (Some(shots), _) if shots > 0 => 1.0 / (shots as f64).sqrt(),
        (_, Some(bound)) => bound,
        _ => 1.0,
    };
    (expval, variance.sqrt() * scale)
}

fn pauli_estimate(quasi: &QuasiDistribution, pauli: &PauliTerm) -> (Complex64, f64) {
    let masked = quasi.bitmask(pauli.integer_mask());
    let (expval, std_error) = frequencies_estimate(&masked);
    trace!(pauli = %pauli, expval, std_error, "pauli estimate");
    (pauli.phase_coefficient() * expval, std_error)
}

fn operator_estimate(quasi: &QuasiDistribution, operator: &PauliOperator) -> Estimate {
    operator
        .iter()
        .map(|(pauli, coeff)| {
            let (expval, std_error) = pauli_estimate(quasi, pauli);
            Estimate {
                expval: coeff * expval,
                variance: std_error * std_error * coeff.norm_sqr(),
            }
        })
        .fold(Estimate::default(), Estimate::merge)
}

// ---------------------------------------------------------------------------
// Reckoner
// ---------------------------------------------------------------------------

/// Computes expectation values and standard errors from frequencies.
#[derive(Debug, Clone, Default)]
pub struct Reckoner {
    config: ReckonerConfig,
}

impl Reckoner {
    /// Create a reckoner with explicit settings.
    pub fn new(config: ReckonerConfig) -> Self {
        Self { config }
    }

    /// Current settings.
    pub fn config(&self) -> &ReckonerConfig {
        &self.config
    }

    /// Level 3: sum over paired `(frequencies_i, operator_i)` executions.
    ///
    /// Either argument may be a single item or a sequence; a single item is
    /// treated as a sequence of length one. The lengths must match.
    #[instrument(skip_all)]
    pub fn reckon(
        &self,
        frequencies: impl Into<Batch<FrequenciesLike>>,
        operators: impl Into<Batch<OperatorLike>>,
    ) -> ReckonResult<ReckoningResult> {
        let frequencies = validate_frequencies_list(frequencies.into())?;
        let operators = validate_operator_list(operators.into())?;
        cross_validate_lists(&frequencies, &operators)?;

        let parallel =
            self.config.parallel && frequencies.len() >= self.config.parallel_threshold.max(1);
        debug!(pairs = frequencies.len(), parallel, "reckoning batch");

        let estimate = if parallel {
            frequencies
                .par_iter()
                .zip(operators.par_iter())
                .map(|(quasi, operator)| operator_estimate(quasi, operator))
                .reduce(Estimate::default, Estimate::merge)
        } else {
            frequencies
                .iter()
                .zip(&operators)
                .map(|(quasi, operator)| operator_estimate(quasi, operator))
                .fold(Estimate::default(), Estimate::merge)
        };
        Ok(self.finish(estimate))
    }

    /// Level 2: weighted sum of Pauli estimates from one table.
    pub fn reckon_operator(
        &self,
        frequencies: impl Into<FrequenciesLike>,
        operator: impl Into<OperatorLike>,
    ) -> ReckonResult<ReckoningResult> {
        let quasi = validate_frequencies(frequencies.into())?;
        let operator = validate_operator(operator.into())?;
        debug!(terms = operator.num_terms(), "reckoning operator");
        Ok(self.finish(operator_estimate(&quasi, &operator)))
    }

    /// Level 1: one Pauli term, phase included.
    pub fn reckon_pauli(
        &self,
        frequencies: impl Into<FrequenciesLike>,
        pauli: impl Into<PauliLike>,
    ) -> ReckonResult<ReckoningResult> {
        let quasi = validate_frequencies(frequencies.into())?;
        let pauli = validate_pauli(pauli.into())?;
        let (expval, std_error) = pauli_estimate(&quasi, &pauli);
        Ok(ReckoningResult::new(
            Expval::from_complex(expval, self.config.real_tolerance),
            std_error,
        ))
    }

    /// Level 0: parity expectation of an already masked table.
    ///
    /// Empty or zero-shot input yields `(0, 1)`.
    pub fn reckon_frequencies(
        &self,
        frequencies: impl Into<FrequenciesLike>,
    ) -> ReckonResult<ReckoningResult> {
        let quasi = validate_frequencies(frequencies.into())?;
        let (expval, std_error) = frequencies_estimate(&quasi);
        Ok(ReckoningResult::new(Expval::Real(expval), std_error))
    }

    fn finish(&self, estimate: Estimate) -> ReckoningResult {
        ReckoningResult::new(
            Expval::from_complex(estimate.expval, self.config.real_tolerance),
            estimate.std_error(),
        )
    }
}
