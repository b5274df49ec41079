//! Error types for the reckoning crate.

use thiserror::Error;

/// Broad class of a [`ReckonError`].
///
/// `Type` errors mean the input has the wrong shape (wrong representation,
/// malformed keys or weights, a scalar where a sequence was required).
/// `Value` errors mean the shapes are fine but do not fit together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input shape.
    Type,
    /// Shape-consistent but semantically mismatched input.
    Value,
}

/// Errors produced while validating inputs or reckoning expectation values.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReckonError {
    /// Frequencies input is not counts, a quasi-distribution, or an outcome map.
    #[error("Invalid frequencies: {0}")]
    InvalidFrequencies(String),

    /// Counts were required but something else was supplied.
    #[error("Expected counts, got {0}")]
    NotCounts(String),

    /// An outcome key could not be read as a non-negative integer.
    #[error("Invalid outcome key '{0}'")]
    InvalidOutcome(String),

    /// A weight is not a usable number for its representation.
    #[error("Invalid weight for outcome {outcome}: {reason}")]
    InvalidWeight {
        /// The outcome the weight belongs to.
        outcome: u64,
        /// Why the weight was rejected.
        reason: String,
    },

    /// Operator input is not an operator, a Pauli term, or a Pauli label.
    #[error("Invalid operator: {0}")]
    InvalidOperator(String),

    /// A Pauli label could not be parsed.
    #[error("Invalid Pauli label '{label}': {reason}")]
    InvalidPauliLabel {
        /// The offending label.
        label: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A sequence was required.
    #[error("Expected a sequence, got {0}")]
    ExpectedSequence(String),

    /// Frequencies and operators lists differ in length.
    #[error(
        "The number of frequencies entries ({frequencies}) does not match the number of operators ({operators})"
    )]
    LengthMismatch {
        /// Number of frequencies entries.
        frequencies: usize,
        /// Number of operators.
        operators: usize,
    },

    /// Operator terms act on different numbers of qubits.
    #[error("Operator terms must act on the same number of qubits: expected {expected}, got {got}")]
    QubitCountMismatch {
        /// Qubit count of the first term.
        expected: usize,
        /// Qubit count of the offending term.
        got: usize,
    },

    /// More qubits than an outcome can encode.
    #[error("Pauli acts on {0} qubits but outcomes hold at most 64 bits")]
    TooManyQubits(usize),
}

impl ReckonError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReckonError::InvalidFrequencies(_)
            | ReckonError::NotCounts(_)
            | ReckonError::InvalidOutcome(_)
            | ReckonError::InvalidWeight { .. }
            | ReckonError::InvalidOperator(_)
            | ReckonError::InvalidPauliLabel { .. }
            | ReckonError::ExpectedSequence(_) => ErrorKind::Type,
            ReckonError::LengthMismatch { .. }
            | ReckonError::QubitCountMismatch { .. }
            | ReckonError::TooManyQubits(_) => ErrorKind::Value,
        }
    }

    /// True for malformed-shape errors.
    pub fn is_type_error(&self) -> bool {
        self.kind() == ErrorKind::Type
    }

    /// True for mismatched-value errors.
    pub fn is_value_error(&self) -> bool {
        self.kind() == ErrorKind::Value
    }
}

/// Result type for reckoning operations.
pub type ReckonResult<T> = Result<T, ReckonError>;
