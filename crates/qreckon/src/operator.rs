//! Weighted sums of Pauli terms.
//!
//! A [`PauliOperator`] is an ordered list of `(PauliTerm, coefficient)`
//! pairs with complex coefficients:
//!
//!   O = Σ_k  c_k · P_k
//!
//! All terms act on the same number of qubits. Converting a lone
//! [`PauliTerm`] into an operator moves its phase into the coefficient.
//!
//! # Example
//!
//! ```rust
//! use num_complex::Complex64;
//! use qreckon::operator::PauliOperator;
//!
//! let op = PauliOperator::from_list([
//!     ("ZZ", Complex64::new(-1.0, 0.0)),
//!     ("XI", Complex64::new(0.5, 0.0)),
//! ])
//! .unwrap();
//! assert_eq!(op.num_terms(), 2);
//! assert_eq!(op.num_qubits(), Some(2));
//! ```

use std::ops::Mul;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{ReckonError, ReckonResult};
use crate::pauli::PauliTerm;

/// A single weighted term: `coeff · pauli`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorTerm {
    /// The Pauli term.
    pub pauli: PauliTerm,
    /// Complex coefficient.
    pub coeff: Complex64,
}

/// A weighted sum of Pauli terms acting on a common set of qubits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<OperatorTerm>", into = "Vec<OperatorTerm>")]
pub struct PauliOperator {
    terms: Vec<OperatorTerm>,
}

impl PauliOperator {
    /// Create from `(term, coefficient)` pairs.
    ///
    /// Fails if the terms act on different numbers of qubits.
    pub fn new(terms: impl IntoIterator<Item = (PauliTerm, Complex64)>) -> ReckonResult<Self> {
        let terms: Vec<OperatorTerm> = terms
            .into_iter()
            .map(|(pauli, coeff)| OperatorTerm { pauli, coeff })
            .collect();
        Self::from_terms(terms)
    }

    fn from_terms(terms: Vec<OperatorTerm>) -> ReckonResult<Self> {
        if let Some(first) = terms.first() {
            let expected = first.pauli.num_qubits();
            if let Some(bad) = terms.iter().find(|t| t.pauli.num_qubits() != expected) {
                return Err(ReckonError::QubitCountMismatch {
                    expected,
                    got: bad.pauli.num_qubits(),
                });
            }
        }
        Ok(Self { terms })
    }

    /// Create from `(label, coefficient)` pairs.
    pub fn from_list<S: AsRef<str>>(
        list: impl IntoIterator<Item = (S, Complex64)>,
    ) -> ReckonResult<Self> {
        let terms = list
            .into_iter()
            .map(|(label, coeff)| Ok((PauliTerm::from_label(label.as_ref())?, coeff)))
            .collect::<ReckonResult<Vec<_>>>()?;
        Self::new(terms)
    }

    /// Create with every coefficient equal to one.
    pub fn from_paulis(paulis: impl IntoIterator<Item = PauliTerm>) -> ReckonResult<Self> {
        Self::new(paulis.into_iter().map(|p| (p, Complex64::new(1.0, 0.0))))
    }

    /// Parse a single Pauli label into a one-term operator.
    pub fn from_label(label: &str) -> ReckonResult<Self> {
        Ok(Self::from(PauliTerm::from_label(label)?))
    }

    /// All terms.
    pub fn terms(&self) -> &[OperatorTerm] {
        &self.terms
    }

    /// Iterate `(pauli, coeff)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&PauliTerm, Complex64)> + '_ {
        self.terms.iter().map(|t| (&t.pauli, t.coeff))
    }

    /// Number of terms.
    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// Number of qubits, or `None` for an operator without terms.
    pub fn num_qubits(&self) -> Option<usize> {
        self.terms.first().map(|t| t.pauli.num_qubits())
    }

    /// Multiply every coefficient by `factor`.
    #[must_use]
    pub fn scale(&self, factor: Complex64) -> Self {
        Self {
            terms: self
                .terms
                .iter()
                .map(|t| OperatorTerm {
                    pauli: t.pauli.clone(),
                    coeff: t.coeff * factor,
                })
                .collect(),
        }
    }

    /// Sum of coefficient magnitudes, Σ |c_k|.
    pub fn one_norm(&self) -> f64 {
        self.terms.iter().map(|t| t.coeff.norm()).sum()
    }
}

impl From<PauliTerm> for PauliOperator {
    fn from(pauli: PauliTerm) -> Self {
        let coeff = pauli.phase_coefficient();
        Self {
            terms: vec![OperatorTerm {
                pauli: pauli.with_phase(0),
                coeff,
            }],
        }
    }
}

impl TryFrom<Vec<OperatorTerm>> for PauliOperator {
    type Error = ReckonError;

    fn try_from(terms: Vec<OperatorTerm>) -> Result<Self, Self::Error> {
        Self::from_terms(terms)
    }
}

impl From<PauliOperator> for Vec<OperatorTerm> {
    fn from(op: PauliOperator) -> Self {
        op.terms
    }
}

impl Mul<Complex64> for &PauliOperator {
    type Output = PauliOperator;

    fn mul(self, rhs: Complex64) -> PauliOperator {
        self.scale(rhs)
    }
}

impl Mul<Complex64> for PauliOperator {
    type Output = PauliOperator;

    fn mul(self, rhs: Complex64) -> PauliOperator {
        self.scale(rhs)
    }
}

/// Any accepted operator input.
#[derive(Debug, Clone, PartialEq)]
pub enum OperatorLike {
    /// A weighted sum of terms.
    Operator(PauliOperator),
    /// A single Pauli term.
    Pauli(PauliTerm),
    /// A Pauli label such as `"XZ"` or `"-iY"`.
    Label(String),
}

impl OperatorLike {
    /// Normalize into a canonical [`PauliOperator`].
    pub fn into_operator(self) -> ReckonResult<PauliOperator> {
        match self {
            OperatorLike::Operator(op) => Ok(op),
            OperatorLike::Pauli(pauli) => Ok(PauliOperator::from(pauli)),
            OperatorLike::Label(label) => PauliOperator::from_label(&label),
        }
    }
}

impl From<PauliOperator> for OperatorLike {
    fn from(op: PauliOperator) -> Self {
        OperatorLike::Operator(op)
    }
}

impl From<&PauliOperator> for OperatorLike {
    fn from(op: &PauliOperator) -> Self {
        OperatorLike::Operator(op.clone())
    }
}

impl From<PauliTerm> for OperatorLike {
    fn from(pauli: PauliTerm) -> Self {
        OperatorLike::Pauli(pauli)
    }
}

impl From<&str> for OperatorLike {
    fn from(label: &str) -> Self {
        OperatorLike::Label(label.to_string())
    }
}

impl From<String> for OperatorLike {
    fn from(label: String) -> Self {
        OperatorLike::Label(label)
    }
}

/// Any accepted single-Pauli input.
#[derive(Debug, Clone, PartialEq)]
pub enum PauliLike {
    /// A parsed term.
    Term(PauliTerm),
    /// A Pauli label.
    Label(String),
}

impl PauliLike {
    /// Normalize into a [`PauliTerm`].
    pub fn into_term(self) -> ReckonResult<PauliTerm> {
        match self {
            PauliLike::Term(term) => Ok(term),
            PauliLike::Label(label) => PauliTerm::from_label(&label),
        }
    }
}

impl From<PauliTerm> for PauliLike {
    fn from(term: PauliTerm) -> Self {
        PauliLike::Term(term)
    }
}

impl From<&PauliTerm> for PauliLike {
    fn from(term: &PauliTerm) -> Self {
        PauliLike::Term(term.clone())
    }
}

impl From<&str> for PauliLike {
    fn from(label: &str) -> Self {
        PauliLike::Label(label.to_string())
    }
}

impl From<String> for PauliLike {
    fn from(label: String) -> Self {
        PauliLike::Label(label)
    }
}
