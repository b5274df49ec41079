//! Multi-qubit Pauli terms and their measurement masks.
//!
//! A [`PauliTerm`] is a tensor product of single-qubit operators
//! (I, X, Y, Z), one per qubit, together with a phase from the cyclic group
//! {1, −i, −1, i}. The phase is stored as the exponent `p ∈ 0..4` of the unit
//! `−i`, so the term's coefficient is `(−i)^p`.
//!
//! Labels follow the usual convention: the rightmost character acts on
//! qubit 0, and an optional `+`/`-` and `i`/`j` prefix sets the phase.
//!
//! # Example
//!
//! ```rust
//! use num_complex::Complex64;
//! use qreckon::pauli::PauliTerm;
//!
//! let term: PauliTerm = "-iXIZ".parse().unwrap();
//! assert_eq!(term.num_qubits(), 3);
//! // Z on qubit 0, X on qubit 2.
//! assert_eq!(term.integer_mask(), 0b101);
//! assert_eq!(term.phase_coefficient(), Complex64::new(0.0, -1.0));
//! ```

use std::fmt;
use std::str::FromStr;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{ReckonError, ReckonResult};
use crate::frequencies::Outcome;

/// Largest number of qubits a term may act on; outcomes are 64-bit.
pub const MAX_QUBITS: usize = Outcome::BITS as usize;

/// Single-qubit Pauli operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PauliOp {
    /// Identity; the qubit is not measured.
    I,
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z.
    Z,
}

impl PauliOp {
    /// Parse a single label character.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PauliOp::I),
            'X' => Some(PauliOp::X),
            'Y' => Some(PauliOp::Y),
            'Z' => Some(PauliOp::Z),
            _ => None,
        }
    }

    /// Label character.
    pub fn to_char(self) -> char {
        match self {
            PauliOp::I => 'I',
            PauliOp::X => 'X',
            PauliOp::Y => 'Y',
            PauliOp::Z => 'Z',
        }
    }

    /// True unless this is the identity.
    pub fn is_measured(self) -> bool {
        self != PauliOp::I
    }
}

/// A phased tensor product of single-qubit Pauli operators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PauliTerm {
    /// One operator per qubit; index = qubit.
    ops: Vec<PauliOp>,
    /// Exponent of `−i`, always in `0..4`.
    phase: u8,
}

impl PauliTerm {
    /// Build a term from per-qubit operators (index = qubit) and a phase exponent.
    ///
    /// The phase is reduced modulo 4.
    pub fn new(ops: Vec<PauliOp>, phase: u8) -> ReckonResult<Self> {
        if ops.len() > MAX_QUBITS {
            return Err(ReckonError::TooManyQubits(ops.len()));
        }
        Ok(Self {
            ops,
            phase: phase % 4,
        })
    }

    /// The identity on `num_qubits` qubits.
    pub fn identity(num_qubits: usize) -> ReckonResult<Self> {
        Self::new(vec![PauliOp::I; num_qubits], 0)
    }

    /// Build a term on `num_qubits` qubits from sparse `(qubit, op)` pairs.
    ///
    /// Qubits not listed are identity.
    pub fn from_sparse(
        num_qubits: usize,
        ops: impl IntoIterator<Item = (usize, PauliOp)>,
    ) -> ReckonResult<Self> {
        let mut dense = vec![PauliOp::I; num_qubits];
        for (qubit, op) in ops {
            let slot = dense.get_mut(qubit).ok_or_else(|| ReckonError::InvalidPauliLabel {
                label: format!("{op:?} on qubit {qubit}"),
                reason: format!("qubit index out of range for {num_qubits} qubits"),
            })?;
            *slot = op;
        }
        Self::new(dense, 0)
    }

    /// Parse a label such as `"XYZ"`, `"-Z"`, `"iXX"` or `"-jYI"`.
    pub fn from_label(label: &str) -> ReckonResult<Self> {
        let invalid = |reason: &str| ReckonError::InvalidPauliLabel {
            label: label.to_string(),
            reason: reason.to_string(),
        };

        let mut rest = label;
        let negative = if let Some(stripped) = rest.strip_prefix('-') {
            rest = stripped;
            true
        } else {
            rest = rest.strip_prefix('+').unwrap_or(rest);
            false
        };
        let imaginary = if let Some(stripped) = rest.strip_prefix(['i', 'j']) {
            rest = stripped;
            true
        } else {
            false
        };
        if rest.is_empty() {
            return Err(invalid("no Pauli operators"));
        }

        // coeff = (−i)^phase: 1 → 0, −i → 1, −1 → 2, i → 3
        let phase = match (negative, imaginary) {
            (false, false) => 0,
            (true, true) => 1,
            (true, false) => 2,
            (false, true) => 3,
        };

        let ops = rest
            .chars()
            .rev()
            .map(|c| {
                PauliOp::from_char(c)
                    .ok_or_else(|| invalid(&format!("unexpected character '{c}'")))
            })
            .collect::<ReckonResult<Vec<_>>>()?;

        Self::new(ops, phase)
    }

    /// Number of qubits the term acts on.
    pub fn num_qubits(&self) -> usize {
        self.ops.len()
    }

    /// Per-qubit operators, index = qubit.
    pub fn ops(&self) -> &[PauliOp] {
        &self.ops
    }

    /// Operator acting on `qubit`, if in range.
    pub fn op(&self, qubit: usize) -> Option<PauliOp> {
        self.ops.get(qubit).copied()
    }

    /// Phase exponent `p` of the coefficient `(−i)^p`.
    pub fn phase(&self) -> u8 {
        self.phase
    }

    /// The same operators with a different phase exponent.
    #[must_use]
    pub fn with_phase(&self, phase: u8) -> Self {
        Self {
            ops: self.ops.clone(),
            phase: phase % 4,
        }
    }

    /// True if every qubit is identity (the phase is ignored).
    pub fn is_identity(&self) -> bool {
        self.ops.iter().all(|op| !op.is_measured())
    }

    /// Phase coefficient `(−i)^phase`.
    pub fn phase_coefficient(&self) -> Complex64 {
        match self.phase {
            0 => Complex64::new(1.0, 0.0),
            1 => Complex64::new(0.0, -1.0),
            2 => Complex64::new(-1.0, 0.0),
            _ => Complex64::new(0.0, 1.0),
        }
    }

    /// Integer mask with bit *i* set iff qubit *i* is X, Y or Z.
    ///
    /// Bit order matches the outcome encoding, so
    /// [`FrequencyTable::bitmask`](crate::frequencies::FrequencyTable::bitmask)
    /// with this mask keeps exactly the bits the term measures.
    pub fn integer_mask(&self) -> Outcome {
        self.ops
            .iter()
            .enumerate()
            .filter(|(_, op)| op.is_measured())
            .fold(0, |mask, (qubit, _)| mask | (1 << qubit))
    }

    /// Indices of the qubits whose outcome affects the eigenvalue.
    pub fn measured_qubits(&self) -> impl Iterator<Item = usize> + '_ {
        self.ops
            .iter()
            .enumerate()
            .filter_map(|(qubit, op)| op.is_measured().then_some(qubit))
    }
}

/// Build the integer mask of `pauli`.
///
/// This is the binary string with a one where there are Paulis and zero
/// where there are identities.
pub fn pauli_integer_mask(pauli: &PauliTerm) -> Outcome {
    pauli.integer_mask()
}

impl fmt::Display for PauliTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.phase {
            0 => "",
            1 => "-i",
            2 => "-",
            _ => "i",
        };
        f.write_str(prefix)?;
        for op in self.ops.iter().rev() {
            write!(f, "{}", op.to_char())?;
        }
        Ok(())
    }
}

impl FromStr for PauliTerm {
    type Err = ReckonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s)
    }
}

impl TryFrom<String> for PauliTerm {
    type Error = ReckonError;

    fn try_from(label: String) -> Result<Self, Self::Error> {
        Self::from_label(&label)
    }
}

impl From<PauliTerm> for String {
    fn from(term: PauliTerm) -> Self {
        term.to_string()
    }
}
