//! `qreckon`: expectation values of Pauli operators from measurement
//! frequencies.
//!
//! Given the outcome tables produced by circuits that measured each Pauli
//! term in its diagonal basis, `qreckon` estimates `⟨O⟩` for a weighted sum
//! of Pauli terms `O = Σ c_k P_k`, together with a standard error:
//!
//! - **frequencies**: counts, quasi-distributions and plain weight maps, with
//!   bit-flip and bit-mask transforms
//! - **pauli / operator**: Pauli labels, phases, measurement masks and
//!   weighted operators
//! - **reckoning**: the four-level estimator (table, Pauli, operator, batch)
//! - **input**: decoding of loosely-typed JSON/YAML documents
//!
//! # Quick start
//!
//! ```rust
//! use num_complex::Complex64;
//! use qreckon::{Counts, PauliOperator, Reckoner};
//!
//! // H = ZZ + 0.5·XI, each term measured by its own circuit.
//! let zz_counts = Counts::from([(0b00, 480), (0b11, 470), (0b01, 30), (0b10, 20)]);
//! let xi_counts = Counts::from([(0b00, 700), (0b10, 300)]);
//!
//! let reckoner = Reckoner::default();
//! let result = reckoner
//!     .reckon(
//!         vec![zz_counts, xi_counts],
//!         vec![
//!             PauliOperator::from_list([("ZZ", Complex64::new(1.0, 0.0))]).unwrap(),
//!             PauliOperator::from_list([("XI", Complex64::new(0.5, 0.0))]).unwrap(),
//!         ],
//!     )
//!     .unwrap();
//!
//! assert!((result.expval().re() - (0.9 + 0.5 * 0.4)).abs() < 1e-12);
//! assert!(result.std_error() > 0.0);
//! ```

pub mod binary;
pub mod error;
pub mod frequencies;
pub mod input;
pub mod operator;
pub mod pauli;
pub mod reckoning;

pub use error::{ErrorKind, ReckonError, ReckonResult};
pub use frequencies::{
    Counts, Frequencies, FrequenciesLike, FrequencyTable, Outcome, QuasiDistribution, WeightMap,
    bitflip_frequencies, bitmask_frequencies, counts_to_quasi_dist, map_frequencies,
    weights_to_quasi_dist,
};
pub use input::{Batch, frequencies_to_value};
pub use operator::{OperatorLike, OperatorTerm, PauliLike, PauliOperator};
pub use pauli::{MAX_QUBITS, PauliOp, PauliTerm, pauli_integer_mask};
pub use reckoning::{Expval, Reckoner, ReckonerConfig, ReckoningResult};
