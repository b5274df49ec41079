//! Tests for the four reckoning levels against known reference values.

use num_complex::Complex64;
use qreckon::{
    Counts, Expval, PauliOperator, PauliTerm, QuasiDistribution, ReckonError, Reckoner,
    ReckonerConfig, ReckoningResult, WeightMap,
};

const TOL: f64 = 1e-12;

fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

fn assert_close(result: ReckoningResult, expval: Complex64, std_error: f64) {
    let got = result.expval().as_complex();
    assert!(
        (got - expval).norm() < TOL,
        "expval {got} differs from {expval}"
    );
    assert!(
        (result.std_error() - std_error).abs() < TOL,
        "std_error {} differs from {std_error}",
        result.std_error()
    );
}

fn operator(labels: &[&str], coeffs: &[f64]) -> PauliOperator {
    PauliOperator::from_list(
        labels
            .iter()
            .zip(coeffs)
            .map(|(label, &coeff)| (*label, c(coeff, 0.0))),
    )
    .unwrap()
}

// ---------------------------------------------------------------------------
// Level 0: frequencies
// ---------------------------------------------------------------------------

#[test]
fn frequencies_reference_table() {
    let reckoner = Reckoner::default();
    let half = 1.0 / 2f64.sqrt();
    let cases: [(Counts, f64, f64); 8] = [
        (Counts::new(), 0.0, 1.0),
        (Counts::from([(0, 0)]), 0.0, 1.0),
        (Counts::from([(0, 1)]), 1.0, 0.0),
        (Counts::from([(1, 1)]), -1.0, 0.0),
        (Counts::from([(0, 1), (1, 1)]), 0.0, half),
        (Counts::from([(3, 5)]), 1.0, 0.0),
        (Counts::from([(7, 2)]), -1.0, 0.0),
        (Counts::from([(0b01, 1), (0b10, 1), (0b11, 2)]), 0.0, 0.5),
    ];
    for (counts, expval, std_error) in cases {
        let result = reckoner.reckon_frequencies(counts.clone()).unwrap();
        assert!(result.expval().is_real(), "{counts:?}");
        assert_close(result, c(expval, 0.0), std_error);
    }
}

#[test]
fn frequencies_accepts_every_representation() {
    let reckoner = Reckoner::default();
    let counts = Counts::from([(0, 3), (1, 1)]);
    let from_counts = reckoner.reckon_frequencies(counts.clone()).unwrap();
    let from_map = reckoner
        .reckon_frequencies(WeightMap::from(&counts))
        .unwrap();
    let from_quasi = reckoner
        .reckon_frequencies(QuasiDistribution::from(&counts))
        .unwrap();
    assert_eq!(from_counts, from_map);
    assert_eq!(from_counts, from_quasi);
}

// ---------------------------------------------------------------------------
// Level 1: Pauli terms
// ---------------------------------------------------------------------------

#[test]
fn pauli_reference_table() {
    let reckoner = Reckoner::default();
    let counts = Counts::from([(0, 0), (1, 1), (2, 2), (3, 3)]);
    let cases = [
        ("IZ", -1.0 / 3.0, (4.0f64 / 27.0).sqrt()),
        ("ZI", -2.0 / 3.0, (5.0f64 / 54.0).sqrt()),
        ("ZZ", 0.0, (1.0f64 / 6.0).sqrt()),
        ("XY", 0.0, (1.0f64 / 6.0).sqrt()),
        ("-ZZ", 0.0, (1.0f64 / 6.0).sqrt()),
        ("-IZ", 1.0 / 3.0, (4.0f64 / 27.0).sqrt()),
    ];
    for (label, expval, std_error) in cases {
        let result = reckoner.reckon_pauli(counts.clone(), label).unwrap();
        assert_close(result, c(expval, 0.0), std_error);
    }
}

#[test]
fn pauli_phase_makes_expval_complex() {
    let reckoner = Reckoner::default();
    let one = Counts::from([(1, 1)]);
    let result = reckoner.reckon_pauli(one.clone(), "iZ").unwrap();
    assert!(!result.expval().is_real());
    assert_close(result, c(0.0, -1.0), 0.0);

    let result = reckoner.reckon_pauli(one, "-iZ").unwrap();
    assert_close(result, c(0.0, 1.0), 0.0);

    let result = reckoner
        .reckon_pauli(Counts::from([(0, 1)]), "-Z")
        .unwrap();
    assert_eq!(result.expval(), Expval::Real(-1.0));
}

#[test]
fn pauli_term_and_label_agree() {
    let reckoner = Reckoner::default();
    let counts = Counts::from([(0b101, 4), (0b010, 7), (0b111, 1)]);
    let term = PauliTerm::from_label("ZXI").unwrap();
    assert_eq!(
        reckoner.reckon_pauli(counts.clone(), term).unwrap(),
        reckoner.reckon_pauli(counts, "ZXI").unwrap()
    );
}

// ---------------------------------------------------------------------------
// Level 2: operators
// ---------------------------------------------------------------------------

#[test]
fn operator_reference_table() {
    let reckoner = Reckoner::default();
    let even = Counts::from([(0, 1), (1, 1)]);
    let cases = [
        (Counts::new(), ["I", "Z"], 0.0, 5f64.sqrt()),
        (Counts::new(), ["I", "I"], 0.0, 2f64.sqrt()),
        (Counts::from([(0, 0), (1, 1)]), ["I", "Z"], -1.0, 0.0),
        (even.clone(), ["Z", "Z"], 0.0, 2.5f64.sqrt()),
        (even.clone(), ["I", "Z"], 1.0, 2f64.sqrt()),
        (even, ["Z", "I"], 2.0, 0.5f64.sqrt()),
    ];
    for (counts, labels, expval, std_error) in cases {
        let result = reckoner
            .reckon_operator(counts, operator(&labels, &[1.0, 2.0]))
            .unwrap();
        assert_close(result, c(expval, 0.0), std_error);
    }
}

#[test]
fn operator_global_coefficient_scales_result() {
    let reckoner = Reckoner::default();
    let counts = Counts::from([(0, 5), (1, 2), (2, 9), (3, 4)]);
    let base = operator(&["IZ", "ZZ", "XI"], &[0.5, -1.0, 2.0]);
    let reference = reckoner.reckon_operator(counts.clone(), &base).unwrap();

    for factor in [c(2.0, 0.0), c(-0.5, 0.0), c(0.0, 1.0), c(1.0, -1.0)] {
        let scaled = reckoner
            .reckon_operator(counts.clone(), &base * factor)
            .unwrap();
        let expected = reference.expval().as_complex() * factor;
        assert!((scaled.expval().as_complex() - expected).norm() < TOL);
        assert!((scaled.std_error() - reference.std_error() * factor.norm()).abs() < TOL);
    }
}

#[test]
fn operator_from_phased_term_moves_phase() {
    let reckoner = Reckoner::default();
    let counts = Counts::from([(1, 1)]);
    let op = PauliOperator::from(PauliTerm::from_label("iZ").unwrap());
    let result = reckoner.reckon_operator(counts, op).unwrap();
    assert_close(result, c(0.0, -1.0), 0.0);
}

// ---------------------------------------------------------------------------
// Level 3: batches
// ---------------------------------------------------------------------------

#[test]
fn batch_reference_values() {
    let reckoner = Reckoner::default();
    let even = Counts::from([(0, 1), (1, 1)]);
    let result = reckoner
        .reckon(vec![even.clone(), even.clone()], vec!["I", "Z"])
        .unwrap();
    assert_close(result, c(1.0, 0.0), 1.0 / 2f64.sqrt());

    let result = reckoner
        .reckon(vec![even.clone(), even], vec!["X", "Z"])
        .unwrap();
    assert_close(result, c(0.0, 0.0), 1.0);
}

#[test]
fn batch_is_sum_of_operators() {
    let reckoner = Reckoner::default();
    let f1 = Counts::from([(0, 7), (3, 2), (1, 1)]);
    let f2 = Counts::from([(2, 4), (1, 6)]);
    let op1 = operator(&["ZZ", "IZ"], &[1.0, -0.5]);
    let op2 = operator(&["XI", "YY"], &[0.25, 2.0]);

    let r1 = reckoner.reckon_operator(f1.clone(), &op1).unwrap();
    let r2 = reckoner.reckon_operator(f2.clone(), &op2).unwrap();
    let total = reckoner.reckon(vec![f1, f2], vec![op1, op2]).unwrap();

    let expval = r1.expval().as_complex() + r2.expval().as_complex();
    let variance = r1.std_error().powi(2) + r2.std_error().powi(2);
    assert_close(total, expval, variance.sqrt());
}

#[test]
fn batch_single_items_are_wrapped() {
    let reckoner = Reckoner::default();
    let counts = Counts::from([(0, 3), (1, 1)]);
    let single = reckoner.reckon(counts.clone(), "Z").unwrap();
    let listed = reckoner.reckon(vec![counts.clone()], vec!["Z"]).unwrap();
    let level2 = reckoner.reckon_operator(counts, "Z").unwrap();
    assert_eq!(single, listed);
    assert_eq!(single, level2);
}

#[test]
fn batch_empty_is_zero() {
    let reckoner = Reckoner::default();
    let result = reckoner
        .reckon(Vec::<Counts>::new(), Vec::<PauliOperator>::new())
        .unwrap();
    assert_eq!(result.expval(), Expval::Real(0.0));
    assert_eq!(result.std_error(), 0.0);
}

#[test]
fn batch_mixed_representations() {
    let reckoner = Reckoner::default();
    let counts = Counts::from([(0, 1), (1, 1)]);
    let quasi = QuasiDistribution::from([(0, 0.5), (1, 0.5)]).with_shots(2);
    let result = reckoner
        .reckon(
            vec![
                qreckon::FrequenciesLike::from(counts),
                qreckon::FrequenciesLike::from(quasi),
            ],
            vec!["Z", "Z"],
        )
        .unwrap();
    assert_close(result, c(0.0, 0.0), 1.0);
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn batch_length_mismatch_is_value_error() {
    let reckoner = Reckoner::default();
    let err = reckoner
        .reckon(vec![Counts::new(), Counts::new()], vec!["Z"])
        .unwrap_err();
    assert!(err.is_value_error());
    assert_eq!(
        err.to_string(),
        "The number of frequencies entries (2) does not match the number of operators (1)"
    );
}

#[test]
fn malformed_inputs_are_type_errors() {
    let reckoner = Reckoner::default();
    let err = reckoner.reckon(Counts::new(), "ZA").unwrap_err();
    assert!(matches!(err, ReckonError::InvalidPauliLabel { .. }));
    assert!(err.is_type_error());

}

#[test]
fn real_valued_weight_maps_are_accepted() {
    let reckoner = Reckoner::default();
    let halves = WeightMap::from_pairs([(0, 0.5), (1, 0.5)]).unwrap();
    let result = reckoner.reckon(halves.clone(), "Z").unwrap();
    assert_eq!(result.expval(), Expval::Real(0.0));
    assert!((result.std_error() - 1.0).abs() < 1e-12);

    let result = reckoner.reckon(halves, operator(&["Z", "I"], &[1.0, 0.5])).unwrap();
    assert!((result.expval().re() - 0.5).abs() < 1e-12);
}

#[test]
fn counts_near_u64_max_do_not_overflow() {
    let counts = Counts::from([(0, u64::MAX), (1, 1)]);
    let result = Reckoner::default().reckon_pauli(counts, "Z").unwrap();
    assert!((result.expval().re() - 1.0).abs() < 1e-9);
    assert!(result.std_error() >= 0.0);
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn parallel_and_sequential_agree() {
    let frequencies: Vec<Counts> = (0..200u64)
        .map(|i| Counts::from([(i % 8, i + 1), ((3 * i) % 8, 10), (7, i % 3)]))
        .collect();
    let operators: Vec<PauliOperator> = (0..200)
        .map(|i| {
            let labels = [["ZZI", "IZZ"], ["XIX", "ZIZ"], ["YYY", "III"]][i % 3];
            operator(&labels, &[1.0, -0.25])
        })
        .collect();

    let run = |parallel: bool| {
        Reckoner::new(ReckonerConfig {
            parallel,
            parallel_threshold: 2,
            ..ReckonerConfig::default()
        })
        .reckon(frequencies.clone(), operators.clone())
        .unwrap()
    };
    let (seq, par) = (run(false), run(true));
    assert!((seq.expval().as_complex() - par.expval().as_complex()).norm() < 1e-9);
    assert!((seq.std_error() - par.std_error()).abs() < 1e-9);
}

#[test]
fn zero_real_tolerance_keeps_complex() {
    let reckoner = Reckoner::new(ReckonerConfig {
        real_tolerance: 0.0,
        ..ReckonerConfig::default()
    });
    let result = reckoner.reckon(Counts::from([(0, 1)]), "Z").unwrap();
    assert_eq!(result.expval(), Expval::Complex(c(1.0, 0.0)));
}
