//! Input normalization: single-or-sequence batches and dynamic documents.
//!
//! Typed callers hand frequencies and operators to the reckoner directly and
//! rely on [`Batch`] to accept either one item or a list. Callers holding
//! loosely-typed data (JSON, or YAML read into a `serde_json::Value`) go
//! through the `*_from_value` decoders, which report malformed shapes as
//! type-class [`ReckonError`]s before any computation happens.
//!
//! Outcome keys in documents may be decimal (`"5"`), hexadecimal (`"0x5"`)
//! or binary (`"0b101"`, with optional `_` or space separators).

use std::collections::BTreeMap;

use num_complex::Complex64;
use serde_json::{Map, Value};

use crate::error::{ReckonError, ReckonResult};
use crate::frequencies::{
    Counts, Frequencies, FrequenciesLike, Outcome, QuasiDistribution, WeightMap,
};
use crate::operator::{OperatorLike, PauliLike, PauliOperator};
use crate::pauli::PauliTerm;

/// One item or a sequence of items.
#[derive(Debug, Clone, PartialEq)]
pub enum Batch<T> {
    /// A lone item, treated as a sequence of length one.
    Single(T),
    /// Any number of items.
    Sequence(Vec<T>),
}

impl<T> Batch<T> {
    /// Flatten into a vector.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Batch::Single(item) => vec![item],
            Batch::Sequence(items) => items,
        }
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        match self {
            Batch::Single(_) => 1,
            Batch::Sequence(items) => items.len(),
        }
    }

    /// True for an empty sequence.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Into<FrequenciesLike>> From<Vec<T>> for Batch<FrequenciesLike> {
    fn from(items: Vec<T>) -> Self {
        Batch::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FrequenciesLike>, const N: usize> From<[T; N]> for Batch<FrequenciesLike> {
    fn from(items: [T; N]) -> Self {
        Batch::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl From<FrequenciesLike> for Batch<FrequenciesLike> {
    fn from(item: FrequenciesLike) -> Self {
        Batch::Single(item)
    }
}

impl From<Frequencies> for Batch<FrequenciesLike> {
    fn from(item: Frequencies) -> Self {
        Batch::Single(item.into())
    }
}

impl From<Counts> for Batch<FrequenciesLike> {
    fn from(item: Counts) -> Self {
        Batch::Single(item.into())
    }
}

impl From<QuasiDistribution> for Batch<FrequenciesLike> {
    fn from(item: QuasiDistribution) -> Self {
        Batch::Single(item.into())
    }
}

impl From<WeightMap> for Batch<FrequenciesLike> {
    fn from(item: WeightMap) -> Self {
        Batch::Single(item.into())
    }
}

impl<T: Into<OperatorLike>> From<Vec<T>> for Batch<OperatorLike> {
    fn from(items: Vec<T>) -> Self {
        Batch::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<OperatorLike>, const N: usize> From<[T; N]> for Batch<OperatorLike> {
    fn from(items: [T; N]) -> Self {
        Batch::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl From<OperatorLike> for Batch<OperatorLike> {
    fn from(item: OperatorLike) -> Self {
        Batch::Single(item)
    }
}

impl From<PauliOperator> for Batch<OperatorLike> {
    fn from(item: PauliOperator) -> Self {
        Batch::Single(item.into())
    }
}

impl From<PauliTerm> for Batch<OperatorLike> {
    fn from(item: PauliTerm) -> Self {
        Batch::Single(item.into())
    }
}

impl From<&str> for Batch<OperatorLike> {
    fn from(item: &str) -> Self {
        Batch::Single(item.into())
    }
}

impl From<String> for Batch<OperatorLike> {
    fn from(item: String) -> Self {
        Batch::Single(item.into())
    }
}

// ---------------------------------------------------------------------------
// Dynamic documents
// ---------------------------------------------------------------------------

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parse an outcome key.
pub fn parse_outcome(key: &str) -> ReckonResult<Outcome> {
    let invalid = || ReckonError::InvalidOutcome(key.to_string());
    let trimmed = key.trim();
    let (digits, radix) = if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        (hex.to_string(), 16)
    } else if let Some(bits) = trimmed
        .strip_prefix("0b")
        .or_else(|| trimmed.strip_prefix("0B"))
    {
        (bits.chars().filter(|c| !matches!(c, '_' | ' ')).collect(), 2)
    } else {
        (trimmed.to_string(), 10)
    };
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return Err(invalid());
    }
    Outcome::from_str_radix(&digits, radix).map_err(|_| invalid())
}

fn parse_weight(outcome: Outcome, value: &Value) -> ReckonResult<f64> {
    value
        .as_f64()
        .filter(|w| w.is_finite())
        .ok_or_else(|| ReckonError::InvalidWeight {
            outcome,
            reason: format!("expected a finite number, got {}", describe(value)),
        })
}

fn weights_from_object(object: &Map<String, Value>) -> ReckonResult<BTreeMap<Outcome, f64>> {
    let mut weights = BTreeMap::new();
    for (key, value) in object {
        let outcome = parse_outcome(key)?;
        let weight = parse_weight(outcome, value)?;
        *weights.entry(outcome).or_insert(0.0) += weight;
    }
    Ok(weights)
}

fn counts_from_object(object: &Map<String, Value>) -> ReckonResult<Counts> {
    WeightMap::new(weights_from_object(object)?)?.to_counts()
}

fn optional_u64(object: &Map<String, Value>, field: &str) -> ReckonResult<Option<u64>> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value.as_u64().map(Some).ok_or_else(|| {
            ReckonError::InvalidFrequencies(format!(
                "'{field}' must be a non-negative integer, got {}",
                describe(value)
            ))
        }),
    }
}

fn optional_f64(object: &Map<String, Value>, field: &str) -> ReckonResult<Option<f64>> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_f64()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(Some)
            .ok_or_else(|| {
                ReckonError::InvalidFrequencies(format!(
                    "'{field}' must be a non-negative number, got {}",
                    describe(value)
                ))
            }),
    }
}

fn quasi_from_object(object: &Map<String, Value>) -> ReckonResult<QuasiDistribution> {
    let weights = match object.get("quasi_dist") {
        Some(Value::Object(inner)) => WeightMap::new(weights_from_object(inner)?)?,
        Some(other) => {
            return Err(ReckonError::InvalidFrequencies(format!(
                "'quasi_dist' must be an object, got {}",
                describe(other)
            )));
        }
        None => WeightMap::default(),
    };
    let mut quasi = QuasiDistribution::new(weights.iter().collect());
    if let Some(shots) = optional_u64(object, "shots")? {
        quasi = quasi.with_shots(shots);
    }
    if let Some(bound) = optional_f64(object, "stddev_upper_bound")? {
        quasi = quasi.with_stddev_upper_bound(bound);
    }
    Ok(quasi)
}

/// Decode one frequencies document.
///
/// Accepted shapes:
/// - `{"counts": {"0": 10, "0b11": 5}}` for exact counts;
/// - `{"quasi_dist": {"0": 0.6, "3": 0.4}, "shots": 1000, "stddev_upper_bound": 0.03}`;
/// - `{"0": 10, "3": 5}` for a plain outcome → weight map.
pub fn frequencies_from_value(value: &Value) -> ReckonResult<FrequenciesLike> {
    let Value::Object(object) = value else {
        return Err(ReckonError::InvalidFrequencies(format!(
            "expected an object, got {}",
            describe(value)
        )));
    };
    if let Some(inner) = object.get("counts") {
        return match inner {
            Value::Object(inner) => Ok(FrequenciesLike::Counts(counts_from_object(inner)?)),
            other => Err(ReckonError::InvalidFrequencies(format!(
                "'counts' must be an object, got {}",
                describe(other)
            ))),
        };
    }
    if object.contains_key("quasi_dist") {
        return Ok(FrequenciesLike::QuasiDist(quasi_from_object(object)?));
    }
    Ok(FrequenciesLike::Map(WeightMap::new(weights_from_object(object)?)?))
}

/// Decode a document that must hold exact counts.
pub fn counts_from_value(value: &Value) -> ReckonResult<Counts> {
    match frequencies_from_value(value) {
        Ok(FrequenciesLike::Counts(counts)) => Ok(counts),
        Ok(FrequenciesLike::Map(map)) => map.to_counts(),
        Ok(FrequenciesLike::QuasiDist(_)) => {
            Err(ReckonError::NotCounts("a quasi-distribution".into()))
        }
        Err(ReckonError::InvalidFrequencies(_)) => {
            Err(ReckonError::NotCounts(describe(value).into()))
        }
        Err(other) => Err(other),
    }
}

/// Decode one frequencies document or an array of them.
pub fn frequencies_batch_from_value(value: &Value) -> ReckonResult<Batch<FrequenciesLike>> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(frequencies_from_value)
            .collect::<ReckonResult<Vec<_>>>()
            .map(Batch::Sequence),
        Value::Object(_) => frequencies_from_value(value).map(Batch::Single),
        other => Err(ReckonError::ExpectedSequence(describe(other).into())),
    }
}

fn coefficient_from_value(value: &Value) -> ReckonResult<Complex64> {
    let invalid = || {
        ReckonError::InvalidOperator(format!(
            "coefficient must be a number, [re, im] or {{re, im}}, got {}",
            describe(value)
        ))
    };
    let finite = |v: Option<f64>| v.filter(|x| x.is_finite());
    match value {
        Value::Number(n) => finite(n.as_f64())
            .map(|re| Complex64::new(re, 0.0))
            .ok_or_else(invalid),
        Value::Array(parts) if parts.len() == 2 => {
            let re = finite(parts[0].as_f64()).ok_or_else(invalid)?;
            let im = finite(parts[1].as_f64()).ok_or_else(invalid)?;
            Ok(Complex64::new(re, im))
        }
        Value::Object(parts) => {
            if parts.keys().any(|k| k != "re" && k != "im") {
                return Err(invalid());
            }
            let part = |name: &str| match parts.get(name) {
                None => Some(0.0),
                Some(v) => finite(v.as_f64()),
            };
            let re = part("re").ok_or_else(invalid)?;
            let im = part("im").ok_or_else(invalid)?;
            Ok(Complex64::new(re, im))
        }
        _ => Err(invalid()),
    }
}

fn term_from_value(value: &Value) -> ReckonResult<(PauliTerm, Complex64)> {
    match value {
        Value::String(label) => Ok((PauliTerm::from_label(label)?, Complex64::new(1.0, 0.0))),
        Value::Object(object) => {
            let label = object.get("pauli").and_then(Value::as_str).ok_or_else(|| {
                ReckonError::InvalidOperator("term is missing a 'pauli' label".into())
            })?;
            let coeff = match object.get("coeff") {
                Some(coeff) => coefficient_from_value(coeff)?,
                None => Complex64::new(1.0, 0.0),
            };
            Ok((PauliTerm::from_label(label)?, coeff))
        }
        other => Err(ReckonError::InvalidOperator(format!(
            "term must be a label or an object, got {}",
            describe(other)
        ))),
    }
}

/// Decode one operator document.
///
/// Accepted shapes: a Pauli label (`"XZ"`), or
/// `{"terms": [{"pauli": "XZ", "coeff": 0.5}, {"pauli": "ZZ", "coeff": [0, 1]}]}`.
pub fn operator_from_value(value: &Value) -> ReckonResult<OperatorLike> {
    match value {
        Value::String(label) => Ok(OperatorLike::Label(label.clone())),
        Value::Object(object) => match object.get("terms") {
            Some(Value::Array(terms)) => {
                let terms = terms
                    .iter()
                    .map(term_from_value)
                    .collect::<ReckonResult<Vec<_>>>()?;
                Ok(OperatorLike::Operator(PauliOperator::new(terms)?))
            }
            _ => Err(ReckonError::InvalidOperator(
                "operator object needs a 'terms' array".into(),
            )),
        },
        other => Err(ReckonError::InvalidOperator(format!(
            "expected a label or an object, got {}",
            describe(other)
        ))),
    }
}

/// Decode one operator document or an array of them.
pub fn operator_batch_from_value(value: &Value) -> ReckonResult<Batch<OperatorLike>> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(operator_from_value)
            .collect::<ReckonResult<Vec<_>>>()
            .map(Batch::Sequence),
        Value::String(_) | Value::Object(_) => operator_from_value(value).map(Batch::Single),
        other => Err(ReckonError::ExpectedSequence(describe(other).into())),
    }
}

/// Decode a single Pauli label.
pub fn pauli_from_value(value: &Value) -> ReckonResult<PauliLike> {
    match value {
        Value::String(label) => Ok(PauliLike::Label(label.clone())),
        other => Err(ReckonError::InvalidPauliLabel {
            label: other.to_string(),
            reason: format!("expected a string, got {}", describe(other)),
        }),
    }
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

fn weights_to_object<W: Into<Value>>(weights: impl Iterator<Item = (Outcome, W)>) -> Value {
    Value::Object(
        weights
            .map(|(outcome, weight)| (outcome.to_string(), weight.into()))
            .collect(),
    )
}

/// Encode frequencies as a document [`frequencies_from_value`] reads back
/// into the same representation.
pub fn frequencies_to_value(frequencies: &FrequenciesLike) -> Value {
    match frequencies {
        FrequenciesLike::Counts(counts) => {
            let mut object = Map::new();
            object.insert("counts".into(), weights_to_object(counts.iter()));
            Value::Object(object)
        }
        FrequenciesLike::QuasiDist(quasi) => {
            let mut object = Map::new();
            object.insert("quasi_dist".into(), weights_to_object(quasi.iter()));
            if let Some(shots) = quasi.shots() {
                object.insert("shots".into(), shots.into());
            }
            if let Some(bound) = quasi.stddev_upper_bound() {
                object.insert("stddev_upper_bound".into(), bound.into());
            }
            Value::Object(object)
        }
        FrequenciesLike::Map(map) => weights_to_object(map.iter()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_outcome_forms() {
        assert_eq!(parse_outcome("5").unwrap(), 5);
        assert_eq!(parse_outcome(" 12 ").unwrap(), 12);
        assert_eq!(parse_outcome("0x1f").unwrap(), 31);
        assert_eq!(parse_outcome("0b101").unwrap(), 5);
        assert_eq!(parse_outcome("0b1_0 1").unwrap(), 5);
        for bad in ["", "-1", "+1", "abc", "0x", "0b2", "1.5", "0b"] {
            assert!(parse_outcome(bad).is_err(), "key {bad:?}");
        }
    }

    #[test]
    fn test_frequencies_shapes() {
        let counts = frequencies_from_value(&json!({"counts": {"0": 3, "1": 1}})).unwrap();
        assert_eq!(counts, FrequenciesLike::Counts(Counts::from([(0, 3), (1, 1)])));

        let quasi = frequencies_from_value(&json!({
            "quasi_dist": {"0": 0.75, "0b1": 0.25},
            "shots": 4,
        }))
        .unwrap();
        match quasi {
            FrequenciesLike::QuasiDist(q) => {
                assert_eq!(q.get(1), Some(0.25));
                assert_eq!(q.shots(), Some(4));
                assert_eq!(q.stddev_upper_bound(), None);
            }
            other => panic!("unexpected {other:?}"),
        }

        let map = frequencies_from_value(&json!({"0": 1.5, "2": -0.5})).unwrap();
        assert!(matches!(map, FrequenciesLike::Map(_)));
    }

    #[test]
    fn test_frequencies_type_errors() {
        let bad = [
            json!(null),
            json!(1),
            json!("counts"),
            json!({"x": 1}),
            json!({"0": "1"}),
            json!({"0": null}),
            json!({"counts": {"0": 0.5}}),
            json!({"counts": {"0": -1}}),
            json!({"counts": [1, 2]}),
            json!({"quasi_dist": {"0": 1.0}, "shots": -2}),
        ];
        for value in bad {
            let err = frequencies_from_value(&value).unwrap_err();
            assert!(err.is_type_error(), "{value}");
        }
    }

    #[test]
    fn test_frequencies_batch() {
        let single = frequencies_batch_from_value(&json!({"0": 1})).unwrap();
        assert_eq!(single.len(), 1);
        let seq = frequencies_batch_from_value(&json!([{"0": 1}, {"counts": {}}])).unwrap();
        assert_eq!(seq.len(), 2);
        assert!(frequencies_batch_from_value(&json!([])).unwrap().is_empty());

        for value in [json!(3), json!("x"), json!(true), json!(null)] {
            let err = frequencies_batch_from_value(&value).unwrap_err();
            assert!(err.is_type_error());
        }
        assert!(frequencies_batch_from_value(&json!([3])).unwrap_err().is_type_error());
    }

    #[test]
    fn test_counts_from_value() {
        let counts = counts_from_value(&json!({"0": 2, "1": 0})).unwrap();
        assert_eq!(counts.shots(), 2);
        for value in [json!({"quasi_dist": {}}), json!(1), json!([{"0": 1}])] {
            let err = counts_from_value(&value).unwrap_err();
            assert!(matches!(err, ReckonError::NotCounts(_)), "{value}");
        }
    }

    #[test]
    fn test_operator_shapes() {
        assert_eq!(
            operator_from_value(&json!("XZ")).unwrap(),
            OperatorLike::Label("XZ".into())
        );
        let op = operator_from_value(&json!({"terms": [
            {"pauli": "XZ", "coeff": 0.5},
            {"pauli": "ZZ", "coeff": [0.0, 1.0]},
            {"pauli": "II", "coeff": {"re": 2.0}},
            "YY",
        ]}))
        .unwrap()
        .into_operator()
        .unwrap();
        let coeffs: Vec<_> = op.iter().map(|(_, c)| c).collect();
        assert_eq!(
            coeffs,
            vec![
                Complex64::new(0.5, 0.0),
                Complex64::new(0.0, 1.0),
                Complex64::new(2.0, 0.0),
                Complex64::new(1.0, 0.0),
            ]
        );
    }

    #[test]
    fn test_operator_type_errors() {
        for value in [
            json!(1),
            json!(null),
            json!({"pauli": "X"}),
            json!({"terms": [1]}),
            json!({"terms": [{"coeff": 1.0}]}),
            json!({"terms": [{"pauli": "X", "coeff": "one"}]}),
            json!({"terms": [{"pauli": "X", "coeff": [1.0]}]}),
            json!({"terms": [{"pauli": "Q"}]}),
        ] {
            let err = operator_from_value(&value).unwrap_err();
            assert!(err.is_type_error(), "{value}");
        }
    }

    #[test]
    fn test_operator_batch() {
        let batch = operator_batch_from_value(&json!(["ZYXI", "IXYZ"])).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(operator_batch_from_value(&json!("Z")).unwrap().len(), 1);
        assert!(operator_batch_from_value(&json!(5)).unwrap_err().is_type_error());
        assert!(operator_batch_from_value(&json!([5])).unwrap_err().is_type_error());
    }

    #[test]
    fn test_pauli_from_value() {
        assert_eq!(pauli_from_value(&json!("X")).unwrap(), PauliLike::Label("X".into()));
        for value in [json!(1), json!(["X"]), json!({"pauli": "X"})] {
            assert!(pauli_from_value(&value).unwrap_err().is_type_error());
        }
    }

    #[test]
    fn test_batch_conversions() {
        let single: Batch<FrequenciesLike> = Counts::from([(0, 1)]).into();
        assert!(matches!(single, Batch::Single(_)));
        let many: Batch<FrequenciesLike> = vec![Counts::new(), Counts::new()].into();
        assert_eq!(many.len(), 2);
        let ops: Batch<OperatorLike> = ["I", "Z"].into();
        assert_eq!(ops.into_vec().len(), 2);
    }

    #[test]
    fn test_encoding_reads_back() {
        let cases = [
            FrequenciesLike::Counts(Counts::from([(0, 3), (5, 1)])),
            FrequenciesLike::QuasiDist(
                QuasiDistribution::from([(0, 0.75), (3, -0.25)])
                    .with_shots(8)
                    .with_stddev_upper_bound(0.125),
            ),
            FrequenciesLike::QuasiDist(QuasiDistribution::from([(1, 1.0)])),
            FrequenciesLike::Map(WeightMap::from_pairs([(2, 0.5)]).unwrap()),
        ];
        for frequencies in cases {
            let value = frequencies_to_value(&frequencies);
            assert_eq!(frequencies_from_value(&value).unwrap(), frequencies);
        }
    }
}
