//! Measurement frequency tables and their bit-level transforms.
//!
//! Outcomes are integer-encoded bitstrings: bit *i* holds the measured value
//! of classical bit *i*. Three interchangeable representations are supported:
//!
//! - [`Counts`]: exact integer counts; the total is the number of shots.
//! - [`QuasiDistribution`]: real (possibly negative) weights with optional
//!   sampling metadata.
//! - [`WeightMap`]: a plain outcome → weight mapping, as read from user input.
//!
//! Every transform is pure and returns a new table of the same representation.
//! When several outcomes collapse onto the same key their weights are summed.
//!
//! # Example
//!
//! ```rust
//! use qreckon::frequencies::{Counts, FrequencyTable, counts_to_quasi_dist};
//!
//! let counts = Counts::from([(0b00, 1), (0b01, 1), (0b10, 2), (0b11, 3)]);
//!
//! // Keep only bit 0: outcomes 0b00/0b10 and 0b01/0b11 merge.
//! let marginal = counts.bitmask(0b01);
//! assert_eq!(marginal, Counts::from([(0b00, 3), (0b01, 4)]));
//!
//! let quasi = counts_to_quasi_dist(&counts);
//! assert_eq!(quasi.shots(), Some(7));
//! ```

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::{Deserialize, Serialize};

use crate::error::{ReckonError, ReckonResult};

/// Integer-encoded measurement bitstring.
pub type Outcome = u64;

/// Operations shared by every frequency representation.
pub trait FrequencyTable: Sized {
    /// Reassign every outcome according to `mapper`, summing collisions.
    fn remap<F>(&self, mapper: F) -> Self
    where
        F: Fn(Outcome) -> Outcome;

    /// Flip readout bits: `outcome XOR bitflips`.
    fn bitflip(&self, bitflips: Outcome) -> Self {
        self.remap(|outcome| outcome ^ bitflips)
    }

    /// Marginalize onto the bits in `mask`: `outcome AND mask`.
    fn bitmask(&self, mask: Outcome) -> Self {
        self.remap(|outcome| outcome & mask)
    }
}

/// Map frequencies by reassigning keys according to `mapper`.
pub fn map_frequencies<T, F>(frequencies: &T, mapper: F) -> T
where
    T: FrequencyTable,
    F: Fn(Outcome) -> Outcome,
{
    frequencies.remap(mapper)
}

/// Flip readout bits according to `bitflips` (int encoded).
pub fn bitflip_frequencies<T: FrequencyTable>(frequencies: &T, bitflips: Outcome) -> T {
    frequencies.bitflip(bitflips)
}

/// Apply `bitmask` to every readout.
pub fn bitmask_frequencies<T: FrequencyTable>(frequencies: &T, bitmask: Outcome) -> T {
    frequencies.bitmask(bitmask)
}

fn remap_weights<W, F, M>(
    weights: &BTreeMap<Outcome, W>,
    mapper: F,
    merge: M,
) -> BTreeMap<Outcome, W>
where
    W: Copy + Default,
    F: Fn(Outcome) -> Outcome,
    M: Fn(W, W) -> W,
{
    let mut mapped = BTreeMap::new();
    for (&outcome, &weight) in weights {
        let entry = mapped.entry(mapper(outcome)).or_insert_with(W::default);
        *entry = merge(*entry, weight);
    }
    mapped
}

// ---------------------------------------------------------------------------
// Counts
// ---------------------------------------------------------------------------

/// Exact measurement counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counts {
    counts: BTreeMap<Outcome, u64>,
}

impl Counts {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing outcome → count map.
    pub fn from_map(counts: BTreeMap<Outcome, u64>) -> Self {
        Self { counts }
    }

    /// Total number of shots, saturating at `u64::MAX`.
    pub fn shots(&self) -> u64 {
        self.counts.values().fold(0, |total, &count| total.saturating_add(count))
    }

    /// Count recorded for `outcome`, if present.
    pub fn get(&self, outcome: Outcome) -> Option<u64> {
        self.counts.get(&outcome).copied()
    }

    /// Add `count` occurrences of `outcome`.
    pub fn record(&mut self, outcome: Outcome, count: u64) {
        let entry = self.counts.entry(outcome).or_insert(0);
        *entry = entry.saturating_add(count);
    }

    /// Number of distinct outcomes stored (zero counts included).
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True if no outcome is stored.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate `(outcome, count)` in ascending outcome order.
    pub fn iter(&self) -> impl Iterator<Item = (Outcome, u64)> + '_ {
        self.counts.iter().map(|(&o, &c)| (o, c))
    }

    /// The underlying map.
    pub fn as_map(&self) -> &BTreeMap<Outcome, u64> {
        &self.counts
    }
}

impl FrequencyTable for Counts {
    fn remap<F>(&self, mapper: F) -> Self
    where
        F: Fn(Outcome) -> Outcome,
    {
        Self {
            counts: remap_weights(&self.counts, mapper, u64::saturating_add),
        }
    }
}

impl FromIterator<(Outcome, u64)> for Counts {
    fn from_iter<T: IntoIterator<Item = (Outcome, u64)>>(iter: T) -> Self {
        let mut counts = Counts::new();
        for (outcome, count) in iter {
            counts.record(outcome, count);
        }
        counts
    }
}

impl<const N: usize> From<[(Outcome, u64); N]> for Counts {
    fn from(entries: [(Outcome, u64); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl IntoIterator for Counts {
    type Item = (Outcome, u64);
    type IntoIter = btree_map::IntoIter<Outcome, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.counts.into_iter()
    }
}

// ---------------------------------------------------------------------------
// QuasiDistribution
// ---------------------------------------------------------------------------

/// Quasi-probability distribution over outcomes.
///
/// Weights may be negative (e.g. after readout mitigation) and need not sum
/// to one. `shots` records how many samples produced the distribution and
/// `stddev_upper_bound` bounds its sampling standard deviation, when known.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuasiDistribution {
    probabilities: BTreeMap<Outcome, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    shots: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stddev_upper_bound: Option<f64>,
}

impl QuasiDistribution {
    /// Create a distribution without sampling metadata.
    pub fn new(probabilities: BTreeMap<Outcome, f64>) -> Self {
        Self {
            probabilities,
            shots: None,
            stddev_upper_bound: None,
        }
    }

    /// Attach the number of shots the distribution was sampled from.
    #[must_use]
    pub fn with_shots(mut self, shots: u64) -> Self {
        self.shots = Some(shots);
        self
    }

    /// Attach an upper bound on the sampling standard deviation.
    ///
    /// Negative or non-finite bounds are not a valid bound and clear it.
    #[must_use]
    pub fn with_stddev_upper_bound(mut self, bound: f64) -> Self {
        self.stddev_upper_bound = (bound.is_finite() && bound >= 0.0).then_some(bound);
        self
    }

    /// Number of shots, if known.
    pub fn shots(&self) -> Option<u64> {
        self.shots
    }

    /// Sampling standard deviation bound, if known and non-negative.
    pub fn stddev_upper_bound(&self) -> Option<f64> {
        self.stddev_upper_bound.filter(|bound| bound.is_finite() && *bound >= 0.0)
    }

    /// Weight recorded for `outcome`, if present.
    pub fn get(&self, outcome: Outcome) -> Option<f64> {
        self.probabilities.get(&outcome).copied()
    }

    /// Number of distinct outcomes stored.
    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    /// True if no outcome is stored.
    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// Iterate `(outcome, weight)` in ascending outcome order.
    pub fn iter(&self) -> impl Iterator<Item = (Outcome, f64)> + '_ {
        self.probabilities.iter().map(|(&o, &w)| (o, w))
    }

    /// The underlying map.
    pub fn as_map(&self) -> &BTreeMap<Outcome, f64> {
        &self.probabilities
    }

    /// Sum of all weights.
    pub fn total_weight(&self) -> f64 {
        self.probabilities.values().sum()
    }
}

impl FrequencyTable for QuasiDistribution {
    fn remap<F>(&self, mapper: F) -> Self
    where
        F: Fn(Outcome) -> Outcome,
    {
        Self {
            probabilities: remap_weights(&self.probabilities, mapper, |a, b| a + b),
            shots: self.shots,
            stddev_upper_bound: self.stddev_upper_bound,
        }
    }
}

impl FromIterator<(Outcome, f64)> for QuasiDistribution {
    fn from_iter<T: IntoIterator<Item = (Outcome, f64)>>(iter: T) -> Self {
        let mut probabilities = BTreeMap::new();
        for (outcome, weight) in iter {
            *probabilities.entry(outcome).or_insert(0.0) += weight;
        }
        Self::new(probabilities)
    }
}

impl<const N: usize> From<[(Outcome, f64); N]> for QuasiDistribution {
    fn from(entries: [(Outcome, f64); N]) -> Self {
        entries.into_iter().collect()
    }
}

/// Infer a [`QuasiDistribution`] from [`Counts`].
///
/// Every count is divided by the number of shots (or by one for zero shots).
/// The result records `shots` and, when there is at least one shot,
/// `stddev_upper_bound = sqrt(1 / shots)`.
pub fn counts_to_quasi_dist(counts: &Counts) -> QuasiDistribution {
    let shots = counts.shots();
    let norm = if shots == 0 { 1.0 } else { shots as f64 };
    let probabilities = counts
        .iter()
        .map(|(outcome, count)| (outcome, count as f64 / norm))
        .collect();
    QuasiDistribution {
        probabilities,
        shots: Some(shots),
        stddev_upper_bound: (shots > 0).then(|| (1.0 / shots as f64).sqrt()),
    }
}

/// Infer a [`QuasiDistribution`] from a plain [`WeightMap`].
///
/// Weights are divided by their total (or by one when it is zero). The total
/// plays the role of the shot count: it is recorded as `shots` when it is a
/// whole number, and a positive total gives `stddev_upper_bound = sqrt(1 / total)`.
pub fn weights_to_quasi_dist(weights: &WeightMap) -> QuasiDistribution {
    let total = weights.total_weight();
    let norm = if total == 0.0 { 1.0 } else { total };
    let probabilities = weights
        .iter()
        .map(|(outcome, weight)| (outcome, weight / norm))
        .collect();
    let whole = total >= 0.0 && total.fract() == 0.0 && total < u64::MAX as f64;
    QuasiDistribution {
        probabilities,
        shots: whole.then_some(total as u64),
        stddev_upper_bound: (total > 0.0).then(|| (1.0 / total).sqrt()),
    }
}

impl From<&Counts> for QuasiDistribution {
    fn from(counts: &Counts) -> Self {
        counts_to_quasi_dist(counts)
    }
}

// ---------------------------------------------------------------------------
// WeightMap
// ---------------------------------------------------------------------------

/// Plain outcome → weight mapping with finite weights.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WeightMap {
    weights: BTreeMap<Outcome, f64>,
}

impl WeightMap {
    /// Build a map, rejecting NaN and infinite weights.
    pub fn new(weights: BTreeMap<Outcome, f64>) -> ReckonResult<Self> {
        if let Some((&outcome, &weight)) = weights.iter().find(|(_, w)| !w.is_finite()) {
            return Err(ReckonError::InvalidWeight {
                outcome,
                reason: format!("{weight} is not a finite number"),
            });
        }
        Ok(Self { weights })
    }

    /// Build a map from `(outcome, weight)` pairs, summing duplicates.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Outcome, f64)>) -> ReckonResult<Self> {
        let mut weights = BTreeMap::new();
        for (outcome, weight) in pairs {
            *weights.entry(outcome).or_insert(0.0) += weight;
        }
        Self::new(weights)
    }

    /// Iterate `(outcome, weight)` in ascending outcome order.
    pub fn iter(&self) -> impl Iterator<Item = (Outcome, f64)> + '_ {
        self.weights.iter().map(|(&o, &w)| (o, w))
    }

    /// Weight recorded for `outcome`, if present.
    pub fn get(&self, outcome: Outcome) -> Option<f64> {
        self.weights.get(&outcome).copied()
    }

    /// Number of distinct outcomes stored.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// True if no outcome is stored.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Sum of all weights.
    pub fn total_weight(&self) -> f64 {
        self.weights.values().sum()
    }

    /// Read the map as exact counts.
    ///
    /// Every weight must be a non-negative integer (`2.0` is accepted).
    pub fn to_counts(&self) -> ReckonResult<Counts> {
        self.iter()
            .map(|(outcome, weight)| {
                if weight < 0.0 || weight.fract() != 0.0 || weight >= u64::MAX as f64 {
                    Err(ReckonError::InvalidWeight {
                        outcome,
                        reason: format!("{weight} is not a non-negative integer count"),
                    })
                } else {
                    Ok((outcome, weight as u64))
                }
            })
            .collect()
    }
}

impl FrequencyTable for WeightMap {
    fn remap<F>(&self, mapper: F) -> Self
    where
        F: Fn(Outcome) -> Outcome,
    {
        Self {
            weights: remap_weights(&self.weights, mapper, |a, b| a + b),
        }
    }
}

impl From<&WeightMap> for QuasiDistribution {
    fn from(weights: &WeightMap) -> Self {
        weights_to_quasi_dist(weights)
    }
}

impl From<&Counts> for WeightMap {
    fn from(counts: &Counts) -> Self {
        Self {
            weights: counts.iter().map(|(o, c)| (o, c as f64)).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tagged unions
// ---------------------------------------------------------------------------

/// Frequencies in one of the two canonical representations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequencies {
    /// Exact counts.
    Counts(Counts),
    /// Quasi-probabilities.
    QuasiDist(QuasiDistribution),
}

impl Frequencies {
    /// Borrow as counts, if this is the counts variant.
    pub fn as_counts(&self) -> Option<&Counts> {
        match self {
            Frequencies::Counts(counts) => Some(counts),
            Frequencies::QuasiDist(_) => None,
        }
    }

    /// Convert into a quasi-distribution.
    pub fn into_quasi_dist(self) -> QuasiDistribution {
        match self {
            Frequencies::Counts(counts) => counts_to_quasi_dist(&counts),
            Frequencies::QuasiDist(quasi) => quasi,
        }
    }

    /// Convert counts into a quasi-distribution, failing for any other variant.
    pub fn counts_to_quasi_dist(&self) -> ReckonResult<QuasiDistribution> {
        match self {
            Frequencies::Counts(counts) => Ok(counts_to_quasi_dist(counts)),
            Frequencies::QuasiDist(_) => Err(ReckonError::NotCounts("a quasi-distribution".into())),
        }
    }
}

impl FrequencyTable for Frequencies {
    fn remap<F>(&self, mapper: F) -> Self
    where
        F: Fn(Outcome) -> Outcome,
    {
        match self {
            Frequencies::Counts(counts) => Frequencies::Counts(counts.remap(mapper)),
            Frequencies::QuasiDist(quasi) => Frequencies::QuasiDist(quasi.remap(mapper)),
        }
    }
}

impl From<Counts> for Frequencies {
    fn from(counts: Counts) -> Self {
        Frequencies::Counts(counts)
    }
}

impl From<QuasiDistribution> for Frequencies {
    fn from(quasi: QuasiDistribution) -> Self {
        Frequencies::QuasiDist(quasi)
    }
}

/// Any accepted frequencies input.
#[derive(Debug, Clone, PartialEq)]
pub enum FrequenciesLike {
    /// Exact counts.
    Counts(Counts),
    /// Quasi-probabilities.
    QuasiDist(QuasiDistribution),
    /// Plain outcome → weight mapping.
    Map(WeightMap),
}

impl FrequencyTable for FrequenciesLike {
    fn remap<F>(&self, mapper: F) -> Self
    where
        F: Fn(Outcome) -> Outcome,
    {
        match self {
            FrequenciesLike::Counts(counts) => FrequenciesLike::Counts(counts.remap(mapper)),
            FrequenciesLike::QuasiDist(quasi) => FrequenciesLike::QuasiDist(quasi.remap(mapper)),
            FrequenciesLike::Map(map) => FrequenciesLike::Map(map.remap(mapper)),
        }
    }
}

impl From<Counts> for FrequenciesLike {
    fn from(counts: Counts) -> Self {
        FrequenciesLike::Counts(counts)
    }
}

impl From<QuasiDistribution> for FrequenciesLike {
    fn from(quasi: QuasiDistribution) -> Self {
        FrequenciesLike::QuasiDist(quasi)
    }
}

impl From<WeightMap> for FrequenciesLike {
    fn from(map: WeightMap) -> Self {
        FrequenciesLike::Map(map)
    }
}

impl From<Frequencies> for FrequenciesLike {
    fn from(frequencies: Frequencies) -> Self {
        match frequencies {
            Frequencies::Counts(counts) => FrequenciesLike::Counts(counts),
            Frequencies::QuasiDist(quasi) => FrequenciesLike::QuasiDist(quasi),
        }
    }
}

impl From<&Counts> for FrequenciesLike {
    fn from(counts: &Counts) -> Self {
        FrequenciesLike::Counts(counts.clone())
    }
}

impl From<&QuasiDistribution> for FrequenciesLike {
    fn from(quasi: &QuasiDistribution) -> Self {
        FrequenciesLike::QuasiDist(quasi.clone())
    }
}
