//! Lightweight coreset construction.
//!
//! Pipeline: mean vector, per-record L1 deviation profile, a probability
//! distribution blending a uniform term with the squared deviation, then `m`
//! weighted draws without replacement.

use rand::prelude::*;
use tracing::{debug, info};

use crate::config::CoresetConfig;
use crate::constants::coreset::{DEVIATION_SHARE, UNIFORM_SHARE, UNIT_WEIGHT};
use crate::data::{Coreset, RecordIndex, RecordStore};
use crate::errors::CoresetError;

#[derive(Debug, Clone)]
/// Small deterministic RNG used for reproducible coreset selection.
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64_internal(&mut self) -> u64 {
        let mut z = self.state.wrapping_add(0x9E3779B97F4A7C15);
        self.state = z;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }
}

impl rand::RngCore for DeterministicRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64_internal() as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.next_u64_internal()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut offset = 0;
        while offset < dest.len() {
            let bytes = self.next_u64_internal().to_le_bytes();
            let copy_len = (dest.len() - offset).min(bytes.len());
            dest[offset..offset + copy_len].copy_from_slice(&bytes[..copy_len]);
            offset += copy_len;
        }
    }
}

/// Coordinate-wise arithmetic mean of every record's features.
///
/// Accumulators are sized to the store's feature width up front, so every
/// record contributes to every slot.
pub fn mean_vector(store: &RecordStore) -> Result<Vec<f64>, CoresetError> {
    if store.is_empty() {
        return Err(CoresetError::EmptyDataset);
    }
    let mut mean = vec![0.0; store.feature_count()];
    for record in store {
        for (slot, value) in mean.iter_mut().zip(&record.features) {
            *slot += value;
        }
    }
    let total = store.len() as f64;
    for slot in &mut mean {
        *slot /= total;
    }
    Ok(mean)
}

/// Per-record L1 distance from the mean, plus the global normalizer.
///
/// `total_deviation` is the square of the summed absolute deviations over all
/// records and features: `(Σ_f Σ_x |mean[f] - x[f]|)^2`. It is not a sum of
/// per-record squares.
#[derive(Clone, Debug, PartialEq)]
pub struct DeviationProfile {
    /// `devSum(x) = Σ_f |mean[f] - x[f]|` per record, in store order.
    pub dev_sums: Vec<f64>,
    /// `devSum(x)^2` per record.
    pub dev_sums_squared: Vec<f64>,
    /// Summed absolute deviation per feature across all records.
    pub per_feature_totals: Vec<f64>,
    /// Square of the sum of `per_feature_totals`.
    pub total_deviation: f64,
}

impl DeviationProfile {
    pub fn compute(store: &RecordStore, mean: &[f64]) -> Self {
        let mut dev_sums = Vec::with_capacity(store.len());
        let mut dev_sums_squared = Vec::with_capacity(store.len());
        let mut per_feature_totals = vec![0.0; mean.len()];

        for record in store {
            let mut dev_sum = 0.0;
            for ((total, center), value) in per_feature_totals
                .iter_mut()
                .zip(mean)
                .zip(&record.features)
            {
                let deviation = (center - value).abs();
                *total += deviation;
                dev_sum += deviation;
            }
            dev_sums.push(dev_sum);
            dev_sums_squared.push(dev_sum * dev_sum);
        }

        let summed: f64 = per_feature_totals.iter().sum();
        Self {
            dev_sums,
            dev_sums_squared,
            per_feature_totals,
            total_deviation: summed * summed,
        }
    }

    /// Number of records profiled.
    pub fn len(&self) -> usize {
        self.dev_sums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dev_sums.is_empty()
    }
}

/// Selection probability per record: `0.5 / N + 0.5 * devSum(x)^2 / totalDeviation`.
///
/// Fails with `DegenerateDataset` when every record sits on the mean, and with
/// `NonFiniteDeviation` when the squared deviations overflow.
pub fn probability_distribution(profile: &DeviationProfile) -> Result<Vec<f64>, CoresetError> {
    if profile.is_empty() {
        return Err(CoresetError::EmptyDataset);
    }
    let total_deviation = profile.total_deviation;
    if total_deviation == 0.0 {
        return Err(CoresetError::DegenerateDataset);
    }
    if !total_deviation.is_finite() {
        return Err(CoresetError::NonFiniteDeviation { total_deviation });
    }
    let uniform = UNIFORM_SHARE * (1.0 / profile.len() as f64);
    profile
        .dev_sums_squared
        .iter()
        .map(|squared| {
            let q = uniform + DEVIATION_SHARE * (squared / total_deviation);
            if q.is_finite() {
                Ok(q)
            } else {
                Err(CoresetError::NonFiniteDeviation { total_deviation })
            }
        })
        .collect()
}

/// Inverse-probability draw weights `w[x] = 1 / (m * q[x])`.
pub fn sampling_weights(distribution: &[f64], target_size: usize) -> Vec<f64> {
    let m = target_size as f64;
    distribution.iter().map(|q| 1.0 / (m * q)).collect()
}

/// Weighted index sampler over a mutable weight array.
///
/// Prefix sums live in a Fenwick tree so a draw is a binary search for the
/// first prefix strictly greater than `u * total`, and removing an item is a
/// point update that zeroes its weight. Remaining weights are never
/// renormalized beyond that.
#[derive(Clone, Debug)]
pub struct CumulativeWeightSampler {
    weights: Vec<f64>,
    tree: Vec<f64>,
    remaining: usize,
}

impl CumulativeWeightSampler {
    /// Build a sampler; non-positive or non-finite weights are treated as removed.
    pub fn new(weights: Vec<f64>) -> Self {
        let weights: Vec<f64> = weights
            .into_iter()
            .map(|weight| {
                if weight.is_finite() && weight > 0.0 {
                    weight
                } else {
                    0.0
                }
            })
            .collect();
        let len = weights.len();
        let mut tree = vec![0.0; len + 1];
        tree[1..].copy_from_slice(&weights);
        for idx in 1..=len {
            let parent = idx + lowest_bit(idx);
            if parent <= len {
                tree[parent] += tree[idx];
            }
        }
        let remaining = weights.iter().filter(|weight| **weight > 0.0).count();
        Self {
            weights,
            tree,
            remaining,
        }
    }

    /// Number of items that can still be drawn.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Current weight of `index` (0.0 once removed).
    pub fn weight(&self, index: RecordIndex) -> f64 {
        self.weights.get(index).copied().unwrap_or(0.0)
    }

    /// Sum of the remaining weights.
    pub fn total(&self) -> f64 {
        self.prefix(self.weights.len())
    }

    /// Draw one index proportionally to the remaining weights.
    ///
    /// The drawn item stays in the population until `remove` is called.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<RecordIndex> {
        if self.remaining == 0 {
            return None;
        }
        let target = rng.random::<f64>() * self.total();
        Some(self.settle(self.locate(target)))
    }

    /// Remove `index` from the population, returning the weight it carried.
    pub fn remove(&mut self, index: RecordIndex) -> f64 {
        let weight = self.weight(index);
        if weight == 0.0 {
            return 0.0;
        }
        self.weights[index] = 0.0;
        let mut pos = index + 1;
        while pos < self.tree.len() {
            self.tree[pos] -= weight;
            pos += lowest_bit(pos);
        }
        self.remaining -= 1;
        weight
    }

    fn prefix(&self, len: usize) -> f64 {
        let mut sum = 0.0;
        let mut pos = len;
        while pos > 0 {
            sum += self.tree[pos];
            pos -= lowest_bit(pos);
        }
        sum
    }

    /// First index whose inclusive prefix sum exceeds `target`.
    fn locate(&self, target: f64) -> usize {
        let len = self.weights.len();
        let mut pos = 0;
        let mut rest = target;
        let mut step = if len == 0 {
            0
        } else {
            1 << (usize::BITS - 1 - len.leading_zeros())
        };
        while step > 0 {
            let next = pos + step;
            if next <= len && self.tree[next] <= rest {
                pos = next;
                rest -= self.tree[next];
            }
            step >>= 1;
        }
        pos
    }

    /// Round-off in the tree can leave a removed slot with a sliver of mass, or
    /// push the target past the end; snap to the nearest live index, preferring
    /// the one above on a tie.
    fn settle(&self, index: usize) -> usize {
        let len = self.weights.len();
        let start = index.min(len - 1);
        if self.weights[start] > 0.0 {
            return start;
        }
        for distance in 1..len {
            let above = start + distance;
            if above < len && self.weights[above] > 0.0 {
                return above;
            }
            if let Some(below) = start.checked_sub(distance)
                && self.weights[below] > 0.0
            {
                return below;
            }
        }
        start
    }
}

fn lowest_bit(value: usize) -> usize {
    value & value.wrapping_neg()
}

/// Draw `target_size` distinct indices, zeroing each drawn index's weight.
///
/// Fails with `SamplingExhausted` if fewer than `target_size` items carry a
/// drawable weight.
fn sample_without_replacement<R: Rng + ?Sized>(
    weights: Vec<f64>,
    target_size: usize,
    rng: &mut R,
) -> Result<Coreset, CoresetError> {
    let mut sampler = CumulativeWeightSampler::new(weights);
    if sampler.remaining() < target_size {
        return Err(CoresetError::SamplingExhausted {
            drawn: 0,
            requested: target_size,
        });
    }
    let mut coreset = Coreset {
        indices: Vec::with_capacity(target_size),
        weights: Vec::with_capacity(target_size),
    };
    for drawn in 0..target_size {
        let Some(index) = sampler.draw(rng) else {
            return Err(CoresetError::SamplingExhausted {
                drawn,
                requested: target_size,
            });
        };
        let weight = sampler.remove(index);
        coreset.indices.push(index);
        coreset.weights.push(weight);
    }
    Ok(coreset)
}

/// Builds lightweight coresets from a record store.
#[derive(Clone, Debug, Default)]
pub struct CoresetBuilder {
    config: CoresetConfig,
}

impl CoresetBuilder {
    pub fn new(config: CoresetConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CoresetConfig {
        &self.config
    }

    /// Select `min(m, N)` records.
    ///
    /// When `m >= N` every index is returned in ascending order with unit
    /// weight. The distribution is still derived first, so a degenerate dataset
    /// fails in both branches.
    pub fn build(&self, store: &RecordStore) -> Result<Coreset, CoresetError> {
        let target_size = self.config.target_size;
        if target_size == 0 {
            return Err(CoresetError::InvalidTargetSize(target_size));
        }
        info!(
            "[coreset] creating lightweight coreset (records={}, features={}, m={})",
            store.len(),
            store.feature_count(),
            target_size
        );

        debug!("[coreset] finding the mean of the data");
        let mean = mean_vector(store)?;

        debug!("[coreset] accumulating absolute deviations from the mean");
        let profile = DeviationProfile::compute(store, &mean);
        debug!("[coreset] total deviation {:.6e}", profile.total_deviation);

        debug!("[coreset] deriving q(x) probability distribution");
        let distribution = probability_distribution(&profile)?;
        let weights = sampling_weights(&distribution, target_size);

        let total = store.len();
        if target_size >= total {
            info!(
                "[coreset] m={} covers all {} records; returning the full dataset",
                target_size, total
            );
            return Ok(Coreset {
                indices: (0..total).collect(),
                weights: vec![UNIT_WEIGHT; total],
            });
        }

        info!(
            "[coreset] sampling {} points (seed={})",
            target_size, self.config.seed
        );
        let mut rng = DeterministicRng::new(self.config.seed);
        let coreset = sample_without_replacement(weights, target_size, &mut rng)?;
        info!("[coreset] coreset creation complete ({} selected)", coreset.len());
        Ok(coreset)
    }
}

/// Convenience wrapper around `CoresetBuilder::build`.
pub fn build_coreset(store: &RecordStore, config: &CoresetConfig) -> Result<Coreset, CoresetError> {
    CoresetBuilder::new(*config).build(store)
}
