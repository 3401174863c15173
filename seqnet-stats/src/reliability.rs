//! Split-half reliability of network estimates.
//!
//! Repeatedly splits the sequences behind a network into two disjoint
//! halves, builds a network on each half, and runs the full comparison
//! suite between them. Consistently high similarity across splits means
//! the network structure is a stable property of the data rather than an
//! artifact of particular sequences.
//!
//! Splits that produce a degenerate half (fewer than two distinct states)
//! record NaN for all 22 metrics in that iteration; the per-metric
//! summaries are taken over the finite values only.

use seqnet_core::{Result, SeqnetError, Summarizable};

use crate::comparison::{compare_networks, METRICS};
use crate::descriptive;
use crate::model::{build_network, WeightedNetwork};
use crate::rng::SeededRng;

// ── Options ────────────────────────────────────────────────────────────────

/// Options for [`split_half_reliability`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReliabilityOptions {
    /// Number of random splits.
    pub iterations: usize,
    /// Fraction of sequences assigned to the first half.
    pub fraction: f64,
    /// RNG seed.
    pub seed: u64,
}

impl Default for ReliabilityOptions {
    fn default() -> Self {
        Self {
            iterations: 100,
            fraction: 0.5,
            seed: 0,
        }
    }
}

// ── Results ────────────────────────────────────────────────────────────────

/// Distribution summary of one metric across splits, over finite values.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MetricSummary {
    pub mean: f64,
    pub std_dev: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub q1: f64,
    pub q3: f64,
    /// Number of splits where the metric was defined.
    pub n_defined: usize,
}

impl MetricSummary {
    fn from_values(values: &[f64]) -> Self {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return Self {
                mean: f64::NAN,
                std_dev: f64::NAN,
                median: f64::NAN,
                min: f64::NAN,
                max: f64::NAN,
                q1: f64::NAN,
                q3: f64::NAN,
                n_defined: 0,
            };
        }
        let mut sorted = finite.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));
        Self {
            mean: descriptive::mean(&finite),
            std_dev: descriptive::std_dev(&finite, 1),
            median: descriptive::quantile(&sorted, 0.5),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            q1: descriptive::quantile(&sorted, 0.25),
            q3: descriptive::quantile(&sorted, 0.75),
            n_defined: finite.len(),
        }
    }
}

/// Result of a split-half reliability analysis.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ReliabilityResult {
    /// `values[metric][iteration]`, in catalog order.
    values: Vec<Vec<f64>>,
    summaries: Vec<MetricSummary>,
    iterations: usize,
    fraction: f64,
}

impl ReliabilityResult {
    /// Raw metric values across splits, by catalog position.
    pub fn values(&self, metric_index: usize) -> &[f64] {
        &self.values[metric_index]
    }

    /// Summary by catalog position.
    pub fn metric_summary(&self, metric_index: usize) -> &MetricSummary {
        &self.summaries[metric_index]
    }

    /// Summary by metric key.
    pub fn get(&self, key: &str) -> Option<&MetricSummary> {
        crate::comparison::metric_index(key).map(|i| &self.summaries[i])
    }

    /// Number of splits performed.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Split fraction used.
    pub fn fraction(&self) -> f64 {
        self.fraction
    }
}

impl Summarizable for ReliabilityResult {
    fn summary(&self) -> String {
        let pearson = self
            .get("pearson")
            .map(|s| s.mean)
            .unwrap_or(f64::NAN);
        format!(
            "ReliabilityResult: {} splits, mean split-half Pearson {:.4}",
            self.iterations, pearson
        )
    }
}

// ── Analysis ───────────────────────────────────────────────────────────────

/// Split-half reliability of `network` over repeated random splits.
///
/// The network must carry its sequence data, there must be at least four
/// sequences, and the split fraction must leave at least two sequences in
/// each half.
pub fn split_half_reliability(
    network: &WeightedNetwork,
    options: &ReliabilityOptions,
) -> Result<ReliabilityResult> {
    let data = network.data().ok_or_else(|| {
        SeqnetError::InvalidInput("network carries no sequence data to split".into())
    })?;
    if options.iterations == 0 {
        return Err(SeqnetError::InvalidInput(
            "reliability analysis requires at least one iteration".into(),
        ));
    }
    if !(options.fraction > 0.0 && options.fraction < 1.0) {
        return Err(SeqnetError::InvalidInput(format!(
            "split fraction must be in (0, 1), got {}",
            options.fraction
        )));
    }

    let m = data.n_sequences();
    if m < 4 {
        return Err(SeqnetError::InvalidInput(format!(
            "split-half reliability needs at least 4 sequences, got {}",
            m
        )));
    }
    let k = (m as f64 * options.fraction).floor() as usize;
    if k < 2 || m - k < 2 {
        return Err(SeqnetError::InvalidInput(format!(
            "split fraction {} leaves a half with fewer than 2 of {} sequences",
            options.fraction, m
        )));
    }

    let mut rng = SeededRng::new(options.seed);
    let mut values: Vec<Vec<f64>> =
        vec![Vec::with_capacity(options.iterations); METRICS.len()];

    for _ in 0..options.iterations {
        let first = rng.sample_without_replacement(k, m);
        let mut in_first = vec![false; m];
        for &i in &first {
            in_first[i] = true;
        }
        let second: Vec<usize> = (0..m).filter(|&i| !in_first[i]).collect();

        let half_a = data.subset(&first);
        let half_b = data.subset(&second);

        match (
            build_network(&half_a, network.kind()),
            build_network(&half_b, network.kind()),
        ) {
            (Ok(net_a), Ok(net_b)) => {
                let cmp = compare_networks(&net_a, &net_b);
                for (slot, (_, v)) in values.iter_mut().zip(cmp.iter()) {
                    slot.push(v);
                }
            }
            _ => {
                for slot in values.iter_mut() {
                    slot.push(f64::NAN);
                }
            }
        }
    }

    let summaries = values.iter().map(|v| MetricSummary::from_values(v)).collect();

    Ok(ReliabilityResult {
        values,
        summaries,
        iterations: options.iterations,
        fraction: options.fraction,
    })
}

// ── Tests ──────────────────────────────────────────────────────────────────
