//! Bootstrap edge stability.
//!
//! Resamples the sequences a network was built from (with replacement),
//! rebuilds the network on each replicate, and asks for every structurally
//! non-zero edge: does its weight stay inside a stability region? Edges
//! whose bootstrap weights frequently leave the region are flagged as
//! non-significant, and [`BootstrapResult::significant_network`] zeroes
//! them out.
//!
//! Replicates that fail to build (a resample can collapse onto a single
//! state) contribute NaN weights; they are excluded from the bootstrap
//! summaries but still count toward the empirical p-value denominator.

use seqnet_core::{Result, SeqnetError, Summarizable};

use crate::descriptive;
use crate::model::{build_network, WeightedNetwork};
use crate::rng::SeededRng;

// ── Options ────────────────────────────────────────────────────────────────

/// Stability region for an edge weight under resampling.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StabilityCriterion {
    /// Weight must stay within `[low·w, high·w]` of its observed value `w`.
    Range { low: f64, high: f64 },
    /// Weight must stay at or above a fixed threshold. `None` derives the
    /// threshold from the data as the 10th percentile of the observed
    /// non-zero weights.
    Threshold(Option<f64>),
}

impl Default for StabilityCriterion {
    fn default() -> Self {
        StabilityCriterion::Range {
            low: 0.75,
            high: 1.25,
        }
    }
}

/// Options for [`bootstrap_network`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BootstrapOptions {
    /// Number of bootstrap replicates.
    pub iterations: usize,
    /// Significance level for the stability decision and the confidence
    /// interval.
    pub level: f64,
    /// RNG seed.
    pub seed: u64,
    /// Stability criterion.
    pub criterion: StabilityCriterion,
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        Self {
            iterations: 1000,
            level: 0.05,
            seed: 0,
            criterion: StabilityCriterion::default(),
        }
    }
}

// ── Results ────────────────────────────────────────────────────────────────

/// Bootstrap record for one structurally non-zero edge.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BootstrapEdge {
    /// Source state label.
    pub from: String,
    /// Target state label.
    pub to: String,
    /// Source state index into the network's label list.
    pub from_index: usize,
    /// Target state index.
    pub to_index: usize,
    /// Observed weight.
    pub weight: f64,
    /// Mean weight across bootstrap replicates.
    pub boot_mean: f64,
    /// Empirical probability of leaving the stability region.
    pub p_value: f64,
    /// Whether the edge is stable at the requested level.
    pub significant: bool,
    /// Lower bound of the stability region.
    pub cr_lower: f64,
    /// Upper bound of the stability region (infinite for threshold
    /// criteria).
    pub cr_upper: f64,
    /// Percentile confidence interval, lower bound.
    pub ci_lower: f64,
    /// Percentile confidence interval, upper bound.
    pub ci_upper: f64,
}

impl Summarizable for BootstrapEdge {
    fn summary(&self) -> String {
        format!(
            "{} -> {}: weight {:.4}, boot mean {:.4}, p = {:.4} ({})",
            self.from,
            self.to,
            self.weight,
            self.boot_mean,
            self.p_value,
            if self.significant { "stable" } else { "unstable" }
        )
    }
}

/// Result of a bootstrap stability analysis.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BootstrapResult {
    network: WeightedNetwork,
    edges: Vec<BootstrapEdge>,
    iterations: usize,
    level: f64,
}

impl BootstrapResult {
    /// Per-edge stability records, row-major edge order.
    pub fn edges(&self) -> &[BootstrapEdge] {
        &self.edges
    }

    /// Number of replicates used.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Significance level used.
    pub fn level(&self) -> f64 {
        self.level
    }

    /// The analyzed network.
    pub fn network(&self) -> &WeightedNetwork {
        &self.network
    }

    /// A copy of the network with all non-significant edge weights set
    /// to zero.
    pub fn significant_network(&self) -> WeightedNetwork {
        let n = self.network.n_states();
        let mut weights = self.network.weights().to_vec();
        for edge in &self.edges {
            if !edge.significant {
                weights[edge.from_index * n + edge.to_index] = 0.0;
            }
        }
        self.network.with_weights(weights)
    }
}

impl Summarizable for BootstrapResult {
    fn summary(&self) -> String {
        let stable = self.edges.iter().filter(|e| e.significant).count();
        format!(
            "BootstrapResult: {}/{} edges stable over {} replicates at level {}",
            stable,
            self.edges.len(),
            self.iterations,
            self.level
        )
    }
}

// ── Analysis ───────────────────────────────────────────────────────────────

/// Bootstrap the edge weights of `network`.
///
/// The network must carry the sequence data it was built from; networks
/// wrapped from raw weights cannot be resampled.
pub fn bootstrap_network(
    network: &WeightedNetwork,
    options: &BootstrapOptions,
) -> Result<BootstrapResult> {
    let data = network.data().ok_or_else(|| {
        SeqnetError::InvalidInput("network carries no sequence data to resample".into())
    })?;
    if options.iterations == 0 {
        return Err(SeqnetError::InvalidInput(
            "bootstrap requires at least one iteration".into(),
        ));
    }
    if !(options.level > 0.0 && options.level < 1.0) {
        return Err(SeqnetError::InvalidInput(format!(
            "significance level must be in (0, 1), got {}",
            options.level
        )));
    }

    let n = network.n_states();
    let m = data.n_sequences();
    if m == 0 {
        return Err(SeqnetError::InvalidInput(
            "cannot resample an empty dataset".into(),
        ));
    }

    // Structurally non-zero edges, row-major order.
    let edge_cells: Vec<(usize, usize)> = (0..n)
        .flat_map(|from| (0..n).map(move |to| (from, to)))
        .filter(|&(from, to)| network.weight(from, to) != 0.0)
        .collect();

    let threshold = derived_threshold(network, &options.criterion);

    let mut rng = SeededRng::new(options.seed);
    let mut replicates: Vec<Vec<f64>> = vec![Vec::with_capacity(options.iterations); edge_cells.len()];

    for _ in 0..options.iterations {
        let indices = rng.sample_with_replacement(m, m);
        let sample = data.subset(&indices);
        match build_network(&sample, network.kind()) {
            Ok(net) => {
                for (slot, &(from, to)) in replicates.iter_mut().zip(&edge_cells) {
                    slot.push(net.weight(from, to));
                }
            }
            Err(_) => {
                // Degenerate resample; record the replicate as undefined.
                for slot in replicates.iter_mut() {
                    slot.push(f64::NAN);
                }
            }
        }
    }

    let labels = network.labels();
    let edges = edge_cells
        .iter()
        .zip(&replicates)
        .map(|(&(from, to), weights)| {
            edge_record(
                labels,
                from,
                to,
                network.weight(from, to),
                weights,
                options,
                threshold,
            )
        })
        .collect();

    Ok(BootstrapResult {
        network: network.clone(),
        edges,
        iterations: options.iterations,
        level: options.level,
    })
}

/// Resolve the threshold criterion against the observed weights.
fn derived_threshold(network: &WeightedNetwork, criterion: &StabilityCriterion) -> f64 {
    match criterion {
        StabilityCriterion::Range { .. } => f64::NAN,
        StabilityCriterion::Threshold(Some(t)) => *t,
        StabilityCriterion::Threshold(None) => {
            let nonzero: Vec<f64> = network
                .weights()
                .iter()
                .copied()
                .filter(|&w| w != 0.0)
                .collect();
            descriptive::quantile(&nonzero, 0.1)
        }
    }
}

fn edge_record(
    labels: &[String],
    from: usize,
    to: usize,
    weight: f64,
    replicates: &[f64],
    options: &BootstrapOptions,
    threshold: f64,
) -> BootstrapEdge {
    let (cr_lower, cr_upper) = match options.criterion {
        StabilityCriterion::Range { low, high } => (low * weight, high * weight),
        StabilityCriterion::Threshold(_) => (threshold, f64::INFINITY),
    };

    let finite: Vec<f64> = replicates.iter().copied().filter(|v| v.is_finite()).collect();
    let outside = finite
        .iter()
        .filter(|&&w| w < cr_lower || w > cr_upper)
        .count();
    let p_value = (outside + 1) as f64 / (replicates.len() + 1) as f64;

    let (boot_mean, ci_lower, ci_upper) = if finite.is_empty() {
        (f64::NAN, f64::NAN, f64::NAN)
    } else {
        let mut sorted = finite.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));
        (
            descriptive::mean(&finite),
            descriptive::quantile(&sorted, options.level / 2.0),
            descriptive::quantile(&sorted, 1.0 - options.level / 2.0),
        )
    };

    BootstrapEdge {
        from: labels[from].clone(),
        to: labels[to].clone(),
        from_index: from,
        to_index: to,
        weight,
        boot_mean,
        p_value,
        significant: p_value < options.level,
        cr_lower,
        cr_upper,
        ci_lower,
        ci_upper,
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ModelKind, SequenceData};

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    /// Many copies of the same strongly structured sequences, so every
    /// resample reproduces nearly identical weights.
    fn stable_data() -> SequenceData {
        let mut sequences = Vec::new();
        for _ in 0..20 {
            sequences.push(vec![0, 1, 2, 0, 1, 2, 0, 1]);
            sequences.push(vec![1, 2, 0, 1, 2, 0, 1, 2]);
        }
        SequenceData::new(labels(&["a", "b", "c"]), sequences).unwrap()
    }

    #[test]
    fn requires_sequence_data() {
        let net = WeightedNetwork::from_weights(labels(&["a", "b"]), vec![0.0, 0.5, 0.5, 0.0])
            .unwrap();
        let err = bootstrap_network(&net, &BootstrapOptions::default());
        assert!(matches!(err, Err(SeqnetError::InvalidInput(_))));
    }

    #[test]
    fn rejects_zero_iterations_and_bad_level() {
        let net = build_network(&stable_data(), ModelKind::RelativeFrequency).unwrap();
        let opts = BootstrapOptions {
            iterations: 0,
            ..Default::default()
        };
        assert!(bootstrap_network(&net, &opts).is_err());
        let opts = BootstrapOptions {
            level: 1.5,
            ..Default::default()
        };
        assert!(bootstrap_network(&net, &opts).is_err());
    }

    #[test]
    fn stable_edges_are_significant() {
        let net = build_network(&stable_data(), ModelKind::RelativeFrequency).unwrap();
        let opts = BootstrapOptions {
            iterations: 200,
            seed: 42,
            ..Default::default()
        };
        let result = bootstrap_network(&net, &opts).unwrap();
        assert!(!result.edges().is_empty());
        // The data is overwhelmingly regular, so every edge should hold
        // its weight across resamples.
        for edge in result.edges() {
            assert!(edge.significant, "{} unexpectedly unstable", edge.summary());
            assert!(edge.ci_lower <= edge.ci_upper);
            assert!(edge.boot_mean.is_finite());
        }
    }

    #[test]
    fn deterministic_for_fixed_seed() {
        let net = build_network(&stable_data(), ModelKind::RelativeFrequency).unwrap();
        let opts = BootstrapOptions {
            iterations: 100,
            seed: 7,
            ..Default::default()
        };
        let a = bootstrap_network(&net, &opts).unwrap();
        let b = bootstrap_network(&net, &opts).unwrap();
        for (ea, eb) in a.edges().iter().zip(b.edges()) {
            assert_eq!(ea.p_value, eb.p_value);
            assert_eq!(ea.boot_mean, eb.boot_mean);
        }
    }

    #[test]
    fn p_values_use_plus_one_smoothing() {
        let net = build_network(&stable_data(), ModelKind::RelativeFrequency).unwrap();
        let opts = BootstrapOptions {
            iterations: 99,
            seed: 1,
            ..Default::default()
        };
        let result = bootstrap_network(&net, &opts).unwrap();
        for edge in result.edges() {
            // Never exactly zero; minimum is 1/(iter+1)
            assert!(edge.p_value >= 1.0 / 100.0);
            assert!(edge.p_value <= 1.0);
        }
    }

    #[test]
    fn only_nonzero_edges_are_tracked() {
        let net = build_network(&stable_data(), ModelKind::RelativeFrequency).unwrap();
        let nonzero = net.weights().iter().filter(|&&w| w != 0.0).count();
        let opts = BootstrapOptions {
            iterations: 50,
            seed: 2,
            ..Default::default()
        };
        let result = bootstrap_network(&net, &opts).unwrap();
        assert_eq!(result.edges().len(), nonzero);
    }

    #[test]
    fn edge_indices_agree_with_labels() {
        let net = build_network(&stable_data(), ModelKind::RelativeFrequency).unwrap();
        let opts = BootstrapOptions {
            iterations: 50,
            seed: 4,
            ..Default::default()
        };
        let result = bootstrap_network(&net, &opts).unwrap();
        for edge in result.edges() {
            assert_eq!(net.labels()[edge.from_index], edge.from);
            assert_eq!(net.labels()[edge.to_index], edge.to);
            assert_eq!(net.weight(edge.from_index, edge.to_index), edge.weight);
        }
    }

    #[test]
    fn significant_network_zeroes_unstable_edges() {
        // Noisy data with a rare transition that cannot survive resampling
        let mut sequences = vec![vec![0, 1, 0, 1, 0, 1]; 30];
        sequences.push(vec![2, 0]);
        let data = SequenceData::new(labels(&["a", "b", "c"]), sequences).unwrap();
        let net = build_network(&data, ModelKind::Frequency).unwrap();
        let opts = BootstrapOptions {
            iterations: 300,
            seed: 9,
            ..Default::default()
        };
        let result = bootstrap_network(&net, &opts).unwrap();
        let sig = result.significant_network();
        for edge in result.edges() {
            if edge.significant {
                assert_eq!(sig.weight(edge.from_index, edge.to_index), edge.weight);
            } else {
                assert_eq!(sig.weight(edge.from_index, edge.to_index), 0.0);
            }
        }
        // The rare c→a edge appears in 1 of 31 sequences; most resamples
        // drop or shrink it, so it must be flagged unstable.
        let rare = result
            .edges()
            .iter()
            .find(|e| e.from == "c" && e.to == "a")
            .unwrap();
        assert!(!rare.significant);
    }

    #[test]
    fn threshold_criterion_derives_from_weights() {
        let net = build_network(&stable_data(), ModelKind::RelativeFrequency).unwrap();
        let opts = BootstrapOptions {
            iterations: 100,
            seed: 5,
            criterion: StabilityCriterion::Threshold(None),
            ..Default::default()
        };
        let result = bootstrap_network(&net, &opts).unwrap();
        for edge in result.edges() {
            assert!(edge.cr_lower.is_finite());
            assert!(edge.cr_upper.is_infinite());
        }
    }
}
