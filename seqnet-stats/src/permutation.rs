//! Permutation test for edge differences between two groups.
//!
//! Given two networks built from two groups of sequences, the observed
//! per-edge weight difference is compared against a null distribution
//! obtained by pooling all sequences, shuffling group labels, and
//! rebuilding both networks. The empirical p-value counts permuted
//! differences at least as extreme (in absolute value) as the observed one.
//!
//! Networks over different state alphabets are not comparable edge by edge;
//! rather than failing, the test degrades to a result with no edge records.
//! Permutations whose rebuilt networks fail to construct are discarded from
//! the extremity counts but still widen the p-value denominator.

use seqnet_core::{Result, SeqnetError, Summarizable};

use crate::model::{build_network, WeightedNetwork};
use crate::rng::SeededRng;

// ── Options ────────────────────────────────────────────────────────────────

/// Options for [`permutation_test`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PermutationOptions {
    /// Number of label permutations.
    pub iterations: usize,
    /// Significance level for the thresholded difference matrix.
    pub level: f64,
    /// RNG seed.
    pub seed: u64,
}

impl Default for PermutationOptions {
    fn default() -> Self {
        Self {
            iterations: 1000,
            level: 0.05,
            seed: 0,
        }
    }
}

// ── Results ────────────────────────────────────────────────────────────────

/// Permutation record for one edge (diagonal included).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PermutationEdge {
    /// Source state label.
    pub from: String,
    /// Target state label.
    pub to: String,
    /// Observed difference `w_a - w_b`.
    pub diff_true: f64,
    /// Empirical two-sided p-value.
    pub p_value: f64,
    /// The observed difference where significant, 0 otherwise.
    pub diff_sig: f64,
}

impl Summarizable for PermutationEdge {
    fn summary(&self) -> String {
        format!(
            "{} -> {}: diff {:+.4}, p = {:.4}{}",
            self.from,
            self.to,
            self.diff_true,
            self.p_value,
            if self.diff_sig != 0.0 { " *" } else { "" }
        )
    }
}

/// Result of a two-group permutation test.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PermutationResult {
    edges: Vec<PermutationEdge>,
    iterations: usize,
    level: f64,
}

impl PermutationResult {
    /// Per-edge records in row-major order, or empty when the groups'
    /// alphabets did not match.
    pub fn edges(&self) -> &[PermutationEdge] {
        &self.edges
    }

    /// Number of permutations used.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Significance level used.
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Whether the groups were comparable at all.
    pub fn comparable(&self) -> bool {
        !self.edges.is_empty()
    }
}

impl Summarizable for PermutationResult {
    fn summary(&self) -> String {
        if self.edges.is_empty() {
            return "PermutationResult: groups not comparable".to_string();
        }
        let sig = self.edges.iter().filter(|e| e.diff_sig != 0.0).count();
        format!(
            "PermutationResult: {}/{} edges differ over {} permutations at level {}",
            sig,
            self.edges.len(),
            self.iterations,
            self.level
        )
    }
}

// ── Analysis ───────────────────────────────────────────────────────────────

/// Permutation test of per-edge weight differences between `a` and `b`.
///
/// Both networks must carry their sequence data.
pub fn permutation_test(
    a: &WeightedNetwork,
    b: &WeightedNetwork,
    options: &PermutationOptions,
) -> Result<PermutationResult> {
    let data_a = a.data().ok_or_else(|| {
        SeqnetError::InvalidInput("first network carries no sequence data".into())
    })?;
    let data_b = b.data().ok_or_else(|| {
        SeqnetError::InvalidInput("second network carries no sequence data".into())
    })?;
    if options.iterations == 0 {
        return Err(SeqnetError::InvalidInput(
            "permutation test requires at least one iteration".into(),
        ));
    }
    if !(options.level > 0.0 && options.level < 1.0) {
        return Err(SeqnetError::InvalidInput(format!(
            "significance level must be in (0, 1), got {}",
            options.level
        )));
    }

    if a.labels() != b.labels() {
        return Ok(PermutationResult {
            edges: Vec::new(),
            iterations: options.iterations,
            level: options.level,
        });
    }

    let n = a.n_states();
    let m1 = data_a.n_sequences();
    let m2 = data_b.n_sequences();
    if m1 == 0 || m2 == 0 {
        return Err(SeqnetError::InvalidInput(
            "both groups must contain at least one sequence".into(),
        ));
    }

    // Pooled sequences, group A first.
    let mut pooled: Vec<Vec<usize>> = Vec::with_capacity(m1 + m2);
    pooled.extend(data_a.sequences().iter().cloned());
    pooled.extend(data_b.sequences().iter().cloned());
    let labels = a.labels().to_vec();

    let diff_true: Vec<f64> = a
        .weights()
        .iter()
        .zip(b.weights())
        .map(|(wa, wb)| wa - wb)
        .collect();

    let mut rng = SeededRng::new(options.seed);
    let mut extreme = vec![0usize; n * n];
    let mut order: Vec<usize> = (0..m1 + m2).collect();

    for _ in 0..options.iterations {
        rng.shuffle(&mut order);
        let group1: Vec<Vec<usize>> =
            order[..m1].iter().map(|&i| pooled[i].clone()).collect();
        let group2: Vec<Vec<usize>> =
            order[m1..].iter().map(|&i| pooled[i].clone()).collect();

        let null_diff = match permuted_diff(&labels, group1, group2, a) {
            Some(d) => d,
            None => continue,
        };
        for (cell, (nd, td)) in extreme.iter_mut().zip(null_diff.iter().zip(&diff_true)) {
            if nd.abs() >= td.abs() {
                *cell += 1;
            }
        }
    }

    let denom = (options.iterations + 1) as f64;
    let edges = (0..n * n)
        .map(|cell| {
            let p_value = (extreme[cell] + 1) as f64 / denom;
            let diff = diff_true[cell];
            PermutationEdge {
                from: labels[cell / n].clone(),
                to: labels[cell % n].clone(),
                diff_true: diff,
                p_value,
                diff_sig: if p_value < options.level { diff } else { 0.0 },
            }
        })
        .collect();

    Ok(PermutationResult {
        edges,
        iterations: options.iterations,
        level: options.level,
    })
}

/// Edge differences for one permuted split, or None when either rebuilt
/// network is degenerate.
fn permuted_diff(
    labels: &[String],
    group1: Vec<Vec<usize>>,
    group2: Vec<Vec<usize>>,
    template: &WeightedNetwork,
) -> Option<Vec<f64>> {
    let data1 = crate::model::SequenceData::new(labels.to_vec(), group1).ok()?;
    let data2 = crate::model::SequenceData::new(labels.to_vec(), group2).ok()?;
    let net1 = build_network(&data1, template.kind()).ok()?;
    let net2 = build_network(&data2, template.kind()).ok()?;
    Some(
        net1.weights()
            .iter()
            .zip(net2.weights())
            .map(|(w1, w2)| w1 - w2)
            .collect(),
    )
}

// ── Tests ──────────────────────────────────────────────────────────────────
