//! Sequence data and weighted transition networks.
//!
//! A [`SequenceData`] holds categorical event sequences over a fixed state
//! alphabet; a [`WeightedNetwork`] is an n×n weight matrix built from such
//! sequences under one of four weighting schemes ([`ModelKind`]). Networks
//! retain an optional handle to the sequences they were built from, which
//! the resampling routines require.

use seqnet_core::{Result, SeqnetError, Summarizable};

// ── Sequence data ──────────────────────────────────────────────────────────

/// Categorical event sequences over a shared state alphabet.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SequenceData {
    labels: Vec<String>,
    sequences: Vec<Vec<usize>>,
}

impl SequenceData {
    /// Build from pre-encoded sequences of state indices.
    ///
    /// Every index must be smaller than `labels.len()`; empty sequences are
    /// allowed and simply contribute no transitions.
    pub fn new(labels: Vec<String>, sequences: Vec<Vec<usize>>) -> Result<Self> {
        if labels.is_empty() {
            return Err(SeqnetError::InvalidInput(
                "state alphabet must be non-empty".into(),
            ));
        }
        let n = labels.len();
        for (i, seq) in sequences.iter().enumerate() {
            if let Some(&bad) = seq.iter().find(|&&s| s >= n) {
                return Err(SeqnetError::InvalidInput(format!(
                    "sequence {} contains state index {} outside alphabet of size {}",
                    i, bad, n
                )));
            }
        }
        Ok(Self { labels, sequences })
    }

    /// Build from string-labelled event sequences, deriving the alphabet
    /// from the order of first appearance.
    pub fn from_events(events: &[Vec<String>]) -> Result<Self> {
        let mut labels: Vec<String> = Vec::new();
        let mut sequences = Vec::with_capacity(events.len());
        for seq in events {
            let mut encoded = Vec::with_capacity(seq.len());
            for ev in seq {
                let idx = match labels.iter().position(|l| l == ev) {
                    Some(i) => i,
                    None => {
                        labels.push(ev.clone());
                        labels.len() - 1
                    }
                };
                encoded.push(idx);
            }
            sequences.push(encoded);
        }
        if labels.is_empty() {
            return Err(SeqnetError::InvalidInput(
                "event data contains no states".into(),
            ));
        }
        Ok(Self { labels, sequences })
    }

    /// State labels in index order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of states in the alphabet.
    pub fn n_states(&self) -> usize {
        self.labels.len()
    }

    /// Encoded sequences.
    pub fn sequences(&self) -> &[Vec<usize>] {
        &self.sequences
    }

    /// Number of sequences.
    pub fn n_sequences(&self) -> usize {
        self.sequences.len()
    }

    /// A new dataset over the same alphabet containing the sequences at
    /// `indices` (duplicates allowed, as produced by bootstrap draws).
    pub fn subset(&self, indices: &[usize]) -> Self {
        let sequences = indices
            .iter()
            .map(|&i| self.sequences[i].clone())
            .collect();
        Self {
            labels: self.labels.clone(),
            sequences,
        }
    }
}

impl Summarizable for SequenceData {
    fn summary(&self) -> String {
        let events: usize = self.sequences.iter().map(Vec::len).sum();
        format!(
            "SequenceData: {} sequences, {} states, {} events",
            self.sequences.len(),
            self.labels.len(),
            events
        )
    }
}

// ── Network model ──────────────────────────────────────────────────────────

/// Weighting scheme for network construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModelKind {
    /// Transition counts normalized per source state (rows sum to 1 where
    /// the source occurs).
    RelativeFrequency,
    /// Raw transition counts.
    Frequency,
    /// Symmetric counts of adjacent co-occurrence.
    CoOccurrence,
    /// Geometrically decaying influence of earlier states on later ones,
    /// row-normalized.
    Attention,
}

/// Decay factor for [`ModelKind::Attention`].
const ATTENTION_DECAY: f64 = 0.5;

/// A weighted transition network over a fixed state alphabet.
///
/// Weights are stored row-major: `weights[from * n + to]`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WeightedNetwork {
    labels: Vec<String>,
    weights: Vec<f64>,
    initial_probs: Vec<f64>,
    kind: ModelKind,
    #[cfg_attr(feature = "serde", serde(skip))]
    data: Option<SequenceData>,
}

impl WeightedNetwork {
    /// Wrap an existing row-major weight matrix, without sequence data.
    ///
    /// Networks built this way can be compared but not resampled.
    pub fn from_weights(labels: Vec<String>, weights: Vec<f64>) -> Result<Self> {
        let n = labels.len();
        if weights.len() != n * n {
            return Err(SeqnetError::InvalidInput(format!(
                "weight matrix has {} entries, expected {}",
                weights.len(),
                n * n
            )));
        }
        Ok(Self {
            labels,
            weights,
            initial_probs: vec![0.0; n],
            kind: ModelKind::Frequency,
            data: None,
        })
    }

    /// State labels in index order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of states.
    pub fn n_states(&self) -> usize {
        self.labels.len()
    }

    /// Row-major weight matrix.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Weight of the edge `from → to`.
    pub fn weight(&self, from: usize, to: usize) -> f64 {
        self.weights[from * self.labels.len() + to]
    }

    /// Probability of each state appearing first in a sequence.
    pub fn initial_probs(&self) -> &[f64] {
        &self.initial_probs
    }

    /// Weighting scheme the network was built with.
    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    /// The sequences the network was built from, if retained.
    pub fn data(&self) -> Option<&SequenceData> {
        self.data.as_ref()
    }

    /// A copy with the given weights and no attached sequence data.
    pub(crate) fn with_weights(&self, weights: Vec<f64>) -> Self {
        Self {
            labels: self.labels.clone(),
            weights,
            initial_probs: self.initial_probs.clone(),
            kind: self.kind,
            data: None,
        }
    }
}

impl Summarizable for WeightedNetwork {
    fn summary(&self) -> String {
        let nonzero = self.weights.iter().filter(|&&w| w != 0.0).count();
        format!(
            "WeightedNetwork ({:?}): {} states, {} non-zero edges",
            self.kind,
            self.labels.len(),
            nonzero
        )
    }
}

/// Build a weighted network from `data` under the given scheme.
///
/// Fails with [`SeqnetError::Model`] when the data covers fewer than two
/// distinct states, since a transition structure needs at least two.
pub fn build_network(data: &SequenceData, kind: ModelKind) -> Result<WeightedNetwork> {
    let n = data.n_states();
    let distinct = distinct_states(data);
    if distinct < 2 {
        return Err(SeqnetError::Model(format!(
            "need at least 2 distinct states to build a network, found {}",
            distinct
        )));
    }

    let mut weights = vec![0.0; n * n];
    for seq in data.sequences() {
        accumulate(&mut weights, n, seq, kind);
    }

    match kind {
        ModelKind::RelativeFrequency | ModelKind::Attention => {
            normalize_rows(&mut weights, n);
        }
        ModelKind::Frequency | ModelKind::CoOccurrence => {}
    }

    // Initial state distribution from first elements.
    let mut initial = vec![0.0; n];
    let mut starts = 0usize;
    for seq in data.sequences() {
        if let Some(&first) = seq.first() {
            initial[first] += 1.0;
            starts += 1;
        }
    }
    if starts > 0 {
        for p in initial.iter_mut() {
            *p /= starts as f64;
        }
    }

    Ok(WeightedNetwork {
        labels: data.labels().to_vec(),
        weights,
        initial_probs: initial,
        kind,
        data: Some(data.clone()),
    })
}

fn distinct_states(data: &SequenceData) -> usize {
    let mut seen = vec![false; data.n_states()];
    for seq in data.sequences() {
        for &s in seq {
            seen[s] = true;
        }
    }
    seen.iter().filter(|&&s| s).count()
}

fn accumulate(weights: &mut [f64], n: usize, seq: &[usize], kind: ModelKind) {
    match kind {
        ModelKind::Frequency | ModelKind::RelativeFrequency => {
            for pair in seq.windows(2) {
                weights[pair[0] * n + pair[1]] += 1.0;
            }
        }
        ModelKind::CoOccurrence => {
            for pair in seq.windows(2) {
                weights[pair[0] * n + pair[1]] += 1.0;
                weights[pair[1] * n + pair[0]] += 1.0;
            }
        }
        ModelKind::Attention => {
            // Each earlier state influences every later one with
            // geometrically decaying strength.
            for i in 0..seq.len() {
                for j in (i + 1)..seq.len() {
                    let decay = ATTENTION_DECAY.powi((j - i - 1) as i32);
                    weights[seq[i] * n + seq[j]] += decay;
                }
            }
        }
    }
}

fn normalize_rows(weights: &mut [f64], n: usize) {
    for row in 0..n {
        let sum: f64 = weights[row * n..(row + 1) * n].iter().sum();
        if sum > 0.0 {
            for w in &mut weights[row * n..(row + 1) * n] {
                *w /= sum;
            }
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────
