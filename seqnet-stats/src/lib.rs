//! Statistical inference and resampling for weighted transition networks.
//!
//! Features:
//!
//! - **Network models** — transition networks from event sequences under four weighting schemes
//! - **Matrix comparison** — a fixed 22-metric suite of deviations, correlations, distances, similarities
//! - **Resampling** — bootstrap edge stability, two-group permutation tests, split-half reliability
//! - **Group tests** — ANOVA and Kruskal-Wallis omnibus tests with Welch and Mann-Whitney post-hocs
//! - **Multiple testing correction** — Bonferroni, Holm, Benjamini-Hochberg
//! - **Distributions** — normal, Student t, chi-squared, and F primitives
//!
//! All randomized routines take an explicit seed and are fully deterministic.
//! Degenerate-but-valid input yields NaN; structurally invalid input yields
//! [`seqnet_core::SeqnetError::InvalidInput`].

pub mod bootstrap;
pub mod comparison;
pub mod correction;
pub mod descriptive;
pub mod distribution;
pub mod model;
pub mod permutation;
pub mod rank;
pub mod reliability;
pub mod rng;
pub mod testing;

pub use bootstrap::{bootstrap_network, BootstrapOptions, BootstrapResult, StabilityCriterion};
pub use comparison::{compare_networks, compare_weight_matrices, ComparisonResult, METRICS};
pub use correction::{adjust, CorrectionMethod};
pub use model::{build_network, ModelKind, SequenceData, WeightedNetwork};
pub use permutation::{permutation_test, PermutationOptions, PermutationResult};
pub use reliability::{split_half_reliability, ReliabilityOptions, ReliabilityResult};
pub use testing::{kruskal_wallis, one_way_anova, post_hoc_pairwise, GroupSample, PairwiseTest};
