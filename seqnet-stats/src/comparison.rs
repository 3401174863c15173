//! Weighted-matrix comparison suite.
//!
//! Computes 22 similarity/difference metrics between two equally-sized weight
//! matrices, grouped into five categories:
//!
//! - **Deviations** — elementwise difference summaries
//! - **Correlations** — Pearson, Spearman, Kendall tau-b, distance correlation
//! - **Dissimilarities** — Euclidean, Manhattan, Canberra, Bray-Curtis, Frobenius
//! - **Similarities** — cosine, Jaccard, Dice, overlap, RV coefficient
//! - **Pattern** — rank agreement, sign agreement
//!
//! Vector-style metrics operate on the column-major flattening of the full
//! n×n matrix, diagonal included; this ordering is a compatibility contract
//! (rank agreement in particular is not invariant under reordering). Any
//! denominator smaller than 1e-14 in magnitude yields NaN for that metric,
//! and comparing matrices of different dimensions yields NaN for all 22.
//!
//! The distance-correlation and RV-coefficient estimators are intentionally
//! the biased forms; do not replace them with the unbiased textbook
//! variants.

use seqnet_core::Summarizable;

use crate::descriptive;
use crate::model::WeightedNetwork;
use crate::rank::{mid_ranks, tie_pairs};

/// Denominator guard: anything smaller than this is treated as zero.
const EPS: f64 = 1e-14;

// ── Metric catalog ─────────────────────────────────────────────────────────

/// Category of a comparison metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum MetricCategory {
    /// Elementwise deviation summaries.
    Deviation,
    /// Correlation coefficients.
    Correlation,
    /// Distance-style dissimilarities.
    Dissimilarity,
    /// Similarity coefficients.
    Similarity,
    /// Structural pattern agreement.
    Pattern,
}

impl MetricCategory {
    /// Human-readable category name.
    pub fn label(&self) -> &'static str {
        match self {
            MetricCategory::Deviation => "Deviations",
            MetricCategory::Correlation => "Correlations",
            MetricCategory::Dissimilarity => "Dissimilarities",
            MetricCategory::Similarity => "Similarities",
            MetricCategory::Pattern => "Pattern",
        }
    }
}

/// One entry of the metric catalog.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MetricRecord {
    /// Stable identifier (column key in downstream tables).
    pub key: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    /// Metric category.
    pub category: MetricCategory,
}

/// The fixed, ordered catalog of all 22 comparison metrics.
///
/// The ordering is a contract: it determines row order in every downstream
/// summary and table.
pub const METRICS: [MetricRecord; 22] = [
    MetricRecord { key: "mean_abs_diff", label: "Mean Absolute Difference", category: MetricCategory::Deviation },
    MetricRecord { key: "median_abs_diff", label: "Median Absolute Difference", category: MetricCategory::Deviation },
    MetricRecord { key: "max_abs_diff", label: "Maximum Absolute Difference", category: MetricCategory::Deviation },
    MetricRecord { key: "rms_diff", label: "Root Mean Square Difference", category: MetricCategory::Deviation },
    MetricRecord { key: "rel_mad", label: "Relative Mean Absolute Difference", category: MetricCategory::Deviation },
    MetricRecord { key: "cv_ratio", label: "Coefficient of Variation Ratio", category: MetricCategory::Deviation },
    MetricRecord { key: "pearson", label: "Pearson Correlation", category: MetricCategory::Correlation },
    MetricRecord { key: "spearman", label: "Spearman Correlation", category: MetricCategory::Correlation },
    MetricRecord { key: "kendall", label: "Kendall Tau-b", category: MetricCategory::Correlation },
    MetricRecord { key: "dist_cor", label: "Distance Correlation", category: MetricCategory::Correlation },
    MetricRecord { key: "euclidean", label: "Euclidean Distance", category: MetricCategory::Dissimilarity },
    MetricRecord { key: "manhattan", label: "Manhattan Distance", category: MetricCategory::Dissimilarity },
    MetricRecord { key: "canberra", label: "Canberra Distance", category: MetricCategory::Dissimilarity },
    MetricRecord { key: "bray_curtis", label: "Bray-Curtis Dissimilarity", category: MetricCategory::Dissimilarity },
    MetricRecord { key: "frobenius", label: "Frobenius Distance", category: MetricCategory::Dissimilarity },
    MetricRecord { key: "cosine", label: "Cosine Similarity", category: MetricCategory::Similarity },
    MetricRecord { key: "jaccard", label: "Jaccard Similarity", category: MetricCategory::Similarity },
    MetricRecord { key: "dice", label: "Dice Similarity", category: MetricCategory::Similarity },
    MetricRecord { key: "overlap", label: "Overlap Coefficient", category: MetricCategory::Similarity },
    MetricRecord { key: "rv", label: "RV Coefficient", category: MetricCategory::Similarity },
    MetricRecord { key: "rank_agreement", label: "Rank Agreement", category: MetricCategory::Pattern },
    MetricRecord { key: "sign_agreement", label: "Sign Agreement", category: MetricCategory::Pattern },
];

/// Position of `key` in the catalog, if present.
pub fn metric_index(key: &str) -> Option<usize> {
    METRICS.iter().position(|m| m.key == key)
}

// ── Comparison result ──────────────────────────────────────────────────────

/// The 22 metric values for one matrix pair, in catalog order.
///
/// Either all 22 keys carry a value (possibly NaN for individually undefined
/// metrics) or the whole result is the all-NaN sentinel produced by a
/// dimension mismatch.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ComparisonResult {
    values: [f64; 22],
}

impl ComparisonResult {
    /// The all-NaN sentinel (incomparable inputs).
    pub fn undefined() -> Self {
        Self {
            values: [f64::NAN; 22],
        }
    }

    /// Metric value by catalog position.
    pub fn value(&self, index: usize) -> f64 {
        self.values[index]
    }

    /// Metric value by key.
    pub fn get(&self, key: &str) -> Option<f64> {
        metric_index(key).map(|i| self.values[i])
    }

    /// Iterate (record, value) pairs in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static MetricRecord, f64)> + '_ {
        METRICS.iter().zip(self.values.iter().copied())
    }
}

impl Summarizable for ComparisonResult {
    fn summary(&self) -> String {
        let defined = self.values.iter().filter(|v| v.is_finite()).count();
        format!("ComparisonResult: {}/22 metrics defined", defined)
    }
}

// ── Entry points ───────────────────────────────────────────────────────────

/// Compare two weighted networks over all 22 metrics.
///
/// Networks with different state counts are incomparable and yield the
/// all-NaN sentinel.
pub fn compare_networks(a: &WeightedNetwork, b: &WeightedNetwork) -> ComparisonResult {
    compare_weight_matrices(a.weights(), a.n_states(), b.weights(), b.n_states())
}

/// Compare two row-major `n×n` weight matrices over all 22 metrics.
pub fn compare_weight_matrices(
    a: &[f64],
    n_a: usize,
    b: &[f64],
    n_b: usize,
) -> ComparisonResult {
    if n_a != n_b || a.len() != n_a * n_a || b.len() != n_b * n_b {
        return ComparisonResult::undefined();
    }
    let n = n_a;

    // Column-major flattening, diagonal included.
    let x = flatten_column_major(a, n);
    let y = flatten_column_major(b, n);

    let abs_diff: Vec<f64> = x.iter().zip(&y).map(|(xi, yi)| (xi - yi).abs()).collect();
    let euclid = euclidean(&x, &y);

    let mut values = [f64::NAN; 22];
    values[0] = descriptive::mean(&abs_diff);
    values[1] = descriptive::median(&abs_diff);
    values[2] = max_of(&abs_diff);
    values[3] = rms_diff(&x, &y);
    values[4] = rel_mad(&abs_diff, &y);
    values[5] = cv_ratio(&x, &y);
    values[6] = pearson(&x, &y);
    values[7] = spearman(&x, &y);
    values[8] = kendall_tau_b(&x, &y);
    values[9] = distance_correlation(&x, &y);
    values[10] = euclid;
    values[11] = abs_diff.iter().sum();
    values[12] = canberra(&x, &y);
    values[13] = bray_curtis(&x, &y);
    values[14] = guarded_div(euclid, (n as f64 / 2.0).sqrt());
    values[15] = cosine(&x, &y);
    values[16] = jaccard(&x, &y);
    values[17] = dice(&x, &y);
    values[18] = overlap(&x, &y);
    values[19] = rv_coefficient(a, b, n);
    values[20] = rank_agreement(a, b, n);
    values[21] = sign_agreement(&x, &y);

    ComparisonResult { values }
}

// ── Helpers ────────────────────────────────────────────────────────────────

fn flatten_column_major(m: &[f64], n: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(n * n);
    for col in 0..n {
        for row in 0..n {
            out.push(m[row * n + col]);
        }
    }
    out
}

/// `num / den`, or NaN when the denominator is effectively zero.
fn guarded_div(num: f64, den: f64) -> f64 {
    if den.abs() < EPS {
        f64::NAN
    } else {
        num / den
    }
}

fn max_of(data: &[f64]) -> f64 {
    if data.is_empty() {
        return f64::NAN;
    }
    data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

fn sgn(v: f64) -> i8 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

// ── Deviations ─────────────────────────────────────────────────────────────

fn rms_diff(x: &[f64], y: &[f64]) -> f64 {
    if x.is_empty() {
        return f64::NAN;
    }
    let ss: f64 = x.iter().zip(y).map(|(a, b)| (a - b).powi(2)).sum();
    (ss / x.len() as f64).sqrt()
}

fn rel_mad(abs_diff: &[f64], y: &[f64]) -> f64 {
    let mean_abs_y = descriptive::mean(&y.iter().map(|v| v.abs()).collect::<Vec<_>>());
    guarded_div(descriptive::mean(abs_diff), mean_abs_y)
}

fn cv_ratio(x: &[f64], y: &[f64]) -> f64 {
    let sd_x = descriptive::std_dev(x, 1);
    let sd_y = descriptive::std_dev(y, 1);
    guarded_div(
        sd_x * descriptive::mean(y),
        descriptive::mean(x) * sd_y,
    )
}

// ── Correlations ───────────────────────────────────────────────────────────

fn pearson(x: &[f64], y: &[f64]) -> f64 {
    if x.is_empty() {
        return f64::NAN;
    }
    let mx = descriptive::mean(x);
    let my = descriptive::mean(y);
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mx;
        let dy = yi - my;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    guarded_div(cov, (var_x * var_y).sqrt())
}

fn spearman(x: &[f64], y: &[f64]) -> f64 {
    pearson(&mid_ranks(x), &mid_ranks(y))
}

fn kendall_tau_b(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len();
    if n < 2 {
        return f64::NAN;
    }
    let mut concordant = 0.0_f64;
    let mut discordant = 0.0_f64;
    for i in 0..n {
        for j in (i + 1)..n {
            let dx = sgn(x[j] - x[i]);
            let dy = sgn(y[j] - y[i]);
            if dx != 0 && dy != 0 {
                if dx == dy {
                    concordant += 1.0;
                } else {
                    discordant += 1.0;
                }
            }
        }
    }
    let n0 = (n * (n - 1)) as f64 / 2.0;
    let tx = tie_pairs(x);
    let ty = tie_pairs(y);
    guarded_div(concordant - discordant, ((n0 - tx) * (n0 - ty)).sqrt())
}

/// Biased distance correlation on double-centered absolute-difference
/// distance matrices; may be negative.
fn distance_correlation(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len();
    if n == 0 {
        return f64::NAN;
    }
    let n_f = n as f64;

    // Row means and grand means of the |x_i - x_j| distance matrices,
    // computed without materializing the full n² matrices.
    let mut row_x = vec![0.0; n];
    let mut row_y = vec![0.0; n];
    for i in 0..n {
        for j in 0..n {
            row_x[i] += (x[i] - x[j]).abs();
            row_y[i] += (y[i] - y[j]).abs();
        }
        row_x[i] /= n_f;
        row_y[i] /= n_f;
    }
    let grand_x = row_x.iter().sum::<f64>() / n_f;
    let grand_y = row_y.iter().sum::<f64>() / n_f;

    let mut vxy = 0.0;
    let mut vx = 0.0;
    let mut vy = 0.0;
    for i in 0..n {
        for j in 0..n {
            let a = (x[i] - x[j]).abs() - row_x[i] - row_x[j] + grand_x;
            let b = (y[i] - y[j]).abs() - row_y[i] - row_y[j] + grand_y;
            vxy += a * b;
            vx += a * a;
            vy += b * b;
        }
    }
    vxy /= n_f * n_f;
    vx /= n_f * n_f;
    vy /= n_f * n_f;

    guarded_div(vxy, (vx * vy).sqrt())
}

// ── Dissimilarities ────────────────────────────────────────────────────────

fn euclidean(x: &[f64], y: &[f64]) -> f64 {
    x.iter()
        .zip(y)
        .map(|(a, b)| (a - b).powi(2))
        .sum::<f64>()
        .sqrt()
}

fn canberra(x: &[f64], y: &[f64]) -> f64 {
    x.iter()
        .zip(y)
        .filter_map(|(a, b)| {
            let den = a.abs() + b.abs();
            if den < EPS {
                None
            } else {
                Some((a - b).abs() / den)
            }
        })
        .sum()
}

fn bray_curtis(x: &[f64], y: &[f64]) -> f64 {
    let num: f64 = x.iter().zip(y).map(|(a, b)| (a - b).abs()).sum();
    let den: f64 = x.iter().zip(y).map(|(a, b)| a.abs() + b.abs()).sum();
    guarded_div(num, den)
}

// ── Similarities ───────────────────────────────────────────────────────────

fn cosine(x: &[f64], y: &[f64]) -> f64 {
    let dot: f64 = x.iter().zip(y).map(|(a, b)| a * b).sum();
    let nx: f64 = x.iter().map(|a| a * a).sum();
    let ny: f64 = y.iter().map(|a| a * a).sum();
    guarded_div(dot, (nx * ny).sqrt())
}

fn jaccard(x: &[f64], y: &[f64]) -> f64 {
    let min_sum: f64 = x.iter().zip(y).map(|(a, b)| a.abs().min(b.abs())).sum();
    let max_sum: f64 = x.iter().zip(y).map(|(a, b)| a.abs().max(b.abs())).sum();
    guarded_div(min_sum, max_sum)
}

fn dice(x: &[f64], y: &[f64]) -> f64 {
    let min_sum: f64 = x.iter().zip(y).map(|(a, b)| a.abs().min(b.abs())).sum();
    let abs_sum: f64 = x.iter().map(|a| a.abs()).sum::<f64>()
        + y.iter().map(|b| b.abs()).sum::<f64>();
    guarded_div(2.0 * min_sum, abs_sum)
}

fn overlap(x: &[f64], y: &[f64]) -> f64 {
    let min_sum: f64 = x.iter().zip(y).map(|(a, b)| a.abs().min(b.abs())).sum();
    let sum_x: f64 = x.iter().map(|a| a.abs()).sum();
    let sum_y: f64 = y.iter().map(|b| b.abs()).sum();
    guarded_div(min_sum, sum_x.min(sum_y))
}

/// RV coefficient via column-centered cross-product matrices (biased form).
fn rv_coefficient(a: &[f64], b: &[f64], n: usize) -> f64 {
    if n == 0 {
        return f64::NAN;
    }

    let xc = center_columns(a, n);
    let yc = center_columns(b, n);

    // S = M·Mᵗ for each centered matrix; only the traces of the products
    // are needed.
    let s1 = cross_product(&xc, n);
    let s2 = cross_product(&yc, n);

    let mut tr_12 = 0.0;
    let mut tr_11 = 0.0;
    let mut tr_22 = 0.0;
    for i in 0..n * n {
        tr_12 += s1[i] * s2[i];
        tr_11 += s1[i] * s1[i];
        tr_22 += s2[i] * s2[i];
    }

    guarded_div(tr_12, (tr_11 * tr_22).sqrt())
}

fn center_columns(m: &[f64], n: usize) -> Vec<f64> {
    let mut out = m.to_vec();
    for col in 0..n {
        let mean = (0..n).map(|row| m[row * n + col]).sum::<f64>() / n as f64;
        for row in 0..n {
            out[row * n + col] -= mean;
        }
    }
    out
}

/// `M·Mᵗ` for a row-major n×n matrix.
fn cross_product(m: &[f64], n: usize) -> Vec<f64> {
    let mut out = vec![0.0; n * n];
    for i in 0..n {
        for j in 0..n {
            let mut acc = 0.0;
            for k in 0..n {
                acc += m[i * n + k] * m[j * n + k];
            }
            out[i * n + j] = acc;
        }
    }
    out
}

// ── Pattern ────────────────────────────────────────────────────────────────

/// Fraction of matching signs between consecutive row differences
/// (`matrix[i+1] - matrix[i]`) of the two matrices.
fn rank_agreement(a: &[f64], b: &[f64], n: usize) -> f64 {
    if n < 2 {
        return f64::NAN;
    }
    let mut matches = 0usize;
    let total = (n - 1) * n;
    for i in 0..n - 1 {
        for j in 0..n {
            let da = a[(i + 1) * n + j] - a[i * n + j];
            let db = b[(i + 1) * n + j] - b[i * n + j];
            if sgn(da) == sgn(db) {
                matches += 1;
            }
        }
    }
    matches as f64 / total as f64
}

/// Fraction of elements with matching sign across the flattened vectors.
fn sign_agreement(x: &[f64], y: &[f64]) -> f64 {
    if x.is_empty() {
        return f64::NAN;
    }
    let matches = x
        .iter()
        .zip(y)
        .filter(|(a, b)| sgn(**a) == sgn(**b))
        .count();
    matches as f64 / x.len() as f64
}

// ── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-6;

    fn reference_pair() -> (Vec<f64>, Vec<f64>) {
        #[rustfmt::skip]
        let a = vec![
            0.0, 0.6, 0.4,
            0.3, 0.0, 0.7,
            0.5, 0.5, 0.0,
        ];
        #[rustfmt::skip]
        let b = vec![
            0.0, 0.4, 0.6,
            0.5, 0.0, 0.5,
            0.3, 0.7, 0.0,
        ];
        (a, b)
    }

    #[test]
    fn catalog_has_22_ordered_metrics() {
        assert_eq!(METRICS.len(), 22);
        // Category block structure is part of the contract
        assert_eq!(METRICS[0].category, MetricCategory::Deviation);
        assert_eq!(METRICS[6].category, MetricCategory::Correlation);
        assert_eq!(METRICS[10].category, MetricCategory::Dissimilarity);
        assert_eq!(METRICS[15].category, MetricCategory::Similarity);
        assert_eq!(METRICS[20].category, MetricCategory::Pattern);
        // Keys are unique
        for (i, m) in METRICS.iter().enumerate() {
            assert_eq!(metric_index(m.key), Some(i));
        }
    }

    #[test]
    fn reference_scenario_values() {
        let (a, b) = reference_pair();
        let r = compare_weight_matrices(&a, 3, &b, 3);
        assert!((r.get("mean_abs_diff").unwrap() - 0.133_333_3).abs() < TOL);
        assert!((r.get("pearson").unwrap() - 0.8).abs() < TOL);
        assert!((r.get("cosine").unwrap() - 0.925).abs() < TOL);
        assert!((r.get("rv").unwrap() - 0.974_84).abs() < 1e-4);
    }

    #[test]
    fn reference_scenario_deviations() {
        let (a, b) = reference_pair();
        let r = compare_weight_matrices(&a, 3, &b, 3);
        // All off-diagonal absolute differences are 0.2; diagonal 0
        assert!((r.get("max_abs_diff").unwrap() - 0.2).abs() < TOL);
        assert!((r.get("median_abs_diff").unwrap() - 0.2).abs() < TOL);
        assert!((r.get("manhattan").unwrap() - 1.2).abs() < TOL);
        assert!((r.get("euclidean").unwrap() - (6.0_f64 * 0.04).sqrt()).abs() < TOL);
        assert!(
            (r.get("frobenius").unwrap()
                - r.get("euclidean").unwrap() / (1.5_f64).sqrt())
            .abs()
                < TOL
        );
        // mean |y| = mean |x| = 1/3 → rel_mad = 0.1333/0.3333
        assert!((r.get("rel_mad").unwrap() - 0.4).abs() < TOL);
    }

    #[test]
    fn reference_scenario_similarities() {
        let (a, b) = reference_pair();
        let r = compare_weight_matrices(&a, 3, &b, 3);
        // Σmin = 2.4, Σmax = 3.6 over the 9 elements
        assert!((r.get("jaccard").unwrap() - 2.4 / 3.6).abs() < TOL);
        assert!((r.get("dice").unwrap() - 2.0 * 2.4 / 6.0).abs() < TOL);
        assert!((r.get("overlap").unwrap() - 2.4 / 3.0).abs() < TOL);
        // Zeros coincide, so every sign matches
        assert!((r.get("sign_agreement").unwrap() - 1.0).abs() < TOL);
    }

    #[test]
    fn self_comparison_is_exact() {
        let (a, _) = reference_pair();
        let r = compare_weight_matrices(&a, 3, &a, 3);
        for key in ["mean_abs_diff", "median_abs_diff", "max_abs_diff", "rms_diff",
                    "rel_mad", "euclidean", "manhattan", "canberra", "bray_curtis",
                    "frobenius"] {
            assert!(r.get(key).unwrap().abs() < 1e-10, "{} != 0", key);
        }
        for key in ["cv_ratio", "pearson", "spearman", "kendall", "dist_cor",
                    "cosine", "jaccard", "dice", "overlap", "rv",
                    "rank_agreement", "sign_agreement"] {
            assert!((r.get(key).unwrap() - 1.0).abs() < 1e-10, "{} != 1", key);
        }
    }

    #[test]
    fn dimension_mismatch_is_all_nan() {
        let a = vec![0.5; 9];
        let b = vec![0.5; 4];
        let r = compare_weight_matrices(&a, 3, &b, 2);
        for (_, v) in r.iter() {
            assert!(v.is_nan());
        }
    }

    #[test]
    fn all_zero_matrices_yield_nan_ratios() {
        let z = vec![0.0; 9];
        let r = compare_weight_matrices(&z, 3, &z, 3);
        // Ratio metrics are undefined on all-zero input
        for key in ["rel_mad", "cv_ratio", "pearson", "cosine", "jaccard",
                    "dice", "overlap", "rv", "bray_curtis"] {
            assert!(r.get(key).unwrap().is_nan(), "{} should be NaN", key);
        }
        // Absolute deviations remain well-defined
        assert!(r.get("mean_abs_diff").unwrap().abs() < TOL);
        assert!(r.get("euclidean").unwrap().abs() < TOL);
    }

    #[test]
    fn flattening_is_column_major() {
        // Asymmetric matrix where row- and column-major flattening differ
        #[rustfmt::skip]
        let a = vec![
            1.0, 2.0,
            3.0, 4.0,
        ];
        let flat = flatten_column_major(&a, 2);
        assert_eq!(flat, vec![1.0, 3.0, 2.0, 4.0]);
    }

    #[test]
    fn kendall_tau_reference() {
        // Hand-checked on small vectors via concordant/discordant counts
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [1.0, 3.0, 2.0, 4.0];
        // Pairs: 6 total, 5 concordant, 1 discordant, no ties → tau = 4/6
        let tau = kendall_tau_b(&x, &y);
        assert!((tau - 4.0 / 6.0).abs() < TOL);
    }

    #[test]
    fn kendall_all_tied_is_nan() {
        let x = [2.0, 2.0, 2.0];
        let y = [1.0, 2.0, 3.0];
        assert!(kendall_tau_b(&x, &y).is_nan());
    }

    #[test]
    fn distance_correlation_identical_is_one() {
        let x = [0.1, 0.5, 0.3, 0.9];
        assert!((distance_correlation(&x, &x) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn distance_correlation_can_be_negative() {
        // The biased estimator is not clamped at zero
        let x = [0.0, 1.0, 0.0, 1.0, 0.0, 1.0];
        let y = [0.3, 0.3, 0.7, 0.7, 0.5, 0.5];
        let d = distance_correlation(&x, &y);
        assert!(d.is_finite());
        assert!(d < 1.0);
    }

    #[test]
    fn canberra_skips_joint_zeros() {
        let x = [0.0, 0.5, 0.2];
        let y = [0.0, 0.5, 0.6];
        // Joint-zero entry contributes nothing; second entry 0, third 0.5
        assert!((canberra(&x, &y) - 0.5).abs() < TOL);
    }

    #[test]
    fn canberra_one_sided_zero_contributes_one() {
        // An entry that is zero on exactly one side still counts, and its
        // term is |x-y|/(|x|+|y|) = 1 whatever the non-zero magnitude.
        let x = [0.0, 0.0, 0.4];
        let y = [0.3, 0.0, 0.4];
        assert!((canberra(&x, &y) - 1.0).abs() < TOL);
        let y_small = [1e-3, 0.0, 0.4];
        assert!((canberra(&x, &y_small) - 1.0).abs() < TOL);
    }

    #[test]
    fn rank_agreement_detects_inverted_structure() {
        #[rustfmt::skip]
        let a = vec![
            0.1, 0.2,
            0.5, 0.9,
        ];
        // Row differences flipped in sign
        #[rustfmt::skip]
        let b = vec![
            0.5, 0.9,
            0.1, 0.2,
        ];
        let r = compare_weight_matrices(&a, 2, &b, 2);
        assert!(r.get("rank_agreement").unwrap().abs() < TOL);
    }

    #[test]
    fn single_state_network_rank_agreement_nan() {
        let a = vec![0.7];
        let r = compare_weight_matrices(&a, 1, &a, 1);
        assert!(r.get("rank_agreement").unwrap().is_nan());
        assert!((r.get("sign_agreement").unwrap() - 1.0).abs() < TOL);
    }

    #[test]
    fn result_iteration_order_matches_catalog() {
        let (a, b) = reference_pair();
        let r = compare_weight_matrices(&a, 3, &b, 3);
        let keys: Vec<&str> = r.iter().map(|(m, _)| m.key).collect();
        let expected: Vec<&str> = METRICS.iter().map(|m| m.key).collect();
        assert_eq!(keys, expected);
    }
}
