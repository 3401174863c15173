//! Omnibus and post-hoc group comparison tests.
//!
//! Provides parametric ([`one_way_anova`], [`welch_t`]) and non-parametric
//! ([`kruskal_wallis`], [`mann_whitney_u`]) tests over labeled groups of
//! scalar observations, plus [`post_hoc_pairwise`] which runs a pairwise
//! test for every group pair and adjusts the p-values for multiple
//! comparisons.
//!
//! All tests are total functions: degenerate input (zero-size groups, zero
//! variance, all-tied data) yields NaN statistics or the documented
//! no-evidence defaults instead of an error.

use seqnet_core::{Scored, Summarizable};

use crate::correction::{adjust, CorrectionMethod};
use crate::descriptive;
use crate::distribution::{ChiSquared, Distribution, FDistribution, Normal, StudentT};
use crate::rank::{mid_ranks, tie_term};

/// A labeled group of scalar observations.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupSample {
    /// Group label.
    pub label: String,
    /// Observations, in caller order.
    pub values: Vec<f64>,
}

impl GroupSample {
    /// Create a labeled group.
    pub fn new(label: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            values,
        }
    }
}

/// Result of an omnibus group test.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct OmnibusResult {
    /// The test statistic (F or H).
    pub statistic: f64,
    /// Numerator degrees of freedom.
    pub df1: f64,
    /// Denominator degrees of freedom (NaN for Kruskal-Wallis).
    pub df2: f64,
    /// P-value in [0, 1].
    pub p_value: f64,
    /// Effect size (η² for ANOVA, ε² for Kruskal-Wallis), clamped to ≥ 0.
    pub effect_size: f64,
    /// Name of the effect size measure.
    pub effect_name: &'static str,
    /// Name of the test method.
    pub method: &'static str,
}

impl OmnibusResult {
    fn undefined(method: &'static str, effect_name: &'static str) -> Self {
        Self {
            statistic: f64::NAN,
            df1: f64::NAN,
            df2: f64::NAN,
            p_value: f64::NAN,
            effect_size: f64::NAN,
            effect_name,
            method,
        }
    }
}

impl Scored for OmnibusResult {
    fn score(&self) -> f64 {
        self.p_value
    }
}

impl Summarizable for OmnibusResult {
    fn summary(&self) -> String {
        format!(
            "{}: statistic={:.4}, df1={:.1}, df2={:.1}, p={:.6}, {}={:.4}",
            self.method, self.statistic, self.df1, self.df2, self.p_value,
            self.effect_name, self.effect_size,
        )
    }
}

// ── One-way ANOVA ──────────────────────────────────────────────────────────

/// One-way analysis of variance (F-test) over `k` groups.
///
/// Degenerate cases: fewer than 2 groups or any empty group yields an
/// all-NaN result; `df2 ≤ 0` or zero within-group variance yields
/// `F = 0, p = 1` (no evidence, not an error).
pub fn one_way_anova(groups: &[GroupSample]) -> OmnibusResult {
    let k = groups.len();
    if k < 2 || groups.iter().any(|g| g.values.is_empty()) {
        return OmnibusResult::undefined("One-way ANOVA", "eta_squared");
    }

    let n_total: usize = groups.iter().map(|g| g.values.len()).sum();
    let grand_sum: f64 = groups.iter().flat_map(|g| g.values.iter()).sum();
    let grand_mean = grand_sum / n_total as f64;

    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for g in groups {
        let group_mean = descriptive::mean(&g.values);
        ss_between += g.values.len() as f64 * (group_mean - grand_mean).powi(2);
        ss_within += g
            .values
            .iter()
            .map(|&x| (x - group_mean).powi(2))
            .sum::<f64>();
    }

    let df1 = (k - 1) as f64;
    let df2 = n_total as f64 - k as f64;

    let ss_total = ss_between + ss_within;
    let eta_squared = if ss_total > 0.0 {
        ss_between / ss_total
    } else {
        0.0
    };

    if df2 <= 0.0 || ss_within == 0.0 {
        return OmnibusResult {
            statistic: 0.0,
            df1,
            df2,
            p_value: 1.0,
            effect_size: eta_squared,
            effect_name: "eta_squared",
            method: "One-way ANOVA",
        };
    }

    let f = (ss_between / df1) / (ss_within / df2);
    let p_value = FDistribution::new(df1, df2)
        .map(|d| (1.0 - d.cdf(f)).clamp(0.0, 1.0))
        .unwrap_or(f64::NAN);

    OmnibusResult {
        statistic: f,
        df1,
        df2,
        p_value,
        effect_size: eta_squared,
        effect_name: "eta_squared",
        method: "One-way ANOVA",
    }
}

// ── Kruskal-Wallis ─────────────────────────────────────────────────────────

/// Kruskal-Wallis H-test with tie correction over `k` groups.
///
/// Pools all observations, assigns mid-ranks, computes H, and divides by the
/// tie correction `c = 1 - Σ(t³-t)/(N³-N)` when `c > 0`. The denominator
/// degrees of freedom are NaN by definition.
pub fn kruskal_wallis(groups: &[GroupSample]) -> OmnibusResult {
    let k = groups.len();
    if k < 2 || groups.iter().any(|g| g.values.is_empty()) {
        return OmnibusResult::undefined("Kruskal-Wallis", "epsilon_squared");
    }

    let pooled: Vec<f64> = groups.iter().flat_map(|g| g.values.iter().copied()).collect();
    let n = pooled.len();
    let n_f = n as f64;
    let ranks = mid_ranks(&pooled);

    // Per-group rank sums, walking the pooled layout.
    let mut h = 0.0;
    let mut offset = 0;
    for g in groups {
        let sz = g.values.len();
        let rank_sum: f64 = ranks[offset..offset + sz].iter().sum();
        h += rank_sum * rank_sum / sz as f64;
        offset += sz;
    }
    h = 12.0 / (n_f * (n_f + 1.0)) * h - 3.0 * (n_f + 1.0);

    let correction = 1.0 - tie_term(&pooled) / (n_f * n_f * n_f - n_f);
    let h_corrected = if correction > 0.0 { h / correction } else { h };

    let df1 = (k - 1) as f64;
    let p_value = if h_corrected.is_finite() && h_corrected > 0.0 {
        ChiSquared::new(df1)
            .map(|d| (1.0 - d.cdf(h_corrected)).clamp(0.0, 1.0))
            .unwrap_or(f64::NAN)
    } else if h_corrected == 0.0 {
        1.0
    } else {
        f64::NAN
    };

    let epsilon_squared = if n > k {
        ((h_corrected - k as f64 + 1.0) / (n_f - k as f64)).max(0.0)
    } else {
        0.0
    };

    OmnibusResult {
        statistic: h_corrected,
        df1,
        df2: f64::NAN,
        p_value,
        effect_size: epsilon_squared,
        effect_name: "epsilon_squared",
        method: "Kruskal-Wallis",
    }
}

// ── Pairwise tests ─────────────────────────────────────────────────────────

/// Pairwise test used by [`post_hoc_pairwise`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PairwiseTest {
    /// Welch's t-test (unequal variances).
    Welch,
    /// Mann-Whitney U with normal approximation and tie correction.
    MannWhitney,
}

/// Welch's t-test for two groups with unequal variances.
///
/// Returns `(t, p)`. Zero standard error yields `(0, 1)`; empty groups
/// propagate NaN.
pub fn welch_t(x: &[f64], y: &[f64]) -> (f64, f64) {
    let n1 = x.len() as f64;
    let n2 = y.len() as f64;
    let m1 = descriptive::mean(x);
    let m2 = descriptive::mean(y);
    let v1 = descriptive::variance(x, 1);
    let v2 = descriptive::variance(y, 1);

    let vn1 = v1 / n1;
    let vn2 = v2 / n2;
    let se = (vn1 + vn2).sqrt();
    if se == 0.0 {
        return (0.0, 1.0);
    }

    let t = (m1 - m2) / se;

    // Welch-Satterthwaite, with each (n-1) guarded to ≥ 1.
    let d1 = (x.len().saturating_sub(1)).max(1) as f64;
    let d2 = (y.len().saturating_sub(1)).max(1) as f64;
    let df = (vn1 + vn2).powi(2) / (vn1 * vn1 / d1 + vn2 * vn2 / d2);

    if !t.is_finite() || !df.is_finite() || df <= 0.0 {
        return (t, f64::NAN);
    }

    let p = StudentT::new(df)
        .map(|d| (2.0 * (1.0 - d.cdf(t.abs()))).clamp(0.0, 1.0))
        .unwrap_or(f64::NAN);
    (t, p)
}

/// Mann-Whitney U test with normal approximation and tie correction.
///
/// Returns `(U, p)` with `U = min(U1, U2)`. Zero rank variance (all tied)
/// yields `p = 1`.
pub fn mann_whitney_u(x: &[f64], y: &[f64]) -> (f64, f64) {
    let n1 = x.len();
    let n2 = y.len();
    let n = n1 + n2;

    let mut pooled: Vec<f64> = Vec::with_capacity(n);
    pooled.extend_from_slice(x);
    pooled.extend_from_slice(y);
    let ranks = mid_ranks(&pooled);

    let r1: f64 = ranks[..n1].iter().sum();
    let u1 = r1 - (n1 * (n1 + 1)) as f64 / 2.0;
    let u2 = (n1 * n2) as f64 - u1;
    let u = u1.min(u2);

    let n_f = n as f64;
    let mu = (n1 * n2) as f64 / 2.0;
    let tie_adjust = if n >= 2 {
        tie_term(&pooled) / (n_f * (n_f - 1.0))
    } else {
        0.0
    };
    let sigma = ((n1 * n2) as f64 / 12.0 * ((n_f + 1.0) - tie_adjust)).sqrt();

    if !(sigma > 0.0) {
        return (u, 1.0);
    }

    // U = min(U1, U2) ≤ μ, so z ≤ 0 and the two-tailed p doubles the left
    // tail.
    let z = (u - mu) / sigma;
    let p = (2.0 * Normal::standard().cdf(z)).min(1.0);
    (u, p)
}

// ── Post-hoc driver ────────────────────────────────────────────────────────

/// Result of one post-hoc pairwise comparison.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PairwiseResult {
    /// First group label.
    pub group_a: String,
    /// Second group label.
    pub group_b: String,
    /// Raw test statistic (t or U).
    pub statistic: f64,
    /// Unadjusted p-value.
    pub p_value: f64,
    /// Adjusted p-value.
    pub p_adjusted: f64,
    /// Whether the adjusted p-value is strictly below the significance level.
    pub significant: bool,
}

impl Scored for PairwiseResult {
    fn score(&self) -> f64 {
        self.p_adjusted
    }
}

impl Summarizable for PairwiseResult {
    fn summary(&self) -> String {
        format!(
            "{} vs {}: statistic={:.4}, p={:.6}, p_adj={:.6}{}",
            self.group_a,
            self.group_b,
            self.statistic,
            self.p_value,
            self.p_adjusted,
            if self.significant { " *" } else { "" },
        )
    }
}

/// Run `test` for every unordered group pair and adjust the p-values.
///
/// Returns exactly `k(k-1)/2` records for `k` groups, in (i, j) order with
/// `i < j` following input order. A pair is flagged significant when its
/// adjusted p-value is strictly below `level`.
pub fn post_hoc_pairwise(
    groups: &[GroupSample],
    test: PairwiseTest,
    method: CorrectionMethod,
    level: f64,
) -> Vec<PairwiseResult> {
    let k = groups.len();
    let mut pairs = Vec::with_capacity(k.saturating_sub(1) * k / 2);
    let mut raw_p = Vec::with_capacity(pairs.capacity());

    for i in 0..k {
        for j in (i + 1)..k {
            let (statistic, p) = match test {
                PairwiseTest::Welch => welch_t(&groups[i].values, &groups[j].values),
                PairwiseTest::MannWhitney => {
                    mann_whitney_u(&groups[i].values, &groups[j].values)
                }
            };
            raw_p.push(p);
            pairs.push((i, j, statistic, p));
        }
    }

    let adjusted = adjust(&raw_p, method);

    pairs
        .into_iter()
        .zip(adjusted)
        .map(|((i, j, statistic, p_value), p_adjusted)| PairwiseResult {
            group_a: groups[i].label.clone(),
            group_b: groups[j].label.clone(),
            statistic,
            p_value,
            p_adjusted,
            significant: p_adjusted < level,
        })
        .collect()
}

// ── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-6;

    fn three_groups() -> Vec<GroupSample> {
        vec![
            GroupSample::new("A", vec![2.1, 3.4, 2.8, 3.1, 2.5]),
            GroupSample::new("B", vec![5.2, 4.8, 5.5, 4.9, 5.1]),
            GroupSample::new("C", vec![3.5, 3.8, 4.1, 3.2, 3.9]),
        ]
    }

    #[test]
    fn anova_reference_scenario() {
        let result = one_way_anova(&three_groups());
        assert!((result.statistic - 44.796_499).abs() < 1e-3, "F={}", result.statistic);
        assert_eq!(result.df1, 2.0);
        assert_eq!(result.df2, 12.0);
        assert!((result.p_value - 2.72e-6).abs() < 1e-7, "p={}", result.p_value);
        assert!((result.effect_size - 0.8819).abs() < 1e-3);
        assert_eq!(result.effect_name, "eta_squared");
    }

    #[test]
    fn kruskal_wallis_reference_scenario() {
        let result = kruskal_wallis(&three_groups());
        assert!((result.statistic - 12.02).abs() < 1e-6, "H={}", result.statistic);
        assert_eq!(result.df1, 2.0);
        assert!(result.df2.is_nan());
        assert!((result.p_value - 0.002455).abs() < 1e-5, "p={}", result.p_value);
        assert!(result.effect_size >= 0.0);
    }

    #[test]
    fn anova_identical_groups_no_evidence() {
        let g = vec![
            GroupSample::new("A", vec![1.0, 2.0, 3.0]),
            GroupSample::new("B", vec![1.0, 2.0, 3.0]),
            GroupSample::new("C", vec![1.0, 2.0, 3.0]),
        ];
        let result = one_way_anova(&g);
        assert!(result.statistic.abs() < TOL);
        assert!((result.p_value - 1.0).abs() < TOL);
    }

    #[test]
    fn anova_zero_within_variance() {
        // SSW = 0 → F = 0, p = 1 rather than infinity
        let g = vec![
            GroupSample::new("A", vec![1.0, 1.0]),
            GroupSample::new("B", vec![2.0, 2.0]),
        ];
        let result = one_way_anova(&g);
        assert_eq!(result.statistic, 0.0);
        assert_eq!(result.p_value, 1.0);
    }

    #[test]
    fn anova_empty_group_is_nan() {
        let g = vec![
            GroupSample::new("A", vec![]),
            GroupSample::new("B", vec![1.0, 2.0]),
        ];
        let result = one_way_anova(&g);
        assert!(result.statistic.is_nan());
        assert!(result.p_value.is_nan());
    }

    #[test]
    fn kruskal_wallis_identical_groups() {
        let g = vec![
            GroupSample::new("A", vec![1.0, 2.0, 3.0]),
            GroupSample::new("B", vec![1.0, 2.0, 3.0]),
        ];
        let result = kruskal_wallis(&g);
        assert!(result.statistic.abs() < TOL);
        assert!((result.p_value - 1.0).abs() < TOL);
    }

    #[test]
    fn kruskal_wallis_all_tied() {
        let g = vec![
            GroupSample::new("A", vec![5.0, 5.0, 5.0]),
            GroupSample::new("B", vec![5.0, 5.0, 5.0]),
        ];
        let result = kruskal_wallis(&g);
        // Tie correction hits c = 0; H stays 0, no evidence
        assert!((result.p_value - 1.0).abs() < TOL);
    }

    #[test]
    fn welch_t_separated_groups() {
        let (t, p) = welch_t(&[1.0, 2.0, 3.0, 4.0, 5.0], &[100.0, 101.0, 102.0, 103.0, 104.0]);
        assert!(t < 0.0);
        assert!(p < 0.001, "p={}", p);
    }

    #[test]
    fn welch_t_zero_se() {
        let (t, p) = welch_t(&[2.0, 2.0], &[2.0, 2.0]);
        assert_eq!(t, 0.0);
        assert_eq!(p, 1.0);
    }

    #[test]
    fn welch_t_reference_value() {
        // se² = 0.257/5 + 0.075/5 = 0.0664, t = -2.32/√0.0664
        let (t, p) = welch_t(&[2.1, 3.4, 2.8, 3.1, 2.5], &[5.2, 4.8, 5.5, 4.9, 5.1]);
        assert!((t - (-9.003_33)).abs() < 1e-4, "t={}", t);
        assert!(p > 0.0 && p < 1e-3, "p={}", p);
    }

    #[test]
    fn mann_whitney_no_overlap() {
        let (u, p) = mann_whitney_u(&[1.0, 2.0, 3.0, 4.0, 5.0], &[10.0, 11.0, 12.0, 13.0, 14.0]);
        assert_eq!(u, 0.0);
        assert!(p < 0.02, "p={}", p);
    }

    #[test]
    fn mann_whitney_all_tied() {
        let (_, p) = mann_whitney_u(&[3.0, 3.0], &[3.0, 3.0]);
        assert_eq!(p, 1.0);
    }

    #[test]
    fn mann_whitney_tie_correction_applied() {
        // With ties, sigma shrinks relative to the uncorrected value
        let x = [1.0, 2.0, 2.0, 3.0];
        let y = [2.0, 3.0, 4.0, 4.0];
        let (u, p) = mann_whitney_u(&x, &y);
        assert!(u >= 0.0);
        assert!((0.0..=1.0).contains(&p));
    }

    #[test]
    fn post_hoc_record_count_and_order() {
        let results = post_hoc_pairwise(
            &three_groups(),
            PairwiseTest::Welch,
            CorrectionMethod::Bonferroni,
            0.05,
        );
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].group_a, "A");
        assert_eq!(results[0].group_b, "B");
        assert_eq!(results[1].group_a, "A");
        assert_eq!(results[1].group_b, "C");
        assert_eq!(results[2].group_a, "B");
        assert_eq!(results[2].group_b, "C");
    }

    #[test]
    fn post_hoc_bonferroni_at_least_raw() {
        let results = post_hoc_pairwise(
            &three_groups(),
            PairwiseTest::MannWhitney,
            CorrectionMethod::Bonferroni,
            0.05,
        );
        for r in &results {
            assert!(r.p_adjusted >= r.p_value - 1e-12);
            assert!(r.p_adjusted <= 1.0);
        }
    }

    #[test]
    fn post_hoc_holm_and_fdr_below_bonferroni() {
        let groups = three_groups();
        let bonf = post_hoc_pairwise(
            &groups,
            PairwiseTest::Welch,
            CorrectionMethod::Bonferroni,
            0.05,
        );
        for method in [CorrectionMethod::Holm, CorrectionMethod::BenjaminiHochberg] {
            let other = post_hoc_pairwise(&groups, PairwiseTest::Welch, method, 0.05);
            for (a, b) in other.iter().zip(bonf.iter()) {
                assert!(a.p_adjusted <= b.p_adjusted + 1e-12);
            }
        }
    }

    #[test]
    fn post_hoc_significance_flag() {
        let results = post_hoc_pairwise(
            &three_groups(),
            PairwiseTest::Welch,
            CorrectionMethod::Bonferroni,
            0.05,
        );
        // A vs B is strongly separated
        assert!(results[0].significant);
        for r in &results {
            assert_eq!(r.significant, r.p_adjusted < 0.05);
        }
    }

    #[test]
    fn omnibus_summary_and_score() {
        let result = one_way_anova(&three_groups());
        assert!((result.score() - result.p_value).abs() < 1e-15);
        let s = result.summary();
        assert!(s.contains("One-way ANOVA"));
        assert!(s.contains("eta_squared"));
    }
}
