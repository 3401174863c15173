//! Multiple testing correction.
//!
//! When running many pairwise tests simultaneously, p-values must be adjusted
//! to control the family-wise error rate or false discovery rate. Three
//! procedures are provided:
//!
//! - [`CorrectionMethod::Bonferroni`] — single-step FWER control
//! - [`CorrectionMethod::Holm`] — step-down FWER control
//! - [`CorrectionMethod::BenjaminiHochberg`] — step-up FDR control
//!
//! NaN p-values (undefined tests) pass through as NaN; they still count
//! toward the number of comparisons `m` but are excluded from the
//! monotonicity chains.

/// Multiple testing correction method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CorrectionMethod {
    /// Bonferroni correction: `p' = min(p·m, 1)`.
    Bonferroni,
    /// Holm step-down procedure.
    Holm,
    /// Benjamini-Hochberg step-up procedure (FDR).
    BenjaminiHochberg,
}

/// Apply a multiple testing correction to `p_values`.
///
/// Returns adjusted p-values in the same order as the input.
pub fn adjust(p_values: &[f64], method: CorrectionMethod) -> Vec<f64> {
    match method {
        CorrectionMethod::Bonferroni => bonferroni(p_values),
        CorrectionMethod::Holm => holm(p_values),
        CorrectionMethod::BenjaminiHochberg => benjamini_hochberg(p_values),
    }
}

/// Bonferroni correction: `p' = min(p·m, 1)`.
pub fn bonferroni(p_values: &[f64]) -> Vec<f64> {
    let m = p_values.len() as f64;
    p_values
        .iter()
        .map(|&p| if p.is_nan() { f64::NAN } else { (p * m).min(1.0) })
        .collect()
}

/// Holm step-down procedure.
///
/// Sorts ascending; the j-th smallest (0-indexed) is scaled by `m - j`, then
/// lower-bounded by the largest adjustment seen so far and capped at 1.
pub fn holm(p_values: &[f64]) -> Vec<f64> {
    let m = p_values.len();
    let order = finite_order(p_values);

    let mut adjusted = vec![f64::NAN; m];
    let mut running = 0.0_f64;
    for (j, &idx) in order.iter().enumerate() {
        let scaled = p_values[idx] * (m - j) as f64;
        running = running.max(scaled);
        adjusted[idx] = running.min(1.0);
    }
    adjusted
}

/// Benjamini-Hochberg step-up procedure.
///
/// Sorts ascending; iterating from the largest rank down, the j-th smallest
/// (0-indexed) is scaled by `m / (j+1)`, taking a running minimum, capped
/// at 1.
pub fn benjamini_hochberg(p_values: &[f64]) -> Vec<f64> {
    let m = p_values.len();
    let order = finite_order(p_values);

    let mut adjusted = vec![f64::NAN; m];
    let mut running = f64::INFINITY;
    for (j, &idx) in order.iter().enumerate().rev() {
        let scaled = p_values[idx] * m as f64 / (j + 1) as f64;
        running = running.min(scaled);
        adjusted[idx] = running.min(1.0);
    }
    adjusted
}

/// Indices of finite p-values, sorted ascending by value.
fn finite_order(p_values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..p_values.len())
        .filter(|&i| p_values[i].is_finite())
        .collect();
    order.sort_by(|&a, &b| p_values[a].total_cmp(&p_values[b]));
    order
}

// ── Tests ──────────────────────────────────────────────────────────────────
