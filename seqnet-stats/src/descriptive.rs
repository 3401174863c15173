//! Descriptive statistics for numeric data.
//!
//! Unlike most of the ecosystem these helpers are total: degenerate input
//! (empty slices, too few observations) yields NaN rather than an error,
//! because the statistical layers above propagate NaN as their undefined
//! marker.

/// Arithmetic mean. NaN for empty input.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return f64::NAN;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Variance with `ddof` degrees-of-freedom correction.
///
/// The divisor is guarded to `max(n - ddof, 1)`, so a single observation
/// with `ddof = 1` yields 0 rather than a division by zero. NaN for empty
/// input.
pub fn variance(data: &[f64], ddof: usize) -> f64 {
    let n = data.len();
    if n == 0 {
        return f64::NAN;
    }
    let m = mean(data);
    let ss: f64 = data.iter().map(|&x| (x - m).powi(2)).sum();
    ss / (n.saturating_sub(ddof).max(1)) as f64
}

/// Standard deviation with `ddof` degrees-of-freedom correction.
pub fn std_dev(data: &[f64], ddof: usize) -> f64 {
    variance(data, ddof).sqrt()
}

/// Median (50th percentile). NaN for empty input.
pub fn median(data: &[f64]) -> f64 {
    quantile(data, 0.5)
}

/// Quantile via linear interpolation between order statistics.
///
/// `q` is expected in [0, 1]; NaN for empty input.
pub fn quantile(data: &[f64], q: f64) -> f64 {
    if data.is_empty() {
        return f64::NAN;
    }
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    quantile_sorted(&sorted, q)
}

/// Quantile from a pre-sorted slice using linear interpolation.
pub(crate) fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }
    if n == 1 {
        return sorted[0];
    }
    let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
    let lo = pos.floor() as usize;
    let frac = pos - lo as f64;
    if lo + 1 >= n {
        sorted[n - 1]
    } else {
        sorted[lo] * (1.0 - frac) + sorted[lo + 1] * frac
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────
