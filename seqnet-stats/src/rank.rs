//! Mid-rank assignment and tie accounting.
//!
//! The rank-based tests (Spearman, Kruskal-Wallis, Mann-Whitney, Kendall)
//! all need the same two ingredients: mid-ranks, where tied values share the
//! average of their rank positions, and tie-group sizes for the classical
//! tie corrections.

/// Assign mid-ranks (1-based) to `data`.
///
/// Tied values receive the average of the rank positions they occupy.
/// Empty input produces empty output.
pub fn mid_ranks(data: &[f64]) -> Vec<f64> {
    let n = data.len();
    if n == 0 {
        return Vec::new();
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| data[a].total_cmp(&data[b]));

    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        // Find the end of the tie group.
        let mut j = i + 1;
        while j < n && data[order[j]].total_cmp(&data[order[i]]).is_eq() {
            j += 1;
        }
        // The group occupies positions (i+1)..=j, so its mid-rank is the
        // average of the endpoints.
        let mid = (i + 1 + j) as f64 / 2.0;
        for &idx in &order[i..j] {
            ranks[idx] = mid;
        }
        i = j;
    }

    ranks
}

/// Sum of `t³ - t` over all tie groups of size `t` in `data`.
///
/// This is the correction term used by Kruskal-Wallis and Mann-Whitney.
/// Untied data yields 0.
pub fn tie_term(data: &[f64]) -> f64 {
    tie_groups(data)
        .into_iter()
        .map(|t| {
            let t = t as f64;
            t * t * t - t
        })
        .sum()
}

/// Sum of `t(t-1)/2` over all tie groups in `data` — the number of tied
/// pairs, as used by Kendall's tau-b.
pub fn tie_pairs(data: &[f64]) -> f64 {
    tie_groups(data)
        .into_iter()
        .map(|t| (t * (t - 1)) as f64 / 2.0)
        .sum()
}

/// Sizes of all tie groups (of size ≥ 2) in `data`.
fn tie_groups(data: &[f64]) -> Vec<usize> {
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mut groups = Vec::new();
    let mut i = 0;
    while i < sorted.len() {
        let mut j = i + 1;
        while j < sorted.len() && sorted[j].total_cmp(&sorted[i]).is_eq() {
            j += 1;
        }
        if j - i > 1 {
            groups.push(j - i);
        }
        i = j;
    }
    groups
}

// ── Tests ──────────────────────────────────────────────────────────────────
