//! Descriptive statistics kernels shared by the analyzers.
//!
//! Every function that can be undefined for its input (too few values, zero
//! variance, zero mean) returns `Option<f64>` instead of propagating `NaN`.

use serde::{Deserialize, Serialize};

/// Multiplier applied to the IQR when computing outlier fences.
pub const IQR_FENCE_FACTOR: f64 = 1.5;

// ── Percentile helper ─────────────────────────────────────────────────────────

/// Compute the `p`-th percentile of a **sorted** slice using standard linear
/// interpolation (the same algorithm used by NumPy's `percentile` function).
///
/// Returns `None` for an empty slice.
pub fn percentile(sorted_data: &[f64], p: f64) -> Option<f64> {
    if sorted_data.is_empty() {
        return None;
    }
    let len = sorted_data.len();
    if len == 1 {
        return Some(sorted_data[0]);
    }
    let rank = (p / 100.0) * (len as f64 - 1.0);
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return Some(sorted_data[lo]);
    }
    let frac = rank - lo as f64;
    Some(sorted_data[lo] + frac * (sorted_data[hi] - sorted_data[lo]))
}

/// Return a sorted copy of `values` (total order, so `NaN` cannot panic).
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut v = values.to_vec();
    v.sort_by(|a, b| a.total_cmp(b));
    v
}

// ── Moments ───────────────────────────────────────────────────────────────────

/// Arithmetic mean; `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n − 1 denominator); `None` when fewer than two
/// values are present.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (values.len() as f64 - 1.0)).sqrt())
}

/// Coefficient of variation in percent: `std / mean × 100`.
///
/// `None` when the standard deviation is undefined or zero, or the mean is zero.
pub fn coefficient_of_variation(values: &[f64]) -> Option<f64> {
    let std = sample_std(values)?;
    let m = mean(values)?;
    if std == 0.0 || m == 0.0 {
        return None;
    }
    Some(std / m * 100.0)
}

// ── Outliers ──────────────────────────────────────────────────────────────────

/// Result of applying the 1.5 × IQR rule to one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierSummary {
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower_fence: f64,
    pub upper_fence: f64,
    /// Number of values strictly outside the fences.
    pub count: usize,
}

/// Apply the IQR rule: a value is an outlier when it falls below
/// `Q1 − 1.5·IQR` or above `Q3 + 1.5·IQR`.
///
/// Returns `None` for an empty slice.
pub fn iqr_outliers(values: &[f64]) -> Option<OutlierSummary> {
    let data = sorted(values);
    let q1 = percentile(&data, 25.0)?;
    let q3 = percentile(&data, 75.0)?;
    let iqr = q3 - q1;
    let lower_fence = q1 - IQR_FENCE_FACTOR * iqr;
    let upper_fence = q3 + IQR_FENCE_FACTOR * iqr;
    let count = data
        .iter()
        .filter(|&&v| v < lower_fence || v > upper_fence)
        .count();
    Some(OutlierSummary {
        q1,
        q3,
        iqr,
        lower_fence,
        upper_fence,
        count,
    })
}

// ── Correlation ───────────────────────────────────────────────────────────────

/// Pearson correlation over pairwise-complete observations.
///
/// Pairs where either side is `None` are skipped. Returns `None` when fewer
/// than two complete pairs remain or either side has zero variance.
pub fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys.iter())
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    let r = cov / (var_x.sqrt() * var_y.sqrt());
    // Rounding can push |r| a hair past 1.
    Some(r.clamp(-1.0, 1.0))
}

// ── Extremes ──────────────────────────────────────────────────────────────────

/// Index of the largest value; ties resolve to the first occurrence.
/// Non-finite values are ignored.
pub fn argmax(values: impl IntoIterator<Item = f64>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, v) in values.into_iter().enumerate() {
        if !v.is_finite() {
            continue;
        }
        match best {
            Some((_, current)) if v <= current => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Index of the smallest value; ties resolve to the first occurrence.
/// Non-finite values are ignored.
pub fn argmin(values: impl IntoIterator<Item = f64>) -> Option<usize> {
    argmax(values.into_iter().map(|v| -v))
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── percentile ────────────────────────────────────────────────────────────

    #[test]
    fn test_percentile_empty() {
        assert_eq!(percentile(&[], 50.0), None);
    }

    #[test]
    fn test_percentile_single() {
        assert_eq!(percentile(&[42.0], 25.0), Some(42.0));
    }

    #[test]
    fn test_percentile_interpolates() {
        let data = [1.0, 2.0, 3.0, 4.0];
        // rank = 0.25 * 3 = 0.75 → 1 + 0.75 * (2 - 1)
        assert!((percentile(&data, 25.0).unwrap() - 1.75).abs() < 1e-12);
        assert!((percentile(&data, 50.0).unwrap() - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_percentile_bounds() {
        let data = [3.0, 7.0, 9.0];
        assert_eq!(percentile(&data, 0.0), Some(3.0));
        assert_eq!(percentile(&data, 100.0), Some(9.0));
    }

    // ── mean / std / cv ───────────────────────────────────────────────────────

    #[test]
    fn test_mean_of_ratios_example() {
        let m = mean(&[5.0, 0.5, 3.0]).unwrap();
        assert!((m - 2.833_333_333).abs() < 1e-6, "mean = {m}");
    }

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_sample_std() {
        // Sample variance of [2, 4, 4, 4, 5, 5, 7, 9] is 32/7.
        let s = sample_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((s - (32.0_f64 / 7.0).sqrt()).abs() < 1e-12, "std = {s}");
    }

    #[test]
    fn test_sample_std_needs_two_values() {
        assert_eq!(sample_std(&[1.0]), None);
        assert_eq!(sample_std(&[]), None);
    }

    #[test]
    fn test_cv() {
        let cv = coefficient_of_variation(&[10.0, 20.0, 30.0]).unwrap();
        // std = 10, mean = 20
        assert!((cv - 50.0).abs() < 1e-9, "cv = {cv}");
    }

    #[test]
    fn test_cv_zero_mean_is_undefined() {
        assert_eq!(coefficient_of_variation(&[-1.0, 1.0]), None);
    }

    #[test]
    fn test_cv_constant_column_is_undefined() {
        assert_eq!(coefficient_of_variation(&[4.0, 4.0, 4.0]), None);
    }

    // ── iqr_outliers ─────────────────────────────────────────────────────────

    #[test]
    fn test_iqr_outliers_single_extreme() {
        let summary = iqr_outliers(&[1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
        assert_eq!(summary.q1, 2.0);
        assert_eq!(summary.q3, 4.0);
        assert_eq!(summary.iqr, 2.0);
        assert_eq!(summary.upper_fence, 7.0);
        assert_eq!(summary.lower_fence, -1.0);
        assert_eq!(summary.count, 1);
    }

    #[test]
    fn test_iqr_outliers_order_independent_and_idempotent() {
        let a = iqr_outliers(&[100.0, 3.0, 1.0, 4.0, 2.0]).unwrap();
        let b = iqr_outliers(&[1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
        let c = iqr_outliers(&[1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_iqr_outliers_values_on_fence_are_not_outliers() {
        // Q1 = 2, Q3 = 4, upper fence = 7 exactly.
        let summary = iqr_outliers(&[1.0, 2.0, 3.0, 4.0, 7.0]).unwrap();
        assert_eq!(summary.count, 0);
    }

    #[test]
    fn test_iqr_outliers_empty() {
        assert!(iqr_outliers(&[]).is_none());
    }

    // ── pearson ──────────────────────────────────────────────────────────────

    fn some(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn test_pearson_perfect_positive() {
        let r = pearson(&some(&[1.0, 2.0, 3.0]), &some(&[2.0, 4.0, 6.0])).unwrap();
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_perfect_negative() {
        let r = pearson(&some(&[1.0, 2.0, 3.0]), &some(&[3.0, 2.0, 1.0])).unwrap();
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_is_symmetric() {
        let x = some(&[1.0, 4.0, 2.0, 8.0]);
        let y = some(&[3.0, 1.0, 5.0, 2.0]);
        assert_eq!(pearson(&x, &y), pearson(&y, &x));
    }

    #[test]
    fn test_pearson_zero_variance_is_undefined() {
        assert_eq!(
            pearson(&some(&[5.0, 5.0, 5.0]), &some(&[1.0, 2.0, 3.0])),
            None
        );
    }

    #[test]
    fn test_pearson_skips_incomplete_pairs() {
        let x = vec![Some(1.0), None, Some(2.0), Some(3.0)];
        let y = vec![Some(10.0), Some(-50.0), Some(20.0), Some(30.0)];
        let r = pearson(&x, &y).unwrap();
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_too_few_pairs() {
        assert_eq!(pearson(&some(&[1.0]), &some(&[2.0])), None);
    }

    // ── argmax / argmin ──────────────────────────────────────────────────────

    #[test]
    fn test_argmax_first_occurrence_wins() {
        assert_eq!(argmax([1.0, 5.0, 3.0, 5.0]), Some(1));
    }

    #[test]
    fn test_argmin_first_occurrence_wins() {
        assert_eq!(argmin([4.0, 0.5, 3.0, 0.5]), Some(1));
    }

    #[test]
    fn test_argmax_skips_non_finite() {
        assert_eq!(argmax([f64::NAN, 2.0, f64::INFINITY]), Some(1));
    }

    #[test]
    fn test_argmax_empty() {
        assert_eq!(argmax(Vec::<f64>::new()), None);
        assert_eq!(argmin(Vec::<f64>::new()), None);
    }
}
