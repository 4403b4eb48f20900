//! Small descriptive statistics shared by the scoring and backtest crates.

/// Compute the mean of a data slice.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Compute sample standard deviation (n - 1 denominator).
pub fn std_dev(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    let m = mean(data);
    let variance = data.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (data.len() - 1) as f64;
    variance.sqrt()
}

/// Fractional change between consecutive values. Pairs with a zero base are skipped.
pub fn pct_changes(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect()
}

/// Percentage change from `start` to `end`. Returns 0.0 when `start` is zero.
pub fn percent_change(start: f64, end: f64) -> f64 {
    if start == 0.0 {
        return 0.0;
    }
    (end - start) / start * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_std_dev() {
        let data = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&data) - 5.0).abs() < 1e-12);
        // sample std dev of the classic example is sqrt(32/7)
        assert!((std_dev(&data) - (32.0_f64 / 7.0).sqrt()).abs() < 1e-12);
        assert_eq!(std_dev(&[1.0]), 0.0);
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_pct_changes() {
        let changes = pct_changes(&[100.0, 110.0, 99.0]);
        assert_eq!(changes.len(), 2);
        assert!((changes[0] - 0.1).abs() < 1e-12);
        assert!((changes[1] + 0.1).abs() < 1e-12);
        assert!(pct_changes(&[0.0, 5.0]).is_empty());
    }

    #[test]
    fn test_percent_change() {
        assert!((percent_change(100.0, 106.0) - 6.0).abs() < 1e-12);
        assert_eq!(percent_change(0.0, 10.0), 0.0);
    }
}
