use analysis_core::{stats, PricePoint};
use rust_decimal::prelude::ToPrimitive;

use crate::models::PeriodWindow;

/// Split a daily close series into consecutive non-overlapping windows.
///
/// Windows start every `window_len` points. Each spans to `start + window_len`,
/// clipped to the last point, so the final window may be shorter. A series with
/// fewer than two points yields no windows.
pub fn build_windows(history: &[PricePoint], window_len: usize) -> Vec<PeriodWindow> {
    let n = history.len();
    if n < 2 || window_len == 0 {
        return Vec::new();
    }

    let closes: Vec<f64> = history
        .iter()
        .map(|p| p.close.to_f64().unwrap_or(0.0))
        .collect();

    let mut windows = Vec::new();
    let mut i = 0;
    while i < n - 1 {
        let end = (i + window_len).min(n - 1);
        let slice_end = (i + window_len).min(n);

        let changes = stats::pct_changes(&closes[i..slice_end]);
        let volatility = if changes.len() >= 2 {
            stats::std_dev(&changes) * 100.0
        } else {
            0.0
        };

        windows.push(PeriodWindow {
            start_date: history[i].date.clone(),
            end_date: history[end].date.clone(),
            start_price: closes[i],
            end_price: closes[end],
            return_pct: stats::percent_change(closes[i], closes[end]),
            volatility,
        });

        i += window_len;
    }

    windows
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn series(closes: &[i64]) -> Vec<PricePoint> {
        closes
            .iter()
            .enumerate()
            .map(|(i, c)| PricePoint {
                date: format!("d{:03}", i),
                close: Decimal::from(*c),
            })
            .collect()
    }

    #[test]
    fn test_window_count_and_bounds() {
        let closes: Vec<i64> = (100..185).collect();
        let windows = build_windows(&series(&closes), 7);
        assert_eq!(windows.len(), 12);
        assert_eq!(windows[0].start_date, "d000");
        assert_eq!(windows[0].end_date, "d007");
        // last window starts at 77 and is clipped to the final point
        assert_eq!(windows[11].start_date, "d077");
        assert_eq!(windows[11].end_date, "d084");
    }

    #[test]
    fn test_return_and_short_tail() {
        // 10 points: windows at 0 and 7; the second runs 7 -> 9
        let windows = build_windows(&series(&[100, 101, 102, 103, 104, 105, 106, 110, 120, 99]), 7);
        assert_eq!(windows.len(), 2);
        assert!((windows[0].return_pct - 10.0).abs() < 1e-9);
        assert!((windows[1].return_pct - (99.0 - 110.0) / 110.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_volatility_is_zero_with_single_change() {
        // second window covers only points 7..9 -> one change
        let windows = build_windows(&series(&[100, 100, 100, 100, 100, 100, 100, 100, 120]), 7);
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].volatility, 0.0);
        assert_eq!(windows[1].volatility, 0.0);
    }

    #[test]
    fn test_volatility_in_percent() {
        let windows = build_windows(&series(&[100, 110, 99, 108]), 7);
        assert_eq!(windows.len(), 1);
        let changes = [0.1, -0.1, (108.0 - 99.0) / 99.0];
        let expected = stats::std_dev(&changes) * 100.0;
        assert!((windows[0].volatility - expected).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(build_windows(&[], 7).is_empty());
        assert!(build_windows(&series(&[100]), 7).is_empty());
        assert!(build_windows(&series(&[100, 101]), 0).is_empty());
    }
}
