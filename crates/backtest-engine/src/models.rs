use analysis_core::Signal;
use serde::{Deserialize, Serialize};

/// Configuration for a backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestConfig {
    /// Trading days per period.
    pub window_len: usize,
    /// Histories shorter than this many closes are skipped.
    pub min_history: usize,
    /// |sentiment| above this is a directional call; at or below is HOLD.
    pub signal_threshold: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            window_len: 7,
            min_history: 30,
            signal_threshold: 0.2,
        }
    }
}

/// Price statistics for one non-overlapping window of closes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodWindow {
    pub start_date: String,
    pub end_date: String,
    pub start_price: f64,
    pub end_price: f64,
    pub return_pct: f64,
    /// Sample std dev of daily % changes inside the window, in percent.
    pub volatility: f64,
}

/// Inputs a synthesizer may use for one period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodContext {
    pub index: usize,
    /// Previous period's return; 0.0 for the first period.
    pub prev_return: f64,
    pub volatility: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MarketResult {
    Up,
    Down,
}

impl MarketResult {
    pub fn from_return(return_pct: f64) -> Self {
        if return_pct > 0.0 {
            MarketResult::Up
        } else {
            MarketResult::Down
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MarketResult::Up => "UP",
            MarketResult::Down => "DOWN",
        }
    }
}

/// One simulated prediction and its outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestPeriod {
    /// 1-based
    pub week: usize,
    pub date: String,
    pub simulated_sentiment: f64,
    pub actual_return_pct: f64,
    pub ai_prediction: Signal,
    pub market_result: MarketResult,
    pub correct: bool,
    pub volatility: f64,
}

/// Result of a single-ticker backtest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestSummary {
    pub ticker: String,
    pub accuracy_pct: f64,
    pub total_periods: usize,
    pub correct_predictions: usize,
    pub buy_periods: usize,
    pub sell_periods: usize,
    pub hold_periods: usize,
    /// Mean return of BUY periods; 0.0 when there were none.
    pub avg_buy_return: f64,
    /// Mean return of SELL periods; 0.0 when there were none.
    pub avg_sell_return: f64,
    pub periods: Vec<BacktestPeriod>,
}

impl BacktestSummary {
    /// The last `n` periods, oldest first.
    pub fn recent_periods(&self, n: usize) -> &[BacktestPeriod] {
        let start = self.periods.len().saturating_sub(n);
        &self.periods[start..]
    }
}

/// Aggregate over several tickers. Tickers without enough history are listed in `skipped`
/// and excluded from the averages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiTickerSummary {
    pub results: Vec<BacktestSummary>,
    pub skipped: Vec<String>,
    pub tickers_tested: usize,
    pub avg_accuracy: f64,
    pub avg_buy_return: f64,
}

impl MultiTickerSummary {
    /// Per-ticker summaries sorted by accuracy, best first.
    pub fn ranked_by_accuracy(&self) -> Vec<&BacktestSummary> {
        let mut ranked: Vec<&BacktestSummary> = self.results.iter().collect();
        ranked.sort_by(|a, b| b.accuracy_pct.total_cmp(&a.accuracy_pct));
        ranked
    }
}
