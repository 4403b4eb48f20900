//! Walks a price history window by window, asks a synthesizer for a sentiment
//! each period, and scores the resulting calls against what the market did.

use analysis_core::{stats, PricePoint, Signal};

use crate::models::*;
use crate::synthesis::SentimentSynthesizer;
use crate::windows::build_windows;

/// BUY above `threshold`, SELL below `-threshold`, HOLD otherwise.
pub fn classify(sentiment: f64, threshold: f64) -> Signal {
    if sentiment > threshold {
        Signal::Buy
    } else if sentiment < -threshold {
        Signal::Sell
    } else {
        Signal::Hold
    }
}

/// HOLD is always scored correct.
pub fn is_correct(prediction: Signal, market: MarketResult) -> bool {
    match prediction {
        Signal::Buy => market == MarketResult::Up,
        Signal::Sell => market == MarketResult::Down,
        Signal::Hold => true,
    }
}

/// Reduce scored periods to accuracy and per-signal return statistics.
pub fn summarize(ticker: &str, periods: Vec<BacktestPeriod>) -> BacktestSummary {
    let total_periods = periods.len();
    let correct_predictions = periods.iter().filter(|p| p.correct).count();

    let returns_for = |signal: Signal| -> Vec<f64> {
        periods
            .iter()
            .filter(|p| p.ai_prediction == signal)
            .map(|p| p.actual_return_pct)
            .collect()
    };
    let buy_returns = returns_for(Signal::Buy);
    let sell_returns = returns_for(Signal::Sell);
    let hold_periods = total_periods - buy_returns.len() - sell_returns.len();

    let accuracy_pct = if total_periods > 0 {
        correct_predictions as f64 / total_periods as f64 * 100.0
    } else {
        0.0
    };

    BacktestSummary {
        ticker: ticker.to_string(),
        accuracy_pct,
        total_periods,
        correct_predictions,
        buy_periods: buy_returns.len(),
        sell_periods: sell_returns.len(),
        hold_periods,
        avg_buy_return: stats::mean(&buy_returns),
        avg_sell_return: stats::mean(&sell_returns),
        periods,
    }
}

pub struct BacktestSimulator<S: SentimentSynthesizer> {
    config: BacktestConfig,
    synthesizer: S,
}

impl<S: SentimentSynthesizer> BacktestSimulator<S> {
    pub fn new(config: BacktestConfig, synthesizer: S) -> Self {
        Self { config, synthesizer }
    }

    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    pub fn synthesizer(&self) -> &S {
        &self.synthesizer
    }

    /// Backtest one ticker. Returns `None` when the history is shorter than
    /// `min_history` closes.
    pub fn run(&mut self, ticker: &str, history: &[PricePoint]) -> Option<BacktestSummary> {
        if history.len() < self.config.min_history {
            tracing::warn!(
                "Not enough price history for {}: {} points, need {}",
                ticker,
                history.len(),
                self.config.min_history
            );
            return None;
        }

        let windows = build_windows(history, self.config.window_len);
        let mut periods = Vec::with_capacity(windows.len());
        let mut prev_return = 0.0;

        for (index, window) in windows.iter().enumerate() {
            let ctx = PeriodContext {
                index,
                prev_return,
                volatility: window.volatility,
            };
            let sentiment = self.synthesizer.synthesize(ticker, &ctx);
            let prediction = classify(sentiment, self.config.signal_threshold);
            let market_result = MarketResult::from_return(window.return_pct);

            periods.push(BacktestPeriod {
                week: index + 1,
                date: window.start_date.clone(),
                simulated_sentiment: sentiment,
                actual_return_pct: window.return_pct,
                ai_prediction: prediction,
                market_result,
                correct: is_correct(prediction, market_result),
                volatility: window.volatility,
            });

            prev_return = window.return_pct;
        }

        let summary = summarize(ticker, periods);
        tracing::info!(
            "{} backtest ({}): {:.1}% accuracy over {} periods",
            ticker,
            self.synthesizer.name(),
            summary.accuracy_pct,
            summary.total_periods
        );
        Some(summary)
    }

    /// Backtest several tickers with the same synthesizer. Tickers with too
    /// little history go to `skipped` and do not count toward the averages.
    pub fn run_multi(&mut self, histories: &[(String, Vec<PricePoint>)]) -> MultiTickerSummary {
        let mut results = Vec::new();
        let mut skipped = Vec::new();

        for (ticker, history) in histories {
            match self.run(ticker, history) {
                Some(summary) => results.push(summary),
                None => skipped.push(ticker.clone()),
            }
        }

        let accuracies: Vec<f64> = results.iter().map(|r| r.accuracy_pct).collect();
        let buy_returns: Vec<f64> = results.iter().map(|r| r.avg_buy_return).collect();

        MultiTickerSummary {
            tickers_tested: results.len(),
            avg_accuracy: stats::mean(&accuracies),
            avg_buy_return: stats::mean(&buy_returns),
            results,
            skipped,
        }
    }
}
