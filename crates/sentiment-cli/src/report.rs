//! Text and JSON rendering of analysis and backtest results.

use analysis_core::{PriceSnapshot, TickerSentimentResult};
use backtest_engine::{BacktestSummary, MultiTickerSummary};
use risk_manager::RiskMetrics;
use serde::Serialize;

/// Everything `analyze` produces for one ticker.
#[derive(Debug, Serialize)]
pub struct AnalyzeReport {
    pub sentiment: TickerSentimentResult,
    pub price: Option<PriceSnapshot>,
    pub risk: Option<RiskMetrics>,
}

/// Proxy backtest output: the live reading that was replayed plus the summary.
#[derive(Debug, Serialize)]
pub struct ProxyReport {
    pub live_sentiment: f64,
    pub summary: BacktestSummary,
}

const RULE: &str = "============================================================";

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    }
}

pub fn print_analysis(report: &AnalyzeReport) {
    let s = &report.sentiment;
    println!("{}", RULE);
    println!("{} NEWS SENTIMENT", s.ticker);
    println!("{}", RULE);
    println!("Articles: {} fetched, {} passed quality filter, {} analyzed",
        s.raw_articles_count, s.filtered_articles_count, s.total_articles);
    println!("Weighted sentiment: {:+.3}", s.avg_sentiment);
    println!("Average confidence: {:.2}", s.avg_confidence);
    println!("Signals: {} BUY / {} SELL", s.buy_signals, s.sell_signals);
    println!("Recommendation: {}", s.recommendation.to_label());

    println!();
    for (i, a) in s.analyses.iter().enumerate() {
        println!("{}. {}", i + 1, truncate(&a.title, 70));
        println!("   {:+.2} | {} | {} relevance | quality {:.2} | credibility {:.1}",
            a.sentiment, a.signal, a.relevance.as_str(), a.quality_weight, a.source_credibility);
        println!("   {}", a.reason);
    }

    println!();
    match &report.price {
        Some(p) => println!("Price: ${:.2} vs ${:.2} ({:+.2}%, {})",
            p.current_price, p.reference_price, p.change_pct, p.direction.as_str()),
        None => println!("Price: no recent data"),
    }

    if let Some(risk) = &report.risk {
        println!("Conviction: {}", risk.conviction.as_str());
        println!("News volume score: {:.1}", risk.news_volume_score);
        println!("High-relevance articles: {}", risk.high_relevance_count);
        println!("Agrees with market: {}", if risk.agreement_with_market { "yes" } else { "no" });
        for warning in &risk.risk_warnings {
            println!("  ! {}", warning);
        }
    }
}

pub fn print_backtest(summary: &BacktestSummary, method: &str) {
    println!("{}", RULE);
    println!("{} BACKTEST ({})", summary.ticker, method);
    println!("{}", RULE);
    println!("Accuracy: {:.1}% ({}/{} periods)",
        summary.accuracy_pct, summary.correct_predictions, summary.total_periods);
    println!("Calls: {} BUY / {} SELL / {} HOLD",
        summary.buy_periods, summary.sell_periods, summary.hold_periods);
    println!("Avg return after BUY:  {:+.2}%", summary.avg_buy_return);
    println!("Avg return after SELL: {:+.2}%", summary.avg_sell_return);

    println!();
    println!("Recent periods:");
    for p in summary.recent_periods(5) {
        println!("  Week {:>2} {} | {:+.2} -> {:<4} | {:+.2}% {:<4} | {}",
            p.week,
            p.date,
            p.simulated_sentiment,
            p.ai_prediction.as_str(),
            p.actual_return_pct,
            p.market_result.as_str(),
            if p.correct { "correct" } else { "wrong" });
    }
}

pub fn print_multi(multi: &MultiTickerSummary) {
    println!("{}", RULE);
    println!("MULTI-TICKER BACKTEST");
    println!("{}", RULE);
    println!("Tickers tested: {}", multi.tickers_tested);
    if !multi.skipped.is_empty() {
        println!("Skipped (insufficient history): {}", multi.skipped.join(", "));
    }
    println!("Average accuracy: {:.1}%", multi.avg_accuracy);
    println!("Average BUY return: {:+.2}%", multi.avg_buy_return);

    println!();
    for (rank, s) in multi.ranked_by_accuracy().iter().enumerate() {
        println!("  {}. {:<6} {:>5.1}% over {:>2} periods | BUY avg {:+.2}%",
            rank + 1, s.ticker, s.accuracy_pct, s.total_periods, s.avg_buy_return);
    }
}

pub fn print_proxy(report: &ProxyReport) {
    println!("Live sentiment {:+.3} replayed over every period (approximation, not historical news)",
        report.live_sentiment);
    print_backtest(&report.summary, "live proxy");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer headline", 8), "a longer...");
    }
}
