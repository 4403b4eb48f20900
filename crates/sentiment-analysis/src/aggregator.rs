use analysis_core::{stats, ArticleAnalysis, Recommendation, Signal, TickerSentimentResult};

/// Quality-weighted mean sentiment: sum(sentiment * weight) / sum(weight).
///
/// Returns `None` for an empty list or when no analysis carries a positive weight.
pub fn weighted_sentiment(analyses: &[ArticleAnalysis]) -> Option<f64> {
    let mut total_score = 0.0;
    let mut total_weight = 0.0;

    for analysis in analyses {
        let weight = analysis.quality_weight.max(0.0);
        total_score += analysis.sentiment.clamp(-1.0, 1.0) * weight;
        total_weight += weight;
    }

    if total_weight > 0.0 {
        Some((total_score / total_weight).clamp(-1.0, 1.0))
    } else {
        None
    }
}

/// Mean of per-article confidences, counting a missing value as 0.5.
pub fn average_confidence(analyses: &[ArticleAnalysis]) -> f64 {
    let confidences: Vec<f64> = analyses.iter().map(|a| a.confidence_or_default()).collect();
    if confidences.is_empty() {
        return analysis_core::DEFAULT_CONFIDENCE;
    }
    stats::mean(&confidences)
}

pub fn count_signals(analyses: &[ArticleAnalysis], signal: Signal) -> usize {
    analyses.iter().filter(|a| a.signal == signal).count()
}

/// Build the ticker-level result. `None` when there is nothing to aggregate.
pub fn aggregate(
    ticker: &str,
    analyses: Vec<ArticleAnalysis>,
    raw_articles_count: usize,
    filtered_articles_count: usize,
) -> Option<TickerSentimentResult> {
    let avg_sentiment = weighted_sentiment(&analyses)?;

    Some(TickerSentimentResult {
        ticker: ticker.to_uppercase(),
        avg_sentiment,
        avg_confidence: average_confidence(&analyses),
        total_articles: analyses.len(),
        buy_signals: count_signals(&analyses, Signal::Buy),
        sell_signals: count_signals(&analyses, Signal::Sell),
        recommendation: Recommendation::from_sentiment(avg_sentiment),
        analyses,
        raw_articles_count,
        filtered_articles_count,
    })
}
