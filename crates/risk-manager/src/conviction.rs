//! Conviction Engine
//!
//! Cross-checks aggregated news sentiment against recent price movement and
//! turns coverage, confidence and agreement into warnings and a conviction tier.

use analysis_core::{stats, ArticleAnalysis, PriceDirection, PriceSnapshot, RelevanceTier};

use crate::models::*;

/// Stateless evaluator; holds only its thresholds.
#[derive(Debug, Clone, Default)]
pub struct ConvictionEngine {
    thresholds: RiskThresholds,
}

impl ConvictionEngine {
    pub fn new(thresholds: RiskThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &RiskThresholds {
        &self.thresholds
    }

    /// min(article_count / 10, 1)
    pub fn news_volume_score(&self, article_count: usize) -> f64 {
        (article_count as f64 / self.thresholds.full_volume_articles).min(1.0)
    }

    /// Mean confidence, 0.5 for articles that did not report one (and for no articles).
    pub fn average_confidence(&self, analyses: &[ArticleAnalysis]) -> f64 {
        if analyses.is_empty() {
            return analysis_core::DEFAULT_CONFIDENCE;
        }
        let confidences: Vec<f64> = analyses.iter().map(|a| a.confidence_or_default()).collect();
        stats::mean(&confidences)
    }

    /// Bullish when the summed sentiment is positive, bearish otherwise.
    pub fn sentiment_direction(&self, analyses: &[ArticleAnalysis]) -> SentimentDirection {
        let total: f64 = analyses.iter().map(|a| a.sentiment).sum();
        if total > 0.0 {
            SentimentDirection::Bullish
        } else {
            SentimentDirection::Bearish
        }
    }

    /// A flat market agrees with neither direction.
    pub fn agrees_with_market(direction: SentimentDirection, market: PriceDirection) -> bool {
        matches!(
            (direction, market),
            (SentimentDirection::Bullish, PriceDirection::Up)
                | (SentimentDirection::Bearish, PriceDirection::Down)
        )
    }

    pub fn conviction(&self, avg_confidence: f64, article_count: usize) -> ConvictionTier {
        let t = &self.thresholds;
        if avg_confidence > t.high_conviction_confidence && article_count >= t.high_conviction_articles {
            ConvictionTier::High
        } else if avg_confidence > t.medium_conviction_confidence
            && article_count >= t.medium_conviction_articles
        {
            ConvictionTier::Medium
        } else {
            ConvictionTier::Low
        }
    }

    /// Evaluate one run. Warnings always appear in the order: low confidence,
    /// limited coverage, high volatility, market conflict.
    pub fn evaluate(&self, analyses: &[ArticleAnalysis], price: &PriceSnapshot) -> RiskMetrics {
        let article_count = analyses.len();
        let avg_confidence = self.average_confidence(analyses);
        let high_relevance_count = analyses
            .iter()
            .filter(|a| a.relevance == RelevanceTier::High)
            .count();
        let sentiment_direction = self.sentiment_direction(analyses);
        let agreement_with_market = Self::agrees_with_market(sentiment_direction, price.direction);

        let mut warnings = Vec::new();
        if avg_confidence < self.thresholds.low_confidence {
            warnings.push(RiskWarning::LowConfidence);
        }
        if article_count < self.thresholds.min_articles {
            warnings.push(RiskWarning::LimitedCoverage);
        }
        if price.change_pct.abs() > self.thresholds.high_volatility_pct {
            warnings.push(RiskWarning::HighVolatility);
        }
        if !agreement_with_market {
            warnings.push(RiskWarning::MarketConflict);
        }

        let conviction = self.conviction(avg_confidence, article_count);

        tracing::debug!(
            "Risk check: {} articles, confidence {:.2}, news {} vs market {}, conviction {}",
            article_count,
            avg_confidence,
            sentiment_direction.as_str(),
            price.direction.as_str(),
            conviction.as_str()
        );

        RiskMetrics {
            news_volume_score: self.news_volume_score(article_count),
            avg_confidence,
            high_relevance_count,
            sentiment_direction,
            price_change_pct: price.change_pct,
            agreement_with_market,
            risk_warnings: warnings.iter().map(|w| w.message().to_string()).collect(),
            warnings,
            conviction,
        }
    }
}
