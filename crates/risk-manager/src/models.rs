use serde::{Deserialize, Serialize};

/// Thresholds used by the conviction engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    /// Article count at which news volume saturates at 1.0.
    pub full_volume_articles: f64,
    /// Average confidence below this raises a warning.
    pub low_confidence: f64,
    /// Fewer articles than this raises a warning.
    pub min_articles: usize,
    /// Absolute price move (%) above this raises a warning.
    pub high_volatility_pct: f64,
    pub high_conviction_confidence: f64,
    pub high_conviction_articles: usize,
    pub medium_conviction_confidence: f64,
    pub medium_conviction_articles: usize,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            full_volume_articles: 10.0,
            low_confidence: 0.6,
            min_articles: 3,
            high_volatility_pct: 5.0,
            high_conviction_confidence: 0.7,
            high_conviction_articles: 5,
            medium_conviction_confidence: 0.5,
            medium_conviction_articles: 3,
        }
    }
}

/// Lean of the aggregated news.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentDirection {
    Bullish,
    Bearish,
}

impl SentimentDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentDirection::Bullish => "bullish",
            SentimentDirection::Bearish => "bearish",
        }
    }
}

/// Warnings in the order they are evaluated and reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskWarning {
    LowConfidence,
    LimitedCoverage,
    HighVolatility,
    MarketConflict,
}

impl RiskWarning {
    pub fn message(&self) -> &'static str {
        match self {
            RiskWarning::LowConfidence => "Low confidence in news analysis",
            RiskWarning::LimitedCoverage => "Limited news coverage - low conviction",
            RiskWarning::HighVolatility => "High volatility detected",
            RiskWarning::MarketConflict => "AI sentiment conflicts with market movement",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConvictionTier {
    High,
    Medium,
    Low,
}

impl ConvictionTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConvictionTier::High => "HIGH",
            ConvictionTier::Medium => "MEDIUM",
            ConvictionTier::Low => "LOW",
        }
    }
}

/// Risk view of one analysis run, cross-checked against the market.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// 0.0 to 1.0, saturating at ten articles.
    pub news_volume_score: f64,
    pub avg_confidence: f64,
    pub high_relevance_count: usize,
    pub sentiment_direction: SentimentDirection,
    pub price_change_pct: f64,
    pub agreement_with_market: bool,
    pub warnings: Vec<RiskWarning>,
    /// Human-readable warnings, same order as `warnings`.
    pub risk_warnings: Vec<String>,
    pub conviction: ConvictionTier,
}
