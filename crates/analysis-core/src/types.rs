use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

use crate::stats;
use crate::AnalysisError;

/// A news article as returned by a news source. Never mutated after fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub source_name: String,
    /// ISO 8601 timestamp as delivered by the source; may be malformed.
    pub published_at: String,
    #[serde(default)]
    pub url: Option<String>,
}

impl Article {
    /// Title and description joined for keyword scans.
    pub fn text(&self) -> String {
        format!("{} {}", self.title, self.description.as_deref().unwrap_or(""))
    }
}

/// An article with its quality components attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredArticle {
    pub article: Article,
    pub credibility: f64,
    pub relevance: f64,
    pub time_weight: f64,
    pub quality_score: f64,
}

/// Trading signal emitted per article (and per backtest period).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Buy => "BUY",
            Signal::Sell => "SELL",
            Signal::Hold => "HOLD",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Signal {
    type Err = AnalysisError;

    /// Case-insensitive; surrounding whitespace and trailing punctuation are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .trim()
            .trim_matches(|c: char| !c.is_ascii_alphabetic())
            .to_uppercase();
        match normalized.as_str() {
            "BUY" => Ok(Signal::Buy),
            "SELL" => Ok(Signal::Sell),
            "HOLD" => Ok(Signal::Hold),
            other => Err(AnalysisError::Parse(format!("unknown signal '{}'", other))),
        }
    }
}

/// How relevant the model judged an article to be for the ticker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RelevanceTier {
    High,
    #[default]
    Medium,
    Low,
}

impl RelevanceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelevanceTier::High => "HIGH",
            RelevanceTier::Medium => "MEDIUM",
            RelevanceTier::Low => "LOW",
        }
    }
}

impl FromStr for RelevanceTier {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .trim()
            .trim_matches(|c: char| !c.is_ascii_alphabetic())
            .to_uppercase();
        match normalized.as_str() {
            "HIGH" => Ok(RelevanceTier::High),
            "MEDIUM" => Ok(RelevanceTier::Medium),
            "LOW" => Ok(RelevanceTier::Low),
            other => Err(AnalysisError::Parse(format!("unknown relevance tier '{}'", other))),
        }
    }
}

/// Raw structured output of the sentiment collaborator for one article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentReading {
    pub sentiment: f64,
    pub confidence: Option<f64>,
    pub signal: Signal,
    pub reason: String,
    pub relevance: Option<RelevanceTier>,
}

/// Confidence assumed for analyses that did not report one.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Per-article analysis: the collaborator's reading plus the article's quality weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleAnalysis {
    pub title: String,
    /// -1.0 (bearish) to 1.0 (bullish)
    pub sentiment: f64,
    pub confidence: Option<f64>,
    pub signal: Signal,
    pub reason: String,
    pub relevance: RelevanceTier,
    pub quality_weight: f64,
    pub source_credibility: f64,
}

impl ArticleAnalysis {
    pub fn confidence_or_default(&self) -> f64 {
        self.confidence.unwrap_or(DEFAULT_CONFIDENCE)
    }

    /// Combine a collaborator reading with the scored article it was produced for.
    /// Sentiment and confidence are clamped to their ranges.
    pub fn from_reading(scored: &ScoredArticle, reading: SentimentReading) -> Self {
        Self {
            title: scored.article.title.clone(),
            sentiment: reading.sentiment.clamp(-1.0, 1.0),
            confidence: reading.confidence.map(|c| c.clamp(0.0, 1.0)),
            signal: reading.signal,
            reason: reading.reason,
            relevance: reading.relevance.unwrap_or_default(),
            quality_weight: scored.quality_score,
            source_credibility: scored.credibility,
        }
    }
}

/// Headline call derived from the aggregated sentiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    Bullish,
    Neutral,
    Bearish,
}

impl Recommendation {
    /// Bullish above +0.2, bearish below -0.2.
    pub fn from_sentiment(sentiment: f64) -> Self {
        if sentiment > 0.2 {
            Recommendation::Bullish
        } else if sentiment < -0.2 {
            Recommendation::Bearish
        } else {
            Recommendation::Neutral
        }
    }

    pub fn to_label(&self) -> &'static str {
        match self {
            Recommendation::Bullish => "BULLISH",
            Recommendation::Neutral => "NEUTRAL",
            Recommendation::Bearish => "BEARISH",
        }
    }
}

/// Ticker-level result of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerSentimentResult {
    pub ticker: String,
    /// Quality-weighted mean sentiment.
    pub avg_sentiment: f64,
    pub avg_confidence: f64,
    pub total_articles: usize,
    pub buy_signals: usize,
    pub sell_signals: usize,
    pub recommendation: Recommendation,
    pub analyses: Vec<ArticleAnalysis>,
    /// Articles returned by the news source.
    pub raw_articles_count: usize,
    /// Articles that survived quality filtering.
    pub filtered_articles_count: usize,
}

/// One daily close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// YYYY-MM-DD
    pub date: String,
    pub close: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceDirection {
    Up,
    Down,
    Flat,
}

impl PriceDirection {
    pub fn from_change(change_pct: f64) -> Self {
        if change_pct > 0.0 {
            PriceDirection::Up
        } else if change_pct < 0.0 {
            PriceDirection::Down
        } else {
            PriceDirection::Flat
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceDirection::Up => "up",
            PriceDirection::Down => "down",
            PriceDirection::Flat => "flat",
        }
    }
}

/// Recent price movement used to cross-check news sentiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub current_price: Decimal,
    pub reference_price: Decimal,
    pub change_pct: f64,
    pub direction: PriceDirection,
}

impl PriceSnapshot {
    pub fn new(current_price: Decimal, reference_price: Decimal) -> Option<Self> {
        if reference_price.is_zero() {
            return None;
        }
        let change_pct = stats::percent_change(
            reference_price.to_f64().unwrap_or(0.0),
            current_price.to_f64().unwrap_or(0.0),
        );
        Some(Self {
            current_price,
            reference_price,
            change_pct,
            direction: PriceDirection::from_change(change_pct),
        })
    }

    /// Build from an ordered close series: first point is the reference, last is current.
    /// Fewer than two points is "no data".
    pub fn from_series(points: &[PricePoint]) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        let reference = points.first()?.close;
        let current = points.last()?.close;
        Self::new(current, reference)
    }
}
