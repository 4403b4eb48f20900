use async_trait::async_trait;
use chrono::NaiveDate;

use crate::{AnalysisError, Article, PricePoint, SentimentReading};

/// Source of raw news articles. Results are not assumed to be ordered by quality.
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn fetch_articles(&self, query: &str, from: NaiveDate) -> Result<Vec<Article>, AnalysisError>;
}

/// Source of daily close prices, ordered by date ascending.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    async fn daily_closes(
        &self,
        ticker: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PricePoint>, AnalysisError>;

    /// Canonical company name for a ticker, if the provider knows it.
    async fn company_name(&self, _ticker: &str) -> Result<Option<String>, AnalysisError> {
        Ok(None)
    }
}

/// Per-article sentiment extraction (hosted language model or similar).
#[async_trait]
pub trait SentimentProvider: Send + Sync {
    async fn analyze_article(&self, article: &Article) -> Result<SentimentReading, AnalysisError>;

    fn provider_name(&self) -> &'static str;
}
