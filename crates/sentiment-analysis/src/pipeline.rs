use std::sync::Arc;

use analysis_core::{
    AnalysisError, ArticleAnalysis, MarketDataSource, NewsSource, SentimentProvider,
    TickerSentimentResult,
};
use chrono::{Duration, Utc};

use crate::aggregator;
use crate::quality::{CompanyProfile, QualityScorer};
use crate::ranking;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// How far back to search for news.
    pub lookback_days: i64,
    /// Top-ranked articles sent to the sentiment provider.
    pub max_articles: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            lookback_days: 5,
            max_articles: 7,
        }
    }
}

/// News -> quality filter -> per-article sentiment -> weighted aggregate.
pub struct SentimentPipeline {
    news: Arc<dyn NewsSource>,
    sentiment: Arc<dyn SentimentProvider>,
    /// Optional lookup for company names not covered by the scorer's config.
    market_data: Option<Arc<dyn MarketDataSource>>,
    scorer: QualityScorer,
    config: PipelineConfig,
}

impl SentimentPipeline {
    pub fn new(
        news: Arc<dyn NewsSource>,
        sentiment: Arc<dyn SentimentProvider>,
        scorer: QualityScorer,
        config: PipelineConfig,
    ) -> Self {
        Self {
            news,
            sentiment,
            market_data: None,
            scorer,
            config,
        }
    }

    pub fn with_market_data(mut self, market_data: Arc<dyn MarketDataSource>) -> Self {
        self.market_data = Some(market_data);
        self
    }

    /// Scorer for `ticker`, extended with a looked-up company name when the config has none.
    async fn scorer_for(&self, ticker: &str) -> QualityScorer {
        if self.scorer.company(ticker).is_some_and(|p| !p.name.is_empty()) {
            return self.scorer.clone();
        }
        let Some(market_data) = &self.market_data else {
            return self.scorer.clone();
        };
        match market_data.company_name(ticker).await {
            Ok(Some(name)) => {
                tracing::debug!("Resolved {} to company '{}'", ticker, name);
                self.scorer.with_company(ticker, CompanyProfile::named(name))
            }
            Ok(None) => self.scorer.clone(),
            Err(e) => {
                tracing::debug!("Company lookup failed for {}: {}", ticker, e);
                self.scorer.clone()
            }
        }
    }

    /// Run one analysis for `ticker`.
    ///
    /// Returns `Ok(None)` when no article survives filtering or no article could be
    /// analyzed. Failures for individual articles are logged and skipped; a failed
    /// news fetch is returned as an error.
    pub async fn analyze_ticker(&self, ticker: &str) -> Result<Option<TickerSentimentResult>, AnalysisError> {
        let ticker = ticker.trim().to_uppercase();
        let scorer = self.scorer_for(&ticker).await;

        let query = match scorer.company(&ticker).map(|p| p.name.as_str()) {
            Some(name) if !name.is_empty() => format!("\"{}\" OR {}", name, ticker),
            _ => ticker.clone(),
        };
        let from = (Utc::now() - Duration::days(self.config.lookback_days)).date_naive();

        let articles = self.news.fetch_articles(&query, from).await?;
        let raw_count = articles.len();
        if articles.is_empty() {
            tracing::warn!("No news found for {}", ticker);
            return Ok(None);
        }

        let ranked = ranking::filter_and_rank(&scorer, &articles, &ticker);
        let filtered_count = ranked.len();
        if ranked.is_empty() {
            tracing::warn!("All {} articles for {} fell below the quality floor", raw_count, ticker);
            return Ok(None);
        }

        let selected = ranked.iter().take(self.config.max_articles);
        tracing::info!(
            "Analyzing {} articles for {} via {}",
            filtered_count.min(self.config.max_articles),
            ticker,
            self.sentiment.provider_name()
        );

        let mut analyses: Vec<ArticleAnalysis> = Vec::new();
        for scored in selected {
            match self.sentiment.analyze_article(&scored.article).await {
                Ok(reading) => {
                    let analysis = ArticleAnalysis::from_reading(scored, reading);
                    tracing::info!(
                        "  {:+.2} | {} | q={:.2} | {}",
                        analysis.sentiment,
                        analysis.signal,
                        analysis.quality_weight,
                        analysis.title.chars().take(50).collect::<String>()
                    );
                    analyses.push(analysis);
                }
                Err(e) => {
                    tracing::warn!("Skipping article '{}': {}", scored.article.title, e);
                }
            }
        }

        if analyses.is_empty() {
            tracing::warn!("No article for {} produced a usable analysis", ticker);
        }

        Ok(aggregator::aggregate(&ticker, analyses, raw_count, filtered_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::{Article, PricePoint, RelevanceTier, SentimentReading, Signal};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    struct FakeNews {
        articles: Vec<Article>,
        queries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl NewsSource for FakeNews {
        async fn fetch_articles(&self, query: &str, _from: NaiveDate) -> Result<Vec<Article>, AnalysisError> {
            self.queries.lock().unwrap().push(query.to_string());
            Ok(self.articles.clone())
        }
    }

    struct FailingNews;

    #[async_trait]
    impl NewsSource for FailingNews {
        async fn fetch_articles(&self, _query: &str, _from: NaiveDate) -> Result<Vec<Article>, AnalysisError> {
            Err(AnalysisError::ApiError("HTTP 500".to_string()))
        }
    }

    /// Bullish on "beat", bearish on "miss", unparseable on "garbled".
    struct ScriptedSentiment;

    #[async_trait]
    impl SentimentProvider for ScriptedSentiment {
        async fn analyze_article(&self, article: &Article) -> Result<SentimentReading, AnalysisError> {
            let title = article.title.to_lowercase();
            if title.contains("garbled") {
                return Err(AnalysisError::Parse("no SENTIMENT line".to_string()));
            }
            let (sentiment, signal) = if title.contains("beat") {
                (0.8, Signal::Buy)
            } else if title.contains("miss") {
                (-0.6, Signal::Sell)
            } else {
                (0.0, Signal::Hold)
            };
            Ok(SentimentReading {
                sentiment,
                confidence: Some(0.8),
                signal,
                reason: "scripted".to_string(),
                relevance: Some(RelevanceTier::High),
            })
        }

        fn provider_name(&self) -> &'static str {
            "scripted"
        }
    }

    struct FakeMarket;

    #[async_trait]
    impl MarketDataSource for FakeMarket {
        async fn daily_closes(&self, _ticker: &str, _from: NaiveDate, _to: NaiveDate) -> Result<Vec<PricePoint>, AnalysisError> {
            Ok(Vec::new())
        }

        async fn company_name(&self, _ticker: &str) -> Result<Option<String>, AnalysisError> {
            Ok(Some("Tesla, Inc.".to_string()))
        }
    }

    fn article(title: &str, source: &str) -> Article {
        Article {
            title: title.to_string(),
            description: None,
            source_name: source.to_string(),
            published_at: Utc::now().to_rfc3339(),
            url: None,
        }
    }

    fn pipeline(news: Arc<dyn NewsSource>) -> SentimentPipeline {
        SentimentPipeline::new(
            news,
            Arc::new(ScriptedSentiment),
            QualityScorer::default(),
            PipelineConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_analyze_ticker_end_to_end() {
        let news = Arc::new(FakeNews {
            articles: vec![
                article("AAPL earnings beat expectations", "Reuters"),
                article("AAPL revenue miss", "Bloomberg"),
                article("AAPL garbled quarterly update", "Reuters"),
                article("Celebrity gossip", "Random Blog"),
            ],
            queries: Mutex::new(Vec::new()),
        });
        let result = pipeline(news.clone()).analyze_ticker("aapl").await.unwrap().unwrap();

        assert_eq!(news.queries.lock().unwrap()[0], "\"apple inc\" OR AAPL");
        assert_eq!(result.ticker, "AAPL");
        assert_eq!(result.raw_articles_count, 4);
        assert_eq!(result.filtered_articles_count, 3);
        // the garbled article is skipped, not fatal
        assert_eq!(result.total_articles, 2);
        assert_eq!(result.buy_signals, 1);
        assert_eq!(result.sell_signals, 1);
        assert!(result.analyses.iter().all(|a| a.quality_weight > 0.4));
        assert!((result.avg_confidence - 0.8).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_no_signal_when_everything_is_filtered() {
        let news = Arc::new(FakeNews {
            articles: vec![article("Celebrity gossip", "Random Blog")],
            queries: Mutex::new(Vec::new()),
        });
        assert!(pipeline(news).analyze_ticker("AAPL").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_no_signal_when_every_analysis_fails() {
        let news = Arc::new(FakeNews {
            articles: vec![article("AAPL garbled earnings note", "Reuters")],
            queries: Mutex::new(Vec::new()),
        });
        assert!(pipeline(news).analyze_ticker("AAPL").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_news_failure_is_reported() {
        let err = pipeline(Arc::new(FailingNews)).analyze_ticker("AAPL").await;
        assert!(matches!(err, Err(AnalysisError::ApiError(_))));
    }

    #[tokio::test]
    async fn test_company_name_lookup_feeds_query() {
        let news = Arc::new(FakeNews {
            articles: Vec::new(),
            queries: Mutex::new(Vec::new()),
        });
        let pipeline = pipeline(news.clone()).with_market_data(Arc::new(FakeMarket));
        assert!(pipeline.analyze_ticker("TSLA").await.unwrap().is_none());
        assert_eq!(news.queries.lock().unwrap()[0], "\"tesla\" OR TSLA");
    }
}
