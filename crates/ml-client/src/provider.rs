use analysis_core::{AnalysisError, Article, SentimentProvider, SentimentReading};
use async_trait::async_trait;

use crate::sentiment::LlmSentimentClient;

#[async_trait]
impl SentimentProvider for LlmSentimentClient {
    async fn analyze_article(&self, article: &Article) -> Result<SentimentReading, AnalysisError> {
        Ok(self.analyze(article).await?)
    }

    fn provider_name(&self) -> &'static str {
        "openai-compatible"
    }
}
