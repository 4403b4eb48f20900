//! NewsAPI client producing [`Article`]s for the sentiment pipeline.

use analysis_core::{AnalysisError, Article, NewsSource};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const BASE_URL: &str = "https://newsapi.org/v2";

/// Placeholder title NewsAPI uses for withdrawn articles.
const REMOVED_TITLE: &str = "[Removed]";

pub struct NewsApiClient {
    api_key: String,
    base_url: String,
    page_size: u32,
    http_client: Client,
}

impl NewsApiClient {
    pub fn new(api_key: String) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(20))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            api_key,
            base_url: BASE_URL.to_string(),
            page_size: 10,
            http_client,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// NewsAPI caps `pageSize` at 100.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, 100);
        self
    }

    /// Search `everything` for English articles published since `from`, newest first.
    pub async fn search(&self, query: &str, from: NaiveDate) -> Result<Vec<Article>, AnalysisError> {
        let from = from.format("%Y-%m-%d").to_string();
        let page_size = self.page_size.to_string();

        let response = self
            .http_client
            .get(format!("{}/everything", self.base_url))
            .header("X-Api-Key", &self.api_key)
            .query(&[
                ("q", query),
                ("from", from.as_str()),
                ("language", "en"),
                ("sortBy", "publishedAt"),
                ("pageSize", page_size.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AnalysisError::ApiError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AnalysisError::ApiError(e.to_string()))?;

        let parsed: NewsApiResponse = serde_json::from_str(&body).map_err(|e| {
            AnalysisError::ApiError(format!("HTTP {}: unreadable NewsAPI response: {}", status, e))
        })?;

        let articles = parsed.into_articles()?;
        tracing::info!("Found {} articles for query {}", articles.len(), query);
        Ok(articles)
    }
}

#[async_trait]
impl NewsSource for NewsApiClient {
    async fn fetch_articles(&self, query: &str, from: NaiveDate) -> Result<Vec<Article>, AnalysisError> {
        self.search(query, from).await
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiResponse {
    status: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiArticle {
    #[serde(default)]
    source: Option<NewsApiSource>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsApiSource {
    #[serde(default)]
    name: Option<String>,
}

impl NewsApiResponse {
    fn into_articles(self) -> Result<Vec<Article>, AnalysisError> {
        if self.status != "ok" {
            return Err(AnalysisError::ApiError(format!(
                "NewsAPI {}: {}",
                self.code.as_deref().unwrap_or("error"),
                self.message.as_deref().unwrap_or("no message")
            )));
        }

        Ok(self
            .articles
            .into_iter()
            .filter_map(NewsApiArticle::into_article)
            .collect())
    }
}

impl NewsApiArticle {
    /// Articles without a usable title are dropped.
    fn into_article(self) -> Option<Article> {
        let title = self.title?.trim().to_string();
        if title.is_empty() || title == REMOVED_TITLE {
            return None;
        }
        Some(Article {
            title,
            description: self.description.filter(|d| !d.trim().is_empty()),
            source_name: self
                .source
                .and_then(|s| s.name)
                .unwrap_or_default(),
            published_at: self.published_at.unwrap_or_default(),
            url: self.url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_articles_and_drops_untitled() {
        let body = r#"{
            "status": "ok",
            "totalResults": 3,
            "articles": [
                {
                    "source": {"id": "reuters", "name": "Reuters"},
                    "author": "Jane Doe",
                    "title": "Apple beats earnings expectations",
                    "description": "Revenue rose 8% on iPhone demand.",
                    "url": "https://www.reuters.com/a",
                    "publishedAt": "2024-05-02T20:31:00Z",
                    "content": "..."
                },
                {
                    "source": {"id": null, "name": "Yahoo Entertainment"},
                    "title": null,
                    "description": "no title",
                    "url": "https://example.com/b",
                    "publishedAt": "2024-05-02T19:00:00Z"
                },
                {
                    "source": {"id": null, "name": "[Removed]"},
                    "title": "[Removed]",
                    "description": "[Removed]",
                    "url": "https://removed.com",
                    "publishedAt": "1970-01-01T00:00:00Z"
                }
            ]
        }"#;
        let parsed: NewsApiResponse = serde_json::from_str(body).unwrap();
        let articles = parsed.into_articles().unwrap();

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Apple beats earnings expectations");
        assert_eq!(articles[0].source_name, "Reuters");
        assert_eq!(articles[0].published_at, "2024-05-02T20:31:00Z");
        assert_eq!(articles[0].description.as_deref(), Some("Revenue rose 8% on iPhone demand."));
    }

    #[test]
    fn test_error_status_is_api_error() {
        let body = r#"{"status": "error", "code": "apiKeyInvalid", "message": "Your API key is invalid."}"#;
        let parsed: NewsApiResponse = serde_json::from_str(body).unwrap();
        match parsed.into_articles() {
            Err(AnalysisError::ApiError(msg)) => assert!(msg.contains("apiKeyInvalid")),
            other => panic!("expected ApiError, got {:?}", other),
        }
    }

    #[test]
    fn test_page_size_is_capped() {
        let client = NewsApiClient::new("key".to_string()).with_page_size(500);
        assert_eq!(client.page_size, 100);
    }
}
