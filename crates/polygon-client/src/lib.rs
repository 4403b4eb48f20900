use analysis_core::{AnalysisError, MarketDataSource, PricePoint};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use reqwest::Client;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

const BASE_URL: &str = "https://api.polygon.io";

/// Sliding-window rate limiter: at most `max_requests` per `window` duration.
#[derive(Clone)]
struct RateLimiter {
    timestamps: Arc<Mutex<VecDeque<Instant>>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            timestamps: Arc::new(Mutex::new(VecDeque::new())),
            max_requests: max_requests.max(1),
            window,
        }
    }

    async fn acquire(&self) {
        loop {
            let mut ts = self.timestamps.lock().await;
            let now = Instant::now();

            // Remove timestamps outside the window
            while let Some(&front) = ts.front() {
                if now.duration_since(front) >= self.window {
                    ts.pop_front();
                } else {
                    break;
                }
            }

            if ts.len() < self.max_requests {
                ts.push_back(now);
                return;
            }
            let Some(&oldest) = ts.front() else {
                ts.push_back(now);
                return;
            };

            // Wait until the oldest request falls out of the window
            let sleep_dur = (oldest + self.window).duration_since(now) + Duration::from_millis(50);
            drop(ts);
            tracing::debug!("Rate limiter: waiting {:.1}s for Polygon API slot", sleep_dur.as_secs_f64());
            tokio::time::sleep(sleep_dur).await;
        }
    }
}

/// Polygon.io REST client for daily closes and ticker reference data.
#[derive(Clone)]
pub struct PolygonClient {
    api_key: String,
    base_url: String,
    client: Client,
    rate_limiter: RateLimiter,
}

impl PolygonClient {
    pub fn new(api_key: String) -> Self {
        // Free tier allows 5 req/min; paid plans should raise POLYGON_RATE_LIMIT.
        let rate_limit: usize = std::env::var("POLYGON_RATE_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            api_key,
            base_url: BASE_URL.to_string(),
            client,
            rate_limiter: RateLimiter::new(rate_limit, Duration::from_secs(60)),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Send a request with rate limiting and automatic 429 retry.
    async fn send_request(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, AnalysisError> {
        let request = builder.build().map_err(|e| AnalysisError::ApiError(e.to_string()))?;

        for attempt in 0..3u32 {
            self.rate_limiter.acquire().await;
            let req_clone = request.try_clone()
                .ok_or_else(|| AnalysisError::ApiError("Cannot clone request".to_string()))?;
            let response = self.client.execute(req_clone).await
                .map_err(|e| AnalysisError::ApiError(e.to_string()))?;

            if response.status().as_u16() != 429 {
                return Ok(response);
            }

            let wait_secs = 15u64;
            tracing::warn!("Polygon 429 rate limited, waiting {}s before retry {}/3", wait_secs, attempt + 1);
            tokio::time::sleep(Duration::from_secs(wait_secs)).await;
        }

        Err(AnalysisError::ApiError("Rate limited by Polygon after 3 retries".to_string()))
    }

    async fn error_for_status(response: reqwest::Response) -> AnalysisError {
        AnalysisError::ApiError(format!(
            "HTTP {}: {}",
            response.status(),
            response.text().await.unwrap_or_default()
        ))
    }

    /// Daily adjusted closes between `from` and `to`, oldest first.
    pub async fn get_daily_closes(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PricePoint>, AnalysisError> {
        let url = format!(
            "{}/v2/aggs/ticker/{}/range/1/day/{}/{}",
            self.base_url,
            symbol.to_uppercase(),
            from.format("%Y-%m-%d"),
            to.format("%Y-%m-%d")
        );

        let response = self.send_request(
            self.client.get(&url).query(&[
                ("apiKey", self.api_key.as_str()),
                ("adjusted", "true"),
                ("sort", "asc"),
            ])
        ).await?;

        if !response.status().is_success() {
            return Err(Self::error_for_status(response).await);
        }

        let agg_response: AggregateResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::ApiError(e.to_string()))?;

        Ok(agg_response.into_price_points())
    }

    /// Get ticker details
    pub async fn get_ticker_details(&self, symbol: &str) -> Result<TickerDetails, AnalysisError> {
        let url = format!("{}/v3/reference/tickers/{}", self.base_url, symbol.to_uppercase());

        let response = self.send_request(
            self.client.get(&url).query(&[("apiKey", &self.api_key)])
        ).await?;

        if !response.status().is_success() {
            return Err(Self::error_for_status(response).await);
        }

        let details_response: TickerDetailsResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::ApiError(e.to_string()))?;

        Ok(details_response.results)
    }
}

#[async_trait]
impl MarketDataSource for PolygonClient {
    async fn daily_closes(
        &self,
        ticker: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PricePoint>, AnalysisError> {
        self.get_daily_closes(ticker, from, to).await
    }

    async fn company_name(&self, ticker: &str) -> Result<Option<String>, AnalysisError> {
        let details = self.get_ticker_details(ticker).await?;
        let name = details.name.trim().to_string();
        Ok(if name.is_empty() { None } else { Some(name) })
    }
}

// Response structures
#[derive(Debug, Deserialize)]
struct AggregateResponse {
    #[serde(default)]
    results: Vec<AggregateResult>,
}

#[derive(Debug, Deserialize)]
struct AggregateResult {
    t: i64, // timestamp (ms)
    c: f64, // close
}

impl AggregateResponse {
    /// Bars with an unrepresentable timestamp or close are dropped.
    fn into_price_points(self) -> Vec<PricePoint> {
        self.results
            .into_iter()
            .filter_map(|r| {
                let date = DateTime::from_timestamp_millis(r.t)?.date_naive();
                Some(PricePoint {
                    date: date.format("%Y-%m-%d").to_string(),
                    close: Decimal::from_f64(r.c)?,
                })
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct TickerDetailsResponse {
    results: TickerDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerDetails {
    pub ticker: String,
    pub name: String,
    #[serde(default)]
    pub market: Option<String>,
    #[serde(default)]
    pub primary_exchange: Option<String>,
    #[serde(default)]
    pub market_cap: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::ToPrimitive;

    #[test]
    fn test_aggregates_to_daily_closes() {
        let body = r#"{
            "ticker": "AAPL",
            "status": "OK",
            "results": [
                {"v": 70790813.0, "vw": 131.6, "o": 130.28, "c": 131.86, "h": 133.41, "l": 129.89, "t": 1704171600000, "n": 645365},
                {"v": 63813002.0, "vw": 129.0, "o": 129.0, "c": 128.5, "h": 130.0, "l": 127.9, "t": 1704258000000, "n": 600000}
            ]
        }"#;
        let parsed: AggregateResponse = serde_json::from_str(body).unwrap();
        let points = parsed.into_price_points();

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, "2024-01-02");
        assert_eq!(points[1].date, "2024-01-03");
        assert!((points[0].close.to_f64().unwrap() - 131.86).abs() < 1e-9);
    }

    #[test]
    fn test_missing_results_is_empty() {
        let parsed: AggregateResponse =
            serde_json::from_str(r#"{"ticker": "ZZZZ", "status": "OK", "resultsCount": 0}"#).unwrap();
        assert!(parsed.into_price_points().is_empty());
    }

    #[test]
    fn test_ticker_details_name() {
        let body = r#"{
            "results": {"ticker": "AAPL", "name": "Apple Inc.", "market": "stocks", "primary_exchange": "XNAS", "active": true}
        }"#;
        let parsed: TickerDetailsResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.results.name, "Apple Inc.");
        assert_eq!(parsed.results.market.as_deref(), Some("stocks"));
    }

    #[tokio::test]
    async fn test_rate_limiter_admits_up_to_limit() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        for _ in 0..3 {
            limiter.acquire().await;
        }
        assert_eq!(limiter.timestamps.lock().await.len(), 3);
    }
}
