use analysis_core::{AnalysisError, MarketDataSource, PricePoint};
use chrono::{Months, NaiveDate};

/// Daily closes for `ticker` covering the `months` before `today`.
pub async fn fetch_history(
    source: &dyn MarketDataSource,
    ticker: &str,
    months: u32,
    today: NaiveDate,
) -> Result<Vec<PricePoint>, AnalysisError> {
    let from = today
        .checked_sub_months(Months::new(months))
        .ok_or_else(|| AnalysisError::InvalidData(format!("Cannot go back {} months from {}", months, today)))?;

    let history = source.daily_closes(ticker, from, today).await?;
    tracing::debug!("Fetched {} closes for {} since {}", history.len(), ticker, from);
    Ok(history)
}

/// Fetch several tickers. A ticker whose fetch fails is logged and returned with
/// an empty history so the simulator reports it as skipped.
pub async fn fetch_histories(
    source: &dyn MarketDataSource,
    tickers: &[String],
    months: u32,
    today: NaiveDate,
) -> Vec<(String, Vec<PricePoint>)> {
    let mut histories = Vec::with_capacity(tickers.len());
    for ticker in tickers {
        let history = match fetch_history(source, ticker, months, today).await {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!("Failed to fetch price history for {}: {}", ticker, e);
                Vec::new()
            }
        };
        histories.push((ticker.clone(), history));
    }
    histories
}
