//! newspulse: LLM news sentiment for a ticker, cross-checked against price action,
//! plus a directional-accuracy backtest of the sentiment heuristic.
//!
//! Usage:
//!   newspulse analyze AAPL
//!   newspulse backtest TSLA --seed 42 --months 6
//!   newspulse backtest-multi AAPL MSFT NVDA --json
//!   newspulse proxy-backtest AAPL

use std::sync::Arc;

use analysis_core::{MarketDataSource, PriceSnapshot, TickerSentimentResult};
use backtest_engine::{
    fetch_histories, fetch_history, BacktestConfig, BacktestSimulator, HeuristicSynthesizer,
    ProxySynthesizer,
};
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use ml_client::{LlmConfig, LlmSentimentClient};
use news_collector::NewsApiClient;
use polygon_client::PolygonClient;
use risk_manager::ConvictionEngine;
use sentiment_analysis::{PipelineConfig, QualityConfig, QualityScorer, SentimentPipeline};

mod config;
mod report;

use config::{AppConfig, Requirements};
use report::{AnalyzeReport, ProxyReport};

const DEFAULT_TICKERS: &[&str] = &["AAPL", "TSLA", "NVDA", "MSFT", "GOOGL"];

/// Days of closes used for the price cross-check.
const PRICE_LOOKBACK_DAYS: i64 = 7;

#[derive(Parser)]
#[command(name = "newspulse")]
#[command(about = "News sentiment analysis and backtesting for stock tickers", long_about = None)]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze recent news sentiment for a ticker
    Analyze {
        ticker: String,
    },
    /// Backtest the sentiment heuristic against a ticker's history
    Backtest {
        ticker: String,
        /// Seed for reproducible sentiment draws
        #[arg(long)]
        seed: Option<u64>,
        /// Months of history (defaults to BACKTEST_MONTHS)
        #[arg(long)]
        months: Option<u32>,
    },
    /// Backtest several tickers and rank them by accuracy
    BacktestMulti {
        tickers: Vec<String>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        months: Option<u32>,
    },
    /// Replay today's live sentiment over the history (approximate)
    ProxyBacktest {
        ticker: String,
        #[arg(long)]
        months: Option<u32>,
    },
}

impl Commands {
    fn requirements(&self) -> Requirements {
        match self {
            Commands::Analyze { .. } | Commands::ProxyBacktest { .. } => Requirements {
                news: true,
                market_data: true,
                llm: true,
            },
            Commands::Backtest { .. } | Commands::BacktestMulti { .. } => Requirements {
                news: false,
                market_data: true,
                llm: false,
            },
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "newspulse=info,sentiment_analysis=info,backtest_engine=info,polygon_client=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;
    config.ensure(cli.command.requirements())?;

    match cli.command {
        Commands::Analyze { ticker } => {
            match analyze(&config, &ticker).await? {
                Some(analysis) if cli.json => report::print_json(&analysis)?,
                Some(analysis) => report::print_analysis(&analysis),
                None => println!("No usable news found for {}", ticker.to_uppercase()),
            }
        }
        Commands::Backtest { ticker, seed, months } => {
            let market = polygon(&config)?;
            let months = months.unwrap_or(config.backtest_months);
            let history = fetch_history(&market, &ticker.to_uppercase(), months, Utc::now().date_naive()).await?;

            let synthesizer = match seed {
                Some(seed) => HeuristicSynthesizer::seeded(seed),
                None => HeuristicSynthesizer::from_entropy(),
            };
            let mut simulator = BacktestSimulator::new(BacktestConfig::default(), synthesizer);
            match simulator.run(&ticker.to_uppercase(), &history) {
                Some(summary) if cli.json => report::print_json(&summary)?,
                Some(summary) => report::print_backtest(&summary, "heuristic"),
                None => println!("Not enough price history for {}", ticker.to_uppercase()),
            }
        }
        Commands::BacktestMulti { tickers, seed, months } => {
            let market = polygon(&config)?;
            let tickers: Vec<String> = if tickers.is_empty() {
                DEFAULT_TICKERS.iter().map(|t| t.to_string()).collect()
            } else {
                tickers.iter().map(|t| t.to_uppercase()).collect()
            };
            let months = months.unwrap_or(config.backtest_months);
            let histories = fetch_histories(&market, &tickers, months, Utc::now().date_naive()).await;

            let synthesizer = match seed {
                Some(seed) => HeuristicSynthesizer::seeded(seed),
                None => HeuristicSynthesizer::from_entropy(),
            };
            let mut simulator = BacktestSimulator::new(BacktestConfig::default(), synthesizer);
            let multi = simulator.run_multi(&histories);
            if cli.json {
                report::print_json(&multi)?;
            } else {
                report::print_multi(&multi);
            }
        }
        Commands::ProxyBacktest { ticker, months } => {
            let ticker = ticker.to_uppercase();
            let Some(live) = live_sentiment(&config, &ticker).await? else {
                println!("No usable news found for {}; nothing to replay", ticker);
                return Ok(());
            };

            let market = polygon(&config)?;
            let months = months.unwrap_or(config.backtest_months);
            let history = fetch_history(&market, &ticker, months, Utc::now().date_naive()).await?;

            let mut simulator =
                BacktestSimulator::new(BacktestConfig::default(), ProxySynthesizer::new(live.avg_sentiment));
            match simulator.run(&ticker, &history) {
                Some(summary) => {
                    let proxy = ProxyReport {
                        live_sentiment: live.avg_sentiment,
                        summary,
                    };
                    if cli.json {
                        report::print_json(&proxy)?;
                    } else {
                        report::print_proxy(&proxy);
                    }
                }
                None => println!("Not enough price history for {}", ticker),
            }
        }
    }

    Ok(())
}

fn polygon(config: &AppConfig) -> anyhow::Result<PolygonClient> {
    let key = config
        .polygon_api_key
        .clone()
        .ok_or_else(|| analysis_core::AnalysisError::MissingCredentials("POLYGON_API_KEY".to_string()))?;
    Ok(PolygonClient::new(key))
}

fn pipeline(config: &AppConfig, market: Arc<PolygonClient>) -> anyhow::Result<SentimentPipeline> {
    let news_key = config
        .news_api_key
        .clone()
        .ok_or_else(|| analysis_core::AnalysisError::MissingCredentials("NEWS_API_KEY".to_string()))?;
    let llm_key = config
        .openai_api_key
        .clone()
        .ok_or_else(|| analysis_core::AnalysisError::MissingCredentials("OPENAI_API_KEY".to_string()))?;

    let quality = match &config.quality_config_path {
        Some(path) => QualityConfig::from_json_file(path)?,
        None => QualityConfig::default(),
    };

    let llm = LlmSentimentClient::new(
        LlmConfig::new(llm_key)
            .with_base_url(config.llm_base_url.clone())
            .with_model(config.llm_model.clone()),
    )?;

    Ok(SentimentPipeline::new(
        Arc::new(NewsApiClient::new(news_key)),
        Arc::new(llm),
        QualityScorer::new(quality),
        PipelineConfig {
            lookback_days: config.news_lookback_days,
            max_articles: config.max_articles_analyzed,
        },
    )
    .with_market_data(market))
}

async fn live_sentiment(config: &AppConfig, ticker: &str) -> anyhow::Result<Option<TickerSentimentResult>> {
    let market = Arc::new(polygon(config)?);
    Ok(pipeline(config, market)?.analyze_ticker(ticker).await?)
}

async fn analyze(config: &AppConfig, ticker: &str) -> anyhow::Result<Option<AnalyzeReport>> {
    let market = Arc::new(polygon(config)?);
    let pipeline = pipeline(config, market.clone())?;

    let Some(sentiment) = pipeline.analyze_ticker(ticker).await? else {
        return Ok(None);
    };

    let today = Utc::now().date_naive();
    let price = match market
        .daily_closes(&sentiment.ticker, today - Duration::days(PRICE_LOOKBACK_DAYS), today)
        .await
    {
        Ok(points) => PriceSnapshot::from_series(&points),
        Err(e) => {
            tracing::warn!("Price lookup failed for {}: {}", sentiment.ticker, e);
            None
        }
    };

    let risk = price
        .as_ref()
        .map(|p| ConvictionEngine::default().evaluate(&sentiment.analyses, p));

    Ok(Some(AnalyzeReport { sentiment, price, risk }))
}
