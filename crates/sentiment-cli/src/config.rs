use analysis_core::AnalysisError;
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Runtime settings, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    // External APIs
    pub news_api_key: Option<String>,
    pub polygon_api_key: Option<String>,
    pub openai_api_key: Option<String>,

    // Language model
    pub llm_model: String,
    pub llm_base_url: String,

    // Analysis
    pub news_lookback_days: i64,  // 5
    pub max_articles_analyzed: usize,  // 7
    pub quality_config_path: Option<PathBuf>,

    // Backtest
    pub backtest_months: u32,  // 3
}

/// Which credentials a command needs.
#[derive(Debug, Clone, Copy)]
pub struct Requirements {
    pub news: bool,
    pub market_data: bool,
    pub llm: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Ok(Self {
            news_api_key: get("NEWS_API_KEY"),
            polygon_api_key: get("POLYGON_API_KEY"),
            openai_api_key: get("OPENAI_API_KEY"),

            llm_model: get("LLM_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string()),
            llm_base_url: get("LLM_BASE_URL")
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),

            news_lookback_days: get("NEWS_LOOKBACK_DAYS")
                .unwrap_or_else(|| "5".to_string())
                .parse()
                .context("NEWS_LOOKBACK_DAYS must be an integer")?,
            max_articles_analyzed: get("MAX_ARTICLES_ANALYZED")
                .unwrap_or_else(|| "7".to_string())
                .parse()
                .context("MAX_ARTICLES_ANALYZED must be a positive integer")?,
            quality_config_path: get("QUALITY_CONFIG_PATH").map(PathBuf::from),

            backtest_months: get("BACKTEST_MONTHS")
                .unwrap_or_else(|| "3".to_string())
                .parse()
                .context("BACKTEST_MONTHS must be a positive integer")?,
        })
    }

    /// Fail once, naming every missing key the command needs.
    pub fn ensure(&self, needs: Requirements) -> Result<(), AnalysisError> {
        let mut missing = Vec::new();
        if needs.news && self.news_api_key.is_none() {
            missing.push("NEWS_API_KEY");
        }
        if needs.market_data && self.polygon_api_key.is_none() {
            missing.push("POLYGON_API_KEY");
        }
        if needs.llm && self.openai_api_key.is_none() {
            missing.push("OPENAI_API_KEY");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(AnalysisError::MissingCredentials(missing.join(", ")))
        }
    }
}
