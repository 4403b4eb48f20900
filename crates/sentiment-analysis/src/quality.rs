//! Article quality scoring: source credibility, topical relevance and recency.
//!
//! All keyword tables come from [`QualityConfig`], so a scorer can be built for a
//! different market (or a test fixture) without touching the scoring rules.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use analysis_core::{AnalysisError, Article, ScoredArticle};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

const TIER1_CREDIBILITY: f64 = 1.0;
const TIER2_CREDIBILITY: f64 = 0.7;
const UNKNOWN_CREDIBILITY: f64 = 0.3;

const TITLE_MENTION_BONUS: f64 = 0.5;
const TEXT_MENTION_BONUS: f64 = 0.2;
const IMPACT_PER_HIT: f64 = 0.15;
const IMPACT_CAP: f64 = 0.4;
const COMPANY_PER_HIT: f64 = 0.1;
const COMPANY_CAP: f64 = 0.3;
const NOISE_PER_HIT: f64 = 0.2;
const NOISE_CAP: f64 = 0.5;

const DECAY_HOURS: f64 = 72.0;
const MIN_TIME_WEIGHT: f64 = 0.1;
const UNPARSABLE_TIME_WEIGHT: f64 = 0.5;

const CREDIBILITY_WEIGHT: f64 = 0.4;
const RELEVANCE_WEIGHT: f64 = 0.4;
const RECENCY_WEIGHT: f64 = 0.2;

/// Canonical name and company-specific vocabulary for one ticker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl CompanyProfile {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keywords: Vec::new(),
        }
    }
}

/// Keyword tables driving the quality scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    pub tier1_sources: Vec<String>,
    pub tier2_sources: Vec<String>,
    pub high_impact_keywords: Vec<String>,
    pub noise_keywords: Vec<String>,
    /// Keyed by upper-case ticker.
    pub companies: HashMap<String, CompanyProfile>,
    /// Articles must score strictly above this to survive filtering.
    pub min_quality_score: f64,
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Default for QualityConfig {
    fn default() -> Self {
        let mut companies = HashMap::new();
        companies.insert(
            "AAPL".to_string(),
            CompanyProfile {
                name: "apple inc".to_string(),
                keywords: owned(&[
                    "apple inc", "tim cook", "iphone", "ipad", "mac", "app store",
                    "services revenue", "hardware sales", "china sales",
                ]),
            },
        );

        Self {
            tier1_sources: owned(&[
                "reuters", "bloomberg", "wall street journal", "financial times",
                "wsj", "ft.com", "cnbc", "marketwatch", "seeking alpha",
                "associated press", "ap news", "dow jones",
            ]),
            tier2_sources: owned(&[
                "yahoo finance", "yahoo entertainment", "cnn business", "forbes",
                "business insider", "the motley fool", "benzinga", "zacks",
                "barrons", "investor place", "thestreet", "fool.com",
            ]),
            high_impact_keywords: owned(&[
                "earnings", "revenue", "profit", "loss", "beat", "miss", "guidance",
                "acquisition", "merger", "partnership", "ipo", "dividend", "split",
                "ceo", "cfo", "layoffs", "hiring", "product launch", "recall",
                "quarterly", "q1", "q2", "q3", "q4", "conference call", "outlook",
            ]),
            noise_keywords: owned(&[
                "analyst says", "opinion", "rumor", "speculation", "could", "might",
                "social media", "twitter", "reddit", "meme", "sells 145 shares",
                "buys", "sells", "shares of", "price target", "rating",
            ]),
            companies,
            min_quality_score: 0.4,
        }
    }
}

impl QualityConfig {
    /// Load a config from a JSON file. Missing fields fall back to the built-in tables.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, AnalysisError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AnalysisError::InvalidData(format!("cannot read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&raw)
            .map_err(|e| AnalysisError::Parse(format!("{}: {}", path.display(), e)))
    }
}

/// Lower-cased, de-duplicated keyword set. Order is kept so tier matching is stable.
fn normalize(words: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    words
        .iter()
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty() && seen.insert(w.clone()))
        .collect()
}

const LEGAL_SUFFIXES: &[&str] = &[
    "inc", "incorporated", "corp", "corporation", "co", "company", "ltd", "limited", "plc", "llc",
];

/// Lower-cased company name as it appears in headlines: "Tesla, Inc." -> "tesla".
///
/// Trailing punctuation and legal suffixes are dropped. A name that is only a
/// suffix is kept as is.
pub fn canonical_company_name(name: &str) -> String {
    let mut words: Vec<String> = name.split_whitespace().map(|w| w.to_lowercase()).collect();
    while words.len() > 1 {
        let Some(last) = words.last() else { break };
        let bare = last.trim_matches(|c: char| !c.is_alphanumeric());
        if bare.is_empty() || LEGAL_SUFFIXES.contains(&bare) {
            words.pop();
        } else {
            break;
        }
    }
    words
        .join(" ")
        .trim_end_matches(|c: char| !c.is_alphanumeric())
        .to_string()
}

fn distinct_hits(keywords: &[String], text: &str) -> usize {
    keywords.iter().filter(|k| text.contains(k.as_str())).count()
}

/// Scores articles against one immutable [`QualityConfig`].
#[derive(Debug, Clone)]
pub struct QualityScorer {
    tier1_sources: Vec<String>,
    tier2_sources: Vec<String>,
    high_impact_keywords: Vec<String>,
    noise_keywords: Vec<String>,
    companies: HashMap<String, CompanyProfile>,
    min_quality_score: f64,
}

impl QualityScorer {
    pub fn new(config: QualityConfig) -> Self {
        let companies = config
            .companies
            .into_iter()
            .map(|(ticker, profile)| {
                let profile = CompanyProfile {
                    name: profile.name.trim().to_lowercase(),
                    keywords: normalize(&profile.keywords),
                };
                (ticker.to_uppercase(), profile)
            })
            .collect();

        Self {
            tier1_sources: normalize(&config.tier1_sources),
            tier2_sources: normalize(&config.tier2_sources),
            high_impact_keywords: normalize(&config.high_impact_keywords),
            noise_keywords: normalize(&config.noise_keywords),
            companies,
            min_quality_score: config.min_quality_score,
        }
    }

    /// Copy of this scorer with a company profile registered for `ticker`.
    /// An existing profile is kept; only its missing name is filled in, in
    /// canonical form.
    pub fn with_company(&self, ticker: &str, profile: CompanyProfile) -> Self {
        let mut scorer = self.clone();
        let entry = scorer.companies.entry(ticker.to_uppercase()).or_default();
        if entry.name.is_empty() {
            entry.name = canonical_company_name(&profile.name);
        }
        if entry.keywords.is_empty() {
            entry.keywords = normalize(&profile.keywords);
        }
        scorer
    }

    pub fn company(&self, ticker: &str) -> Option<&CompanyProfile> {
        self.companies.get(&ticker.to_uppercase())
    }

    pub fn min_quality_score(&self) -> f64 {
        self.min_quality_score
    }

    /// 1.0 for tier-1 sources, 0.7 for tier-2, 0.3 otherwise. Case-insensitive substring match.
    pub fn credibility(&self, source_name: &str) -> f64 {
        let source = source_name.to_lowercase();
        if self.tier1_sources.iter().any(|s| source.contains(s.as_str())) {
            TIER1_CREDIBILITY
        } else if self.tier2_sources.iter().any(|s| source.contains(s.as_str())) {
            TIER2_CREDIBILITY
        } else {
            UNKNOWN_CREDIBILITY
        }
    }

    /// Topical relevance of an article to `ticker`, in [0, 1].
    pub fn relevance(&self, article: &Article, ticker: &str) -> f64 {
        let title = article.title.to_lowercase();
        let text = article.text().to_lowercase();
        let ticker_lower = ticker.trim().to_lowercase();
        let profile = self.company(ticker);
        let company_name = profile.map(|p| p.name.as_str()).filter(|n| !n.is_empty());

        let mentions = |haystack: &str| {
            (!ticker_lower.is_empty() && haystack.contains(ticker_lower.as_str()))
                || company_name.is_some_and(|name| haystack.contains(name))
        };

        let mut score = 0.0;
        if mentions(&title) {
            score += TITLE_MENTION_BONUS;
        } else if mentions(&text) {
            score += TEXT_MENTION_BONUS;
        }

        let impact_hits = distinct_hits(&self.high_impact_keywords, &text);
        score += (impact_hits as f64 * IMPACT_PER_HIT).min(IMPACT_CAP);

        if let Some(profile) = profile {
            let company_hits = distinct_hits(&profile.keywords, &text);
            score += (company_hits as f64 * COMPANY_PER_HIT).min(COMPANY_CAP);
        }

        let noise_hits = distinct_hits(&self.noise_keywords, &text);
        score -= (noise_hits as f64 * NOISE_PER_HIT).min(NOISE_CAP);

        score.clamp(0.0, 1.0)
    }

    /// Linear decay over 72 hours with a floor of 0.1. Unparsable timestamps weigh 0.5.
    pub fn time_weight(&self, published_at: &str, now: DateTime<Utc>) -> f64 {
        match parse_timestamp(published_at) {
            Some(published) => {
                let hours_ago = (now - published).num_seconds() as f64 / 3600.0;
                (1.0 - hours_ago / DECAY_HOURS).clamp(MIN_TIME_WEIGHT, 1.0)
            }
            None => UNPARSABLE_TIME_WEIGHT,
        }
    }

    pub fn score(&self, article: &Article, ticker: &str) -> ScoredArticle {
        self.score_at(article, ticker, Utc::now())
    }

    /// Score against an explicit clock.
    pub fn score_at(&self, article: &Article, ticker: &str, now: DateTime<Utc>) -> ScoredArticle {
        let credibility = self.credibility(&article.source_name);
        let relevance = self.relevance(article, ticker);
        let time_weight = self.time_weight(&article.published_at, now);
        let quality_score = (credibility * CREDIBILITY_WEIGHT
            + relevance * RELEVANCE_WEIGHT
            + time_weight * RECENCY_WEIGHT)
            .clamp(0.0, 1.0);

        ScoredArticle {
            article: article.clone(),
            credibility,
            relevance,
            time_weight,
            quality_score,
        }
    }
}

impl Default for QualityScorer {
    fn default() -> Self {
        Self::new(QualityConfig::default())
    }
}

/// RFC 3339 first, then naive date-times and bare dates taken as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
