//! News quality scoring, ranking and quality-weighted sentiment aggregation.

pub mod aggregator;
pub mod pipeline;
pub mod quality;
pub mod ranking;

pub use aggregator::{aggregate, average_confidence, count_signals, weighted_sentiment};
pub use pipeline::{PipelineConfig, SentimentPipeline};
pub use quality::{canonical_company_name, CompanyProfile, QualityConfig, QualityScorer};
pub use ranking::{filter_and_rank, filter_and_rank_at};
