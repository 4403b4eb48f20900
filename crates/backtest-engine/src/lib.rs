pub mod history;
pub mod models;
pub mod simulator;
pub mod synthesis;
pub mod windows;

pub use history::{fetch_histories, fetch_history};
pub use models::*;
pub use simulator::{classify, is_correct, summarize, BacktestSimulator};
pub use synthesis::{HeuristicSynthesizer, ProxySynthesizer, SentimentRegime, SentimentSynthesizer};
pub use windows::build_windows;
