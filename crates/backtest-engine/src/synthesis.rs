//! Sentiment sources for backtest periods.
//!
//! No historical news is replayed. [`HeuristicSynthesizer`] draws a plausible
//! sentiment from the previous period's return and the current volatility;
//! [`ProxySynthesizer`] reuses one live reading for every period. Both are
//! approximations and sit behind [`SentimentSynthesizer`] so a real replay source
//! can replace them without touching the statistics.

use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use statrs::distribution::Normal;

use crate::models::PeriodContext;

pub trait SentimentSynthesizer {
    /// Sentiment in [-1, 1] for one period.
    fn synthesize(&mut self, ticker: &str, ctx: &PeriodContext) -> f64;

    fn name(&self) -> &'static str;
}

/// Market condition picked from the previous return and current volatility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentRegime {
    /// Big prior gain on quiet trading: expect a correction.
    PostRally,
    /// Big prior loss on heavy volatility: expect a bounce.
    Bounce,
    /// Uncertainty bias.
    HighVolatility,
    Baseline,
}

impl SentimentRegime {
    pub fn classify(prev_return: f64, volatility: f64) -> Self {
        if prev_return > 3.0 && volatility < 2.0 {
            SentimentRegime::PostRally
        } else if prev_return < -3.0 && volatility > 4.0 {
            SentimentRegime::Bounce
        } else if volatility > 5.0 {
            SentimentRegime::HighVolatility
        } else {
            SentimentRegime::Baseline
        }
    }

    /// (mean, std dev) of the sentiment draw.
    pub fn distribution(&self) -> (f64, f64) {
        match self {
            SentimentRegime::PostRally => (-0.2, 0.2),
            SentimentRegime::Bounce => (0.3, 0.2),
            SentimentRegime::HighVolatility => (-0.1, 0.3),
            SentimentRegime::Baseline => (0.1, 0.2),
        }
    }
}

/// Normal draws around a regime-dependent center, from an injected RNG.
pub struct HeuristicSynthesizer<R: Rng> {
    rng: R,
}

impl<R: Rng> HeuristicSynthesizer<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl HeuristicSynthesizer<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> SentimentSynthesizer for HeuristicSynthesizer<R> {
    fn synthesize(&mut self, _ticker: &str, ctx: &PeriodContext) -> f64 {
        let regime = SentimentRegime::classify(ctx.prev_return, ctx.volatility);
        let (mean, std_dev) = regime.distribution();
        let draw = match Normal::new(mean, std_dev) {
            Ok(normal) => normal.sample(&mut self.rng),
            Err(_) => mean,
        };
        draw.clamp(-1.0, 1.0)
    }

    fn name(&self) -> &'static str {
        "heuristic"
    }
}

/// Replays one live sentiment reading for every period.
#[derive(Debug, Clone, Copy)]
pub struct ProxySynthesizer {
    sentiment: f64,
}

impl ProxySynthesizer {
    pub fn new(sentiment: f64) -> Self {
        Self {
            sentiment: sentiment.clamp(-1.0, 1.0),
        }
    }
}

impl SentimentSynthesizer for ProxySynthesizer {
    fn synthesize(&mut self, _ticker: &str, _ctx: &PeriodContext) -> f64 {
        self.sentiment
    }

    fn name(&self) -> &'static str {
        "live-proxy"
    }
}
