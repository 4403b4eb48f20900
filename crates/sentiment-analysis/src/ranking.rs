use analysis_core::{Article, ScoredArticle};
use chrono::{DateTime, Utc};

use crate::quality::QualityScorer;

/// Score every article, drop those at or below the quality floor and sort the rest
/// by quality score, highest first. Ties keep their input order.
///
/// An empty result means "no signal" for the ticker, not a failure.
pub fn filter_and_rank(scorer: &QualityScorer, articles: &[Article], ticker: &str) -> Vec<ScoredArticle> {
    filter_and_rank_at(scorer, articles, ticker, Utc::now())
}

pub fn filter_and_rank_at(
    scorer: &QualityScorer,
    articles: &[Article],
    ticker: &str,
    now: DateTime<Utc>,
) -> Vec<ScoredArticle> {
    let floor = scorer.min_quality_score();
    let mut scored: Vec<ScoredArticle> = articles
        .iter()
        .map(|article| scorer.score_at(article, ticker, now))
        .filter(|s| s.quality_score > floor)
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| b.quality_score.total_cmp(&a.quality_score));

    tracing::info!(
        "Filtered {} articles down to {} high-quality articles for {}",
        articles.len(),
        scored.len(),
        ticker
    );

    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()
    }

    fn article(title: &str, source: &str, hours_ago: i64) -> Article {
        Article {
            title: title.to_string(),
            description: None,
            source_name: source.to_string(),
            published_at: (now() - Duration::hours(hours_ago)).to_rfc3339(),
            url: None,
        }
    }

    fn sample() -> Vec<Article> {
        vec![
            article("Celebrity gossip roundup", "Random Blog", 100),
            article("AAPL quarterly earnings beat", "Yahoo Finance", 5),
            article("AAPL earnings beat, revenue up", "Reuters", 1),
            article("Market wrap", "Reuters", 2),
            article("AAPL guidance raised", "Reuters", 1),
        ]
    }

    #[test]
    fn test_filters_low_quality_and_sorts_descending() {
        let scorer = QualityScorer::default();
        let ranked = filter_and_rank_at(&scorer, &sample(), "AAPL", now());

        assert!(ranked.iter().all(|s| s.quality_score > 0.4));
        assert!(!ranked.iter().any(|s| s.article.title == "Celebrity gossip roundup"));
        for pair in ranked.windows(2) {
            assert!(pair[0].quality_score >= pair[1].quality_score);
        }
        assert_eq!(ranked[0].article.title, "AAPL earnings beat, revenue up");
    }

    #[test]
    fn test_ties_keep_input_order() {
        let scorer = QualityScorer::default();
        let articles = vec![
            article("AAPL guidance raised", "Reuters", 1),
            article("AAPL outlook raised", "Reuters", 1),
        ];
        let ranked = filter_and_rank_at(&scorer, &articles, "AAPL", now());
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].quality_score, ranked[1].quality_score);
        assert_eq!(ranked[0].article.title, "AAPL guidance raised");
        assert_eq!(ranked[1].article.title, "AAPL outlook raised");
    }

    #[test]
    fn test_refiltering_is_idempotent() {
        let scorer = QualityScorer::default();
        let first = filter_and_rank_at(&scorer, &sample(), "AAPL", now());
        let survivors: Vec<Article> = first.iter().map(|s| s.article.clone()).collect();
        let second = filter_and_rank_at(&scorer, &survivors, "AAPL", now());
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_and_all_filtered_inputs() {
        let scorer = QualityScorer::default();
        assert!(filter_and_rank_at(&scorer, &[], "AAPL", now()).is_empty());

        let junk = vec![article("Celebrity gossip roundup", "Random Blog", 100)];
        assert!(filter_and_rank_at(&scorer, &junk, "AAPL", now()).is_empty());
    }
}
