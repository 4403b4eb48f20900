#[cfg(test)]
mod conviction_tests {
    use analysis_core::{ArticleAnalysis, PriceDirection, PriceSnapshot, RelevanceTier, Signal};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::conviction::ConvictionEngine;
    use crate::models::*;

    fn analysis(sentiment: f64, confidence: Option<f64>, relevance: RelevanceTier) -> ArticleAnalysis {
        ArticleAnalysis {
            title: "headline".to_string(),
            sentiment,
            confidence,
            signal: Signal::Hold,
            reason: String::new(),
            relevance,
            quality_weight: 0.8,
            source_credibility: 1.0,
        }
    }

    fn snapshot(current: Decimal) -> PriceSnapshot {
        PriceSnapshot::new(current, dec!(100)).unwrap()
    }

    #[test]
    fn test_low_confidence_thin_coverage_volatile_move() {
        let engine = ConvictionEngine::default();
        // bearish news against a +6% move
        let analyses = vec![
            analysis(-0.4, Some(0.5), RelevanceTier::High),
            analysis(0.1, Some(0.5), RelevanceTier::Low),
        ];
        let metrics = engine.evaluate(&analyses, &snapshot(dec!(106)));

        assert_eq!(
            metrics.risk_warnings,
            vec![
                "Low confidence in news analysis",
                "Limited news coverage - low conviction",
                "High volatility detected",
                "AI sentiment conflicts with market movement",
            ]
        );
        assert!(!metrics.agreement_with_market);
        assert_eq!(metrics.conviction, ConvictionTier::Low);
        assert_eq!(metrics.high_relevance_count, 1);
        assert!((metrics.news_volume_score - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_agreement_drops_conflict_warning() {
        let engine = ConvictionEngine::default();
        let analyses = vec![
            analysis(0.6, Some(0.5), RelevanceTier::High),
            analysis(0.2, Some(0.5), RelevanceTier::Medium),
        ];
        let metrics = engine.evaluate(&analyses, &snapshot(dec!(106)));
        assert!(metrics.agreement_with_market);
        assert_eq!(
            metrics.warnings,
            vec![
                RiskWarning::LowConfidence,
                RiskWarning::LimitedCoverage,
                RiskWarning::HighVolatility,
            ]
        );
    }

    #[test]
    fn test_warning_order_ignores_input_order() {
        let engine = ConvictionEngine::default();
        let mut analyses = vec![
            analysis(-0.9, Some(0.2), RelevanceTier::Low),
            analysis(0.3, None, RelevanceTier::High),
        ];
        let forward = engine.evaluate(&analyses, &snapshot(dec!(93)));
        analyses.reverse();
        let backward = engine.evaluate(&analyses, &snapshot(dec!(93)));
        assert_eq!(forward.warnings, backward.warnings);
        assert_eq!(forward.risk_warnings, backward.risk_warnings);
    }

    #[test]
    fn test_high_conviction() {
        let engine = ConvictionEngine::default();
        let analyses: Vec<_> = (0..5)
            .map(|_| analysis(0.5, Some(0.8), RelevanceTier::High))
            .collect();
        let metrics = engine.evaluate(&analyses, &snapshot(dec!(102)));
        assert_eq!(metrics.conviction, ConvictionTier::High);
        assert!(metrics.risk_warnings.is_empty());
        assert_eq!(metrics.high_relevance_count, 5);
    }

    #[test]
    fn test_conviction_boundaries() {
        let engine = ConvictionEngine::default();
        assert_eq!(engine.conviction(0.71, 5), ConvictionTier::High);
        assert_eq!(engine.conviction(0.70, 5), ConvictionTier::Medium);
        assert_eq!(engine.conviction(0.9, 4), ConvictionTier::Medium);
        assert_eq!(engine.conviction(0.51, 3), ConvictionTier::Medium);
        assert_eq!(engine.conviction(0.5, 3), ConvictionTier::Low);
        assert_eq!(engine.conviction(0.9, 2), ConvictionTier::Low);
    }

    #[test]
    fn test_missing_confidence_defaults_to_half() {
        let engine = ConvictionEngine::default();
        let analyses = vec![
            analysis(0.1, None, RelevanceTier::Medium),
            analysis(0.1, Some(0.9), RelevanceTier::Medium),
        ];
        assert!((engine.average_confidence(&analyses) - 0.7).abs() < 1e-12);
        assert_eq!(engine.average_confidence(&[]), 0.5);
    }

    #[test]
    fn test_news_volume_saturates() {
        let engine = ConvictionEngine::default();
        assert_eq!(engine.news_volume_score(0), 0.0);
        assert!((engine.news_volume_score(4) - 0.4).abs() < 1e-12);
        assert_eq!(engine.news_volume_score(25), 1.0);
    }

    #[test]
    fn test_zero_sentiment_is_bearish_and_flat_market_never_agrees() {
        let engine = ConvictionEngine::default();
        let analyses = vec![analysis(0.0, Some(0.8), RelevanceTier::Medium)];
        assert_eq!(engine.sentiment_direction(&analyses), SentimentDirection::Bearish);
        assert!(!ConvictionEngine::agrees_with_market(SentimentDirection::Bullish, PriceDirection::Flat));
        assert!(!ConvictionEngine::agrees_with_market(SentimentDirection::Bearish, PriceDirection::Flat));

        let metrics = engine.evaluate(&analyses, &snapshot(dec!(100)));
        assert_eq!(metrics.warnings.last(), Some(&RiskWarning::MarketConflict));
    }
}
