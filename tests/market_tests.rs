//! Analysis flows over in-memory listing sources.

use async_trait::async_trait;
use bid_grader::error::{MarketError, Result};
use bid_grader::market::{ListingKind, ListingSource, MarketAnalyzer, SearchQuery};
use bid_grader::{Grade, Listing};
use parking_lot::Mutex;
use std::sync::Arc;

/// Serves canned listings per kind and records every query it sees.
struct FakeSource {
    label: &'static str,
    active: Option<Vec<f64>>,
    completed: Option<Vec<f64>>,
    seen: Mutex<Vec<SearchQuery>>,
}

impl FakeSource {
    fn new(
        label: &'static str,
        active: Option<Vec<f64>>,
        completed: Option<Vec<f64>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            label,
            active,
            completed,
            seen: Mutex::new(Vec::new()),
        })
    }

    fn queries(&self) -> Vec<SearchQuery> {
        self.seen.lock().clone()
    }
}

#[async_trait]
impl ListingSource for FakeSource {
    fn label(&self) -> &'static str {
        self.label
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Listing>> {
        self.seen.lock().push(query.clone());
        let prices = match query.kind {
            ListingKind::Active => &self.active,
            ListingKind::Completed => &self.completed,
        };
        match prices {
            Some(p) => Ok(p.iter().map(|&price| Listing::priced(price)).collect()),
            None => Err(MarketError::Status {
                api: self.label,
                status: 503,
                body: "unavailable".into(),
            }
            .into()),
        }
    }
}

#[tokio::test]
async fn analyze_bid_uses_primary_when_it_works() {
    let primary = FakeSource::new("primary", Some(vec![200.0, 0.0, 200.0]), None);
    let fallback = FakeSource::new("fallback", Some(vec![1.0]), Some(vec![]));
    let analyzer = MarketAnalyzer::new(primary.clone(), fallback.clone(), 20);

    let analysis = analyzer.analyze_bid("camera", 100.0).await.unwrap();

    assert_eq!(analysis.api_source, "primary");
    assert_eq!(analysis.active_count, 3);
    assert_eq!(analysis.average_current_price, 200.0);
    assert_eq!(analysis.grade.grade, Grade::A);
    assert_eq!(analysis.grade.profit_percentage, 73.9);
    assert_eq!(primary.queries(), vec![SearchQuery::active("camera", 20)]);
    assert!(fallback.queries().is_empty());
}

#[tokio::test]
async fn analyze_bid_falls_back_when_primary_fails() {
    let primary = FakeSource::new("primary", None, None);
    let fallback = FakeSource::new("fallback", Some(vec![50.0, 70.0]), None);
    let analyzer = MarketAnalyzer::new(primary, fallback, 20);

    let analysis = analyzer.analyze_bid("lamp", 40.0).await.unwrap();
    assert_eq!(analysis.api_source, "fallback");
    assert_eq!(analysis.average_current_price, 60.0);
}

#[tokio::test]
async fn analyze_bid_with_no_priced_listings_grades_f() {
    let primary = FakeSource::new("primary", Some(vec![0.0, -1.0]), None);
    let fallback = FakeSource::new("fallback", None, None);
    let analyzer = MarketAnalyzer::new(primary, fallback, 20);

    let analysis = analyzer.analyze_bid("nothing", 25.0).await.unwrap();
    assert_eq!(analysis.average_current_price, 0.0);
    assert_eq!(analysis.grade.grade, Grade::F);
    assert_eq!(analysis.grade.total_cost, 25.0);
}

#[tokio::test]
async fn both_sources_failing_is_an_error() {
    let analyzer = MarketAnalyzer::new(
        FakeSource::new("primary", None, None),
        FakeSource::new("fallback", None, None),
        20,
    );
    assert!(analyzer.analyze_bid("x", 1.0).await.is_err());
}

#[tokio::test]
async fn search_all_tolerates_missing_sold_listings() {
    let analyzer = MarketAnalyzer::new(
        FakeSource::new("primary", Some(vec![10.0, 12.0]), None),
        FakeSource::new("fallback", None, None),
        20,
    );
    let results = analyzer.search_all("mug", 5).await.unwrap();
    assert_eq!(results.active_count, 2);
    assert_eq!(results.sold_count, 0);
    assert!(results.sold.is_empty());
}

/// Answers every search with a response that has no search result.
struct EmptyEnvelopeSource;

#[async_trait]
impl ListingSource for EmptyEnvelopeSource {
    fn label(&self) -> &'static str {
        "empty"
    }

    async fn search(&self, _query: &SearchQuery) -> Result<Vec<Listing>> {
        Err(MarketError::MalformedResponse {
            api: "Finding API",
            reason: "missing searchResult",
        }
        .into())
    }
}

#[tokio::test]
async fn search_all_treats_unreadable_fallback_as_no_active_listings() {
    let analyzer = MarketAnalyzer::new(
        FakeSource::new("primary", None, None),
        Arc::new(EmptyEnvelopeSource),
        20,
    );
    let results = analyzer.search_all("kettle", 10).await.unwrap();
    assert_eq!(results.active_count, 0);
    assert_eq!(results.sold_count, 0);
}

#[tokio::test]
async fn analyze_bid_still_fails_on_unreadable_fallback() {
    let analyzer = MarketAnalyzer::new(
        FakeSource::new("primary", None, None),
        Arc::new(EmptyEnvelopeSource),
        20,
    );
    let err = analyzer.analyze_bid("kettle", 10.0).await.unwrap_err();
    assert!(err.to_string().contains("missing searchResult"));
}

#[tokio::test]
async fn search_all_propagates_other_active_failures() {
    let analyzer = MarketAnalyzer::new(
        FakeSource::new("primary", None, None),
        FakeSource::new("fallback", None, Some(vec![5.0])),
        20,
    );
    assert!(analyzer.search_all("kettle", 10).await.is_err());
}

#[tokio::test]
async fn analyze_market_pools_current_and_completed_prices() {
    let primary = FakeSource::new("primary", Some(vec![100.0, 120.0]), None);
    let fallback = FakeSource::new("fallback", None, Some(vec![110.0, 0.0, 130.0]));
    let analyzer = MarketAnalyzer::new(primary, fallback.clone(), 15);

    let report = analyzer.analyze_market("drone", 80.0).await.unwrap();

    assert_eq!(report.analysis.current_listings, 2);
    assert_eq!(report.analysis.completed_listings, 3);
    assert_eq!(report.analysis.statistics.total_listings, 4);
    assert_eq!(report.analysis.statistics.median_price, 120.0);
    assert_eq!(report.result.market, report.analysis.statistics);
    assert_eq!(fallback.queries(), vec![SearchQuery::completed("drone", 15)]);
    // margin 50 -> 30, volatility 30/115 -> 30, 4 listings -> 0, position < 0 -> 10
    assert_eq!(report.result.score, 70);
    assert_eq!(report.result.grade, Grade::B);
}

#[tokio::test]
async fn analyze_market_propagates_completed_failures() {
    let analyzer = MarketAnalyzer::new(
        FakeSource::new("primary", Some(vec![10.0]), None),
        FakeSource::new("fallback", None, None),
        20,
    );
    assert!(analyzer.analyze_market("x", 5.0).await.is_err());
}
