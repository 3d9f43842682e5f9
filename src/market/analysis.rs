use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use super::{BrowseClient, FindingClient, ListingSource, SearchQuery, TokenProvider};
use crate::config::{Credentials, MarketplaceConfig};
use crate::error::{Error, MarketError, Result};
use crate::grader::grade_full;
use crate::model::{GradeResult, Listing, MarketStatistics, SimpleGrade};
use crate::simple::grade_simple;
use crate::stats::{aggregate_listings, average_price, round2};

/// Active listings graded with the simple engine against their average.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BidAnalysis {
    pub active_count: usize,
    pub average_current_price: f64,
    #[serde(flatten)]
    pub grade: SimpleGrade,
    pub active_items: Vec<Listing>,
    pub api_source: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketAnalysis {
    #[serde(flatten)]
    pub statistics: MarketStatistics,
    pub current_listings: usize,
    pub completed_listings: usize,
}

/// Active and completed listings graded with the multi-factor engine.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketReport {
    pub analysis: MarketAnalysis,
    pub result: GradeResult,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub active: Vec<Listing>,
    pub sold: Vec<Listing>,
    pub active_count: usize,
    pub sold_count: usize,
}

/// Runs the analysis flows over a primary active-listing source with a
/// fallback that also serves completed listings.
pub struct MarketAnalyzer {
    primary: Arc<dyn ListingSource>,
    fallback: Arc<dyn ListingSource>,
    active_limit: u32,
}

impl MarketAnalyzer {
    pub fn new(
        primary: Arc<dyn ListingSource>,
        fallback: Arc<dyn ListingSource>,
        active_limit: u32,
    ) -> Self {
        Self {
            primary,
            fallback,
            active_limit,
        }
    }

    /// Browse API first, Finding API as fallback and for completed items.
    pub fn from_config(config: &MarketplaceConfig, credentials: Credentials) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let tokens = Arc::new(TokenProvider::new(
            http.clone(),
            config.environment,
            credentials.clone(),
        ));

        info!(environment = %config.environment, "marketplace clients ready");

        Ok(Self::new(
            Arc::new(BrowseClient::new(http.clone(), config, tokens)),
            Arc::new(FindingClient::new(http, config, credentials)),
            config.active_limit,
        ))
    }

    pub async fn active_listings(
        &self,
        keywords: &str,
        limit: u32,
    ) -> Result<(Vec<Listing>, &'static str)> {
        let query = SearchQuery::active(keywords, limit);
        match self.primary.search(&query).await {
            Ok(listings) => Ok((listings, self.primary.label())),
            Err(e) => {
                warn!(
                    error = %e,
                    fallback = self.fallback.label(),
                    "{} failed for active listings",
                    self.primary.label()
                );
                let listings = self.fallback.search(&query).await?;
                Ok((listings, self.fallback.label()))
            }
        }
    }

    pub async fn completed_listings(&self, keywords: &str, limit: u32) -> Result<Vec<Listing>> {
        self.fallback
            .search(&SearchQuery::completed(keywords, limit))
            .await
    }

    /// Active and sold listings side by side. A failed sold search, or an
    /// active response with no search result, yields an empty list instead
    /// of failing the whole call.
    pub async fn search_all(&self, keywords: &str, limit: u32) -> Result<SearchResults> {
        let (active, sold) = tokio::join!(
            self.active_listings(keywords, limit),
            self.completed_listings(keywords, limit),
        );

        let active = match active {
            Ok((listings, _)) => listings,
            Err(Error::Market(e @ MarketError::MalformedResponse { .. })) => {
                warn!(error = %e, "active listings unreadable");
                Vec::new()
            }
            Err(e) => return Err(e),
        };
        let sold = sold.unwrap_or_else(|e| {
            warn!(error = %e, "sold listings unavailable");
            Vec::new()
        });

        info!(active = active.len(), sold = sold.len(), "combined search done");
        Ok(SearchResults {
            active_count: active.len(),
            sold_count: sold.len(),
            active,
            sold,
        })
    }

    pub async fn analyze_bid(&self, keywords: &str, bid: f64) -> Result<BidAnalysis> {
        let (active_items, api_source) = self.active_listings(keywords, self.active_limit).await?;

        let prices: Vec<f64> = active_items.iter().map(|l| l.price).collect();
        let average = average_price(&prices);
        let grade = grade_simple(average, bid);

        info!(
            keywords,
            bid,
            active = active_items.len(),
            average = round2(average),
            grade = %grade.grade,
            source = api_source,
            "bid analyzed"
        );

        Ok(BidAnalysis {
            active_count: active_items.len(),
            average_current_price: round2(average),
            grade,
            active_items,
            api_source,
        })
    }

    pub async fn analyze_market(&self, keywords: &str, bid: f64) -> Result<MarketReport> {
        let (current, completed) = tokio::try_join!(
            self.active_listings(keywords, self.active_limit),
            self.completed_listings(keywords, self.active_limit),
        )?;
        let (current, _) = current;

        let mut listings = current.clone();
        listings.extend(completed.iter().cloned());
        let statistics = aggregate_listings(&listings);
        let result = grade_full(bid, &statistics);

        info!(
            keywords,
            bid,
            listings = statistics.total_listings,
            score = result.score,
            grade = %result.grade,
            "market analyzed"
        );

        Ok(MarketReport {
            analysis: MarketAnalysis {
                statistics,
                current_listings: current.len(),
                completed_listings: completed.len(),
            },
            result,
        })
    }
}
