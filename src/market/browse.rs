use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

use super::{ListingKind, ListingSource, SearchQuery, TokenProvider};
use crate::config::MarketplaceConfig;
use crate::error::{MarketError, Result};
use crate::model::Listing;

const API: &str = "Browse API";
const CONDITION_FILTER: &str = "conditions:{NEW|USED_EXCELLENT|USED_VERY_GOOD|USED_GOOD}";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchResponse {
    pub item_summaries: Vec<ItemSummary>,
    pub total: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemSummary {
    pub item_id: Option<String>,
    pub title: Option<String>,
    pub price: Option<Amount>,
    pub item_web_url: Option<String>,
    pub condition: Option<String>,
    pub image: Option<Image>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Amount {
    pub value: String,
    pub currency: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Image {
    pub image_url: String,
}

impl From<ItemSummary> for Listing {
    fn from(item: ItemSummary) -> Self {
        let (price, currency) = match item.price {
            Some(amount) => (parse_price(&amount.value), amount.currency),
            None => (0.0, "USD".to_string()),
        };
        Listing {
            price,
            title: item.title.unwrap_or_default(),
            currency,
            url: item.item_web_url.unwrap_or_default(),
            condition: item.condition.unwrap_or_else(|| "Unknown".into()),
            image_url: item.image.map(|i| i.image_url).unwrap_or_default(),
            item_id: item.item_id.unwrap_or_default(),
            end_time: None,
        }
    }
}

impl SearchResponse {
    pub fn into_listings(self) -> Vec<Listing> {
        self.item_summaries.into_iter().map(Listing::from).collect()
    }
}

/// Unparseable prices become 0 and are dropped by the aggregator.
pub(crate) fn parse_price(raw: &str) -> f64 {
    raw.trim().parse().unwrap_or(0.0)
}

/// Active-listing search over the OAuth Browse API.
pub struct BrowseClient {
    http: Client,
    url: String,
    marketplace_id: String,
    tokens: Arc<TokenProvider>,
}

impl BrowseClient {
    pub fn new(http: Client, config: &MarketplaceConfig, tokens: Arc<TokenProvider>) -> Self {
        Self {
            http,
            url: config.environment.browse_url().to_string(),
            marketplace_id: config.marketplace_id.clone(),
            tokens,
        }
    }
}

#[async_trait]
impl ListingSource for BrowseClient {
    fn label(&self) -> &'static str {
        "Browse API (OAuth)"
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Listing>> {
        if query.kind != ListingKind::Active {
            return Err(MarketError::Unsupported {
                api: API,
                kind: query.kind,
            }
            .into());
        }

        info!(keywords = %query.keywords, limit = query.limit, "Browse API search");
        let token = self.tokens.token().await?;
        let limit = query.limit.to_string();

        let response = self
            .http
            .get(&self.url)
            .bearer_auth(token)
            .header("X-EBAY-C-MARKETPLACE-ID", &self.marketplace_id)
            .query(&[
                ("q", query.keywords.as_str()),
                ("limit", limit.as_str()),
                ("filter", CONDITION_FILTER),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MarketError::Status {
                api: API,
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            }
            .into());
        }

        let parsed: SearchResponse = response.json().await?;
        let listings = parsed.into_listings();
        debug!(count = listings.len(), "Browse API results");
        Ok(listings)
    }
}
