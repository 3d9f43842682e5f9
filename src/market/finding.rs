use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::browse::parse_price;
use super::{ListingKind, ListingSource, SearchQuery};
use crate::config::{Credentials, MarketplaceConfig};
use crate::error::{MarketError, Result};
use crate::model::Listing;

const API: &str = "Finding API";
const SERVICE_VERSION: &str = "1.13.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    FindItemsByKeywords,
    FindCompletedItems,
}

impl Operation {
    pub fn for_kind(kind: ListingKind) -> Self {
        match kind {
            ListingKind::Active => Operation::FindItemsByKeywords,
            ListingKind::Completed => Operation::FindCompletedItems,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operation::FindItemsByKeywords => "findItemsByKeywords",
            Operation::FindCompletedItems => "findCompletedItems",
        }
    }

    /// Query string for one search. Only active searches carry the
    /// minimum-price filter.
    pub fn params(&self, app_id: &str, keywords: &str, limit: u32) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("OPERATION-NAME", self.name().to_string()),
            ("SERVICE-VERSION", SERVICE_VERSION.to_string()),
            ("SECURITY-APPNAME", app_id.to_string()),
            ("RESPONSE-DATA-FORMAT", "JSON".to_string()),
            ("REST-PAYLOAD", "true".to_string()),
            ("keywords", keywords.to_string()),
            ("paginationInput.entriesPerPage", limit.to_string()),
            ("sortOrder", "EndTimeSoonest".to_string()),
            ("itemFilter(0).name", "ListingType".to_string()),
            ("itemFilter(0).value", "Auction".to_string()),
        ];
        if *self == Operation::FindItemsByKeywords {
            params.push(("itemFilter(1).name", "MinPrice".to_string()));
            params.push(("itemFilter(1).value", "1.0".to_string()));
        }
        params
    }
}

// The Finding API wraps every field, scalar or not, in a JSON array.

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Envelope {
    pub find_items_by_keywords_response: Vec<OperationResponse>,
    pub find_completed_items_response: Vec<OperationResponse>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OperationResponse {
    pub ack: Vec<String>,
    pub search_result: Vec<SearchResult>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchResult {
    pub item: Vec<Item>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Item {
    pub item_id: Vec<String>,
    pub title: Vec<String>,
    #[serde(rename = "viewItemURL")]
    pub view_item_url: Vec<String>,
    #[serde(rename = "galleryURL")]
    pub gallery_url: Vec<String>,
    pub selling_status: Vec<SellingStatus>,
    pub listing_info: Vec<ListingInfo>,
    pub condition: Vec<Condition>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SellingStatus {
    pub current_price: Vec<Price>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Price {
    #[serde(rename = "__value__")]
    pub value: String,
    #[serde(rename = "@currencyId")]
    pub currency_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListingInfo {
    pub end_time: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Condition {
    pub condition_display_name: Vec<String>,
}

fn first(values: Vec<String>) -> Option<String> {
    values.into_iter().next()
}

impl From<Item> for Listing {
    fn from(item: Item) -> Self {
        let price = item
            .selling_status
            .into_iter()
            .next()
            .and_then(|s| s.current_price.into_iter().next());
        let (price, currency) = match price {
            Some(p) if !p.currency_id.is_empty() => (parse_price(&p.value), p.currency_id),
            Some(p) => (parse_price(&p.value), "USD".to_string()),
            None => (0.0, "USD".to_string()),
        };

        Listing {
            price,
            title: first(item.title).unwrap_or_default(),
            currency,
            url: first(item.view_item_url).unwrap_or_default(),
            condition: item
                .condition
                .into_iter()
                .next()
                .and_then(|c| first(c.condition_display_name))
                .unwrap_or_else(|| "Unknown".into()),
            image_url: first(item.gallery_url).unwrap_or_default(),
            item_id: first(item.item_id).unwrap_or_default(),
            end_time: item.listing_info.into_iter().next().and_then(|l| first(l.end_time)),
        }
    }
}

impl Envelope {
    /// Listings for `operation`, or `None` when the response lacks a search
    /// result entirely.
    pub fn into_listings(self, operation: Operation) -> Option<Vec<Listing>> {
        let responses = match operation {
            Operation::FindItemsByKeywords => self.find_items_by_keywords_response,
            Operation::FindCompletedItems => self.find_completed_items_response,
        };
        let result = responses.into_iter().next()?.search_result.into_iter().next()?;
        Some(result.item.into_iter().map(Listing::from).collect())
    }
}

/// Key-based search over the legacy Finding API. Serves both active and
/// completed listings.
pub struct FindingClient {
    http: Client,
    url: String,
    credentials: Credentials,
}

impl FindingClient {
    pub fn new(http: Client, config: &MarketplaceConfig, credentials: Credentials) -> Self {
        Self {
            http,
            url: config.environment.finding_url().to_string(),
            credentials,
        }
    }
}

#[async_trait]
impl ListingSource for FindingClient {
    fn label(&self) -> &'static str {
        "Finding API (App ID)"
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Listing>> {
        let app_id = self.credentials.app_id()?;
        let operation = Operation::for_kind(query.kind);
        info!(
            operation = operation.name(),
            keywords = %query.keywords,
            limit = query.limit,
            "Finding API search"
        );

        let response = self
            .http
            .get(&self.url)
            .query(&operation.params(app_id, &query.keywords, query.limit))
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

        let envelope: Envelope = response.json().await?;
        match envelope.into_listings(operation) {
            Some(listings) => {
                debug!(count = listings.len(), "Finding API results");
                Ok(listings)
            }
            None if query.kind == ListingKind::Completed => {
                warn!("Finding API returned no search result for completed items");
                Ok(Vec::new())
            }
            None => Err(MarketError::MalformedResponse {
                api: API,
                reason: "missing searchResult",
            }
            .into()),
        }
    }
}
