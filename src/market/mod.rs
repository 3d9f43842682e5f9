//! Marketplace search clients and the analysis flows built on them.
//!
//! Two APIs supply listings: the OAuth-backed Browse API, which only sees
//! active listings, and the legacy key-based Finding API, which can also see
//! completed ones. Both normalize their responses into [`Listing`] so the
//! grading core never sees either wire shape.

pub mod analysis;
pub mod browse;
pub mod finding;
pub mod token;

use async_trait::async_trait;
use std::fmt;

use crate::error::Result;
use crate::model::Listing;

pub use analysis::{BidAnalysis, MarketAnalysis, MarketAnalyzer, MarketReport, SearchResults};
pub use browse::BrowseClient;
pub use finding::FindingClient;
pub use token::TokenProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingKind {
    Active,
    Completed,
}

impl fmt::Display for ListingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListingKind::Active => f.write_str("active"),
            ListingKind::Completed => f.write_str("completed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub keywords: String,
    pub limit: u32,
    pub kind: ListingKind,
}

impl SearchQuery {
    pub fn active(keywords: impl Into<String>, limit: u32) -> Self {
        Self {
            keywords: keywords.into(),
            limit,
            kind: ListingKind::Active,
        }
    }

    pub fn completed(keywords: impl Into<String>, limit: u32) -> Self {
        Self {
            keywords: keywords.into(),
            limit,
            kind: ListingKind::Completed,
        }
    }
}

/// Anything that can turn a keyword search into normalized listings.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Short label reported back to callers, e.g. "Browse API (OAuth)".
    fn label(&self) -> &'static str;

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Listing>>;
}
