use serde::Deserialize;
use std::path::Path;

use crate::error::Result;
use crate::model::Listing;

#[derive(Deserialize)]
#[serde(untagged)]
enum Entry {
    Bare(f64),
    Listing(Listing),
}

/// Reads a JSON array whose entries are either bare prices or listing
/// objects (`{"price": 12.5, "title": ...}`), in any mix.
pub fn load_listings<P: AsRef<Path>>(path: P) -> Result<Vec<Listing>> {
    let content = std::fs::read_to_string(path)?;
    parse_listings(&content)
}

pub fn parse_listings(json: &str) -> Result<Vec<Listing>> {
    let entries: Vec<Entry> = serde_json::from_str(json)?;
    Ok(entries
        .into_iter()
        .map(|e| match e {
            Entry::Bare(price) => Listing::priced(price),
            Entry::Listing(listing) => listing,
        })
        .collect())
}

pub fn load_prices<P: AsRef<Path>>(path: P) -> Result<Vec<f64>> {
    Ok(load_listings(path)?.iter().map(|l| l.price).collect())
}
