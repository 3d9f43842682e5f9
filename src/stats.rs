use crate::model::{Listing, MarketStatistics};

/// Rounds to cents. Halves go toward positive infinity, so -0.125 becomes -0.12.
pub fn round2(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

pub fn aggregate(prices: &[f64]) -> MarketStatistics {
    let mut sorted = positive(prices);
    if sorted.is_empty() {
        return MarketStatistics::empty();
    }

    sorted.sort_by(|a, b| a.total_cmp(b));

    // summed in ascending order
    let average = mean(&sorted);
    let min = sorted[0];
    let max = sorted[sorted.len() - 1];

    MarketStatistics {
        average_price: round2(average),
        median_price: round2(upper_median(&sorted)),
        min_price: round2(min),
        max_price: round2(max),
        price_range: round2(max - min),
        total_listings: sorted.len(),
    }
}

pub fn aggregate_listings(listings: &[Listing]) -> MarketStatistics {
    let prices: Vec<f64> = listings.iter().map(|l| l.price).collect();
    aggregate(&prices)
}

/// Unrounded mean of the positive prices in input order, 0 when there are none.
pub fn average_price(prices: &[f64]) -> f64 {
    let valid = positive(prices);
    if valid.is_empty() {
        return 0.0;
    }
    mean(&valid)
}

// Plain sum over count. Summation order shows up at half-cent ties.
fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

// NaN fails the comparison and is dropped along with zero and negatives
fn positive(prices: &[f64]) -> Vec<f64> {
    prices.iter().copied().filter(|&p| p > 0.0).collect()
}

// Even lengths take the higher of the two middle elements
fn upper_median(sorted: &[f64]) -> f64 {
    sorted[sorted.len() / 2]
}
