use serde::{Deserialize, Serialize};
use std::fmt;

/// A single marketplace offer. Only `price` feeds the grading engine, the
/// rest is provenance carried through for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Listing {
    pub price: f64,
    pub title: String,
    pub currency: String,
    pub url: String,
    pub condition: String,
    pub image_url: String,
    pub item_id: String,
    pub end_time: Option<String>,
}

impl Listing {
    pub fn priced(price: f64) -> Self {
        Listing {
            price,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketStatistics {
    pub average_price: f64,
    pub median_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub price_range: f64,
    pub total_listings: usize,
}

impl MarketStatistics {
    pub fn empty() -> Self {
        MarketStatistics::default()
    }

    pub fn has_data(&self) -> bool {
        self.total_listings > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeBreakdown {
    pub final_value_fee: f64,
    pub paypal_fee: f64,
    pub insertion_fee: f64,
    pub total_fees: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetProfit {
    pub gross_profit: f64,
    pub net_profit: f64,
    /// Percent of the bid. Non-finite when the bid is zero.
    pub net_profit_margin: f64,
    pub fees: FeeBreakdown,
    pub shipping_cost: f64,
}

impl NetProfit {
    pub fn margin_is_defined(&self) -> bool {
        self.net_profit_margin.is_finite()
    }
}

/// Letter grade, declared best first so `Grade::A < Grade::F`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        f.write_str(letter)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum RiskLevel {
    Low,
    #[serde(rename = "Low-Medium")]
    LowMedium,
    Medium,
    #[serde(rename = "Medium-High")]
    MediumHigh,
    High,
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::LowMedium => "Low-Medium",
            RiskLevel::Medium => "Medium",
            RiskLevel::MediumHigh => "Medium-High",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Confidence {
    Low,
    #[serde(rename = "Medium-Low")]
    MediumLow,
    Medium,
    #[serde(rename = "Medium-High")]
    MediumHigh,
    High,
}

impl Confidence {
    pub fn label(&self) -> &'static str {
        match self {
            Confidence::Low => "Low",
            Confidence::MediumLow => "Medium-Low",
            Confidence::Medium => "Medium",
            Confidence::MediumHigh => "Medium-High",
            Confidence::High => "High",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Output of the multi-factor grading engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeResult {
    pub grade: Grade,
    pub score: u32,
    pub profit_margin: f64,
    pub risk_level: RiskLevel,
    pub confidence: Confidence,
    pub reasoning: String,
    pub market: MarketStatistics,
}

/// Output of the two-number grading path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleGrade {
    pub grade: Grade,
    pub profit_percentage: f64,
    pub total_cost: f64,
}
