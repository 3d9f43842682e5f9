use rayon::prelude::*;
use tracing::{debug, trace};

use crate::model::{Confidence, Grade, GradeResult, MarketStatistics, RiskLevel};
use crate::reasoning;
use crate::stats::round2;

pub const NO_DATA_REASONING: &str = "No market data available for analysis";

/// The four ratios the score is built from. Volatility and position are
/// left non-finite when their denominator is zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Factors {
    pub profit_margin: f64,
    pub volatility: f64,
    pub market_size: usize,
    pub position: f64,
}

impl Factors {
    pub fn measure(bid: f64, stats: &MarketStatistics) -> Self {
        // resale estimate
        let selling_price = stats.median_price;
        let gross_profit = selling_price - bid;

        let profit_margin = if bid > 0.0 {
            gross_profit / bid * 100.0
        } else {
            0.0
        };

        Factors {
            profit_margin,
            volatility: stats.price_range / stats.average_price,
            market_size: stats.total_listings,
            position: (bid - stats.min_price) / (stats.max_price - stats.min_price),
        }
    }

    pub fn score(&self) -> u32 {
        margin_points(self.profit_margin)
            + volatility_points(self.volatility)
            + size_points(self.market_size)
            + position_points(self.position)
    }
}

pub fn margin_points(margin: f64) -> u32 {
    if !margin.is_finite() {
        return 0;
    }
    if margin > 50.0 {
        40
    } else if margin > 30.0 {
        30
    } else if margin > 20.0 {
        20
    } else if margin > 10.0 {
        10
    } else if margin > 0.0 {
        5
    } else {
        0
    }
}

pub fn volatility_points(volatility: f64) -> u32 {
    if !volatility.is_finite() {
        return 0;
    }
    if volatility < 0.3 {
        30
    } else if volatility < 0.5 {
        20
    } else if volatility < 0.7 {
        10
    } else {
        0
    }
}

pub fn size_points(listings: usize) -> u32 {
    match listings {
        n if n > 50 => 20,
        n if n > 20 => 15,
        n if n > 10 => 10,
        n if n > 5 => 5,
        _ => 0,
    }
}

pub fn position_points(position: f64) -> u32 {
    if !position.is_finite() {
        return 0;
    }
    if position < 0.3 {
        10
    } else if position < 0.5 {
        7
    } else if position < 0.7 {
        4
    } else {
        0
    }
}

pub fn classify(score: u32) -> (Grade, RiskLevel, Confidence) {
    match score {
        s if s >= 85 => (Grade::A, RiskLevel::Low, Confidence::High),
        s if s >= 70 => (Grade::B, RiskLevel::LowMedium, Confidence::MediumHigh),
        s if s >= 55 => (Grade::C, RiskLevel::Medium, Confidence::Medium),
        s if s >= 40 => (Grade::D, RiskLevel::MediumHigh, Confidence::MediumLow),
        _ => (Grade::F, RiskLevel::High, Confidence::Low),
    }
}

/// Multi-factor grade for buying at `bid` into the market described by `stats`.
pub fn grade_full(bid: f64, stats: &MarketStatistics) -> GradeResult {
    if !stats.has_data() {
        debug!(bid, "no market data, grading F");
        return GradeResult {
            grade: Grade::F,
            score: 0,
            profit_margin: 0.0,
            risk_level: RiskLevel::High,
            confidence: Confidence::Low,
            reasoning: NO_DATA_REASONING.to_string(),
            market: *stats,
        };
    }

    let factors = Factors::measure(bid, stats);
    let score = factors.score();
    let (grade, risk_level, confidence) = classify(score);

    trace!(?factors, score, %grade, "graded bid");

    GradeResult {
        grade,
        score,
        profit_margin: round2(factors.profit_margin),
        risk_level,
        confidence,
        reasoning: reasoning::explain(&factors),
        market: MarketStatistics {
            price_range: round2(stats.price_range),
            ..*stats
        },
    }
}

/// Grades every candidate bid against the same snapshot. Output order
/// follows `bids`.
pub fn grade_bids(bids: &[f64], stats: &MarketStatistics) -> Vec<GradeResult> {
    bids.par_iter().map(|&bid| grade_full(bid, stats)).collect()
}
