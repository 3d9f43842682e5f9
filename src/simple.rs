use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::fees::fees;
use crate::model::{Grade, SimpleGrade};
use crate::stats::round2;

/// Which grading engine to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Net profit against the live market average.
    #[default]
    Simple,
    /// Weighted multi-factor score over full market statistics.
    Full,
}

/// Grade a bid from nothing but the market average, treating the average as
/// the resale price and charging fees on it.
pub fn grade_simple(average_price: f64, bid: f64) -> SimpleGrade {
    // also catches NaN
    if !(average_price > 0.0) {
        return SimpleGrade {
            grade: Grade::F,
            profit_percentage: 0.0,
            total_cost: bid,
        };
    }

    let profit = average_price - bid;
    let fees = fees(average_price);
    let net_profit = profit - fees.total_fees;
    let net_percentage = if bid > 0.0 {
        net_profit / bid * 100.0
    } else {
        0.0
    };

    let grade = match net_percentage {
        p if p >= 30.0 => Grade::A,
        p if p >= 20.0 => Grade::B,
        p if p >= 10.0 => Grade::C,
        p if p >= 0.0 => Grade::D,
        _ => Grade::F,
    };

    debug!(average_price, bid, net_percentage, %grade, "simple grade");

    SimpleGrade {
        grade,
        profit_percentage: round2(net_percentage),
        total_cost: bid + fees.total_fees,
    }
}
