//! Plain-text rendering for the command line.

use crate::market::{BidAnalysis, MarketReport, SearchResults};
use crate::model::{FeeBreakdown, GradeResult, Listing, MarketStatistics, NetProfit, SimpleGrade};

pub fn statistics(stats: &MarketStatistics) -> String {
    if !stats.has_data() {
        return "No priced listings.".to_string();
    }
    format!(
        "Listings: {}\nAverage:  ${:.2}\nMedian:   ${:.2}\nMin-Max:  ${:.2} - ${:.2} (range ${:.2})",
        stats.total_listings,
        stats.average_price,
        stats.median_price,
        stats.min_price,
        stats.max_price,
        stats.price_range
    )
}

pub fn fees(price: f64, f: &FeeBreakdown) -> String {
    format!(
        "Selling price:   ${:.2}\nFinal value fee: ${:.2}\nPayPal fee:      ${:.2}\nInsertion fee:   ${:.2}\nTotal fees:      ${:.2}",
        price, f.final_value_fee, f.paypal_fee, f.insertion_fee, f.total_fees
    )
}

pub fn net_profit(p: &NetProfit) -> String {
    let margin = if p.margin_is_defined() {
        format!("{:.2}%", p.net_profit_margin)
    } else {
        "undefined (zero bid)".to_string()
    };
    format!(
        "Gross profit: ${:.2}\nFees:         ${:.2}\nShipping:     ${:.2}\nNet profit:   ${:.2}\nNet margin:   {}",
        p.gross_profit, p.fees.total_fees, p.shipping_cost, p.net_profit, margin
    )
}

pub fn grade(bid: f64, r: &GradeResult) -> String {
    format!(
        "Bid ${:.2}: grade {} (score {}/100)\nProfit margin: {:.2}%\nRisk: {} | Confidence: {}\n{}",
        bid, r.grade, r.score, r.profit_margin, r.risk_level, r.confidence, r.reasoning
    )
}

pub fn simple(average: f64, bid: f64, g: &SimpleGrade) -> String {
    format!(
        "Average ${:.2}, bid ${:.2}: grade {}\nNet profit: {:.2}%\nTotal cost: ${:.2}",
        average, bid, g.grade, g.profit_percentage, g.total_cost
    )
}

pub fn bid_analysis(bid: f64, a: &BidAnalysis) -> String {
    let mut out = format!(
        "{} active listings via {}\n{}",
        a.active_count,
        a.api_source,
        simple(a.average_current_price, bid, &a.grade)
    );
    push_listings(&mut out, "Active", &a.active_items);
    out
}

pub fn market_report(bid: f64, r: &MarketReport) -> String {
    format!(
        "{} current + {} completed listings\n{}\n\n{}",
        r.analysis.current_listings,
        r.analysis.completed_listings,
        statistics(&r.analysis.statistics),
        grade(bid, &r.result)
    )
}

pub fn search(results: &SearchResults) -> String {
    let mut out = format!("Active: {}, Sold: {}", results.active_count, results.sold_count);
    push_listings(&mut out, "Active", &results.active);
    push_listings(&mut out, "Sold", &results.sold);
    out
}

fn push_listings(out: &mut String, heading: &str, listings: &[Listing]) {
    if listings.is_empty() {
        return;
    }
    out.push_str(&format!("\n\n{heading}:"));
    for l in listings {
        out.push_str(&format!("\n  ${:>9.2}  {:<10}  {}", l.price, l.condition, l.title));
    }
}
