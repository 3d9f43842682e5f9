use crate::grader::Factors;

/// Human-readable justification, one sentence per scoring factor.
pub fn explain(factors: &Factors) -> String {
    let reasons = [
        margin_phrase(factors.profit_margin),
        volatility_phrase(factors.volatility),
        size_phrase(factors.market_size),
        position_phrase(factors.position),
    ];
    format!("{}.", reasons.join(". "))
}

fn margin_phrase(margin: f64) -> &'static str {
    match margin {
        m if m > 50.0 => "Excellent profit margin potential",
        m if m > 30.0 => "Good profit margin potential",
        m if m > 20.0 => "Moderate profit margin potential",
        m if m > 10.0 => "Low profit margin potential",
        m if m > 0.0 => "Minimal profit margin potential",
        _ => "No profit margin - potential loss",
    }
}

fn volatility_phrase(volatility: f64) -> &'static str {
    if !volatility.is_finite() {
        return "Volatile market prices";
    }
    match volatility {
        v if v < 0.3 => "Stable market prices",
        v if v < 0.5 => "Moderately stable market",
        _ => "Volatile market prices",
    }
}

fn size_phrase(listings: usize) -> &'static str {
    match listings {
        n if n > 50 => "Large market with many listings",
        n if n > 20 => "Good market size",
        n if n > 10 => "Limited market data",
        _ => "Very limited market data",
    }
}

fn position_phrase(position: f64) -> &'static str {
    if !position.is_finite() {
        return "Higher than average pricing";
    }
    match position {
        p if p < 0.3 => "Competitive pricing",
        p if p < 0.5 => "Average pricing",
        _ => "Higher than average pricing",
    }
}
