use crate::model::{FeeBreakdown, NetProfit};
use crate::stats::round2;

pub const FINAL_VALUE_RATE: f64 = 0.10;
pub const PAYPAL_RATE: f64 = 0.029;
pub const PAYPAL_FLAT: f64 = 0.30;
// Free within the monthly listing allowance
pub const INSERTION_FEE: f64 = 0.0;

/// Fees charged when an item sells at `selling_price`. The flat PayPal
/// component applies even to a zero sale.
pub fn fees(selling_price: f64) -> FeeBreakdown {
    let final_value_fee = round2(selling_price * FINAL_VALUE_RATE);
    let paypal_fee = round2(selling_price * PAYPAL_RATE + PAYPAL_FLAT);
    let total_fees = round2(final_value_fee + paypal_fee + INSERTION_FEE);

    FeeBreakdown {
        final_value_fee,
        paypal_fee,
        insertion_fee: INSERTION_FEE,
        total_fees,
    }
}

/// Profit from buying at `bid` and reselling at `selling_price`.
///
/// The margin is not guarded against a zero bid: it comes back as infinity
/// (or NaN for a zero net), see [`NetProfit::margin_is_defined`].
pub fn net_profit(bid: f64, selling_price: f64, shipping: Option<f64>) -> NetProfit {
    let shipping_cost = shipping.unwrap_or(0.0);
    let fees = fees(selling_price);

    let gross_profit = selling_price - bid;
    let net_profit = gross_profit - fees.total_fees - shipping_cost;
    let net_profit_margin = net_profit / bid * 100.0;

    NetProfit {
        gross_profit: round2(gross_profit),
        net_profit: round2(net_profit),
        net_profit_margin: round2(net_profit_margin),
        fees,
        shipping_cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fees_at_one_hundred() {
        let f = fees(100.0);
        assert_eq!(f.final_value_fee, 10.0);
        assert_eq!(f.paypal_fee, 3.2);
        assert_eq!(f.insertion_fee, 0.0);
        assert_eq!(f.total_fees, 13.2);
    }

    #[test]
    fn fees_at_fifty() {
        let f = fees(50.0);
        assert_eq!(f.final_value_fee, 5.0);
        assert_eq!(f.paypal_fee, 1.75);
        assert_eq!(f.total_fees, 6.75);
    }

    #[test]
    fn flat_paypal_fee_survives_a_zero_sale() {
        let f = fees(0.0);
        assert_eq!(f.final_value_fee, 0.0);
        assert_eq!(f.paypal_fee, 0.3);
        assert_eq!(f.total_fees, 0.3);
        assert_eq!(fees(0.01).total_fees, 0.3);
    }

    #[test]
    fn fees_scale_for_large_sales() {
        let f = fees(10_000.0);
        assert_eq!(f.final_value_fee, 1000.0);
        assert_eq!(f.paypal_fee, 290.3);
        assert_eq!(f.total_fees, 1290.3);
    }

    #[test]
    fn net_profit_charges_fees_on_the_sale_price() {
        let p = net_profit(100.0, 150.0, Some(5.0));
        assert_eq!(p.gross_profit, 50.0);
        assert_eq!(p.fees.total_fees, 19.65);
        assert_eq!(p.net_profit, 25.35);
        assert_eq!(p.net_profit_margin, 25.35);
        assert_eq!(p.shipping_cost, 5.0);
        assert!(p.margin_is_defined());
    }

    #[test]
    fn shipping_defaults_to_zero() {
        let p = net_profit(100.0, 150.0, None);
        assert_eq!(p.shipping_cost, 0.0);
        assert_eq!(p.net_profit, 30.35);
    }

    #[test]
    fn losing_trade_has_negative_margin() {
        let p = net_profit(100.0, 80.0, Some(0.0));
        assert_eq!(p.gross_profit, -20.0);
        assert_eq!(p.fees.total_fees, 10.62);
        assert_eq!(p.net_profit, -30.62);
        assert_eq!(p.net_profit_margin, -30.62);
    }

    #[test]
    fn zero_bid_leaves_margin_undefined() {
        let p = net_profit(0.0, 100.0, Some(0.0));
        assert_eq!(p.gross_profit, 100.0);
        assert_eq!(p.net_profit, 86.8);
        assert!(p.net_profit_margin.is_infinite());
        assert!(p.net_profit_margin > 0.0);
        assert!(!p.margin_is_defined());
    }

    #[test]
    fn zero_bid_and_zero_net_is_nan() {
        let p = net_profit(0.0, 100.0, Some(86.8));
        assert_eq!(p.net_profit, 0.0);
        assert!(p.net_profit_margin.is_nan());
        assert!(!p.margin_is_defined());
    }

    #[test]
    fn repeated_calls_are_bit_identical() {
        let a = net_profit(37.5, 61.25, Some(4.1));
        let b = net_profit(37.5, 61.25, Some(4.1));
        assert_eq!(a.net_profit.to_bits(), b.net_profit.to_bits());
        assert_eq!(a.net_profit_margin.to_bits(), b.net_profit_margin.to_bits());
        assert_eq!(fees(61.25), fees(61.25));
    }
}
