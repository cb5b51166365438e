use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

/// Discount and growth rates closer than this are treated as equal; dividing
/// by their near-zero difference would otherwise blow up the general form.
const RATE_EQUALITY_EPSILON: f64 = 1e-12;

/// A level or geometrically growing payment stream.
///
/// `growth_rate = 0` models a level annuity; a positive growth rate models a
/// COLA-style stream whose payment compounds each period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowStream {
    /// First-period payment.
    pub payment: Money,
    /// Number of payments.
    pub periods: u32,
    /// Per-period geometric growth of the payment, >= 0 for typical use.
    pub growth_rate: Rate,
    /// Per-period discount rate.
    pub discount_rate: Rate,
}

/// Present value of the stream: pmt * (1 - ((1+g)/(1+r))^n) / (r - g).
///
/// When the discount rate equals the growth rate the general form is 0/0 and
/// the limit pmt * n / (1 + r) applies instead. No failure modes of its own;
/// finite inputs are a caller precondition.
pub fn present_value(stream: &CashFlowStream) -> Money {
    let n = stream.periods as f64;
    let r = stream.discount_rate;
    let g = stream.growth_rate;

    if (r - g).abs() < RATE_EQUALITY_EPSILON {
        return stream.payment * n / (1.0 + r);
    }

    let ratio = (1.0 + g) / (1.0 + r);
    stream.payment * (1.0 - ratio.powf(n)) / (r - g)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pv_level_annuity() {
        // $100/period for 10 periods at 8%: classic textbook value ~671.01
        let stream = CashFlowStream {
            payment: 100.0,
            periods: 10,
            growth_rate: 0.0,
            discount_rate: 0.08,
        };
        let pv = present_value(&stream);
        assert!((pv - 671.008).abs() < 0.01, "pv={pv}");
    }

    #[test]
    fn test_pv_growing_annuity() {
        // $1000 growing 3%/yr, discounted 6%/yr, 20 years
        let stream = CashFlowStream {
            payment: 1_000.0,
            periods: 20,
            growth_rate: 0.03,
            discount_rate: 0.06,
        };
        let pv = present_value(&stream);
        assert!((pv - 14_561.53).abs() < 0.01, "pv={pv}");
    }

    #[test]
    fn test_pv_degenerate_equal_rates() {
        let stream = CashFlowStream {
            payment: 1_000.0,
            periods: 25,
            growth_rate: 0.05,
            discount_rate: 0.05,
        };
        let pv = present_value(&stream);
        assert!((pv - 1_000.0 * 25.0 / 1.05).abs() < 1e-9);
    }

    #[test]
    fn test_pv_zero_periods() {
        let stream = CashFlowStream {
            payment: 500.0,
            periods: 0,
            growth_rate: 0.0,
            discount_rate: 0.04,
        };
        assert_eq!(present_value(&stream), 0.0);
    }

    #[test]
    fn test_pv_growth_above_discount() {
        // Payments outgrowing the discount rate are worth more than level ones
        let level = CashFlowStream {
            payment: 1_000.0,
            periods: 15,
            growth_rate: 0.0,
            discount_rate: 0.04,
        };
        let growing = CashFlowStream {
            payment: 1_000.0,
            periods: 15,
            growth_rate: 0.06,
            discount_rate: 0.04,
        };
        assert!(present_value(&growing) > present_value(&level));
    }
}
