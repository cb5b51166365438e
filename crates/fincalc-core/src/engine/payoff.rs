use serde::{Deserialize, Serialize};

use crate::error::FinCalcError;
use crate::types::{Money, Rate};
use crate::FinCalcResult;

/// Break-even outcome for a refinance: a period count, or a sentinel meaning
/// the savings never recoup the costs. The sentinel is a display branch
/// ("N/A"), never an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BreakEven {
    Periods(f64),
    NeverBreaksEven,
}

/// Number of periods to retire `balance` with a fixed `payment`:
/// n = -ln(1 - B*r/pmt) / ln(1+r).
///
/// The result is generally fractional; callers round up when a whole-period
/// count is wanted. A zero rate degrades to B / pmt. A payment at or below
/// the period interest can never amortize the balance, so that precondition
/// is checked up front rather than caught as a NaN afterwards.
pub fn term_from_payment(
    balance: Money,
    periodic_rate: Rate,
    payment: Money,
) -> FinCalcResult<f64> {
    let period_interest = balance * periodic_rate;
    if payment <= period_interest {
        return Err(FinCalcError::PaymentTooLow {
            payment,
            period_interest,
        });
    }

    if periodic_rate == 0.0 {
        return Ok(balance / payment);
    }

    Ok(-(-balance * periodic_rate / payment).ln_1p() / periodic_rate.ln_1p())
}

/// Periods until accumulated per-period savings cover a one-time cost.
pub fn break_even_periods(closing_costs: Money, monthly_savings: Money) -> BreakEven {
    if monthly_savings <= 0.0 {
        return BreakEven::NeverBreaksEven;
    }
    BreakEven::Periods(closing_costs / monthly_savings)
}
