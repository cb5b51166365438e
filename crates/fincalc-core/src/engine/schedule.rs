use serde::{Deserialize, Serialize};

use crate::error::FinCalcError;
use crate::types::{Money, Rate};
use crate::FinCalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One fixed-payment amortized obligation.
///
/// Built fresh for each calculation and discarded afterwards; the engine holds
/// no state between calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Amount borrowed, > 0.
    pub principal: Money,
    /// Interest rate per payment period (annual rate / periods per year), >= 0.
    pub periodic_rate: Rate,
    /// Number of payments, >= 1.
    pub period_count: u32,
}

/// One period of an amortization schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub period: u32,
    pub payment: Money,
    pub interest_portion: Money,
    pub principal_portion: Money,
    pub ending_balance: Money,
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Fixed per-period payment: P * r * (1+r)^n / ((1+r)^n - 1).
///
/// A zero periodic rate degrades to straight-line repayment P / n. Returns
/// `NonFinitePayment` when the inputs produce anything other than a finite
/// positive payment.
pub fn payment_amount(terms: &LoanTerms) -> FinCalcResult<Money> {
    let n = terms.period_count as f64;

    let payment = if terms.periodic_rate == 0.0 {
        terms.principal / n
    } else {
        let factor = (1.0 + terms.periodic_rate).powf(n);
        terms.principal * terms.periodic_rate * factor / (factor - 1.0)
    };

    if !payment.is_finite() || payment <= 0.0 {
        return Err(FinCalcError::NonFinitePayment {
            principal: terms.principal,
            periodic_rate: terms.periodic_rate,
            period_count: terms.period_count,
        });
    }

    Ok(payment)
}

/// Period-by-period principal/interest/balance breakdown of a fixed-payment
/// loan.
///
/// Each row charges interest on the running balance and puts the rest of the
/// payment toward principal. The final row retires the exact remaining
/// balance, so the schedule always lands on zero instead of on accumulated
/// floating-point drift. Identical inputs yield bit-identical schedules.
pub fn generate_schedule(terms: &LoanTerms) -> FinCalcResult<Vec<AmortizationRow>> {
    let payment = payment_amount(terms)?;
    let mut schedule = Vec::with_capacity(terms.period_count as usize);
    let mut balance = terms.principal;

    for period in 1..=terms.period_count {
        let interest = balance * terms.periodic_rate;

        let row = if period == terms.period_count {
            // Last payment clears whatever balance remains
            AmortizationRow {
                period,
                payment: balance + interest,
                interest_portion: interest,
                principal_portion: balance,
                ending_balance: 0.0,
            }
        } else {
            let principal_portion = payment - interest;
            balance = (balance - principal_portion).max(0.0);
            AmortizationRow {
                period,
                payment,
                interest_portion: interest,
                principal_portion,
                ending_balance: balance,
            }
        };

        schedule.push(row);
    }

    Ok(schedule)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
