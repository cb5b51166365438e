use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::engine::payoff::term_from_payment;
use crate::error::FinCalcError;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::FinCalcResult;

const MONTHS_PER_YEAR: f64 = 12.0;
const LONG_PAYOFF_MONTHS: u32 = 600;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input parameters for a fixed-payment debt payoff plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtPayoffInput {
    pub balance: Money,
    /// Annual rate as a decimal (0.18 = 18%).
    pub annual_rate: Rate,
    pub monthly_payment: Money,
    /// Optional higher payment to compare against the base plan.
    pub accelerated_payment: Option<Money>,
}

/// Cost and timing of paying a balance down at one fixed payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoffPlan {
    pub monthly_payment: Money,
    /// Closed-form payoff term; generally fractional.
    pub months_to_payoff: f64,
    /// Whole months until the balance actually reaches zero.
    pub whole_months: u32,
    pub total_paid: Money,
    pub total_interest: Money,
}

/// The accelerated plan next to what it saves over the base plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceleratedComparison {
    pub plan: PayoffPlan,
    pub months_saved: f64,
    pub interest_saved: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtPayoffOutput {
    pub base_plan: PayoffPlan,
    pub accelerated: Option<AcceleratedComparison>,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Payoff time and lifetime cost for a fixed monthly payment, with an
/// optional accelerated-payment comparison.
pub fn plan_debt_payoff(
    input: &DebtPayoffInput,
) -> FinCalcResult<ComputationOutput<DebtPayoffOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    // --- Validation ---
    if input.balance <= 0.0 {
        return Err(FinCalcError::InvalidInput {
            field: "balance".into(),
            reason: "balance must be > 0".into(),
        });
    }
    if !(0.0..1.0).contains(&input.annual_rate) {
        return Err(FinCalcError::InvalidInput {
            field: "annual_rate".into(),
            reason: "annual_rate is a decimal (0.18 = 18%) and must be in [0, 1)".into(),
        });
    }
    if input.monthly_payment <= 0.0 {
        return Err(FinCalcError::InvalidInput {
            field: "monthly_payment".into(),
            reason: "monthly_payment must be > 0".into(),
        });
    }
    if let Some(accelerated) = input.accelerated_payment {
        if accelerated <= input.monthly_payment {
            return Err(FinCalcError::InvalidInput {
                field: "accelerated_payment".into(),
                reason: "accelerated_payment must exceed monthly_payment".into(),
            });
        }
    }

    let periodic_rate = input.annual_rate / MONTHS_PER_YEAR;

    let base_plan = build_plan(input.balance, periodic_rate, input.monthly_payment)?;
    if base_plan.whole_months > LONG_PAYOFF_MONTHS {
        warnings.push(format!(
            "At this payment the balance takes {} months (over 50 years) to clear",
            base_plan.whole_months
        ));
    }

    let accelerated = match input.accelerated_payment {
        Some(payment) => {
            let plan = build_plan(input.balance, periodic_rate, payment)?;
            Some(AcceleratedComparison {
                months_saved: base_plan.months_to_payoff - plan.months_to_payoff,
                interest_saved: base_plan.total_interest - plan.total_interest,
                plan,
            })
        }
        None => None,
    };

    let output = DebtPayoffOutput {
        base_plan,
        accelerated,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Debt Payoff (closed-form term with accelerated-payment comparison)",
        &serde_json::json!({
            "balance": input.balance,
            "annual_rate": input.annual_rate,
            "monthly_payment": input.monthly_payment,
            "accelerated_payment": input.accelerated_payment,
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Closed-form term plus a whole-month walk for exact totals; the final
/// month's payment is only whatever remains due.
fn build_plan(balance: Money, periodic_rate: Rate, payment: Money) -> FinCalcResult<PayoffPlan> {
    let months_to_payoff = term_from_payment(balance, periodic_rate, payment)?;

    let mut remaining = balance;
    let mut total_paid = 0.0;
    let mut whole_months: u32 = 0;
    while remaining > 0.0 {
        let due = remaining + remaining * periodic_rate;
        whole_months += 1;
        if due <= payment {
            total_paid += due;
            remaining = 0.0;
        } else {
            total_paid += payment;
            remaining = due - payment;
        }
    }

    Ok(PayoffPlan {
        monthly_payment: payment,
        months_to_payoff,
        whole_months,
        total_paid,
        total_interest: total_paid - balance,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
