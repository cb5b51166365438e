use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::engine::schedule::{generate_schedule, AmortizationRow, LoanTerms};
use crate::error::FinCalcError;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::FinCalcResult;

const MONTHS_PER_YEAR: usize = 12;
const MAX_TERM_MONTHS: u32 = 600;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input parameters for a standalone amortization schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationInput {
    pub loan_amount: Money,
    /// Annual nominal rate as a decimal (0.06 = 6%).
    pub annual_rate: Rate,
    pub term_months: u32,
}

/// Calendar-year rollup of schedule rows (year 1 = periods 1-12, and so on;
/// the last year may be partial).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnualSummary {
    pub year: u32,
    pub interest_paid: Money,
    pub principal_paid: Money,
    pub ending_balance: Money,
}

/// The full schedule plus its year-by-year rollup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationOutput {
    pub monthly_payment: Money,
    pub payment_count: u32,
    pub total_paid: Money,
    pub total_interest: Money,
    pub schedule: Vec<AmortizationRow>,
    pub annual_summaries: Vec<AnnualSummary>,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Full monthly amortization schedule with a year-by-year rollup.
pub fn amortize(input: &AmortizationInput) -> FinCalcResult<ComputationOutput<AmortizationOutput>> {
    let start = Instant::now();

    // --- Validation ---
    if input.loan_amount <= 0.0 {
        return Err(FinCalcError::InvalidInput {
            field: "loan_amount".into(),
            reason: "loan_amount must be > 0".into(),
        });
    }
    if !(0.0..1.0).contains(&input.annual_rate) {
        return Err(FinCalcError::InvalidInput {
            field: "annual_rate".into(),
            reason: "annual_rate is a decimal (0.06 = 6%) and must be in [0, 1)".into(),
        });
    }
    if input.term_months == 0 || input.term_months > MAX_TERM_MONTHS {
        return Err(FinCalcError::InvalidInput {
            field: "term_months".into(),
            reason: format!("term_months must be between 1 and {MAX_TERM_MONTHS}"),
        });
    }

    let terms = LoanTerms {
        principal: input.loan_amount,
        periodic_rate: input.annual_rate / MONTHS_PER_YEAR as f64,
        period_count: input.term_months,
    };
    let schedule = generate_schedule(&terms)?;

    let monthly_payment = schedule[0].payment;
    let total_paid: Money = schedule.iter().map(|r| r.payment).sum();
    let total_interest: Money = schedule.iter().map(|r| r.interest_portion).sum();

    let annual_summaries = schedule
        .chunks(MONTHS_PER_YEAR)
        .enumerate()
        .map(|(i, months)| AnnualSummary {
            year: i as u32 + 1,
            interest_paid: months.iter().map(|r| r.interest_portion).sum(),
            principal_paid: months.iter().map(|r| r.principal_portion).sum(),
            ending_balance: months.last().map(|r| r.ending_balance).unwrap_or(0.0),
        })
        .collect();

    let output = AmortizationOutput {
        monthly_payment,
        payment_count: input.term_months,
        total_paid,
        total_interest,
        schedule,
        annual_summaries,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Amortization Schedule (level monthly payment with annual rollup)",
        &serde_json::json!({
            "loan_amount": input.loan_amount,
            "annual_rate": input.annual_rate,
            "term_months": input.term_months,
        }),
        Vec::new(),
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
