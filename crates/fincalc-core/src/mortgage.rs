use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::engine::schedule::{generate_schedule, AmortizationRow, LoanTerms};
use crate::error::FinCalcError;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::FinCalcResult;

const MONTHS_PER_YEAR: u32 = 12;
const MAX_TERM_YEARS: u32 = 50;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input parameters for a fixed-rate mortgage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageInput {
    pub home_price: Money,
    pub down_payment: Money,
    /// Annual nominal rate as a decimal (0.065 = 6.5%).
    pub annual_rate: Rate,
    pub term_years: u32,
    /// Annual property tax, escrowed into the monthly payment. Zero to omit.
    pub property_tax_annual: Money,
    /// Annual homeowners insurance, escrowed monthly. Zero to omit.
    pub insurance_annual: Money,
    /// Monthly HOA dues. Zero to omit.
    pub hoa_monthly: Money,
    /// Attach the full period-by-period schedule to the output.
    pub include_schedule: bool,
}

/// Monthly payment breakdown and lifetime totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageOutput {
    pub loan_amount: Money,
    pub monthly_principal_interest: Money,
    /// Property tax + insurance + HOA, per month.
    pub monthly_escrow: Money,
    pub monthly_payment_total: Money,
    pub payment_count: u32,
    pub total_principal_interest_paid: Money,
    pub total_interest: Money,
    pub schedule: Option<Vec<AmortizationRow>>,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Fixed-rate mortgage payment, escrow breakdown, lifetime totals, and an
/// optional amortization schedule.
pub fn calculate_mortgage(
    input: &MortgageInput,
) -> FinCalcResult<ComputationOutput<MortgageOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    // --- Validation ---
    if input.home_price <= 0.0 {
        return Err(FinCalcError::InvalidInput {
            field: "home_price".into(),
            reason: "home_price must be > 0".into(),
        });
    }
    if input.down_payment < 0.0 || input.down_payment >= input.home_price {
        return Err(FinCalcError::InvalidInput {
            field: "down_payment".into(),
            reason: "down_payment must be >= 0 and below home_price".into(),
        });
    }
    if !(0.0..1.0).contains(&input.annual_rate) {
        return Err(FinCalcError::InvalidInput {
            field: "annual_rate".into(),
            reason: "annual_rate is a decimal (0.065 = 6.5%) and must be in [0, 1)".into(),
        });
    }
    if input.term_years == 0 || input.term_years > MAX_TERM_YEARS {
        return Err(FinCalcError::InvalidInput {
            field: "term_years".into(),
            reason: format!("term_years must be between 1 and {MAX_TERM_YEARS}"),
        });
    }
    if input.property_tax_annual < 0.0 || input.insurance_annual < 0.0 || input.hoa_monthly < 0.0 {
        return Err(FinCalcError::InvalidInput {
            field: "escrow".into(),
            reason: "property_tax_annual, insurance_annual, and hoa_monthly must be >= 0".into(),
        });
    }

    let loan_amount = input.home_price - input.down_payment;
    if input.down_payment < input.home_price * 0.20 {
        warnings.push(
            "Down payment is below 20% of the purchase price; lenders typically require PMI, \
             which is not included in this payment"
                .into(),
        );
    }

    // --- Amortization ---
    let terms = LoanTerms {
        principal: loan_amount,
        periodic_rate: input.annual_rate / MONTHS_PER_YEAR as f64,
        period_count: input.term_years * MONTHS_PER_YEAR,
    };
    let schedule = generate_schedule(&terms)?;
    let monthly_principal_interest = schedule[0].payment;

    let total_principal_interest_paid: Money = schedule.iter().map(|r| r.payment).sum();
    let total_interest: Money = schedule.iter().map(|r| r.interest_portion).sum();

    let monthly_escrow = input.property_tax_annual / MONTHS_PER_YEAR as f64
        + input.insurance_annual / MONTHS_PER_YEAR as f64
        + input.hoa_monthly;

    let output = MortgageOutput {
        loan_amount,
        monthly_principal_interest,
        monthly_escrow,
        monthly_payment_total: monthly_principal_interest + monthly_escrow,
        payment_count: terms.period_count,
        total_principal_interest_paid,
        total_interest,
        schedule: input.include_schedule.then_some(schedule),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-Rate Mortgage (level monthly amortization with escrow add-ons)",
        &serde_json::json!({
            "home_price": input.home_price,
            "down_payment": input.down_payment,
            "annual_rate": input.annual_rate,
            "term_years": input.term_years,
            "escrow_included": monthly_escrow > 0.0,
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
