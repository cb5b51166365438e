use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::engine::schedule::{generate_schedule, AmortizationRow, LoanTerms};
use crate::error::FinCalcError;
use crate::types::{with_metadata, ComputationOutput, Frequency, Money, Rate};
use crate::FinCalcResult;

const MAX_TERM_YEARS: u32 = 50;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input parameters for a general fixed-payment loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanInput {
    pub principal: Money,
    /// Annual nominal rate as a decimal (0.079 = 7.9%).
    pub annual_rate: Rate,
    pub term_years: u32,
    /// Payment cadence; the periodic rate is annual_rate / periods per year.
    pub frequency: Frequency,
    pub include_schedule: bool,
}

/// Periodic payment and lifetime cost breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanOutput {
    pub periodic_payment: Money,
    pub payments_per_year: u32,
    pub payment_count: u32,
    pub total_paid: Money,
    pub total_interest: Money,
    /// Interest as a share of everything paid over the life of the loan.
    pub interest_share_of_total: f64,
    pub schedule: Option<Vec<AmortizationRow>>,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Fixed-payment loan at any of the supported payment cadences.
pub fn calculate_loan(input: &LoanInput) -> FinCalcResult<ComputationOutput<LoanOutput>> {
    let start = Instant::now();

    // --- Validation ---
    if input.principal <= 0.0 {
        return Err(FinCalcError::InvalidInput {
            field: "principal".into(),
            reason: "principal must be > 0".into(),
        });
    }
    if !(0.0..1.0).contains(&input.annual_rate) {
        return Err(FinCalcError::InvalidInput {
            field: "annual_rate".into(),
            reason: "annual_rate is a decimal (0.079 = 7.9%) and must be in [0, 1)".into(),
        });
    }
    if input.term_years == 0 || input.term_years > MAX_TERM_YEARS {
        return Err(FinCalcError::InvalidInput {
            field: "term_years".into(),
            reason: format!("term_years must be between 1 and {MAX_TERM_YEARS}"),
        });
    }
    let payments_per_year = input.frequency.periods_per_year();
    if payments_per_year == 0 {
        return Err(FinCalcError::InvalidInput {
            field: "frequency".into(),
            reason: "payment schedules need a discrete cadence, not continuous compounding".into(),
        });
    }

    // --- Amortization ---
    let terms = LoanTerms {
        principal: input.principal,
        periodic_rate: input.annual_rate / payments_per_year as f64,
        period_count: input.term_years * payments_per_year,
    };
    let schedule = generate_schedule(&terms)?;

    let periodic_payment = schedule[0].payment;
    let total_paid: Money = schedule.iter().map(|r| r.payment).sum();
    let total_interest: Money = schedule.iter().map(|r| r.interest_portion).sum();

    let output = LoanOutput {
        periodic_payment,
        payments_per_year,
        payment_count: terms.period_count,
        total_paid,
        total_interest,
        interest_share_of_total: total_interest / total_paid,
        schedule: input.include_schedule.then_some(schedule),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-Payment Loan (level amortization at a configurable cadence)",
        &serde_json::json!({
            "principal": input.principal,
            "annual_rate": input.annual_rate,
            "term_years": input.term_years,
            "frequency": input.frequency.to_string(),
        }),
        Vec::new(),
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// $25k auto loan at 7.9% over 5 years, paid monthly.
    fn default_input() -> LoanInput {
        LoanInput {
            principal: 25_000.0,
            annual_rate: 0.079,
            term_years: 5,
            frequency: Frequency::Monthly,
            include_schedule: false,
        }
    }

    // ---------------------------------------------------------------
    // 1. Reference monthly payment and cost breakdown
    // ---------------------------------------------------------------
    #[test]
    fn test_reference_monthly_loan() {
        let result = calculate_loan(&default_input()).unwrap();
        let out = &result.result;

        assert_eq!(out.payment_count, 60);
        assert_eq!(out.payments_per_year, 12);
        assert!((out.periodic_payment - 505.71).abs() < 0.01);
        assert!((out.total_interest - 5_342.85).abs() < 0.01);
        assert!((out.interest_share_of_total - 0.1761).abs() < 0.0001);
    }

    // ---------------------------------------------------------------
    // 2. Bi-weekly cadence reprices the same loan
    // ---------------------------------------------------------------
    #[test]
    fn test_biweekly_cadence() {
        let mut input = default_input();
        input.frequency = Frequency::BiWeekly;
        let result = calculate_loan(&input).unwrap();
        let out = &result.result;

        assert_eq!(out.payment_count, 130);
        assert_eq!(out.payments_per_year, 26);
        assert!((out.periodic_payment - 233.07).abs() < 0.01);
    }

    // ---------------------------------------------------------------
    // 3. More frequent payments shave total interest
    // ---------------------------------------------------------------
    #[test]
    fn test_frequency_reduces_total_interest() {
        let monthly = calculate_loan(&default_input()).unwrap();

        let mut input = default_input();
        input.frequency = Frequency::Weekly;
        let weekly = calculate_loan(&input).unwrap();

        assert!(
            weekly.result.total_interest < monthly.result.total_interest,
            "weekly={} monthly={}",
            weekly.result.total_interest,
            monthly.result.total_interest
        );
    }

    // ---------------------------------------------------------------
    // 4. Zero-rate loan is pure principal
    // ---------------------------------------------------------------
    #[test]
    fn test_zero_rate_loan() {
        let mut input = default_input();
        input.annual_rate = 0.0;
        let result = calculate_loan(&input).unwrap();
        let out = &result.result;

        assert_eq!(out.total_interest, 0.0);
        assert_eq!(out.interest_share_of_total, 0.0);
        assert!((out.total_paid - 25_000.0).abs() < 1e-6);
    }

    // ---------------------------------------------------------------
    // Validation rejects
    // ---------------------------------------------------------------
    #[test]
    fn test_validation_continuous_frequency() {
        let mut input = default_input();
        input.frequency = Frequency::Continuous;
        assert!(calculate_loan(&input).is_err());
    }

    #[test]
    fn test_validation_zero_principal() {
        let mut input = default_input();
        input.principal = 0.0;
        assert!(calculate_loan(&input).is_err());
    }

    #[test]
    fn test_schedule_attachment() {
        let mut input = default_input();
        input.include_schedule = true;
        let result = calculate_loan(&input).unwrap();
        let schedule = result.result.schedule.as_ref().unwrap();

        assert_eq!(schedule.len(), 60);
        assert_eq!(schedule.last().unwrap().ending_balance, 0.0);
    }
}
