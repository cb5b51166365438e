use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::engine::schedule::{generate_schedule, LoanTerms};
use crate::error::FinCalcError;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::FinCalcResult;

const MONTHS_PER_YEAR: f64 = 12.0;
const MAX_TERM_YEARS: u32 = 50;
const MAX_DEFERMENT_MONTHS: u32 = 120;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input parameters for a student loan with an in-school deferment period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentLoanInput {
    pub principal: Money,
    /// Annual rate as a decimal (0.045 = 4.5%).
    pub annual_rate: Rate,
    pub repayment_term_years: u32,
    /// Months between disbursement and the first payment.
    pub deferment_months: u32,
    /// Subsidized loans accrue no interest during deferment.
    pub subsidized: bool,
    /// Fold accrued deferment interest into the balance when repayment
    /// starts; when false the accrued interest is due as a lump sum instead.
    pub capitalize_interest: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentLoanOutput {
    /// Simple interest accrued over the deferment months (zero if subsidized).
    pub accrued_deferment_interest: Money,
    pub balance_at_repayment: Money,
    pub monthly_payment: Money,
    pub payment_count: u32,
    /// Interest charged during the repayment phase alone.
    pub repayment_interest: Money,
    /// Deferment accrual plus repayment interest.
    pub total_interest: Money,
    /// Everything the borrower hands over, lump-sum interest included.
    pub total_paid: Money,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Project a student loan through deferment and a standard level repayment.
pub fn project_student_loan(
    input: &StudentLoanInput,
) -> FinCalcResult<ComputationOutput<StudentLoanOutput>> {
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
            reason: "annual_rate is a decimal (0.045 = 4.5%) and must be in [0, 1)".into(),
        });
    }
    if input.repayment_term_years == 0 || input.repayment_term_years > MAX_TERM_YEARS {
        return Err(FinCalcError::InvalidInput {
            field: "repayment_term_years".into(),
            reason: format!("repayment_term_years must be between 1 and {MAX_TERM_YEARS}"),
        });
    }
    if input.deferment_months > MAX_DEFERMENT_MONTHS {
        return Err(FinCalcError::InvalidInput {
            field: "deferment_months".into(),
            reason: format!("deferment_months must be at most {MAX_DEFERMENT_MONTHS}"),
        });
    }

    // --- Deferment accrual (simple interest, monthly) ---
    let accrued_deferment_interest = if input.subsidized {
        0.0
    } else {
        input.principal * (input.annual_rate / MONTHS_PER_YEAR) * input.deferment_months as f64
    };

    let balance_at_repayment = if input.capitalize_interest {
        input.principal + accrued_deferment_interest
    } else {
        input.principal
    };
    // Interest not capitalized is settled in cash when repayment begins
    let lump_sum_interest = if input.capitalize_interest {
        0.0
    } else {
        accrued_deferment_interest
    };

    // --- Repayment schedule ---
    let terms = LoanTerms {
        principal: balance_at_repayment,
        periodic_rate: input.annual_rate / MONTHS_PER_YEAR,
        period_count: input.repayment_term_years * 12,
    };
    let schedule = generate_schedule(&terms)?;

    let monthly_payment = schedule[0].payment;
    let repayment_interest: Money = schedule.iter().map(|r| r.interest_portion).sum();
    let schedule_total: Money = schedule.iter().map(|r| r.payment).sum();

    let output = StudentLoanOutput {
        accrued_deferment_interest,
        balance_at_repayment,
        monthly_payment,
        payment_count: terms.period_count,
        repayment_interest,
        total_interest: accrued_deferment_interest + repayment_interest,
        total_paid: schedule_total + lump_sum_interest,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Student Loan (deferment accrual with optional capitalization)",
        &serde_json::json!({
            "principal": input.principal,
            "annual_rate": input.annual_rate,
            "repayment_term_years": input.repayment_term_years,
            "deferment_months": input.deferment_months,
            "subsidized": input.subsidized,
            "capitalize_interest": input.capitalize_interest,
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

    /// $20k unsubsidized at 4.5%, 4.5 years of school + grace, 10-year
    /// standard repayment with capitalization.
    fn default_input() -> StudentLoanInput {
        StudentLoanInput {
            principal: 20_000.0,
            annual_rate: 0.045,
            repayment_term_years: 10,
            deferment_months: 54,
            subsidized: false,
            capitalize_interest: true,
        }
    }

    // ---------------------------------------------------------------
    // 1. Unsubsidized loan capitalizes deferment interest
    // ---------------------------------------------------------------
    #[test]
    fn test_unsubsidized_capitalization() {
        let result = project_student_loan(&default_input()).unwrap();
        let out = &result.result;

        // 20000 * 0.045/12 * 54 = 4050
        assert!((out.accrued_deferment_interest - 4_050.0).abs() < 1e-9);
        assert!((out.balance_at_repayment - 24_050.0).abs() < 1e-9);
        assert!((out.monthly_payment - 249.25).abs() < 0.01);
        assert!((out.total_interest - 9_910.04).abs() < 0.01);

        // Everything above the original principal is interest
        let implied = out.total_paid - 20_000.0;
        assert!((implied - out.total_interest).abs() < 1e-6);
    }

    // ---------------------------------------------------------------
    // 2. Subsidized loan skips deferment accrual entirely
    // ---------------------------------------------------------------
    #[test]
    fn test_subsidized_skips_accrual() {
        let mut input = default_input();
        input.subsidized = true;
        let result = project_student_loan(&input).unwrap();
        let out = &result.result;

        assert_eq!(out.accrued_deferment_interest, 0.0);
        assert_eq!(out.balance_at_repayment, 20_000.0);
        assert!((out.monthly_payment - 207.28).abs() < 0.01);
    }

    // ---------------------------------------------------------------
    // 3. Paying accrual as a lump keeps the payment lower
    // ---------------------------------------------------------------
    #[test]
    fn test_uncapitalized_lump_sum() {
        let mut input = default_input();
        input.capitalize_interest = false;
        let result = project_student_loan(&input).unwrap();
        let out = &result.result;

        assert!((out.accrued_deferment_interest - 4_050.0).abs() < 1e-9);
        assert_eq!(out.balance_at_repayment, 20_000.0);
        assert!((out.monthly_payment - 207.28).abs() < 0.01);
        assert!((out.total_paid - 28_923.22).abs() < 0.01);

        let capitalized = project_student_loan(&default_input()).unwrap();
        assert!(out.monthly_payment < capitalized.result.monthly_payment);
        // Capitalizing charges interest on the accrued interest
        assert!(out.total_interest < capitalized.result.total_interest);
    }

    // ---------------------------------------------------------------
    // 4. No deferment means no accrual either way
    // ---------------------------------------------------------------
    #[test]
    fn test_zero_deferment() {
        let mut input = default_input();
        input.deferment_months = 0;
        let result = project_student_loan(&input).unwrap();

        assert_eq!(result.result.accrued_deferment_interest, 0.0);
        assert_eq!(result.result.balance_at_repayment, 20_000.0);
    }

    // ---------------------------------------------------------------
    // Validation rejects
    // ---------------------------------------------------------------
    #[test]
    fn test_validation_deferment_cap() {
        let mut input = default_input();
        input.deferment_months = 121;
        assert!(project_student_loan(&input).is_err());
    }

    #[test]
    fn test_validation_zero_principal() {
        let mut input = default_input();
        input.principal = 0.0;
        assert!(project_student_loan(&input).is_err());
    }
}
