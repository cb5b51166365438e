use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::engine::rate::{solve_rate, RateSolveRequest};
use crate::engine::schedule::{payment_amount, LoanTerms};
use crate::error::FinCalcError;
use crate::types::{with_metadata, ComputationOutput, Frequency, Money, Rate};
use crate::FinCalcResult;

const MONTHS_PER_YEAR: f64 = 12.0;
const MAX_TERM_YEARS: u32 = 50;

// ---------------------------------------------------------------------------
// Effective APR
// ---------------------------------------------------------------------------

/// Input parameters for an effective-APR calculation: what the borrower
/// really pays once fees and points come out of the disbursed amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AprInput {
    pub loan_amount: Money,
    /// Contract rate as a decimal (0.06 = 6%).
    pub nominal_annual_rate: Rate,
    pub term_years: u32,
    /// Flat origination/closing fees deducted from the disbursement.
    pub fees: Money,
    /// Discount points, each worth 1% of the loan amount.
    pub points: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AprOutput {
    pub loan_amount: Money,
    /// Loan amount minus fees and points; the cash the borrower sees.
    pub net_disbursed: Money,
    pub monthly_payment: Money,
    pub nominal_apr_pct: f64,
    pub effective_apr_pct: f64,
    pub periodic_rate: Rate,
    pub converged: bool,
    pub iterations: u32,
}

/// Effective APR of a loan whose fees and points are financed: the payment is
/// set by the contract terms, but the borrower only receives the net amount,
/// so the true rate sits above the nominal one.
pub fn effective_apr(input: &AprInput) -> FinCalcResult<ComputationOutput<AprOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    // --- Validation ---
    if input.loan_amount <= 0.0 {
        return Err(FinCalcError::InvalidInput {
            field: "loan_amount".into(),
            reason: "loan_amount must be > 0".into(),
        });
    }
    if !(0.0..1.0).contains(&input.nominal_annual_rate) {
        return Err(FinCalcError::InvalidInput {
            field: "nominal_annual_rate".into(),
            reason: "nominal_annual_rate is a decimal (0.06 = 6%) and must be in [0, 1)".into(),
        });
    }
    if input.term_years == 0 || input.term_years > MAX_TERM_YEARS {
        return Err(FinCalcError::InvalidInput {
            field: "term_years".into(),
            reason: format!("term_years must be between 1 and {MAX_TERM_YEARS}"),
        });
    }
    if input.fees < 0.0 || input.points < 0.0 {
        return Err(FinCalcError::InvalidInput {
            field: "fees".into(),
            reason: "fees and points must be >= 0".into(),
        });
    }

    let point_cost = input.loan_amount * input.points / 100.0;
    let net_disbursed = input.loan_amount - input.fees - point_cost;
    if net_disbursed <= 0.0 {
        return Err(FinCalcError::InvalidInput {
            field: "fees".into(),
            reason: "fees and points consume the entire loan amount".into(),
        });
    }

    // --- Payment from the contract terms, rate from the net amount ---
    let nominal_periodic = input.nominal_annual_rate / MONTHS_PER_YEAR;
    let period_count = input.term_years * 12;
    let monthly_payment = payment_amount(&LoanTerms {
        principal: input.loan_amount,
        periodic_rate: nominal_periodic,
        period_count,
    })?;

    let solve = solve_rate(&RateSolveRequest {
        net_principal: net_disbursed,
        payment: monthly_payment,
        period_count,
        initial_guess: nominal_periodic,
    });
    if !solve.converged {
        warnings.push(format!(
            "Rate solve stopped after {} iterations without converging; the reported APR is \
             the best available estimate",
            solve.iterations
        ));
    }

    let output = AprOutput {
        loan_amount: input.loan_amount,
        net_disbursed,
        monthly_payment,
        nominal_apr_pct: input.nominal_annual_rate * 100.0,
        effective_apr_pct: solve.periodic_rate * MONTHS_PER_YEAR * 100.0,
        periodic_rate: solve.periodic_rate,
        converged: solve.converged,
        iterations: solve.iterations,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Effective APR (Newton-Raphson over the net disbursed amount)",
        &serde_json::json!({
            "loan_amount": input.loan_amount,
            "nominal_annual_rate": input.nominal_annual_rate,
            "term_years": input.term_years,
            "fees": input.fees,
            "points": input.points,
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// APR / APY conversion
// ---------------------------------------------------------------------------

/// Which way to convert between nominal and effective annual rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversionDirection {
    AprToApy,
    ApyToApr,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateConversionInput {
    /// Rate to convert, as a decimal.
    pub rate: Rate,
    pub compounding: Frequency,
    pub direction: ConversionDirection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateConversionOutput {
    pub input_rate: Rate,
    pub converted_rate: Rate,
    pub input_rate_pct: f64,
    pub converted_rate_pct: f64,
    pub compounding: String,
    /// 0 for continuous compounding.
    pub periods_per_year: u32,
}

/// Convert a nominal APR to the effective APY under a compounding cadence,
/// or invert an APY back to the nominal APR.
pub fn convert_rate(
    input: &RateConversionInput,
) -> FinCalcResult<ComputationOutput<RateConversionOutput>> {
    let start = Instant::now();

    if !input.rate.is_finite() || input.rate <= -1.0 || input.rate >= 10.0 {
        return Err(FinCalcError::InvalidInput {
            field: "rate".into(),
            reason: "rate is a decimal (0.06 = 6%) and must be in (-1, 10)".into(),
        });
    }

    let m = input.compounding.periods_per_year();
    let converted_rate = match (input.direction, input.compounding.is_continuous()) {
        (ConversionDirection::AprToApy, true) => input.rate.exp_m1(),
        (ConversionDirection::AprToApy, false) => {
            (1.0 + input.rate / m as f64).powi(m as i32) - 1.0
        }
        (ConversionDirection::ApyToApr, true) => input.rate.ln_1p(),
        (ConversionDirection::ApyToApr, false) => {
            m as f64 * ((1.0 + input.rate).powf(1.0 / m as f64) - 1.0)
        }
    };

    let output = RateConversionOutput {
        input_rate: input.rate,
        converted_rate,
        input_rate_pct: input.rate * 100.0,
        converted_rate_pct: converted_rate * 100.0,
        compounding: input.compounding.to_string(),
        periods_per_year: m,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "APR/APY Conversion (discrete and continuous compounding)",
        &serde_json::json!({
            "rate": input.rate,
            "compounding": input.compounding.to_string(),
            "direction": format!("{:?}", input.direction),
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

    fn default_apr_input() -> AprInput {
        AprInput {
            loan_amount: 100_000.0,
            nominal_annual_rate: 0.06,
            term_years: 10,
            fees: 2_500.0,
            points: 0.0,
        }
    }

    // ---------------------------------------------------------------
    // 1. Financed fee pushes the effective APR above the nominal
    // ---------------------------------------------------------------
    #[test]
    fn test_financed_fee_effective_apr() {
        let result = effective_apr(&default_apr_input()).unwrap();
        let out = &result.result;

        assert_eq!(out.net_disbursed, 97_500.0);
        assert!((out.monthly_payment - 1_110.21).abs() < 0.01);
        assert!(out.converged);
        assert!(out.effective_apr_pct > out.nominal_apr_pct);
        assert!(
            (out.effective_apr_pct - 6.5627).abs() < 0.001,
            "apr={}",
            out.effective_apr_pct
        );
        assert!(result.warnings.is_empty());
    }

    // ---------------------------------------------------------------
    // 2. No fees: effective equals nominal
    // ---------------------------------------------------------------
    #[test]
    fn test_no_fees_apr_equals_nominal() {
        let mut input = default_apr_input();
        input.fees = 0.0;
        let result = effective_apr(&input).unwrap();
        let out = &result.result;

        assert!(out.converged);
        assert!((out.effective_apr_pct - 6.0).abs() < 1e-6);
    }

    // ---------------------------------------------------------------
    // 3. Points count as 1% of the loan each
    // ---------------------------------------------------------------
    #[test]
    fn test_points_reduce_disbursement() {
        let mut input = default_apr_input();
        input.fees = 0.0;
        input.points = 1.0;
        let result = effective_apr(&input).unwrap();
        let out = &result.result;

        assert_eq!(out.net_disbursed, 99_000.0);
        assert!(out.effective_apr_pct > out.nominal_apr_pct);
    }

    // ---------------------------------------------------------------
    // 4. Fees swallowing the loan are rejected
    // ---------------------------------------------------------------
    #[test]
    fn test_fees_exceeding_loan_rejected() {
        let mut input = default_apr_input();
        input.fees = 150_000.0;
        assert!(effective_apr(&input).is_err());
    }

    // ---------------------------------------------------------------
    // 5. APR -> APY under monthly compounding
    // ---------------------------------------------------------------
    #[test]
    fn test_apr_to_apy_monthly() {
        let result = convert_rate(&RateConversionInput {
            rate: 0.06,
            compounding: Frequency::Monthly,
            direction: ConversionDirection::AprToApy,
        })
        .unwrap();
        let out = &result.result;

        assert!((out.converted_rate_pct - 6.1678).abs() < 0.0001);
        assert_eq!(out.periods_per_year, 12);
    }

    // ---------------------------------------------------------------
    // 6. Continuous compounding: APY = e^r - 1
    // ---------------------------------------------------------------
    #[test]
    fn test_apr_to_apy_continuous() {
        let result = convert_rate(&RateConversionInput {
            rate: 0.06,
            compounding: Frequency::Continuous,
            direction: ConversionDirection::AprToApy,
        })
        .unwrap();
        let out = &result.result;

        assert!((out.converted_rate_pct - 6.1837).abs() < 0.0001);
        assert_eq!(out.periods_per_year, 0);

        // Continuous beats every discrete cadence
        let daily = convert_rate(&RateConversionInput {
            rate: 0.06,
            compounding: Frequency::Daily,
            direction: ConversionDirection::AprToApy,
        })
        .unwrap();
        assert!(out.converted_rate > daily.result.converted_rate);
    }

    // ---------------------------------------------------------------
    // 7. APY -> APR inverts the monthly conversion
    // ---------------------------------------------------------------
    #[test]
    fn test_apy_to_apr_round_trip() {
        let apy = convert_rate(&RateConversionInput {
            rate: 0.06,
            compounding: Frequency::Monthly,
            direction: ConversionDirection::AprToApy,
        })
        .unwrap();

        let back = convert_rate(&RateConversionInput {
            rate: apy.result.converted_rate,
            compounding: Frequency::Monthly,
            direction: ConversionDirection::ApyToApr,
        })
        .unwrap();

        assert!((back.result.converted_rate - 0.06).abs() < 1e-9);
    }

    // ---------------------------------------------------------------
    // Validation rejects
    // ---------------------------------------------------------------
    #[test]
    fn test_validation_rate_below_negative_one() {
        let result = convert_rate(&RateConversionInput {
            rate: -1.5,
            compounding: Frequency::Monthly,
            direction: ConversionDirection::AprToApy,
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_nominal_rate_as_percent() {
        let mut input = default_apr_input();
        input.nominal_annual_rate = 6.0;
        assert!(effective_apr(&input).is_err());
    }
}
