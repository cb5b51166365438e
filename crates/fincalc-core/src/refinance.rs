use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::engine::payoff::{break_even_periods, BreakEven};
use crate::engine::schedule::{payment_amount, LoanTerms};
use crate::error::FinCalcError;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::FinCalcResult;

const MONTHS_PER_YEAR: f64 = 12.0;
const MAX_TERM_MONTHS: u32 = 600;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input parameters for a refinance comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefinanceInput {
    pub current_balance: Money,
    /// Annual rate on the existing loan, as a decimal.
    pub current_annual_rate: Rate,
    pub remaining_term_months: u32,
    /// Annual rate on the replacement loan, as a decimal.
    pub new_annual_rate: Rate,
    pub new_term_months: u32,
    pub closing_costs: Money,
    /// Roll the closing costs into the new loan instead of paying cash.
    pub finance_closing_costs: bool,
}

/// Side-by-side payment comparison with break-even and lifetime numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefinanceOutput {
    pub current_monthly_payment: Money,
    pub new_loan_amount: Money,
    pub new_monthly_payment: Money,
    pub monthly_savings: Money,
    /// Months until accumulated savings cover the closing costs; `None` when
    /// the new payment never undercuts the current one.
    pub break_even_months: Option<f64>,
    pub total_remaining_cost_current: Money,
    pub total_cost_new: Money,
    /// Contractual lifetime saving from refinancing, closing costs included.
    pub lifetime_savings: Money,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Compare staying in the current loan against refinancing into a new one.
pub fn analyze_refinance(
    input: &RefinanceInput,
) -> FinCalcResult<ComputationOutput<RefinanceOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    // --- Validation ---
    if input.current_balance <= 0.0 {
        return Err(FinCalcError::InvalidInput {
            field: "current_balance".into(),
            reason: "current_balance must be > 0".into(),
        });
    }
    for (field, rate) in [
        ("current_annual_rate", input.current_annual_rate),
        ("new_annual_rate", input.new_annual_rate),
    ] {
        if !(0.0..1.0).contains(&rate) {
            return Err(FinCalcError::InvalidInput {
                field: field.into(),
                reason: "rates are decimals (0.055 = 5.5%) and must be in [0, 1)".into(),
            });
        }
    }
    for (field, months) in [
        ("remaining_term_months", input.remaining_term_months),
        ("new_term_months", input.new_term_months),
    ] {
        if months == 0 || months > MAX_TERM_MONTHS {
            return Err(FinCalcError::InvalidInput {
                field: field.into(),
                reason: format!("{field} must be between 1 and {MAX_TERM_MONTHS}"),
            });
        }
    }
    if input.closing_costs < 0.0 {
        return Err(FinCalcError::InvalidInput {
            field: "closing_costs".into(),
            reason: "closing_costs must be >= 0".into(),
        });
    }

    // --- Payments on both loans ---
    let current_monthly_payment = payment_amount(&LoanTerms {
        principal: input.current_balance,
        periodic_rate: input.current_annual_rate / MONTHS_PER_YEAR,
        period_count: input.remaining_term_months,
    })?;

    let new_loan_amount = if input.finance_closing_costs {
        input.current_balance + input.closing_costs
    } else {
        input.current_balance
    };
    let new_monthly_payment = payment_amount(&LoanTerms {
        principal: new_loan_amount,
        periodic_rate: input.new_annual_rate / MONTHS_PER_YEAR,
        period_count: input.new_term_months,
    })?;

    let monthly_savings = current_monthly_payment - new_monthly_payment;

    let break_even_months = match break_even_periods(input.closing_costs, monthly_savings) {
        BreakEven::Periods(months) => Some(months),
        BreakEven::NeverBreaksEven => None,
    };

    // --- Lifetime comparison (contractual totals, not schedule-walked) ---
    let total_remaining_cost_current = current_monthly_payment * input.remaining_term_months as f64;
    let mut total_cost_new = new_monthly_payment * input.new_term_months as f64;
    if !input.finance_closing_costs {
        total_cost_new += input.closing_costs;
    }
    let lifetime_savings = total_remaining_cost_current - total_cost_new;

    if input.new_term_months > input.remaining_term_months {
        warnings.push(
            "New term extends the remaining horizon; a lower monthly payment can still cost \
             more over the life of the loan"
                .into(),
        );
    }
    if lifetime_savings < 0.0 {
        warnings.push(
            "Refinancing costs more over the full term than keeping the current loan".into(),
        );
    }

    let output = RefinanceOutput {
        current_monthly_payment,
        new_loan_amount,
        new_monthly_payment,
        monthly_savings,
        break_even_months,
        total_remaining_cost_current,
        total_cost_new,
        lifetime_savings,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Refinance Break-Even (payment delta against closing costs)",
        &serde_json::json!({
            "current_balance": input.current_balance,
            "current_annual_rate": input.current_annual_rate,
            "new_annual_rate": input.new_annual_rate,
            "closing_costs": input.closing_costs,
            "finance_closing_costs": input.finance_closing_costs,
        }),
        warnings,
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

    /// $200k balance, 25 years left at 7%, refinancing to 5.5% for 25 years
    /// with $4k closing costs paid in cash.
    fn default_input() -> RefinanceInput {
        RefinanceInput {
            current_balance: 200_000.0,
            current_annual_rate: 0.07,
            remaining_term_months: 300,
            new_annual_rate: 0.055,
            new_term_months: 300,
            closing_costs: 4_000.0,
            finance_closing_costs: false,
        }
    }

    // ---------------------------------------------------------------
    // 1. Reference comparison: savings and break-even
    // ---------------------------------------------------------------
    #[test]
    fn test_reference_refinance() {
        let result = analyze_refinance(&default_input()).unwrap();
        let out = &result.result;

        assert!((out.current_monthly_payment - 1_413.56).abs() < 0.01);
        assert!((out.new_monthly_payment - 1_228.17).abs() < 0.01);
        assert!((out.monthly_savings - 185.38).abs() < 0.01);

        let be = out.break_even_months.unwrap();
        assert!((be - 21.577).abs() < 0.001, "break_even={be}");
        assert!((out.lifetime_savings - 51_615.02).abs() < 0.01);
    }

    // ---------------------------------------------------------------
    // 2. Financing the costs raises the new payment
    // ---------------------------------------------------------------
    #[test]
    fn test_financed_closing_costs() {
        let mut input = default_input();
        input.finance_closing_costs = true;
        let financed = analyze_refinance(&input).unwrap();
        let cash = analyze_refinance(&default_input()).unwrap();

        assert_eq!(financed.result.new_loan_amount, 204_000.0);
        assert!((financed.result.new_monthly_payment - 1_252.74).abs() < 0.01);
        assert!(financed.result.new_monthly_payment > cash.result.new_monthly_payment);
        assert!(financed.result.lifetime_savings < cash.result.lifetime_savings);
    }

    // ---------------------------------------------------------------
    // 3. Rate increase never breaks even
    // ---------------------------------------------------------------
    #[test]
    fn test_rate_increase_never_breaks_even() {
        let mut input = default_input();
        input.new_annual_rate = 0.08;
        let result = analyze_refinance(&input).unwrap();

        assert!(result.result.monthly_savings < 0.0);
        assert!(result.result.break_even_months.is_none());
    }

    // ---------------------------------------------------------------
    // 4. Identical terms produce zero savings and no break-even
    // ---------------------------------------------------------------
    #[test]
    fn test_identical_terms_no_break_even() {
        let mut input = default_input();
        input.new_annual_rate = input.current_annual_rate;
        let result = analyze_refinance(&input).unwrap();

        assert_eq!(result.result.monthly_savings, 0.0);
        assert!(result.result.break_even_months.is_none());
    }

    // ---------------------------------------------------------------
    // 5. Stretching the term warns even when the payment drops
    // ---------------------------------------------------------------
    #[test]
    fn test_term_extension_warning() {
        let mut input = default_input();
        input.remaining_term_months = 240;
        input.new_term_months = 360;
        let result = analyze_refinance(&input).unwrap();

        assert!(result.result.monthly_savings > 0.0);
        assert!(result.warnings.iter().any(|w| w.contains("extends")));
    }

    // ---------------------------------------------------------------
    // Validation rejects
    // ---------------------------------------------------------------
    #[test]
    fn test_validation_negative_closing_costs() {
        let mut input = default_input();
        input.closing_costs = -1.0;
        assert!(analyze_refinance(&input).is_err());
    }

    #[test]
    fn test_validation_term_bounds() {
        let mut input = default_input();
        input.new_term_months = 0;
        assert!(analyze_refinance(&input).is_err());
    }
}
