use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::engine::annuity::{present_value, CashFlowStream};
use crate::error::FinCalcError;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::FinCalcResult;

const MAX_LIFE_EXPECTANCY: u32 = 120;
/// Offers inside this relative band are called too close to rank reliably.
const CLOSE_CALL_THRESHOLD: f64 = 0.02;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input parameters for a lump-sum vs. lifetime-annuity comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PensionInput {
    /// One-time buyout offered instead of the pension.
    pub lump_sum_offer: Money,
    /// First-year pension payment.
    pub annual_pension: Money,
    pub retirement_age: u32,
    pub life_expectancy: u32,
    /// Rate used to discount future pension payments, as a decimal.
    pub discount_rate: Rate,
    /// Annual cost-of-living adjustment on the pension, as a decimal.
    pub cola_rate: Rate,
}

/// Which offer the numbers favor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PensionVerdict {
    AnnuityFavored,
    LumpSumFavored,
    Equivalent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PensionOutput {
    pub years_in_retirement: u32,
    /// Present value of the pension stream, COLA included.
    pub annuity_present_value: Money,
    /// Present value of the same stream with the COLA stripped out.
    pub annuity_present_value_level: Money,
    /// What the COLA alone is worth today.
    pub cola_value: Money,
    pub lump_sum_offer: Money,
    /// Annuity PV minus lump sum; positive favors the annuity.
    pub difference: Money,
    /// Difference relative to the lump-sum offer.
    pub difference_pct: f64,
    pub verdict: PensionVerdict,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Compare a lump-sum buyout against the lifetime pension it replaces.
pub fn compare_pension(input: &PensionInput) -> FinCalcResult<ComputationOutput<PensionOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    // --- Validation ---
    if input.lump_sum_offer <= 0.0 {
        return Err(FinCalcError::InvalidInput {
            field: "lump_sum_offer".into(),
            reason: "lump_sum_offer must be > 0".into(),
        });
    }
    if input.annual_pension <= 0.0 {
        return Err(FinCalcError::InvalidInput {
            field: "annual_pension".into(),
            reason: "annual_pension must be > 0".into(),
        });
    }
    if input.life_expectancy <= input.retirement_age {
        return Err(FinCalcError::InvalidInput {
            field: "life_expectancy".into(),
            reason: "life_expectancy must exceed retirement_age".into(),
        });
    }
    if input.life_expectancy > MAX_LIFE_EXPECTANCY {
        return Err(FinCalcError::InvalidInput {
            field: "life_expectancy".into(),
            reason: format!("life_expectancy must be at most {MAX_LIFE_EXPECTANCY}"),
        });
    }
    for (field, rate) in [
        ("discount_rate", input.discount_rate),
        ("cola_rate", input.cola_rate),
    ] {
        if !(0.0..1.0).contains(&rate) {
            return Err(FinCalcError::InvalidInput {
                field: field.into(),
                reason: "rates are decimals (0.05 = 5%) and must be in [0, 1)".into(),
            });
        }
    }

    let years_in_retirement = input.life_expectancy - input.retirement_age;

    // --- Value the stream with and without its COLA ---
    let annuity_present_value = present_value(&CashFlowStream {
        payment: input.annual_pension,
        periods: years_in_retirement,
        growth_rate: input.cola_rate,
        discount_rate: input.discount_rate,
    });
    let annuity_present_value_level = present_value(&CashFlowStream {
        payment: input.annual_pension,
        periods: years_in_retirement,
        growth_rate: 0.0,
        discount_rate: input.discount_rate,
    });

    let difference = annuity_present_value - input.lump_sum_offer;
    let difference_pct = difference / input.lump_sum_offer;
    let verdict = if difference > 0.0 {
        PensionVerdict::AnnuityFavored
    } else if difference < 0.0 {
        PensionVerdict::LumpSumFavored
    } else {
        PensionVerdict::Equivalent
    };

    if difference_pct.abs() < CLOSE_CALL_THRESHOLD {
        warnings.push(format!(
            "The offers are within {:.0}% of each other; the ranking is sensitive to the \
             discount rate assumption",
            CLOSE_CALL_THRESHOLD * 100.0
        ));
    }

    let output = PensionOutput {
        years_in_retirement,
        annuity_present_value,
        annuity_present_value_level,
        cola_value: annuity_present_value - annuity_present_value_level,
        lump_sum_offer: input.lump_sum_offer,
        difference,
        difference_pct,
        verdict,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Pension Lump-Sum vs. Annuity (growing-annuity present value)",
        &serde_json::json!({
            "retirement_age": input.retirement_age,
            "life_expectancy": input.life_expectancy,
            "discount_rate": input.discount_rate,
            "cola_rate": input.cola_rate,
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
