pub mod amortization;
pub mod apr;
pub mod debt_payoff;
pub mod loan;
pub mod mortgage;
pub mod pension;
pub mod refinance;
pub mod student_loan;

use fincalc_core::types::Frequency;

/// Map a cadence flag to a `Frequency`. Calculators that cannot handle
/// continuous compounding reject it themselves with a clearer message.
pub(crate) fn parse_frequency(s: &str) -> Result<Frequency, Box<dyn std::error::Error>> {
    match s.to_lowercase().as_str() {
        "annual" | "annually" | "yearly" => Ok(Frequency::Annual),
        "semiannual" | "semi-annual" => Ok(Frequency::SemiAnnual),
        "quarterly" => Ok(Frequency::Quarterly),
        "monthly" => Ok(Frequency::Monthly),
        "biweekly" | "bi-weekly" => Ok(Frequency::BiWeekly),
        "weekly" => Ok(Frequency::Weekly),
        "daily" => Ok(Frequency::Daily),
        "continuous" => Ok(Frequency::Continuous),
        _ => Err(format!(
            "Unknown frequency '{}'. Use: annual, semiannual, quarterly, monthly, \
             biweekly, weekly, daily, continuous",
            s
        )
        .into()),
    }
}
