use serde::{Deserialize, Serialize};
use std::fmt;

/// Monetary values. IEEE-754 double precision throughout; the calculators
/// do not round internally, formatting is the display layer's job.
pub type Money = f64;

/// Rates expressed as decimals (0.065 = 6.5%). Never as percentages unless
/// the field name carries a `_pct` suffix.
pub type Rate = f64;

/// Payment / compounding cadence shared by the calculators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Frequency {
    Annual,
    SemiAnnual,
    Quarterly,
    #[default]
    Monthly,
    BiWeekly,
    Weekly,
    Daily,
    /// Continuous compounding. Only meaningful for rate conversions;
    /// payment schedules reject it.
    Continuous,
}

impl Frequency {
    /// Periods per year; 0 for `Continuous`, which callers must special-case.
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Frequency::Annual => 1,
            Frequency::SemiAnnual => 2,
            Frequency::Quarterly => 4,
            Frequency::Monthly => 12,
            Frequency::BiWeekly => 26,
            Frequency::Weekly => 52,
            Frequency::Daily => 365,
            Frequency::Continuous => 0,
        }
    }

    pub fn is_continuous(&self) -> bool {
        matches!(self, Frequency::Continuous)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Frequency::Annual => "Annual",
            Frequency::SemiAnnual => "Semi-Annual",
            Frequency::Quarterly => "Quarterly",
            Frequency::Monthly => "Monthly",
            Frequency::BiWeekly => "Bi-Weekly",
            Frequency::Weekly => "Weekly",
            Frequency::Daily => "Daily",
            Frequency::Continuous => "Continuous",
        };
        write!(f, "{name}")
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "ieee754_f64".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_periods_per_year_table() {
        assert_eq!(Frequency::Monthly.periods_per_year(), 12);
        assert_eq!(Frequency::BiWeekly.periods_per_year(), 26);
        assert_eq!(Frequency::Daily.periods_per_year(), 365);
        assert_eq!(Frequency::Continuous.periods_per_year(), 0);
    }

    #[test]
    fn test_frequency_default_is_monthly() {
        assert_eq!(Frequency::default(), Frequency::Monthly);
    }
}
