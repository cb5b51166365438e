pub mod engine;
pub mod error;
pub mod types;

#[cfg(feature = "mortgage")]
pub mod mortgage;

#[cfg(feature = "loan")]
pub mod loan;

#[cfg(feature = "amortization")]
pub mod amortization;

#[cfg(feature = "refinance")]
pub mod refinance;

#[cfg(feature = "apr")]
pub mod apr;

#[cfg(feature = "student_loan")]
pub mod student_loan;

#[cfg(feature = "pension")]
pub mod pension;

#[cfg(feature = "debt_payoff")]
pub mod debt_payoff;

pub use error::FinCalcError;
pub use types::*;

/// Standard result type for all fincalc operations
pub type FinCalcResult<T> = Result<T, FinCalcError>;
