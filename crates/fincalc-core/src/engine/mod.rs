//! Shared numerical engine behind every calculator: amortization schedules,
//! annuity present values, Newton-Raphson rate solving, and closed-form
//! payoff/break-even terms. Pure functions over plain values; all range
//! validation lives with the calculators that call in.

pub mod annuity;
pub mod payoff;
pub mod rate;
pub mod schedule;

pub use annuity::{present_value, CashFlowStream};
pub use payoff::{break_even_periods, term_from_payment, BreakEven};
pub use rate::{solve_rate, RateSolveRequest, RateSolveResult};
pub use schedule::{generate_schedule, payment_amount, AmortizationRow, LoanTerms};
