use thiserror::Error;

#[derive(Debug, Error)]
pub enum FinCalcError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error(
        "Could not calculate a payment for principal {principal}, periodic rate {periodic_rate}, \
         {period_count} periods"
    )]
    NonFinitePayment {
        principal: f64,
        periodic_rate: f64,
        period_count: u32,
    },

    #[error(
        "Payment {payment} does not cover the period interest {period_interest}; \
         the balance never amortizes"
    )]
    PaymentTooLow { payment: f64, period_interest: f64 },
}
