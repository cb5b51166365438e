use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const MAX_RATE_ITERATIONS: u32 = 30;
/// Early exit once the Newton step shrinks below this.
const STEP_EPSILON: f64 = 1e-6;
/// Rates this close to zero use the r -> 0 limits of the annuity factor,
/// which is otherwise 0/0.
const ZERO_RATE_EPSILON: f64 = 1e-9;
const MIN_RATE: f64 = -0.99;
const MAX_RATE: f64 = 10.0;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input to the iterative rate solver.
///
/// `net_principal` is the amount actually disbursed: the contract principal
/// minus financed fees and points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateSolveRequest {
    pub net_principal: Money,
    pub payment: Money,
    pub period_count: u32,
    /// Iteration seed, normally the nominal contract rate per period.
    pub initial_guess: Rate,
}

/// Solver outcome. `periodic_rate` is the best estimate reached even when
/// `converged` is false; callers decide how much to trust it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateSolveResult {
    pub periodic_rate: Rate,
    pub converged: bool,
    pub iterations: u32,
}

// ---------------------------------------------------------------------------
// Solver
// ---------------------------------------------------------------------------

/// Annuity factor a(r) = (1 - (1+r)^-n) / r and its closed-form derivative.
fn annuity_factor(rate: f64, n: f64) -> (f64, f64) {
    if rate.abs() < ZERO_RATE_EPSILON {
        // Limits as r -> 0: a(0) = n, a'(0) = -n(n+1)/2
        return (n, -n * (n + 1.0) / 2.0);
    }

    let discount = (1.0 + rate).powf(-n);
    let factor = (1.0 - discount) / rate;
    let derivative = (n * (1.0 + rate).powf(-n - 1.0) * rate - (1.0 - discount)) / (rate * rate);
    (factor, derivative)
}

/// Newton-Raphson solve for the periodic rate that discounts `payment` over
/// `period_count` periods to `net_principal`.
///
/// Root of f(r) = net_principal - payment * (1 - (1+r)^-n) / r, with the
/// derivative in closed form rather than numerically differenced. Runs at
/// most 30 iterations and reports whatever it reached: there is no bracketing
/// fallback, so a poor seed can come back `converged: false` with a rate only
/// as good as the last step. Annualizing the result is the caller's job
/// (`periodic_rate * periods_per_year * 100` for a percentage APR).
pub fn solve_rate(request: &RateSolveRequest) -> RateSolveResult {
    let n = request.period_count as f64;
    let mut rate = request.initial_guess;

    for iteration in 1..=MAX_RATE_ITERATIONS {
        let (factor, factor_prime) = annuity_factor(rate, n);
        let f = request.net_principal - request.payment * factor;
        let f_prime = -request.payment * factor_prime;

        if f_prime == 0.0 || !f_prime.is_finite() {
            return RateSolveResult {
                periodic_rate: rate,
                converged: false,
                iterations: iteration,
            };
        }

        let step = f / f_prime;
        rate -= step;

        // Guard against divergence
        if rate < MIN_RATE {
            rate = MIN_RATE;
        } else if rate > MAX_RATE {
            rate = MAX_RATE;
        }

        if step.abs() < STEP_EPSILON {
            return RateSolveResult {
                periodic_rate: rate,
                converged: true,
                iterations: iteration,
            };
        }
    }

    RateSolveResult {
        periodic_rate: rate,
        converged: false,
        iterations: MAX_RATE_ITERATIONS,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::schedule::{payment_amount, LoanTerms};

    #[test]
    fn test_solve_recovers_known_rate() {
        let terms = LoanTerms {
            principal: 100_000.0,
            periodic_rate: 0.005,
            period_count: 120,
        };
        let payment = payment_amount(&terms).unwrap();

        let result = solve_rate(&RateSolveRequest {
            net_principal: 100_000.0,
            payment,
            period_count: 120,
            initial_guess: 0.005,
        });

        assert!(result.converged);
        assert!((result.periodic_rate - 0.005).abs() < 1e-5);
    }

    #[test]
    fn test_solve_from_distant_guess() {
        let terms = LoanTerms {
            principal: 100_000.0,
            periodic_rate: 0.005,
            period_count: 120,
        };
        let payment = payment_amount(&terms).unwrap();

        // Seed at double the true rate; Newton still lands on it
        let result = solve_rate(&RateSolveRequest {
            net_principal: 100_000.0,
            payment,
            period_count: 120,
            initial_guess: 0.01,
        });

        assert!(result.converged);
        assert!(result.iterations <= MAX_RATE_ITERATIONS);
        assert!((result.periodic_rate - 0.005).abs() < 1e-9);
    }

    #[test]
    fn test_solve_financed_fee_raises_rate() {
        // $100k loan with $2.5k fee financed: borrower nets $97.5k but pays
        // on the full principal, so the effective rate exceeds the nominal
        let terms = LoanTerms {
            principal: 100_000.0,
            periodic_rate: 0.06 / 12.0,
            period_count: 120,
        };
        let payment = payment_amount(&terms).unwrap();

        let result = solve_rate(&RateSolveRequest {
            net_principal: 97_500.0,
            payment,
            period_count: 120,
            initial_guess: 0.06 / 12.0,
        });

        assert!(result.converged);
        assert!(result.periodic_rate > 0.06 / 12.0);
        assert!((result.periodic_rate - 0.0054689).abs() < 1e-6);
    }

    #[test]
    fn test_solve_zero_payment_does_not_converge() {
        let result = solve_rate(&RateSolveRequest {
            net_principal: 50_000.0,
            payment: 0.0,
            period_count: 60,
            initial_guess: 0.004,
        });

        assert!(!result.converged);
    }

    #[test]
    fn test_annuity_factor_zero_rate_limit() {
        let (factor, derivative) = annuity_factor(0.0, 120.0);
        assert_eq!(factor, 120.0);
        assert_eq!(derivative, -120.0 * 121.0 / 2.0);
    }

    #[test]
    fn test_annuity_factor_matches_direct_sum() {
        // a(r) should equal sum of discount factors 1/(1+r)^t
        let rate: f64 = 0.007;
        let n = 36;
        let direct: f64 = (1..=n).map(|t| (1.0 + rate).powi(-t)).sum();
        let (factor, _) = annuity_factor(rate, n as f64);
        assert!((factor - direct).abs() < 1e-9, "factor={factor} direct={direct}");
    }
}
