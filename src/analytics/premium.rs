// src/analytics/premium.rs
//! Black-Scholes premiums for the options the strategy writes
//!
//! # Mathematical Foundation
//!
//! Under the Black-Scholes model, the underlying asset follows:
//! ```text
//! dS_t = r S_t dt + σ S_t dW_t
//! ```
//!
//! The premium collected for writing a European option is the risk-neutral
//! expectation of its payoff, which has the closed forms below involving
//! the cumulative normal distribution Φ(x).
//!
//! The strategy engine quotes premiums in cents, so [`premium`] rounds to
//! two decimals. It never floors the result: the 0.01 minimum tradable
//! premium is a strategy-level policy applied by the caller, not a pricing
//! fact.

use crate::math_utils::{norm_cdf, round_to_cents};

/// Which side of the option chain is being written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Call,
    Put,
}

/// Black-Scholes European call premium
///
/// # Formula
/// ```text
/// C(S,K,r,σ,τ) = S*Φ(d₁) - K*e^(-rτ)*Φ(d₂)
/// ```
///
/// Where:
/// ```text
/// d₁ = [ln(S/K) + (r + σ²/2)τ] / (σ√τ)
/// d₂ = d₁ - σ√τ
/// ```
pub fn bs_call_premium(s: f64, k: f64, r: f64, sigma: f64, tau: f64) -> f64 {
    let d1 = ((s / k).ln() + (r + 0.5 * sigma * sigma) * tau) / (sigma * tau.sqrt());
    let d2 = d1 - sigma * tau.sqrt();
    s * norm_cdf(d1) - k * (-r * tau).exp() * norm_cdf(d2)
}

/// Black-Scholes European put premium
///
/// # Formula
/// ```text
/// P(S,K,r,σ,τ) = K*e^(-rτ)*Φ(-d₂) - S*Φ(-d₁)
/// ```
pub fn bs_put_premium(s: f64, k: f64, r: f64, sigma: f64, tau: f64) -> f64 {
    let d1 = ((s / k).ln() + (r + 0.5 * sigma * sigma) * tau) / (sigma * tau.sqrt());
    let d2 = d1 - sigma * tau.sqrt();
    k * (-r * tau).exp() * norm_cdf(-d2) - s * norm_cdf(-d1)
}

/// Premium of a European option, rounded to cents.
///
/// # Parameters
/// - `kind`: call or put
/// - `spot`: current stock price, > 0
/// - `strike`: strike price, > 0
/// - `rate`: annualized risk-free rate, ≥ 0
/// - `sigma`: annualized volatility, > 0
/// - `tau`: time to maturity in years, > 0; the strategy engine always
///   computes this as a positive number of remaining trading days over 252,
///   so no internal clamping is performed here
pub fn premium(kind: OptionKind, spot: f64, strike: f64, rate: f64, sigma: f64, tau: f64) -> f64 {
    let raw = match kind {
        OptionKind::Call => bs_call_premium(spot, strike, rate, sigma, tau),
        OptionKind::Put => bs_put_premium(spot, strike, rate, sigma, tau),
    };
    round_to_cents(raw)
}
