// src/models/gbm.rs
use std::f64;

/// Geometric Brownian motion with constant drift and volatility.
///
/// The wheel price grid works on the horizon-rescaled parameterization:
/// the generator constructs a `Gbm` whose `mu` and `sigma` are already
/// scaled to the full simulation horizon and steps it with `dt = 1/T`.
pub struct Gbm {
    pub s0: f64,
    pub mu: f64,
    pub sigma: f64,
}

impl Gbm {
    pub fn new(s0: f64, mu: f64, sigma: f64) -> Self {
        Gbm { s0, mu, sigma }
    }

    /// One log-price increment over `dt` given a standard normal draw.
    ///
    /// ```text
    /// Δln(S) = (μ - σ²/2)·dt + σ·√dt·Z
    /// ```
    pub fn log_increment(&self, dt: f64, normal_draw: f64) -> f64 {
        (self.mu - 0.5 * self.sigma * self.sigma) * dt + self.sigma * dt.sqrt() * normal_draw
    }

    /// Exact one-step transition of the price level.
    pub fn exact_step(&self, s_t: f64, dt: f64, normal_draw: f64) -> f64 {
        s_t * self.log_increment(dt, normal_draw).exp()
    }
}
