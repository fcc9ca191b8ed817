//! # wheel-mc: Monte Carlo Simulation of the Wheel Strategy
//!
//! A Rust library for Monte Carlo simulation of the "Wheel" options trading
//! strategy: writing covered calls against owned shares and cash-secured
//! puts while flat, period after period, over synthetic price paths.
//!
//! ## Key Features
//!
//! - **High Performance**: Parallel path simulation with Rayon
//! - **Deterministic**: Per-path random sub-streams, so one seed gives one
//!   result regardless of thread count
//! - **Complete Accounting**: Per-period cash and share trajectories plus
//!   per-path trade counters (missed trades, opened/exercised calls and
//!   puts, outside capital committed)
//! - **Structured Trade Log**: Optional per-path event log through an
//!   injected sink
//!
//! ## Quick Start
//!
//! ```rust
//! use wheel_mc::mc::wheel_engine::{run_wheel_simulation, WheelConfig};
//!
//! let cfg = WheelConfig {
//!     paths: 1_000,
//!     periods: 12,
//!     s0: 100.0,       // Initial share price
//!     sigma: 0.2,      // Annualized volatility
//!     r: 0.01,         // Annualized risk-free rate
//!     seed: 42,
//!     ..Default::default()
//! };
//!
//! let output = run_wheel_simulation(&cfg).expect("Valid configuration");
//! let total_missed: u32 = output.missed_trades.iter().sum();
//! println!("Missed trades across all paths: {}", total_missed);
//! ```
//!
//! ## How a Path Runs
//!
//! Prices follow a discretized geometric Brownian motion, generated for the
//! whole horizon up front. Each path then walks its periods: write covered
//! calls against held lots (only when strike plus premium beats the lot's
//! basis), fall back to or start with cash-secured puts, and settle
//! in-the-money options at each period's end. Premiums come from the
//! Black-Scholes closed form.

// Module declarations
pub mod analytics;
pub mod error;
pub mod math_utils;
pub mod mc;
pub mod models;
pub mod output;
pub mod rng;

// Re-export commonly used types for convenience
pub use error::{WheelError, WheelResult};
pub use mc::results::SimulationOutput;
pub use mc::wheel_engine::{run_wheel_simulation, WheelConfig};
