// src/mc/path_gen.rs
//! Synthetic price-path generation
//!
//! Produces the full `(paths, periods * 21)` grid of daily prices consumed
//! by the strategy engine. Each row is a discretized geometric Brownian
//! motion sampled with the exact log-normal transition, pinned to the
//! initial price at day 0 and quoted in cents.
//!
//! # Horizon rescaling
//!
//! The configured rate and volatility are annualized. With `T = periods*21`
//! trading days and one period per month, the grid is generated under the
//! horizon-rescaled parameters:
//!
//! ```text
//! μ_h = r/12 · periods          σ_h = σ · √(T/252)          dt = 1/T
//! ```
//!
//! # Reproducibility
//!
//! Row `i` draws from the sub-stream `seed + i` (see [`crate::rng`]), so a
//! given `(seed, paths, periods)` always yields the same grid no matter how
//! many rayon threads generate it. The generator never reseeds on its own:
//! reproducibility is entirely the caller's choice of seed.

use crate::error::WheelResult;
use crate::math_utils::round_to_cents;
use crate::mc::wheel_engine::{WheelConfig, DAYS_PER_PERIOD, TRADING_DAYS_PER_YEAR};
use crate::models::gbm::Gbm;
use crate::rng::{self, RngFactory};
use ndarray::parallel::prelude::*;
use ndarray::{Array2, Axis};

/// Generate the price grid for a validated configuration.
pub fn generate_price_grid(cfg: &WheelConfig, factory: &RngFactory) -> WheelResult<Array2<f64>> {
    cfg.validate()?;

    let total_days = cfg.periods * DAYS_PER_PERIOD;
    let dt = 1.0 / total_days as f64;
    let mu_h = cfg.r / 12.0 * cfg.periods as f64;
    let sigma_h = cfg.sigma * (total_days as f64 / TRADING_DAYS_PER_YEAR).sqrt();
    let gbm = Gbm::new(cfg.s0, mu_h, sigma_h);

    let mut grid = Array2::<f64>::zeros((cfg.paths, total_days));
    grid.axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(i, mut row)| {
            let mut rng = factory.create_std_rng(i as u64);
            let mut log_price = gbm.s0.ln();
            row[0] = round_to_cents(log_price.exp());
            for d in 1..total_days {
                let z = rng::get_normal_draw(&mut rng);
                log_price += gbm.log_increment(dt, z);
                row[d] = round_to_cents(log_price.exp());
            }
        });

    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> WheelConfig {
        WheelConfig {
            paths: 8,
            periods: 3,
            s0: 25.0,
            seed: 7,
            ..Default::default()
        }
    }

    #[test]
    fn test_grid_shape_and_day_zero_pin() {
        let cfg = small_config();
        let factory = RngFactory::new(cfg.seed);
        let grid = generate_price_grid(&cfg, &factory).expect("valid configuration");

        assert_eq!(grid.dim(), (8, 3 * DAYS_PER_PERIOD));
        for row in grid.rows() {
            assert_eq!(row[0], 25.0);
        }
    }

    #[test]
    fn test_prices_positive_and_cent_quoted() {
        let cfg = small_config();
        let factory = RngFactory::new(cfg.seed);
        let grid = generate_price_grid(&cfg, &factory).expect("valid configuration");

        for &price in grid.iter() {
            assert!(price > 0.0);
            let cents = price * 100.0;
            assert!((cents - cents.round()).abs() < 1e-9, "not cent-quoted: {}", price);
        }
    }

    #[test]
    fn test_same_seed_same_grid() {
        let cfg = small_config();
        let grid_a = generate_price_grid(&cfg, &RngFactory::new(cfg.seed)).expect("valid");
        let grid_b = generate_price_grid(&cfg, &RngFactory::new(cfg.seed)).expect("valid");
        assert_eq!(grid_a, grid_b);

        let grid_c = generate_price_grid(&cfg, &RngFactory::new(cfg.seed + 1)).expect("valid");
        assert_ne!(grid_a, grid_c);
    }
}
