// src/mc/wheel_engine.rs
//! The Wheel strategy engine
//!
//! One independent execution per price path; paths never interact. Within a
//! path, trading periods of 21 days are processed strictly in order, and
//! each runs the same decision sequence:
//!
//! 1. Carry the account balance and share count forward from the previous
//!    period.
//! 2. While the path holds share lots, scan the period's days for covered
//!    calls. A call strike 'call_strike_factor' away from spot is assigned
//!    to a lot only when strike plus premium beats the lot's basis, so the
//!    exit can never lose against the acquisition cost. An optional
//!    deadline bounds the scan; past it, a fallback cash-secured put may be
//!    written instead.
//! 3. While flat (or on the fallback), write a cash-secured put
//!    'put_strike_factor' below spot, unless the strike falls below the
//!    configured minimum price.
//! 4. At the period's last day, settle: in-the-money calls sell their lot
//!    at strike; an in-the-money put assigns a new lot at strike. A
//!    negative balance after assignment is funded from outside capital and
//!    clamped to zero, with the deficit accumulated in `money_spent`.
//! 5. A period in which neither a call nor a put was accepted counts as a
//!    missed trade.
//!
//! Premiums come from [`crate::analytics::premium`] and are floored at the
//! minimum tradable premium of 0.01 here, at the strategy level. Maturities
//! are always a positive number of remaining trading days over 252, so the
//! pricer's `tau > 0` precondition holds by construction.

use crate::analytics::premium::{premium, OptionKind};
use crate::error::{validation::*, WheelError, WheelResult};
use crate::math_utils::round_to_cents;
use crate::mc::path_gen;
use crate::mc::results::{assemble, PathCounters, PathOutcome, SimulationOutput};
use crate::output::{EventSink, FileSink, NoopSink, TradeEvent};
use crate::rng::RngFactory;
use bitflags::bitflags;
use ndarray::{Array2, ArrayView1};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};

/// Trading days per period (one calendar month)
pub const DAYS_PER_PERIOD: usize = 21;
/// Trading days per year, the annualization basis for maturities
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;
/// Log file written by [`run_wheel_simulation`] when `save_log` is set
pub const LOG_FILE: &str = "wheel_log.dat";

/// Smallest premium the strategy is willing to trade
const MIN_PREMIUM: f64 = 0.01;

bitflags! {
    /// Transient per-period state of one path
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct PeriodFlags: u32 {
        /// At least one covered call was accepted this period
        const CALL_WRITTEN = 1 << 0;
        /// A cash-secured put was written this period
        const PUT_WRITTEN  = 1 << 1;
        /// The call deadline passed with no call; write a put instead
        const FALLBACK_PUT = 1 << 2;
    }
}

/// A block of shares acquired through put assignment
#[derive(Debug, Clone)]
struct Lot {
    /// Acquisition price per share: the put strike at assignment
    basis: f64,
    /// Shares in the lot; always one contract's worth
    shares: u32,
    /// Covered-call strike assigned this period, cleared at period start
    strike: Option<f64>,
}

/// Wheel simulation parameters.
///
/// All annualized quantities (`sigma`, `r`) are rescaled internally to the
/// simulation horizon by the path generator and to per-option maturities by
/// the engine. Strike factors are unconstrained in sign: positive writes
/// out-of-the-money, negative in-the-money.
#[derive(Clone)]
pub struct WheelConfig {
    /// Shares per option contract
    pub contract_size: u32,
    /// Independent trading paths to simulate
    pub paths: usize,
    /// Trading periods (months) per path
    pub periods: usize,
    /// Initial price per share
    pub s0: f64,
    /// Capital in the account before any transaction
    pub initial_cash: f64,
    /// Fraction of `s0` below which no puts are written, in [0, 1)
    pub min_price_factor: f64,
    /// Annualized volatility
    pub sigma: f64,
    /// Annualized risk-free rate
    pub r: f64,
    /// Call strike offset from spot (positive ⇒ OTM)
    pub call_strike_factor: f64,
    /// Put strike offset from spot (positive ⇒ OTM)
    pub put_strike_factor: f64,
    /// Last day of a period on which calls may still be written;
    /// 0 or anything beyond 21 means "through the period's end"
    pub calls_deadline: usize,
    /// Write a fallback put when the deadline passes with no call accepted
    pub write_puts_if_no_calls: bool,
    /// Write the plain-text trade log
    pub save_log: bool,
    /// Base seed for the per-path random sub-streams
    pub seed: u64,
}

impl WheelConfig {
    /// Validate the configuration; a violation means the simulation never
    /// starts.
    pub fn validate(&self) -> WheelResult<()> {
        validate_contract_size(self.contract_size)?;
        validate_paths(self.paths)?;
        validate_periods(self.periods)?;
        validate_positive("s0", self.s0)?;
        validate_non_negative("initial_cash", self.initial_cash)?;
        validate_unit_fraction("min_price_factor", self.min_price_factor)?;
        validate_positive("sigma", self.sigma)?;
        validate_non_negative("r", self.r)?;
        validate_finite("call_strike_factor", self.call_strike_factor)?;
        validate_finite("put_strike_factor", self.put_strike_factor)?;
        Ok(())
    }

    fn effective_deadline(&self) -> usize {
        if self.calls_deadline < 1 || self.calls_deadline > DAYS_PER_PERIOD {
            DAYS_PER_PERIOD
        } else {
            self.calls_deadline
        }
    }

    fn minimum_put_strike(&self) -> f64 {
        (self.s0 * self.min_price_factor).max(0.01)
    }
}

impl Default for WheelConfig {
    fn default() -> Self {
        WheelConfig {
            contract_size: 100,
            paths: 100_000,
            periods: 120,
            s0: 100.0,
            initial_cash: 0.0,
            min_price_factor: 0.0,
            sigma: 0.2,
            r: 0.01,
            call_strike_factor: 0.05,
            put_strike_factor: 0.05,
            calls_deadline: 0,
            write_puts_if_no_calls: false,
            save_log: false,
            seed: 12345,
        }
    }
}

/// Run the full simulation: validate, generate the price grid, simulate
/// every path, and assemble the output.
///
/// The log sink is chosen from `save_log`: a [`FileSink`] appending to
/// [`LOG_FILE`], or [`NoopSink`]. Logging is best-effort: if the log file
/// cannot be created the run proceeds without it.
pub fn run_wheel_simulation(cfg: &WheelConfig) -> WheelResult<SimulationOutput> {
    cfg.validate()?;

    let factory = RngFactory::new(cfg.seed);
    let prices = path_gen::generate_price_grid(cfg, &factory)?;

    if cfg.save_log {
        match FileSink::create(LOG_FILE) {
            Ok(sink) => simulate_paths(cfg, prices, &sink),
            Err(_) => simulate_paths(cfg, prices, &NoopSink),
        }
    } else {
        simulate_paths(cfg, prices, &NoopSink)
    }
}

/// Simulate every path of `prices` against the configuration.
///
/// The grid shape must be `(paths, periods * 21)`. Paths are fanned out
/// with rayon; each produces its trajectory and counters independently and
/// hands its buffered events to the sink in one batch.
pub fn simulate_paths(
    cfg: &WheelConfig,
    prices: Array2<f64>,
    sink: &dyn EventSink,
) -> WheelResult<SimulationOutput> {
    simulate_inner(cfg, prices, sink, None)
}

/// Like [`simulate_paths`], with a cooperative cancellation flag.
///
/// The flag is checked between paths, never mid-path: a path's settlement
/// chain completes atomically so its counters stay consistent. When the
/// flag is raised the call returns [`WheelError::Cancelled`].
pub fn simulate_paths_cancellable(
    cfg: &WheelConfig,
    prices: Array2<f64>,
    sink: &dyn EventSink,
    cancel: &AtomicBool,
) -> WheelResult<SimulationOutput> {
    simulate_inner(cfg, prices, sink, Some(cancel))
}

fn simulate_inner(
    cfg: &WheelConfig,
    prices: Array2<f64>,
    sink: &dyn EventSink,
    cancel: Option<&AtomicBool>,
) -> WheelResult<SimulationOutput> {
    cfg.validate()?;

    let expected = (cfg.paths, cfg.periods * DAYS_PER_PERIOD);
    if prices.dim() != expected {
        return Err(WheelError::PriceGridMismatch {
            expected,
            actual: prices.dim(),
        });
    }

    let collect_events = sink.enabled();
    let outcomes: Vec<Option<PathOutcome>> = (0..cfg.paths)
        .into_par_iter()
        .map(|path| {
            if let Some(flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    return None;
                }
            }
            let outcome = simulate_single_path(cfg, prices.row(path), path, collect_events);
            if collect_events {
                sink.record(&outcome.events);
            }
            Some(outcome)
        })
        .collect();

    let completed = outcomes.iter().flatten().count();
    if completed < cfg.paths {
        return Err(WheelError::Cancelled {
            completed_paths: completed,
        });
    }

    Ok(assemble(prices, outcomes.into_iter().flatten().collect()))
}

fn simulate_single_path(
    cfg: &WheelConfig,
    prices: ArrayView1<'_, f64>,
    path: usize,
    collect_events: bool,
) -> PathOutcome {
    let deadline = cfg.effective_deadline();
    let min_put_strike = cfg.minimum_put_strike();
    let contract = cfg.contract_size as f64;

    let mut cash_by_period = vec![0.0; cfg.periods];
    let mut shares_by_period = vec![0i64; cfg.periods];
    let mut counters = PathCounters::new(cfg.initial_cash);
    let mut lots: Vec<Lot> = Vec::new();
    let mut events = Vec::new();

    let mut cash = cfg.initial_cash;
    let mut shares: i64 = 0;

    if collect_events {
        events.push(TradeEvent::PathStart { path });
    }

    for period in 0..cfg.periods {
        let day_1 = period * DAYS_PER_PERIOD;
        let maturity_day = day_1 + DAYS_PER_PERIOD - 1;
        let mut flags = PeriodFlags::empty();
        let mut put_strike = 0.0;

        if collect_events {
            events.push(TradeEvent::PeriodStart {
                path,
                period,
                spot: prices[day_1],
            });
        }

        // Strikes assigned in earlier periods expired unexercised
        for lot in &mut lots {
            lot.strike = None;
        }

        if !lots.is_empty() {
            for day in day_1..maturity_day {
                if lots.iter().all(|lot| lot.strike.is_some()) {
                    break;
                }
                if day - day_1 == deadline {
                    if cfg.write_puts_if_no_calls && !flags.contains(PeriodFlags::CALL_WRITTEN) {
                        flags |= PeriodFlags::FALLBACK_PUT;
                    }
                    break;
                }

                let spot = prices[day];
                let strike = round_to_cents(spot * (1.0 + cfg.call_strike_factor));
                let days_to_maturity = maturity_day - day;
                let tau = days_to_maturity as f64 / TRADING_DAYS_PER_YEAR;
                let prem =
                    premium(OptionKind::Call, spot, strike, cfg.r, cfg.sigma, tau).max(MIN_PREMIUM);

                for lot in lots.iter_mut().filter(|lot| lot.strike.is_none()) {
                    // Accept only when strike plus premium beats the lot's
                    // basis: the exit then cannot lose against the lot
                    if strike + prem > lot.basis {
                        lot.strike = Some(strike);
                        cash += prem * contract;
                        counters.calls_opened += 1;
                        flags |= PeriodFlags::CALL_WRITTEN;
                        if collect_events {
                            events.push(TradeEvent::CallWritten {
                                path,
                                period,
                                spot,
                                days_to_maturity,
                                strike,
                                premium: prem,
                                lot_basis: lot.basis,
                            });
                        }
                    }
                }
            }
        }

        if lots.is_empty() || flags.contains(PeriodFlags::FALLBACK_PUT) {
            let put_day = if flags.contains(PeriodFlags::FALLBACK_PUT) {
                day_1 + deadline - 1
            } else {
                day_1
            };
            let spot = prices[put_day];
            let days_to_maturity = maturity_day - put_day;
            let tau = days_to_maturity as f64 / TRADING_DAYS_PER_YEAR;
            let strike = round_to_cents(spot * (1.0 - cfg.put_strike_factor));

            if strike >= min_put_strike {
                let prem =
                    premium(OptionKind::Put, spot, strike, cfg.r, cfg.sigma, tau).max(MIN_PREMIUM);
                cash += prem * contract;
                counters.puts_opened += 1;
                put_strike = strike;
                flags |= PeriodFlags::PUT_WRITTEN;
                if collect_events {
                    events.push(TradeEvent::PutWritten {
                        path,
                        period,
                        days_to_maturity,
                        strike,
                        premium: prem,
                    });
                }
            }
        }

        let spot_m = prices[maturity_day];

        if flags.contains(PeriodFlags::CALL_WRITTEN) {
            lots.retain(|lot| match lot.strike {
                Some(strike) if strike <= spot_m => {
                    cash += strike * contract;
                    shares -= lot.shares as i64;
                    counters.calls_exercised += 1;
                    if collect_events {
                        events.push(TradeEvent::CallExercised {
                            path,
                            period,
                            strike,
                            lot_basis: lot.basis,
                        });
                    }
                    false
                }
                _ => true,
            });
        }

        if flags.contains(PeriodFlags::PUT_WRITTEN) && put_strike >= spot_m {
            cash -= put_strike * contract;
            shares += cfg.contract_size as i64;
            counters.puts_exercised += 1;
            lots.push(Lot {
                basis: put_strike,
                shares: cfg.contract_size,
                strike: None,
            });

            // A negative balance is funded from outside capital rather
            // than carried as debt
            let shortfall = if cash < 0.0 {
                let deficit = -cash;
                counters.money_spent += deficit;
                cash = 0.0;
                Some(deficit)
            } else {
                None
            };
            if collect_events {
                events.push(TradeEvent::PutExercised {
                    path,
                    period,
                    strike: put_strike,
                    shortfall,
                });
            }
        }

        if !flags.intersects(PeriodFlags::CALL_WRITTEN | PeriodFlags::PUT_WRITTEN) {
            counters.missed_trades += 1;
            if collect_events {
                events.push(TradeEvent::MissedPeriod { path, period });
            }
        }

        cash_by_period[period] = cash;
        shares_by_period[period] = shares;

        if collect_events {
            events.push(TradeEvent::PeriodSummary {
                path,
                period,
                spot: spot_m,
                cash,
                shares,
                money_spent: counters.money_spent,
            });
        }
    }

    PathOutcome {
        cash: cash_by_period,
        shares: shares_by_period,
        counters,
        events,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_deadline_normalization() {
        let mut cfg = WheelConfig::default();

        cfg.calls_deadline = 0;
        assert_eq!(cfg.effective_deadline(), DAYS_PER_PERIOD);
        cfg.calls_deadline = 22;
        assert_eq!(cfg.effective_deadline(), DAYS_PER_PERIOD);
        cfg.calls_deadline = 7;
        assert_eq!(cfg.effective_deadline(), 7);
        cfg.calls_deadline = 21;
        assert_eq!(cfg.effective_deadline(), 21);
    }

    #[test]
    fn test_minimum_put_strike_floor() {
        let mut cfg = WheelConfig::default();

        cfg.s0 = 100.0;
        cfg.min_price_factor = 0.0;
        assert_eq!(cfg.minimum_put_strike(), 0.01);
        cfg.min_price_factor = 0.5;
        assert_eq!(cfg.minimum_put_strike(), 50.0);
    }

    #[test]
    fn test_validate_rejects_out_of_range_fields() {
        let valid = WheelConfig::default();
        assert!(valid.validate().is_ok());

        let mut cfg = valid.clone();
        cfg.contract_size = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = valid.clone();
        cfg.paths = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = valid.clone();
        cfg.s0 = -1.0;
        assert!(cfg.validate().is_err());

        let mut cfg = valid.clone();
        cfg.initial_cash = -100.0;
        assert!(cfg.validate().is_err());

        let mut cfg = valid.clone();
        cfg.min_price_factor = 1.0;
        assert!(cfg.validate().is_err());

        let mut cfg = valid.clone();
        cfg.sigma = 0.0;
        assert!(cfg.validate().is_err());

        let mut cfg = valid.clone();
        cfg.call_strike_factor = f64::NAN;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_defaults_match_documented_values() {
        let cfg = WheelConfig::default();
        assert_eq!(cfg.contract_size, 100);
        assert_eq!(cfg.paths, 100_000);
        assert_eq!(cfg.periods, 120);
        assert_eq!(cfg.s0, 100.0);
        assert_eq!(cfg.sigma, 0.2);
        assert_eq!(cfg.r, 0.01);
        assert_eq!(cfg.calls_deadline, 0);
        assert!(!cfg.write_puts_if_no_calls);
        assert!(!cfg.save_log);
    }
}
