// src/mc/results.rs
//! Result assembly
//!
//! Packages the price grid and the per-path trajectories and counters into
//! the final output structure. Pure passthrough: nothing in here computes
//! or re-derives a value the engine already produced.

use crate::output::TradeEvent;
use ndarray::Array2;

/// Scalar trade counters of one path, written only by the strategy engine
#[derive(Debug, Clone, PartialEq)]
pub struct PathCounters {
    pub missed_trades: u32,
    pub calls_opened: u32,
    pub calls_exercised: u32,
    pub puts_opened: u32,
    pub puts_exercised: u32,
    /// Capital committed from outside the strategy's own proceeds: the
    /// initial account balance plus every shortfall funded on assignment
    pub money_spent: f64,
}

impl PathCounters {
    pub fn new(initial_cash: f64) -> Self {
        PathCounters {
            missed_trades: 0,
            calls_opened: 0,
            calls_exercised: 0,
            puts_opened: 0,
            puts_exercised: 0,
            money_spent: initial_cash,
        }
    }
}

/// Everything one path execution produces
#[derive(Debug, Clone)]
pub struct PathOutcome {
    /// End-of-period account balance, one entry per period
    pub cash: Vec<f64>,
    /// End-of-period share count, one entry per period
    pub shares: Vec<i64>,
    pub counters: PathCounters,
    /// Buffered log events; empty when the sink is disabled
    pub events: Vec<TradeEvent>,
}

/// Final output of a simulation run
#[derive(Debug, Clone)]
pub struct SimulationOutput {
    /// Daily price grid, shape `(paths, periods * 21)`
    pub stock_prices: Array2<f64>,
    /// End-of-period account balance, shape `(paths, periods)`
    pub cash: Array2<f64>,
    /// End-of-period share count, shape `(paths, periods)`
    pub shares: Array2<i64>,
    pub missed_trades: Vec<u32>,
    pub calls_opened: Vec<u32>,
    pub calls_exercised: Vec<u32>,
    pub puts_opened: Vec<u32>,
    pub puts_exercised: Vec<u32>,
    pub money_spent: Vec<f64>,
}

/// Combine the price grid with the per-path outcomes.
///
/// Outcomes must be in path order and each must span the same number of
/// periods; the engine guarantees both.
pub fn assemble(stock_prices: Array2<f64>, outcomes: Vec<PathOutcome>) -> SimulationOutput {
    let paths = outcomes.len();
    let periods = outcomes.first().map_or(0, |o| o.cash.len());

    let mut cash = Array2::zeros((paths, periods));
    let mut shares = Array2::zeros((paths, periods));
    let mut missed_trades = Vec::with_capacity(paths);
    let mut calls_opened = Vec::with_capacity(paths);
    let mut calls_exercised = Vec::with_capacity(paths);
    let mut puts_opened = Vec::with_capacity(paths);
    let mut puts_exercised = Vec::with_capacity(paths);
    let mut money_spent = Vec::with_capacity(paths);

    for (i, outcome) in outcomes.into_iter().enumerate() {
        for (j, &value) in outcome.cash.iter().enumerate() {
            cash[[i, j]] = value;
        }
        for (j, &value) in outcome.shares.iter().enumerate() {
            shares[[i, j]] = value;
        }
        missed_trades.push(outcome.counters.missed_trades);
        calls_opened.push(outcome.counters.calls_opened);
        calls_exercised.push(outcome.counters.calls_exercised);
        puts_opened.push(outcome.counters.puts_opened);
        puts_exercised.push(outcome.counters.puts_exercised);
        money_spent.push(outcome.counters.money_spent);
    }

    SimulationOutput {
        stock_prices,
        cash,
        shares,
        missed_trades,
        calls_opened,
        calls_exercised,
        puts_opened,
        puts_exercised,
        money_spent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_is_a_passthrough() {
        let prices = Array2::from_elem((2, 42), 10.0);
        let outcomes = vec![
            PathOutcome {
                cash: vec![1.0, 2.0],
                shares: vec![0, 100],
                counters: PathCounters {
                    missed_trades: 1,
                    calls_opened: 0,
                    calls_exercised: 0,
                    puts_opened: 1,
                    puts_exercised: 1,
                    money_spent: 950.0,
                },
                events: Vec::new(),
            },
            PathOutcome {
                cash: vec![3.0, 4.0],
                shares: vec![100, 0],
                counters: PathCounters {
                    missed_trades: 0,
                    calls_opened: 1,
                    calls_exercised: 1,
                    puts_opened: 1,
                    puts_exercised: 0,
                    money_spent: 0.0,
                },
                events: Vec::new(),
            },
        ];

        let output = assemble(prices, outcomes);

        assert_eq!(output.cash[[0, 1]], 2.0);
        assert_eq!(output.cash[[1, 0]], 3.0);
        assert_eq!(output.shares[[0, 1]], 100);
        assert_eq!(output.missed_trades, vec![1, 0]);
        assert_eq!(output.calls_opened, vec![0, 1]);
        assert_eq!(output.puts_exercised, vec![1, 0]);
        assert_eq!(output.money_spent, vec![950.0, 0.0]);
    }
}
