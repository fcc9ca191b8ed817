// src/output.rs
//! Trade-event log sink
//!
//! The strategy engine emits a stream of [`TradeEvent`]s per path. Sinks
//! receive each path's events in one batch, after the path has fully
//! settled, so concurrent paths never interleave in the output.
//!
//! Logging is a side channel: sink failures must never abort a simulation.
//! [`FileSink`] therefore swallows I/O errors after construction.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

/// One structured event in the life of a trading path
#[derive(Debug, Clone)]
pub enum TradeEvent {
    PathStart {
        path: usize,
    },
    PeriodStart {
        path: usize,
        period: usize,
        spot: f64,
    },
    CallWritten {
        path: usize,
        period: usize,
        spot: f64,
        days_to_maturity: usize,
        strike: f64,
        premium: f64,
        lot_basis: f64,
    },
    PutWritten {
        path: usize,
        period: usize,
        days_to_maturity: usize,
        strike: f64,
        premium: f64,
    },
    CallExercised {
        path: usize,
        period: usize,
        strike: f64,
        lot_basis: f64,
    },
    PutExercised {
        path: usize,
        period: usize,
        strike: f64,
        /// Cash the trader had to fund from outside capital to cover the
        /// assignment, if the account balance would otherwise go negative
        shortfall: Option<f64>,
    },
    MissedPeriod {
        path: usize,
        period: usize,
    },
    PeriodSummary {
        path: usize,
        period: usize,
        spot: f64,
        cash: f64,
        shares: i64,
        money_spent: f64,
    },
}

/// Destination for trade events.
///
/// A single operation: record one path's events. Implementations must be
/// callable from rayon worker threads.
pub trait EventSink: Sync {
    /// Whether the engine should bother collecting events at all.
    fn enabled(&self) -> bool {
        true
    }

    /// Record the full event stream of one settled path.
    fn record(&self, events: &[TradeEvent]);
}

/// Sink that discards everything; used when logging is off
pub struct NoopSink;

impl EventSink for NoopSink {
    fn enabled(&self) -> bool {
        false
    }

    fn record(&self, _events: &[TradeEvent]) {}
}

/// Append-only plain-text sink, opened once per simulation run
pub struct FileSink {
    writer: Mutex<BufWriter<File>>,
}

impl FileSink {
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "-------- WHEEL SIMULATION LOG --------")?;
        writeln!(writer, "Run started: {}", chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"))?;
        writeln!(writer)?;
        Ok(FileSink {
            writer: Mutex::new(writer),
        })
    }

    fn render(events: &[TradeEvent], out: &mut String) {
        use std::fmt::Write as _;

        for event in events {
            // write! to a String cannot fail
            let _ = match event {
                TradeEvent::PathStart { path } => {
                    writeln!(out, "TRADING PATH #{}", path)
                }
                TradeEvent::PeriodStart {
                    period, spot, ..
                } => {
                    writeln!(out, "   PERIOD #{}\n      Spot price at day 1: {:.2}", period, spot)
                }
                TradeEvent::CallWritten {
                    spot,
                    days_to_maturity,
                    strike,
                    premium,
                    lot_basis,
                    ..
                } => {
                    writeln!(
                        out,
                        "      ------\n      Covered call written\n         Spot price: {:.2}\n         Days to maturity: {}\n         Call strike: {:.2}\n         Call premium: {:.2}\n         Stock purchase price: {:.2}",
                        spot, days_to_maturity, strike, premium, lot_basis
                    )
                }
                TradeEvent::PutWritten {
                    days_to_maturity,
                    strike,
                    premium,
                    ..
                } => {
                    writeln!(
                        out,
                        "      ------\n      Cash-secured put written\n         Days to maturity: {}\n         Put strike: {:.2}\n         Put premium: {:.2}",
                        days_to_maturity, strike, premium
                    )
                }
                TradeEvent::CallExercised {
                    strike, lot_basis, ..
                } => {
                    writeln!(
                        out,
                        "      ------\n      Call exercised\n         Stock sale price: {:.2}\n         Stock purchase price: {:.2}",
                        strike, lot_basis
                    )
                }
                TradeEvent::PutExercised {
                    strike, shortfall, ..
                } => {
                    match shortfall {
                        Some(amount) => writeln!(
                            out,
                            "      ------\n      Put exercised\n         Stock purchase price: {:.2}\n         Money from pocket: {:.2}",
                            strike, amount
                        ),
                        None => writeln!(
                            out,
                            "      ------\n      Put exercised\n         Stock purchase price: {:.2}",
                            strike
                        ),
                    }
                }
                TradeEvent::MissedPeriod { .. } => {
                    writeln!(out, "      ------\n      No trade was opened")
                }
                TradeEvent::PeriodSummary {
                    spot,
                    cash,
                    shares,
                    money_spent,
                    ..
                } => {
                    writeln!(
                        out,
                        "      ------\n      Invested money: {:.2}\n      Money in account: {:.2}\n      Number of shares: {}\n      Total position (money+stock): {:.2}",
                        money_spent,
                        cash,
                        shares,
                        cash + *shares as f64 * spot
                    )
                }
            };
        }
    }
}

impl EventSink for FileSink {
    fn record(&self, events: &[TradeEvent]) {
        let mut rendered = String::new();
        Self::render(events, &mut rendered);

        // Best-effort: a poisoned lock or a full disk must not kill the run
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.write_all(rendered.as_bytes());
        }
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
