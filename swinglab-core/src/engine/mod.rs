//! Backtesting engine: sequential long/flat replay of a signal sequence.
//!
//! Per bar i in 1..N:
//!
//! 1. Read the prior bar's signal
//! 2. Enter at the open if it was LONG and the account is flat
//! 3. Exit at the open if it was FLAT and shares are held
//! 4. Mark to market at the close

pub mod simulator;
pub mod state;

pub use simulator::{affordable_shares, run_backtest};
pub use state::{default_end_date, default_start_date, BacktestConfig, BacktestResult};
