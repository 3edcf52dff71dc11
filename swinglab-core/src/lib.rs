//! SwingLab Core: price series, signal generators, simulator, summary.
//!
//! This crate contains the deterministic heart of a run:
//! - Domain types (bars, signals, positions, trades, equity points)
//! - Rolling-mean indicators with explicit warm-up
//! - Moving-average crossover and pullback-in-trend generators
//! - Long/flat simulator with next-bar-open execution
//! - Performance summary
//!
//! Nothing here touches the network, the filesystem, or the clock.

pub mod domain;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod metrics;
pub mod signals;

pub use domain::{
    Bar, DrawdownPoint, EquityPoint, Position, PriceSeries, Signal, SignalRow, SignalSeries,
    TradeAction, TradeRecord,
};
pub use engine::{run_backtest, BacktestConfig, BacktestResult};
pub use error::CoreError;
pub use metrics::{summarize, Summary};
pub use signals::{generate_signals, SignalGenerator, StrategyConfig, StrategyKind};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time checks: core types can cross thread boundaries, and the
/// generator trait takes no account state.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<Bar>();
        require_sync::<Bar>();
        require_send::<PriceSeries>();
        require_sync::<PriceSeries>();
        require_send::<SignalSeries>();
        require_sync::<SignalSeries>();
        require_send::<Position>();
        require_sync::<Position>();
        require_send::<TradeRecord>();
        require_sync::<TradeRecord>();
        require_send::<BacktestConfig>();
        require_sync::<BacktestConfig>();
        require_send::<BacktestResult>();
        require_sync::<BacktestResult>();
        require_send::<Summary>();
        require_sync::<Summary>();
        require_send::<CoreError>();
        require_sync::<CoreError>();
        require_send::<Box<dyn SignalGenerator>>();
        require_sync::<Box<dyn SignalGenerator>>();

        // Generators only ever see the price series, never account state.
        fn _generate(generator: &dyn SignalGenerator, series: &PriceSeries) -> SignalSeries {
            generator.generate(series)
        }
    }
}
