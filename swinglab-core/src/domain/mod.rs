//! Domain types for SwingLab

pub mod bar;
pub mod equity;
pub mod position;
pub mod signal;
pub mod trade;

pub use bar::{Bar, PriceSeries};
pub use equity::{DrawdownPoint, EquityPoint};
pub use position::Position;
pub use signal::{Signal, SignalRow, SignalSeries};
pub use trade::{TradeAction, TradeRecord};
