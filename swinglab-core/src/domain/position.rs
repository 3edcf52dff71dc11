use serde::{Deserialize, Serialize};

/// Account state of a single long/flat run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub shares_held: u64,
    pub cash: f64,
    /// Cash spent to open the current position; zero while flat.
    pub entry_cost_basis: f64,
}

impl Position {
    pub fn flat(cash: f64) -> Self {
        Self {
            shares_held: 0,
            cash,
            entry_cost_basis: 0.0,
        }
    }

    pub fn is_flat(&self) -> bool {
        self.shares_held == 0
    }

    pub fn market_value(&self, price: f64) -> f64 {
        self.shares_held as f64 * price
    }

    /// Cash plus the position marked at `price`.
    pub fn equity(&self, price: f64) -> f64 {
        self.cash + self.market_value(price)
    }

    /// Open a position of `shares` at the cost-adjusted `price`.
    pub(crate) fn open(&mut self, shares: u64, price: f64) {
        let spend = shares as f64 * price;
        self.cash -= spend;
        self.shares_held = shares;
        self.entry_cost_basis = spend;
    }

    /// Close the whole position at the cost-adjusted `price`, returning the
    /// realized profit against the entry cost basis.
    pub(crate) fn close(&mut self, price: f64) -> f64 {
        let proceeds = self.shares_held as f64 * price;
        self.cash += proceeds;
        let profit = proceeds - self.entry_cost_basis;
        self.shares_held = 0;
        self.entry_cost_basis = 0.0;
        profit
    }
}
