use serde::{Deserialize, Serialize};

/// One table row: a holding's price statistics and valuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingReport {
    pub symbol: String,

    /// Most recent price
    pub last: f64,

    /// last − open
    pub change: f64,

    /// change / last × 100
    pub change_pct: f64,

    pub low: f64,
    pub high: f64,

    /// Mean of all samples in the period
    pub average: f64,

    /// Net quantity owned
    pub quantity: f64,

    /// last × quantity
    pub market_value: f64,

    /// Weighted average cost per unit
    pub average_cost: f64,

    /// quantity × average cost
    pub total_cost: f64,

    /// change >= 0
    pub gaining: bool,
}

/// A gain (or loss) over some timespan, with its share of current value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gain {
    pub amount: f64,

    /// amount / current value × 100 (0 when the portfolio is worth nothing)
    pub pct: f64,
}

impl Gain {
    pub fn is_positive(&self) -> bool {
        self.amount >= 0.0
    }
}

/// Summary of the whole portfolio for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    /// Per-holding rows, in configuration order
    pub holdings: Vec<HoldingReport>,

    /// Σ quantity × average cost
    pub initial_value: f64,

    /// Σ opening price × quantity
    pub opening_value: f64,

    /// Σ last price × quantity
    pub current_value: f64,

    /// current − opening
    pub daily_gain: Gain,

    /// current − initial
    pub overall_gain: Gain,
}
