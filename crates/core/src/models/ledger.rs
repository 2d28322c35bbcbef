use serde::Serialize;

use super::holding::Holding;

/// All holdings of one run, in configuration order, plus the portfolio totals.
///
/// Totals are recomputed from the holdings on every call; the ledger holds
/// no running accumulators.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PortfolioLedger {
    holdings: Vec<Holding>,
}

impl PortfolioLedger {
    pub(crate) fn from_holdings(holdings: Vec<Holding>) -> Self {
        Self { holdings }
    }

    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    pub fn get(&self, symbol: &str) -> Option<&Holding> {
        self.holdings.iter().find(|h| h.symbol() == symbol)
    }

    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    /// Holdings flagged for chart output, in configuration order.
    pub fn graphed(&self) -> Vec<&Holding> {
        self.holdings.iter().filter(|h| h.is_graphed()).collect()
    }

    /// What the open positions cost: Σ quantity × average cost.
    pub fn initial_value(&self) -> f64 {
        self.holdings.iter().map(Holding::cost).sum()
    }

    /// Σ current price × quantity.
    pub fn current_value(&self) -> f64 {
        self.holdings.iter().map(Holding::market_value).sum()
    }

    /// Σ opening price × quantity.
    pub fn opening_value(&self) -> f64 {
        self.holdings.iter().map(Holding::opening_value).sum()
    }

    /// Value gained since the opening sample.
    pub fn daily_gain(&self) -> f64 {
        self.current_value() - self.opening_value()
    }

    /// Value gained over what was paid.
    pub fn overall_gain(&self) -> f64 {
        self.current_value() - self.initial_value()
    }
}
