use crate::models::analytics::{Gain, HoldingReport, PortfolioSummary};
use crate::models::holding::Holding;
use crate::models::ledger::PortfolioLedger;

/// Computes the table figures: per-holding change and valuation rows plus
/// portfolio totals and gains.
///
/// Values are exact; rounding for display is left to the caller.
pub struct AnalyticsService;

impl AnalyticsService {
    pub fn new() -> Self {
        Self
    }

    pub fn holding_report(&self, holding: &Holding) -> HoldingReport {
        let series = holding.series();
        HoldingReport {
            symbol: holding.symbol().to_string(),
            last: series.current(),
            change: holding.change(),
            change_pct: holding.change_pct(),
            low: series.min(),
            high: series.max(),
            average: series.mean(),
            quantity: holding.quantity(),
            market_value: holding.market_value(),
            average_cost: holding.average_cost(),
            total_cost: holding.cost(),
            gaining: holding.is_gaining(),
        }
    }

    pub fn get_portfolio_summary(&self, ledger: &PortfolioLedger) -> PortfolioSummary {
        let holdings = ledger
            .holdings()
            .iter()
            .map(|h| self.holding_report(h))
            .collect();

        let current_value = ledger.current_value();

        PortfolioSummary {
            holdings,
            initial_value: ledger.initial_value(),
            opening_value: ledger.opening_value(),
            current_value,
            daily_gain: Self::gain(ledger.daily_gain(), current_value),
            overall_gain: Self::gain(ledger.overall_gain(), current_value),
        }
    }

    /// Gains are expressed relative to the current value.
    fn gain(amount: f64, current_value: f64) -> Gain {
        let pct = if current_value != 0.0 {
            amount / current_value * 100.0
        } else {
            0.0
        };
        Gain { amount, pct }
    }
}

impl Default for AnalyticsService {
    fn default() -> Self {
        Self::new()
    }
}
