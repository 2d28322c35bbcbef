use crate::errors::{CoreError, LotSide};
use crate::models::lot::Lot;

/// Reduces a holding's buy and sell lots to a net quantity and a single
/// weighted average cost.
///
/// Sells reduce the cost basis by their dollar amount rather than disposing
/// of specific earlier lots:
///
/// ```text
/// net = Σ buy.qty − Σ sell.qty
/// avg = (Σ buy.qty × buy.price − Σ sell.qty × sell.price) / net
/// ```
///
/// A fully closed position (`net == 0`) has no meaningful cost and yields
/// `(0, 0)`. Pure business logic — no I/O.
pub struct CostBasisService;

impl CostBasisService {
    pub fn new() -> Self {
        Self
    }

    /// Returns `(net_quantity, average_cost)`.
    pub fn compute_basis(&self, buys: &[Lot], sells: &[Lot]) -> Result<(f64, f64), CoreError> {
        let (buy_qty, buy_cost) = Self::totals(buys, LotSide::Buy)?;
        let (sell_qty, sell_cost) = Self::totals(sells, LotSide::Sell)?;

        let net = buy_qty - sell_qty;
        if net == 0.0 {
            return Ok((0.0, 0.0));
        }

        Ok((net, (buy_cost - sell_cost) / net))
    }

    /// Σ quantity and Σ quantity × price for one side, rejecting non-positive lots.
    fn totals(lots: &[Lot], side: LotSide) -> Result<(f64, f64), CoreError> {
        let mut quantity = 0.0;
        let mut cost = 0.0;

        for lot in lots {
            if !lot.quantity.is_finite() || lot.quantity <= 0.0 {
                return Err(CoreError::InvalidLot {
                    side,
                    quantity: lot.quantity,
                });
            }
            quantity += lot.quantity;
            cost += lot.value();
        }

        Ok((quantity, cost))
    }
}

impl Default for CostBasisService {
    fn default() -> Self {
        Self::new()
    }
}
