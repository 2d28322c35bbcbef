use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::price::MarketSnapshot;

/// Trait abstraction for market data sources.
///
/// A provider answers one batch request for every symbol of the portfolio,
/// so all holdings are valued from the same snapshot. Swapping the data
/// source means replacing only the implementation of this trait.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Fetch open prices for all `symbols` over `period` at `interval` spacing
    /// (e.g. period "1d", interval "1m").
    ///
    /// Symbols the source returned nothing for are absent from the snapshot.
    async fn fetch(
        &self,
        symbols: &[String],
        period: &str,
        interval: &str,
    ) -> Result<MarketSnapshot, CoreError>;
}
