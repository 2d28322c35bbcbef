use tracing::{debug, info, warn};

use crate::errors::CoreError;
use crate::models::holding::HoldingConfig;
use crate::models::price::MarketSnapshot;
use crate::providers::traits::MarketDataProvider;

/// Fetches prices for a whole portfolio in one batch.
pub struct MarketDataService {
    provider: Box<dyn MarketDataProvider>,
}

impl MarketDataService {
    pub fn new(provider: Box<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// One request for every configured symbol, deduplicated, in configuration order.
    pub async fn fetch_snapshot(
        &self,
        configs: &[HoldingConfig],
        period: &str,
        interval: &str,
    ) -> Result<MarketSnapshot, CoreError> {
        let mut symbols: Vec<String> = Vec::with_capacity(configs.len());
        for config in configs {
            if !symbols.contains(&config.symbol) {
                symbols.push(config.symbol.clone());
            }
        }

        if symbols.is_empty() {
            return Ok(MarketSnapshot::new());
        }

        info!(
            provider = self.provider.name(),
            symbols = symbols.len(),
            period,
            interval,
            "fetching market data"
        );
        let snapshot = self.provider.fetch(&symbols, period, interval).await?;

        let returned: Vec<&str> = snapshot.symbols().collect();
        for symbol in symbols.iter().filter(|s| !returned.contains(&s.as_str())) {
            warn!(symbol = %symbol, "provider returned no quotes");
        }
        debug!(symbols = ?returned, "market data received");

        Ok(snapshot)
    }
}
