use async_trait::async_trait;
use chrono::DateTime;
use futures::future::try_join_all;
use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::models::price::{MarketSnapshot, PricePoint};
use super::traits::MarketDataProvider;

/// Yahoo Finance market data provider.
///
/// - **Free**: No API key required.
/// - **Coverage**: Global equities, ETFs, indices, mutual funds.
/// - **Data**: Intraday and daily OHLCV via the chart endpoint.
///
/// The chart endpoint serves one symbol per request, so a batch is issued
/// as concurrent requests that are joined and aligned into one snapshot.
pub struct YahooFinanceProvider {
    connector: yahoo_finance_api::YahooConnector,
}

impl YahooFinanceProvider {
    pub fn new() -> Result<Self, CoreError> {
        let connector = yahoo_finance_api::YahooConnector::new().map_err(|e| CoreError::Api {
            provider: "Yahoo Finance".into(),
            message: format!("Failed to create connector: {e}"),
        })?;
        Ok(Self { connector })
    }

    async fn fetch_symbol(
        &self,
        symbol: &str,
        period: &str,
        interval: &str,
    ) -> Result<(String, Vec<PricePoint>), CoreError> {
        let resp = self
            .connector
            .get_quote_range(symbol, interval, period)
            .await
            .map_err(|e| CoreError::Api {
                provider: "Yahoo Finance".into(),
                message: format!("Failed to fetch {period}/{interval} quotes for {symbol}: {e}"),
            })?;

        let quotes = match resp.quotes() {
            Ok(quotes) => quotes,
            Err(e) => {
                // An empty chart is reported as a parse failure; treat it as no data.
                warn!(symbol, error = %e, "no quotes returned");
                Vec::new()
            }
        };

        let points: Vec<PricePoint> = quotes
            .iter()
            .filter_map(|q| {
                DateTime::from_timestamp(q.timestamp, 0).map(|timestamp| PricePoint {
                    timestamp,
                    price: q.open,
                })
            })
            .collect();

        debug!(symbol, samples = points.len(), "fetched quotes");
        Ok((symbol.to_string(), points))
    }
}

#[async_trait]
impl MarketDataProvider for YahooFinanceProvider {
    fn name(&self) -> &str {
        "Yahoo Finance"
    }

    async fn fetch(
        &self,
        symbols: &[String],
        period: &str,
        interval: &str,
    ) -> Result<MarketSnapshot, CoreError> {
        let requests = symbols
            .iter()
            .map(|symbol| self.fetch_symbol(symbol, period, interval));
        let per_symbol = try_join_all(requests).await?;

        Ok(MarketSnapshot::align(per_symbol))
    }
}
