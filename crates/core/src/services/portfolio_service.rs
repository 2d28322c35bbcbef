use std::collections::HashSet;

use tracing::{debug, info_span};

use crate::errors::CoreError;
use crate::models::color::{Rgb, DEFAULT_PALETTE};
use crate::models::holding::{Holding, HoldingConfig};
use crate::models::ledger::PortfolioLedger;
use crate::models::price::{MarketSnapshot, PriceSeries};
use crate::services::color_service::ColorService;
use crate::services::cost_basis_service::CostBasisService;

/// Builds the portfolio ledger from configuration and fetched prices.
///
/// Pure business logic — the snapshot is fetched beforehand.
pub struct PortfolioService {
    cost_basis_service: CostBasisService,
    color_service: ColorService,
    palette: Vec<Rgb>,
}

impl PortfolioService {
    pub fn new() -> Self {
        Self::with_colors(ColorService::new(), DEFAULT_PALETTE.to_vec())
    }

    /// Use a specific color resolver and auto-assignment palette.
    pub fn with_colors(color_service: ColorService, palette: Vec<Rgb>) -> Self {
        Self {
            cost_basis_service: CostBasisService::new(),
            color_service,
            palette,
        }
    }

    /// Construct one holding per configured stock, in configuration order.
    ///
    /// All-or-nothing: a bad lot, a fatal color, a duplicate symbol or a
    /// symbol the snapshot has no samples for aborts the whole population.
    pub fn populate(
        &self,
        snapshot: &MarketSnapshot,
        configs: &[HoldingConfig],
    ) -> Result<PortfolioLedger, CoreError> {
        if configs.is_empty() {
            return Err(CoreError::EmptyPortfolio);
        }

        let mut seen = HashSet::new();
        let mut holdings = Vec::with_capacity(configs.len());

        for (index, config) in configs.iter().enumerate() {
            let _span = info_span!("holding", symbol = %config.symbol).entered();

            if !seen.insert(config.symbol.as_str()) {
                return Err(CoreError::Config(format!(
                    "{} is listed more than once",
                    config.symbol
                )));
            }

            holdings.push(self.build_holding(snapshot, config, index)?);
        }

        debug!(holdings = holdings.len(), "portfolio populated");
        Ok(PortfolioLedger::from_holdings(holdings))
    }

    fn build_holding(
        &self,
        snapshot: &MarketSnapshot,
        config: &HoldingConfig,
        index: usize,
    ) -> Result<Holding, CoreError> {
        let samples = snapshot.samples(&config.symbol).ok_or_else(|| {
            CoreError::MissingData(format!("no samples returned for {}", config.symbol))
        })?;
        let series = PriceSeries::new(config.symbol.clone(), samples.to_vec())?;

        let (quantity, average_cost) = self
            .cost_basis_service
            .compute_basis(&config.buy, &config.sell)?;

        let color = self
            .color_service
            .resolve(config.color.as_deref(), index, &self.palette)?;

        Ok(Holding::new(
            series,
            quantity,
            average_cost,
            config.color.clone(),
            color,
            config.graph,
        ))
    }
}

impl Default for PortfolioService {
    fn default() -> Self {
        Self::new()
    }
}
