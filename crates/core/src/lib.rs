pub mod config;
pub mod errors;
pub mod models;
pub mod providers;
pub mod services;

use models::{
    analytics::PortfolioSummary, chart::Chart, color::DEFAULT_PALETTE, holding::HoldingConfig,
    ledger::PortfolioLedger, settings::Settings,
};
use providers::{traits::MarketDataProvider, yahoo_finance::YahooFinanceProvider};
use services::{
    analytics_service::AnalyticsService,
    chart_service::{ChartOptions, ChartService},
    color_service::ColorService,
    market_data_service::MarketDataService,
    portfolio_service::PortfolioService,
};

use errors::CoreError;

/// Main entry point for the Stock Tracker core library.
/// Holds the run settings and all services needed for one snapshot run:
/// fetch → populate → summarize → chart.
#[must_use]
pub struct StockTracker {
    settings: Settings,
    market_data_service: MarketDataService,
    portfolio_service: PortfolioService,
    analytics_service: AnalyticsService,
    chart_service: ChartService,
}

impl std::fmt::Debug for StockTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StockTracker")
            .field("settings", &self.settings)
            .field("provider", &self.market_data_service.provider_name())
            .finish()
    }
}

impl StockTracker {
    /// Tracker backed by Yahoo Finance.
    pub fn new(settings: Settings) -> Result<Self, CoreError> {
        let provider = YahooFinanceProvider::new()?;
        Self::with_provider(settings, Box::new(provider))
    }

    /// Tracker backed by any market data provider.
    pub fn with_provider(
        settings: Settings,
        provider: Box<dyn MarketDataProvider>,
    ) -> Result<Self, CoreError> {
        settings.validate()?;

        let color_service = if settings.strict_colors {
            ColorService::strict()
        } else {
            ColorService::new()
        };

        Ok(Self {
            settings,
            market_data_service: MarketDataService::new(provider),
            portfolio_service: PortfolioService::with_colors(
                color_service,
                DEFAULT_PALETTE.to_vec(),
            ),
            analytics_service: AnalyticsService::new(),
            chart_service: ChartService::new(),
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Fetch every configured symbol in one batch and build the ledger.
    pub async fn build_ledger(
        &self,
        configs: &[HoldingConfig],
    ) -> Result<PortfolioLedger, CoreError> {
        if configs.is_empty() {
            return Err(CoreError::EmptyPortfolio);
        }

        let snapshot = self
            .market_data_service
            .fetch_snapshot(configs, &self.settings.period, &self.settings.interval)
            .await?;

        self.portfolio_service.populate(&snapshot, configs)
    }

    /// Table figures and totals for a populated ledger.
    #[must_use]
    pub fn summary(&self, ledger: &PortfolioLedger) -> PortfolioSummary {
        self.analytics_service.get_portfolio_summary(ledger)
    }

    /// Charts for the graph-flagged holdings, laid out per the configured graph mode.
    /// Empty when nothing is flagged.
    pub fn charts<'a>(&self, ledger: &'a PortfolioLedger) -> Result<Vec<Chart<'a>>, CoreError> {
        let options = ChartOptions::new(
            self.settings.width,
            self.settings.height,
            self.settings.tz()?,
        );
        self.chart_service
            .render_all(ledger, self.settings.graph_mode, &options)
    }
}
