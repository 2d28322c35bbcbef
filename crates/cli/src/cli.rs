use std::path::PathBuf;

use clap::Parser;
use stock_tracker_core::models::settings::{GraphMode, RoundingMode, Settings};

/// Command-line flags. Anything set here overrides `config.toml`.
#[derive(Debug, Parser)]
#[command(name = "stocks")]
#[command(about = "Portfolio table and intraday charts in the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Width of the chart in terminal cells (default 80)
    #[arg(long)]
    pub width: Option<u16>,

    /// Height of the chart in terminal cells (default 20)
    #[arg(long)]
    pub height: Option<u16>,

    /// Show a chart for each graphed stock instead of one combined chart
    #[arg(long, default_value_t = false)]
    pub independent_graphs: bool,

    /// Your timezone (ex: America/New_York)
    #[arg(long)]
    pub timezone: Option<String>,

    /// How numbers are rounded for display (math | down)
    #[arg(short, long)]
    pub rounding_mode: Option<RoundingMode>,

    /// Time interval between samples (ex: 1m, 15m, 1h)
    #[arg(long)]
    pub time_interval: Option<String>,

    /// Time period to fetch (ex: 1d, 5d)
    #[arg(long)]
    pub time_period: Option<String>,

    /// Path to a config.toml file
    #[arg(long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Path to a portfolio.toml file with your list of stocks
    #[arg(long, default_value = "portfolio.toml")]
    pub portfolio_config: PathBuf,

    /// Print the portfolio summary as JSON instead of the table and charts
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Disable ANSI colors
    #[arg(long, default_value_t = false)]
    pub no_color: bool,
}

impl Cli {
    /// Overlay flags onto settings loaded from the config file.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(width) = self.width {
            settings.width = width;
        }
        if let Some(height) = self.height {
            settings.height = height;
        }
        if self.independent_graphs {
            settings.graph_mode = GraphMode::Independent;
        }
        if let Some(timezone) = &self.timezone {
            settings.timezone = timezone.clone();
        }
        if let Some(mode) = self.rounding_mode {
            settings.rounding_mode = mode;
        }
        if let Some(interval) = &self.time_interval {
            settings.interval = interval.clone();
        }
        if let Some(period) = &self.time_period {
            settings.period = period.clone();
        }
    }
}
