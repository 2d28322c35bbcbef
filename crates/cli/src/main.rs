//! Stock Tracker CLI.
//!
//! # Usage
//!
//! ```bash
//! # table + combined chart from ./config.toml and ./portfolio.toml
//! stocks
//!
//! # one chart per graphed stock, 15 minute samples over five days
//! stocks --independent-graphs --time-interval 15m --time-period 5d
//!
//! # machine readable summary
//! stocks --json --portfolio-config ~/stocks/portfolio.toml
//! ```

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use stock_tracker_core::config::manager::ConfigManager;
use stock_tracker_core::errors::CoreError;
use stock_tracker_core::StockTracker;
use tracing::debug;

mod cli;
mod table;

use cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if cli.no_color {
        colored::control::set_override(false);
    }

    let mut settings = ConfigManager::load_settings(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    cli.apply(&mut settings);
    debug!(?settings, "effective settings");

    let stocks = ConfigManager::load_portfolio(&cli.portfolio_config)
        .with_context(|| format!("failed to load {}", cli.portfolio_config.display()))?;

    let tracker = StockTracker::new(settings).context("failed to start tracker")?;

    let ledger = match tracker.build_ledger(&stocks).await {
        Ok(ledger) => ledger,
        Err(CoreError::EmptyPortfolio) => {
            println!("{}", CoreError::EmptyPortfolio);
            return Ok(());
        }
        Err(e) => return Err(e).context("failed to build portfolio"),
    };

    let summary = tracker.summary(&ledger);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    for chart in tracker.charts(&ledger).context("failed to lay out charts")? {
        debug!(symbols = ?chart.symbols(), "drawing chart");
        println!("{chart}");
    }

    print!(
        "{}",
        table::render(&summary, tracker.settings().rounding_mode, Local::now())
    );

    Ok(())
}
