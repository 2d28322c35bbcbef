use std::path::Path;

use tracing::debug;

use crate::errors::CoreError;
use crate::models::holding::HoldingConfig;
use crate::models::settings::Settings;

use super::format::{ConfigFile, PortfolioFile};

/// Loads run settings and the holdings list from TOML.
pub struct ConfigManager;

impl ConfigManager {
    /// Parse `config.toml` content into validated settings.
    pub fn settings_from_str(content: &str) -> Result<Settings, CoreError> {
        let file: ConfigFile = toml::from_str(content)?;
        let settings = file.into_settings();
        settings.validate()?;
        Ok(settings)
    }

    /// Parse `portfolio.toml` content into holding configs, in file order.
    pub fn portfolio_from_str(content: &str) -> Result<Vec<HoldingConfig>, CoreError> {
        let file: PortfolioFile = toml::from_str(content)?;
        for stock in &file.stocks {
            if stock.symbol.trim().is_empty() {
                return Err(CoreError::Config("a [[stock]] entry has an empty symbol".into()));
            }
        }
        Ok(file.stocks)
    }

    /// Load settings from disk. A missing file means default settings.
    pub fn load_settings(path: impl AsRef<Path>) -> Result<Settings, CoreError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Settings::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::settings_from_str(&content)
    }

    /// Load holdings from disk. A missing file means no holdings.
    pub fn load_portfolio(path: impl AsRef<Path>) -> Result<Vec<HoldingConfig>, CoreError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no portfolio file");
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(path)?;
        Self::portfolio_from_str(&content)
    }
}
