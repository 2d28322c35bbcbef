use serde::{Deserialize, Serialize};

use crate::models::holding::HoldingConfig;
use crate::models::settings::{GraphMode, RoundingMode, Settings};

/// On-disk layout of `config.toml`. Every key is optional.
///
/// ```toml
/// [frame]
/// width = 80
/// height = 20
///
/// [general]
/// independent_graphs = false
/// timezone = "America/New_York"
/// rounding_mode = "math"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub frame: FrameSection,
    pub general: GeneralSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrameSection {
    pub width: Option<u16>,
    pub height: Option<u16>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneralSection {
    pub independent_graphs: Option<bool>,
    pub timezone: Option<String>,
    pub rounding_mode: Option<RoundingMode>,
    pub time_period: Option<String>,
    pub time_interval: Option<String>,
    pub strict_colors: Option<bool>,
}

impl ConfigFile {
    /// Defaults overlaid with whatever the file sets.
    pub fn into_settings(self) -> Settings {
        let defaults = Settings::default();
        Settings {
            width: self.frame.width.unwrap_or(defaults.width),
            height: self.frame.height.unwrap_or(defaults.height),
            timezone: self.general.timezone.unwrap_or(defaults.timezone),
            rounding_mode: self.general.rounding_mode.unwrap_or(defaults.rounding_mode),
            graph_mode: self
                .general
                .independent_graphs
                .map(GraphMode::from_independent)
                .unwrap_or(defaults.graph_mode),
            period: self.general.time_period.unwrap_or(defaults.period),
            interval: self.general.time_interval.unwrap_or(defaults.interval),
            strict_colors: self.general.strict_colors.unwrap_or(defaults.strict_colors),
        }
    }
}

/// On-disk layout of `portfolio.toml`: one `[[stock]]` table per holding.
///
/// ```toml
/// [[stock]]
/// symbol = "AAPL"
/// buy = ["10@120.50", "2@130"]
/// sell = ["1@140"]
/// graph = true
/// color = "steelblue"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioFile {
    #[serde(default, rename = "stock")]
    pub stocks: Vec<HoldingConfig>,
}
