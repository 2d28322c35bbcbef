use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::CoreError;

/// How displayed numbers are rounded. Raw computed values are never rounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundingMode {
    /// Round half away from zero
    #[default]
    Math,
    /// Truncate toward zero
    Down,
}

impl RoundingMode {
    /// Round `value` to `places` decimal places.
    pub fn round(&self, value: f64, places: u32) -> f64 {
        let scale = 10f64.powi(places as i32);
        match self {
            RoundingMode::Math => (value * scale).round() / scale,
            RoundingMode::Down => (value * scale).trunc() / scale,
        }
    }
}

impl FromStr for RoundingMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "math" => Ok(RoundingMode::Math),
            "down" => Ok(RoundingMode::Down),
            other => Err(CoreError::InvalidSetting(format!(
                "rounding mode '{other}' (expected math | down)"
            ))),
        }
    }
}

impl std::fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundingMode::Math => write!(f, "math"),
            RoundingMode::Down => write!(f, "down"),
        }
    }
}

/// Whether graph-flagged holdings share one chart or get one each.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GraphMode {
    #[default]
    Combined,
    Independent,
}

impl GraphMode {
    pub fn from_independent(independent: bool) -> Self {
        if independent {
            GraphMode::Independent
        } else {
            GraphMode::Combined
        }
    }
}

/// Global run settings, merged from `config.toml` and command-line flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Chart width in terminal cells
    pub width: u16,

    /// Chart height in terminal cells
    pub height: u16,

    /// IANA timezone name used for chart time labels (e.g. "America/New_York")
    pub timezone: String,

    /// Rounding applied to displayed values
    pub rounding_mode: RoundingMode,

    /// One combined chart or one chart per graphed holding
    pub graph_mode: GraphMode,

    /// How far back to fetch (provider range string, e.g. "1d", "5d")
    pub period: String,

    /// Sample spacing (provider interval string, e.g. "1m", "15m")
    pub interval: String,

    /// Treat malformed hex colors as fatal instead of falling back
    pub strict_colors: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 80,
            height: 20,
            timezone: "America/New_York".to_string(),
            rounding_mode: RoundingMode::Math,
            graph_mode: GraphMode::Combined,
            period: "1d".to_string(),
            interval: "1m".to_string(),
            strict_colors: false,
        }
    }
}

impl Settings {
    /// Parse the configured timezone name.
    pub fn tz(&self) -> Result<Tz, CoreError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| CoreError::InvalidTimezone(self.timezone.clone()))
    }

    /// Reject settings no chart could be drawn with.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.width < 10 || self.height < 3 {
            return Err(CoreError::InvalidSetting(format!(
                "chart size {}x{} is too small (minimum 10x3)",
                self.width, self.height
            )));
        }
        if self.period.trim().is_empty() || self.interval.trim().is_empty() {
            return Err(CoreError::InvalidSetting(
                "time period and interval must not be empty".into(),
            ));
        }
        self.tz()?;
        Ok(())
    }
}
