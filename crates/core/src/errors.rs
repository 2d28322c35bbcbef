use thiserror::Error;

/// Which side of a holding's lot list a lot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LotSide {
    Buy,
    Sell,
}

impl std::fmt::Display for LotSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LotSide::Buy => write!(f, "buy"),
            LotSide::Sell => write!(f, "sell"),
        }
    }
}

impl LotSide {
    /// The config key that should be used instead of this one for a negative amount.
    pub fn opposite(&self) -> LotSide {
        match self {
            LotSide::Buy => LotSide::Sell,
            LotSide::Sell => LotSide::Buy,
        }
    }
}

/// Unified error type for the entire stock-tracker-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Valuation ───────────────────────────────────────────────────
    #[error("Invalid {side} lot of quantity {quantity}: use the {} key instead to guarantee accurate calculations", .side.opposite())]
    InvalidLot { side: LotSide, quantity: f64 },

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Missing market data: {0}")]
    MissingData(String),

    #[error("Portfolio has no stocks added. There is nothing to show.")]
    EmptyPortfolio,

    // ── Configuration ───────────────────────────────────────────────
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Unknown timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    // ── File I/O ────────────────────────────────────────────────────
    #[error("File I/O error: {0}")]
    FileIO(String),


    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<toml::de::Error> for CoreError {
    fn from(e: toml::de::Error) -> Self {
        CoreError::Config(e.message().to_string())
    }
}
