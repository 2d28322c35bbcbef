use serde::{Deserialize, Serialize};

use super::color::Rgb;
use super::lot::Lot;
use super::price::PriceSeries;

/// How a single stock is declared in `portfolio.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingConfig {
    /// Ticker symbol as understood by the market data provider (e.g. "AAPL")
    pub symbol: String,

    /// Buy lots, each written as `"<quantity>@<price>"`
    #[serde(default)]
    pub buy: Vec<Lot>,

    /// Sell lots, same format as `buy`
    #[serde(default)]
    pub sell: Vec<Lot>,

    /// Include this stock in chart output
    #[serde(default)]
    pub graph: bool,

    /// CSS3 color name or `#` hex; omitted = automatic
    #[serde(default)]
    pub color: Option<String>,
}

impl HoldingConfig {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            buy: Vec::new(),
            sell: Vec::new(),
            graph: false,
            color: None,
        }
    }

    pub fn with_buy(mut self, quantity: f64, price: f64) -> Self {
        self.buy.push(Lot::new(quantity, price));
        self
    }

    pub fn with_sell(mut self, quantity: f64, price: f64) -> Self {
        self.sell.push(Lot::new(quantity, price));
        self
    }

    pub fn graphed(mut self) -> Self {
        self.graph = true;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// A position in one instrument: its price series plus the net quantity
/// and weighted average cost derived from its lots.
///
/// Quantity and average cost are fixed at construction.
#[derive(Debug, Clone, Serialize)]
pub struct Holding {
    series: PriceSeries,
    quantity: f64,
    average_cost: f64,
    requested_color: Option<String>,
    color: Rgb,
    graph: bool,
}

impl Holding {
    pub fn new(
        series: PriceSeries,
        quantity: f64,
        average_cost: f64,
        requested_color: Option<String>,
        color: Rgb,
        graph: bool,
    ) -> Self {
        Self {
            series,
            quantity,
            average_cost,
            requested_color,
            color,
            graph,
        }
    }

    pub fn symbol(&self) -> &str {
        self.series.symbol()
    }

    pub fn series(&self) -> &PriceSeries {
        &self.series
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    pub fn average_cost(&self) -> f64 {
        self.average_cost
    }

    /// The color asked for in configuration, if any.
    pub fn requested_color(&self) -> Option<&str> {
        self.requested_color.as_deref()
    }

    /// The color this holding is drawn with.
    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn is_graphed(&self) -> bool {
        self.graph
    }

    /// Current price × quantity.
    pub fn market_value(&self) -> f64 {
        self.series.current() * self.quantity
    }

    /// Opening price × quantity.
    pub fn opening_value(&self) -> f64 {
        self.series.open() * self.quantity
    }

    /// Quantity × average cost.
    pub fn cost(&self) -> f64 {
        self.quantity * self.average_cost
    }

    /// Price change since the opening sample.
    pub fn change(&self) -> f64 {
        self.series.current() - self.series.open()
    }

    /// Price change as a percentage of the *current* price.
    pub fn change_pct(&self) -> f64 {
        self.change() / self.series.current() * 100.0
    }

    /// Whether the holding is flat or up since the opening sample.
    pub fn is_gaining(&self) -> bool {
        self.change() >= 0.0
    }
}
