use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::CoreError;

/// A single buy or sell transaction: `quantity` units at `price` each.
///
/// In configuration files a lot is written as `"<quantity>@<price>"`,
/// e.g. `"10@123.45"`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Lot {
    pub quantity: f64,
    pub price: f64,
}

impl Lot {
    pub fn new(quantity: f64, price: f64) -> Self {
        Self { quantity, price }
    }

    /// Total amount paid (or received) for this lot.
    pub fn value(&self) -> f64 {
        self.quantity * self.price
    }
}

impl FromStr for Lot {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (qty, price) = s
            .split_once('@')
            .ok_or_else(|| CoreError::Config(format!("lot '{s}' must look like <quantity>@<price>")))?;

        let quantity = qty
            .trim()
            .parse::<f64>()
            .map_err(|e| CoreError::Config(format!("bad quantity in lot '{s}': {e}")))?;
        let price = price
            .trim()
            .parse::<f64>()
            .map_err(|e| CoreError::Config(format!("bad price in lot '{s}': {e}")))?;

        Ok(Self { quantity, price })
    }
}

impl TryFrom<String> for Lot {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Lot> for String {
    fn from(lot: Lot) -> Self {
        lot.to_string()
    }
}

impl std::fmt::Display for Lot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.quantity, self.price)
    }
}
