pub mod analytics;
pub mod chart;
pub mod color;
pub mod holding;
pub mod ledger;
pub mod lot;
pub mod price;
pub mod settings;
