pub mod analytics_service;
pub mod chart_service;
pub mod color_service;
pub mod cost_basis_service;
pub mod market_data_service;
pub mod portfolio_service;
