use chrono::{DateTime, Local};
use colored::Colorize;
use stock_tracker_core::models::analytics::{Gain, HoldingReport, PortfolioSummary};
use stock_tracker_core::models::settings::RoundingMode;

const CELL_WIDTH: usize = 13;

const HEADERS: [&str; 11] = [
    "Ticker",
    "Last",
    "Change",
    "Change%",
    "Low",
    "High",
    "Daily Avg",
    "Owned",
    "Mkt Value",
    "Avg Share",
    "Total Cost",
];

/// Render the portfolio table, totals and gain lines.
pub fn render(summary: &PortfolioSummary, mode: RoundingMode, now: DateTime<Local>) -> String {
    let mut out = String::from("\nPortfolio Summary:\n\n");

    out.push('\t');
    out.push_str(&cells(HEADERS.iter().map(|h| h.to_string())));
    out.push('\n');
    out.push('\t');
    out.push_str(&cells(HEADERS.iter().map(|_| "-".repeat(CELL_WIDTH))));
    out.push('\n');

    for row in &summary.holdings {
        let line = cells(row_cells(row, mode));
        let line = if row.gaining { line.green() } else { line.red() };
        out.push_str(&format!("\t{line}\n"));
    }

    // Totals sit under the market value column, then total cost two columns right.
    let value = cell(&money(summary.current_value, mode));
    let value = if summary.current_value >= summary.initial_value {
        value.green()
    } else {
        value.red()
    };
    out.push_str(&format!(
        "\n{:<w$}{value}{:<c$}{}\n",
        "Totals: ",
        "",
        cell(&money(summary.initial_value, mode)),
        w = 8 + CELL_WIDTH * 8,
        c = CELL_WIDTH,
    ));

    out.push_str(&format!(
        "\n{:<25}{}\n",
        "Current Time: ",
        now.format("%A %b %d, %Y - %I:%M:%S %p")
    ));
    out.push_str(&format!(
        "{:<25}{}\n",
        "Total Cost: ",
        money(summary.initial_value, mode)
    ));
    out.push_str(&format!(
        "{:<25}{}\n",
        "Total Value: ",
        money(summary.current_value, mode)
    ));
    out.push_str(&gain_line(&summary.daily_gain, "Today", mode));
    out.push_str(&gain_line(&summary.overall_gain, "Overall", mode));

    out
}

fn row_cells(row: &HoldingReport, mode: RoundingMode) -> Vec<String> {
    let sign = if row.gaining { "+" } else { "-" };
    vec![
        row.symbol.clone(),
        money(row.last, mode),
        format!("{sign}${:.2}", mode.round(row.change, 2).abs()),
        format!("{sign}{:.2}%", mode.round(row.change_pct, 2).abs()),
        money(row.low, mode),
        money(row.high, mode),
        money(row.average, mode),
        format!("{}", RoundingMode::Math.round(row.quantity, 3)),
        money(row.market_value, mode),
        format!("{:.2}", RoundingMode::Math.round(row.average_cost, 2)),
        money(row.total_cost, mode),
    ]
}

fn gain_line(gain: &Gain, timespan: &str, mode: RoundingMode) -> String {
    let (sign, verb) = if gain.is_positive() {
        ("+", "Gained")
    } else {
        ("-", "Lost")
    };
    let label = format!("Value {verb} {timespan}: ");
    let figures = format!(
        "{}{}",
        cell(&format!("{sign}${:.2}", mode.round(gain.amount, 2).abs())),
        cell(&format!("{sign}{:.2}%", mode.round(gain.pct, 2).abs())),
    );
    let figures = if gain.is_positive() {
        figures.green()
    } else {
        figures.red()
    };
    format!("{label:<25}{figures}\n")
}

fn money(value: f64, mode: RoundingMode) -> String {
    format!("${:.2}", mode.round(value, 2))
}

fn cell(text: &str) -> String {
    format!("{text:<width$}", width = CELL_WIDTH)
}

fn cells(items: impl IntoIterator<Item = String>) -> String {
    items.into_iter().map(|s| cell(&s)).collect()
}
