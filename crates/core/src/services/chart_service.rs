use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use colored::Colorize;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::widgets::{Axis, Chart as LineChart, Dataset, GraphType, LegendPosition, Widget};

use crate::errors::CoreError;
use crate::models::chart::{Chart, TimeWindow};
use crate::models::holding::Holding;
use crate::models::ledger::PortfolioLedger;
use crate::models::settings::GraphMode;

/// Layout parameters for one render call.
#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub width: u16,
    pub height: u16,
    pub timezone: Tz,
    /// Overrides the session open
    pub start: Option<DateTime<Utc>>,
    /// Overrides the session close
    pub end: Option<DateTime<Utc>>,
}

impl ChartOptions {
    pub fn new(width: u16, height: u16, timezone: Tz) -> Self {
        Self {
            width,
            height,
            timezone,
            start: None,
            end: None,
        }
    }

    pub fn with_window(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    /// The x-axis bounds: explicit ends where given, else today's session.
    fn window(&self, now: DateTime<Utc>) -> TimeWindow {
        let session = TimeWindow::session(now, self.timezone);
        TimeWindow {
            start: self
                .start
                .map(|s| s.with_timezone(&self.timezone))
                .unwrap_or(session.start),
            end: self
                .end
                .map(|e| e.with_timezone(&self.timezone))
                .unwrap_or(session.end),
        }
    }
}

/// Lays holdings out on a shared time window and value range.
///
/// Sample `k` of every series is placed `k` minutes after the window start,
/// whatever the real sample cadence was. The y-range spans the lowest and
/// highest sample across all included series.
pub struct ChartService;

impl ChartService {
    pub fn new() -> Self {
        Self
    }

    /// Lay out a chart for `holdings`. Returns `None` when there is nothing to draw.
    pub fn render<'a>(
        &self,
        holdings: &[&'a Holding],
        options: &ChartOptions,
    ) -> Result<Option<Chart<'a>>, CoreError> {
        self.render_at(holdings, options, Utc::now())
    }

    /// Same as `render`, with the session date taken from `now`.
    pub fn render_at<'a>(
        &self,
        holdings: &[&'a Holding],
        options: &ChartOptions,
        now: DateTime<Utc>,
    ) -> Result<Option<Chart<'a>>, CoreError> {
        if holdings.is_empty() {
            return Ok(None);
        }

        let window = options.window(now);
        if window.end <= window.start {
            return Err(CoreError::InvalidSetting(format!(
                "chart window ends ({}) before it starts ({})",
                window.end, window.start
            )));
        }

        let y_range = holdings.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), h| (lo.min(h.series().min()), hi.max(h.series().max())),
        );

        Ok(Some(Chart {
            series: holdings.to_vec(),
            colors: holdings.iter().map(|h| h.color()).collect(),
            window,
            y_range,
            width: options.width,
            height: options.height,
        }))
    }

    /// Charts for every graph-flagged holding: one combined chart, or one per holding.
    pub fn render_all<'a>(
        &self,
        ledger: &'a PortfolioLedger,
        mode: GraphMode,
        options: &ChartOptions,
    ) -> Result<Vec<Chart<'a>>, CoreError> {
        let graphed = ledger.graphed();
        let charts: Vec<Chart<'a>> = match mode {
            GraphMode::Combined => self.render(&graphed, options)?.into_iter().collect(),
            GraphMode::Independent => {
                let mut charts = Vec::with_capacity(graphed.len());
                for holding in graphed {
                    if let Some(chart) = self.render(&[holding], options)? {
                        charts.push(chart);
                    }
                }
                charts
            }
        };
        Ok(charts)
    }

    /// Rasterize a chart into text: braille lines, axes, labels and legend.
    pub fn draw(chart: &Chart<'_>) -> String {
        let points: Vec<Vec<(f64, f64)>> = (0..chart.series.len()).map(|i| chart.points(i)).collect();

        let datasets: Vec<Dataset<'_>> = chart
            .series
            .iter()
            .zip(&points)
            .zip(&chart.colors)
            .map(|((holding, data), rgb)| {
                Dataset::default()
                    .name(holding.symbol().to_string())
                    .marker(Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(Color::Rgb(rgb.0, rgb.1, rgb.2)))
                    .data(data)
            })
            .collect();

        let (y_min, y_max) = Self::padded_range(chart.y_range);
        let x_max = chart.window.minutes().max(1) as f64;

        let x_labels: Vec<String> = [0.0, 0.5, 1.0]
            .iter()
            .map(|f| chart.window.at_fraction(*f).format("%H:%M").to_string())
            .collect();
        let y_labels: Vec<String> = [y_min, (y_min + y_max) / 2.0, y_max]
            .iter()
            .map(|v| format!("{v:.2}"))
            .collect();

        let widget = LineChart::new(datasets)
            .x_axis(
                Axis::default()
                    .title("Time")
                    .bounds([0.0, x_max])
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .title("Value")
                    .bounds([y_min, y_max])
                    .labels(y_labels),
            )
            .legend_position(Some(LegendPosition::TopLeft))
            .hidden_legend_constraints((Constraint::Percentage(100), Constraint::Percentage(100)));

        let area = Rect::new(0, 0, chart.width, chart.height);
        let mut buffer = Buffer::empty(area);
        widget.render(area, &mut buffer);

        Self::buffer_to_text(&buffer, chart.width as usize)
    }

    /// A flat series still needs a non-empty value axis.
    fn padded_range((lo, hi): (f64, f64)) -> (f64, f64) {
        if hi > lo {
            (lo, hi)
        } else {
            let pad = (lo.abs() * 0.01).max(1.0);
            (lo - pad, hi + pad)
        }
    }

    /// Serialize buffer rows, coloring runs of cells that share a foreground.
    fn buffer_to_text(buffer: &Buffer, width: usize) -> String {
        let mut out = String::new();

        for row in buffer.content().chunks(width.max(1)) {
            let mut line = String::new();
            let mut run = String::new();
            let mut run_fg = Color::Reset;

            for cell in row {
                if cell.fg != run_fg && !run.is_empty() {
                    line.push_str(&Self::paint(&run, run_fg));
                    run.clear();
                }
                run_fg = cell.fg;
                run.push_str(cell.symbol());
            }
            line.push_str(&Self::paint(&run, run_fg));

            out.push_str(line.trim_end());
            out.push('\n');
        }

        out
    }

    fn paint(text: &str, fg: Color) -> String {
        match fg {
            Color::Rgb(r, g, b) if !text.trim().is_empty() => text.truecolor(r, g, b).to_string(),
            _ => text.to_string(),
        }
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Chart<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&ChartService::draw(self))
    }
}
