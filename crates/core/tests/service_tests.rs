// ═══════════════════════════════════════════════════════════════════
// Service & Integration Tests — CostBasisService, ColorService,
// PortfolioService, AnalyticsService, ChartService, StockTracker facade
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use stock_tracker_core::errors::{CoreError, LotSide};
use stock_tracker_core::models::color::{Rgb, DEFAULT_PALETTE};
use stock_tracker_core::models::holding::HoldingConfig;
use stock_tracker_core::models::ledger::PortfolioLedger;
use stock_tracker_core::models::lot::Lot;
use stock_tracker_core::models::price::{MarketSnapshot, PricePoint};
use stock_tracker_core::models::settings::{GraphMode, Settings};
use stock_tracker_core::providers::traits::MarketDataProvider;
use stock_tracker_core::services::analytics_service::AnalyticsService;
use stock_tracker_core::services::chart_service::{ChartOptions, ChartService};
use stock_tracker_core::services::color_service::ColorService;
use stock_tracker_core::services::cost_basis_service::CostBasisService;
use stock_tracker_core::services::market_data_service::MarketDataService;
use stock_tracker_core::services::portfolio_service::PortfolioService;
use stock_tracker_core::StockTracker;

// ═══════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════

/// One quote per minute from 14:30 UTC, per symbol.
fn quotes(samples: &[f64]) -> Vec<PricePoint> {
    let open = Utc.with_ymd_and_hms(2025, 3, 14, 14, 30, 0).unwrap();
    samples
        .iter()
        .enumerate()
        .map(|(k, &price)| PricePoint {
            timestamp: open + Duration::minutes(k as i64),
            price,
        })
        .collect()
}

fn snapshot(series: &[(&str, &[f64])]) -> MarketSnapshot {
    MarketSnapshot::align(
        series
            .iter()
            .map(|(symbol, samples)| (symbol.to_string(), quotes(samples)))
            .collect(),
    )
}

fn aaa_bbb() -> (MarketSnapshot, Vec<HoldingConfig>) {
    let snapshot = snapshot(&[("AAA", &[100.0, 105.0, 110.0]), ("BBB", &[50.0, 48.0, 52.0])]);
    let configs = vec![
        HoldingConfig::new("AAA").with_buy(10.0, 100.0).graphed(),
        HoldingConfig::new("BBB").with_buy(5.0, 50.0),
    ];
    (snapshot, configs)
}

/// AAA quotes every minute from 14:30; BBB's first quote arrives two minutes later.
fn late_start_snapshot() -> MarketSnapshot {
    let mut bbb = quotes(&[0.0, 0.0, 50.0, 51.0]);
    bbb.drain(..2);
    MarketSnapshot::align(vec![
        ("AAA".into(), quotes(&[100.0, 101.0, 102.0, 103.0])),
        ("BBB".into(), bbb),
    ])
}

fn aaa_bbb_ledger() -> PortfolioLedger {
    let (snapshot, configs) = aaa_bbb();
    PortfolioService::new().populate(&snapshot, &configs).unwrap()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ═══════════════════════════════════════════════════════════════════
// Mock Provider
// ═══════════════════════════════════════════════════════════════════

struct MockMarketData {
    samples: HashMap<String, Vec<f64>>,
    calls: Arc<AtomicUsize>,
}

impl MockMarketData {
    fn new(series: &[(&str, &[f64])]) -> Self {
        Self {
            samples: series
                .iter()
                .map(|(s, v)| (s.to_string(), v.to_vec()))
                .collect(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl MarketDataProvider for MockMarketData {
    fn name(&self) -> &str {
        "MockMarketData"
    }

    async fn fetch(
        &self,
        symbols: &[String],
        _period: &str,
        _interval: &str,
    ) -> Result<MarketSnapshot, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let per_symbol = symbols
            .iter()
            .map(|s| {
                let points = self.samples.get(s).map(|v| quotes(v)).unwrap_or_default();
                (s.clone(), points)
            })
            .collect();
        Ok(MarketSnapshot::align(per_symbol))
    }
}

/// A provider whose every request fails.
struct FailingMarketData;

#[async_trait]
impl MarketDataProvider for FailingMarketData {
    fn name(&self) -> &str {
        "FailingMarketData"
    }

    async fn fetch(
        &self,
        _symbols: &[String],
        _period: &str,
        _interval: &str,
    ) -> Result<MarketSnapshot, CoreError> {
        Err(CoreError::Api {
            provider: "FailingMarketData".into(),
            message: "connection refused".into(),
        })
    }
}

// ═══════════════════════════════════════════════════════════════════
// CostBasisService
// ═══════════════════════════════════════════════════════════════════

mod cost_basis {
    use super::*;

    #[test]
    fn buys_only_weighted_mean() {
        let buys = [Lot::new(10.0, 100.0), Lot::new(30.0, 120.0)];
        let (qty, avg) = CostBasisService::new().compute_basis(&buys, &[]).unwrap();
        assert_eq!(qty, 40.0);
        assert!(close(avg, (1000.0 + 3600.0) / 40.0));
    }

    #[test]
    fn single_buy() {
        let (qty, avg) = CostBasisService::new()
            .compute_basis(&[Lot::new(3.0, 12.5)], &[])
            .unwrap();
        assert_eq!((qty, avg), (3.0, 12.5));
    }

    #[test]
    fn sells_reduce_dollar_basis() {
        let buys = [Lot::new(10.0, 100.0)];
        let sells = [Lot::new(4.0, 120.0)];
        let (qty, avg) = CostBasisService::new().compute_basis(&buys, &sells).unwrap();
        assert_eq!(qty, 6.0);
        assert!(close(avg, (1000.0 - 480.0) / 6.0));
    }

    #[test]
    fn closed_position_is_zero() {
        let buys = [Lot::new(5.0, 10.0), Lot::new(5.0, 20.0)];
        let sells = [Lot::new(10.0, 30.0)];
        let basis = CostBasisService::new().compute_basis(&buys, &sells).unwrap();
        assert_eq!(basis, (0.0, 0.0));
    }

    #[test]
    fn no_lots_is_zero() {
        let basis = CostBasisService::new().compute_basis(&[], &[]).unwrap();
        assert_eq!(basis, (0.0, 0.0));
    }

    #[test]
    fn rejects_non_positive_buy() {
        for qty in [0.0, -1.0] {
            let err = CostBasisService::new()
                .compute_basis(&[Lot::new(10.0, 1.0), Lot::new(qty, 1.0)], &[])
                .unwrap_err();
            match err {
                CoreError::InvalidLot { side, quantity } => {
                    assert_eq!(side, LotSide::Buy);
                    assert_eq!(quantity, qty);
                }
                other => panic!("expected InvalidLot, got {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_non_positive_sell() {
        let err = CostBasisService::new()
            .compute_basis(&[Lot::new(10.0, 1.0)], &[Lot::new(0.0, 1.0)])
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidLot {
                side: LotSide::Sell,
                ..
            }
        ));
    }

    #[test]
    fn rejects_nan_quantity() {
        let result = CostBasisService::new().compute_basis(&[Lot::new(f64::NAN, 1.0)], &[]);
        assert!(matches!(result, Err(CoreError::InvalidLot { .. })));
    }
}

// ═══════════════════════════════════════════════════════════════════
// ColorService
// ═══════════════════════════════════════════════════════════════════

mod color_service {
    use super::*;

    #[test]
    fn explicit_hex_ignores_index() {
        let service = ColorService::new();
        for i in 0..30 {
            let rgb = service.resolve(Some("#00FF00"), i, &DEFAULT_PALETTE).unwrap();
            assert_eq!(rgb, Rgb(0, 255, 0));
        }
    }

    #[test]
    fn unset_cycles_palette() {
        let service = ColorService::new();
        let palette = [Rgb(1, 1, 1), Rgb(2, 2, 2)];
        assert_eq!(service.resolve(None, 3, &palette).unwrap(), palette[3 % 2]);
        assert_eq!(
            service.resolve(None, 3, &DEFAULT_PALETTE).unwrap(),
            DEFAULT_PALETTE[3]
        );
        assert_eq!(
            service.resolve(None, 25, &DEFAULT_PALETTE).unwrap(),
            DEFAULT_PALETTE[1]
        );
    }

    #[test]
    fn named_color() {
        let rgb = ColorService::new()
            .resolve(Some("steelblue"), 0, &DEFAULT_PALETTE)
            .unwrap();
        assert_eq!(rgb, Rgb(70, 130, 180));
    }

    #[test]
    fn unknown_name_falls_back() {
        let service = ColorService::strict();
        let rgb = service.resolve(Some("Steelblue"), 2, &DEFAULT_PALETTE).unwrap();
        assert_eq!(rgb, DEFAULT_PALETTE[2]);
    }

    #[test]
    fn malformed_hex_lenient() {
        let service = ColorService::new();
        let rgb = service.resolve(Some("#12"), 4, &DEFAULT_PALETTE).unwrap();
        assert_eq!(rgb, DEFAULT_PALETTE[4]);
    }

    #[test]
    fn malformed_hex_strict() {
        let service = ColorService::strict();
        let err = service.resolve(Some("#12"), 4, &DEFAULT_PALETTE).unwrap_err();
        assert!(matches!(err, CoreError::InvalidColor(_)));
    }

    #[test]
    fn empty_palette() {
        let service = ColorService::new();
        assert!(matches!(
            service.resolve(None, 0, &[]),
            Err(CoreError::InvalidColor(_))
        ));
        assert_eq!(
            service.resolve(Some("#000"), 0, &[]).unwrap(),
            Rgb(0, 0, 0)
        );
    }
}

// ═══════════════════════════════════════════════════════════════════
// PortfolioService
// ═══════════════════════════════════════════════════════════════════

mod portfolio_service {
    use super::*;

    #[test]
    fn end_to_end_totals() {
        let ledger = aaa_bbb_ledger();
        assert_eq!(ledger.len(), 2);
        assert!(close(ledger.initial_value(), 1250.0));
        assert!(close(ledger.current_value(), 1360.0));
        assert!(close(ledger.opening_value(), 1250.0));
        assert!(close(ledger.overall_gain(), 110.0));
        assert!(close(ledger.daily_gain(), 110.0));
    }

    #[test]
    fn holdings_keep_config_order() {
        let ledger = aaa_bbb_ledger();
        let symbols: Vec<&str> = ledger.holdings().iter().map(|h| h.symbol()).collect();
        assert_eq!(symbols, vec!["AAA", "BBB"]);
        assert!(ledger.get("BBB").is_some());
        assert!(ledger.get("CCC").is_none());
    }

    #[test]
    fn holding_fields() {
        let ledger = aaa_bbb_ledger();
        let aaa = ledger.get("AAA").unwrap();
        assert_eq!(aaa.quantity(), 10.0);
        assert_eq!(aaa.average_cost(), 100.0);
        assert_eq!(aaa.series().samples(), &[100.0, 105.0, 110.0]);
        assert!(aaa.is_graphed());
        assert!(aaa.is_gaining());
        assert!(close(aaa.change(), 10.0));
        assert!(close(aaa.change_pct(), 10.0 / 110.0 * 100.0));

        let bbb = ledger.get("BBB").unwrap();
        assert!(!bbb.is_graphed());
        assert!(close(bbb.market_value(), 260.0));
    }

    #[test]
    fn colors_follow_config_position() {
        let snapshot = snapshot(&[("A", &[1.0]), ("B", &[1.0]), ("C", &[1.0])]);
        let configs = vec![
            HoldingConfig::new("A").with_buy(1.0, 1.0),
            HoldingConfig::new("B").with_buy(1.0, 1.0).with_color("#00FF00"),
            HoldingConfig::new("C").with_buy(1.0, 1.0).with_color("NotAColor"),
        ];
        let ledger = PortfolioService::new().populate(&snapshot, &configs).unwrap();

        assert_eq!(ledger.holdings()[0].color(), DEFAULT_PALETTE[0]);
        assert_eq!(ledger.holdings()[1].color(), Rgb(0, 255, 0));
        assert_eq!(ledger.holdings()[2].color(), DEFAULT_PALETTE[2]);
        assert_eq!(ledger.holdings()[2].requested_color(), Some("NotAColor"));
    }

    #[test]
    fn gaps_are_repaired() {
        let snapshot = MarketSnapshot::align(vec![
            ("AAA".into(), quotes(&[5.0, 6.0, 7.0])),
            ("BBB".into(), {
                let mut q = quotes(&[1.0, 0.0, 3.0]);
                q.remove(1);
                q
            }),
        ]);
        let configs = vec![
            HoldingConfig::new("AAA").with_buy(1.0, 1.0),
            HoldingConfig::new("BBB").with_buy(1.0, 1.0),
        ];
        let ledger = PortfolioService::new().populate(&snapshot, &configs).unwrap();
        assert_eq!(ledger.get("BBB").unwrap().series().samples(), &[1.0, 1.0, 3.0]);
    }

    #[test]
    fn late_starting_symbol_is_kept() {
        let configs = vec![
            HoldingConfig::new("AAA").with_buy(1.0, 100.0),
            HoldingConfig::new("BBB").with_buy(2.0, 50.0).graphed(),
        ];
        let ledger = PortfolioService::new()
            .populate(&late_start_snapshot(), &configs)
            .unwrap();

        assert_eq!(ledger.len(), 2);
        let bbb = ledger.get("BBB").unwrap();
        assert!(bbb.series().samples()[0].is_nan());
        assert_eq!(bbb.series().open(), 50.0);
        assert_eq!(bbb.series().current(), 51.0);
        assert!(close(bbb.market_value(), 102.0));
        assert!(close(bbb.change(), 1.0));
        assert!(close(ledger.current_value(), 103.0 + 102.0));
        assert!(close(ledger.opening_value(), 100.0 + 100.0));
    }

    #[test]
    fn empty_configs() {
        let err = PortfolioService::new()
            .populate(&MarketSnapshot::new(), &[])
            .unwrap_err();
        assert!(matches!(err, CoreError::EmptyPortfolio));
    }

    #[test]
    fn missing_symbol() {
        let (snapshot, mut configs) = aaa_bbb();
        configs.push(HoldingConfig::new("ZZZ").with_buy(1.0, 1.0));
        let err = PortfolioService::new().populate(&snapshot, &configs).unwrap_err();
        match err {
            CoreError::MissingData(msg) => assert!(msg.contains("ZZZ")),
            other => panic!("expected MissingData, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_symbol() {
        let (snapshot, mut configs) = aaa_bbb();
        configs.push(HoldingConfig::new("AAA").with_buy(1.0, 1.0));
        let err = PortfolioService::new().populate(&snapshot, &configs).unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn bad_lot_aborts_everything() {
        let (snapshot, mut configs) = aaa_bbb();
        configs[1] = HoldingConfig::new("BBB").with_buy(5.0, 50.0).with_sell(-1.0, 60.0);
        let result = PortfolioService::new().populate(&snapshot, &configs);
        assert!(matches!(
            result,
            Err(CoreError::InvalidLot {
                side: LotSide::Sell,
                ..
            })
        ));
    }

    #[test]
    fn strict_colors_abort() {
        let (snapshot, mut configs) = aaa_bbb();
        configs[0].color = Some("#nothex".into());
        let service = PortfolioService::with_colors(ColorService::strict(), DEFAULT_PALETTE.to_vec());
        assert!(matches!(
            service.populate(&snapshot, &configs),
            Err(CoreError::InvalidColor(_))
        ));
        assert!(PortfolioService::new().populate(&snapshot, &configs).is_ok());
    }
}

// ═══════════════════════════════════════════════════════════════════
// AnalyticsService
// ═══════════════════════════════════════════════════════════════════

mod analytics_service {
    use super::*;

    #[test]
    fn change_pct_uses_current_price() {
        let snapshot = snapshot(&[("AAA", &[100.0, 110.0])]);
        let configs = vec![HoldingConfig::new("AAA").with_buy(1.0, 100.0)];
        let ledger = PortfolioService::new().populate(&snapshot, &configs).unwrap();
        let report = AnalyticsService::new().holding_report(&ledger.holdings()[0]);
        assert!((report.change_pct - 9.0909).abs() < 1e-4);
        assert!(report.gaining);
    }

    #[test]
    fn holding_rows() {
        let ledger = aaa_bbb_ledger();
        let summary = AnalyticsService::new().get_portfolio_summary(&ledger);
        let bbb = &summary.holdings[1];
        assert_eq!(bbb.symbol, "BBB");
        assert_eq!(bbb.last, 52.0);
        assert_eq!(bbb.low, 48.0);
        assert_eq!(bbb.high, 52.0);
        assert!(close(bbb.average, 50.0));
        assert!(close(bbb.total_cost, 250.0));
        assert!(bbb.gaining);
    }

    #[test]
    fn totals_and_gains() {
        let summary = AnalyticsService::new().get_portfolio_summary(&aaa_bbb_ledger());
        assert!(close(summary.initial_value, 1250.0));
        assert!(close(summary.opening_value, 1250.0));
        assert!(close(summary.current_value, 1360.0));
        assert!(close(summary.overall_gain.amount, 110.0));
        assert!(close(summary.overall_gain.pct, 110.0 / 1360.0 * 100.0));
        assert!(summary.daily_gain.is_positive());
    }

    #[test]
    fn losing_holding() {
        let snapshot = snapshot(&[("DN", &[20.0, 15.0])]);
        let configs = vec![HoldingConfig::new("DN").with_buy(2.0, 20.0)];
        let ledger = PortfolioService::new().populate(&snapshot, &configs).unwrap();
        let summary = AnalyticsService::new().get_portfolio_summary(&ledger);
        assert!(!summary.holdings[0].gaining);
        assert!(!summary.overall_gain.is_positive());
        assert!(close(summary.overall_gain.amount, -10.0));
    }

    #[test]
    fn worthless_portfolio_has_zero_pct() {
        let snapshot = snapshot(&[("X", &[1.0])]);
        let configs = vec![HoldingConfig::new("X")
            .with_buy(1.0, 1.0)
            .with_sell(1.0, 2.0)];
        let ledger = PortfolioService::new().populate(&snapshot, &configs).unwrap();
        let summary = AnalyticsService::new().get_portfolio_summary(&ledger);
        assert_eq!(summary.current_value, 0.0);
        assert_eq!(summary.overall_gain.pct, 0.0);
    }

    #[test]
    fn summary_serializes() {
        let summary = AnalyticsService::new().get_portfolio_summary(&aaa_bbb_ledger());
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["holdings"][0]["symbol"], "AAA");
        assert_eq!(json["current_value"], 1360.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// ChartService
// ═══════════════════════════════════════════════════════════════════

mod chart_service {
    use super::*;

    fn options() -> ChartOptions {
        ChartOptions::new(80, 20, chrono_tz::Tz::UTC)
    }

    #[test]
    fn nothing_to_draw() {
        let chart = ChartService::new().render(&[], &options()).unwrap();
        assert!(chart.is_none());
    }

    #[test]
    fn ungraphed_ledger_yields_no_charts() {
        let (snapshot, mut configs) = aaa_bbb();
        configs[0].graph = false;
        let ledger = PortfolioService::new().populate(&snapshot, &configs).unwrap();
        let charts = ChartService::new()
            .render_all(&ledger, GraphMode::Combined, &options())
            .unwrap();
        assert!(charts.is_empty());
    }

    #[test]
    fn y_range_spans_all_series() {
        let ledger = aaa_bbb_ledger();
        let all: Vec<_> = ledger.holdings().iter().collect();
        let chart = ChartService::new().render(&all, &options()).unwrap().unwrap();
        assert_eq!(chart.y_range, (48.0, 110.0));
        assert_eq!(chart.symbols(), vec!["AAA", "BBB"]);
        assert_eq!(chart.colors, vec![DEFAULT_PALETTE[0], DEFAULT_PALETTE[1]]);
    }

    #[test]
    fn samples_are_one_minute_apart() {
        let ledger = aaa_bbb_ledger();
        let chart = ChartService::new()
            .render(&ledger.graphed(), &options())
            .unwrap()
            .unwrap();
        assert_eq!(chart.points(0), vec![(0.0, 100.0), (1.0, 105.0), (2.0, 110.0)]);
    }

    #[test]
    fn late_series_skips_leading_gap() {
        let configs = vec![
            HoldingConfig::new("AAA").with_buy(1.0, 100.0).graphed(),
            HoldingConfig::new("BBB").with_buy(2.0, 50.0).graphed(),
        ];
        let ledger = PortfolioService::new()
            .populate(&late_start_snapshot(), &configs)
            .unwrap();
        let chart = ChartService::new()
            .render(&ledger.graphed(), &options())
            .unwrap()
            .unwrap();

        assert_eq!(chart.points(1), vec![(1.0, 50.0), (2.0, 50.0), (3.0, 51.0)]);
        assert_eq!(chart.y_range, (50.0, 103.0));
        colored::control::set_override(false);
        assert!(chart.to_string().contains("BBB"));
    }

    #[test]
    fn default_window_is_session() {
        let now = Utc.with_ymd_and_hms(2025, 3, 14, 16, 0, 0).unwrap();
        let ledger = aaa_bbb_ledger();
        let chart = ChartService::new()
            .render_at(&ledger.graphed(), &options(), now)
            .unwrap()
            .unwrap();
        assert_eq!(chart.window.minutes(), 390);
        assert_eq!(
            chart.window.start,
            Utc.with_ymd_and_hms(2025, 3, 14, 14, 30, 0)
                .unwrap()
                .with_timezone(&chrono_tz::Tz::UTC)
        );
    }

    #[test]
    fn explicit_window() {
        let start = Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 3, 14, 10, 0, 0).unwrap();
        let ledger = aaa_bbb_ledger();
        let chart = ChartService::new()
            .render(&ledger.graphed(), &options().with_window(start, end))
            .unwrap()
            .unwrap();
        assert_eq!(chart.window.minutes(), 60);
    }

    #[test]
    fn backwards_window_rejected() {
        let start = Utc.with_ymd_and_hms(2025, 3, 14, 10, 0, 0).unwrap();
        let ledger = aaa_bbb_ledger();
        let result = ChartService::new().render(&ledger.graphed(), &options().with_window(start, start));
        assert!(matches!(result, Err(CoreError::InvalidSetting(_))));
    }

    #[test]
    fn combined_vs_independent() {
        let (snapshot, mut configs) = aaa_bbb();
        configs[1].graph = true;
        let ledger = PortfolioService::new().populate(&snapshot, &configs).unwrap();
        let service = ChartService::new();

        let combined = service
            .render_all(&ledger, GraphMode::Combined, &options())
            .unwrap();
        assert_eq!(combined.len(), 1);
        assert_eq!(combined[0].series.len(), 2);

        let independent = service
            .render_all(&ledger, GraphMode::Independent, &options())
            .unwrap();
        assert_eq!(independent.len(), 2);
        assert_eq!(independent[1].symbols(), vec!["BBB"]);
        assert_eq!(independent[1].y_range, (48.0, 52.0));
    }

    #[test]
    fn draw_produces_frame() {
        colored::control::set_override(false);
        let ledger = aaa_bbb_ledger();
        let chart = ChartService::new()
            .render(&ledger.graphed(), &options())
            .unwrap()
            .unwrap();
        let text = chart.to_string();

        assert_eq!(text.lines().count(), 20);
        assert!(text.lines().all(|l| l.chars().count() <= 80));
        assert!(text.contains("AAA"));
        assert!(text.contains("14:30"));
        assert!(text.contains("110.00"));
    }

    #[test]
    fn draw_flat_series() {
        colored::control::set_override(false);
        let snapshot = snapshot(&[("FLAT", &[10.0, 10.0, 10.0])]);
        let configs = vec![HoldingConfig::new("FLAT").with_buy(1.0, 1.0).graphed()];
        let ledger = PortfolioService::new().populate(&snapshot, &configs).unwrap();
        let chart = ChartService::new()
            .render(&ledger.graphed(), &options())
            .unwrap()
            .unwrap();
        assert_eq!(chart.y_range, (10.0, 10.0));
        assert!(ChartService::draw(&chart).contains("FLAT"));
    }
}

// ═══════════════════════════════════════════════════════════════════
// MarketDataService
// ═══════════════════════════════════════════════════════════════════

mod market_data_service {
    use super::*;

    #[tokio::test]
    async fn one_batch_for_all_symbols() {
        let provider = MockMarketData::new(&[("AAA", &[1.0, 2.0]), ("BBB", &[3.0])]);
        let calls = Arc::clone(&provider.calls);
        let service = MarketDataService::new(Box::new(provider));
        assert_eq!(service.provider_name(), "MockMarketData");

        let (_, configs) = aaa_bbb();
        let snapshot = service.fetch_snapshot(&configs, "1d", "1m").await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(snapshot.symbols().collect::<Vec<_>>(), vec!["AAA", "BBB"]);
        assert_eq!(snapshot.samples("AAA").unwrap(), &[1.0, 2.0]);
        assert_eq!(snapshot.samples("BBB").unwrap()[0], 3.0);
        assert!(snapshot.samples("BBB").unwrap()[1].is_nan());
    }

    #[tokio::test]
    async fn unknown_symbol_is_absent() {
        let service = MarketDataService::new(Box::new(MockMarketData::new(&[("AAA", &[1.0])])));
        let configs = vec![HoldingConfig::new("AAA"), HoldingConfig::new("NOPE")];
        let snapshot = service.fetch_snapshot(&configs, "1d", "1m").await.unwrap();
        assert_eq!(snapshot.symbols().collect::<Vec<_>>(), vec!["AAA"]);
        assert!(snapshot.samples("NOPE").is_none());
    }

    #[tokio::test]
    async fn no_symbols_no_request() {
        let provider = MockMarketData::new(&[]);
        let calls = Arc::clone(&provider.calls);
        let service = MarketDataService::new(Box::new(provider));

        let snapshot = service.fetch_snapshot(&[], "1d", "1m").await.unwrap();
        assert!(snapshot.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn provider_errors_propagate() {
        let service = MarketDataService::new(Box::new(FailingMarketData));
        let (_, configs) = aaa_bbb();
        let err = service.fetch_snapshot(&configs, "1d", "1m").await.unwrap_err();
        assert!(matches!(err, CoreError::Api { .. }));
    }
}

// ═══════════════════════════════════════════════════════════════════
// StockTracker facade
// ═══════════════════════════════════════════════════════════════════

mod facade {
    use super::*;

    fn tracker(settings: Settings) -> StockTracker {
        let provider = MockMarketData::new(&[("AAA", &[100.0, 105.0, 110.0]), ("BBB", &[50.0, 48.0, 52.0])]);
        StockTracker::with_provider(settings, Box::new(provider)).unwrap()
    }

    #[tokio::test]
    async fn full_run() {
        let tracker = tracker(Settings::default());
        let (_, configs) = aaa_bbb();

        let ledger = tracker.build_ledger(&configs).await.unwrap();
        let summary = tracker.summary(&ledger);
        assert!(close(summary.overall_gain.amount, 110.0));

        let charts = tracker.charts(&ledger).unwrap();
        assert_eq!(charts.len(), 1);
        assert_eq!(charts[0].width, 80);
    }

    #[tokio::test]
    async fn independent_mode_from_settings() {
        let settings = Settings {
            graph_mode: GraphMode::Independent,
            ..Settings::default()
        };
        let tracker = tracker(settings);
        let configs = vec![
            HoldingConfig::new("AAA").with_buy(1.0, 1.0).graphed(),
            HoldingConfig::new("BBB").with_buy(1.0, 1.0).graphed(),
        ];
        let ledger = tracker.build_ledger(&configs).await.unwrap();
        assert_eq!(tracker.charts(&ledger).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn empty_portfolio() {
        let tracker = tracker(Settings::default());
        let err = tracker.build_ledger(&[]).await.unwrap_err();
        assert!(matches!(err, CoreError::EmptyPortfolio));
    }

    #[tokio::test]
    async fn symbol_without_data() {
        let tracker = tracker(Settings::default());
        let configs = vec![HoldingConfig::new("NOPE").with_buy(1.0, 1.0)];
        let err = tracker.build_ledger(&configs).await.unwrap_err();
        assert!(matches!(err, CoreError::MissingData(_)));
    }

    #[test]
    fn invalid_settings_rejected() {
        let settings = Settings {
            timezone: "Nowhere/Special".into(),
            ..Settings::default()
        };
        let result = StockTracker::with_provider(settings, Box::new(FailingMarketData));
        assert!(matches!(result, Err(CoreError::InvalidTimezone(_))));
    }

    #[test]
    fn debug_names_provider() {
        let tracker = tracker(Settings::default());
        assert!(format!("{tracker:?}").contains("MockMarketData"));
    }
}
