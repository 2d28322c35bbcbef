use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::errors::CoreError;

/// A single price sample (timestamp → open price).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

/// One instrument's ordered price samples.
///
/// Built once from a fetched snapshot and immutable afterwards. Samples are
/// chronological: index 0 is the opening sample, the last index is the most
/// recent one. Non-finite samples are repaired at construction so that the
/// table statistics and the chart see identical data. Gaps the repair could
/// not fill are skipped by the statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: String,
    samples: Vec<f64>,
}

impl PriceSeries {
    /// Build a series from raw feed samples, repairing gaps.
    ///
    /// Fails with `MissingData` only when there is no finite sample at all.
    /// Leading gaps the single repair pass cannot fill are kept as they are
    /// and skipped by the statistics and the chart.
    pub fn new(symbol: impl Into<String>, mut samples: Vec<f64>) -> Result<Self, CoreError> {
        let symbol = symbol.into();
        if !samples.iter().any(|s| s.is_finite()) {
            return Err(CoreError::MissingData(format!(
                "no samples returned for {symbol}"
            )));
        }

        let repaired = repair_non_finite(&mut samples);
        if repaired > 0 {
            tracing::debug!(symbol = %symbol, repaired, "filled non-finite samples from neighbours");
        }

        let unfilled = samples.iter().filter(|s| !s.is_finite()).count();
        if unfilled > 0 {
            tracing::warn!(symbol = %symbol, unfilled, "leading samples could not be repaired");
        }

        Ok(Self { symbol, samples })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// All samples in order, including any leading gaps left by the repair pass.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    fn finite(&self) -> impl DoubleEndedIterator<Item = f64> + '_ {
        self.samples.iter().copied().filter(|s| s.is_finite())
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// First usable sample.
    pub fn open(&self) -> f64 {
        self.finite().next().unwrap_or(f64::NAN)
    }

    /// Most recent usable sample.
    pub fn current(&self) -> f64 {
        self.finite().next_back().unwrap_or(f64::NAN)
    }

    pub fn min(&self) -> f64 {
        self.finite().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.finite().fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn mean(&self) -> f64 {
        let (sum, count) = self.finite().fold((0.0, 0usize), |(sum, n), s| (sum + s, n + 1));
        sum / count as f64
    }
}

/// Fill non-finite samples from their neighbours, in place.
///
/// Single left-to-right pass: a bad sample at `i` takes `samples[i - 1]` when
/// that exists and is finite, otherwise `samples[i + 1]`. This is a nearest
/// neighbour fill, not interpolation, and a run of bad leading samples can
/// survive the pass. Returns the number of samples that were visited.
pub fn repair_non_finite(samples: &mut [f64]) -> usize {
    let mut visited = 0;
    for i in 0..samples.len() {
        if samples[i].is_finite() {
            continue;
        }
        visited += 1;

        let prev = i.checked_sub(1).map(|p| samples[p]).filter(|v| v.is_finite());
        let replacement = match prev {
            Some(v) => Some(v),
            None => samples.get(i + 1).copied(),
        };
        if let Some(v) = replacement {
            samples[i] = v;
        }
    }
    visited
}

/// The result of one batch fetch: every requested symbol's samples on a
/// shared, chronologically sorted timestamp grid.
///
/// Symbols keep the order they were inserted in. A symbol with no quote at
/// a grid timestamp carries `NaN` there, which `PriceSeries::new` repairs
/// where it can. A symbol whose quotes start late keeps leading gaps, so its
/// samples still line up with the others on the chart.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketSnapshot {
    entries: Vec<(String, Vec<f64>)>,
}

impl MarketSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge per-symbol quote lists onto the union of their timestamps.
    ///
    /// Symbols with an empty quote list are left out entirely so that the
    /// ledger reports them as missing rather than as an all-`NaN` series.
    pub fn align(per_symbol: Vec<(String, Vec<PricePoint>)>) -> Self {
        let grid: BTreeSet<DateTime<Utc>> = per_symbol
            .iter()
            .flat_map(|(_, points)| points.iter().map(|p| p.timestamp))
            .collect();
        let timestamps: Vec<DateTime<Utc>> = grid.into_iter().collect();
        let index: HashMap<DateTime<Utc>, usize> = timestamps
            .iter()
            .enumerate()
            .map(|(i, ts)| (*ts, i))
            .collect();

        let entries = per_symbol
            .into_iter()
            .filter(|(_, points)| !points.is_empty())
            .map(|(symbol, points)| {
                let mut samples = vec![f64::NAN; timestamps.len()];
                for point in points {
                    samples[index[&point.timestamp]] = point.price;
                }
                (symbol, samples)
            })
            .collect();

        Self { entries }
    }

    /// Aligned samples for a symbol, if the fetch returned any.
    pub fn samples(&self, symbol: &str) -> Option<&[f64]> {
        self.entries
            .iter()
            .find(|(s, _)| s == symbol)
            .map(|(_, samples)| samples.as_slice())
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(s, _)| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
