// src/analysis/summary.rs

use serde::{Serialize, Deserialize};
use statrs::statistics::Statistics;
use tracing::debug;

use crate::analysis::runner::TrialTable;
use crate::analysis::trial::TrialColumn;
use crate::config::RiskDriver;

/// Minimum |r| for a column to appear in the sensitivity ranking.
pub const SENSITIVITY_THRESHOLD: f64 = 0.1;
/// Minimum |r| for a risk driver to be flagged as highest impact.
pub const HIGH_IMPACT_THRESHOLD: f64 = 0.2;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct PercentileSummary {
    pub median: f64,
    pub p80: f64,
    pub p90: f64,
}

impl PercentileSummary {
    /// Empty input yields all zeros.
    pub fn from_values(values: &[f64]) -> Self {
        let sorted = sorted_without_nan(values);

        Self {
            median: sorted_quantile(&sorted, 0.5).unwrap_or(0.0),
            p80: sorted_quantile(&sorted, 0.8).unwrap_or(0.0),
            p90: sorted_quantile(&sorted, 0.9).unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SensitivityEntry {
    pub driver: TrialColumn,
    pub correlation: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummaryReport {
    pub trial_count: usize,
    pub tco_total: PercentileSummary,
    pub duration_months: PercentileSummary,
    pub median_scope: f64,
    pub median_profit: f64,
    pub median_profit_margin: f64,
    pub probability_of_profit: f64,
    pub sensitivity: Vec<SensitivityEntry>,
    pub highest_impact_risks: Vec<RiskDriver>,
}

impl SummaryReport {
    pub fn from_table(table: &TrialTable) -> Self {
        let profitable = table.iter().filter(|r| r.profit > 0.0).count();
        let probability_of_profit = if table.is_empty() {
            0.0
        } else {
            profitable as f64 / table.len() as f64
        };

        let correlations = tco_correlations(table);
        let report = Self {
            trial_count: table.len(),
            tco_total: PercentileSummary::from_values(&table.column(TrialColumn::TcoTotal)),
            duration_months: PercentileSummary::from_values(&table.column(TrialColumn::DurationMonths)),
            median_scope: quantile(&table.column(TrialColumn::ScopeSp), 0.5).unwrap_or(0.0),
            median_profit: quantile(&table.column(TrialColumn::Profit), 0.5).unwrap_or(0.0),
            median_profit_margin: quantile(&table.column(TrialColumn::ProfitMarginPct), 0.5)
                .unwrap_or(0.0),
            probability_of_profit,
            sensitivity: rank_sensitivity(&correlations),
            highest_impact_risks: highest_impact_risks(&correlations),
        };

        debug!(
            trials = report.trial_count,
            drivers = report.sensitivity.len(),
            "summary computed"
        );
        report
    }
}

/// Linear-interpolation quantile over unsorted values. NaNs are ignored.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    sorted_quantile(&sorted_without_nan(values), q)
}

fn sorted_without_nan(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

fn sorted_quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }

    let rank = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;

    let (lo, hi) = (sorted[lower], sorted[upper]);
    if lo == hi || fraction == 0.0 {
        return Some(lo);
    }
    Some((lo + (hi - lo) * fraction).clamp(lo, hi))
}

/// Sample Pearson correlation. Undefined (None) when either series is
/// constant, shorter than two values, or the lengths differ.
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    if is_constant(x) || is_constant(y) {
        return None;
    }

    let x_std = x.std_dev();
    let y_std = y.std_dev();
    if !(x_std > 0.0 && y_std > 0.0) {
        return None;
    }

    let r = x.covariance(y) / (x_std * y_std);
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}

fn is_constant(values: &[f64]) -> bool {
    values.iter().all(|v| *v == values[0])
}

/// Correlation of every other column against total cost of ownership.
fn tco_correlations(table: &TrialTable) -> Vec<(TrialColumn, Option<f64>)> {
    let tco = table.column(TrialColumn::TcoTotal);

    TrialColumn::ALL.iter()
        .filter(|column| **column != TrialColumn::TcoTotal)
        .map(|column| (*column, pearson_correlation(&table.column(*column), &tco)))
        .collect()
}

fn rank_sensitivity(correlations: &[(TrialColumn, Option<f64>)]) -> Vec<SensitivityEntry> {
    let mut ranked: Vec<SensitivityEntry> = correlations.iter()
        .filter_map(|(column, r)| r.map(|correlation| SensitivityEntry {
            driver: *column,
            correlation,
        }))
        .filter(|entry| entry.correlation.abs() > SENSITIVITY_THRESHOLD)
        .collect();

    ranked.sort_by(|a, b| b.correlation.abs().total_cmp(&a.correlation.abs()));
    ranked
}

fn highest_impact_risks(correlations: &[(TrialColumn, Option<f64>)]) -> Vec<RiskDriver> {
    RiskDriver::ALL.iter()
        .copied()
        .filter(|driver| {
            let column = TrialColumn::from(*driver);
            correlations.iter()
                .find(|(c, _)| *c == column)
                .and_then(|(_, r)| *r)
                .map_or(false, |r| r.abs() > HIGH_IMPACT_THRESHOLD)
        })
        .collect()
}
