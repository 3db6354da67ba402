//! Chart projections of a dataset
//!
//! Read-only views over the dataset payload. The browser draws them on a
//! canvas, the terminal prints them as bars.

use crate::model::{DatasetDetail, EquipmentRecord, TypeSummary};

/// One bar of the type distribution
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryCount {
    pub label: String,
    pub count: u64,
}

/// One point of the flowrate trend; `None` is drawn as a gap
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub label: String,
    pub value: Option<f64>,
}

/// One pie slice
#[derive(Debug, Clone, PartialEq)]
pub struct Share {
    pub label: String,
    pub count: u64,
    pub percent: f64,
}

/// Everything the charts panel draws
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartSet {
    pub distribution: Vec<CategoryCount>,
    pub trend: Vec<TrendPoint>,
    pub shares: Vec<Share>,
}

impl ChartSet {
    pub fn from_detail(detail: &DatasetDetail) -> Self {
        let distribution = type_distribution(&detail.type_summaries);
        let shares = percentage_breakdown(&distribution);
        Self {
            distribution,
            trend: flowrate_trend(&detail.equipment_list),
            shares,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.distribution.is_empty() && self.trend.is_empty()
    }

    /// Largest bar, for scaling
    pub fn max_count(&self) -> u64 {
        self.distribution.iter().map(|c| c.count).max().unwrap_or(0)
    }

    /// Min and max of the plotted trend values
    pub fn trend_bounds(&self) -> Option<(f64, f64)> {
        self.trend
            .iter()
            .filter_map(|p| p.value)
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Type counts in server order
pub fn type_distribution(summaries: &[TypeSummary]) -> Vec<CategoryCount> {
    summaries
        .iter()
        .map(|s| CategoryCount {
            label: s.equipment_type.clone(),
            count: s.count,
        })
        .collect()
}

/// Flowrate per row in list order, labelled by name or `#<position>`
pub fn flowrate_trend(records: &[EquipmentRecord]) -> Vec<TrendPoint> {
    records
        .iter()
        .enumerate()
        .map(|(i, r)| TrendPoint {
            label: if r.equipment_name.is_empty() {
                format!("#{}", i + 1)
            } else {
                r.equipment_name.clone()
            },
            value: r.flowrate.as_f64(),
        })
        .collect()
}

/// Share of each category; every share is 0% when the total is zero
pub fn percentage_breakdown(distribution: &[CategoryCount]) -> Vec<Share> {
    let total: u64 = distribution.iter().map(|c| c.count).sum();
    distribution
        .iter()
        .map(|c| Share {
            label: c.label.clone(),
            count: c.count,
            percent: if total == 0 {
                0.0
            } else {
                c.count as f64 * 100.0 / total as f64
            },
        })
        .collect()
}
