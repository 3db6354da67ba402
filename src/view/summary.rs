//! Summary statistic cards

use crate::model::DatasetSummary;

/// Shown in place of a missing statistic
pub const PLACEHOLDER: &str = "—";

/// Two decimals, or the placeholder for null
pub fn format_average(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.2}", v),
        _ => PLACEHOLDER.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatCard {
    pub label: &'static str,
    pub value: String,
}

/// Observed min–max of one measurement
#[derive(Debug, Clone, PartialEq)]
pub struct RangeLine {
    pub label: &'static str,
    pub min: String,
    pub max: String,
}

impl RangeLine {
    pub fn text(&self) -> String {
        format!("{} – {}", self.min, self.max)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryView {
    pub cards: Vec<StatCard>,
    pub ranges: Vec<RangeLine>,
    pub distribution: Vec<(String, u64)>,
}

impl From<&DatasetSummary> for SummaryView {
    fn from(summary: &DatasetSummary) -> Self {
        let cards = vec![
            StatCard {
                label: "Total Count",
                value: summary.total_count.to_string(),
            },
            StatCard {
                label: "Avg Flowrate",
                value: format_average(summary.avg_flowrate),
            },
            StatCard {
                label: "Avg Pressure",
                value: format_average(summary.avg_pressure),
            },
            StatCard {
                label: "Avg Temperature",
                value: format_average(summary.avg_temperature),
            },
        ];

        let ranges = [
            ("Flowrate", summary.min_flowrate, summary.max_flowrate),
            ("Pressure", summary.min_pressure, summary.max_pressure),
            ("Temperature", summary.min_temperature, summary.max_temperature),
        ]
        .into_iter()
        .filter(|(_, min, max)| min.is_some() || max.is_some())
        .map(|(label, min, max)| RangeLine {
            label,
            min: format_average(min),
            max: format_average(max),
        })
        .collect();

        Self {
            cards,
            ranges,
            distribution: summary
                .equipment_type_distribution
                .iter()
                .map(|(k, v)| (k.clone(), *v))
                .collect(),
        }
    }
}
