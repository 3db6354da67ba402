//! Terminal output of dashboard views
//!
//! Every view renders as an aligned text table, JSON or CSV.

use serde::Serialize;
use std::fmt::Write as _;
use std::str::FromStr;
use thiserror::Error;

use crate::model::{Dataset, DatasetId, DatasetSummary, EquipmentPage, EquipmentRecord};
use crate::view::history::{history_entries, history_title, EMPTY_MESSAGE};
use crate::view::table::Column;
use crate::view::{ChartSet, SummaryView};

const BAR_WIDTH: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!("unknown output format '{}'", other)),
        }
    }
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV output failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV output is not UTF-8")]
    Utf8,
}

pub type RenderResult = Result<String, RenderError>;

fn json<T: Serialize + ?Sized>(value: &T) -> RenderResult {
    Ok(serde_json::to_string_pretty(value)?)
}

fn csv_rows<I, R>(header: &[&str], rows: I) -> RenderResult
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = String>,
{
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| RenderError::Csv(e.into_error().into()))?;
    String::from_utf8(bytes).map_err(|_| RenderError::Utf8)
}

/// Left-aligned columns sized to their widest cell
fn text_table(header: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", c, width = *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    let _ = writeln!(out, "{}", line(header));
    let total: usize = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    let _ = writeln!(out, "{}", "-".repeat(total));
    for row in rows {
        let _ = writeln!(out, "{}", line(row));
    }
    out
}

pub fn render_history(
    datasets: &[Dataset],
    active: Option<DatasetId>,
    format: OutputFormat,
) -> RenderResult {
    match format {
        OutputFormat::Json => json(datasets),
        OutputFormat::Csv => csv_rows(
            &["id", "filename", "upload_timestamp", "total_equipment_count"],
            datasets.iter().map(|d| {
                vec![
                    d.id.to_string(),
                    d.filename.clone(),
                    d.upload_timestamp.clone(),
                    d.total_equipment_count.to_string(),
                ]
            }),
        ),
        OutputFormat::Table => {
            let mut out = format!("{}\n", history_title(datasets));
            if datasets.is_empty() {
                let _ = writeln!(out, "  {}", EMPTY_MESSAGE);
                return Ok(out);
            }
            for entry in history_entries(datasets, active) {
                let marker = if entry.selected { '*' } else { ' ' };
                let _ = writeln!(out, "{} [{}] {}", marker, entry.id, entry.filename);
                let _ = writeln!(out, "      {}", entry.caption);
            }
            Ok(out)
        }
    }
}

/// Equipment rows under the given headers (which may carry sort arrows)
pub fn render_equipment(
    headers: &[String],
    rows: &[EquipmentRecord],
    format: OutputFormat,
) -> RenderResult {
    match format {
        OutputFormat::Json => json(rows),
        OutputFormat::Csv => csv_rows(
            &Column::ALL.map(|c| c.key()),
            rows.iter()
                .map(|r| Column::ALL.iter().map(|c| c.display(r)).collect::<Vec<_>>()),
        ),
        OutputFormat::Table => {
            if rows.is_empty() {
                return Ok("No matching equipment\n".to_string());
            }
            let cells: Vec<Vec<String>> = rows
                .iter()
                .map(|r| Column::ALL.iter().map(|c| c.display(r)).collect())
                .collect();
            Ok(text_table(headers, &cells))
        }
    }
}

pub fn render_page(page: &EquipmentPage, number: u32, format: OutputFormat) -> RenderResult {
    match format {
        OutputFormat::Json => json(page),
        OutputFormat::Csv => render_equipment(&[], &page.results, OutputFormat::Csv),
        OutputFormat::Table => {
            let headers: Vec<String> = Column::ALL.iter().map(|c| c.label().to_string()).collect();
            let mut out = render_equipment(&headers, &page.results, OutputFormat::Table)?;
            let _ = writeln!(
                out,
                "Page {} · {} rows total{}",
                number,
                page.count,
                if page.has_next() { " · more pages" } else { "" }
            );
            Ok(out)
        }
    }
}

pub fn render_summary(summary: &DatasetSummary, format: OutputFormat) -> RenderResult {
    let view = SummaryView::from(summary);
    match format {
        OutputFormat::Json => json(summary),
        OutputFormat::Csv => csv_rows(
            &["statistic", "value"],
            view.cards
                .iter()
                .map(|c| vec![c.label.to_string(), c.value.clone()]),
        ),
        OutputFormat::Table => {
            let mut out = String::from("Summary Statistics\n");
            for card in &view.cards {
                let _ = writeln!(out, "  {:<16} {}", card.label, card.value);
            }
            if !view.ranges.is_empty() {
                let _ = writeln!(out, "Ranges");
                for range in &view.ranges {
                    let _ = writeln!(out, "  {:<16} {}", range.label, range.text());
                }
            }
            if !view.distribution.is_empty() {
                let _ = writeln!(out, "Types");
                for (kind, count) in &view.distribution {
                    let _ = writeln!(out, "  {:<16} {}", kind, count);
                }
            }
            Ok(out)
        }
    }
}

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let len = ((value / max) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(len.clamp(1, BAR_WIDTH))
}

#[derive(Serialize)]
struct ChartsJson<'a> {
    distribution: Vec<(&'a str, u64)>,
    trend: Vec<(&'a str, Option<f64>)>,
    percentages: Vec<(&'a str, f64)>,
}

pub fn render_charts(charts: &ChartSet, format: OutputFormat) -> RenderResult {
    match format {
        OutputFormat::Json => json(&ChartsJson {
            distribution: charts
                .distribution
                .iter()
                .map(|c| (c.label.as_str(), c.count))
                .collect(),
            trend: charts
                .trend
                .iter()
                .map(|p| (p.label.as_str(), p.value))
                .collect(),
            percentages: charts
                .shares
                .iter()
                .map(|s| (s.label.as_str(), s.percent))
                .collect(),
        }),
        OutputFormat::Csv => csv_rows(
            &["chart", "label", "value"],
            charts
                .distribution
                .iter()
                .map(|c| vec!["distribution".to_string(), c.label.clone(), c.count.to_string()])
                .chain(charts.trend.iter().map(|p| {
                    vec![
                        "flowrate".to_string(),
                        p.label.clone(),
                        p.value.map(|v| v.to_string()).unwrap_or_default(),
                    ]
                }))
                .chain(charts.shares.iter().map(|s| {
                    vec!["percentage".to_string(), s.label.clone(), format!("{:.1}", s.percent)]
                })),
        ),
        OutputFormat::Table => {
            let mut out = String::new();
            let max = charts.max_count() as f64;
            let _ = writeln!(out, "Equipment Type Distribution");
            for c in &charts.distribution {
                let _ = writeln!(out, "  {:<16} {:>5} {}", c.label, c.count, bar(c.count as f64, max));
            }

            let _ = writeln!(out, "Flowrate Trends");
            let top = charts.trend_bounds().map(|(_, hi)| hi).unwrap_or(0.0);
            for p in &charts.trend {
                match p.value {
                    Some(v) => {
                        let _ = writeln!(out, "  {:<16} {:>9.2} {}", p.label, v, bar(v, top));
                    }
                    None => {
                        let _ = writeln!(out, "  {:<16} {:>9}", p.label, "-");
                    }
                }
            }

            let _ = writeln!(out, "Type Percentages");
            for s in &charts.shares {
                let _ = writeln!(out, "  {:<16} {:>5.1}%", s.label, s.percent);
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Measure, TypeSummary};
    use crate::model::DatasetDetail;

    fn record(name: &str, flowrate: f64) -> EquipmentRecord {
        EquipmentRecord {
            id: None,
            equipment_name: name.to_string(),
            equipment_type: "Pump".to_string(),
            flowrate: Measure::Number(flowrate),
            pressure: Measure::from("5.2"),
            temperature: Measure::Missing,
            row_number: None,
        }
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_empty_history() {
        let out = render_history(&[], None, OutputFormat::Table).unwrap();
        assert_eq!(out, "History\n  No datasets yet\n");
    }

    #[test]
    fn test_equipment_csv() {
        let out = render_equipment(&[], &[record("P, 1", 12.5)], OutputFormat::Csv).unwrap();
        let mut lines = out.lines();
        assert_eq!(
            lines.next(),
            Some("equipment_name,equipment_type,flowrate,pressure,temperature")
        );
        assert_eq!(lines.next(), Some("\"P, 1\",Pump,12.5,5.2,"));
    }

    #[test]
    fn test_equipment_table_alignment() {
        let headers: Vec<String> = Column::ALL.iter().map(|c| c.label().to_string()).collect();
        let out = render_equipment(
            &headers,
            &[record("Pump-1", 10.0), record("P2", 2.0)],
            OutputFormat::Table,
        )
        .unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("Name    Type"));
        assert!(lines[2].starts_with("Pump-1  Pump"));
        assert!(lines[3].starts_with("P2      Pump"));
    }

    #[test]
    fn test_summary_table_placeholder() {
        let summary = DatasetSummary {
            total_count: 2,
            avg_pressure: Some(4.0),
            ..Default::default()
        };
        let out = render_summary(&summary, OutputFormat::Table).unwrap();
        assert!(out.contains("Avg Flowrate     —"));
        assert!(out.contains("Avg Pressure     4.00"));
    }

    #[test]
    fn test_charts_table_gaps() {
        let detail = DatasetDetail {
            equipment_list: vec![record("A", 10.0), {
                let mut r = record("", 0.0);
                r.flowrate = Measure::from("n/a");
                r
            }],
            type_summaries: vec![TypeSummary {
                equipment_type: "Pump".to_string(),
                count: 2,
                avg_flowrate: None,
                avg_pressure: None,
                avg_temperature: None,
            }],
            ..Default::default()
        };
        let out = render_charts(&ChartSet::from_detail(&detail), OutputFormat::Table).unwrap();
        assert!(out.contains("#2"));
        assert!(out.contains("100.0%"));
    }
}
