//! Recent dataset list

use chrono::{DateTime, Local, NaiveDateTime};

use crate::model::{Dataset, DatasetId};

pub const HISTORY_TITLE: &str = "Recent Datasets (last 5)";
pub const EMPTY_TITLE: &str = "History";
pub const EMPTY_MESSAGE: &str = "No datasets yet";

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub id: DatasetId,
    pub filename: String,
    /// `<local timestamp> · <n> equipment`
    pub caption: String,
    pub selected: bool,
}

/// Panel title for the given list
pub fn history_title(datasets: &[Dataset]) -> &'static str {
    if datasets.is_empty() {
        EMPTY_TITLE
    } else {
        HISTORY_TITLE
    }
}

/// Entries in server order, marking the selected one
pub fn history_entries(datasets: &[Dataset], selected: Option<DatasetId>) -> Vec<HistoryEntry> {
    datasets
        .iter()
        .map(|d| HistoryEntry {
            id: d.id,
            filename: d.filename.clone(),
            caption: format!(
                "{} · {} equipment",
                format_timestamp(&d.upload_timestamp),
                d.total_equipment_count
            ),
            selected: selected == Some(d.id),
        })
        .collect()
}

/// Render an ISO 8601 timestamp in local time. Offset-less values are taken
/// as already local; anything unparseable is returned verbatim.
pub fn format_timestamp(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&Local).format(DISPLAY_FORMAT).to_string();
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive.format(DISPLAY_FORMAT).to_string();
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(id: DatasetId, timestamp: &str) -> Dataset {
        Dataset {
            id,
            filename: format!("batch_{}.csv", id),
            upload_timestamp: timestamp.to_string(),
            total_equipment_count: 15,
            avg_flowrate: None,
            avg_pressure: None,
            avg_temperature: None,
        }
    }

    #[test]
    fn test_empty_history() {
        assert_eq!(history_title(&[]), "History");
        assert!(history_entries(&[], None).is_empty());
    }

    #[test]
    fn test_entries_mark_selection() {
        let datasets = vec![
            dataset(2, "2025-01-05T10:00:00"),
            dataset(1, "2025-01-04T09:30:00.250"),
        ];
        let entries = history_entries(&datasets, Some(1));

        assert_eq!(history_title(&datasets), "Recent Datasets (last 5)");
        assert!(!entries[0].selected);
        assert!(entries[1].selected);
        assert_eq!(entries[0].caption, "2025-01-05 10:00:00 · 15 equipment");
        assert_eq!(entries[1].caption, "2025-01-04 09:30:00 · 15 equipment");
    }

    #[test]
    fn test_format_timestamp_converts_offsets() {
        let raw = "2025-01-05T10:00:00+00:00";
        let expected = DateTime::parse_from_rfc3339(raw)
            .unwrap()
            .with_timezone(&Local)
            .format(DISPLAY_FORMAT)
            .to_string();
        assert_eq!(format_timestamp(raw), expected);
        assert_eq!(format_timestamp("yesterday"), "yesterday");
    }
}
