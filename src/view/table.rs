//! Equipment table transforms
//!
//! The table shows rows in three steps: substring filter on name and type,
//! then an optional single-column sort. Nothing here mutates the fetched
//! rows; every step returns a new list of references.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::model::{parse_numeric, EquipmentRecord};

/// Sortable table column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Name,
    Type,
    Flowrate,
    Pressure,
    Temperature,
}

impl Column {
    /// Columns in display order
    pub const ALL: [Column; 5] = [
        Column::Name,
        Column::Type,
        Column::Flowrate,
        Column::Pressure,
        Column::Temperature,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Column::Name => "Name",
            Column::Type => "Type",
            Column::Flowrate => "Flowrate",
            Column::Pressure => "Pressure",
            Column::Temperature => "Temperature",
        }
    }

    /// Field name in the API payload
    pub fn key(&self) -> &'static str {
        match self {
            Column::Name => "equipment_name",
            Column::Type => "equipment_type",
            Column::Flowrate => "flowrate",
            Column::Pressure => "pressure",
            Column::Temperature => "temperature",
        }
    }

    /// Cell text as displayed
    pub fn display(&self, record: &EquipmentRecord) -> String {
        match self {
            Column::Name => record.equipment_name.clone(),
            Column::Type => record.equipment_type.clone(),
            Column::Flowrate => record.flowrate.to_string(),
            Column::Pressure => record.pressure.to_string(),
            Column::Temperature => record.temperature.to_string(),
        }
    }

    fn numeric(&self, record: &EquipmentRecord) -> Option<f64> {
        match self {
            Column::Name => parse_numeric(&record.equipment_name),
            Column::Type => parse_numeric(&record.equipment_type),
            Column::Flowrate => record.flowrate.as_f64(),
            Column::Pressure => record.pressure.as_f64(),
            Column::Temperature => record.temperature.as_f64(),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Column {
    type Err = String;

    /// Accepts the label, the payload key, or the short name (`name`, `type`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Column::ALL
            .into_iter()
            .find(|c| wanted == c.label().to_lowercase() || wanted == c.key())
            .ok_or_else(|| {
                format!(
                    "unknown column '{}' (expected one of: name, type, flowrate, pressure, temperature)",
                    s
                )
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Header indicator
    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "↑",
            SortDirection::Descending => "↓",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub column: Column,
    pub direction: SortDirection,
}

/// Filter text plus sort state of one table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableQuery {
    filter: String,
    sort: Option<SortState>,
}

impl TableQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Replace the filter text. The sort state is left alone.
    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
    }

    pub fn sort(&self) -> Option<SortState> {
        self.sort
    }

    /// Header click: a new column sorts ascending, the same column flips
    pub fn toggle_sort(&mut self, column: Column) {
        self.sort = Some(match self.sort {
            Some(current) if current.column == column => SortState {
                column,
                direction: current.direction.flip(),
            },
            _ => SortState {
                column,
                direction: SortDirection::Ascending,
            },
        });
    }

    /// Arrow for a column header, if that column is sorted
    pub fn indicator(&self, column: Column) -> Option<&'static str> {
        self.sort
            .filter(|s| s.column == column)
            .map(|s| s.direction.arrow())
    }

    pub fn header(&self, column: Column) -> String {
        match self.indicator(column) {
            Some(arrow) => format!("{} {}", column.label(), arrow),
            None => column.label().to_string(),
        }
    }

    /// Visible rows, in display order
    pub fn apply<'a>(&self, records: &'a [EquipmentRecord]) -> Vec<&'a EquipmentRecord> {
        let filtered = filter_records(records.iter(), &self.filter);
        match self.sort {
            Some(sort) => sort_records(filtered, sort),
            None => filtered,
        }
    }
}

/// Case-insensitive substring match against name or type. An empty filter
/// keeps every row.
pub fn filter_records<'a>(
    records: impl IntoIterator<Item = &'a EquipmentRecord>,
    filter: &str,
) -> Vec<&'a EquipmentRecord> {
    if filter.is_empty() {
        return records.into_iter().collect();
    }

    let needle = filter.to_lowercase();
    records
        .into_iter()
        .filter(|r| {
            r.equipment_name.to_lowercase().contains(&needle)
                || r.equipment_type.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Numeric when both cells parse, otherwise lexicographic on the displayed text
pub fn compare(a: &EquipmentRecord, b: &EquipmentRecord, column: Column) -> Ordering {
    match (column.numeric(a), column.numeric(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        _ => column.display(a).cmp(&column.display(b)),
    }
}

/// Stable sort on one column
pub fn sort_records<'a>(
    records: Vec<&'a EquipmentRecord>,
    sort: SortState,
) -> Vec<&'a EquipmentRecord> {
    merge_sort(records, &|a, b| {
        let ord = compare(a, b, sort.column);
        match sort.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    })
}

// Mixed numeric/text columns do not form a total order, which the slice
// sorts may reject at runtime. A plain merge sort only needs "is b before a".
fn merge_sort<'a, F>(mut items: Vec<&'a EquipmentRecord>, cmp: &F) -> Vec<&'a EquipmentRecord>
where
    F: Fn(&EquipmentRecord, &EquipmentRecord) -> Ordering,
{
    if items.len() <= 1 {
        return items;
    }

    let right = items.split_off(items.len() / 2);
    let left = merge_sort(items, cmp);
    let right = merge_sort(right, cmp);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    while let (Some(l), Some(r)) = (left.peek(), right.peek()) {
        // Ties keep the left element first
        if cmp(r, l) == Ordering::Less {
            merged.extend(right.next());
        } else {
            merged.extend(left.next());
        }
    }
    merged.extend(left);
    merged.extend(right);
    merged
}
