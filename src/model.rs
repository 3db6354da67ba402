//! Dataset API Types
//!
//! Payloads exchanged with the equipment dataset API. The client only ever
//! holds transient copies of these; the backend owns and persists them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Server-assigned dataset identifier
pub type DatasetId = i64;

/// An uploaded CSV, as returned by the dataset list endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub id: DatasetId,
    pub filename: String,
    /// ISO 8601 timestamp, kept verbatim so odd server formats still render
    pub upload_timestamp: String,
    pub total_equipment_count: u64,
    #[serde(default)]
    pub avg_flowrate: Option<Measure>,
    #[serde(default)]
    pub avg_pressure: Option<Measure>,
    #[serde(default)]
    pub avg_temperature: Option<Measure>,
}

/// A numeric reading that may arrive as a JSON number, a decimal string or null
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Measure {
    Number(f64),
    Text(String),
    #[default]
    Missing,
}

impl Measure {
    /// Numeric value, or `None` when the reading is unparseable
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Measure::Number(n) if n.is_finite() => Some(*n),
            Measure::Number(_) => None,
            Measure::Text(s) => parse_numeric(s),
            Measure::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Measure::Missing)
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Measure::Number(n) => write!(f, "{}", n),
            Measure::Text(s) => f.write_str(s),
            Measure::Missing => Ok(()),
        }
    }
}

impl From<f64> for Measure {
    fn from(value: f64) -> Self {
        Measure::Number(value)
    }
}

impl From<&str> for Measure {
    fn from(value: &str) -> Self {
        Measure::Text(value.to_string())
    }
}

/// Parse the leading decimal number of a string.
///
/// Leading whitespace is skipped and trailing garbage ignored, so `"12.5 bar"`
/// yields `12.5`. Returns `None` when no digits start the string.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|n| n.is_finite())
}

/// One row of uploaded equipment data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub equipment_name: String,
    #[serde(default)]
    pub equipment_type: String,
    #[serde(default)]
    pub flowrate: Measure,
    #[serde(default)]
    pub pressure: Measure,
    #[serde(default)]
    pub temperature: Measure,
    #[serde(default)]
    pub row_number: Option<u32>,
}

/// Equipment count (and averages) for one equipment type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeSummary {
    pub equipment_type: String,
    pub count: u64,
    #[serde(default)]
    pub avg_flowrate: Option<Measure>,
    #[serde(default)]
    pub avg_pressure: Option<Measure>,
    #[serde(default)]
    pub avg_temperature: Option<Measure>,
}

/// Full dataset payload: raw rows plus per-type aggregates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DatasetDetail {
    #[serde(default)]
    pub id: Option<DatasetId>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub upload_timestamp: Option<String>,
    #[serde(default)]
    pub total_equipment_count: Option<u64>,
    #[serde(default)]
    pub equipment_list: Vec<EquipmentRecord>,
    #[serde(default)]
    pub type_summaries: Vec<TypeSummary>,
}

/// Aggregate statistics for a dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DatasetSummary {
    pub total_count: u64,
    #[serde(default)]
    pub avg_flowrate: Option<f64>,
    #[serde(default)]
    pub avg_pressure: Option<f64>,
    #[serde(default)]
    pub avg_temperature: Option<f64>,
    #[serde(default)]
    pub equipment_type_distribution: BTreeMap<String, u64>,
    #[serde(default)]
    pub min_flowrate: Option<f64>,
    #[serde(default)]
    pub max_flowrate: Option<f64>,
    #[serde(default)]
    pub min_pressure: Option<f64>,
    #[serde(default)]
    pub max_pressure: Option<f64>,
    #[serde(default)]
    pub min_temperature: Option<f64>,
    #[serde(default)]
    pub max_temperature: Option<f64>,
}

/// Response to a successful CSV upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub dataset_id: DatasetId,
    pub filename: String,
    pub total_equipment_count: u64,
    #[serde(default)]
    pub avg_flowrate: Option<f64>,
    #[serde(default)]
    pub avg_pressure: Option<f64>,
    #[serde(default)]
    pub avg_temperature: Option<f64>,
}

/// One page of equipment rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentPage {
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub results: Vec<EquipmentRecord>,
}

impl EquipmentPage {
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

/// Equipment endpoint body: paginated envelope, or a bare list when the
/// backend has pagination disabled
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum EquipmentPageBody {
    Paged(EquipmentPage),
    Flat(Vec<EquipmentRecord>),
}

impl From<EquipmentPageBody> for EquipmentPage {
    fn from(body: EquipmentPageBody) -> Self {
        match body {
            EquipmentPageBody::Paged(page) => page,
            EquipmentPageBody::Flat(results) => EquipmentPage {
                count: results.len() as u64,
                next: None,
                previous: None,
                results,
            },
        }
    }
}

/// Account details returned alongside tokens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
}

/// Access/refresh pair issued by login and register
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access: String,
    pub refresh: String,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
}

impl RegisterRequest {
    pub fn new(username: &str, password: &str, email: Option<&str>) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            email: email.unwrap_or_default().to_string(),
        }
    }
}
