//! Primitive report values and the normalisation rules applied while
//! flattening database rows.

use std::{collections::BTreeMap, fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::{Deserialize, Serialize, ser::SerializeMap};
use uuid::Uuid;

use super::CustomReportError;

/// A single cell of a flattened report row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlatValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FlatValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// Cell text for delimited exports; null becomes an empty cell
impl fmt::Display for FlatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<String> for FlatValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for FlatValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<bool> for FlatValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for FlatValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<Uuid> for FlatValue {
    fn from(value: Uuid) -> Self {
        Self::Text(value.to_string())
    }
}

impl<T: Into<FlatValue>> From<Option<T>> for FlatValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Date-only fields keep just the `YYYY-MM-DD` part
pub fn date(value: NaiveDate) -> FlatValue {
    FlatValue::Text(value.format("%Y-%m-%d").to_string())
}

/// Timestamps keep full ISO 8601 precision in UTC
pub fn timestamp(value: DateTime<Utc>) -> FlatValue {
    FlatValue::Text(value.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Arbitrary-precision decimals stored as text become floats
pub fn decimal(field: &'static str, raw: &str) -> Result<FlatValue, CustomReportError> {
    let invalid = || CustomReportError::InvalidDecimal {
        field,
        value: raw.to_string(),
    };
    let parsed = Decimal::from_str(raw.trim()).map_err(|_| invalid())?;
    parsed.to_f64().map(FlatValue::Number).ok_or_else(invalid)
}

pub fn optional_decimal(
    field: &'static str,
    raw: Option<&str>,
) -> Result<FlatValue, CustomReportError> {
    raw.map_or(Ok(FlatValue::Null), |raw| decimal(field, raw))
}

/// String arrays are joined with `", "`
pub fn joined(values: &[String]) -> FlatValue {
    FlatValue::Text(values.join(", "))
}

/// `"{first} {last}"`, trimmed; falls back to the email when both are blank
pub fn display_name(first: Option<&str>, last: Option<&str>, email: Option<&str>) -> FlatValue {
    let full = format!("{} {}", first.unwrap_or_default(), last.unwrap_or_default());
    let full = full.trim();
    if full.is_empty() {
        email.into()
    } else {
        full.into()
    }
}

/// One flattened record keyed by bare field name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatRow {
    values: BTreeMap<&'static str, FlatValue>,
}

impl FlatRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &'static str, value: impl Into<FlatValue>) -> Self {
        self.values.insert(field, value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&FlatValue> {
        self.values.get(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.keys().copied()
    }

    /// Keep exactly `columns`, in order; absent fields become null
    pub fn project(&self, columns: &[&'static str]) -> ReportRecord {
        let values = columns
            .iter()
            .map(|column| {
                let value = self.get(column).cloned().unwrap_or(FlatValue::Null);
                (*column, value)
            })
            .collect();
        ReportRecord { values }
    }
}

/// A projected row whose keys follow the requested column order
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRecord {
    values: Vec<(&'static str, FlatValue)>,
}

impl ReportRecord {
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.iter().map(|(key, _)| *key)
    }

    pub fn values(&self) -> impl Iterator<Item = &FlatValue> {
        self.values.iter().map(|(_, value)| value)
    }

    pub fn get(&self, key: &str) -> Option<&FlatValue> {
        self.values
            .iter()
            .find_map(|(k, value)| (*k == key).then_some(value))
    }
}

impl Serialize for ReportRecord {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (key, value) in &self.values {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
