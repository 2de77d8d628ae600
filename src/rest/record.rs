//! Dynamically shaped AccountRight records.
//!
//! AccountRight resources have no fixed schema on the client side, so a
//! [`Record`] is an ordered map of field names to [`FieldValue`]s. Field
//! values are plain JSON, except that dates and datetimes may be stored as
//! `chrono` values; [`Record::typecast`] renders those in the
//! `YYYY-MM-DDTHH:MM:SS` form AccountRight expects.
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use myob_api::rest::Record;
//! use serde_json::json;
//!
//! let invoice = Record::new()
//!     .with("Number", "00000123")
//!     .with("Date", NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
//!
//! assert!(invoice.is_new());
//! assert_eq!(
//!     invoice.typecast(),
//!     json!({"Number": "00000123", "Date": "2024-03-01T00:00:00"})
//! );
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime, Offset, TimeZone};
use serde_json::{Map, Value};

use crate::rest::ModelError;

/// Field holding a record's unique identifier.
pub const ID_KEY: &str = "UID";

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A single field value.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    /// Any JSON value, sent unchanged.
    Json(Value),
    /// A calendar date, sent as midnight on that day.
    Date(NaiveDate),
    /// A datetime without a time zone.
    DateTime(NaiveDateTime),
    /// A datetime with a fixed offset, sent in its own local time.
    Zoned(DateTime<chrono::FixedOffset>),
}

impl FieldValue {
    /// Renders the value as JSON, formatting calendar values.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Json(value) => value.clone(),
            Self::Date(date) => Value::String(date.format("%Y-%m-%dT00:00:00").to_string()),
            Self::DateTime(datetime) => Value::String(datetime.format(DATETIME_FORMAT).to_string()),
            Self::Zoned(datetime) => {
                Value::String(datetime.naive_local().format(DATETIME_FORMAT).to_string())
            }
        }
    }

    /// Returns the JSON value, or `None` for calendar values.
    #[must_use]
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Json(Value::String(value.to_string()))
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Json(Value::String(value))
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Json(Value::Bool(value))
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Json(Value::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Json(Value::from(value))
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for FieldValue {
    fn from(value: DateTime<Tz>) -> Self {
        let offset = value.offset().fix();
        Self::Zoned(value.with_timezone(&offset))
    }
}

/// An ordered, string-keyed record.
///
/// A record is new (not yet on the server) when its `UID` is absent, null
/// or empty.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a record holding only a `UID`.
    #[must_use]
    pub fn with_id(id: impl Into<String>) -> Self {
        let id: String = id.into();
        Self::new().with(ID_KEY, id)
    }

    /// Sets a field and returns the record.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets a field, returning the previous value.
    ///
    /// An existing field keeps its position.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.fields.push((key, value));
                None
            }
        }
    }

    /// Returns the value of a field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    /// Removes a field, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        let index = self.fields.iter().position(|(existing, _)| existing == key)?;
        Some(self.fields.remove(index).1)
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Returns the record's `UID`.
    ///
    /// Null and empty-string IDs count as absent. Non-string JSON IDs are
    /// rendered as JSON text.
    #[must_use]
    pub fn id(&self) -> Option<String> {
        match self.get(ID_KEY)? {
            FieldValue::Json(Value::Null) => None,
            FieldValue::Json(Value::String(id)) if id.is_empty() => None,
            FieldValue::Json(Value::String(id)) => Some(id.clone()),
            other => Some(other.to_json().to_string()),
        }
    }

    /// Returns `true` if the record has no `UID` yet.
    #[must_use]
    pub fn is_new(&self) -> bool {
        self.id().is_none()
    }

    /// Builds the JSON object sent to AccountRight.
    ///
    /// The record itself is left untouched. Only top-level calendar values
    /// are reformatted.
    #[must_use]
    pub fn typecast(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(key, value)| (key.clone(), value.to_json()))
                .collect(),
        )
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self {
            fields: map
                .into_iter()
                .map(|(key, value)| (key, FieldValue::Json(value)))
                .collect(),
        }
    }
}

impl TryFrom<Value> for Record {
    type Error = ModelError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self::from(map)),
            _ => Err(ModelError::UnexpectedShape {
                operation: "record",
                expected: "a JSON object",
            }),
        }
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}
