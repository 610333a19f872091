// SPDX-FileCopyrightText: 2026 Wigstock Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dynamic values and rows for generic statements.
//!
//! Both backends bind [`Value`] parameters positionally and hand results back
//! as [`Row`]s. A row keeps its columns in select order under the names the
//! schema declares, so callers can address fields by name or render them in
//! order.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::WigstockError;

/// A single SQL value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Real(f) if f.fract() == 0.0 => Some(*f as i64),
            Value::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Real(f) => Some(*f),
            Value::Text(s) => s.trim().parse().ok(),
            Value::Null => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Real(f) => serializer.serialize_f64(*f),
            Value::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// An ordered field-to-value mapping for one result row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column. Column order is preserved.
    pub fn push(&mut self, name: impl Into<String>, value: Value) {
        self.columns.push((name.into(), value));
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    fn required(&self, name: &str) -> Result<&Value, WigstockError> {
        match self.get(name) {
            None => Err(WigstockError::Decode(format!("missing column `{name}`"))),
            Some(Value::Null) => Err(WigstockError::Decode(format!("column `{name}` is NULL"))),
            Some(value) => Ok(value),
        }
    }

    /// Non-null integer column.
    pub fn integer(&self, name: &str) -> Result<i64, WigstockError> {
        let value = self.required(name)?;
        value
            .as_i64()
            .ok_or_else(|| WigstockError::Decode(format!("column `{name}` is not an integer: {value:?}")))
    }

    /// Non-null, non-negative integer column that fits in a `u32`.
    pub fn count(&self, name: &str) -> Result<u32, WigstockError> {
        let raw = self.integer(name)?;
        u32::try_from(raw)
            .map_err(|_| WigstockError::Decode(format!("column `{name}` out of range: {raw}")))
    }

    /// Non-null numeric column.
    pub fn real(&self, name: &str) -> Result<f64, WigstockError> {
        let value = self.required(name)?;
        value
            .as_f64()
            .ok_or_else(|| WigstockError::Decode(format!("column `{name}` is not numeric: {value:?}")))
    }

    /// Non-null text column.
    pub fn text(&self, name: &str) -> Result<String, WigstockError> {
        match self.required(name)? {
            Value::Text(s) => Ok(s.clone()),
            other => Err(WigstockError::Decode(format!(
                "column `{name}` is not text: {other:?}"
            ))),
        }
    }

    /// Nullable text column.
    pub fn opt_text(&self, name: &str) -> Result<Option<String>, WigstockError> {
        match self.get(name) {
            None => Err(WigstockError::Decode(format!("missing column `{name}`"))),
            Some(Value::Null) => Ok(None),
            Some(Value::Text(s)) => Ok(Some(s.clone())),
            Some(other) => Err(WigstockError::Decode(format!(
                "column `{name}` is not text: {other:?}"
            ))),
        }
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in &self.columns {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
