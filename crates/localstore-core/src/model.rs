//! Data shapes returned by the embedded store
//!
//! `ResultSet` mirrors what the engine's read path yields: ordered column
//! names plus ordered rows of cell values. `Item` is the one entity this
//! system manages, derived from a result set by zipping column names to row
//! values positionally.

use crate::errors::LocalStoreError;
use serde::Serialize;

/// A single cell value, also used for positional statement parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl SqlValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Integer(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Real(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(v: Vec<u8>) -> Self {
        SqlValue::Blob(v)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(SqlValue::Null)
    }
}

/// Output of one row-producing statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSet {
    /// Column names in statement order
    pub columns: Vec<String>,
    /// Rows in the order the engine returned them
    pub values: Vec<Vec<SqlValue>>,
}

impl ResultSet {
    /// Zip column names to each row's values, preserving both orders
    pub fn records(&self) -> impl Iterator<Item = Vec<(&str, &SqlValue)>> + '_ {
        self.values.iter().map(|row| {
            self.columns
                .iter()
                .map(String::as_str)
                .zip(row.iter())
                .collect()
        })
    }
}

/// A named item with a store-assigned identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    pub id: i64,
    pub name: String,
}

impl Item {
    /// Build an item from a zipped record
    ///
    /// Requires an integer `id` and a text `name`; extra columns are ignored.
    pub fn from_record(record: &[(&str, &SqlValue)]) -> Result<Self, LocalStoreError> {
        let lookup = |column: &str| {
            record
                .iter()
                .find(|(name, _)| *name == column)
                .map(|(_, value)| *value)
        };

        let id = lookup("id")
            .and_then(SqlValue::as_i64)
            .ok_or_else(|| LocalStoreError::MalformedRow {
                reason: "missing integer column 'id'".to_string(),
            })?;
        let name = lookup("name")
            .and_then(SqlValue::as_str)
            .ok_or_else(|| LocalStoreError::MalformedRow {
                reason: format!("item {} has no text column 'name'", id),
            })?;

        Ok(Self {
            id,
            name: name.to_string(),
        })
    }

    /// Derive the full item list from a read of the items table
    ///
    /// An empty slice of result sets (no rows) yields an empty list.
    pub fn list_from_results(results: &[ResultSet]) -> Result<Vec<Self>, LocalStoreError> {
        let Some(first) = results.first() else {
            return Ok(Vec::new());
        };
        first
            .records()
            .map(|record| Item::from_record(&record))
            .collect()
    }
}

impl std::fmt::Display for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (id: {})", self.name, self.id)
    }
}
