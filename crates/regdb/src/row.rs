//! Decoded rows and typed mapping.

use std::str::FromStr;
use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{DbError, DbResult};

/// One decoded result row: an ordered mapping from column name to the
/// textual value the client printed for it.
///
/// All values are text; the batch output of the command-line client
/// carries no type information. `NULL` cells hold the literal text
/// `NULL`; use [`Row::get_nullable`] to see them as `None`. Column order
/// follows the decoded header; the header itself is shared across all
/// rows of one result set.
#[derive(Clone, Debug)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<String>,
}

impl Row {
    pub(crate) fn new(columns: Arc<[String]>, values: Vec<String>) -> Self {
        Self { columns, values }
    }

    /// Column names in header order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Cell values in header order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get a cell by column name.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| self.values[i].as_str())
    }

    /// Get a cell by column name, mapping the client's `NULL` marker to `None`.
    pub fn get_nullable(&self, column: &str) -> Option<&str> {
        self.get(column).filter(|v| *v != "NULL")
    }

    /// Get a cell and parse it into `T`.
    ///
    /// Returns [`DbError::Decode`] if the column is missing or the text
    /// does not parse. Numeric and boolean interpretation of the textual
    /// cells is the caller's concern; this is the hook for it.
    pub fn get_parsed<T: FromStr>(&self, column: &str) -> DbResult<T>
    where
        T::Err: std::fmt::Display,
    {
        let raw = self
            .get(column)
            .ok_or_else(|| DbError::decode(column, "column not present in result"))?;
        raw.parse::<T>()
            .map_err(|e| DbError::decode(column, format!("cannot parse {raw:?}: {e}")))
    }

    /// Get a nullable cell and parse it into `Option<T>`.
    pub fn get_parsed_opt<T: FromStr>(&self, column: &str) -> DbResult<Option<T>>
    where
        T::Err: std::fmt::Display,
    {
        match self.get_nullable(column) {
            None => Ok(None),
            Some(raw) => raw
                .parse::<T>()
                .map(Some)
                .map_err(|e| DbError::decode(column, format!("cannot parse {raw:?}: {e}"))),
        }
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (column, value) in self.columns.iter().zip(&self.values) {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// Trait for mapping a decoded [`Row`] into a typed struct.
///
/// # Example
///
/// ```ignore
/// struct Student {
///     student_id: String,
///     credits: i64,
/// }
///
/// impl FromRow for Student {
///     fn from_row(row: &Row) -> DbResult<Self> {
///         Ok(Self {
///             student_id: row.get_parsed("student_id")?,
///             credits: row.get_parsed("credits")?,
///         })
///     }
/// }
/// ```
pub trait FromRow: Sized {
    /// Build `Self` from a decoded row.
    fn from_row(row: &Row) -> DbResult<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Row {
        let columns: Arc<[String]> = vec![
            "student_id".to_string(),
            "name".to_string(),
            "advisor".to_string(),
        ]
        .into();
        Row::new(
            columns,
            vec!["S1".to_string(), "Alice".to_string(), "NULL".to_string()],
        )
    }

    #[test]
    fn get_by_name() {
        let row = sample();
        assert_eq!(row.get("name"), Some("Alice"));
        assert_eq!(row.get("missing"), None);
    }

    #[test]
    fn null_marker_maps_to_none() {
        let row = sample();
        assert_eq!(row.get("advisor"), Some("NULL"));
        assert_eq!(row.get_nullable("advisor"), None);
        assert_eq!(row.get_nullable("name"), Some("Alice"));
    }

    #[test]
    fn get_parsed_reads_numbers() {
        let columns: Arc<[String]> = vec!["credits".to_string()].into();
        let row = Row::new(columns, vec!["18".to_string()]);
        assert_eq!(row.get_parsed::<i64>("credits").unwrap(), 18);
    }

    #[test]
    fn get_parsed_reports_column() {
        let row = sample();
        let err = row.get_parsed::<i64>("name").unwrap_err();
        match err {
            DbError::Decode { column, .. } => assert_eq!(column, "name"),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn get_parsed_opt_handles_null() {
        let row = sample();
        assert_eq!(row.get_parsed_opt::<String>("advisor").unwrap(), None);
    }

    #[test]
    fn serializes_as_object() {
        let row = sample();
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["student_id"], "S1");
        assert_eq!(json["name"], "Alice");
    }
}
