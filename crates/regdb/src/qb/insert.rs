//! INSERT statement builder.

use crate::error::{DbError, DbResult};
use crate::executor::{Executor, Fetch};
use crate::sanitize::sanitize;
use crate::value::Value;

/// INSERT builder: ordered column/value payload for one row.
#[derive(Clone, Debug)]
pub struct InsertQb {
    table: String,
    columns: Vec<String>,
    values: Vec<Value>,
}

impl InsertQb {
    /// Create a new INSERT builder.
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            columns: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Set a column value.
    pub fn set(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.columns.push(column.to_string());
        self.values.push(value.into());
        self
    }

    /// Set an optional column value (`None` => skip the column).
    pub fn set_opt(self, column: &str, value: Option<impl Into<Value>>) -> Self {
        match value {
            Some(v) => self.set(column, v),
            None => self,
        }
    }

    /// Check the payload is non-empty before any process is spawned.
    pub fn validate(&self) -> DbResult<()> {
        if self.columns.is_empty() {
            return Err(DbError::EmptyPayload {
                table: self.table.clone(),
            });
        }
        Ok(())
    }

    /// Build the SQL string.
    pub fn to_sql(&self) -> String {
        let columns = self.columns.join(", ");
        let values = self
            .values
            .iter()
            .map(Value::to_literal)
            .collect::<Vec<_>>()
            .join(", ");
        format!("INSERT INTO {} ({columns}) VALUES ({values})", self.table)
    }

    /// Execute and return the generated identifier, 0 if unavailable.
    pub async fn execute(&self, exec: &impl Executor) -> DbResult<u64> {
        self.validate()?;
        let sql = sanitize(&self.to_sql(), &[])?;
        exec.run(&sql, Fetch::Discard).await?;
        exec.last_insert_id().await
    }
}
