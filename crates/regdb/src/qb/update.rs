//! UPDATE statement builder.

use crate::error::{DbError, DbResult};
use crate::executor::{Executor, Fetch};
use crate::sanitize::sanitize;
use crate::value::Value;

/// UPDATE builder: SET payload plus a mandatory equality filter.
#[derive(Clone, Debug)]
pub struct UpdateQb {
    table: String,
    set: Vec<(String, Value)>,
    filter: Vec<(String, Value)>,
}

impl UpdateQb {
    /// Create a new UPDATE builder.
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            set: Vec::new(),
            filter: Vec::new(),
        }
    }

    /// Set a column value. Null assigns the SQL NULL keyword.
    pub fn set(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.set.push((column.to_string(), value.into()));
        self
    }

    /// Add an equality condition: `column = value` (`IS NULL` for null).
    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filter.push((column.to_string(), value.into()));
        self
    }

    /// Check payload and filter before any process is spawned.
    ///
    /// The filter requirement guards against accidental full-table
    /// mutation; there is no opt-out.
    pub fn validate(&self) -> DbResult<()> {
        if self.set.is_empty() {
            return Err(DbError::EmptyPayload {
                table: self.table.clone(),
            });
        }
        if self.filter.is_empty() {
            return Err(DbError::MissingFilter {
                table: self.table.clone(),
                verb: "UPDATE",
            });
        }
        Ok(())
    }

    /// Build the SQL string.
    pub fn to_sql(&self) -> String {
        let assignments = self
            .set
            .iter()
            .map(|(column, value)| format!("{column} = {}", value.to_literal()))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "UPDATE {} SET {assignments} WHERE {}",
            self.table,
            super::render_filter(&self.filter)
        )
    }

    /// Execute and return the affected-row count.
    pub async fn execute(&self, exec: &impl Executor) -> DbResult<u64> {
        self.validate()?;
        let sql = sanitize(&self.to_sql(), &[])?;
        exec.run(&sql, Fetch::Discard).await?;
        exec.affected_rows().await
    }
}
