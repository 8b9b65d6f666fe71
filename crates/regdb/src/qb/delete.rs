//! DELETE statement builder.

use crate::error::{DbError, DbResult};
use crate::executor::{Executor, Fetch};
use crate::sanitize::sanitize;
use crate::value::Value;

/// DELETE builder with a mandatory equality filter.
#[derive(Clone, Debug)]
pub struct DeleteQb {
    table: String,
    filter: Vec<(String, Value)>,
}

impl DeleteQb {
    /// Create a new DELETE builder.
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            filter: Vec::new(),
        }
    }

    /// Add an equality condition: `column = value` (`IS NULL` for null).
    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filter.push((column.to_string(), value.into()));
        self
    }

    /// Check the filter is non-empty before any process is spawned.
    ///
    /// Guards against accidental full-table deletion; there is no opt-out.
    pub fn validate(&self) -> DbResult<()> {
        if self.filter.is_empty() {
            return Err(DbError::MissingFilter {
                table: self.table.clone(),
                verb: "DELETE",
            });
        }
        Ok(())
    }

    /// Build the SQL string.
    pub fn to_sql(&self) -> String {
        format!(
            "DELETE FROM {} WHERE {}",
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
