//! SELECT statement builder.

use crate::decode;
use crate::error::{DbError, DbResult};
use crate::executor::{Executor, Fetch};
use crate::row::{FromRow, Row};
use crate::sanitize::sanitize;
use crate::value::Value;

/// SELECT builder: projection, equality filter, raw joins, ordering, limit.
#[derive(Clone, Debug)]
pub struct SelectQb {
    table: String,
    /// Projection columns; empty means `*`.
    columns: Vec<String>,
    /// Raw join clauses, appended in order after the table.
    joins: Vec<String>,
    /// Equality filter pairs, `AND`-joined in insertion order.
    filter: Vec<(String, Value)>,
    order_by: Option<String>,
    limit: Option<u64>,
}

impl SelectQb {
    /// Create a new SELECT builder.
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            columns: Vec::new(),
            joins: Vec::new(),
            filter: Vec::new(),
            order_by: None,
            limit: None,
        }
    }

    /// Set the projection columns.
    pub fn columns(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| (*c).to_string()).collect();
        self
    }

    /// Append one projection column.
    pub fn column(mut self, column: &str) -> Self {
        self.columns.push(column.to_string());
        self
    }

    /// Append a raw join clause, e.g. `"LEFT JOIN courses c ON c.id = e.course_id"`.
    pub fn join(mut self, clause: &str) -> Self {
        self.joins.push(clause.to_string());
        self
    }

    /// Add an equality condition: `column = value` (`IS NULL` for null).
    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filter.push((column.to_string(), value.into()));
        self
    }

    /// Set the ORDER BY expression.
    pub fn order_by(mut self, expr: &str) -> Self {
        self.order_by = Some(expr.to_string());
        self
    }

    /// Set the LIMIT.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Build the SQL string.
    pub fn to_sql(&self) -> String {
        let columns = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns.join(", ")
        };

        let mut sql = format!("SELECT {columns} FROM {}", self.table);
        for join in &self.joins {
            sql.push(' ');
            sql.push_str(join);
        }
        if !self.filter.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&super::render_filter(&self.filter));
        }
        if let Some(order) = &self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        sql
    }

    /// Execute and return all rows. An empty result is `Ok(vec![])`.
    pub async fn fetch_all(&self, exec: &impl Executor) -> DbResult<Vec<Row>> {
        let sql = sanitize(&self.to_sql(), &[])?;
        let out = exec.run(&sql, Fetch::Rows).await?;
        Ok(decode::rows(&out))
    }

    /// Execute and return at most one row.
    pub async fn fetch_opt(&self, exec: &impl Executor) -> DbResult<Option<Row>> {
        Ok(self.fetch_all(exec).await?.into_iter().next())
    }

    /// Execute and return the first row, or [`DbError::NotFound`].
    pub async fn fetch_one(&self, exec: &impl Executor) -> DbResult<Row> {
        self.fetch_opt(exec)
            .await?
            .ok_or_else(|| DbError::not_found(format!("no rows from `{}`", self.table)))
    }

    /// Execute and map all rows to `T`.
    pub async fn fetch_all_as<T: FromRow>(&self, exec: &impl Executor) -> DbResult<Vec<T>> {
        let rows = self.fetch_all(exec).await?;
        rows.iter().map(T::from_row).collect()
    }

    /// Execute and map at most one row to `T`.
    pub async fn fetch_opt_as<T: FromRow>(&self, exec: &impl Executor) -> DbResult<Option<T>> {
        let row = self.fetch_opt(exec).await?;
        row.as_ref().map(T::from_row).transpose()
    }

    /// Execute and map the first row to `T`, or [`DbError::NotFound`].
    pub async fn fetch_one_as<T: FromRow>(&self, exec: &impl Executor) -> DbResult<T> {
        let row = self.fetch_one(exec).await?;
        T::from_row(&row)
    }
}
