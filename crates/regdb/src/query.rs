//! Raw-SQL path with named-parameter binding.

use crate::decode;
use crate::error::{DbError, DbResult};
use crate::executor::{Executor, Fetch};
use crate::row::{FromRow, Row};
use crate::sanitize::sanitize;
use crate::value::Value;

/// Hand-written SQL with `:name` placeholders bound to rendered literals.
///
/// The statement and its parameters go through the sanitizer together:
/// the template is screened against the blacklist, then every bound
/// placeholder is replaced by an escaped literal. Reads (SELECT / SHOW /
/// DESCRIBE / EXPLAIN) decode rows; anything else returns none.
///
/// # Example
///
/// ```ignore
/// use regdb::query;
///
/// let rows = query("SELECT * FROM students WHERE major = :major LIMIT :n")
///     .bind("major", "CS")
///     .bind("n", 20)
///     .fetch_all(&client)
///     .await?;
/// ```
pub struct Query {
    sql: String,
    params: Vec<(String, Value)>,
}

/// Create a new query with the given SQL
pub fn query(sql: impl Into<String>) -> Query {
    Query {
        sql: sql.into(),
        params: Vec::new(),
    }
}

impl Query {
    /// Bind a named parameter to the query
    pub fn bind(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.params.push((name.to_string(), value.into()));
        self
    }

    /// Execute the query and return all rows (none for non-reads).
    pub async fn fetch_all(&self, exec: &impl Executor) -> DbResult<Vec<Row>> {
        let sql = sanitize(&self.sql, &self.params)?;
        if decode::is_read(&sql) {
            let out = exec.run(&sql, Fetch::Rows).await?;
            Ok(decode::rows(&out))
        } else {
            exec.run(&sql, Fetch::Discard).await?;
            Ok(Vec::new())
        }
    }

    /// Execute the query and return at most one row.
    pub async fn fetch_opt(&self, exec: &impl Executor) -> DbResult<Option<Row>> {
        Ok(self.fetch_all(exec).await?.into_iter().next())
    }

    /// Execute the query and return the first row, or [`DbError::NotFound`].
    pub async fn fetch_one(&self, exec: &impl Executor) -> DbResult<Row> {
        self.fetch_opt(exec)
            .await?
            .ok_or_else(|| DbError::not_found("no rows returned"))
    }

    /// Execute the query and map all rows to `T`.
    pub async fn fetch_all_as<T: FromRow>(&self, exec: &impl Executor) -> DbResult<Vec<T>> {
        let rows = self.fetch_all(exec).await?;
        rows.iter().map(T::from_row).collect()
    }

    /// Execute the query and map at most one row to `T`.
    pub async fn fetch_opt_as<T: FromRow>(&self, exec: &impl Executor) -> DbResult<Option<T>> {
        let row = self.fetch_opt(exec).await?;
        row.as_ref().map(T::from_row).transpose()
    }

    /// Execute the query and map the first row to `T`, or [`DbError::NotFound`].
    pub async fn fetch_one_as<T: FromRow>(&self, exec: &impl Executor) -> DbResult<T> {
        let row = self.fetch_one(exec).await?;
        T::from_row(&row)
    }

    /// Execute the query and return the affected-row count.
    pub async fn execute(&self, exec: &impl Executor) -> DbResult<u64> {
        let sql = sanitize(&self.sql, &self.params)?;
        exec.run(&sql, Fetch::Discard).await?;
        exec.affected_rows().await
    }
}
