//! Statement builders for the four table-scoped operations.
//!
//! Each builder carries a structured descriptor (table, columns, equality
//! filter, ordering, limit) and renders it to SQL text with every caller
//! value embedded as an escaped literal, since the command-line transport
//! has no bind protocol. The rendered text passes through
//! [`sanitize`](crate::sanitize::sanitize) before it reaches an executor.
//!
//! # Usage
//!
//! ```ignore
//! use regdb::qb;
//!
//! // SELECT
//! let students = qb::select("students")
//!     .eq("major", "CS")
//!     .order_by("student_id")
//!     .limit(20)
//!     .fetch_all(&client)
//!     .await?;
//!
//! // INSERT
//! let id = qb::insert("students")
//!     .set("student_id", "S2")
//!     .set("name", "O'Brien")
//!     .execute(&client)
//!     .await?;
//!
//! // UPDATE
//! let changed = qb::update("students")
//!     .set("credits", 18)
//!     .eq("student_id", "S2")
//!     .execute(&client)
//!     .await?;
//!
//! // DELETE
//! qb::delete("enrollments").eq("student_id", "S2").execute(&client).await?;
//! ```

mod delete;
mod insert;
mod select;
mod update;

pub use delete::DeleteQb;
pub use insert::InsertQb;
pub use select::SelectQb;
pub use update::UpdateQb;

use crate::value::Value;

/// Create a SELECT builder for the given table.
pub fn select(table: &str) -> SelectQb {
    SelectQb::new(table)
}

/// Create an INSERT builder for the given table.
pub fn insert(table: &str) -> InsertQb {
    InsertQb::new(table)
}

/// Create an UPDATE builder for the given table.
pub fn update(table: &str) -> UpdateQb {
    UpdateQb::new(table)
}

/// Create a DELETE builder for the given table.
pub fn delete(table: &str) -> DeleteQb {
    DeleteQb::new(table)
}

/// Render an equality filter as `AND`-joined WHERE conditions.
///
/// Null values compare with `IS NULL`; everything else renders as an
/// escaped literal on the right of `=`.
pub(crate) fn render_filter(filter: &[(String, Value)]) -> String {
    filter
        .iter()
        .map(|(column, value)| {
            if value.is_null() {
                format!("{column} IS NULL")
            } else {
                format!("{column} = {}", value.to_literal())
            }
        })
        .collect::<Vec<_>>()
        .join(" AND ")
}

#[cfg(test)]
mod tests;
