//! # regdb
//!
//! MySQL data-access layer for the course-registration backend. Every
//! statement is executed by the `mysql` command-line client: built SQL is
//! screened by a blacklist sanitizer, handed to a spawned process, and
//! the tab-delimited batch output is decoded back into rows.
//!
//! ## Features
//!
//! - **Structured builders**: SELECT/INSERT/UPDATE/DELETE from table,
//!   columns, equality filter, ordering and limit (`qb` module)
//! - **Raw SQL with named parameters**: `query("… :name …").bind(…)`
//! - **Safe defaults**: UPDATE/DELETE require a filter, INSERT requires a
//!   payload, all checked before any process is spawned
//! - **Blacklist screening**: schema-destroying verbs, comment tokens and
//!   stacked-query shapes are rejected up front
//! - **Real transaction scopes**: a scope owns one long-lived client
//!   process, so BEGIN/COMMIT/ROLLBACK share a single session
//! - **One seam for everything**: builders accept any [`Executor`], be it
//!   the one-shot client, a transaction scope, or a test mock
//!
//! ## Usage
//!
//! ```ignore
//! use regdb::{qb, query, DbClient, MysqlConfig};
//!
//! let client = DbClient::new(MysqlConfig::from_env());
//!
//! // Structured select
//! let students = qb::select("students")
//!     .eq("major", "CS")
//!     .order_by("student_id")
//!     .limit(20)
//!     .fetch_all(&client)
//!     .await?;
//!
//! // Insert, returning the generated id
//! let id = qb::insert("students")
//!     .set("student_id", "S2")
//!     .set("name", "O'Brien")
//!     .execute(&client)
//!     .await?;
//!
//! // Raw SQL with named parameters
//! let heavy = query("SELECT * FROM courses WHERE credits > :min")
//!     .bind("min", 3)
//!     .fetch_all(&client)
//!     .await?;
//!
//! // A transaction on one dedicated session
//! regdb::transaction!(&client, tx, {
//!     qb::update("accounts").set("balance", 50).eq("id", 1).execute(&tx).await?;
//!     qb::update("accounts").set("balance", 150).eq("id", 2).execute(&tx).await?;
//!     Ok(())
//! })?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod qb;
pub mod query;
pub mod row;
pub mod sanitize;
pub mod transaction;
pub mod value;

mod decode;
mod process;

pub use client::DbClient;
pub use config::MysqlConfig;
pub use error::{DbError, DbResult};
pub use executor::{Executor, Fetch};
pub use query::{Query, query};
pub use row::{FromRow, Row};
pub use transaction::{TxScope, TxSession};
pub use value::Value;

// Re-export qb builders for easy access
pub use qb::{DeleteQb, InsertQb, SelectQb, UpdateQb};
