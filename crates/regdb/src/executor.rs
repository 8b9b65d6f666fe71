//! The execution seam shared by clients, transactions and test doubles.

use crate::decode;
use crate::error::DbResult;

/// Whether the caller wants the statement's result stream.
///
/// [`Fetch::Rows`] asks for tab-separated batch output with a leading
/// header line. [`Fetch::Discard`] tells the implementation the output
/// will not be read; the one-shot executor does not capture stdout at
/// all in that case.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fetch {
    Rows,
    Discard,
}

/// A trait that unifies the one-shot client and transaction scopes.
///
/// Builders and the raw-query path accept any `Executor`, so the same
/// repository code runs inside or outside a transaction. Test suites
/// implement it with a scripted mock.
pub trait Executor: Send + Sync {
    /// Execute one statement and return its raw stdout.
    fn run(
        &self,
        sql: &str,
        fetch: Fetch,
    ) -> impl std::future::Future<Output = DbResult<String>> + Send;

    /// Recover the identifier generated by the last INSERT, 0 if unavailable.
    ///
    /// The default implementation issues a second `run` call. On a
    /// one-shot executor that call lands on a fresh connection, where the
    /// server reports 0; transaction scopes override this with the value
    /// captured on their own session.
    fn last_insert_id(&self) -> impl std::future::Future<Output = DbResult<u64>> + Send {
        async move {
            let out = self.run("SELECT LAST_INSERT_ID();", Fetch::Rows).await?;
            Ok(parse_count(decode::scalar(&out)))
        }
    }

    /// Recover the row count affected by the last mutation, 0 if unavailable.
    ///
    /// Same connection caveat as [`Executor::last_insert_id`].
    fn affected_rows(&self) -> impl std::future::Future<Output = DbResult<u64>> + Send {
        async move {
            let out = self.run("SELECT ROW_COUNT();", Fetch::Rows).await?;
            Ok(parse_count(decode::scalar(&out)))
        }
    }
}

/// `ROW_COUNT()` reports -1 for statements that are not mutations, and a
/// fresh connection has no value at all; both collapse to 0.
pub(crate) fn parse_count(cell: Option<String>) -> u64 {
    cell.and_then(|v| v.parse::<i64>().ok())
        .map_or(0, |n| n.max(0) as u64)
}
