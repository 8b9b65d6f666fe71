//! Transaction coordination over a dedicated client session.
//!
//! A scope is bound to one long-lived client process for its entire
//! lifetime. Statements are written to the child's stdin and answered on
//! its stdout, so `START TRANSACTION` / `COMMIT` / `ROLLBACK` and every
//! statement in between share a single real connection; nothing is ever
//! split across separately spawned processes. Closing the session without
//! a COMMIT makes the server discard the open transaction, which is what
//! backs best-effort rollback on failure paths.
//!
//! For ergonomic commit/rollback handling, use the [`transaction!`] macro.
//!
//! # Example
//!
//! ```ignore
//! use regdb::{qb, DbClient, DbResult, MysqlConfig};
//!
//! # async fn demo(client: &DbClient) -> DbResult<()> {
//! regdb::transaction!(client, tx, {
//!     qb::update("accounts").set("balance", 50).eq("id", 1).execute(&tx).await?;
//!     qb::update("accounts").set("balance", 150).eq("id", 2).execute(&tx).await?;
//!     Ok(())
//! })?;
//! # Ok(()) }
//! ```

use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use tokio::time::timeout;

use crate::config::MysqlConfig;
use crate::decode;
use crate::error::{DbError, DbResult};
use crate::executor::{Executor, Fetch, parse_count};

/// Session variables capturing the outcome numbers of the most recent
/// statement, before the sync probe resets them.
const ROW_COUNT_VAR: &str = "@regdb_row_count";
const INSERT_ID_VAR: &str = "@regdb_insert_id";

/// One long-lived client process with statement-by-statement framing.
///
/// Each statement is followed by a capture step for `ROW_COUNT()` /
/// `LAST_INSERT_ID()` and a sentinel SELECT; the reader drains stdout
/// until the sentinel line appears. If the child dies mid-statement the
/// session is marked broken, stderr becomes the error text, and every
/// later statement fails with [`DbError::SessionClosed`].
pub(crate) struct Session {
    child: Child,
    stdin: ChildStdin,
    stdout: Lines<BufReader<ChildStdout>>,
    statement_timeout: Duration,
    seq: u64,
    broken: bool,
}

impl Session {
    pub(crate) async fn open(cfg: &MysqlConfig) -> DbResult<Self> {
        let mut cmd = Command::new(&cfg.client_program);
        cmd.args(cfg.connection_args())
            .args(["--batch", "--raw"])
            .arg("--init-command=SET autocommit=0")
            .env("MYSQL_PWD", &cfg.password)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|source| DbError::Spawn {
            program: cfg.client_program.clone(),
            source,
        })?;
        let stdin = child.stdin.take().expect("stdin piped");
        let stdout = BufReader::new(child.stdout.take().expect("stdout piped")).lines();

        Ok(Self {
            child,
            stdin,
            stdout,
            statement_timeout: cfg.statement_timeout,
            seq: 0,
            broken: false,
        })
    }

    /// Wrap a statement with the capture step and the sync probe.
    fn frame(sql: &str, marker: &str) -> String {
        let mut script = String::with_capacity(sql.len() + 128);
        script.push_str(sql.trim());
        if !script.ends_with(';') {
            script.push(';');
        }
        script.push('\n');
        // Capture outcome numbers before the probe SELECT resets them.
        script.push_str(&format!(
            "SET {ROW_COUNT_VAR} = ROW_COUNT(), {INSERT_ID_VAR} = LAST_INSERT_ID();\n"
        ));
        script.push_str(&format!("SELECT '{marker}' AS sync;\n"));
        script
    }

    pub(crate) async fn run(&mut self, sql: &str) -> DbResult<String> {
        if self.broken {
            return Err(DbError::SessionClosed);
        }
        self.seq += 1;
        let marker = format!("regdb:{}:done", self.seq);
        let script = Self::frame(sql, &marker);

        tracing::debug!(sql, "executing in transaction session");

        if self.stdin.write_all(script.as_bytes()).await.is_err()
            || self.stdin.flush().await.is_err()
        {
            return Err(self.fail().await);
        }

        let stdout = &mut self.stdout;
        let read = async move {
            let mut collected: Vec<String> = Vec::new();
            loop {
                match stdout.next_line().await {
                    Ok(Some(line)) if line == marker => break Ok(collected),
                    Ok(Some(line)) => collected.push(line),
                    // EOF or a broken pipe: the child aborted on this statement.
                    Ok(None) | Err(_) => break Err(()),
                }
            }
        };

        match timeout(self.statement_timeout, read).await {
            Err(_) => {
                self.broken = true;
                let _ = self.child.start_kill();
                tracing::warn!(sql, timeout = ?self.statement_timeout, "transaction statement timed out");
                Err(DbError::Timeout(self.statement_timeout))
            }
            Ok(Err(())) => Err(self.fail().await),
            Ok(Ok(mut lines)) => {
                // The sync probe contributes its own header line.
                if lines.last().is_some_and(|l| l == "sync") {
                    lines.pop();
                }
                Ok(lines.join("\n"))
            }
        }
    }

    /// The child died mid-statement: mark the session broken and turn its
    /// stderr into the error the caller sees.
    async fn fail(&mut self) -> DbError {
        self.broken = true;
        let mut stderr_text = String::new();
        if let Some(mut stderr) = self.child.stderr.take() {
            let _ = timeout(
                Duration::from_secs(2),
                stderr.read_to_string(&mut stderr_text),
            )
            .await;
        }
        let _ = self.child.start_kill();
        let stderr_text = stderr_text.trim();
        if stderr_text.is_empty() {
            DbError::Execution("transaction session ended unexpectedly".to_string())
        } else {
            DbError::Execution(stderr_text.to_string())
        }
    }
}

/// [`Executor`] bound to one dedicated transaction session.
pub struct TxSession {
    session: Mutex<Session>,
}

impl TxSession {
    pub(crate) fn new(session: Session) -> Self {
        Self {
            session: Mutex::new(session),
        }
    }
}

impl Executor for TxSession {
    async fn run(&self, sql: &str, _fetch: Fetch) -> DbResult<String> {
        self.session.lock().await.run(sql).await
    }

    /// Exact on this connection: reads the value captured at statement time.
    async fn last_insert_id(&self) -> DbResult<u64> {
        let out = self
            .run(&format!("SELECT {INSERT_ID_VAR} AS id;"), Fetch::Rows)
            .await?;
        Ok(parse_count(decode::scalar(&out)))
    }

    /// Exact on this connection: reads the value captured at statement time.
    async fn affected_rows(&self) -> DbResult<u64> {
        let out = self
            .run(&format!("SELECT {ROW_COUNT_VAR} AS affected;"), Fetch::Rows)
            .await?;
        Ok(parse_count(decode::scalar(&out)))
    }
}

/// An open transaction scope.
///
/// Created by [`DbClient::begin`](crate::DbClient::begin) with
/// `START TRANSACTION` already issued. The scope reaches exactly one
/// terminal state: [`commit`](TxScope::commit) or
/// [`rollback`](TxScope::rollback) consume it, and dropping it open
/// closes the session (the server then discards the transaction) with a
/// warning. `TxScope` implements [`Executor`], so builders and raw
/// queries run inside the scope exactly as they do outside it.
pub struct TxScope<E: Executor = TxSession> {
    exec: E,
    finished: bool,
}

impl<E: Executor> TxScope<E> {
    pub(crate) fn new(exec: E) -> Self {
        Self {
            exec,
            finished: false,
        }
    }

    /// Commit the transaction.
    ///
    /// A COMMIT failure is returned to the caller; whether the block's
    /// effects persisted is then unknown to this side of the connection.
    pub async fn commit(mut self) -> DbResult<()> {
        self.finished = true;
        self.exec.run("COMMIT;", Fetch::Discard).await?;
        Ok(())
    }

    /// Roll the transaction back.
    pub async fn rollback(mut self) -> DbResult<()> {
        self.finished = true;
        self.exec.run("ROLLBACK;", Fetch::Discard).await?;
        Ok(())
    }
}

impl<E: Executor> Executor for TxScope<E> {
    async fn run(&self, sql: &str, fetch: Fetch) -> DbResult<String> {
        self.exec.run(sql, fetch).await
    }

    async fn last_insert_id(&self) -> DbResult<u64> {
        self.exec.last_insert_id().await
    }

    async fn affected_rows(&self) -> DbResult<u64> {
        self.exec.affected_rows().await
    }
}

impl<E: Executor> Drop for TxScope<E> {
    fn drop(&mut self) {
        if !self.finished {
            tracing::warn!(
                "transaction scope dropped without commit or rollback; \
                 session closed, server discards the open transaction"
            );
        }
    }
}

/// Runs the given block inside a transaction scope.
///
/// - Opens a scope via `$client.begin().await`.
/// - Commits on `Ok(_)`; a COMMIT failure is returned to the caller.
/// - Rolls back on `Err(_)`; a ROLLBACK failure is logged and the block's
///   original error is the one the caller observes.
///
/// The block must evaluate to `regdb::DbResult<T>`.
#[macro_export]
macro_rules! transaction {
    ($client:expr, $tx:ident, $body:block) => {{
        let $tx = ($client).begin().await?;

        let __regdb_tx_result = async { $body }.await;
        match __regdb_tx_result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(error) => {
                if let Err(rollback_err) = $tx.rollback().await {
                    $crate::transaction::log_rollback_failure(&rollback_err);
                }
                Err(error)
            }
        }
    }};
}

/// Used by the [`transaction!`] macro. Not intended for direct use.
#[doc(hidden)]
pub fn log_rollback_failure(err: &DbError) {
    tracing::warn!(error = %err, "rollback failed; returning the original error to the caller");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex as StdMutex};

    use crate::qb;

    #[derive(Clone)]
    struct MockExec {
        calls: Arc<StdMutex<Vec<String>>>,
        fail_on: Option<&'static str>,
    }

    impl MockExec {
        fn new() -> Self {
            Self {
                calls: Arc::new(StdMutex::new(Vec::new())),
                fail_on: None,
            }
        }

        fn failing_on(pattern: &'static str) -> Self {
            Self {
                fail_on: Some(pattern),
                ..Self::new()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Executor for MockExec {
        async fn run(&self, sql: &str, _fetch: Fetch) -> DbResult<String> {
            self.calls.lock().unwrap().push(sql.to_string());
            if let Some(pattern) = self.fail_on {
                if sql.contains(pattern) {
                    return Err(DbError::Execution(format!("mock failure on {pattern}")));
                }
            }
            Ok(String::new())
        }
    }

    struct TestClient {
        exec: MockExec,
    }

    impl TestClient {
        async fn begin(&self) -> DbResult<TxScope<MockExec>> {
            let scope = TxScope::new(self.exec.clone());
            scope.run("START TRANSACTION;", Fetch::Discard).await?;
            Ok(scope)
        }
    }

    #[test]
    fn frame_terminates_and_captures() {
        let script = Session::frame("UPDATE t SET a = 1 WHERE id = 2", "regdb:1:done");
        let lines: Vec<&str> = script.lines().collect();
        assert_eq!(lines[0], "UPDATE t SET a = 1 WHERE id = 2;");
        assert!(lines[1].starts_with("SET @regdb_row_count = ROW_COUNT()"));
        assert_eq!(lines[2], "SELECT 'regdb:1:done' AS sync;");
    }

    #[test]
    fn frame_keeps_existing_terminator() {
        let script = Session::frame("COMMIT;", "regdb:2:done");
        assert!(script.starts_with("COMMIT;\n"));
        assert!(!script.starts_with("COMMIT;;"));
    }

    #[tokio::test]
    async fn commit_flow_runs_statements_then_commit() {
        let exec = MockExec::new();
        let client = TestClient { exec: exec.clone() };

        let result: DbResult<u64> = async {
            crate::transaction!(client, tx, {
                qb::update("accounts")
                    .set("balance", 50i64)
                    .eq("id", 1i64)
                    .execute(&tx)
                    .await
            })
        }
        .await;

        assert_eq!(result.unwrap(), 0);
        let calls = exec.calls();
        assert_eq!(calls.first().map(String::as_str), Some("START TRANSACTION;"));
        assert!(calls.iter().any(|c| c.starts_with("UPDATE accounts")));
        assert_eq!(calls.last().map(String::as_str), Some("COMMIT;"));
    }

    #[tokio::test]
    async fn failing_block_rolls_back_and_keeps_original_error() {
        let exec = MockExec::new();
        let client = TestClient { exec: exec.clone() };

        let result: DbResult<()> = async {
            crate::transaction!(client, tx, {
                let _ = &tx;
                Err(DbError::Execution("original failure".to_string()))
            })
        }
        .await;

        match result.unwrap_err() {
            DbError::Execution(msg) => assert_eq!(msg, "original failure"),
            other => panic!("expected the block's error, got {other:?}"),
        }
        assert_eq!(exec.calls().last().map(String::as_str), Some("ROLLBACK;"));
    }

    #[tokio::test]
    async fn rollback_failure_does_not_mask_original_error() {
        let exec = MockExec::failing_on("ROLLBACK");
        let client = TestClient { exec: exec.clone() };

        let result: DbResult<()> = async {
            crate::transaction!(client, tx, {
                let _ = &tx;
                Err(DbError::Execution("original failure".to_string()))
            })
        }
        .await;

        match result.unwrap_err() {
            DbError::Execution(msg) => assert_eq!(msg, "original failure"),
            other => panic!("expected the block's error, got {other:?}"),
        }
        // The rollback was still attempted.
        assert!(exec.calls().iter().any(|c| c == "ROLLBACK;"));
    }

    #[tokio::test]
    async fn commit_failure_reaches_the_caller() {
        let exec = MockExec::failing_on("COMMIT");
        let client = TestClient { exec: exec.clone() };

        let result: DbResult<()> = async {
            crate::transaction!(client, tx, {
                let _ = &tx;
                Ok(())
            })
        }
        .await;

        match result.unwrap_err() {
            DbError::Execution(msg) => assert!(msg.contains("COMMIT")),
            other => panic!("expected the commit error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn explicit_commit_consumes_the_scope() {
        let exec = MockExec::new();
        let scope = TxScope::new(exec.clone());
        scope.commit().await.unwrap();
        assert_eq!(exec.calls(), vec!["COMMIT;".to_string()]);
    }

    #[tokio::test]
    async fn explicit_rollback_consumes_the_scope() {
        let exec = MockExec::new();
        let scope = TxScope::new(exec.clone());
        scope.rollback().await.unwrap();
        assert_eq!(exec.calls(), vec!["ROLLBACK;".to_string()]);
    }
}
