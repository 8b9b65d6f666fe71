//! One-shot statement execution: one spawned client process per call.

use std::process::Stdio;

use tokio::process::Command;
use tokio::time::timeout;

use crate::config::MysqlConfig;
use crate::error::{DbError, DbResult};
use crate::executor::Fetch;

/// Spawn the client once, hand it the statement, collect the outcome.
///
/// No handle survives the call: the connection lives exactly as long as
/// the child process. The statement travels as the single `--execute`
/// argument; the password travels in `MYSQL_PWD` so it never shows up in
/// the process table.
pub(crate) async fn run_once(cfg: &MysqlConfig, sql: &str, fetch: Fetch) -> DbResult<String> {
    let mut cmd = Command::new(&cfg.client_program);
    cmd.args(cfg.connection_args())
        .args(["--batch", "--raw"])
        .arg("--execute")
        .arg(sql)
        .env("MYSQL_PWD", &cfg.password)
        .stdin(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    match fetch {
        Fetch::Rows => cmd.stdout(Stdio::piped()),
        Fetch::Discard => cmd.stdout(Stdio::null()),
    };

    tracing::debug!(sql, "executing statement");

    let output = match timeout(cfg.statement_timeout, cmd.output()).await {
        Err(_) => {
            // Dropping the in-flight future reaps the child (kill_on_drop).
            tracing::warn!(sql, timeout = ?cfg.statement_timeout, "statement timed out");
            return Err(DbError::Timeout(cfg.statement_timeout));
        }
        Ok(Err(source)) => {
            return Err(DbError::Spawn {
                program: cfg.client_program.clone(),
                source,
            });
        }
        Ok(Ok(output)) => output,
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        tracing::warn!(sql, stderr = %stderr, "client exited non-zero");
        return Err(DbError::Execution(stderr));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
