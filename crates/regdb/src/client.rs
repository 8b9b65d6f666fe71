//! Client entry point: one-shot execution and transaction scopes.

use crate::config::MysqlConfig;
use crate::error::DbResult;
use crate::executor::{Executor, Fetch};
use crate::process;
use crate::transaction::{Session, TxScope, TxSession};

/// The process-wide handle for database access.
///
/// Holds nothing but configuration: every statement spawns its own
/// client process, so there is no connection state to share or corrupt,
/// and a `DbClient` can be used concurrently from any number of tasks.
/// Statements issued this way also share no transactional context; use
/// [`DbClient::begin`] (or the [`transaction!`](crate::transaction!)
/// macro) when a sequence of statements must land on one session.
#[derive(Debug, Clone)]
pub struct DbClient {
    config: MysqlConfig,
}

impl DbClient {
    /// Create a client from the given configuration.
    pub fn new(config: MysqlConfig) -> Self {
        Self { config }
    }

    /// Create a client from the `MYSQL_*` environment variables.
    pub fn from_env() -> Self {
        Self::new(MysqlConfig::from_env())
    }

    /// Access the connection configuration.
    pub fn config(&self) -> &MysqlConfig {
        &self.config
    }

    /// Open a transaction scope on a dedicated session.
    ///
    /// Spawns one long-lived client process, disables autocommit on it
    /// and issues `START TRANSACTION;`. A failure to begin fails the
    /// whole operation and reaps the child. The returned scope is itself
    /// an [`Executor`], so every builder and raw query runs against it
    /// unchanged, on the scope's own connection.
    pub async fn begin(&self) -> DbResult<TxScope> {
        let mut session = Session::open(&self.config).await?;
        session.run("START TRANSACTION;").await?;
        Ok(TxScope::new(TxSession::new(session)))
    }
}

impl Executor for DbClient {
    async fn run(&self, sql: &str, fetch: Fetch) -> DbResult<String> {
        process::run_once(&self.config, sql, fetch).await
    }
}
