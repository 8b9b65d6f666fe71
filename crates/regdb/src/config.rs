//! Connection configuration for the command-line client.

use std::env;
use std::time::Duration;

/// Connection parameters handed to the client program on every call.
///
/// There is no persistent connection object anywhere in this crate: each
/// one-shot statement and each transaction session starts from this
/// configuration alone.
#[derive(Debug, Clone)]
pub struct MysqlConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    /// Character set passed as `--default-character-set`.
    pub charset: String,
    /// Client binary to spawn. Overridable for non-standard installs.
    pub client_program: String,
    /// Wall-clock limit per statement; the child is killed on expiry.
    pub statement_timeout: Duration,
}

impl Default for MysqlConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: String::new(),
            database: "student_course_system".to_string(),
            charset: "utf8mb4".to_string(),
            client_program: "mysql".to_string(),
            statement_timeout: Duration::from_secs(30),
        }
    }
}

impl MysqlConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read configuration from `MYSQL_HOST`, `MYSQL_PORT`, `MYSQL_USER`,
    /// `MYSQL_PASSWORD` and `MYSQL_DATABASE`, keeping defaults for
    /// anything unset or unparsable.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(host) = env::var("MYSQL_HOST") {
            cfg.host = host;
        }
        if let Ok(port) = env::var("MYSQL_PORT") {
            if let Ok(port) = port.parse() {
                cfg.port = port;
            }
        }
        if let Ok(user) = env::var("MYSQL_USER") {
            cfg.user = user;
        }
        if let Ok(password) = env::var("MYSQL_PASSWORD") {
            cfg.password = password;
        }
        if let Ok(database) = env::var("MYSQL_DATABASE") {
            cfg.database = database;
        }
        cfg
    }

    /// Set the server host.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the server port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the user name.
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    /// Set the password (passed to the child via `MYSQL_PWD`, not argv).
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Set the database name.
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Set the character set.
    pub fn charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = charset.into();
        self
    }

    /// Override the client binary.
    pub fn client_program(mut self, program: impl Into<String>) -> Self {
        self.client_program = program.into();
        self
    }

    /// Set the per-statement timeout.
    pub fn statement_timeout(mut self, timeout: Duration) -> Self {
        self.statement_timeout = timeout;
        self
    }

    /// Connection arguments shared by one-shot calls and sessions.
    pub(crate) fn connection_args(&self) -> Vec<String> {
        vec![
            format!("--host={}", self.host),
            format!("--port={}", self.port),
            format!("--user={}", self.user),
            format!("--database={}", self.database),
            format!("--default-character-set={}", self.charset),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_chain() {
        let cfg = MysqlConfig::new()
            .host("db.internal")
            .port(3307)
            .user("portal")
            .password("s3cret")
            .database("registration");
        assert_eq!(cfg.host, "db.internal");
        assert_eq!(cfg.port, 3307);
        assert_eq!(cfg.database, "registration");
    }

    #[test]
    fn connection_args_carry_every_parameter_except_password() {
        let cfg = MysqlConfig::new().host("h").port(3310).user("u").database("d");
        let args = cfg.connection_args();
        assert!(args.contains(&"--host=h".to_string()));
        assert!(args.contains(&"--port=3310".to_string()));
        assert!(args.contains(&"--user=u".to_string()));
        assert!(args.contains(&"--database=d".to_string()));
        assert!(args.contains(&"--default-character-set=utf8mb4".to_string()));
        assert!(!args.iter().any(|a| a.contains("password")));
    }
}
