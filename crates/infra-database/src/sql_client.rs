use std::path::Path;

use async_trait::async_trait;
use infra_core::ssh::{SshConnection, SshError, SshResult};
use tracing::{debug, instrument};

/// Runs SQL against a database reachable from the remote host.
///
/// Statements go to the server verbatim: no parameters, no escaping.
#[async_trait]
pub trait SshSqlClient: Send + Sync {
    async fn run_sql(&self, ssh: &dyn SshConnection, sql: &str) -> Result<SshResult, SshError>;

    /// Run a SQL script that already exists on the remote host.
    async fn run_sql_file(
        &self,
        ssh: &dyn SshConnection,
        remote_path: &Path,
    ) -> Result<SshResult, SshError>;
}

pub const DEFAULT_MYSQL_HOST: &str = "127.0.0.1";
pub const DEFAULT_MYSQL_USER: &str = "root";

/// `mysql` command-line client invoked over SSH.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshMysqlClient {
    host: String,
    user: String,
}

impl Default for SshMysqlClient {
    fn default() -> Self {
        Self {
            host: DEFAULT_MYSQL_HOST.to_string(),
            user: DEFAULT_MYSQL_USER.to_string(),
        }
    }
}

impl SshMysqlClient {
    pub fn new(host: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            user: user.into(),
        }
    }

    fn base_command(&self) -> String {
        format!("mysql -h {} -u {}", self.host, self.user)
    }
}

#[async_trait]
impl SshSqlClient for SshMysqlClient {
    #[instrument(skip_all, fields(host = %self.host))]
    async fn run_sql(&self, ssh: &dyn SshConnection, sql: &str) -> Result<SshResult, SshError> {
        let command = format!("{} -e \"{sql}\"", self.base_command());
        debug!("running sql over ssh");
        ssh.execute(&command).await
    }

    #[instrument(skip_all, fields(host = %self.host, path = %remote_path.display()))]
    async fn run_sql_file(
        &self,
        ssh: &dyn SshConnection,
        remote_path: &Path,
    ) -> Result<SshResult, SshError> {
        let command = format!("{} < {}", self.base_command(), remote_path.display());
        ssh.execute(&command).await
    }
}
