use anyhow::Result;
use async_trait::async_trait;
use url::Url;

use crate::ssh::SshConnection;

/// Contract for any database a provisioning run brings up on a remote host.
#[async_trait]
pub trait Database: Send + Sync {
    /// Prepare the database on the host and return the identifier of the
    /// schema Jira should connect to.
    async fn setup(&self, ssh: &dyn SshConnection) -> Result<String>;

    /// Start the database so that the Jira instance at `jira` can use it.
    async fn start(&self, jira: &Url, ssh: &dyn SshConnection) -> Result<()>;
}

/// Database that is already there: setup returns a fixed schema and start does
/// nothing. Useful for tests and for hosts provisioned out of band.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoopDatabase {
    schema: String,
}

impl NoopDatabase {
    pub fn new(schema: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
        }
    }
}

#[async_trait]
impl Database for NoopDatabase {
    async fn setup(&self, _ssh: &dyn SshConnection) -> Result<String> {
        Ok(self.schema.clone())
    }

    async fn start(&self, _jira: &Url, _ssh: &dyn SshConnection) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssh::ScriptedSshConnection;

    #[tokio::test]
    async fn noop_database_touches_nothing() {
        let db = NoopDatabase::new("jiradb");
        let ssh = ScriptedSshConnection::new();
        let jira = Url::parse("http://localhost:8080/").expect("url");

        let schema = db.setup(&ssh).await.expect("setup should succeed");
        db.start(&jira, &ssh).await.expect("start should succeed");

        assert_eq!(schema, "jiradb");
        assert!(ssh.executed().is_empty());
    }
}
