use anyhow::Result;
use async_trait::async_trait;
use infra_core::{database::Database, ssh::SshConnection};
use tracing::{debug, instrument, instrument::WithSubscriber as _, warn, Dispatch};
use url::Url;

use crate::{
    encryption::{encryption_method_query, EncryptionMode},
    password::JiraUserPassword,
    settings::{OverrideSettings, DEFAULT_SCHEMA, DEFAULT_USERNAME},
    sql_client::{SshMysqlClient, SshSqlClient},
};

/// Wraps a [`Database`] and, once it has started, overwrites a Jira user's
/// stored credential so the run knows the password.
///
/// Based on <https://confluence.atlassian.com/jira/retrieving-the-jira-administrator-192836.html>.
/// Whether the plain or the encrypted form is written depends on the
/// directory's `user_encryption_method`.
pub struct JiraUserPasswordOverridingDatabase {
    database_delegate: Box<dyn Database>,
    sql_client: Box<dyn SshSqlClient>,
    username: String,
    user_password: JiraUserPassword,
    schema: String,
    logger: Option<Dispatch>,
}

impl JiraUserPasswordOverridingDatabase {
    pub fn builder(
        database_delegate: impl Database + 'static,
        user_password: JiraUserPassword,
    ) -> Builder {
        Builder::new(database_delegate, user_password)
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    #[instrument(skip_all, fields(username = %self.username, schema = %self.schema))]
    async fn start_and_override(&self, jira: &Url, ssh: &dyn SshConnection) -> Result<()> {
        self.database_delegate.start(jira, ssh).await?;

        let credential = if self.should_use_encryption(ssh).await? {
            debug!("Updating credential with encrypted password");
            self.user_password.encrypted()
        } else {
            debug!("Updating credential with plain text password");
            self.user_password.plain_text()
        };
        self.sql_client
            .run_sql(ssh, &credential_update(&self.schema, &self.username, credential))
            .await?;

        debug!(
            "Password for user '{}' updated to '{}'",
            self.username,
            self.user_password.plain_text()
        );
        Ok(())
    }

    async fn should_use_encryption(&self, ssh: &dyn SshConnection) -> Result<bool> {
        let result = self
            .sql_client
            .run_sql(ssh, &encryption_method_query(&self.schema))
            .await?;

        let mode = EncryptionMode::detect(&result.output);
        if mode == EncryptionMode::Unknown {
            warn!("Unknown user_encryption_method. Assuming encrypted password should be used");
        }
        Ok(mode.uses_encryption())
    }
}

#[async_trait]
impl Database for JiraUserPasswordOverridingDatabase {
    async fn setup(&self, ssh: &dyn SshConnection) -> Result<String> {
        self.database_delegate.setup(ssh).await
    }

    async fn start(&self, jira: &Url, ssh: &dyn SshConnection) -> Result<()> {
        match &self.logger {
            Some(logger) => {
                self.start_and_override(jira, ssh)
                    .with_subscriber(logger.clone())
                    .await
            }
            None => self.start_and_override(jira, ssh).await,
        }
    }
}

fn credential_update(schema: &str, username: &str, credential: &str) -> String {
    format!("UPDATE {schema}.cwd_user SET credential='{credential}' WHERE user_name='{username}';")
}

/// Collects the decorator's configuration; frozen by [`Builder::build`].
pub struct Builder {
    database_delegate: Box<dyn Database>,
    user_password: JiraUserPassword,
    sql_client: Box<dyn SshSqlClient>,
    schema: String,
    username: String,
    logger: Option<Dispatch>,
}

impl Builder {
    pub fn new(database_delegate: impl Database + 'static, user_password: JiraUserPassword) -> Self {
        Self {
            database_delegate: Box::new(database_delegate),
            user_password,
            sql_client: Box::new(SshMysqlClient::default()),
            schema: DEFAULT_SCHEMA.to_string(),
            username: DEFAULT_USERNAME.to_string(),
            logger: None,
        }
    }

    pub fn database_delegate(mut self, database_delegate: impl Database + 'static) -> Self {
        self.database_delegate = Box::new(database_delegate);
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn user_password(mut self, user_password: JiraUserPassword) -> Self {
        self.user_password = user_password;
        self
    }

    pub fn sql_client(mut self, sql_client: impl SshSqlClient + 'static) -> Self {
        self.sql_client = Box::new(sql_client);
        self
    }

    pub fn jira_database_schema_name(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    /// Send `start`'s events to this subscriber instead of the caller's
    /// current one.
    pub fn logger(mut self, logger: impl Into<Dispatch>) -> Self {
        self.logger = Some(logger.into());
        self
    }

    /// Apply the fields present in `settings`; absent ones keep their value.
    pub fn settings(mut self, settings: &OverrideSettings) -> Self {
        if let Some(username) = &settings.username {
            self.username = username.clone();
        }
        if let Some(schema) = &settings.schema {
            self.schema = schema.clone();
        }
        if let Some(client) = settings.mysql_client() {
            self.sql_client = Box::new(client);
        }
        self
    }

    pub fn build(self) -> JiraUserPasswordOverridingDatabase {
        JiraUserPasswordOverridingDatabase {
            database_delegate: self.database_delegate,
            sql_client: self.sql_client,
            username: self.username,
            user_password: self.user_password,
            schema: self.schema,
            logger: self.logger,
        }
    }
}

/// Shorthand for decorating any database with the default override settings.
pub trait DatabaseExt: Database + Sized + 'static {
    fn with_admin_password(
        self,
        admin_password: JiraUserPassword,
    ) -> JiraUserPasswordOverridingDatabase {
        Builder::new(self, admin_password).build()
    }
}

impl<D: Database + 'static> DatabaseExt for D {}
