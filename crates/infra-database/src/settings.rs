use std::{fs, io, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sql_client::{SshMysqlClient, DEFAULT_MYSQL_HOST, DEFAULT_MYSQL_USER};

pub const DEFAULT_USERNAME: &str = "admin";
pub const DEFAULT_SCHEMA: &str = "jiradb";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Password override settings, typically kept next to the rest of a
/// provisioning run's configuration:
///
/// ```toml
/// username = "admin"
/// schema = "jiradb"
/// [mysql]
/// host = "127.0.0.1"
/// user = "root"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct OverrideSettings {
    /// Jira user whose credential gets overwritten.
    pub username: Option<String>,
    /// Schema holding Jira's `cwd_*` tables.
    pub schema: Option<String>,
    pub mysql: Option<MysqlSettings>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct MysqlSettings {
    pub host: Option<String>,
    pub user: Option<String>,
}

impl OverrideSettings {
    pub fn username(&self) -> &str {
        self.username.as_deref().unwrap_or(DEFAULT_USERNAME)
    }

    pub fn schema(&self) -> &str {
        self.schema.as_deref().unwrap_or(DEFAULT_SCHEMA)
    }

    /// The SQL client these settings describe, if they name one.
    pub fn mysql_client(&self) -> Option<SshMysqlClient> {
        self.mysql.as_ref().map(|mysql| {
            SshMysqlClient::new(
                mysql.host.as_deref().unwrap_or(DEFAULT_MYSQL_HOST),
                mysql.user.as_deref().unwrap_or(DEFAULT_MYSQL_USER),
            )
        })
    }
}

/// Load settings from a given path; if missing or empty, return defaults.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<OverrideSettings, SettingsError> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(OverrideSettings::default());
    }
    let contents = fs::read_to_string(path)?;
    if contents.trim().is_empty() {
        return Ok(OverrideSettings::default());
    }
    Ok(toml::from_str(&contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_default_when_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let settings = load_from_path(dir.path().join("override.toml")).expect("load");
        assert_eq!(settings, OverrideSettings::default());
        assert_eq!(settings.username(), "admin");
        assert_eq!(settings.schema(), "jiradb");
        assert_eq!(settings.mysql_client(), None);
    }

    #[test]
    fn returns_default_when_blank() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("override.toml");
        fs::write(&path, "  \n").expect("write");
        assert_eq!(load_from_path(&path).expect("load"), OverrideSettings::default());
    }

    #[test]
    fn parses_custom_settings() {
        let contents = r#"
            username = "jira-admin"
            schema = "jira_perf"
            [mysql]
            host = "10.0.0.5"
        "#;
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("override.toml");
        fs::write(&path, contents).expect("write temp settings");

        let settings = load_from_path(&path).expect("load");
        assert_eq!(
            settings,
            OverrideSettings {
                username: Some("jira-admin".into()),
                schema: Some("jira_perf".into()),
                mysql: Some(MysqlSettings {
                    host: Some("10.0.0.5".into()),
                    user: None,
                }),
            }
        );
        assert_eq!(
            settings.mysql_client(),
            Some(SshMysqlClient::new("10.0.0.5", "root"))
        );
    }

    #[test]
    fn rejects_malformed_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("override.toml");
        fs::write(&path, "username = [").expect("write");

        let err = load_from_path(&path).expect_err("should fail to parse");
        assert!(matches!(err, SettingsError::Parse(_)));
    }
}
