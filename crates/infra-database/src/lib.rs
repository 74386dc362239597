//! Database decorators for Jira provisioning runs.
//! Overrides a Jira user's stored credential over SSH once the wrapped
//! database has started.

pub mod encryption;
pub mod overriding;
pub mod password;
pub mod settings;
pub mod sql_client;

pub use overriding::{DatabaseExt, JiraUserPasswordOverridingDatabase};
pub use password::JiraUserPassword;
