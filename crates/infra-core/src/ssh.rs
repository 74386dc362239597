use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use thiserror::Error;

/// Errors produced by SSH connection implementations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SshError {
    /// The remote command ran but exited with a non-zero status.
    #[error("command `{command}` exited with status {exit_status}: {error_output}")]
    CommandFailed {
        command: String,
        exit_status: i32,
        error_output: String,
    },
    /// The session could not carry the command.
    #[error("ssh transport failure: {reason}")]
    Transport { reason: String },
}

/// Outcome of a remote command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SshResult {
    pub exit_status: i32,
    /// Captured stdout.
    pub output: String,
    /// Captured stderr.
    pub error_output: String,
}

impl SshResult {
    /// Successful result carrying the given stdout.
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            exit_status: 0,
            output: output.into(),
            error_output: String::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_status == 0
    }
}

/// An already-established remote session. Opening and closing it is the
/// caller's business; implementations only run commands on it.
#[async_trait]
pub trait SshConnection: Send + Sync {
    /// Run a shell command remotely and wait for it to finish.
    /// A non-zero exit status is reported as [`SshError::CommandFailed`].
    async fn execute(&self, command: &str) -> Result<SshResult, SshError>;
}

/// In-memory session for tests and dry runs. Records every command and
/// answers from scripted rules; unmatched commands succeed with empty output.
#[derive(Debug, Default, Clone)]
pub struct ScriptedSshConnection {
    inner: Arc<Mutex<Script>>,
}

#[derive(Debug, Default)]
struct Script {
    rules: Vec<(String, Result<SshResult, SshError>)>,
    executed: Vec<String>,
}

impl ScriptedSshConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer commands containing `pattern` with a successful `output`.
    pub fn respond(self, pattern: impl Into<String>, output: impl Into<String>) -> Self {
        self.push_rule(pattern.into(), Ok(SshResult::ok(output)))
    }

    /// Fail commands containing `pattern` with `error`.
    pub fn fail(self, pattern: impl Into<String>, error: SshError) -> Self {
        self.push_rule(pattern.into(), Err(error))
    }

    /// Commands executed so far, in order.
    pub fn executed(&self) -> Vec<String> {
        match self.inner.lock() {
            Ok(script) => script.executed.clone(),
            Err(poisoned) => poisoned.into_inner().executed.clone(),
        }
    }

    fn push_rule(self, pattern: String, outcome: Result<SshResult, SshError>) -> Self {
        if let Ok(mut script) = self.inner.lock() {
            script.rules.push((pattern, outcome));
        }
        self
    }
}

#[async_trait]
impl SshConnection for ScriptedSshConnection {
    async fn execute(&self, command: &str) -> Result<SshResult, SshError> {
        let mut script = self.inner.lock().map_err(|err| SshError::Transport {
            reason: format!("lock poisoned: {err}"),
        })?;
        script.executed.push(command.to_string());

        // First matching rule wins.
        let outcome = script
            .rules
            .iter()
            .find(|(pattern, _)| command.contains(pattern.as_str()))
            .map(|(_, outcome)| outcome.clone())
            .unwrap_or_else(|| Ok(SshResult::default()));

        match outcome {
            Ok(result) if !result.is_success() => Err(SshError::CommandFailed {
                command: command.to_string(),
                exit_status: result.exit_status,
                error_output: result.error_output,
            }),
            other => other,
        }
    }
}
