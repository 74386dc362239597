use std::fmt;

/// A Jira user password in both the form a person types and the form Jira
/// stores when directory encryption is on.
///
/// Nothing here encodes passwords. Produce `encrypted` with an
/// Atlassian-security compatible encoder before constructing this.
#[derive(Clone, PartialEq, Eq)]
pub struct JiraUserPassword {
    plain_text: String,
    encrypted: String,
}

impl JiraUserPassword {
    pub fn new(plain_text: impl Into<String>, encrypted: impl Into<String>) -> Self {
        Self {
            plain_text: plain_text.into(),
            encrypted: encrypted.into(),
        }
    }

    pub fn plain_text(&self) -> &str {
        &self.plain_text
    }

    pub fn encrypted(&self) -> &str {
        &self.encrypted
    }
}

impl fmt::Debug for JiraUserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JiraUserPassword")
            .field("plain_text", &"<redacted>")
            .field("encrypted", &"<redacted>")
            .finish()
    }
}
