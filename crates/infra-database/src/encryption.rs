/// How a Jira internal directory stores user credentials, as reported by the
/// `user_encryption_method` directory attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncryptionMode {
    Plaintext,
    AtlassianSecurity,
    /// Anything else, including no row at all.
    Unknown,
}

impl EncryptionMode {
    /// Classify raw query output by substring. The plaintext check runs first,
    /// so output mentioning both methods counts as plaintext.
    pub fn detect(raw_output: &str) -> Self {
        if raw_output.contains("plaintext") {
            EncryptionMode::Plaintext
        } else if raw_output.contains("atlassian-security") {
            EncryptionMode::AtlassianSecurity
        } else {
            EncryptionMode::Unknown
        }
    }

    /// Whether the encrypted credential must be written. Unknown methods are
    /// treated as encrypted.
    pub fn uses_encryption(self) -> bool {
        !matches!(self, EncryptionMode::Plaintext)
    }
}

/// Query returning the directory's `user_encryption_method` attribute.
pub(crate) fn encryption_method_query(schema: &str) -> String {
    format!(
        "select attribute_value from {schema}.cwd_directory_attribute where attribute_name = 'user_encryption_method';"
    )
}
