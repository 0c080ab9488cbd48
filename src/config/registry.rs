use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::constants::DEFAULT_DELIMITER;
use crate::constants::DEFAULT_ROOT_NAME;
use crate::constants::GLOB_METACHARACTERS;
use crate::Error;
use crate::Result;

/// Naming of the registry tree
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Key of the root node, the first segment of every FQDN
    #[serde(default = "default_root_name")]
    pub root_name: String,

    /// Path segment delimiter
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            root_name: default_root_name(),
            delimiter: default_delimiter(),
        }
    }
}

impl RegistryConfig {
    /// # Errors
    /// Returns `Error::Config` when:
    /// - the delimiter is empty or contains a glob metacharacter
    /// - the root name is empty, contains the delimiter or a glob metacharacter
    pub fn validate(&self) -> Result<()> {
        if self.delimiter.is_empty() {
            return Err(invalid("delimiter cannot be empty".into()));
        }
        if self.delimiter.contains(GLOB_METACHARACTERS) {
            return Err(invalid(format!(
                "delimiter {:?} cannot contain glob metacharacters",
                self.delimiter
            )));
        }

        if self.root_name.is_empty() {
            return Err(invalid("root_name cannot be empty".into()));
        }
        if self.root_name.contains(self.delimiter.as_str()) {
            return Err(invalid(format!(
                "root_name {:?} cannot contain the delimiter {:?}",
                self.root_name, self.delimiter
            )));
        }
        if self.root_name.contains(GLOB_METACHARACTERS) {
            return Err(invalid(format!(
                "root_name {:?} cannot contain glob metacharacters",
                self.root_name
            )));
        }

        Ok(())
    }
}

fn invalid(message: String) -> Error {
    Error::Config(ConfigError::Message(message))
}

fn default_root_name() -> String {
    DEFAULT_ROOT_NAME.to_string()
}

fn default_delimiter() -> String {
    DEFAULT_DELIMITER.to_string()
}
