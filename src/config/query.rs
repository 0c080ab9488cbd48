use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::constants::DEFAULT_MAX_COMMAND_LENGTH;
use crate::Error;
use crate::Result;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct QueryConfig {
    /// Longest accepted request line, in bytes
    #[serde(default = "default_max_command_length")]
    pub max_command_length: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            max_command_length: default_max_command_length(),
        }
    }
}

impl QueryConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_command_length == 0 {
            return Err(Error::Config(ConfigError::Message(
                "max_command_length must be greater than 0".into(),
            )));
        }
        Ok(())
    }
}

fn default_max_command_length() -> usize {
    DEFAULT_MAX_COMMAND_LENGTH
}
