//! Configuration for the registry and the query interpreter.
//!
//! Layered loading, later sources override earlier ones:
//! 1. Default values from code
//! 2. Configuration file named by `CONFIG_PATH`
//! 3. Environment variables with the `HDS__` prefix (highest priority)
mod query;
mod registry;
pub use query::*;
pub use registry::*;


use std::env;

use config::Config;
use config::Environment;
use config::File;
use serde::Deserialize;
use serde::Serialize;

use crate::Result;

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct HdsConfig {
    /// Tree naming: root key and delimiter
    #[serde(default)]
    pub registry: RegistryConfig,
    /// Query protocol limits
    #[serde(default)]
    pub query: QueryConfig,
}

impl HdsConfig {
    /// Loads configuration from defaults, `CONFIG_PATH` and `HDS__*`
    /// environment variables.
    ///
    /// # Note
    /// Does NOT validate; call `validate()` once all overrides are applied.
    ///
    /// # Examples
    /// ```ignore
    /// std::env::set_var("HDS__REGISTRY__ROOT_NAME", "daemon");
    /// let cfg = HdsConfig::new()?.validate()?;
    /// ```
    pub fn new() -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Ok(config_path) = env::var("CONFIG_PATH") {
            builder = builder.add_source(File::with_name(&config_path).required(true));
        }

        builder = builder.add_source(environment());

        let config: Self = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Merges another configuration file on top of the current values.
    /// Environment variables still take precedence.
    pub fn with_override_config(
        &self,
        path: &str,
    ) -> Result<Self> {
        let config: Self = Config::builder()
            .add_source(Config::try_from(self)?)
            .add_source(File::with_name(path))
            .add_source(environment())
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Validates every section and returns the validated configuration.
    pub fn validate(self) -> Result<Self> {
        self.registry.validate()?;
        self.query.validate()?;
        Ok(self)
    }
}

fn environment() -> Environment {
    Environment::with_prefix("HDS")
        .separator("__")
        .ignore_empty(true)
        .try_parsing(true)
}
