//! Registry Error Hierarchy
//!
//! Absence (unknown path, missing container, missing property) is never an
//! error in this crate; it is expressed as `None` or as an empty query
//! result. The types below only cover lifecycle misuse, invalid input and
//! configuration failures.

use config::ConfigError;

use crate::Handle;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Structural registry failures (lifecycle, paths, handles)
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Rejected query commands
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Configuration loading and validation failures
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Operation issued outside the `init`/`destroy` window
    #[error("Registry is not initialized")]
    NotInitialized,

    #[error("Invalid registry path {path:?}: {reason}")]
    InvalidPath { path: String, reason: &'static str },

    /// The handle refers to a node that has been unregistered
    #[error("Handle {0} no longer refers to a registered node")]
    StaleHandle(Handle),

    #[error("The registry root cannot be unregistered")]
    RootHandle,
}

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// Wrong keyword, missing tokens, empty pattern or oversized line
    #[error("Malformed query command: {0}")]
    MalformedCommand(String),

    #[error("Unknown query verb: {0}")]
    UnknownVerb(String),

    #[error("Invalid query pattern {pattern:?}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

impl Error {
    /// Returns true when the error is a rejected query command, which the
    /// transport reports back to the client instead of treating as fatal.
    pub fn is_rejected_command(&self) -> bool {
        matches!(self, Error::Query(_))
    }
}
