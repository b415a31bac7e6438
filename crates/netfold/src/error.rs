//! Error types for netfold

use std::io;
use std::process::ExitStatus;
use thiserror::Error;

/// Main error type for netfold
#[derive(Error, Debug)]
pub enum Error {
    /// The parsed document has no content container to fold
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// The external tool could not be started
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The external tool ran but reported failure
    #[error("`{program}` exited with {status}: {stderr}")]
    Exit {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    /// A single-record lookup produced nothing
    #[error("no record found for `{0}`")]
    NotFound(String),

    /// The tool config file could not be read or parsed
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Shorthand for [`Error::MalformedInput`]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedInput(message.into())
    }
}

/// Result type alias for netfold
pub type Result<T> = std::result::Result<T, Error>;
