//! Error types for phonedata.

use std::fmt;
use std::io;

use thiserror::Error;

/// Stage of a lookup that was reading from the backing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Opening or mapping the file
    Open,
    /// Reading the file header
    Header,
    /// Binary search over the index region
    Search,
    /// Reading a record from the record region
    Resolve,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Open => "open",
            Phase::Header => "header",
            Phase::Search => "search",
            Phase::Resolve => "resolve",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for phonedata operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The query string does not start with 7 digits
    #[error("invalid phone number {input:?}: {reason}")]
    InvalidPhone { input: String, reason: &'static str },

    /// The data file disagrees with its own header or size
    #[error("malformed phone data file: {0}")]
    Format(String),

    /// No index entry carries the key
    #[error("no entry for phone prefix {key:07}")]
    NotFound { key: u32 },

    /// The record has fewer fields than required
    #[error("invalid record at offset {offset}: {reason}")]
    Record { offset: u64, reason: String },

    /// IO error, tagged with the phase that triggered it
    #[error("IO error during {phase}: {source}")]
    Io {
        phase: Phase,
        #[source]
        source: io::Error,
    },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Input rejected while building a data file
    #[error("build error: {0}")]
    Build(String),

    /// Default database not initialized
    #[error("phone database not initialized")]
    NotInitialized,
}

impl Error {
    /// Wrap an IO error from `phase`.
    ///
    /// Running out of bytes inside a region the header promised is a
    /// format problem, so `UnexpectedEof` becomes [`Error::Format`].
    pub(crate) fn read(phase: Phase, source: io::Error, what: impl fmt::Display) -> Self {
        if source.kind() == io::ErrorKind::UnexpectedEof {
            Error::Format(format!("{} extends past end of file", what))
        } else {
            Error::Io { phase, source }
        }
    }

    /// Whether this is the ordinary "no such prefix" outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

/// Result type alias for phonedata operations.
pub type Result<T> = std::result::Result<T, Error>;
