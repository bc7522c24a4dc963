// src/error.rs
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::model::{RawField, Source};

pub type Result<T> = std::result::Result<T, Error>;

/// Run-level failures. Anything that reaches the binary ends the process.
#[derive(Debug, Error)]
pub enum Error {
    /// The review surface never became reachable; nothing is written for `site`.
    #[error("{site}: review surface unreachable while {step}")]
    Navigation {
        site: Source,
        step: &'static str,
        #[source]
        cause: BrowserError,
    },

    #[error("{site}: could not start a browser session")]
    Launch {
        site: Source,
        #[source]
        cause: BrowserError,
    },

    #[error("{}: {reason}", path.display())]
    Schema { path: PathBuf, reason: String },

    #[error("configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// sysexits-style process exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Navigation { .. } => 69, // EX_UNAVAILABLE
            Error::Launch { .. } => 71,     // EX_OSERR
            Error::Schema { .. } => 65,     // EX_DATAERR
            Error::Io(_) => 74,             // EX_IOERR
            Error::Config(_) => 78,         // EX_CONFIG
        }
    }
}

/// Failures surfaced by a browser [`Session`](crate::browser::Session).
#[derive(Debug, Clone, Error)]
pub enum BrowserError {
    #[error("timed out after {waited:?} waiting for {locator}")]
    Timeout { locator: String, waited: Duration },

    #[error("browser session lost: {0}")]
    SessionLost(String),

    #[error("script error: {0}")]
    Script(String),

    #[error("launch failed: {0}")]
    Launch(String),
}

/// One field of one review card could not be read. Always recovered as null.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("{field}: nothing matches `{selector}`")]
    Missing { field: RawField, selector: &'static str },

    #[error("{field}: cannot parse {raw:?}")]
    Unparseable { field: RawField, raw: String },

    #[error("{field}: invalid selector `{selector}`")]
    Selector { field: RawField, selector: &'static str },
}

/// Malformed number/date text met by the normalizer. Always recovered as null.
#[derive(Debug, Error)]
#[error("{column}: cannot read {raw:?} as {expected}")]
pub struct ParseError {
    pub column: &'static str,
    pub raw: String,
    pub expected: &'static str,
}
