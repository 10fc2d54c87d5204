use std::io;

use thiserror::Error;

/// Failures that stop a search. Exhausting a keyspace without a match is not one of them.
#[derive(Debug, Error)]
pub enum CrackError {
    /// Rejected before any candidate is hashed.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// The hash oracle could not process a candidate with the given salt.
    #[error("hash oracle failed for salt '{salt}': {reason}")]
    Oracle { salt: String, reason: String },
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl CrackError {
    pub(crate) fn config(reason: impl Into<String>) -> Self {
        Self::Configuration(reason.into())
    }

    pub(crate) fn oracle(salt: &str, reason: impl Into<String>) -> Self {
        Self::Oracle {
            salt: salt.to_owned(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CrackError>;
