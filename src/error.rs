//! The error taxonomy of this crate
//!
//! Every failure is handled at the boundary where it occurs: validation errors are
//! returned to the caller with the mutation unapplied, parse errors of stored data are
//! recovered by falling back to defaults, and sync errors become a status message.
//! None of them should ever take the application down.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// User input failed a precondition (empty title or name, invalid date or color).
    /// The mutation has not been applied.
    #[error("invalid input: {0}")]
    Validation(String),

    /// A stored document could not be parsed. Recovered by falling back to defaults.
    #[error("unable to parse stored data: {0}")]
    PersistenceParse(#[from] serde_json::Error),

    /// A network failure, a non-success response, or a malformed remote payload.
    /// Local state is unaffected.
    #[error("sync failed: {0}")]
    SyncTransport(String),

    /// An imported file does not have the expected shape. Current state is preserved.
    #[error("invalid import file: {0}")]
    ImportFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::SyncTransport(err.to_string())
    }
}
