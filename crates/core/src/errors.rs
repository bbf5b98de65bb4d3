use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Session desynchronized: {0}")]
    Desync(String),

    #[error("{collaborator} failed: {source}")]
    Collaborator {
        collaborator: &'static str,
        #[source]
        source: eyre::Report,
    },

    #[error("{collaborator} timed out after {after:?}")]
    Timeout {
        collaborator: &'static str,
        after: Duration,
    },

    #[error("Aggregate commit failed: {0}")]
    Commit(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TrackerError {
    pub fn collaborator(collaborator: &'static str, source: impl Into<eyre::Report>) -> Self {
        Self::Collaborator {
            collaborator,
            source: source.into(),
        }
    }

    /// Whether this error breaks the duration-accounting invariant.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Commit(_))
    }
}

pub type TrackerResult<T> = Result<T, TrackerError>;
