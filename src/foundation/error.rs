use std::path::PathBuf;

use crate::generate::model::Kind;

/// Convenience result type used across traitforge.
pub type ForgeResult<T> = Result<T, ForgeError>;

/// Top-level error taxonomy used by generator APIs.
///
/// A sampled draw that fails the rule engine or deduplication is not an error and never
/// surfaces here; the generator simply retries it.
#[derive(thiserror::Error, Debug)]
pub enum ForgeError {
    /// Malformed or missing asset directories or collection settings.
    #[error("config error: {0}")]
    Config(String),

    /// The sampler hit its attempt ceiling without accepting a new combination.
    #[error("sampling exhausted: no new valid {kind} combination after {attempts} attempts")]
    Exhausted {
        /// Kind that was being sampled.
        kind: Kind,
        /// Consecutive rejected draws before giving up.
        attempts: u64,
    },

    /// Persisting generation progress failed.
    #[error("state write error: {0}")]
    StateWrite(String),

    /// A layer file referenced by an accepted combination does not exist.
    #[error("missing asset file '{}'", .0.display())]
    MissingAsset(PathBuf),

    /// Stacking layers or copying a finished artwork failed.
    #[error("compositing error: {0}")]
    Compositing(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ForgeError {
    /// Build a [`ForgeError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`ForgeError::StateWrite`] value.
    pub fn state_write(msg: impl Into<String>) -> Self {
        Self::StateWrite(msg.into())
    }

    /// Build a [`ForgeError::Compositing`] value.
    pub fn compositing(msg: impl Into<String>) -> Self {
        Self::Compositing(msg.into())
    }

    /// Build a [`ForgeError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
