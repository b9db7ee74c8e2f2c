//! Cross-cutting error types for orgsync.
//!
//! Transport and configuration errors live in their own crates
//! (`ClientError`, `ConfigError`); they converge into `anyhow` in `orgsync-cli`.

use thiserror::Error;

use crate::Id;

/// Errors that can be raised by any orgsync crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: Id },

    /// Data failed validation before any request was sent.
    #[error("Validation error: {0}")]
    Validation(String),
}

impl CoreError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
