//! Common error types.

use thiserror::Error;

/// Main error type for the player engine.
#[derive(Error, Debug)]
pub enum PlayerError {
    #[error("Page error: {0}")]
    Page(String),

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Shield error: {0}")]
    Shield(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type PlayerResult<T> = Result<T, PlayerError>;

impl PlayerError {
    pub fn page(msg: impl Into<String>) -> Self {
        Self::Page(msg.into())
    }

    pub fn node_not_found(msg: impl Into<String>) -> Self {
        Self::NodeNotFound(msg.into())
    }

    pub fn shield(msg: impl Into<String>) -> Self {
        Self::Shield(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidOperation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
