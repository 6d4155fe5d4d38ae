//! Error types for mcrcon
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using RconError
pub type Result<T> = std::result::Result<T, RconError>;

/// Unified error type for mcrcon operations
#[derive(Debug, Error)]
pub enum RconError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Decoding error: {0}")]
    Decoding(String),

    // -------------------------------------------------------------------------
    // Session Errors
    // -------------------------------------------------------------------------
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Authentication failed: incorrect RCON password")]
    AuthenticationFailed,

    #[error("Command error: {0}")]
    Command(String),

    #[error("Reconnect failed after {attempts} attempts")]
    ReconnectExhausted { attempts: u32 },

    #[error("Operation cancelled")]
    Cancelled,

    // -------------------------------------------------------------------------
    // Cache Errors
    // -------------------------------------------------------------------------
    #[error("Cache error: {0}")]
    Cache(String),

    // -------------------------------------------------------------------------
    // Collaborator Errors
    // -------------------------------------------------------------------------
    #[error("Credential error: {0}")]
    Credential(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl RconError {
    /// Whether this error means the transport is gone and a reconnect may help.
    ///
    /// Authentication failures and command-level errors are not included.
    pub fn is_connection_lost(&self) -> bool {
        matches!(self, RconError::Connection(_) | RconError::Io(_))
    }
}
