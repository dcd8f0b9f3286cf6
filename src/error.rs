//! # Error Types
//!
//! Error handling for the market feed decoder.
//!
//! The decoding core only ever fails in two ways: the buffer is shorter than a
//! field requires ([`ProtocolError::TruncatedInput`]) or a base-58 string holds
//! a symbol outside the alphabet ([`ProtocolError::InvalidCharacter`]). The
//! remaining variants belong to the surfaces around the core: frame dispatch,
//! configuration loading and consumer-side checks.
//!
//! Per-message decoders never return these errors directly. They collapse a
//! reader failure into `None` so a partially filled record can never escape.
//!
//! ## Example Usage
//! ```rust
//! use market_feed_protocol::error::{ProtocolError, Result};
//! use market_feed_protocol::utils::base58;
//!
//! fn mint_bytes(text: &str) -> Result<Vec<u8>> {
//!     let bytes = base58::decode(text)?;
//!     if bytes.len() != 32 {
//!         return Err(ProtocolError::Custom(format!("expected 32 bytes, got {}", bytes.len())));
//!     }
//!     Ok(bytes)
//! }
//!
//! assert!(matches!(
//!     mint_bytes("0OIl"),
//!     Err(ProtocolError::InvalidCharacter { character: '0', index: 0 })
//! ));
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Dispatcher-related error messages
    pub const ERR_DISPATCHER_WRITE_LOCK: &str = "Failed to acquire write lock on dispatcher";
    pub const ERR_DISPATCHER_READ_LOCK: &str = "Failed to acquire read lock on dispatcher";

    /// Configuration errors
    pub const ERR_CONFIG_OPEN: &str = "Failed to open config file";
    pub const ERR_CONFIG_READ: &str = "Failed to read config file";
    pub const ERR_CONFIG_PARSE: &str = "Failed to parse TOML";
    pub const ERR_CONFIG_SERIALIZE: &str = "Failed to serialize config";
    pub const ERR_CONFIG_WRITE: &str = "Failed to write config file";

    /// Logging errors
    pub const ERR_LOGGING_INIT: &str = "Failed to install tracing subscriber";
}

/// ProtocolError is the primary error type for all decoder operations
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProtocolError {
    #[error("Truncated input: needed {needed} bytes, {available} available")]
    TruncatedInput { needed: usize, available: usize },

    #[error("Invalid base58 character {character:?} at index {index}")]
    InvalidCharacter { character: char, index: usize },

    #[error("Empty frame")]
    EmptyFrame,

    #[error("Unknown message type: 0x{0:02X}")]
    UnknownMessageType(u8),

    #[error("Frame too large: {0} bytes")]
    OversizedFrame(usize),

    #[error("Token list length mismatch: {mints} mints, {balances} balances, {decimals} decimals")]
    TokenListMismatch {
        mints: usize,
        balances: usize,
        decimals: usize,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Custom error: {0}")]
    Custom(String),
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;
