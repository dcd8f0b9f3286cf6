//! # Market Feed Protocol
//!
//! Decode-only client core for a compact binary market-data stream: pool
//! state updates, priority fees, blockhashes, swap quotes, heartbeats and
//! USD price entries.
//!
//! Every decoder takes an untrusted payload and either returns a complete,
//! owned record or nothing. Decoders never panic and never read past the
//! end of the buffer they were given.
//!
//! ## Quick Start
//! ```rust
//! use market_feed_protocol::protocol::decoder::{decode_message, decode_priority_fees};
//! use market_feed_protocol::protocol::message::DecodedMessage;
//!
//! let mut payload = vec![0u8; 119];
//! payload[0..8].copy_from_slice(&42u64.to_le_bytes());
//! let fees = decode_priority_fees(&payload).expect("119-byte payload");
//! assert_eq!(fees.slot, 42);
//!
//! // one byte short: nothing comes back
//! assert!(decode_priority_fees(&payload[..118]).is_none());
//!
//! let mut frame = vec![0x05];
//! frame.extend_from_slice(&payload);
//! assert!(matches!(decode_message(&frame), Ok(Some(DecodedMessage::PriorityFees(_)))));
//! ```
//!
//! ## Modules
//! - [`core`]: frame split, wire reader, fixed layout tables
//! - [`protocol`]: messages, decoders, dispatcher
//! - [`utils`]: base-58 codec, logging, metrics
//! - [`config`]: decoder limits and logging settings
//! - [`error`]: error type

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod utils;

pub use crate::core::frame::Frame;
pub use crate::error::{ProtocolError, Result};
pub use crate::protocol::decoder::{
    decode_blockhash, decode_heartbeat, decode_message, decode_pool_update,
    decode_pool_update_batch, decode_price_entries, decode_price_update, decode_priority_fees,
    decode_quote,
};
pub use crate::protocol::dispatcher::Dispatcher;
pub use crate::protocol::message::{
    Blockhash, DecodedMessage, Heartbeat, MessageType, NetworkState, OrderLevel, PoolUpdate,
    PriceEntry, PriorityFees, Quote,
};
