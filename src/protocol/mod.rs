//! # Protocol Layer
//!
//! Message types, per-kind decoders and frame dispatch.
//!
//! ## Components
//! - **Message**: tags and decoded records
//! - **Decoder**: one pure decode function per binary message kind
//! - **Dispatcher**: frame-level decoding with limits, metrics and handler routing
//!
//! ## Message Flow
//! ```text
//! frame -> strip tag -> MessageType -> decode_<kind>(payload) -> record
//! ```
//! Only binary payloads are decoded here. JSON control messages (subscribe,
//! subscribed, ...) are recognised by tag and passed over.

pub mod decoder;
pub mod dispatcher;
pub mod message;
