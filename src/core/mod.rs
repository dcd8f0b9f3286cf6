//! # Core Wire Components
//!
//! Low-level pieces the decoders are built from.
//!
//! ## Components
//! - **Frame**: zero-copy split of a received message into tag and payload
//! - **Reader**: bounds-checked little-endian cursor for variable layouts
//! - **Layout**: schema tables for the fixed-size messages
//!
//! ## Wire Format
//! ```text
//! [Type(1)] [Payload(N)]
//! ```
//! All multi-byte integers are little-endian. Variable-length fields carry
//! a u64 length or count header.
//!
//! ## Safety
//! - Declared lengths are checked against the remaining bytes before any copy
//! - List capacity is bounded by the bytes left, never by the declared count
//! - Maximum frame size: 16MB by default

pub mod frame;
pub mod layout;
pub mod reader;
