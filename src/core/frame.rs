//! # Frame
//!
//! A received message split into its tag and payload.
//!
//! ```text
//! [Type(1)] [Payload(N)]
//! ```
//!
//! The split is zero-copy: the payload is a [`Bytes`] slice of the original
//! buffer. Framing itself (one websocket message per frame) is the caller's
//! job; this only validates the tag and the size limit.

use crate::config::MAX_FRAME_SIZE;
use crate::error::{ProtocolError, Result};
use crate::protocol::message::MessageType;
use bytes::Bytes;

/// Tag plus payload of one wire message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub message_type: MessageType,
    pub payload: Bytes,
}

impl Frame {
    /// Split a frame using the default size limit.
    pub fn parse(frame: Bytes) -> Result<Self> {
        Self::parse_with_limit(frame, MAX_FRAME_SIZE)
    }

    /// Split a frame, rejecting anything larger than `max_size` bytes.
    ///
    /// # Errors
    /// - `ProtocolError::EmptyFrame` if there is no tag byte
    /// - `ProtocolError::OversizedFrame` if the frame exceeds `max_size`
    /// - `ProtocolError::UnknownMessageType` if the tag is not recognised
    pub fn parse_with_limit(frame: Bytes, max_size: usize) -> Result<Self> {
        if frame.len() > max_size {
            return Err(ProtocolError::OversizedFrame(frame.len()));
        }
        let tag = *frame.first().ok_or(ProtocolError::EmptyFrame)?;
        let message_type = MessageType::try_from(tag)?;
        Ok(Self {
            message_type,
            payload: frame.slice(1..),
        })
    }

    /// Size on the wire including the tag
    pub fn wire_len(&self) -> usize {
        self.payload.len() + 1
    }
}
