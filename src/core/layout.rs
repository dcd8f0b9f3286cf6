//! # Fixed Layouts
//!
//! Schema tables for the fixed-size messages.
//!
//! Each message is described by a [`Layout`]: a total size and a list of
//! [`FieldSpec`] entries giving every field's name, byte offset and
//! interpretation. Decoders never compute offsets themselves; they ask the
//! table. This keeps the byte layout, which is a contract with the server, in
//! one place where it can be checked on its own.
//!
//! ```text
//! PriorityFees (119 bytes)
//! [slot 8][timestamp_ms 8][recommended 8][state 1][is_stale 1]
//! [swap_p50 8][swap_p75 8][swap_p90 8][swap_p99 8][swap_samples 4]
//! [landing_p50 8][landing_p75 8][landing_p90 8][landing_p99 8]
//! [top_10 8][top_25 8][spike_detected 1][spike_fee 8]
//!
//! Blockhash (65 bytes)
//! [slot 8][timestamp_ms 8][hash 32][block_height 8][last_valid_block_height 8][is_stale 1]
//!
//! Heartbeat (36 bytes)
//! [timestamp_ms 8][uptime_seconds 8][messages_received 8][messages_sent 8][subscriptions 4]
//!
//! PriceEntry (56 bytes)
//! [mint 32][usd_price 8][slot 8][timestamp_ms 8]
//! ```

use crate::core::reader::PUBKEY_LEN;
use crate::error::{ProtocolError, Result};
use crate::utils::base58;

/// How the bytes of a field are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    U8,
    Bool,
    U32,
    U64,
    /// 32 raw bytes, rendered as base-58
    Pubkey,
}

impl FieldKind {
    /// Width of the field on the wire
    pub const fn width(self) -> usize {
        match self {
            FieldKind::U8 | FieldKind::Bool => 1,
            FieldKind::U32 => 4,
            FieldKind::U64 => 8,
            FieldKind::Pubkey => PUBKEY_LEN,
        }
    }
}

/// One named field at a fixed offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub offset: usize,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn new(name: &'static str, offset: usize, kind: FieldKind) -> Self {
        Self { name, offset, kind }
    }

    /// Offset one past the last byte of this field
    pub const fn end(&self) -> usize {
        self.offset + self.kind.width()
    }
}

/// Table describing a fixed-size message
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    pub name: &'static str,
    pub size: usize,
    pub fields: &'static [FieldSpec],
}

impl Layout {
    /// Check the buffer holds the whole layout and return a reader over it.
    ///
    /// Longer buffers are accepted; bytes past `size` are ignored.
    pub fn reader<'a>(&self, data: &'a [u8]) -> Result<FixedReader<'a>> {
        if data.len() < self.size {
            return Err(ProtocolError::TruncatedInput {
                needed: self.size,
                available: data.len(),
            });
        }
        Ok(FixedReader {
            data: &data[..self.size],
        })
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Verify the table: fields in order, no gaps or overlaps, ending at `size`.
    pub fn check(&self) -> std::result::Result<(), String> {
        let mut cursor = 0;
        for field in self.fields {
            if field.offset != cursor {
                return Err(format!(
                    "{}: field '{}' at offset {} but previous field ends at {}",
                    self.name, field.name, field.offset, cursor
                ));
            }
            cursor = field.end();
        }
        if cursor != self.size {
            return Err(format!(
                "{}: fields end at {} but layout size is {}",
                self.name, cursor, self.size
            ));
        }
        Ok(())
    }
}

/// Reader over a buffer already checked against a [`Layout`]
#[derive(Debug, Clone, Copy)]
pub struct FixedReader<'a> {
    data: &'a [u8],
}

impl<'a> FixedReader<'a> {
    fn bytes(&self, field: FieldSpec, expected: FieldKind) -> Result<&'a [u8]> {
        debug_assert_eq!(field.kind, expected, "field '{}' read as wrong kind", field.name);
        self.data
            .get(field.offset..field.end())
            .ok_or(ProtocolError::TruncatedInput {
                needed: field.end(),
                available: self.data.len(),
            })
    }

    fn array<const N: usize>(&self, field: FieldSpec, expected: FieldKind) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.bytes(field, expected)?);
        Ok(out)
    }

    pub fn u8(&self, field: FieldSpec) -> Result<u8> {
        Ok(self.bytes(field, FieldKind::U8)?[0])
    }

    pub fn bool(&self, field: FieldSpec) -> Result<bool> {
        Ok(self.bytes(field, FieldKind::Bool)?[0] != 0)
    }

    pub fn u32(&self, field: FieldSpec) -> Result<u32> {
        self.array(field, FieldKind::U32).map(u32::from_le_bytes)
    }

    pub fn u64(&self, field: FieldSpec) -> Result<u64> {
        self.array(field, FieldKind::U64).map(u64::from_le_bytes)
    }

    pub fn pubkey(&self, field: FieldSpec) -> Result<String> {
        self.bytes(field, FieldKind::Pubkey).map(base58::encode)
    }
}

pub mod priority_fees {
    use super::{FieldKind::*, FieldSpec, Layout};

    pub const SLOT: FieldSpec = FieldSpec::new("slot", 0, U64);
    pub const TIMESTAMP_MS: FieldSpec = FieldSpec::new("timestamp_ms", 8, U64);
    pub const RECOMMENDED: FieldSpec = FieldSpec::new("recommended", 16, U64);
    pub const STATE: FieldSpec = FieldSpec::new("state", 24, U8);
    pub const IS_STALE: FieldSpec = FieldSpec::new("is_stale", 25, Bool);
    pub const SWAP_P50: FieldSpec = FieldSpec::new("swap_p50", 26, U64);
    pub const SWAP_P75: FieldSpec = FieldSpec::new("swap_p75", 34, U64);
    pub const SWAP_P90: FieldSpec = FieldSpec::new("swap_p90", 42, U64);
    pub const SWAP_P99: FieldSpec = FieldSpec::new("swap_p99", 50, U64);
    pub const SWAP_SAMPLES: FieldSpec = FieldSpec::new("swap_samples", 58, U32);
    pub const LANDING_P50: FieldSpec = FieldSpec::new("landing_p50_fee", 62, U64);
    pub const LANDING_P75: FieldSpec = FieldSpec::new("landing_p75_fee", 70, U64);
    pub const LANDING_P90: FieldSpec = FieldSpec::new("landing_p90_fee", 78, U64);
    pub const LANDING_P99: FieldSpec = FieldSpec::new("landing_p99_fee", 86, U64);
    pub const TOP_10: FieldSpec = FieldSpec::new("top_10_fee", 94, U64);
    pub const TOP_25: FieldSpec = FieldSpec::new("top_25_fee", 102, U64);
    pub const SPIKE_DETECTED: FieldSpec = FieldSpec::new("spike_detected", 110, Bool);
    pub const SPIKE_FEE: FieldSpec = FieldSpec::new("spike_fee", 111, U64);

    pub static LAYOUT: Layout = Layout {
        name: "PriorityFees",
        size: 119,
        fields: &[
            SLOT,
            TIMESTAMP_MS,
            RECOMMENDED,
            STATE,
            IS_STALE,
            SWAP_P50,
            SWAP_P75,
            SWAP_P90,
            SWAP_P99,
            SWAP_SAMPLES,
            LANDING_P50,
            LANDING_P75,
            LANDING_P90,
            LANDING_P99,
            TOP_10,
            TOP_25,
            SPIKE_DETECTED,
            SPIKE_FEE,
        ],
    };
}

pub mod blockhash {
    use super::{FieldKind::*, FieldSpec, Layout};

    pub const SLOT: FieldSpec = FieldSpec::new("slot", 0, U64);
    pub const TIMESTAMP_MS: FieldSpec = FieldSpec::new("timestamp_ms", 8, U64);
    pub const HASH: FieldSpec = FieldSpec::new("blockhash", 16, Pubkey);
    pub const BLOCK_HEIGHT: FieldSpec = FieldSpec::new("block_height", 48, U64);
    pub const LAST_VALID_BLOCK_HEIGHT: FieldSpec =
        FieldSpec::new("last_valid_block_height", 56, U64);
    pub const IS_STALE: FieldSpec = FieldSpec::new("is_stale", 64, Bool);

    pub static LAYOUT: Layout = Layout {
        name: "Blockhash",
        size: 65,
        fields: &[
            SLOT,
            TIMESTAMP_MS,
            HASH,
            BLOCK_HEIGHT,
            LAST_VALID_BLOCK_HEIGHT,
            IS_STALE,
        ],
    };
}

pub mod heartbeat {
    use super::{FieldKind::*, FieldSpec, Layout};

    pub const TIMESTAMP_MS: FieldSpec = FieldSpec::new("timestamp_ms", 0, U64);
    pub const UPTIME_SECONDS: FieldSpec = FieldSpec::new("uptime_seconds", 8, U64);
    pub const MESSAGES_RECEIVED: FieldSpec = FieldSpec::new("messages_received", 16, U64);
    pub const MESSAGES_SENT: FieldSpec = FieldSpec::new("messages_sent", 24, U64);
    pub const SUBSCRIPTIONS: FieldSpec = FieldSpec::new("subscriptions", 32, U32);

    pub static LAYOUT: Layout = Layout {
        name: "Heartbeat",
        size: 36,
        fields: &[
            TIMESTAMP_MS,
            UPTIME_SECONDS,
            MESSAGES_RECEIVED,
            MESSAGES_SENT,
            SUBSCRIPTIONS,
        ],
    };
}

pub mod pong {
    use super::{FieldKind::*, FieldSpec, Layout};

    pub const TIMESTAMP_MS: FieldSpec = FieldSpec::new("timestamp_ms", 0, U64);

    pub static LAYOUT: Layout = Layout {
        name: "Pong",
        size: 8,
        fields: &[TIMESTAMP_MS],
    };
}

/// One entry of the price feed. Price updates carry a single entry; price
/// batches and snapshots carry a u16 count followed by entries back to back.
pub mod price_entry {
    use super::{FieldKind::*, FieldSpec, Layout};

    pub const MINT: FieldSpec = FieldSpec::new("mint", 0, Pubkey);
    /// Fixed-point, 12 decimal places
    pub const USD_PRICE: FieldSpec = FieldSpec::new("usd_price", 32, U64);
    pub const SLOT: FieldSpec = FieldSpec::new("slot", 40, U64);
    pub const TIMESTAMP_MS: FieldSpec = FieldSpec::new("timestamp_ms", 48, U64);

    pub static LAYOUT: Layout = Layout {
        name: "PriceEntry",
        size: 56,
        fields: &[MINT, USD_PRICE, SLOT, TIMESTAMP_MS],
    };
}

/// Every fixed layout known to the decoder
pub fn all() -> [&'static Layout; 5] {
    [
        &priority_fees::LAYOUT,
        &blockhash::LAYOUT,
        &heartbeat::LAYOUT,
        &pong::LAYOUT,
        &price_entry::LAYOUT,
    ]
}
