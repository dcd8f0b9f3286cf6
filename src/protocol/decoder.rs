//! # Frame Decoder
//!
//! One decode function per binary message kind.
//!
//! Every function takes the payload that follows the 1-byte tag; the slice
//! length is the declared length and nothing outside it is ever touched. A
//! function either returns a fully populated record or `None`. It never
//! panics and never hands back a partially filled record.
//!
//! Fixed-size messages are read through the tables in [`crate::core::layout`].
//! Variable-size messages are read field by field with
//! [`WireReader`](crate::core::reader::WireReader), and follow two policies:
//!
//! - required fields fail the whole record when the buffer is short;
//! - list fields and optional fields are truncated or left absent instead,
//!   and a bad element of a batch is skipped without aborting the batch.
//!
//! ## PoolUpdate
//! ```text
//! [state_len u64][state bytes]
//! [sequence u64][slot u64][write_version u64]
//! [name_len u64][protocol_name]
//! [pool_address 32]                             <- required up to here
//! [mint_count u64][mint 32]*
//! [balance_count u64][balance u64]*
//! [decimals_count u64][decimals i32]*
//! [bid_flag u8][price u64][size u64]?
//! [ask_flag u8][price u64][size u64]?
//! ```
//!
//! ## Quote
//! ```text
//! [topic_len u64][topic_id][timestamp_ms u64][sequence u64]
//! [input_mint 32][output_mint 32][in_amount u64][out_amount u64]
//! [price_impact_bps i32][context_slot u64][algo_len u64][algorithm]
//! [is_improvement u8][is_cached u8][is_stale u8]   <- required up to here
//! [route_len u64][route_plan_json]?
//! ```
//!
//! ## PoolUpdateBatch
//! ```text
//! [count u16] ([len u32][PoolUpdate payload])*
//! ```
//!
//! ## Price entries
//! The price feed is carried outside the tag enumeration. A price update is a
//! single 56-byte entry; batches and snapshots share one list layout:
//! ```text
//! [count u16] [PriceEntry 56]*
//! ```

use crate::core::layout::{self, FixedReader};
use crate::core::reader::{WireReader, PUBKEY_LEN};
use crate::error::{ProtocolError, Result};
use crate::protocol::message::{
    Blockhash, DecodedMessage, Heartbeat, MessageType, NetworkState, OrderLevel, PoolUpdate,
    PriceEntry, PriorityFees, Quote,
};
use tracing::trace;

/// Presence flag value meaning "field follows"
const PRESENT: u8 = 1;

/// Decode a priority fee snapshot (119 bytes).
pub fn decode_priority_fees(data: &[u8]) -> Option<PriorityFees> {
    read_priority_fees(data).ok()
}

/// Decode a blockhash update (65 bytes).
pub fn decode_blockhash(data: &[u8]) -> Option<Blockhash> {
    read_blockhash(data).ok()
}

/// Decode a heartbeat (36 bytes).
pub fn decode_heartbeat(data: &[u8]) -> Option<Heartbeat> {
    read_heartbeat(data).ok()
}

/// Decode the timestamp carried by a pong (8 bytes).
pub fn decode_pong(data: &[u8]) -> Option<u64> {
    let r = layout::pong::LAYOUT.reader(data).ok()?;
    r.u64(layout::pong::TIMESTAMP_MS).ok()
}

/// Error frames carry plain text.
pub fn decode_error_message(data: &[u8]) -> String {
    String::from_utf8_lossy(data).into_owned()
}

/// Decode a single pool update.
pub fn decode_pool_update(data: &[u8]) -> Option<PoolUpdate> {
    read_pool_update(&mut WireReader::new(data)).ok()
}

/// Decode a quote.
pub fn decode_quote(data: &[u8]) -> Option<Quote> {
    read_quote(&mut WireReader::new(data)).ok()
}

/// Result of walking a pool update batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Elements that decoded, in wire order
    pub updates: Vec<PoolUpdate>,
    /// Elements whose length header and body were present in the buffer,
    /// whether or not they decoded
    pub received: usize,
}

impl BatchOutcome {
    /// Elements that were on the wire but did not decode
    pub fn skipped(&self) -> usize {
        self.received - self.updates.len()
    }
}

/// Decode a batch of pool updates.
///
/// Elements that fail to decode are left out; the others keep their order.
/// Decoding stops at the first element whose length header or body runs past
/// the end of the buffer.
pub fn decode_pool_update_batch(data: &[u8]) -> Vec<PoolUpdate> {
    decode_pool_update_batch_outcome(data).updates
}

/// Same walk as [`decode_pool_update_batch`], also reporting how many
/// elements were actually present.
pub fn decode_pool_update_batch_outcome(data: &[u8]) -> BatchOutcome {
    let mut reader = WireReader::new(data);
    let count = match reader.read_u16() {
        Ok(count) => count,
        Err(_) => return BatchOutcome::default(),
    };

    // each element needs at least its 4-byte length header
    let mut outcome = BatchOutcome {
        updates: Vec::with_capacity(usize::from(count).min(reader.remaining() / 4)),
        received: 0,
    };
    for index in 0..count {
        let element = reader
            .read_u32()
            .and_then(|len| reader.read_bytes(len as usize));
        let element = match element {
            Ok(bytes) => bytes,
            Err(e) => {
                trace!(index, declared = count, error = %e, "Batch ended early");
                break;
            }
        };

        outcome.received += 1;
        match decode_pool_update(element) {
            Some(update) => outcome.updates.push(update),
            None => trace!(index, len = element.len(), "Skipping undecodable batch element"),
        }
    }

    outcome
}

/// Decode a single price entry (56 bytes).
pub fn decode_price_update(data: &[u8]) -> Option<PriceEntry> {
    read_price_entry(data).ok()
}

/// Decode a counted list of price entries, as sent in price batches and
/// snapshots.
///
/// Entries that do not fit entirely in the buffer are dropped, along with
/// everything after them.
pub fn decode_price_entries(data: &[u8]) -> Vec<PriceEntry> {
    let entry_len = layout::price_entry::LAYOUT.size;
    let mut reader = WireReader::new(data);
    let count = match reader.read_u16() {
        Ok(count) => usize::from(count),
        Err(_) => return Vec::new(),
    };

    let mut entries = Vec::with_capacity(count.min(reader.remaining() / entry_len));
    for index in 0..count {
        let entry = match reader.read_bytes(entry_len).and_then(read_price_entry) {
            Ok(entry) => entry,
            Err(e) => {
                trace!(index, declared = count, error = %e, "Price list ended early");
                break;
            }
        };
        entries.push(entry);
    }
    entries
}

/// Decode a full frame: tag byte followed by its payload.
///
/// Returns `Ok(None)` for tags whose payload is not binary (JSON control
/// messages, ping). Payload failures are reported as `TruncatedInput`.
///
/// # Errors
/// - `ProtocolError::EmptyFrame` if `frame` is empty
/// - `ProtocolError::UnknownMessageType` for tags outside the enumeration
/// - `ProtocolError::TruncatedInput` if a fixed or required field is missing
pub fn decode_message(frame: &[u8]) -> Result<Option<DecodedMessage>> {
    let (&tag, payload) = frame.split_first().ok_or(ProtocolError::EmptyFrame)?;
    decode_payload(MessageType::try_from(tag)?, payload)
}

/// Decode a payload whose tag has already been stripped.
pub fn decode_payload(kind: MessageType, payload: &[u8]) -> Result<Option<DecodedMessage>> {
    let message = match kind {
        MessageType::PoolUpdate => {
            DecodedMessage::PoolUpdate(read_pool_update(&mut WireReader::new(payload))?)
        }
        MessageType::PoolUpdateBatch => {
            DecodedMessage::PoolUpdateBatch(decode_pool_update_batch(payload))
        }
        MessageType::PriorityFees => DecodedMessage::PriorityFees(read_priority_fees(payload)?),
        MessageType::Blockhash => DecodedMessage::Blockhash(read_blockhash(payload)?),
        MessageType::Quote => DecodedMessage::Quote(read_quote(&mut WireReader::new(payload))?),
        MessageType::Heartbeat => DecodedMessage::Heartbeat(read_heartbeat(payload)?),
        MessageType::Pong => {
            let r = layout::pong::LAYOUT.reader(payload)?;
            DecodedMessage::Pong {
                timestamp_ms: r.u64(layout::pong::TIMESTAMP_MS)?,
            }
        }
        MessageType::Error => DecodedMessage::Error(decode_error_message(payload)),
        MessageType::Subscribe
        | MessageType::Subscribed
        | MessageType::Unsubscribe
        | MessageType::QuoteSubscribed
        | MessageType::SubscribeQuote
        | MessageType::UnsubscribeQuote
        | MessageType::Ping => return Ok(None),
    };
    Ok(Some(message))
}

fn read_priority_fees(data: &[u8]) -> Result<PriorityFees> {
    use layout::priority_fees::*;

    let r: FixedReader<'_> = LAYOUT.reader(data)?;
    Ok(PriorityFees {
        slot: r.u64(SLOT)?,
        timestamp_ms: r.u64(TIMESTAMP_MS)?,
        recommended: r.u64(RECOMMENDED)?,
        state: NetworkState::from(r.u8(STATE)?),
        is_stale: r.bool(IS_STALE)?,
        swap_p50: r.u64(SWAP_P50)?,
        swap_p75: r.u64(SWAP_P75)?,
        swap_p90: r.u64(SWAP_P90)?,
        swap_p99: r.u64(SWAP_P99)?,
        swap_samples: r.u32(SWAP_SAMPLES)?,
        landing_p50_fee: r.u64(LANDING_P50)?,
        landing_p75_fee: r.u64(LANDING_P75)?,
        landing_p90_fee: r.u64(LANDING_P90)?,
        landing_p99_fee: r.u64(LANDING_P99)?,
        top_10_fee: r.u64(TOP_10)?,
        top_25_fee: r.u64(TOP_25)?,
        spike_detected: r.bool(SPIKE_DETECTED)?,
        spike_fee: r.u64(SPIKE_FEE)?,
    })
}

fn read_blockhash(data: &[u8]) -> Result<Blockhash> {
    use layout::blockhash::*;

    let r = LAYOUT.reader(data)?;
    Ok(Blockhash {
        slot: r.u64(SLOT)?,
        timestamp_ms: r.u64(TIMESTAMP_MS)?,
        blockhash: r.pubkey(HASH)?,
        block_height: r.u64(BLOCK_HEIGHT)?,
        last_valid_block_height: r.u64(LAST_VALID_BLOCK_HEIGHT)?,
        is_stale: r.bool(IS_STALE)?,
    })
}

fn read_heartbeat(data: &[u8]) -> Result<Heartbeat> {
    use layout::heartbeat::*;

    let r = LAYOUT.reader(data)?;
    Ok(Heartbeat {
        timestamp_ms: r.u64(TIMESTAMP_MS)?,
        uptime_seconds: r.u64(UPTIME_SECONDS)?,
        messages_received: r.u64(MESSAGES_RECEIVED)?,
        messages_sent: r.u64(MESSAGES_SENT)?,
        subscriptions: r.u32(SUBSCRIPTIONS)?,
    })
}

fn read_price_entry(data: &[u8]) -> Result<PriceEntry> {
    use layout::price_entry::*;

    let r = LAYOUT.reader(data)?;
    Ok(PriceEntry {
        mint: r.pubkey(MINT)?,
        raw_usd_price: r.u64(USD_PRICE)?,
        slot: r.u64(SLOT)?,
        timestamp_ms: r.u64(TIMESTAMP_MS)?,
    })
}

fn read_pool_update(r: &mut WireReader<'_>) -> Result<PoolUpdate> {
    let serialized_state = r.read_len_prefixed()?.to_vec();
    let sequence = r.read_u64()?;
    let slot = r.read_u64()?;
    let write_version = r.read_u64()?;
    let protocol_name = r.read_string()?;
    let pool_address = r.read_pubkey()?;

    // Lenient tail: lists cut short and absent levels are not failures.
    let (token_mints, _) = r.read_list(PUBKEY_LEN, |r| r.read_pubkey());
    let (token_balances, _) = r.read_list(8, |r| r.read_u64());
    let (token_decimals, _) = r.read_list(4, |r| r.read_i32());
    let best_bid = read_optional_level(r);
    let best_ask = read_optional_level(r);

    Ok(PoolUpdate {
        sequence,
        slot,
        write_version,
        protocol_name,
        pool_address,
        token_mints,
        token_balances,
        token_decimals,
        best_bid,
        best_ask,
        serialized_state,
    })
}

/// Presence byte then price and size.
///
/// A missing flag byte or a body cut short reads as absent. Any flag other
/// than `1` is consumed and means absent.
fn read_optional_level(r: &mut WireReader<'_>) -> Option<OrderLevel> {
    if r.read_u8().ok()? != PRESENT {
        return None;
    }
    let body = r.read_bytes(16).ok()?;
    let mut level = WireReader::new(body);
    Some(OrderLevel {
        price: level.read_u64().ok()?,
        size: level.read_u64().ok()?,
    })
}

fn read_quote(r: &mut WireReader<'_>) -> Result<Quote> {
    let topic_id = r.read_string()?;
    let timestamp_ms = r.read_u64()?;
    let sequence = r.read_u64()?;
    let input_mint = r.read_pubkey()?;
    let output_mint = r.read_pubkey()?;
    let in_amount = r.read_u64()?;
    let out_amount = r.read_u64()?;
    let price_impact_bps = r.read_i32()?;
    let context_slot = r.read_u64()?;
    let algorithm = r.read_string()?;
    let is_improvement = r.read_bool()?;
    let is_cached = r.read_bool()?;
    let is_stale = r.read_bool()?;

    // Optional by truncation: absent when the frame ends before it.
    let route_plan_json = r.read_string().ok();

    Ok(Quote {
        topic_id,
        timestamp_ms,
        sequence,
        input_mint,
        output_mint,
        in_amount,
        out_amount,
        price_impact_bps,
        context_slot,
        algorithm,
        is_improvement,
        is_cached,
        is_stale,
        route_plan_json,
    })
}
