//! # Messages
//!
//! Message tags and the records produced by decoding.
//!
//! Every record owns its data. Nothing here borrows from the buffer it was
//! decoded from, so records can outlive the frame and cross threads freely.

use crate::error::{ProtocolError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// First byte of every wire message
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageType {
    /// Server → Client: single pool update
    PoolUpdate = 0x01,
    /// Client → Server: subscribe request (JSON)
    Subscribe = 0x02,
    /// Server → Client: subscription confirmed (JSON)
    Subscribed = 0x03,
    /// Client → Server: unsubscribe all
    Unsubscribe = 0x04,
    /// Server → Client: priority fee snapshot
    PriorityFees = 0x05,
    /// Server → Client: recent blockhash
    Blockhash = 0x06,
    /// Server → Client: streaming quote
    Quote = 0x07,
    /// Server → Client: quote subscription confirmed (JSON)
    QuoteSubscribed = 0x08,
    /// Client → Server: subscribe to a quote stream (JSON)
    SubscribeQuote = 0x09,
    /// Client → Server: unsubscribe from a quote stream (JSON)
    UnsubscribeQuote = 0x0A,
    /// Client → Server: keepalive
    Ping = 0x0B,
    /// Server → Client: keepalive reply carrying a u64 timestamp
    Pong = 0x0C,
    /// Server → Client: connection stats
    Heartbeat = 0x0D,
    /// Server → Client: batched pool updates
    PoolUpdateBatch = 0x0E,
    /// Server → Client: UTF-8 error text
    Error = 0xFF,
}

impl MessageType {
    pub const ALL: [MessageType; 15] = [
        MessageType::PoolUpdate,
        MessageType::Subscribe,
        MessageType::Subscribed,
        MessageType::Unsubscribe,
        MessageType::PriorityFees,
        MessageType::Blockhash,
        MessageType::Quote,
        MessageType::QuoteSubscribed,
        MessageType::SubscribeQuote,
        MessageType::UnsubscribeQuote,
        MessageType::Ping,
        MessageType::Pong,
        MessageType::Heartbeat,
        MessageType::PoolUpdateBatch,
        MessageType::Error,
    ];

    /// Wire tag
    #[inline]
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Whether the payload of this kind is binary and handled by the decoder.
    ///
    /// The remaining kinds carry JSON or nothing and are left to the caller.
    pub fn is_binary(self) -> bool {
        matches!(
            self,
            MessageType::PoolUpdate
                | MessageType::PriorityFees
                | MessageType::Blockhash
                | MessageType::Quote
                | MessageType::Pong
                | MessageType::Heartbeat
                | MessageType::PoolUpdateBatch
                | MessageType::Error
        )
    }

    /// Routing name, used in logs
    pub fn name(self) -> &'static str {
        match self {
            MessageType::PoolUpdate => "POOL_UPDATE",
            MessageType::Subscribe => "SUBSCRIBE",
            MessageType::Subscribed => "SUBSCRIBED",
            MessageType::Unsubscribe => "UNSUBSCRIBE",
            MessageType::PriorityFees => "PRIORITY_FEES",
            MessageType::Blockhash => "BLOCKHASH",
            MessageType::Quote => "QUOTE",
            MessageType::QuoteSubscribed => "QUOTE_SUBSCRIBED",
            MessageType::SubscribeQuote => "SUBSCRIBE_QUOTE",
            MessageType::UnsubscribeQuote => "UNSUBSCRIBE_QUOTE",
            MessageType::Ping => "PING",
            MessageType::Pong => "PONG",
            MessageType::Heartbeat => "HEARTBEAT",
            MessageType::PoolUpdateBatch => "POOL_UPDATE_BATCH",
            MessageType::Error => "ERROR",
        }
    }
}

impl TryFrom<u8> for MessageType {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self> {
        MessageType::ALL
            .into_iter()
            .find(|t| t.tag() == value)
            .ok_or(ProtocolError::UnknownMessageType(value))
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Network congestion state.
///
/// Codes outside the four known values are kept as `Unknown` instead of
/// being rejected, so a newer server can add states without breaking clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkState {
    Low,
    Normal,
    High,
    Extreme,
    Unknown(u8),
}

impl NetworkState {
    pub fn code(self) -> u8 {
        match self {
            NetworkState::Low => 0,
            NetworkState::Normal => 1,
            NetworkState::High => 2,
            NetworkState::Extreme => 3,
            NetworkState::Unknown(code) => code,
        }
    }

    pub fn is_known(self) -> bool {
        !matches!(self, NetworkState::Unknown(_))
    }
}

impl From<u8> for NetworkState {
    fn from(code: u8) -> Self {
        match code {
            0 => NetworkState::Low,
            1 => NetworkState::Normal,
            2 => NetworkState::High,
            3 => NetworkState::Extreme,
            other => NetworkState::Unknown(other),
        }
    }
}

impl fmt::Display for NetworkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkState::Low => f.write_str("low"),
            NetworkState::Normal => f.write_str("normal"),
            NetworkState::High => f.write_str("high"),
            NetworkState::Extreme => f.write_str("extreme"),
            NetworkState::Unknown(code) => write!(f, "unknown({code})"),
        }
    }
}

/// Fee-market snapshot at a slot. Fees are in microlamports per CU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityFees {
    pub slot: u64,
    pub timestamp_ms: u64,
    pub recommended: u64,
    pub state: NetworkState,
    pub is_stale: bool,
    pub swap_p50: u64,
    pub swap_p75: u64,
    pub swap_p90: u64,
    pub swap_p99: u64,
    /// Number of swaps the swap percentiles were computed from
    pub swap_samples: u32,
    pub landing_p50_fee: u64,
    pub landing_p75_fee: u64,
    pub landing_p90_fee: u64,
    pub landing_p99_fee: u64,
    pub top_10_fee: u64,
    pub top_25_fee: u64,
    pub spike_detected: bool,
    pub spike_fee: u64,
}

/// Most recent blockhash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blockhash {
    pub slot: u64,
    pub timestamp_ms: u64,
    /// Base-58 text of the 32 raw hash bytes
    pub blockhash: String,
    pub block_height: u64,
    pub last_valid_block_height: u64,
    pub is_stale: bool,
}

impl Blockhash {
    /// Whether a transaction built on this hash can still land at `block_height`.
    pub fn is_valid_at(&self, block_height: u64) -> bool {
        block_height <= self.last_valid_block_height
    }
}

/// Order book level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLevel {
    pub price: u64,
    pub size: u64,
}

impl OrderLevel {
    /// Ask price minus bid price, `None` when the book is crossed
    pub fn spread(bid: &OrderLevel, ask: &OrderLevel) -> Option<u64> {
        ask.price.checked_sub(bid.price)
    }
}

/// One DEX pool's state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolUpdate {
    /// Global sequence number for ordering
    pub sequence: u64,
    pub slot: u64,
    /// Write version within the slot
    pub write_version: u64,
    /// DEX protocol name, e.g. "RaydiumClmm"
    pub protocol_name: String,
    pub pool_address: String,
    pub token_mints: Vec<String>,
    pub token_balances: Vec<u64>,
    pub token_decimals: Vec<i32>,
    pub best_bid: Option<OrderLevel>,
    pub best_ask: Option<OrderLevel>,
    /// Opaque serialized pool state
    pub serialized_state: Vec<u8>,
}

/// A pool token with its balance and decimals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolToken<'a> {
    pub mint: &'a str,
    pub balance: u64,
    pub decimals: i32,
}

impl PoolUpdate {
    /// Mints, balances and decimals joined by position.
    ///
    /// The three lists are decoded with independent counts. They are only
    /// joined when the lengths agree.
    ///
    /// # Errors
    /// Returns `ProtocolError::TokenListMismatch` when the lengths differ.
    pub fn tokens(&self) -> Result<Vec<PoolToken<'_>>> {
        let (mints, balances, decimals) = (
            self.token_mints.len(),
            self.token_balances.len(),
            self.token_decimals.len(),
        );
        if mints != balances || mints != decimals {
            return Err(ProtocolError::TokenListMismatch {
                mints,
                balances,
                decimals,
            });
        }

        Ok(self
            .token_mints
            .iter()
            .zip(&self.token_balances)
            .zip(&self.token_decimals)
            .map(|((mint, balance), decimals)| PoolToken {
                mint,
                balance: *balance,
                decimals: *decimals,
            })
            .collect())
    }

    /// Bid/ask spread when both sides are present
    pub fn spread(&self) -> Option<u64> {
        match (&self.best_bid, &self.best_ask) {
            (Some(bid), Some(ask)) => OrderLevel::spread(bid, ask),
            _ => None,
        }
    }
}

/// Swap quote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub topic_id: String,
    pub timestamp_ms: u64,
    pub sequence: u64,
    pub input_mint: String,
    pub output_mint: String,
    pub in_amount: u64,
    pub out_amount: u64,
    pub price_impact_bps: i32,
    pub context_slot: u64,
    /// Routing algorithm that produced the quote
    pub algorithm: String,
    pub is_improvement: bool,
    pub is_cached: bool,
    pub is_stale: bool,
    /// Route plan as JSON text, absent when the frame ends before it
    pub route_plan_json: Option<String>,
}

/// Fixed-point scale of `usd_price` on the wire
pub const USD_PRICE_SCALE: f64 = 1e12;

/// USD price of one mint at a given slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceEntry {
    pub mint: String,
    /// Raw wire value, 12 implied decimal places
    pub raw_usd_price: u64,
    pub slot: u64,
    pub timestamp_ms: u64,
}

impl PriceEntry {
    pub fn usd_price(&self) -> f64 {
        self.raw_usd_price as f64 / USD_PRICE_SCALE
    }
}

/// Connection liveness and stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heartbeat {
    pub timestamp_ms: u64,
    pub uptime_seconds: u64,
    pub messages_received: u64,
    pub messages_sent: u64,
    pub subscriptions: u32,
}

/// A decoded binary message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecodedMessage {
    PoolUpdate(PoolUpdate),
    PoolUpdateBatch(Vec<PoolUpdate>),
    PriorityFees(PriorityFees),
    Blockhash(Blockhash),
    Quote(Quote),
    Heartbeat(Heartbeat),
    Pong { timestamp_ms: u64 },
    Error(String),
}

impl DecodedMessage {
    /// Tag this message was decoded from
    pub fn message_type(&self) -> MessageType {
        match self {
            DecodedMessage::PoolUpdate(_) => MessageType::PoolUpdate,
            DecodedMessage::PoolUpdateBatch(_) => MessageType::PoolUpdateBatch,
            DecodedMessage::PriorityFees(_) => MessageType::PriorityFees,
            DecodedMessage::Blockhash(_) => MessageType::Blockhash,
            DecodedMessage::Quote(_) => MessageType::Quote,
            DecodedMessage::Heartbeat(_) => MessageType::Heartbeat,
            DecodedMessage::Pong { .. } => MessageType::Pong,
            DecodedMessage::Error(_) => MessageType::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_type_tags() {
        assert_eq!(MessageType::try_from(0x01).unwrap(), MessageType::PoolUpdate);
        assert_eq!(MessageType::try_from(0x0E).unwrap(), MessageType::PoolUpdateBatch);
        assert_eq!(MessageType::try_from(0xFF).unwrap(), MessageType::Error);
        assert!(matches!(
            MessageType::try_from(0x0F),
            Err(ProtocolError::UnknownMessageType(0x0F))
        ));
        for t in MessageType::ALL {
            assert_eq!(MessageType::try_from(t.tag()).unwrap(), t);
        }
    }

    #[test]
    fn test_json_kinds_not_binary() {
        assert!(!MessageType::Subscribe.is_binary());
        assert!(!MessageType::QuoteSubscribed.is_binary());
        assert!(!MessageType::Ping.is_binary());
        assert!(MessageType::Heartbeat.is_binary());
    }

    #[test]
    fn test_network_state_opaque_codes() {
        assert_eq!(NetworkState::from(2), NetworkState::High);
        let odd = NetworkState::from(9);
        assert_eq!(odd, NetworkState::Unknown(9));
        assert_eq!(odd.code(), 9);
        assert!(!odd.is_known());
        assert_eq!(odd.to_string(), "unknown(9)");
    }

    fn pool(mints: usize, balances: usize, decimals: usize) -> PoolUpdate {
        PoolUpdate {
            sequence: 1,
            slot: 2,
            write_version: 3,
            protocol_name: "Whirlpool".into(),
            pool_address: "pool".into(),
            token_mints: (0..mints).map(|i| format!("mint{i}")).collect(),
            token_balances: (0..balances as u64).collect(),
            token_decimals: (0..decimals as i32).collect(),
            best_bid: Some(OrderLevel { price: 99, size: 1 }),
            best_ask: Some(OrderLevel { price: 101, size: 1 }),
            serialized_state: vec![],
        }
    }

    #[test]
    fn test_tokens_joined_when_lengths_match() {
        let update = pool(2, 2, 2);
        let tokens = update.tokens().unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].mint, "mint1");
        assert_eq!(tokens[1].balance, 1);
        assert_eq!(tokens[1].decimals, 1);
    }

    #[test]
    fn test_tokens_mismatch_reported() {
        let update = pool(3, 2, 3);
        assert!(matches!(
            update.tokens(),
            Err(ProtocolError::TokenListMismatch {
                mints: 3,
                balances: 2,
                decimals: 3
            })
        ));
    }

    #[test]
    fn test_spread() {
        assert_eq!(pool(0, 0, 0).spread(), Some(2));
        let crossed = OrderLevel::spread(
            &OrderLevel { price: 10, size: 1 },
            &OrderLevel { price: 9, size: 1 },
        );
        assert_eq!(crossed, None);
    }

    #[test]
    fn test_blockhash_validity_window() {
        let bh = Blockhash {
            slot: 1,
            timestamp_ms: 2,
            blockhash: "11111111111111111111111111111111".into(),
            block_height: 100,
            last_valid_block_height: 250,
            is_stale: false,
        };
        assert!(bh.is_valid_at(250));
        assert!(!bh.is_valid_at(251));
    }
}
