//! # Utility Modules
//!
//! Supporting utilities used by the decoder and its callers.
//!
//! ## Components
//! - **Base58**: address and hash text encoding, no big-integer dependency
//! - **Logging**: structured logging configuration
//! - **Metrics**: thread-safe decode counters

pub mod base58;
pub mod logging;
pub mod metrics;

pub use metrics::{global_metrics, Metrics, MetricsSnapshot};
