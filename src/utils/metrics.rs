//! Observability and Metrics
//!
//! Counters for frame decoding, kept outside the decode functions so those
//! stay pure. The dispatcher records into a [`Metrics`] instance; callers can
//! share one through `Arc` or use the process-wide instance from
//! [`global_metrics`].
//!
//! Uses atomic counters for thread-safe metrics collection.

use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Metrics collector for decode operations
#[derive(Debug)]
pub struct Metrics {
    /// Frames handed to the decoder
    pub frames_received: AtomicU64,
    /// Frames that produced a record
    pub frames_decoded: AtomicU64,
    /// Frames whose payload could not be decoded
    pub decode_failures: AtomicU64,
    /// Frames carrying a tag outside the enumeration
    pub unknown_types: AtomicU64,
    /// Frames with a known tag but no binary payload (JSON, ping)
    pub frames_ignored: AtomicU64,
    /// Batch elements skipped or dropped
    pub batch_elements_skipped: AtomicU64,
    /// Total bytes received
    pub bytes_received: AtomicU64,
    /// Start time for uptime calculation
    start_time: Instant,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            frames_received: AtomicU64::new(0),
            frames_decoded: AtomicU64::new(0),
            decode_failures: AtomicU64::new(0),
            unknown_types: AtomicU64::new(0),
            frames_ignored: AtomicU64::new(0),
            batch_elements_skipped: AtomicU64::new(0),
            bytes_received: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a frame arriving
    pub fn frame_received(&self, byte_count: u64) {
        self.frames_received.fetch_add(1, Ordering::Relaxed);
        self.bytes_received.fetch_add(byte_count, Ordering::Relaxed);
    }

    /// Record a successful decode
    pub fn frame_decoded(&self) {
        self.frames_decoded.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed decode
    pub fn decode_failure(&self) {
        self.decode_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an unrecognised tag
    pub fn unknown_type(&self) {
        self.unknown_types.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a frame with nothing to decode
    pub fn frame_ignored(&self) {
        self.frames_ignored.fetch_add(1, Ordering::Relaxed);
    }

    /// Record batch elements that did not make it into the output
    pub fn batch_elements_skipped(&self, count: u64) {
        self.batch_elements_skipped
            .fetch_add(count, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            frames_received: self.frames_received.load(Ordering::Relaxed),
            frames_decoded: self.frames_decoded.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
            unknown_types: self.unknown_types.load(Ordering::Relaxed),
            frames_ignored: self.frames_ignored.load(Ordering::Relaxed),
            batch_elements_skipped: self.batch_elements_skipped.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Log current metrics and return what was logged
    pub fn log_metrics(&self) -> MetricsSnapshot {
        let snapshot = self.snapshot();
        info!(
            frames_received = snapshot.frames_received,
            frames_decoded = snapshot.frames_decoded,
            decode_failures = snapshot.decode_failures,
            unknown_types = snapshot.unknown_types,
            frames_ignored = snapshot.frames_ignored,
            batch_elements_skipped = snapshot.batch_elements_skipped,
            bytes_received = snapshot.bytes_received,
            uptime_seconds = snapshot.uptime_seconds,
            "Decoder metrics snapshot"
        );
        snapshot
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub frames_received: u64,
    pub frames_decoded: u64,
    pub decode_failures: u64,
    pub unknown_types: u64,
    pub frames_ignored: u64,
    pub batch_elements_skipped: u64,
    pub bytes_received: u64,
    pub uptime_seconds: u64,
}

static METRICS: Lazy<Arc<Metrics>> = Lazy::new(|| Arc::new(Metrics::new()));

/// Process-wide collector, shared by every [`Dispatcher::shared`](crate::Dispatcher::shared)
pub fn global_metrics() -> Arc<Metrics> {
    Arc::clone(&METRICS)
}

/// Timer for measuring operation duration
pub struct Timer {
    start: Instant,
    operation: &'static str,
}

impl Timer {
    /// Start timing an operation
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        debug!(
            operation = self.operation,
            duration_us = duration.as_micros() as u64,
            "Operation completed"
        );
    }
}
