use crate::config::DecoderConfig;
use crate::core::frame::Frame;
use crate::error::{constants, ProtocolError, Result};
use crate::protocol::decoder::{decode_payload, decode_pool_update_batch_outcome, BatchOutcome};
use crate::protocol::message::{DecodedMessage, MessageType, PoolUpdate};
use crate::utils::metrics::{global_metrics, Metrics, Timer};
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, instrument, trace, warn};

type HandlerFn = dyn Fn(&DecodedMessage) -> Result<()> + Send + Sync + 'static;

/// Decodes frames and routes the results to handlers keyed by message type.
///
/// Decoding is stateless; the dispatcher only adds the frame size limit, the
/// batch element cap, metrics and logging on top of it.
pub struct Dispatcher {
    handlers: Arc<RwLock<HashMap<MessageType, Box<HandlerFn>>>>,
    config: DecoderConfig,
    metrics: Arc<Metrics>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::with_config(DecoderConfig::default())
    }

    pub fn with_config(config: DecoderConfig) -> Self {
        Self::with_metrics(config, Arc::new(Metrics::new()))
    }

    pub fn with_metrics(config: DecoderConfig, metrics: Arc<Metrics>) -> Self {
        Self {
            handlers: Arc::new(RwLock::new(HashMap::new())),
            config,
            metrics,
        }
    }

    /// Dispatcher recording into the process-wide collector, so several
    /// connections report one set of counters.
    pub fn shared(config: DecoderConfig) -> Self {
        Self::with_metrics(config, global_metrics())
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn register<F>(&self, kind: MessageType, handler: F) -> Result<()>
    where
        F: Fn(&DecodedMessage) -> Result<()> + Send + Sync + 'static,
    {
        let mut handlers = self.handlers.write().map_err(|_| {
            ProtocolError::Custom(constants::ERR_DISPATCHER_WRITE_LOCK.to_string())
        })?;

        handlers.insert(kind, Box::new(handler));
        Ok(())
    }

    /// Decode one frame.
    ///
    /// `Ok(None)` means the tag is known but carries no binary payload.
    #[instrument(skip_all, fields(len = frame.len()))]
    pub fn decode(&self, frame: Bytes) -> Result<Option<DecodedMessage>> {
        let _timer = Timer::start("decode_frame");
        self.metrics.frame_received(frame.len() as u64);

        let frame = match Frame::parse_with_limit(frame, self.config.max_frame_size) {
            Ok(frame) => frame,
            Err(e @ ProtocolError::UnknownMessageType(_)) => {
                self.metrics.unknown_type();
                debug!(error = %e, "Dropping frame");
                return Err(e);
            }
            Err(e) => {
                self.metrics.decode_failure();
                debug!(error = %e, "Dropping frame");
                return Err(e);
            }
        };

        let kind = frame.message_type;
        let result = match kind {
            MessageType::PoolUpdateBatch => {
                let outcome = decode_pool_update_batch_outcome(&frame.payload);
                Ok(Some(DecodedMessage::PoolUpdateBatch(self.cap_batch(outcome))))
            }
            _ => decode_payload(kind, &frame.payload),
        };
        let decoded = match result {
            Ok(Some(message)) => message,
            Ok(None) => {
                self.metrics.frame_ignored();
                trace!(kind = %kind, "No binary payload for message type");
                return Ok(None);
            }
            Err(e) => {
                self.metrics.decode_failure();
                debug!(kind = %kind, error = %e, "Failed to decode payload");
                return Err(e);
            }
        };

        self.metrics.frame_decoded();
        trace!(kind = %kind, "Frame decoded");
        Ok(Some(decoded))
    }

    /// Decode a frame and hand the result to the handler registered for its type.
    ///
    /// Returns whether a handler ran.
    pub fn dispatch(&self, frame: Bytes) -> Result<bool> {
        let message = match self.decode(frame)? {
            Some(message) => message,
            None => return Ok(false),
        };

        let handlers = self.handlers.read().map_err(|_| {
            ProtocolError::Custom(constants::ERR_DISPATCHER_READ_LOCK.to_string())
        })?;

        match handlers.get(&message.message_type()) {
            Some(handler) => handler(&message).map(|_| true),
            None => {
                trace!(kind = %message.message_type(), "No handler registered");
                Ok(false)
            }
        }
    }

    /// Enforce `max_batch_elements` and account for elements that were skipped.
    ///
    /// Only elements present in the buffer count as skipped; the declared
    /// count is not trusted.
    fn cap_batch(&self, outcome: BatchOutcome) -> Vec<PoolUpdate> {
        let BatchOutcome {
            mut updates,
            received,
        } = outcome;

        if updates.len() > self.config.max_batch_elements {
            warn!(
                decoded = updates.len(),
                limit = self.config.max_batch_elements,
                "Batch exceeds element limit, truncating"
            );
            updates.truncate(self.config.max_batch_elements);
        }

        let skipped = received - updates.len();
        if skipped > 0 {
            self.metrics.batch_elements_skipped(skipped as u64);
            if self.config.log_skipped_elements {
                debug!(received, kept = updates.len(), skipped, "Batch elements skipped");
            }
        }

        updates
    }
}
