mod common;

use bytes::Bytes;
use common::*;
use market_feed_protocol::{decode_message, DecodedMessage, Dispatcher};
use std::sync::Arc;
use tokio::task::JoinSet;

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_decode_heavy() {
    let iterations = 5_000u64;
    let payloads: Vec<(u8, Vec<u8>)> = vec![
        (0x01, pool_update(1, 3)),
        (0x05, priority_fees(2)),
        (0x06, blockhash(300)),
        (0x07, quote(Some("[]"))),
        (0x0D, heartbeat()),
        (0x0E, batch(&[pool_update(1, 1), vec![0xEE; 12], pool_update(2, 2)])),
    ];

    let mut tasks = JoinSet::new();
    for (tag, payload) in payloads {
        tasks.spawn(async move {
            let raw = frame(tag, &payload);
            let first = decode_message(&raw).unwrap();
            for _ in 0..iterations {
                let decoded = decode_message(&raw).unwrap();
                assert_eq!(decoded, first);
            }
        });
    }

    while let Some(res) = tasks.join_next().await {
        res.unwrap();
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn shared_dispatcher_counts_every_frame() {
    let dispatcher = Arc::new(Dispatcher::new());
    let workers = 8u64;
    let per_worker = 500u64;

    let mut tasks = JoinSet::new();
    for w in 0..workers {
        let dispatcher = dispatcher.clone();
        tasks.spawn(async move {
            for i in 0..per_worker {
                let raw = Bytes::from(frame(0x06, &blockhash(1_000 + w * per_worker + i)));
                let decoded = dispatcher.decode(raw).unwrap();
                assert!(matches!(decoded, Some(DecodedMessage::Blockhash(_))));
            }
        });
    }

    while let Some(res) = tasks.join_next().await {
        res.unwrap();
    }

    let snap = dispatcher.metrics().snapshot();
    assert_eq!(snap.frames_received, workers * per_worker);
    assert_eq!(snap.frames_decoded, workers * per_worker);
    assert_eq!(snap.decode_failures, 0);
}
