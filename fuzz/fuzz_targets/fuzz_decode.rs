#![no_main]

use libfuzzer_sys::fuzz_target;
use market_feed_protocol::protocol::decoder::{
    decode_payload, decode_pong, decode_pool_update_batch_outcome,
};
use market_feed_protocol::{
    decode_blockhash, decode_heartbeat, decode_message, decode_pool_update,
    decode_pool_update_batch, decode_price_entries, decode_price_update, decode_priority_fees,
    decode_quote, MessageType,
};

fuzz_target!(|data: &[u8]| {
    // Every decoder must reject or accept without panicking
    let _ = decode_message(data);
    let _ = decode_priority_fees(data);
    let _ = decode_blockhash(data);
    let _ = decode_heartbeat(data);
    let _ = decode_pong(data);
    let _ = decode_pool_update(data);
    let _ = decode_pool_update_batch(data);
    let _ = decode_quote(data);
    let _ = decode_price_update(data);
    assert!(decode_price_entries(data).len() <= data.len() / 56);

    let outcome = decode_pool_update_batch_outcome(data);
    assert!(outcome.updates.len() <= outcome.received);

    for kind in MessageType::ALL {
        let _ = decode_payload(kind, data);
    }
});
