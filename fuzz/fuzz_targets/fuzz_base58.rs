#![no_main]

use libfuzzer_sys::fuzz_target;
use market_feed_protocol::utils::base58;

fuzz_target!(|data: &[u8]| {
    let text = base58::encode(data);
    let back = base58::decode(&text).expect("encoder output always decodes");
    assert_eq!(back, data);

    if let Ok(s) = std::str::from_utf8(data) {
        let _ = base58::decode(s);
    }
});
