//! # Base-58
//!
//! Bitcoin-alphabet base-58 used for public keys, mints and blockhashes.
//!
//! Conversion is done directly on byte buffers: encoding runs repeated long
//! division by 58 over a copy of the input, decoding folds each symbol into a
//! byte accumulator with multiply-by-58 and carry. Both are quadratic in the
//! input length; inputs are 32-byte keys in practice.
//!
//! Leading zero bytes have no magnitude and are handled by counting: each one
//! maps to a leading `'1'` and back.
//!
//! ```rust
//! use market_feed_protocol::utils::base58;
//!
//! let text = base58::encode(&[0, 0, 1, 2]);
//! assert_eq!(text, format!("11{}", base58::encode(&[1, 2])));
//! assert_eq!(base58::decode(&text).unwrap(), vec![0, 0, 1, 2]);
//! ```

use crate::error::{ProtocolError, Result};

/// Symbol set, excludes `0`, `O`, `I` and `l`
pub const ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Length bounds of a base-58 encoded 32-byte key
pub const PUBKEY_MIN_CHARS: usize = 32;
pub const PUBKEY_MAX_CHARS: usize = 44;

const INVALID: u8 = 0xFF;

/// ASCII to digit lookup, `INVALID` for anything outside the alphabet
const DIGITS: [u8; 128] = {
    let mut table = [INVALID; 128];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
};

/// Encode bytes as base-58 text.
pub fn encode(bytes: &[u8]) -> String {
    let zeros = bytes.iter().take_while(|b| **b == 0).count();

    // log(256) / log(58) ~ 1.37 symbols per byte
    let mut symbols = Vec::with_capacity(bytes.len() * 138 / 100 + 1);
    let mut number = bytes[zeros..].to_vec();
    let mut start = 0;

    while start < number.len() {
        let mut remainder = 0u32;
        for byte in &mut number[start..] {
            let acc = (remainder << 8) | u32::from(*byte);
            *byte = (acc / 58) as u8;
            remainder = acc % 58;
        }
        symbols.push(ALPHABET[remainder as usize]);

        while start < number.len() && number[start] == 0 {
            start += 1;
        }
    }

    symbols.extend(std::iter::repeat(ALPHABET[0]).take(zeros));
    symbols.reverse();

    symbols.into_iter().map(char::from).collect()
}

/// Decode base-58 text into bytes.
///
/// # Errors
/// Returns `ProtocolError::InvalidCharacter` on the first symbol outside the
/// alphabet, including any non-ASCII character.
pub fn decode(text: &str) -> Result<Vec<u8>> {
    let ones = text.bytes().take_while(|b| *b == ALPHABET[0]).count();

    // Little-endian accumulator, reversed at the end
    let mut acc: Vec<u8> = Vec::with_capacity(text.len() * 733 / 1000 + 1);

    for (index, character) in text.char_indices().skip(ones) {
        let digit = digit_of(character).ok_or(ProtocolError::InvalidCharacter { character, index })?;

        let mut carry = u32::from(digit);
        for byte in acc.iter_mut() {
            carry += u32::from(*byte) * 58;
            *byte = (carry & 0xFF) as u8;
            carry >>= 8;
        }
        while carry > 0 {
            acc.push((carry & 0xFF) as u8);
            carry >>= 8;
        }
    }

    let mut out = vec![0u8; ones];
    out.extend(acc.iter().rev());
    Ok(out)
}

/// Whether `text` is a base-58 encoded 32-byte public key.
///
/// Decode failures count as invalid; this never errors.
pub fn is_valid_pubkey(text: &str) -> bool {
    if text.len() < PUBKEY_MIN_CHARS || text.len() > PUBKEY_MAX_CHARS {
        return false;
    }
    matches!(decode(text), Ok(bytes) if bytes.len() == 32)
}

#[inline]
fn digit_of(character: char) -> Option<u8> {
    if !character.is_ascii() {
        return None;
    }
    match DIGITS[character as usize] {
        INVALID => None,
        digit => Some(digit),
    }
}
