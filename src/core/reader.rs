//! # Wire Reader
//!
//! Bounds-checked little-endian cursor over an untrusted payload.
//!
//! Every read first checks that the requested width fits in what is left of
//! the buffer and fails with [`ProtocolError::TruncatedInput`] otherwise, so the
//! cursor can never move past the end of the slice. Length and count headers are
//! 64-bit on the wire; they are converted with checked arithmetic before being
//! compared against the remaining bytes.
//!
//! Two policies are exposed side by side:
//! - **fail-whole-record**: the `read_*` methods. A shortfall is an error and
//!   the caller abandons the record.
//! - **truncate-on-insufficient-input**: [`WireReader::read_list`]. The list is
//!   cut at the last element that fits, and the cursor is parked at the end of
//!   the buffer because whatever follows can no longer be located reliably.

use crate::error::{ProtocolError, Result};

/// Width of a public key / hash on the wire
pub const PUBKEY_LEN: usize = 32;

/// Sequential little-endian reader
#[derive(Debug, Clone)]
pub struct WireReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> WireReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Current cursor position
    #[inline]
    pub fn position(&self) -> usize {
        self.offset
    }

    /// Bytes left between the cursor and the end of the buffer
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Move the cursor to the end of the buffer.
    pub fn exhaust(&mut self) {
        self.offset = self.data.len();
    }

    /// Borrow the next `len` bytes and advance past them.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .offset
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or(ProtocolError::TruncatedInput {
                needed: self.offset.saturating_add(len),
                available: self.data.len(),
            })?;
        let bytes = &self.data[self.offset..end];
        self.offset = end;
        Ok(bytes)
    }

    /// Read exactly `N` bytes into an array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    /// Single byte flag, any non-zero value is `true`
    #[inline]
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    #[inline]
    pub fn read_u16(&mut self) -> Result<u16> {
        self.read_array().map(u16::from_le_bytes)
    }

    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        self.read_array().map(u32::from_le_bytes)
    }

    #[inline]
    pub fn read_u64(&mut self) -> Result<u64> {
        self.read_array().map(u64::from_le_bytes)
    }

    #[inline]
    pub fn read_i32(&mut self) -> Result<i32> {
        self.read_array().map(i32::from_le_bytes)
    }

    /// Read a u64 length header and the region it declares.
    ///
    /// The declared length is validated against the remaining bytes before
    /// anything is copied. On failure the cursor is left after the header.
    pub fn read_len_prefixed(&mut self) -> Result<&'a [u8]> {
        let declared = self.read_u64()?;
        let len = usize::try_from(declared).map_err(|_| ProtocolError::TruncatedInput {
            needed: usize::MAX,
            available: self.data.len(),
        })?;
        self.read_bytes(len)
    }

    /// Length-prefixed text. Invalid UTF-8 is replaced rather than rejected.
    pub fn read_string(&mut self) -> Result<String> {
        self.read_len_prefixed()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// 32 raw bytes rendered as base-58 text
    pub fn read_pubkey(&mut self) -> Result<String> {
        self.read_bytes(PUBKEY_LEN).map(crate::utils::base58::encode)
    }

    /// Decode a count-prefixed list, stopping early when the buffer runs out.
    ///
    /// The u64 count header is read first; when the header itself is missing
    /// the list is empty. Elements are `elem_width` bytes each and decoded by
    /// `read_elem`. Capacity is bounded by what the remaining bytes can hold,
    /// never by the declared count. Returns the list and whether it was cut.
    pub fn read_list<T, F>(&mut self, elem_width: usize, mut read_elem: F) -> (Vec<T>, bool)
    where
        F: FnMut(&mut Self) -> Result<T>,
    {
        let declared = match self.read_u64() {
            Ok(count) => count,
            Err(_) => {
                self.exhaust();
                return (Vec::new(), true);
            }
        };

        let fits = (self.remaining() / elem_width.max(1)) as u64;
        let take = declared.min(fits);
        let mut items = Vec::with_capacity(take as usize);
        for _ in 0..take {
            match read_elem(self) {
                Ok(item) => items.push(item),
                Err(_) => break,
            }
        }

        let truncated = (items.len() as u64) < declared;
        if truncated {
            self.exhaust();
        }
        (items, truncated)
    }
}
