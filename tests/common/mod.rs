//! Payload builders shared by the integration tests and the decoder unit
//! tests

#![allow(dead_code)]

/// Little-endian payload writer
#[derive(Default)]
pub struct Wire(Vec<u8>);

impl Wire {
    pub fn u8(mut self, v: u8) -> Self {
        self.0.push(v);
        self
    }

    pub fn u16(mut self, v: u16) -> Self {
        self.0.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn u32(mut self, v: u32) -> Self {
        self.0.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn u64(mut self, v: u64) -> Self {
        self.0.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn i32(mut self, v: i32) -> Self {
        self.0.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn raw(mut self, v: &[u8]) -> Self {
        self.0.extend_from_slice(v);
        self
    }

    /// u64 length followed by the bytes
    pub fn blob(self, v: &[u8]) -> Self {
        self.u64(v.len() as u64).raw(v)
    }

    pub fn text(self, v: &str) -> Self {
        self.blob(v.as_bytes())
    }

    pub fn done(self) -> Vec<u8> {
        self.0
    }
}

pub fn key(seed: u8) -> [u8; 32] {
    let mut k = [seed; 32];
    k[31] = seed ^ 0x5A;
    k
}

pub fn priority_fees(slot: u64) -> Vec<u8> {
    Wire::default()
        .u64(slot)
        .u64(1_700_000_000_000)
        .u64(10_000)
        .u8(1)
        .u8(0)
        .u64(1)
        .u64(2)
        .u64(3)
        .u64(4)
        .u32(50)
        .u64(5)
        .u64(6)
        .u64(7)
        .u64(8)
        .u64(9)
        .u64(10)
        .u8(0)
        .u64(0)
        .done()
}

pub fn blockhash(slot: u64) -> Vec<u8> {
    Wire::default()
        .u64(slot)
        .u64(1_700_000_000_000)
        .raw(&key(7))
        .u64(slot - 20)
        .u64(slot + 130)
        .u8(0)
        .done()
}

pub fn heartbeat() -> Vec<u8> {
    Wire::default()
        .u64(1_700_000_000_000)
        .u64(60)
        .u64(1_000)
        .u64(3)
        .u32(2)
        .done()
}

pub fn pool_update(sequence: u64, mints: u8) -> Vec<u8> {
    let mut w = Wire::default()
        .u64(4)
        .raw(&[1, 2, 3, 4])
        .u64(sequence)
        .u64(250_000_000)
        .u64(1)
        .text("Raydium")
        .raw(&key(200))
        .u64(u64::from(mints));
    for i in 0..mints {
        w = w.raw(&key(i));
    }
    w = w.u64(u64::from(mints));
    for i in 0..mints {
        w = w.u64(1_000 * u64::from(i));
    }
    w = w.u64(u64::from(mints));
    for _ in 0..mints {
        w = w.i32(6);
    }
    w.u8(1).u64(99).u64(5).u8(1).u64(101).u64(4).done()
}

pub fn batch(elements: &[Vec<u8>]) -> Vec<u8> {
    let mut w = Wire::default().u16(elements.len() as u16);
    for e in elements {
        w = w.u32(e.len() as u32).raw(e);
    }
    w.done()
}

pub fn quote(route: Option<&str>) -> Vec<u8> {
    let w = Wire::default()
        .text("SOL-USDC")
        .u64(1_700_000_000_000)
        .u64(3)
        .raw(&key(1))
        .raw(&key(2))
        .u64(1_000)
        .u64(150)
        .i32(5)
        .u64(250_000_000)
        .text("best")
        .u8(0)
        .u8(1)
        .u8(0);
    match route {
        Some(r) => w.text(r).done(),
        None => w.done(),
    }
}

/// Prefix a payload with its tag byte.
pub fn frame(tag: u8, payload: &[u8]) -> Vec<u8> {
    let mut f = Vec::with_capacity(payload.len() + 1);
    f.push(tag);
    f.extend_from_slice(payload);
    f
}
