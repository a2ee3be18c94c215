//! Document identity generation
//!
//! Identities follow the 12-byte ObjectId layout: 4-byte big-endian seconds,
//! 5 bytes fixed per process, 3-byte wrapping counter. Rendered as 24
//! lowercase hex characters.

use std::sync::atomic::{AtomicU32, Ordering};

use chrono::Utc;
use once_cell::sync::Lazy;

static PROCESS_UNIQUE: Lazy<[u8; 5]> = Lazy::new(rand::random);

static COUNTER: Lazy<AtomicU32> = Lazy::new(|| AtomicU32::new(rand::random::<u32>() & COUNTER_MASK));

const COUNTER_MASK: u32 = 0x00ff_ffff;

/// A freshly generated document identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    /// Generate a new identity
    pub fn new() -> Self {
        let secs = u32::try_from(Utc::now().timestamp()).unwrap_or(u32::MAX);
        let count = COUNTER.fetch_add(1, Ordering::Relaxed) & COUNTER_MASK;

        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(&*PROCESS_UNIQUE);
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);
        Self(bytes)
    }

    pub fn bytes(&self) -> [u8; 12] {
        self.0
    }

    /// Seconds since the UNIX epoch embedded in the identity
    pub fn timestamp(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use makoto_domain::value_objects::StoreId;

    #[test]
    fn test_hex_shape() {
        let id = ObjectId::new().to_hex();
        assert_eq!(id.len(), 24);
        assert!(StoreId::parse(&id).is_ok());
    }

    #[test]
    fn test_ids_are_unique_and_share_process_bytes() {
        let a = ObjectId::new();
        let b = ObjectId::new();
        assert_ne!(a, b);
        assert_eq!(a.bytes()[4..9], b.bytes()[4..9]);
    }

    #[test]
    fn test_embedded_timestamp_is_recent() {
        let now = u32::try_from(Utc::now().timestamp()).unwrap();
        let id = ObjectId::new();
        assert!(now.abs_diff(id.timestamp()) <= 1);
    }
}
