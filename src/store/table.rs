//! Hash Table Module
//!
//! One named field→bytes table with an optional table-wide expiration, as
//! held by the in-process store.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

// == Hash Table ==
/// A hash table with its fields and expiry metadata.
#[derive(Debug, Clone, Default)]
pub struct HashTable {
    /// Field values
    pub fields: HashMap<String, Vec<u8>>,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
}

impl HashTable {
    // == Constructor ==
    /// Creates an empty table without expiration.
    pub fn new() -> Self {
        Self {
            fields: HashMap::new(),
            expires_at: None,
        }
    }

    // == Expire ==
    /// Sets the table to expire `ttl_seconds` from now, replacing any previous
    /// expiration.
    ///
    /// Returns false and leaves the table untouched when the expiration time
    /// does not fit in a millisecond timestamp.
    pub fn expire_in(&mut self, ttl_seconds: u64) -> bool {
        let expires_at = ttl_seconds
            .checked_mul(1000)
            .and_then(|ms| current_timestamp_ms().checked_add(ms));
        match expires_at {
            Some(at) => {
                self.expires_at = Some(at);
                true
            }
            None => false,
        }
    }

    // == Is Expired ==
    /// Checks if the table has expired.
    ///
    /// A table is expired once the current time reaches its expiration time.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => current_timestamp_ms() >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, or None if no expiration is set.
    pub fn ttl_remaining_ms(&self) -> Option<u64> {
        self.expires_at
            .map(|expires| expires.saturating_sub(current_timestamp_ms()))
    }

    /// Returns remaining TTL in seconds rounded to the nearest second, the way
    /// Redis reports `TTL`, or None if no expiration is set.
    pub fn ttl_remaining(&self) -> Option<u64> {
        self.ttl_remaining_ms().map(|ms| (ms + 500) / 1000)
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_table_creation_no_ttl() {
        let table = HashTable::new();

        assert!(table.fields.is_empty());
        assert!(table.expires_at.is_none());
        assert!(!table.is_expired());
        assert!(table.ttl_remaining().is_none());
    }

    #[test]
    fn test_expire_in() {
        let mut table = HashTable::new();
        assert!(table.expire_in(10));

        let remaining_ms = table.ttl_remaining_ms().unwrap();
        assert!(remaining_ms <= 10_000);
        assert!(remaining_ms >= 9_000);
        assert_eq!(table.ttl_remaining(), Some(10));
        assert!(!table.is_expired());
    }

    #[test]
    fn test_table_expiration() {
        let mut table = HashTable::new();
        assert!(table.expire_in(1));

        sleep(Duration::from_millis(1100));

        assert!(table.is_expired());
        assert_eq!(table.ttl_remaining().unwrap(), 0);
    }

    #[test]
    fn test_expire_in_overflow_leaves_table_unchanged() {
        let mut table = HashTable::new();

        assert!(!table.expire_in(u64::MAX));
        assert!(table.expires_at.is_none());

        assert!(table.expire_in(30));
        assert!(!table.expire_in(u64::MAX / 1000 + 1));
        assert_eq!(table.ttl_remaining(), Some(30));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = current_timestamp_ms();
        let table = HashTable {
            fields: HashMap::new(),
            expires_at: Some(now),
        };

        assert!(table.is_expired(), "Table should be expired at boundary");
    }
}
