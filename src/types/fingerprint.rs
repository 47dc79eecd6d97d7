//! Book fingerprint: a SHA-256 digest of an order book snapshot.
//!
//! Two snapshots with the same resting orders in the same priority order
//! produce the same fingerprint, whatever slots the orders occupied in the
//! arena. Useful for spotting book changes between polls without diffing
//! full order lists.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::types::order::{Order, Side};

/// Bytes hashed per order
pub const ORDER_RECORD_LEN: usize = 1 + 16 + 8 + 32 + 1 + 1 + 8;

/// 32-byte SHA-256 digest of a book snapshot.
///
/// ## Example
///
/// ```
/// use serum_slab::BookFingerprint;
///
/// let empty = BookFingerprint::of_sides(&[], &[]);
/// assert_eq!(empty, BookFingerprint::of_sides(&[], &[]));
/// assert_eq!(empty.to_hex().len(), 64);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BookFingerprint(pub [u8; 32]);

impl BookFingerprint {
    /// Hash both sides of a book, each already in priority order.
    ///
    /// Each side is framed by its tag and order count so that moving an
    /// order between sides changes the digest.
    pub fn of_sides(bids: &[Order], asks: &[Order]) -> Self {
        let mut hasher = Sha256::new();
        for (side, orders) in [(Side::Bid, bids), (Side::Ask, asks)] {
            hasher.update([side_tag(side)]);
            hasher.update((orders.len() as u64).to_le_bytes());
            for order in orders {
                hasher.update(encode(order));
            }
        }

        let mut digest = [0u8; 32];
        digest.copy_from_slice(&hasher.finalize());
        Self(digest)
    }

    /// Raw digest bytes
    #[inline]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex rendering
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for BookFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BookFingerprint({})", self.to_hex())
    }
}

impl fmt::Display for BookFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

fn side_tag(side: Side) -> u8 {
    match side {
        Side::Bid => 0,
        Side::Ask => 1,
    }
}

/// Fixed-width little-endian record of one order
fn encode(order: &Order) -> [u8; ORDER_RECORD_LEN] {
    let mut record = [0u8; ORDER_RECORD_LEN];
    record[0] = side_tag(order.side);
    record[1..17].copy_from_slice(&order.key.0.to_le_bytes());
    record[17..25].copy_from_slice(&order.quantity.to_le_bytes());
    record[25..57].copy_from_slice(&order.owner.0);
    record[57] = order.owner_slot;
    record[58] = order.fee_tier;
    record[59..67].copy_from_slice(&order.client_order_id.to_le_bytes());
    record
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::order::{OrderKey, Owner};

    fn order(side: Side, price: u64, seq: u64, quantity: u64) -> Order {
        Order {
            side,
            key: OrderKey::new(side, price, seq),
            price,
            quantity,
            owner: Owner([7; 32]),
            owner_slot: 0,
            fee_tier: 0,
            client_order_id: seq,
        }
    }

    #[test]
    fn test_record_len() {
        assert_eq!(ORDER_RECORD_LEN, 67);
    }

    #[test]
    fn test_fingerprint_determinism() {
        let bids = vec![order(Side::Bid, 10, 1, 5)];
        let asks = vec![order(Side::Ask, 11, 2, 3)];

        assert_eq!(
            BookFingerprint::of_sides(&bids, &asks),
            BookFingerprint::of_sides(&bids, &asks)
        );
    }

    #[test]
    fn test_fingerprint_sensitive_to_content() {
        let bids = vec![order(Side::Bid, 10, 1, 5)];
        let asks = vec![order(Side::Ask, 11, 2, 3)];
        let base = BookFingerprint::of_sides(&bids, &asks);

        let changed = vec![order(Side::Bid, 10, 1, 4)];
        assert_ne!(base, BookFingerprint::of_sides(&changed, &asks));
        assert_ne!(base, BookFingerprint::of_sides(&bids, &[]));
    }

    #[test]
    fn test_fingerprint_sensitive_to_order() {
        let a = order(Side::Ask, 11, 2, 3);
        let b = order(Side::Ask, 12, 3, 3);

        assert_ne!(
            BookFingerprint::of_sides(&[], &[a.clone(), b.clone()]),
            BookFingerprint::of_sides(&[], &[b, a])
        );
    }

    #[test]
    fn test_fingerprint_hex() {
        let fp = BookFingerprint([0xAB; 32]);
        assert_eq!(fp.to_hex(), "ab".repeat(32));
        assert_eq!(fp.to_string(), fp.to_hex());
        assert_eq!(fp.as_bytes(), &[0xAB; 32]);
    }
}
