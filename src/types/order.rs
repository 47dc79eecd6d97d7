//! Order types derived from slab leaves.
//!
//! ## Order Key
//!
//! Every leaf stores a 128-bit key. The high 64 bits hold the price in
//! lots, the low 64 bits hold the sequence number. On the bid side the
//! sequence number is stored bitwise-inverted so that, at equal prices,
//! the older order has the larger key.
//!
//! ```text
//!  127            64 63             0
//! +----------------+----------------+
//! |  price (lots)  |   seq / !seq   |
//! +----------------+----------------+
//! ```

use std::fmt;

use crate::slab::LeafNode;
use crate::types::flags::AccountRole;

/// Width of the order key in bits.
pub const KEY_BITS: u32 = 128;

/// Width of the price field in bits.
pub const PRICE_BITS: u32 = 64;

/// Shift that moves the price field down to bit 0.
pub const PRICE_SHIFT: u32 = KEY_BITS - PRICE_BITS;

// ============================================================================
// Side enum
// ============================================================================

/// Book side: Bid or Ask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    /// Buy orders, best is the highest price
    #[default]
    Bid,
    /// Sell orders, best is the lowest price
    Ask,
}

impl Side {
    /// Returns the opposite side
    pub fn opposite(self) -> Self {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }

    /// The account role a slab for this side must carry
    pub fn role(self) -> AccountRole {
        match self {
            Side::Bid => AccountRole::Bids,
            Side::Ask => AccountRole::Asks,
        }
    }

    /// Lowercase name used in messages
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Bid => "bid",
            Side::Ask => "ask",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// OrderKey
// ============================================================================

/// The 128-bit crit-bit key of a leaf, also the exchange order id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct OrderKey(pub u128);

impl OrderKey {
    /// Read a key from its 16 little-endian bytes
    ///
    /// # Example
    ///
    /// ```
    /// use serum_slab::OrderKey;
    ///
    /// let key = OrderKey::from_le_bytes([
    ///     0xDB, 0xFE, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    ///     0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    /// ]);
    /// assert_eq!(key.price(), 1);
    /// assert_eq!(key.low_bits() as i64, -293);
    /// ```
    pub fn from_le_bytes(bytes: [u8; 16]) -> Self {
        Self(u128::from_le_bytes(bytes))
    }

    /// Build a key the way the exchange does for a new order on `side`
    pub fn new(side: Side, price: u64, seq_num: u64) -> Self {
        let low = match side {
            Side::Bid => !seq_num,
            Side::Ask => seq_num,
        };
        Self(((price as u128) << PRICE_SHIFT) | low as u128)
    }

    /// Price in lots (high 64 bits)
    #[inline]
    pub fn price(self) -> u64 {
        (self.0 >> PRICE_SHIFT) as u64
    }

    /// Raw low 64 bits, as stored
    #[inline]
    pub fn low_bits(self) -> u64 {
        self.0 as u64
    }

    /// Sequence number, undoing the bid-side inversion
    #[inline]
    pub fn seq_num(self, side: Side) -> u64 {
        match side {
            Side::Bid => !self.low_bits(),
            Side::Ask => self.low_bits(),
        }
    }
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#034x}", self.0)
    }
}

// ============================================================================
// Owner
// ============================================================================

/// 32-byte open-orders account address that owns a leaf.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Owner(pub [u8; 32]);

impl Owner {
    /// Hex rendering of the address
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Owner({})", self.to_hex())
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ============================================================================
// Order struct
// ============================================================================

/// A resting order reconstructed from a leaf.
///
/// Orders are independent copies of the leaf fields; they hold no
/// reference into the decoded buffer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Order {
    /// Book side the order rests on
    pub side: Side,

    /// Crit-bit key, which is also the exchange order id
    pub key: OrderKey,

    /// Limit price in quote lots per base lot
    pub price: u64,

    /// Remaining quantity in base lots
    pub quantity: u64,

    /// Owning open-orders account
    pub owner: Owner,

    /// Slot of the order inside the owner's open-orders account
    pub owner_slot: u8,

    /// Fee tier at placement time
    pub fee_tier: u8,

    /// Client supplied order id
    pub client_order_id: u64,
}

impl Order {
    /// Build an order from a decoded leaf on `side`
    pub fn from_leaf(leaf: &LeafNode, side: Side) -> Self {
        Self {
            side,
            key: leaf.key,
            price: leaf.key.price(),
            quantity: leaf.quantity,
            owner: leaf.owner,
            owner_slot: leaf.owner_slot,
            fee_tier: leaf.fee_tier,
            client_order_id: leaf.client_order_id,
        }
    }

    /// Exchange sequence number (time priority, lower is older)
    pub fn seq_num(&self) -> u64 {
        self.key.seq_num(self.side)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
