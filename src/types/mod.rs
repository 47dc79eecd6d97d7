//! Core data types for decoded order books
//!
//! Every type here is an owned copy of account data; nothing borrows the
//! buffer it was decoded from.
//!
//! ## Types
//!
//! - [`AccountFlags`]: bitset stored after the account magic
//! - [`Side`]: Bid or Ask
//! - [`OrderKey`]: price (high 64 bits) and sequence number (low 64 bits)
//! - [`Order`]: a resting order reconstructed from a leaf
//! - [`MarketParams`]: lot sizes and decimals for human-readable prices
//! - [`BookFingerprint`]: SHA-256 digest of a book snapshot
//!
//! ## Lots
//!
//! Prices and quantities on the wire are integer lots. Conversion to
//! decimals needs the market's lot sizes and the mints' decimals, see
//! [`MarketParams`].

mod fingerprint;
mod flags;
mod order;
pub mod price;

// Re-export all types at module level
pub use fingerprint::BookFingerprint;
pub use flags::{AccountFlags, AccountRole};
pub use order::{Order, OrderKey, Owner, Side, KEY_BITS, PRICE_BITS, PRICE_SHIFT};
pub use price::MarketParams;
