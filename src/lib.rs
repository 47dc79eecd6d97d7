//! # serum-slab
//!
//! Defensive decoder for Serum-style order book accounts.
//!
//! ## Architecture
//!
//! Decoding runs leaves first:
//! - **Header**: magic + account flags ([`AccountHeader`])
//! - **Arena**: slab counters + 72-byte node slots ([`Slab`])
//! - **Nodes**: each slot classified as one of five kinds ([`Node`])
//! - **Traversal**: bounded walk of the crit-bit tree and free list
//! - **OrderBook**: bid and ask sides in price-time priority ([`OrderBook`])
//! - **Market**: lot sizes and slab addresses ([`MarketState`])
//!
//! ## Design Principles
//!
//! 1. **Untrusted input**: every index is range-checked, every walk is
//!    bounded by `bump_index`, and malformed data is an error, never a panic
//! 2. **No partial results**: a corrupt account never becomes an empty book
//! 3. **Owned output**: decoded values do not borrow the input buffer
//! 4. **No floating point**: lot conversion uses `rust_decimal`
//!
//! ## Example
//!
//! ```no_run
//! use serum_slab::{DecodeConfig, OrderBook};
//!
//! let bids = std::fs::read("bids.bin").unwrap();
//! let asks = std::fs::read("asks.bin").unwrap();
//!
//! let book = OrderBook::decode(&bids, &asks, &DecodeConfig::default()).unwrap();
//! println!("spread: {:?}", book.spread());
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// Decode options
pub mod config;

/// Error type shared by every decoder
pub mod error;

/// Core data types: flags, keys, orders, lot conversion
pub mod types;

/// Slab decoding: header, arena, nodes, traversal
pub mod slab;

/// Order book: bid/ask sides in priority order
pub mod orderbook;

/// Market state account
pub mod market;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use config::{DecodeConfig, MAX_ACCOUNT_LEN};
pub use error::{DecodeError, Result};
pub use market::{Address, MarketState, MARKET_ACCOUNT_LEN};
pub use orderbook::{BookSide, OrderBook, PriceLevel};
pub use slab::{AccountHeader, InnerNode, LeafNode, Node, NodeTag, Slab, SlabHeader, SlotIndex};
pub use types::{
    AccountFlags, AccountRole, BookFingerprint, MarketParams, Order, OrderKey, Owner, Side,
};
