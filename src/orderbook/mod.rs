//! Order book built on top of decoded slabs.
//!
//! ## Architecture
//!
//! Each side of a market lives in its own account. Decoding one yields a
//! [`BookSide`]; pairing a bid side with an ask side yields an
//! [`OrderBook`]. Both are read-only snapshots.
//!
//! ## Components
//!
//! - [`BookSide`]: flags, slab and priority-ordered orders of one account
//! - [`OrderBook`]: best prices, spread, depth, fingerprint
//! - [`PriceLevel`]: all orders at one price, aggregated
//!
//! ## Cost
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | Decode side | O(n log n) |
//! | Best bid/ask | O(1) |
//! | Depth (k levels) | O(n) worst case |
//! | Orders for owner | O(n) |
//!
//! ## Example
//!
//! ```no_run
//! use serum_slab::orderbook::BookSide;
//! use serum_slab::{DecodeConfig, Side};
//!
//! let bytes = std::fs::read("asks.bin").unwrap();
//! let asks = BookSide::decode(&bytes, Side::Ask, &DecodeConfig::default()).unwrap();
//!
//! for level in asks.depth(5) {
//!     println!("{:>10} {:>10} ({})", level.price, level.total_quantity, level.order_count);
//! }
//! ```

pub mod book;
pub mod level;

pub use book::{BookSide, OrderBook};
pub use level::PriceLevel;
