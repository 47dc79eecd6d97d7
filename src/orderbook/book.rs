//! Order book assembled from a decoded bid slab and ask slab.
//!
//! ## Architecture
//!
//! - **BookSide**: one decoded account (flags + slab) and its orders in
//!   priority order
//! - **OrderBook**: a bid side and an ask side, read-only queries on top
//!
//! ## Price Ordering
//!
//! - **Bids**: sorted high-to-low (best bid = highest price)
//! - **Asks**: sorted low-to-high (best ask = lowest price)
//!
//! Ties at one price go to the older order (lower sequence number).
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
//! if let (Some(bid), Some(ask)) = (book.best_bid(), book.best_ask()) {
//!     println!("{} @ {} / {} @ {}", bid.quantity, bid.price, ask.quantity, ask.price);
//! }
//! ```

use std::cmp::Ordering;

use crate::config::DecodeConfig;
use crate::error::{DecodeError, Result};
use crate::orderbook::PriceLevel;
use crate::slab::{AccountHeader, Slab};
use crate::types::{AccountFlags, BookFingerprint, Order, Owner, Side};

/// Compare two orders of `side` by price-time priority, best first
fn priority(side: Side, a: &Order, b: &Order) -> Ordering {
    let by_price = match side {
        Side::Bid => b.price.cmp(&a.price),
        Side::Ask => a.price.cmp(&b.price),
    };
    by_price.then_with(|| a.seq_num().cmp(&b.seq_num()))
}

// ============================================================================
// BookSide
// ============================================================================

/// One side of the book: a decoded slab and its orders, best first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookSide {
    side: Side,
    flags: AccountFlags,
    slab: Slab,
    orders: Vec<Order>,
}

impl BookSide {
    /// Decode a bids or asks account.
    ///
    /// # Arguments
    ///
    /// * `bytes` - The full account data, magic included
    /// * `side` - Which side the account must be
    /// * `config` - Size bound and which checks to run
    ///
    /// # Errors
    ///
    /// Any [`DecodeError`]: the size bound, header, magic and role checks
    /// come first, then slab decoding and the structural pass.
    pub fn decode(bytes: &[u8], side: Side, config: &DecodeConfig) -> Result<Self> {
        if bytes.len() > config.max_account_len {
            return Err(DecodeError::BufferTooLarge {
                len: bytes.len(),
                max: config.max_account_len,
            });
        }

        let (header, body) = AccountHeader::split(bytes)?;
        if config.verify_magic {
            header.verify_magic()?;
        }
        header.expect_role(side.role())?;

        let slab = Slab::decode(body)?;
        let book_side = Self::assemble(side, header.flags(), slab, config.validate)
            .inspect_err(|err| tracing::warn!(%side, %err, "Rejected order book account"))?;

        tracing::debug!(
            %side,
            bump_index = book_side.slab.bump_index(),
            free_list_len = book_side.slab.free_list_len(),
            leaf_count = book_side.slab.leaf_count(),
            "Decoded order book side"
        );

        Ok(book_side)
    }

    /// Build a side from an already decoded slab.
    ///
    /// Runs the full structural validation, since the slab may come from
    /// anywhere.
    ///
    /// # Errors
    ///
    /// `InvalidAccountFlags` if `flags` do not name `side`, or any error of
    /// [`Slab::validate`].
    pub fn from_slab(flags: AccountFlags, slab: Slab, side: Side) -> Result<Self> {
        flags.expect_role(side.role())?;
        Self::assemble(side, flags, slab, true)
    }

    fn assemble(side: Side, flags: AccountFlags, slab: Slab, validate: bool) -> Result<Self> {
        let leaves = if validate { slab.validate()? } else { slab.walk()? };

        let mut orders: Vec<Order> =
            leaves.into_iter().map(|leaf| Order::from_leaf(leaf, side)).collect();
        orders.sort_unstable_by(|a, b| priority(side, a, b));

        Ok(Self { side, flags, slab, orders })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Which side this is
    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Flags read from the account header
    #[inline]
    pub fn flags(&self) -> AccountFlags {
        self.flags
    }

    /// The decoded arena
    #[inline]
    pub fn slab(&self) -> &Slab {
        &self.slab
    }

    /// Orders, best first
    #[inline]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Number of resting orders
    #[inline]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Whether no orders rest on this side
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Best order (highest bid or lowest ask)
    #[inline]
    pub fn best(&self) -> Option<&Order> {
        self.orders.first()
    }

    /// Aggregated depth, at most `levels` price levels
    pub fn depth(&self, levels: usize) -> Vec<PriceLevel> {
        PriceLevel::aggregate(&self.orders, levels)
    }

    /// Orders owned by `owner`, in priority order
    pub fn orders_for_owner(&self, owner: &Owner) -> impl Iterator<Item = &Order> + '_ {
        let owner = *owner;
        self.orders.iter().filter(move |order| order.owner == owner)
    }
}

// ============================================================================
// OrderBook
// ============================================================================

/// Bid side and ask side of one market.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBook {
    bids: BookSide,
    asks: BookSide,
}

impl OrderBook {
    /// Pair two decoded sides.
    ///
    /// # Errors
    ///
    /// Returns `SideMismatch` if `bids` is not a bid side or `asks` is
    /// not an ask side.
    pub fn new(bids: BookSide, asks: BookSide) -> Result<Self> {
        for (expected, actual) in [(Side::Bid, bids.side), (Side::Ask, asks.side)] {
            if expected != actual {
                return Err(DecodeError::SideMismatch {
                    expected: expected.as_str(),
                    actual: actual.as_str(),
                });
            }
        }
        Ok(Self { bids, asks })
    }

    /// Decode both accounts and pair them
    pub fn decode(bid_bytes: &[u8], ask_bytes: &[u8], config: &DecodeConfig) -> Result<Self> {
        let bids = BookSide::decode(bid_bytes, Side::Bid, config)?;
        let asks = BookSide::decode(ask_bytes, Side::Ask, config)?;
        Self::new(bids, asks)
    }

    // ========================================================================
    // Best Prices
    // ========================================================================

    /// Get the best bid (highest price, oldest first at that price)
    #[inline]
    pub fn best_bid(&self) -> Option<&Order> {
        self.bids.best()
    }

    /// Get the best ask (lowest price, oldest first at that price)
    #[inline]
    pub fn best_ask(&self) -> Option<&Order> {
        self.asks.best()
    }

    /// Get the spread (best_ask - best_bid) in price lots
    ///
    /// # Returns
    ///
    /// The spread, or None if either side is empty or the book is crossed
    pub fn spread(&self) -> Option<u64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) if ask.price >= bid.price => Some(ask.price - bid.price),
            _ => None,
        }
    }

    // ========================================================================
    // Sides
    // ========================================================================

    /// Bids, highest price first
    #[inline]
    pub fn bids(&self) -> &[Order] {
        self.bids.orders()
    }

    /// Asks, lowest price first
    #[inline]
    pub fn asks(&self) -> &[Order] {
        self.asks.orders()
    }

    /// One side of the book
    pub fn side(&self, side: Side) -> &BookSide {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    /// Total resting orders on both sides
    pub fn order_count(&self) -> usize {
        self.bids.len() + self.asks.len()
    }

    /// Whether both sides are empty
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// Aggregated depth of `side`, at most `levels` price levels
    pub fn depth(&self, side: Side, levels: usize) -> Vec<PriceLevel> {
        self.side(side).depth(levels)
    }

    /// Every order owned by `owner`, bids first
    pub fn orders_for_owner(&self, owner: &Owner) -> Vec<&Order> {
        self.bids
            .orders_for_owner(owner)
            .chain(self.asks.orders_for_owner(owner))
            .collect()
    }

    /// SHA-256 digest of both sides in priority order
    pub fn fingerprint(&self) -> BookFingerprint {
        BookFingerprint::of_sides(self.bids(), self.asks())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
