//! Aggregated price levels (L2 depth).
//!
//! ## Design
//!
//! A `PriceLevel` folds every order resting at one price into a total
//! quantity and an order count. Levels are built from a side's orders,
//! which are already in priority order, so consecutive orders with equal
//! price form one level and the levels come out best first.
//!
//! ```text
//! orders: 105 105 104 101 101 101     (bids, best first)
//! levels: [105 x2] [104 x1] [101 x3]
//! ```

use rust_decimal::Decimal;

use crate::types::{MarketParams, Order};

/// All orders at a single price, aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PriceLevel {
    /// Price for this level in quote lots per base lot
    pub price: u64,

    /// Total remaining quantity at this level in base lots
    pub total_quantity: u64,

    /// Number of orders at this price level
    pub order_count: usize,
}

impl PriceLevel {
    /// Create a new empty price level
    ///
    /// # Arguments
    ///
    /// * `price` - The price for this level, in lots
    pub fn new(price: u64) -> Self {
        Self {
            price,
            total_quantity: 0,
            order_count: 0,
        }
    }

    /// Check if the price level is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order_count == 0
    }

    /// Fold one more order into the level
    #[inline]
    pub fn push(&mut self, order: &Order) {
        debug_assert_eq!(order.price, self.price);
        self.total_quantity = self.total_quantity.saturating_add(order.quantity);
        self.order_count += 1;
    }

    /// Aggregate priority-ordered `orders` into at most `max_levels` levels.
    ///
    /// # Arguments
    ///
    /// * `orders` - One side's orders, best first
    /// * `max_levels` - Maximum number of levels to return
    ///
    /// # Returns
    ///
    /// Levels best first; fewer than `max_levels` if the side is shallow.
    pub fn aggregate(orders: &[Order], max_levels: usize) -> Vec<PriceLevel> {
        let mut levels: Vec<PriceLevel> = Vec::with_capacity(max_levels.min(orders.len()));

        for order in orders {
            if let Some(level) = levels.last_mut() {
                if level.price == order.price {
                    level.push(order);
                    continue;
                }
            }
            if levels.len() == max_levels {
                break;
            }

            let mut level = PriceLevel::new(order.price);
            level.push(order);
            levels.push(level);
        }

        levels
    }

    /// Level price as a decimal, `None` if the market parameters cannot
    /// represent it
    pub fn price_decimal(&self, params: &MarketParams) -> Option<Decimal> {
        params.price_to_decimal(self.price)
    }

    /// Level quantity as a decimal number of base units
    pub fn quantity_decimal(&self, params: &MarketParams) -> Option<Decimal> {
        params.size_to_decimal(self.total_quantity)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
