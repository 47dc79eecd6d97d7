//! Lot to decimal conversion.
//!
//! ## Overview
//!
//! Slab prices are stored in quote lots per base lot and quantities in base
//! lots. Turning them into human units needs the market's lot sizes and the
//! decimals of both mints:
//!
//! ```text
//! price = lots * quote_lot_size * 10^base_decimals
//!         / (base_lot_size * 10^quote_decimals)
//! size  = lots * base_lot_size / 10^base_decimals
//! ```
//!
//! All math goes through `rust_decimal` with checked operations, so a
//! hostile lot size yields `None` instead of a wrapped value.
//!
//! ## Examples
//!
//! ```
//! use rust_decimal::Decimal;
//! use serum_slab::MarketParams;
//!
//! // SOL/USDC: 0.1 SOL base lots, 0.0001 USDC quote lots
//! let params = MarketParams::new(100_000_000, 100, 9, 6);
//!
//! assert_eq!(params.price_to_decimal(1_000), Some(Decimal::from(1)));
//! assert_eq!(params.size_to_decimal(5), Some(Decimal::new(5, 1)));
//! ```

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Largest decimals value `rust_decimal` can scale by without overflow
pub const MAX_DECIMALS: u8 = 28;

/// Lot sizes and mint decimals of one market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MarketParams {
    /// Base token atoms per base lot
    pub base_lot_size: u64,

    /// Quote token atoms per quote lot
    pub quote_lot_size: u64,

    /// Decimals of the base mint
    pub base_decimals: u8,

    /// Decimals of the quote mint
    pub quote_decimals: u8,
}

impl MarketParams {
    /// Create market parameters
    pub fn new(base_lot_size: u64, quote_lot_size: u64, base_decimals: u8, quote_decimals: u8) -> Self {
        Self {
            base_lot_size,
            quote_lot_size,
            base_decimals,
            quote_decimals,
        }
    }

    /// Convert a price in lots to a decimal price
    ///
    /// # Returns
    ///
    /// * `Some(Decimal)` - quote units per base unit
    /// * `None` - if the base lot size is zero or the math overflows
    pub fn price_to_decimal(&self, price_lots: u64) -> Option<Decimal> {
        if self.base_lot_size == 0 {
            return None;
        }

        let numerator = Decimal::from(price_lots)
            .checked_mul(Decimal::from(self.quote_lot_size))?
            .checked_mul(pow10(self.base_decimals)?)?;
        let denominator = Decimal::from(self.base_lot_size).checked_mul(pow10(self.quote_decimals)?)?;

        numerator.checked_div(denominator).map(|d| d.normalize())
    }

    /// Convert a quantity in base lots to base units
    pub fn size_to_decimal(&self, size_lots: u64) -> Option<Decimal> {
        Decimal::from(size_lots)
            .checked_mul(Decimal::from(self.base_lot_size))?
            .checked_div(pow10(self.base_decimals)?)
            .map(|d| d.normalize())
    }

    /// Convert a decimal price back to lots, rounding down
    ///
    /// # Returns
    ///
    /// * `Some(u64)` - the price in lots
    /// * `None` - if the price is negative, the quote lot size is zero,
    ///   or the result does not fit in `u64`
    pub fn decimal_to_price(&self, price: Decimal) -> Option<u64> {
        if price.is_sign_negative() || self.quote_lot_size == 0 {
            return None;
        }

        let numerator = price
            .checked_mul(Decimal::from(self.base_lot_size))?
            .checked_mul(pow10(self.quote_decimals)?)?;
        let denominator = Decimal::from(self.quote_lot_size).checked_mul(pow10(self.base_decimals)?)?;

        numerator.checked_div(denominator)?.floor().to_u64()
    }
}

/// 10^exp as a Decimal
fn pow10(exp: u8) -> Option<Decimal> {
    if exp > MAX_DECIMALS {
        return None;
    }
    Some(Decimal::from_i128_with_scale(10i128.checked_pow(exp as u32)?, 0))
}

// ============================================================================
// Unit Tests
// ============================================================================
