//! Market state account decoding.
//!
//! The market account names the two order book accounts and carries the
//! lot sizes needed to read their prices. Only the fields are extracted;
//! nothing here follows the addresses.
//!
//! ## Layout
//!
//! | Offset | Width | Field                      |
//! |--------|-------|----------------------------|
//! | 0      | 13    | magic + account flags      |
//! | 13     | 32    | own address                |
//! | 45     | 8     | vault signer nonce         |
//! | 53     | 32    | base mint                  |
//! | 85     | 32    | quote mint                 |
//! | 117    | 32    | base vault                 |
//! | 149    | 8     | base deposits total        |
//! | 157    | 8     | base fees accrued          |
//! | 165    | 32    | quote vault                |
//! | 197    | 8     | quote deposits total       |
//! | 205    | 8     | quote fees accrued         |
//! | 213    | 8     | quote dust threshold       |
//! | 221    | 32    | request queue              |
//! | 253    | 32    | event queue                |
//! | 285    | 32    | bids                       |
//! | 317    | 32    | asks                       |
//! | 349    | 8     | base lot size              |
//! | 357    | 8     | quote lot size             |
//! | 365    | 8     | fee rate (bps)             |
//! | 373    | 8     | referrer rebates accrued   |
//! | 381    | 7     | `b"padding"`               |

use std::fmt;

use crate::config::DecodeConfig;
use crate::error::{DecodeError, Result};
use crate::slab::{address, le_u64, AccountHeader, TRAILER};
use crate::types::{AccountFlags, AccountRole, MarketParams};

/// Full width of a market account, trailer included
pub const MARKET_ACCOUNT_LEN: usize = 388;

/// A 32-byte account address.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(pub [u8; 32]);

impl Address {
    /// Hex rendering of the address
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Decoded market state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketState {
    /// Account flags (Initialized | Market, possibly Permissioned / CrankAuthorityRequired)
    pub flags: AccountFlags,
    /// The market's own address
    pub own_address: Address,
    /// Nonce of the vault signer PDA
    pub vault_signer_nonce: u64,
    /// Base token mint
    pub base_mint: Address,
    /// Quote token mint
    pub quote_mint: Address,
    /// Base token vault
    pub base_vault: Address,
    /// Base tokens deposited
    pub base_deposits_total: u64,
    /// Base fees accrued
    pub base_fees_accrued: u64,
    /// Quote token vault
    pub quote_vault: Address,
    /// Quote tokens deposited
    pub quote_deposits_total: u64,
    /// Quote fees accrued
    pub quote_fees_accrued: u64,
    /// Quote dust threshold
    pub quote_dust_threshold: u64,
    /// Request queue account
    pub request_queue: Address,
    /// Event queue account
    pub event_queue: Address,
    /// Bids slab account
    pub bids: Address,
    /// Asks slab account
    pub asks: Address,
    /// Base lot size in base native units
    pub base_lot_size: u64,
    /// Quote lot size in quote native units
    pub quote_lot_size: u64,
    /// Taker fee rate in basis points
    pub fee_rate_bps: u64,
    /// Referrer rebates accrued
    pub referrer_rebates_accrued: u64,
}

impl MarketState {
    /// Decode a market account.
    ///
    /// # Errors
    ///
    /// - `BufferTooLarge` above `config.max_account_len`
    /// - `MalformedHeader` below the 13-byte header
    /// - `InvalidMagic` if magic verification is on and fails
    /// - `InvalidAccountFlags` unless the flags name a market
    /// - `TruncatedBuffer` below [`MARKET_ACCOUNT_LEN`] minus the trailer
    pub fn decode(bytes: &[u8], config: &DecodeConfig) -> Result<Self> {
        if bytes.len() > config.max_account_len {
            return Err(DecodeError::BufferTooLarge {
                len: bytes.len(),
                max: config.max_account_len,
            });
        }

        let header = AccountHeader::parse(bytes)?;
        if config.verify_magic {
            header.verify_magic()?;
        }
        header.expect_role(AccountRole::Market)?;

        // The trailer is not needed to read any field
        let needed = MARKET_ACCOUNT_LEN - TRAILER.len();
        if bytes.len() < needed {
            return Err(DecodeError::TruncatedBuffer {
                expected: needed,
                actual: bytes.len(),
            });
        }

        let market = Self {
            flags: header.flags(),
            own_address: Address(address(bytes, 13)),
            vault_signer_nonce: le_u64(bytes, 45),
            base_mint: Address(address(bytes, 53)),
            quote_mint: Address(address(bytes, 85)),
            base_vault: Address(address(bytes, 117)),
            base_deposits_total: le_u64(bytes, 149),
            base_fees_accrued: le_u64(bytes, 157),
            quote_vault: Address(address(bytes, 165)),
            quote_deposits_total: le_u64(bytes, 197),
            quote_fees_accrued: le_u64(bytes, 205),
            quote_dust_threshold: le_u64(bytes, 213),
            request_queue: Address(address(bytes, 221)),
            event_queue: Address(address(bytes, 253)),
            bids: Address(address(bytes, 285)),
            asks: Address(address(bytes, 317)),
            base_lot_size: le_u64(bytes, 349),
            quote_lot_size: le_u64(bytes, 357),
            fee_rate_bps: le_u64(bytes, 365),
            referrer_rebates_accrued: le_u64(bytes, 373),
        };

        tracing::debug!(
            base_lot_size = market.base_lot_size,
            quote_lot_size = market.quote_lot_size,
            fee_rate_bps = market.fee_rate_bps,
            "Decoded market account"
        );

        Ok(market)
    }

    /// Price conversion parameters, given the mints' decimals
    pub fn params(&self, base_decimals: u8, quote_decimals: u8) -> MarketParams {
        MarketParams::new(self.base_lot_size, self.quote_lot_size, base_decimals, quote_decimals)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
