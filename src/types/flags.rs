//! Account flags carried in the header of every DEX account.
//!
//! The flags identify the role of an account blob. A decoder that expects
//! a bids slab must see exactly `INITIALIZED | BIDS`; anything else is
//! rejected.

use bitflags::bitflags;

use crate::error::{DecodeError, Result};

bitflags! {
    /// Account role flags (stored as a little-endian `u64`)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AccountFlags: u64 {
        /// Account has been initialized by the program
        const INITIALIZED = 1 << 0;

        /// Market state account
        const MARKET = 1 << 1;

        /// Open orders account
        const OPEN_ORDERS = 1 << 2;

        /// Request queue account
        const REQUEST_QUEUE = 1 << 3;

        /// Event queue account
        const EVENT_QUEUE = 1 << 4;

        /// Bid side slab
        const BIDS = 1 << 5;

        /// Ask side slab
        const ASKS = 1 << 6;

        /// Market is disabled
        const DISABLED = 1 << 7;

        /// Market is closed
        const CLOSED = 1 << 8;

        /// Market requires an open-orders authority
        const PERMISSIONED = 1 << 9;

        /// Crank requires an authority signature
        const CRANK_AUTHORITY_REQUIRED = 1 << 10;
    }
}

impl Default for AccountFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// The role an account buffer is expected to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountRole {
    /// Bid side order book slab
    Bids,
    /// Ask side order book slab
    Asks,
    /// Market state
    Market,
}

impl AccountRole {
    /// The exact flag combination required for this role.
    ///
    /// Market accounts may additionally carry `PERMISSIONED` and
    /// `CRANK_AUTHORITY_REQUIRED`.
    pub fn required_flags(self) -> AccountFlags {
        match self {
            AccountRole::Bids => AccountFlags::INITIALIZED | AccountFlags::BIDS,
            AccountRole::Asks => AccountFlags::INITIALIZED | AccountFlags::ASKS,
            AccountRole::Market => AccountFlags::INITIALIZED | AccountFlags::MARKET,
        }
    }

    fn optional_flags(self) -> AccountFlags {
        match self {
            AccountRole::Bids | AccountRole::Asks => AccountFlags::empty(),
            AccountRole::Market => {
                AccountFlags::PERMISSIONED | AccountFlags::CRANK_AUTHORITY_REQUIRED
            }
        }
    }
}

impl AccountFlags {
    /// Create flags from the raw field, keeping unknown bits so that they
    /// fail role checks instead of vanishing.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self::from_bits_retain(raw)
    }

    /// Check that these flags describe `role` and nothing else.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::InvalidAccountFlags` on any other combination.
    pub fn expect_role(self, role: AccountRole) -> Result<()> {
        let required = role.required_flags();
        let extra = self.difference(required);

        if self.contains(required) && role.optional_flags().contains(extra) {
            Ok(())
        } else {
            Err(DecodeError::InvalidAccountFlags {
                expected: required.bits(),
                found: self.bits(),
            })
        }
    }
}
