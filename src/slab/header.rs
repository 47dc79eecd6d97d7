//! Account header parsing.
//!
//! Every DEX account starts with the 5-byte `b"serum"` magic followed by a
//! little-endian `u64` of [`AccountFlags`]. Parsing only extracts these
//! fields; magic and role checks are separate so that a zero-filled header
//! still parses and the failure surfaces where the content is judged.

use crate::error::{DecodeError, Result};
use crate::slab::le_u64;
use crate::types::{AccountFlags, AccountRole};

/// Leading magic bytes of every account
pub const MAGIC: [u8; 5] = *b"serum";

/// Trailing bytes of every account
pub const TRAILER: [u8; 7] = *b"padding";

/// Width of magic + flags
pub const ACCOUNT_HEADER_LEN: usize = MAGIC.len() + 8;

/// Magic and flags from the front of an account buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountHeader {
    magic: [u8; 5],
    flags: AccountFlags,
}

impl AccountHeader {
    /// Parse the header from the front of `bytes`.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::MalformedHeader` if `bytes` is shorter than
    /// [`ACCOUNT_HEADER_LEN`].
    ///
    /// # Example
    ///
    /// ```
    /// use serum_slab::{AccountFlags, AccountHeader};
    ///
    /// let mut bytes = b"serum".to_vec();
    /// bytes.extend_from_slice(&0x21u64.to_le_bytes());
    ///
    /// let header = AccountHeader::parse(&bytes).unwrap();
    /// assert!(header.has_valid_magic());
    /// assert_eq!(header.flags(), AccountFlags::INITIALIZED | AccountFlags::BIDS);
    /// ```
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < ACCOUNT_HEADER_LEN {
            return Err(DecodeError::MalformedHeader {
                expected: ACCOUNT_HEADER_LEN,
                actual: bytes.len(),
            });
        }

        let mut magic = [0u8; 5];
        magic.copy_from_slice(&bytes[..MAGIC.len()]);

        Ok(Self {
            magic,
            flags: AccountFlags::from_raw(le_u64(bytes, MAGIC.len())),
        })
    }

    /// Parse the header and return it with the bytes that follow it
    pub fn split(bytes: &[u8]) -> Result<(Self, &[u8])> {
        let header = Self::parse(bytes)?;
        Ok((header, &bytes[ACCOUNT_HEADER_LEN..]))
    }

    /// The raw magic bytes
    pub fn magic(&self) -> [u8; 5] {
        self.magic
    }

    /// The account flags
    pub fn flags(&self) -> AccountFlags {
        self.flags
    }

    /// Whether the magic equals `b"serum"`
    pub fn has_valid_magic(&self) -> bool {
        self.magic == MAGIC
    }

    /// # Errors
    ///
    /// Returns `DecodeError::InvalidMagic` unless the magic is `b"serum"`.
    pub fn verify_magic(&self) -> Result<()> {
        if self.has_valid_magic() {
            Ok(())
        } else {
            Err(DecodeError::InvalidMagic { found: self.magic })
        }
    }

    /// # Errors
    ///
    /// Returns `DecodeError::InvalidAccountFlags` unless the flags describe
    /// exactly `role`.
    pub fn expect_role(&self, role: AccountRole) -> Result<()> {
        self.flags.expect_role(role)
    }
}
