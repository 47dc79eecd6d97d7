//! Decode configuration.
//!
//! The decoder itself is stateless; `DecodeConfig` only carries the knobs a
//! caller may want to loosen when inspecting damaged dumps.

/// Solana's maximum account data size (10 MiB).
pub const MAX_ACCOUNT_LEN: usize = 10 * 1024 * 1024;

/// Options applied by the account-level decoders.
///
/// ## Example
///
/// ```
/// use serum_slab::DecodeConfig;
///
/// let config = DecodeConfig::default().with_validate(false);
/// assert!(config.verify_magic);
/// assert!(!config.validate);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeConfig {
    /// Buffers longer than this are rejected before any allocation
    pub max_account_len: usize,

    /// Require the `b"serum"` magic prefix
    pub verify_magic: bool,

    /// Run the full structural pass (free list, tree, slot accounting)
    /// instead of only walking the tree
    pub validate: bool,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            max_account_len: MAX_ACCOUNT_LEN,
            verify_magic: true,
            validate: true,
        }
    }
}

impl DecodeConfig {
    /// Set the maximum accepted buffer length
    pub fn with_max_account_len(mut self, max_account_len: usize) -> Self {
        self.max_account_len = max_account_len;
        self
    }

    /// Enable or disable magic verification
    pub fn with_verify_magic(mut self, verify_magic: bool) -> Self {
        self.verify_magic = verify_magic;
        self
    }

    /// Enable or disable the full structural validation pass
    pub fn with_validate(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }
}
