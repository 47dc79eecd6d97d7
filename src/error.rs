//! Error types for slab and market account decoding.
//!
//! Every error is terminal for the decode call that produced it. There are
//! no partial results: a corrupt account is never turned into an empty or
//! zero-valued book.

use thiserror::Error;

/// Errors that can occur while decoding an account buffer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    // Header errors
    /// Buffer is shorter than the fixed account header
    #[error("malformed header: expected at least {expected} bytes, got {actual}")]
    MalformedHeader {
        /// Required header width in bytes
        expected: usize,
        /// Actual buffer length
        actual: usize,
    },

    /// Leading magic bytes are not `b"serum"`
    #[error("invalid magic prefix: 0x{}", hex::encode(.found))]
    InvalidMagic {
        /// The five bytes found at the front of the buffer
        found: [u8; 5],
    },

    /// Account flags do not describe the expected account role
    #[error("invalid account flags: expected {expected:#x}, found {found:#x}")]
    InvalidAccountFlags {
        /// Raw flags of the expected role
        expected: u64,
        /// Raw flags read from the buffer
        found: u64,
    },

    /// Buffer exceeds the caller-imposed size bound
    #[error("buffer too large: {len} bytes exceeds maximum {max}")]
    BufferTooLarge {
        /// Actual buffer length
        len: usize,
        /// Configured maximum
        max: usize,
    },

    // Arena errors
    /// Buffer is shorter than the stored counters imply
    #[error("truncated buffer: need {expected} bytes, got {actual}")]
    TruncatedBuffer {
        /// Bytes required by the header/counters
        expected: usize,
        /// Bytes available
        actual: usize,
    },

    /// Slab counters are mutually inconsistent or out of range
    #[error("invalid counters: {field} = {value} exceeds {limit}")]
    InvalidCounters {
        /// Name of the offending counter
        field: &'static str,
        /// Value read from the buffer
        value: u64,
        /// Upper bound it violated
        limit: u64,
    },

    // Node errors
    /// A slot's tag is outside the known set
    #[error("unknown node tag {tag} in slot {slot}")]
    UnknownNodeTag {
        /// Slot index
        slot: u32,
        /// Raw tag value
        tag: u32,
    },

    /// A stored index references a slot outside `[0, bump_index)`
    #[error("slot {slot} references child {child} outside bump index {bump_index}")]
    InvalidChildIndex {
        /// Slot holding the reference
        slot: u32,
        /// Referenced index
        child: u32,
        /// Allocation bound
        bump_index: u32,
    },

    /// The root index is out of range or names a non-live slot
    #[error("invalid root {root}: {reason}")]
    InvalidRoot {
        /// Stored root index
        root: u32,
        /// What is wrong with it
        reason: &'static str,
    },

    // Structural errors
    /// Tree traversal found a cycle, a dead slot, or inconsistent keys
    #[error("corrupt tree at slot {slot}: {reason}")]
    CorruptTree {
        /// Slot where the inconsistency was detected
        slot: u32,
        /// What is wrong
        reason: &'static str,
    },

    /// Free-list chain does not match the stored free-list counters
    #[error("corrupt free list at slot {slot}: {reason}")]
    CorruptFreeList {
        /// Slot where the inconsistency was detected
        slot: u32,
        /// What is wrong
        reason: &'static str,
    },

    /// A book side was assembled in the wrong position
    #[error("side mismatch: expected {expected} slab, got {actual}")]
    SideMismatch {
        /// Side required by the position
        expected: &'static str,
        /// Side the slab was decoded as
        actual: &'static str,
    },
}

/// Convenient Result type alias for decode operations
pub type Result<T> = std::result::Result<T, DecodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = DecodeError::MalformedHeader { expected: 13, actual: 4 };
        assert_eq!(err.to_string(), "malformed header: expected at least 13 bytes, got 4");

        let err = DecodeError::InvalidMagic { found: *b"solan" };
        assert_eq!(err.to_string(), "invalid magic prefix: 0x736f6c616e");

        let err = DecodeError::InvalidCounters { field: "free_list_len", value: 9, limit: 8 };
        assert_eq!(err.to_string(), "invalid counters: free_list_len = 9 exceeds 8");
    }

    #[test]
    fn test_errors_are_comparable() {
        let a = DecodeError::UnknownNodeTag { slot: 3, tag: 9 };
        assert_eq!(a.clone(), a);
        assert_ne!(a, DecodeError::UnknownNodeTag { slot: 3, tag: 8 });
    }
}
