//! Slab decoding: account header, arena, node classification and traversal.
//!
//! ## Layout
//!
//! ```text
//! +-------+-------+-------------+---------------------------+---------+
//! | serum | flags | slab header |  node slots (72 bytes)... | padding |
//! |  5 B  |  8 B  |    32 B     |  bump_index * 72 B        |   7 B   |
//! +-------+-------+-------------+---------------------------+---------+
//! ```
//!
//! All integers are little-endian. The slab is an arena: slot indices stand
//! in for pointers, free slots form a singly linked list, and live slots
//! form a crit-bit tree whose leaves are the resting orders.
//!
//! ## Components
//!
//! - [`AccountHeader`]: magic + account flags
//! - [`Slab`]: counters + decoded slots
//! - [`Node`]: one classified slot
//! - traversal ([`Slab::walk`], [`Slab::free_list`], [`Slab::validate`])

pub mod arena;
pub mod header;
pub mod node;
pub mod walker;

#[cfg(test)]
pub(crate) mod testing;

pub use arena::{NodeCensus, Slab, SlabHeader, NODE_SIZE, SLAB_HEADER_LEN};
pub use header::{AccountHeader, ACCOUNT_HEADER_LEN, MAGIC, TRAILER};
pub use node::{InnerNode, LeafNode, Node, NodeTag, SlotIndex};

/// Read a little-endian `u32` at `offset`. Callers check bounds first.
#[inline]
pub(crate) fn le_u32(bytes: &[u8], offset: usize) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_le_bytes(buf)
}

/// Read a little-endian `u64` at `offset`. Callers check bounds first.
#[inline]
pub(crate) fn le_u64(bytes: &[u8], offset: usize) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[offset..offset + 8]);
    u64::from_le_bytes(buf)
}

/// Read a little-endian `u128` at `offset`. Callers check bounds first.
#[inline]
pub(crate) fn le_u128(bytes: &[u8], offset: usize) -> u128 {
    let mut buf = [0u8; 16];
    buf.copy_from_slice(&bytes[offset..offset + 16]);
    u128::from_le_bytes(buf)
}

/// Copy a 32-byte address at `offset`. Callers check bounds first.
#[inline]
pub(crate) fn address(bytes: &[u8], offset: usize) -> [u8; 32] {
    let mut buf = [0u8; 32];
    buf.copy_from_slice(&bytes[offset..offset + 32]);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_le_readers() {
        let bytes = [
            0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08,
            0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F, 0x10,
        ];
        assert_eq!(le_u32(&bytes, 0), 0x0403_0201);
        assert_eq!(le_u32(&bytes, 4), 0x0807_0605);
        assert_eq!(le_u64(&bytes, 8), 0x100F_0E0D_0C0B_0A09);
        assert_eq!(le_u128(&bytes, 0), 0x100F_0E0D_0C0B_0A09_0807_0605_0403_0201);
    }
}
