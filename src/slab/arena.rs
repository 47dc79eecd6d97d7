//! Slab arena decoding.
//!
//! The slab header holds five counters, stored in this order:
//!
//! | Offset | Width | Field            |
//! |--------|-------|------------------|
//! | 0      | 8     | `bump_index`     |
//! | 8      | 8     | `free_list_len`  |
//! | 16     | 4     | `free_list_head` |
//! | 20     | 4     | `root`           |
//! | 24     | 8     | `leaf_count`     |
//!
//! followed by `bump_index` slots of [`NODE_SIZE`] bytes. Counters are
//! stored 64 bits wide but slot indices are 32-bit, so any counter above
//! `u32::MAX` is rejected.

use crate::error::{DecodeError, Result};
use crate::slab::node::{Node, SlotIndex};
use crate::slab::{le_u32, le_u64};

/// Width of the slab header in bytes
pub const SLAB_HEADER_LEN: usize = 32;

/// Width of one node slot in bytes
pub const NODE_SIZE: usize = 72;

/// Allocation counters of a slab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SlabHeader {
    /// Slots ever allocated (monotonic)
    pub bump_index: u32,

    /// Slots currently on the free list
    pub free_list_len: u32,

    /// First slot of the free list
    pub free_list_head: u32,

    /// Root slot of the tree (meaningless when `leaf_count == 0`)
    pub root: u32,

    /// Live leaves in the tree
    pub leaf_count: u32,
}

impl SlabHeader {
    /// Parse and range-check the counters.
    ///
    /// # Errors
    ///
    /// - `TruncatedBuffer` if `bytes` is shorter than [`SLAB_HEADER_LEN`]
    /// - `InvalidCounters` if a counter exceeds 32 bits, or if
    ///   `free_list_len` or `leaf_count` exceed `bump_index`
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < SLAB_HEADER_LEN {
            return Err(DecodeError::TruncatedBuffer {
                expected: SLAB_HEADER_LEN,
                actual: bytes.len(),
            });
        }

        let bump_index = bounded("bump_index", le_u64(bytes, 0), u32::MAX as u64)?;
        let free_list_len = bounded("free_list_len", le_u64(bytes, 8), bump_index as u64)?;
        let leaf_count = bounded("leaf_count", le_u64(bytes, 24), bump_index as u64)?;

        Ok(Self {
            bump_index,
            free_list_len,
            free_list_head: le_u32(bytes, 16),
            root: le_u32(bytes, 20),
            leaf_count,
        })
    }

    /// Bytes of node data the counters require
    pub fn nodes_len(&self) -> Option<usize> {
        (self.bump_index as usize).checked_mul(NODE_SIZE)
    }
}

fn bounded(field: &'static str, value: u64, limit: u64) -> Result<u32> {
    if value > limit {
        return Err(DecodeError::InvalidCounters { field, value, limit });
    }
    // limit <= u32::MAX for every caller
    u32::try_from(value).map_err(|_| DecodeError::InvalidCounters {
        field,
        value,
        limit: u32::MAX as u64,
    })
}

/// Number of slots of each kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeCensus {
    /// Uninitialized slots
    pub uninitialized: u32,
    /// Inner nodes
    pub inner: u32,
    /// Leaf nodes
    pub leaf: u32,
    /// Free nodes (excluding the last one)
    pub free: u32,
    /// Last-free nodes
    pub last_free: u32,
}

impl NodeCensus {
    /// Total number of counted slots
    pub fn total(&self) -> u32 {
        self.uninitialized + self.inner + self.leaf + self.free + self.last_free
    }

    /// Free plus last-free slots
    pub fn free_total(&self) -> u32 {
        self.free + self.last_free
    }
}

/// A decoded slab: counters plus one classified node per allocated slot.
///
/// The slab owns copies of every field; it holds no reference into the
/// buffer it was decoded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slab {
    header: SlabHeader,
    nodes: Vec<Node>,
}

impl Slab {
    /// Decode a slab from the bytes that follow the account header.
    ///
    /// Only counters and slots are checked here. Free-list and tree
    /// integrity are checked by [`Slab::free_list`], [`Slab::walk`] and
    /// [`Slab::validate`].
    ///
    /// # Errors
    ///
    /// - `TruncatedBuffer` if fewer than `32 + bump_index * 72` bytes remain
    /// - `InvalidCounters` for inconsistent counters
    /// - `UnknownNodeTag` / `InvalidChildIndex` from slot classification
    pub fn decode(body: &[u8]) -> Result<Self> {
        let header = SlabHeader::parse(body)?;
        let node_bytes = &body[SLAB_HEADER_LEN..];

        let needed = header.nodes_len().ok_or(DecodeError::TruncatedBuffer {
            expected: usize::MAX,
            actual: body.len(),
        })?;
        if node_bytes.len() < needed {
            return Err(DecodeError::TruncatedBuffer {
                expected: SLAB_HEADER_LEN + needed,
                actual: body.len(),
            });
        }

        let mut nodes = Vec::with_capacity(header.bump_index as usize);
        for (slot, chunk) in (0u32..).zip(node_bytes[..needed].chunks_exact(NODE_SIZE)) {
            let bytes: &[u8; NODE_SIZE] =
                chunk.try_into().map_err(|_| DecodeError::TruncatedBuffer {
                    expected: NODE_SIZE,
                    actual: chunk.len(),
                })?;
            nodes.push(Node::classify(bytes, slot, header.bump_index)?);
        }

        tracing::trace!(
            bump_index = header.bump_index,
            free_list_len = header.free_list_len,
            free_list_head = header.free_list_head,
            root = header.root,
            leaf_count = header.leaf_count,
            "Decoded slab arena"
        );

        Ok(Self { header, nodes })
    }

    /// The decoded counters
    #[inline]
    pub fn header(&self) -> &SlabHeader {
        &self.header
    }

    /// Slots ever allocated
    #[inline]
    pub fn bump_index(&self) -> u32 {
        self.header.bump_index
    }

    /// Slots on the free list
    #[inline]
    pub fn free_list_len(&self) -> u32 {
        self.header.free_list_len
    }

    /// First free slot
    #[inline]
    pub fn free_list_head(&self) -> u32 {
        self.header.free_list_head
    }

    /// Live leaves
    #[inline]
    pub fn leaf_count(&self) -> u32 {
        self.header.leaf_count
    }

    /// Whether the tree holds no orders
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.header.leaf_count == 0
    }

    /// All allocated slots, indexed by slot number
    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// One slot, `None` outside `[0, bump_index)`
    #[inline]
    pub fn node(&self, index: SlotIndex) -> Option<&Node> {
        self.nodes.get(index.as_usize())
    }

    /// Count slots by kind
    pub fn census(&self) -> NodeCensus {
        let mut census = NodeCensus::default();
        for node in &self.nodes {
            match node {
                Node::Uninitialized => census.uninitialized += 1,
                Node::Inner(_) => census.inner += 1,
                Node::Leaf(_) => census.leaf += 1,
                Node::Free { .. } => census.free += 1,
                Node::LastFree => census.last_free += 1,
            }
        }
        census
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
