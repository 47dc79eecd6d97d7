//! Node slots and their classification.
//!
//! ## Slot Layout
//!
//! Every slot is 72 bytes and starts with a little-endian `u32` tag.
//!
//! | Tag | Kind          | Payload                                                  |
//! |-----|---------------|----------------------------------------------------------|
//! | 0   | Uninitialized | -                                                        |
//! | 1   | Inner         | prefix_len u32 @4, key u128 @8, children [u32; 2] @24    |
//! | 2   | Leaf          | owner_slot u8 @4, fee_tier u8 @5, key u128 @8,           |
//! |     |               | owner [u8; 32] @24, quantity u64 @56, client id u64 @64  |
//! | 3   | Free          | next u32 @4                                              |
//! | 4   | LastFree      | - (terminates the free list)                             |
//!
//! Slot indices are [`SlotIndex`] values, never references, so an
//! out-of-range index is a checked error rather than undefined behavior.

use std::fmt;

use crate::error::{DecodeError, Result};
use crate::slab::arena::NODE_SIZE;
use crate::slab::{address, le_u128, le_u32, le_u64};
use crate::types::{OrderKey, Owner};

/// Index of a slot in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SlotIndex(pub u32);

impl SlotIndex {
    /// Raw index value
    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }

    /// Index usable for slice access
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Tag discriminator stored in the first field of every slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeTag {
    /// Never allocated
    Uninitialized = 0,
    /// Crit-bit branch
    Inner = 1,
    /// Resting order
    Leaf = 2,
    /// Free slot with a successor
    Free = 3,
    /// Last slot of the free list
    LastFree = 4,
}

impl NodeTag {
    /// Map a raw tag, `None` for unknown values
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(NodeTag::Uninitialized),
            1 => Some(NodeTag::Inner),
            2 => Some(NodeTag::Leaf),
            3 => Some(NodeTag::Free),
            4 => Some(NodeTag::LastFree),
            _ => None,
        }
    }
}

/// A branch of the crit-bit tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InnerNode {
    /// Number of leading key bits shared by every key below this node
    pub prefix_len: u32,

    /// A key carrying the shared prefix
    pub key: u128,

    /// Child for a clear critical bit (`[0]`) and a set one (`[1]`)
    pub children: [SlotIndex; 2],
}

impl InnerNode {
    /// Mask of the critical bit, `None` if `prefix_len` leaves no bit
    #[inline]
    pub fn crit_bit_mask(&self) -> Option<u128> {
        (self.prefix_len < u128::BITS).then(|| (1u128 << 127) >> self.prefix_len)
    }

    /// Whether `key` agrees with this node on the first `prefix_len` bits
    #[inline]
    pub fn shares_prefix(&self, key: u128) -> bool {
        match self.prefix_len {
            0 => true,
            len if len < u128::BITS => (key ^ self.key) >> (u128::BITS - len) == 0,
            _ => false,
        }
    }

    /// Child position `key` descends into
    #[inline]
    pub fn branch(&self, key: u128) -> Option<usize> {
        self.crit_bit_mask().map(|mask| usize::from(key & mask != 0))
    }
}

/// A resting order as stored in the slab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LeafNode {
    /// Slot in the owner's open-orders account
    pub owner_slot: u8,

    /// Fee tier at placement time
    pub fee_tier: u8,

    /// Price (high bits) and sequence number (low bits)
    pub key: OrderKey,

    /// Owning open-orders account
    pub owner: Owner,

    /// Remaining quantity in base lots
    pub quantity: u64,

    /// Client supplied order id
    pub client_order_id: u64,
}

/// One classified slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Node {
    /// Never allocated
    Uninitialized,
    /// Crit-bit branch
    Inner(InnerNode),
    /// Resting order
    Leaf(LeafNode),
    /// Free slot pointing at the next free slot
    Free {
        /// Next slot on the free list
        next: SlotIndex,
    },
    /// Terminal free slot
    LastFree,
}

impl Node {
    /// Classify one slot.
    ///
    /// # Arguments
    ///
    /// * `bytes` - the slot's 72 bytes
    /// * `slot` - the slot's own index (for error reporting)
    /// * `bump_index` - allocation bound that child indices must respect
    ///
    /// # Errors
    ///
    /// - `UnknownNodeTag` for a tag outside 0..=4
    /// - `InvalidChildIndex` for an inner child `>= bump_index`
    pub fn classify(bytes: &[u8; NODE_SIZE], slot: u32, bump_index: u32) -> Result<Self> {
        let raw_tag = le_u32(bytes, 0);
        let tag = NodeTag::from_u32(raw_tag)
            .ok_or(DecodeError::UnknownNodeTag { slot, tag: raw_tag })?;

        let node = match tag {
            NodeTag::Uninitialized => Node::Uninitialized,
            NodeTag::Inner => {
                let mut children = [SlotIndex::default(); 2];
                for (i, child) in children.iter_mut().enumerate() {
                    let index = le_u32(bytes, 24 + i * 4);
                    if index >= bump_index {
                        return Err(DecodeError::InvalidChildIndex {
                            slot,
                            child: index,
                            bump_index,
                        });
                    }
                    *child = SlotIndex(index);
                }

                Node::Inner(InnerNode {
                    prefix_len: le_u32(bytes, 4),
                    key: le_u128(bytes, 8),
                    children,
                })
            }
            NodeTag::Leaf => Node::Leaf(LeafNode {
                owner_slot: bytes[4],
                fee_tier: bytes[5],
                key: OrderKey(le_u128(bytes, 8)),
                owner: Owner(address(bytes, 24)),
                quantity: le_u64(bytes, 56),
                client_order_id: le_u64(bytes, 64),
            }),
            NodeTag::Free => Node::Free {
                next: SlotIndex(le_u32(bytes, 4)),
            },
            NodeTag::LastFree => Node::LastFree,
        };

        Ok(node)
    }

    /// The tag this node was decoded from
    pub fn tag(&self) -> NodeTag {
        match self {
            Node::Uninitialized => NodeTag::Uninitialized,
            Node::Inner(_) => NodeTag::Inner,
            Node::Leaf(_) => NodeTag::Leaf,
            Node::Free { .. } => NodeTag::Free,
            Node::LastFree => NodeTag::LastFree,
        }
    }

    /// Whether the slot belongs to the tree
    #[inline]
    pub fn is_live(&self) -> bool {
        matches!(self, Node::Inner(_) | Node::Leaf(_))
    }

    /// Whether the slot belongs to the free list
    #[inline]
    pub fn is_free(&self) -> bool {
        matches!(self, Node::Free { .. } | Node::LastFree)
    }

    /// Key of a live node
    pub fn key(&self) -> Option<u128> {
        match self {
            Node::Inner(inner) => Some(inner.key),
            Node::Leaf(leaf) => Some(leaf.key.0),
            _ => None,
        }
    }

    /// The leaf, if this is one
    pub fn as_leaf(&self) -> Option<&LeafNode> {
        match self {
            Node::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
