//! Test-only encoder for order book accounts.
//!
//! Builds well-formed crit-bit slabs from a list of orders, with optional
//! free slots and arbitrary placement of nodes in the arena, so tests can
//! start from a valid account and corrupt exactly one thing.

#![allow(dead_code)]

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serum_slab::{OrderKey, Side};

/// Account header width (magic + flags)
pub const ACCOUNT_HEADER_LEN: usize = 13;

/// Slab header width
pub const SLAB_HEADER_LEN: usize = 32;

/// Node slot width
pub const NODE_SIZE: usize = 72;

/// Byte offset of slot `index` inside a full account buffer
pub fn slot_offset(index: u32) -> usize {
    ACCOUNT_HEADER_LEN + SLAB_HEADER_LEN + index as usize * NODE_SIZE
}

/// Byte offsets of the slab counters inside a full account buffer
pub mod counter {
    pub const BUMP_INDEX: usize = 13;
    pub const FREE_LIST_LEN: usize = 21;
    pub const FREE_LIST_HEAD: usize = 29;
    pub const ROOT: usize = 33;
    pub const LEAF_COUNT: usize = 37;
}

/// Overwrite a little-endian `u32` at `offset`
pub fn put_u32(bytes: &mut [u8], offset: usize, value: u32) {
    bytes[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

/// Overwrite a little-endian `u64` at `offset`
pub fn put_u64(bytes: &mut [u8], offset: usize, value: u64) {
    bytes[offset..offset + 8].copy_from_slice(&value.to_le_bytes());
}

/// One order to place in a fixture slab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixtureOrder {
    pub price: u64,
    pub seq: u64,
    pub quantity: u64,
    pub owner: [u8; 32],
    pub client_order_id: u64,
}

/// A slot before placement: children and free links are logical indices
#[derive(Debug, Clone, Copy)]
enum Logical {
    Inner { prefix_len: u32, key: u128, children: [usize; 2] },
    Leaf { key: u128, order: FixtureOrder },
    Free,
}

/// Builder for a complete bids or asks account.
#[derive(Debug, Clone)]
pub struct SlabFixture {
    side: Side,
    orders: Vec<FixtureOrder>,
    free_slots: usize,
    placement: Placement,
}

#[derive(Debug, Clone)]
enum Placement {
    /// Live nodes first, then the free chain
    Packed,
    /// Seeded random permutation of all slots
    Shuffled(u64),
    /// Explicit physical slot for every logical slot
    Explicit(Vec<u32>),
}

/// An encoded account plus where things ended up
#[derive(Debug, Clone)]
pub struct Encoded {
    pub bytes: Vec<u8>,
    pub root: u32,
    pub leaves: Vec<u32>,
    pub inners: Vec<u32>,
    pub free_chain: Vec<u32>,
}

impl SlabFixture {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            orders: Vec::new(),
            free_slots: 0,
            placement: Placement::Packed,
        }
    }

    /// Add an order owned by `[1; 32]`
    pub fn order(self, price: u64, seq: u64, quantity: u64) -> Self {
        self.owned_order(price, seq, quantity, [1; 32])
    }

    pub fn owned_order(mut self, price: u64, seq: u64, quantity: u64, owner: [u8; 32]) -> Self {
        self.orders.push(FixtureOrder {
            price,
            seq,
            quantity,
            owner,
            client_order_id: seq,
        });
        self
    }

    pub fn orders(mut self, orders: impl IntoIterator<Item = FixtureOrder>) -> Self {
        self.orders.extend(orders);
        self
    }

    pub fn free_slots(mut self, count: usize) -> Self {
        self.free_slots = count;
        self
    }

    pub fn shuffled(mut self, seed: u64) -> Self {
        self.placement = Placement::Shuffled(seed);
        self
    }

    /// Physical slot per logical slot: live nodes in build order
    /// (root first, pre-order), then the free chain in chain order
    pub fn placed(mut self, slots: Vec<u32>) -> Self {
        self.placement = Placement::Explicit(slots);
        self
    }

    pub fn live_slots(&self) -> usize {
        match self.orders.len() {
            0 => 0,
            n => 2 * n - 1,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        self.encode_with_layout().bytes
    }

    pub fn encode_with_layout(&self) -> Encoded {
        let mut leaves: Vec<(u128, FixtureOrder)> = self
            .orders
            .iter()
            .map(|o| (OrderKey::new(self.side, o.price, o.seq).0, *o))
            .collect();
        leaves.sort_by_key(|(key, _)| *key);
        leaves.dedup_by_key(|(key, _)| *key);

        let mut logical = Vec::new();
        if !leaves.is_empty() {
            build(&leaves, &mut logical);
        }
        let free_start = logical.len();
        logical.extend(std::iter::repeat(Logical::Free).take(self.free_slots));

        let total = logical.len();
        let perm: Vec<u32> = match &self.placement {
            Placement::Packed => (0..total as u32).collect(),
            Placement::Shuffled(seed) => {
                let mut perm: Vec<u32> = (0..total as u32).collect();
                perm.shuffle(&mut ChaCha8Rng::seed_from_u64(*seed));
                perm
            }
            Placement::Explicit(slots) => {
                assert_eq!(slots.len(), total, "placement must cover every slot");
                slots.clone()
            }
        };

        let flags: u64 = match self.side {
            Side::Bid => 0x21,
            Side::Ask => 0x41,
        };
        let root = if leaves.is_empty() { 0 } else { perm[0] };
        let head = if self.free_slots == 0 { 0 } else { perm[free_start] };

        let mut bytes = Vec::with_capacity(slot_offset(total as u32) + 7);
        bytes.extend_from_slice(b"serum");
        bytes.extend_from_slice(&flags.to_le_bytes());
        bytes.extend_from_slice(&(total as u64).to_le_bytes());
        bytes.extend_from_slice(&(self.free_slots as u64).to_le_bytes());
        bytes.extend_from_slice(&head.to_le_bytes());
        bytes.extend_from_slice(&root.to_le_bytes());
        bytes.extend_from_slice(&(leaves.len() as u64).to_le_bytes());
        bytes.resize(slot_offset(total as u32), 0);
        bytes.extend_from_slice(b"padding");

        let mut encoded = Encoded {
            bytes,
            root,
            leaves: Vec::new(),
            inners: Vec::new(),
            free_chain: Vec::new(),
        };

        for (index, node) in logical.iter().enumerate() {
            let physical = perm[index];
            let at = slot_offset(physical);
            let slot = &mut encoded.bytes[at..at + NODE_SIZE];

            match *node {
                Logical::Inner { prefix_len, key, children } => {
                    slot[..4].copy_from_slice(&1u32.to_le_bytes());
                    slot[4..8].copy_from_slice(&prefix_len.to_le_bytes());
                    slot[8..24].copy_from_slice(&key.to_le_bytes());
                    slot[24..28].copy_from_slice(&perm[children[0]].to_le_bytes());
                    slot[28..32].copy_from_slice(&perm[children[1]].to_le_bytes());
                    encoded.inners.push(physical);
                }
                Logical::Leaf { key, order } => {
                    slot[..4].copy_from_slice(&2u32.to_le_bytes());
                    slot[4] = (index % 128) as u8;
                    slot[8..24].copy_from_slice(&key.to_le_bytes());
                    slot[24..56].copy_from_slice(&order.owner);
                    slot[56..64].copy_from_slice(&order.quantity.to_le_bytes());
                    slot[64..72].copy_from_slice(&order.client_order_id.to_le_bytes());
                    encoded.leaves.push(physical);
                }
                Logical::Free => {
                    let last = index + 1 == total;
                    if last {
                        slot[..4].copy_from_slice(&4u32.to_le_bytes());
                    } else {
                        slot[..4].copy_from_slice(&3u32.to_le_bytes());
                        slot[4..8].copy_from_slice(&perm[index + 1].to_le_bytes());
                    }
                    encoded.free_chain.push(physical);
                }
            }
        }

        encoded
    }
}

/// Lay out the subtree for sorted distinct `leaves` in pre-order
fn build(leaves: &[(u128, FixtureOrder)], logical: &mut Vec<Logical>) -> usize {
    let index = logical.len();

    if let [(key, order)] = leaves {
        logical.push(Logical::Leaf { key: *key, order: *order });
        return index;
    }

    let low = leaves[0].0;
    let high = leaves[leaves.len() - 1].0;
    let prefix_len = (low ^ high).leading_zeros();
    let mask = (1u128 << 127) >> prefix_len;
    let split = leaves.partition_point(|(key, _)| key & mask == 0);

    logical.push(Logical::Free);
    let left = build(&leaves[..split], logical);
    let right = build(&leaves[split..], logical);
    logical[index] = Logical::Inner { prefix_len, key: low, children: [left, right] };
    index
}

/// Orders with distinct (price, seq) pairs drawn from a seeded RNG
pub fn random_orders(seed: u64, count: usize) -> Vec<FixtureOrder> {
    use rand::Rng;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count as u64)
        .map(|seq| FixtureOrder {
            price: rng.gen_range(90..110),
            seq: seq + 1,
            quantity: rng.gen_range(1..1_000),
            owner: [rng.gen_range(1..4); 32],
            client_order_id: rng.gen(),
        })
        .collect()
}

/// The layout of the reference dump: 141 slots, 32 leaves, 31 inner
/// nodes, 78 free slots with the chain starting at slot 56
pub fn reference_fixture(side: Side) -> SlabFixture {
    let placement: Vec<u32> = (0..56).chain(57..64).chain([56]).chain(64..141).collect();
    SlabFixture::new(side)
        .orders(random_orders(7, 32))
        .free_slots(78)
        .placed(placement)
}
