//! Test-only encoder for well-formed order book accounts.

use crate::slab::arena::NODE_SIZE;
use crate::slab::header::{MAGIC, TRAILER};
use crate::types::{OrderKey, Side};

/// One resting order to place in a test slab
#[derive(Debug, Clone, Copy)]
pub(crate) struct TestOrder {
    pub price: u64,
    pub seq: u64,
    pub quantity: u64,
    pub owner: u8,
}

pub(crate) fn order(price: u64, seq: u64, quantity: u64) -> TestOrder {
    TestOrder { price, seq, quantity, owner: 1 }
}

/// Encode a complete bids/asks account holding `orders`, with no free slots
pub(crate) fn book_account(side: Side, orders: &[TestOrder]) -> Vec<u8> {
    let mut leaves: Vec<(u128, TestOrder)> = orders
        .iter()
        .map(|o| (OrderKey::new(side, o.price, o.seq).0, *o))
        .collect();
    leaves.sort_by_key(|(key, _)| *key);

    let mut slots = Vec::new();
    let root = if leaves.is_empty() { 0 } else { build(&leaves, &mut slots) };

    let flags: u64 = match side {
        Side::Bid => 0x21,
        Side::Ask => 0x41,
    };

    let mut bytes = MAGIC.to_vec();
    bytes.extend_from_slice(&flags.to_le_bytes());
    bytes.extend_from_slice(&(slots.len() as u64).to_le_bytes());
    bytes.extend_from_slice(&0u64.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&root.to_le_bytes());
    bytes.extend_from_slice(&(leaves.len() as u64).to_le_bytes());
    for slot in &slots {
        bytes.extend_from_slice(slot);
    }
    bytes.extend_from_slice(&TRAILER);
    bytes
}

/// Allocate the subtree for sorted distinct `leaves`, returning its slot
fn build(leaves: &[(u128, TestOrder)], slots: &mut Vec<[u8; NODE_SIZE]>) -> u32 {
    let index = slots.len() as u32;
    slots.push([0u8; NODE_SIZE]);

    if let [(key, order)] = leaves {
        let slot = &mut slots[index as usize];
        slot[..4].copy_from_slice(&2u32.to_le_bytes());
        slot[8..24].copy_from_slice(&key.to_le_bytes());
        slot[24..56].copy_from_slice(&[order.owner; 32]);
        slot[56..64].copy_from_slice(&order.quantity.to_le_bytes());
        slot[64..72].copy_from_slice(&order.seq.to_le_bytes());
        return index;
    }

    let low = leaves[0].0;
    let high = leaves[leaves.len() - 1].0;
    let prefix_len = (low ^ high).leading_zeros();
    let mask = (1u128 << 127) >> prefix_len;
    let split = leaves.partition_point(|(key, _)| key & mask == 0);

    let left = build(&leaves[..split], slots);
    let right = build(&leaves[split..], slots);

    let slot = &mut slots[index as usize];
    slot[..4].copy_from_slice(&1u32.to_le_bytes());
    slot[4..8].copy_from_slice(&prefix_len.to_le_bytes());
    slot[8..24].copy_from_slice(&low.to_le_bytes());
    slot[24..28].copy_from_slice(&left.to_le_bytes());
    slot[28..32].copy_from_slice(&right.to_le_bytes());
    index
}
