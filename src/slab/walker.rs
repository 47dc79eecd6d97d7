//! Bounded traversal of the slab's tree and free list.
//!
//! Input is untrusted, so every walk uses an explicit stack and a visited
//! set sized by `bump_index`: each slot can be entered at most once, which
//! bounds the work by the allocation count and turns cycles or shared
//! subtrees into `CorruptTree` instead of a hang or a stack overflow.
//!
//! The tree walk also checks crit-bit consistency. Every key below an
//! inner node must share its `prefix_len` leading bits and must have the
//! critical bit equal to the branch it hangs from.

use crate::error::{DecodeError, Result};
use crate::slab::arena::Slab;
use crate::slab::node::{InnerNode, LeafNode, Node, SlotIndex};
use crate::types::OrderKey;

impl Slab {
    /// Root of the tree, `None` when the slab holds no leaves.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRoot` if the stored root is outside the allocated
    /// range or names a free or uninitialized slot.
    pub fn root(&self) -> Result<Option<SlotIndex>> {
        if self.leaf_count() == 0 {
            return Ok(None);
        }

        let root = self.header().root;
        match self.node(SlotIndex(root)) {
            None => Err(DecodeError::InvalidRoot { root, reason: "outside allocated range" }),
            Some(Node::Free { .. } | Node::LastFree) => {
                Err(DecodeError::InvalidRoot { root, reason: "points at a free slot" })
            }
            Some(Node::Uninitialized) => {
                Err(DecodeError::InvalidRoot { root, reason: "points at an uninitialized slot" })
            }
            Some(Node::Inner(_) | Node::Leaf(_)) => Ok(Some(SlotIndex(root))),
        }
    }

    /// Slot lookup that reports an out-of-range index as an error
    fn slot(&self, parent: SlotIndex, index: SlotIndex) -> Result<&Node> {
        self.node(index).ok_or(DecodeError::InvalidChildIndex {
            slot: parent.get(),
            child: index.get(),
            bump_index: self.bump_index(),
        })
    }

    /// Collect every leaf reachable from the root, in pre-order.
    ///
    /// Children are visited low branch first, so the leaves come out in
    /// ascending key order. Callers that need price priority should still
    /// sort; the order here is a property of the tree, not of the book.
    ///
    /// # Errors
    ///
    /// - `InvalidRoot` from [`Slab::root`]
    /// - `InvalidChildIndex` for an out-of-range child
    /// - `CorruptTree` for a revisited slot, a free or uninitialized slot
    ///   under an inner node, inconsistent crit-bit keys, or a leaf count
    ///   that differs from the header
    pub fn walk(&self) -> Result<Vec<&LeafNode>> {
        let Some(root) = self.root()? else {
            return Ok(Vec::new());
        };

        let mut visited = vec![false; self.bump_index() as usize];
        let mut leaves = Vec::with_capacity(self.leaf_count() as usize);
        let mut stack: Vec<(SlotIndex, SlotIndex, Option<(&InnerNode, usize)>)> =
            vec![(root, root, None)];

        while let Some((parent, index, edge)) = stack.pop() {
            let node = self.slot(parent, index)?;

            if std::mem::replace(&mut visited[index.as_usize()], true) {
                return Err(corrupt(index, "slot reachable more than once"));
            }

            let key = match node {
                Node::Inner(inner) if inner.crit_bit_mask().is_none() => {
                    return Err(corrupt(index, "prefix length leaves no critical bit"));
                }
                Node::Inner(inner) => inner.key,
                Node::Leaf(leaf) => leaf.key.0,
                Node::Free { .. } | Node::LastFree => {
                    return Err(corrupt(index, "free slot reachable from root"));
                }
                Node::Uninitialized => {
                    return Err(corrupt(index, "uninitialized slot reachable from root"));
                }
            };

            if let Some((above, branch)) = edge {
                if !above.shares_prefix(key) || above.branch(key) != Some(branch) {
                    return Err(corrupt(index, "key does not match parent prefix"));
                }
                if let Node::Inner(inner) = node {
                    if inner.prefix_len <= above.prefix_len {
                        return Err(corrupt(index, "prefix length does not grow with depth"));
                    }
                }
            }

            match node {
                Node::Inner(inner) => {
                    stack.push((index, inner.children[1], Some((inner, 1))));
                    stack.push((index, inner.children[0], Some((inner, 0))));
                }
                Node::Leaf(leaf) => leaves.push(leaf),
                _ => {}
            }
        }

        if leaves.len() != self.leaf_count() as usize {
            return Err(corrupt(root, "reachable leaves differ from leaf count"));
        }

        Ok(leaves)
    }

    /// Walk the free list from its head.
    ///
    /// The chain must visit exactly `free_list_len` distinct slots, every
    /// one tagged Free except the last, which must be LastFree.
    ///
    /// # Errors
    ///
    /// Returns `CorruptFreeList` for an out-of-range link, a repeated slot,
    /// a live slot on the chain, or a chain whose length disagrees with
    /// the header.
    pub fn free_list(&self) -> Result<Vec<SlotIndex>> {
        let len = self.free_list_len();
        let mut slots = Vec::with_capacity(len as usize);
        if len == 0 {
            return Ok(slots);
        }

        let mut visited = vec![false; self.bump_index() as usize];
        let mut current = SlotIndex(self.free_list_head());

        for remaining in (1..=len).rev() {
            let Some(node) = self.node(current) else {
                return Err(corrupt_free(current, "link outside allocated range"));
            };
            if std::mem::replace(&mut visited[current.as_usize()], true) {
                return Err(corrupt_free(current, "slot visited twice"));
            }
            slots.push(current);

            match (node, remaining) {
                (Node::LastFree, 1) => {}
                (Node::Free { next }, r) if r > 1 => current = *next,
                (Node::LastFree, _) => {
                    return Err(corrupt_free(current, "chain ends before free list length"));
                }
                (Node::Free { .. }, _) => {
                    return Err(corrupt_free(current, "chain continues past free list length"));
                }
                _ => return Err(corrupt_free(current, "non-free slot on free list")),
            }
        }

        Ok(slots)
    }

    /// Full structural check: free list, tree, and slot accounting.
    ///
    /// On success every allocated slot is accounted for exactly once:
    /// `bump_index == leaves + inner + free`, with no uninitialized slot
    /// below `bump_index`. Returns the leaves in tree order.
    pub fn validate(&self) -> Result<Vec<&LeafNode>> {
        let free = self.free_list()?;
        let leaves = self.walk()?;
        let census = self.census();

        if let Some(slot) = self.nodes().iter().position(|n| matches!(n, Node::Uninitialized)) {
            return Err(corrupt(SlotIndex(slot as u32), "uninitialized slot below bump index"));
        }
        if census.free_total() as usize != free.len() {
            return Err(corrupt_free(
                SlotIndex(self.free_list_head()),
                "free-tagged slots missing from free list",
            ));
        }

        let expected_inner = self.leaf_count().saturating_sub(1);
        if census.leaf != self.leaf_count() || census.inner != expected_inner {
            return Err(corrupt(
                SlotIndex(self.header().root),
                "live slots unreachable from root",
            ));
        }

        debug_assert_eq!(census.total(), self.bump_index());
        Ok(leaves)
    }

    /// Follow critical bits from the root, `choose` picking the branch.
    fn descend(
        &self,
        mut choose: impl FnMut(&InnerNode) -> Option<usize>,
    ) -> Result<Option<&LeafNode>> {
        let Some(mut index) = self.root()? else {
            return Ok(None);
        };
        let mut parent = index;

        // A valid path is at most bump_index slots long
        for _ in 0..self.bump_index() {
            match self.slot(parent, index)? {
                Node::Leaf(leaf) => return Ok(Some(leaf)),
                Node::Inner(inner) => {
                    let Some(branch) = choose(inner) else {
                        return Ok(None);
                    };
                    parent = index;
                    index = inner.children[branch];
                }
                _ => return Err(corrupt(index, "free or uninitialized slot reachable from root")),
            }
        }

        Err(corrupt(index, "descent longer than bump index"))
    }

    /// Find the leaf with exactly `key`, using only critical bits to steer.
    pub fn find(&self, key: OrderKey) -> Result<Option<&LeafNode>> {
        let leaf = self.descend(|inner| {
            if inner.shares_prefix(key.0) {
                inner.branch(key.0)
            } else {
                None
            }
        })?;
        Ok(leaf.filter(|leaf| leaf.key == key))
    }

    /// Leaf with the smallest key (best ask on an ask slab)
    pub fn find_min(&self) -> Result<Option<&LeafNode>> {
        self.descend(|_| Some(0))
    }

    /// Leaf with the largest key (best bid on a bid slab)
    pub fn find_max(&self) -> Result<Option<&LeafNode>> {
        self.descend(|_| Some(1))
    }
}

fn corrupt(slot: SlotIndex, reason: &'static str) -> DecodeError {
    DecodeError::CorruptTree { slot: slot.get(), reason }
}

fn corrupt_free(slot: SlotIndex, reason: &'static str) -> DecodeError {
    DecodeError::CorruptFreeList { slot: slot.get(), reason }
}

// ============================================================================
// Unit Tests
// ============================================================================
