use crate::hash::HashValue;
use crate::hasher::Hasher;
use crate::node::{InternalNode, LeafNode, MerkleNode};
use crate::proof::{ExistenceProof, Side};
use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;
use hashbrown::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MerkleTreeError {
    #[display(fmt = "no leaf with digest {} is present in the tree", _0)]
    NotFound(String),

    #[display(fmt = "position {} holds no leaf", _0)]
    NotOccupied(usize),

    #[display(fmt = "position {} is out of range for {} leaf slots", _0, _1)]
    OutOfRange(usize, usize),
}

/// A dynamically mutable binary Merkle tree.
///
/// Leaves can be added, updated in place, and removed. A removed leaf (or a
/// leaf added as an explicit empty slot) leaves a hole in the bottom level
/// rather than compacting it: compaction would reparent a large share of the
/// surviving leaves and force their ancestor digests to be recomputed. Holes
/// are queued and handed back out to later insertions instead.
///
/// Storage is one owned array per level. `leaves` is level 0; `levels[k]`
/// holds internal level `k + 1`, sized `ceil(len(below) / 2)`, and the last
/// level always holds the single root node. All cross-level addressing is
/// index arithmetic: the parent of position `i` is `i / 2`, the children of
/// position `p` are `2p` and `2p + 1`. Every mutation recomputes digests
/// along the one path from the touched leaf to the root and nothing else.
///
/// The tree is single-owner: it is neither `Sync` nor intended for shared
/// mutation. Proofs built from it are detached snapshots.
pub struct MerkleTree<H: Hasher> {
    /// Level 0. `None` marks an empty slot.
    leaves: Vec<Option<LeafNode<H>>>,
    /// Internal levels, bottom-up; `levels[k]` is level `k + 1`.
    levels: Vec<Vec<InternalNode<H>>>,
    /// Digest of each occupied leaf, to its level-0 position. On digest
    /// collision the most recent insertion wins and the earlier leaf becomes
    /// unaddressable by digest, though it still contributes to the root.
    leaf_positions: HashMap<HashValue<H>, usize>,
    /// Level-0 positions currently holding no leaf, reused FIFO.
    empty_slots: VecDeque<usize>,
}

impl<H: Hasher> MerkleTree<H> {
    pub fn new() -> Self {
        Self {
            leaves: Vec::new(),
            levels: Vec::new(),
            leaf_positions: HashMap::new(),
            empty_slots: VecDeque::new(),
        }
    }

    /// Adds a leaf, or an explicit empty slot when `leaf` is `None`, and
    /// returns the level-0 position used. An empty slot from an earlier
    /// removal is reused before the bottom level grows.
    pub fn add_leaf(&mut self, leaf: Option<LeafNode<H>>) -> usize {
        let index = self
            .empty_slots
            .pop_front()
            .unwrap_or(self.leaves.len());

        match &leaf {
            Some(leaf) => {
                self.leaf_positions.insert(leaf.hash().clone(), index);
            }
            None => self.empty_slots.push_back(index),
        }

        if index == self.leaves.len() {
            self.leaves.push(leaf);
            self.propagate_creation(index);
        } else {
            self.leaves[index] = leaf;
            self.propagate_update(1, index / 2);
        }

        index
    }

    /// Replaces the leaf currently addressed by `hash` and re-digests its
    /// ancestors. The stale digest is dropped from the position index before
    /// the new one is recorded. Returns the position that was updated.
    pub fn update_leaf(
        &mut self,
        hash: &HashValue<H>,
        new_leaf: LeafNode<H>,
    ) -> Result<usize, MerkleTreeError> {
        let index = *self
            .leaf_positions
            .get(hash)
            .ok_or_else(|| MerkleTreeError::NotFound(hash.to_hex()))?;
        self.leaf_positions.remove(hash);
        self.update_leaf_at(index, new_leaf)?;
        Ok(index)
    }

    /// Replaces the leaf at `index` and re-digests its ancestors.
    pub fn update_leaf_at(
        &mut self,
        index: usize,
        new_leaf: LeafNode<H>,
    ) -> Result<(), MerkleTreeError> {
        if index >= self.leaves.len() {
            return Err(MerkleTreeError::OutOfRange(index, self.leaves.len()));
        }
        self.leaf_positions.insert(new_leaf.hash().clone(), index);
        self.leaves[index] = Some(new_leaf);
        self.propagate_update(1, index / 2);
        Ok(())
    }

    /// Removes the leaf currently addressed by `hash`, marks its slot empty
    /// for reuse, and re-digests its ancestors. Returns the freed position.
    pub fn remove_leaf(&mut self, hash: &HashValue<H>) -> Result<usize, MerkleTreeError> {
        let index = *self
            .leaf_positions
            .get(hash)
            .ok_or_else(|| MerkleTreeError::NotFound(hash.to_hex()))?;
        self.remove_leaf_at(index)?;
        Ok(index)
    }

    /// Removes the leaf at `index`, marks the slot empty for reuse, and
    /// re-digests its ancestors.
    pub fn remove_leaf_at(&mut self, index: usize) -> Result<(), MerkleTreeError> {
        let slot = self
            .leaves
            .get(index)
            .ok_or(MerkleTreeError::OutOfRange(index, self.leaves.len()))?;
        let hash = slot
            .as_ref()
            .ok_or(MerkleTreeError::NotOccupied(index))?
            .hash()
            .clone();

        self.leaf_positions.remove(&hash);
        self.leaves[index] = None;
        self.empty_slots.push_back(index);
        self.propagate_update(1, index / 2);
        Ok(())
    }

    /// The root node, or `None` while the tree has never held a leaf slot.
    ///
    /// The root node always exists once anything was added, but its digest
    /// is absent if every slot is empty.
    pub fn root(&self) -> Option<&InternalNode<H>> {
        self.levels.last().and_then(|level| level.first())
    }

    /// The root digest, when the tree holds at least one occupied leaf.
    pub fn root_hash(&self) -> Option<&HashValue<H>> {
        self.root().and_then(MerkleNode::hash)
    }

    /// Builds a proof that the leaf addressed by `leaf_hash` is a member of
    /// the tree as it stands right now. Returns `None` when no occupied
    /// leaf carries that digest.
    ///
    /// The walk records, per level, the digest of the path node's sibling:
    /// an even position pairs with the slot to its right, an odd one with
    /// the slot to its left. Sibling positions past the end of a level are
    /// recorded as absent.
    pub fn build_existence_proof(&self, leaf_hash: &HashValue<H>) -> Option<ExistenceProof<H>> {
        let mut index = *self.leaf_positions.get(leaf_hash)?;
        let mut proof = ExistenceProof::new();

        for level in 0..self.levels.len() {
            if index % 2 == 0 {
                proof.push(Side::Right, self.node_hash(level, index + 1));
            } else {
                proof.push(Side::Left, self.node_hash(level, index - 1));
            }
            index /= 2;
        }

        Some(proof)
    }

    /// Number of level-0 slots, occupied or empty.
    pub fn leaf_slots(&self) -> usize {
        self.leaves.len()
    }

    /// Number of currently occupied leaves.
    pub fn leaf_count(&self) -> usize {
        self.leaves.len() - self.empty_slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaf_count() == 0
    }

    /// Number of levels, counting level 0.
    pub fn height(&self) -> usize {
        if self.leaves.is_empty() {
            0
        } else {
            self.levels.len() + 1
        }
    }

    /// Walks upward from a freshly appended node at level-0 position
    /// `index`, creating the missing ancestors. Appending to the rightmost
    /// branch is the only way the tree gains nodes above level 0; a brand
    /// new top level (holding the new root) is added exactly when the
    /// current root gains a sibling subtree.
    fn propagate_creation(&mut self, index: usize) {
        let mut level = 0;
        let mut index = index;
        loop {
            let parent_level = level + 1;
            let parent_index = index / 2;

            let parent_exists = self
                .levels
                .get(parent_level - 1)
                .map_or(false, |nodes| parent_index < nodes.len());
            if parent_exists {
                self.propagate_update(parent_level, parent_index);
                return;
            }

            let left = self.child_hash(parent_level, 2 * parent_index);
            let right = self.child_hash(parent_level, 2 * parent_index + 1);
            let node = InternalNode::from_children(left.as_ref(), right.as_ref());

            if parent_level - 1 == self.levels.len() {
                // The parent level itself does not exist yet; its sole node
                // becomes the new root.
                self.levels.push(alloc::vec![node]);
                return;
            }

            self.levels[parent_level - 1].push(node);
            level = parent_level;
            index = parent_index;
        }
    }

    /// Recomputes internal digests from `index` at internal level `level`
    /// (1-based) up to and including the root. Each step re-derives the
    /// node's digest from both children rather than patching it.
    fn propagate_update(&mut self, level: usize, index: usize) {
        let mut level = level;
        let mut index = index;
        loop {
            let left = self.child_hash(level, 2 * index);
            let right = self.child_hash(level, 2 * index + 1);
            self.levels[level - 1][index].update(left.as_ref(), right.as_ref());

            if level == self.levels.len() {
                break;
            }
            index /= 2;
            level += 1;
        }
    }

    /// Digest of the child at `child_index` one level below internal level
    /// `parent_level`. Absent for out-of-range positions, empty leaf slots,
    /// and digest-less internal nodes.
    fn child_hash(&self, parent_level: usize, child_index: usize) -> Option<HashValue<H>> {
        if parent_level == 1 {
            self.leaves
                .get(child_index)?
                .as_ref()
                .map(|leaf| leaf.hash().clone())
        } else {
            self.levels
                .get(parent_level - 2)?
                .get(child_index)?
                .hash()
                .cloned()
        }
    }

    /// Digest at (`level`, `index`) with level 0 being the leaves.
    fn node_hash(&self, level: usize, index: usize) -> Option<HashValue<H>> {
        if level == 0 {
            self.leaves.get(index)?.as_ref().map(|leaf| leaf.hash().clone())
        } else {
            self.levels.get(level - 1)?.get(index)?.hash().cloned()
        }
    }
}

impl<H: Hasher> Default for MerkleTree<H> {
    fn default() -> Self {
        Self::new()
    }
}
