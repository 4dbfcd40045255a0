#![cfg_attr(not(feature = "std"), no_std)]

#[cfg_attr(test, macro_use)]
extern crate alloc;

mod hash;
mod hasher;
mod merkle_tree;
mod node;
mod proof;
pub mod sha;

pub use hash::{HashValue, HashValueError};
pub use hasher::{Hasher, Output};
pub use merkle_tree::{MerkleTree, MerkleTreeError};
pub use node::{InternalNode, LeafNode, MerkleNode};
pub use proof::{ExistenceProof, Sibling, Side};
