use crate::hash::HashValue;
use crate::hasher::Hasher;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// The side a recorded sibling occupies relative to the path node.
///
/// `Left` means the sibling's digest is concatenated before the running
/// digest during validation; `Right` means after.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// One step of an existence proof: the digest of the sibling of a node on
/// the leaf-to-root path, or absent when that position holds no data.
pub struct Sibling<H: Hasher> {
    hash: Option<HashValue<H>>,
    side: Side,
}

impl<H: Hasher> Sibling<H> {
    pub fn new(side: Side, hash: Option<HashValue<H>>) -> Self {
        Self { hash, side }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn hash(&self) -> Option<&HashValue<H>> {
        self.hash.as_ref()
    }

    /// Folds the running digest one level upward.
    ///
    /// Mirrors the internal-node combination rule for the one-present cases,
    /// but diverges when both the sibling and the running digest are absent:
    /// the result is the digest of the empty byte sequence, where the tree
    /// itself would carry an absent digest. Kept as-is; it only surfaces for
    /// a proof over a fully empty tree.
    pub fn combined_hash(&self, current: Option<&HashValue<H>>) -> HashValue<H> {
        let bytes: Vec<u8> = match (self.side, self.hash.as_ref(), current) {
            (_, None, None) => Vec::new(),
            (_, Some(lone), None) | (_, None, Some(lone)) => lone.as_bytes().to_vec(),
            (Side::Left, Some(sibling), Some(current)) => sibling.concat(Some(current)),
            (Side::Right, Some(sibling), Some(current)) => current.concat(Some(sibling)),
        };
        HashValue::from_data(bytes)
    }
}

/// A compact proof that a leaf digest is a member of the tree committed to
/// by some root digest.
///
/// The proof is an ordered list of sibling records, leaf-to-root. It is a
/// snapshot of digests: it stays valid against the root it was built from
/// even after the originating tree mutates further, and holds no reference
/// back into the tree.
pub struct ExistenceProof<H: Hasher> {
    siblings: Vec<Sibling<H>>,
}

impl<H: Hasher> ExistenceProof<H> {
    pub(crate) fn new() -> Self {
        Self {
            siblings: Vec::new(),
        }
    }

    /// Reassembles a proof from its wire shape: ordered (digest, side)
    /// pairs, leaf-to-root.
    pub fn from_siblings(siblings: Vec<Sibling<H>>) -> Self {
        Self { siblings }
    }

    pub fn siblings(&self) -> &[Sibling<H>] {
        &self.siblings
    }

    pub(crate) fn push(&mut self, side: Side, hash: Option<HashValue<H>>) {
        self.siblings.push(Sibling::new(side, hash));
    }

    /// Checks that `target` is a member of the tree whose root digest is
    /// `root`, by re-deriving a root from the recorded siblings alone.
    ///
    /// Pure with respect to the tree: the fold never consults tree state.
    pub fn validate(&self, target: &HashValue<H>, root: &HashValue<H>) -> bool {
        let mut current = target.clone();
        for sibling in &self.siblings {
            current = sibling.combined_hash(Some(&current));
        }
        current.to_hex() == root.to_hex()
    }
}

impl<H: Hasher> Clone for Sibling<H> {
    fn clone(&self) -> Self {
        Self {
            hash: self.hash.clone(),
            side: self.side,
        }
    }
}

impl<H: Hasher> Clone for ExistenceProof<H> {
    fn clone(&self) -> Self {
        Self {
            siblings: self.siblings.clone(),
        }
    }
}

impl<H: Hasher> fmt::Debug for Sibling<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sibling")
            .field("side", &self.side)
            .field("hash", &self.hash.as_ref().map(HashValue::to_hex))
            .finish()
    }
}

impl<H: Hasher> fmt::Debug for ExistenceProof<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let siblings = self
            .siblings
            .iter()
            .map(|sibling| format!("{:?}", sibling))
            .collect::<Vec<String>>();
        f.debug_struct("ExistenceProof")
            .field("siblings", &format!("[{}]", siblings.join(", ")))
            .finish()
    }
}
