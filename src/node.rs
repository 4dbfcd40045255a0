use crate::hash::HashValue;
use crate::hasher::Hasher;
use core::fmt;

/// Common capability of every tree node: it may carry a digest.
///
/// An absent digest means the position holds no data: an internal node whose
/// whole subtree is empty. Leaves always carry a digest; an empty leaf slot
/// is modeled by the tree as the absence of a leaf node altogether.
pub trait MerkleNode<H: Hasher> {
    fn hash(&self) -> Option<&HashValue<H>>;
}

/// A level-0 node digesting one application data item.
///
/// The node keeps only the digest, never the source data. It is created once
/// and immutable afterward; updating a leaf replaces the whole node.
pub struct LeafNode<H: Hasher> {
    hash: HashValue<H>,
}

impl<H: Hasher> LeafNode<H> {
    /// Creates a leaf by digesting an in-memory byte sequence.
    pub fn from_data(data: impl AsRef<[u8]>) -> Self {
        Self {
            hash: HashValue::from_data(data),
        }
    }

    /// Creates a leaf by digesting a readable byte stream to end-of-stream.
    #[cfg(feature = "std")]
    pub fn from_stream<R: std::io::Read>(stream: &mut R) -> std::io::Result<Self> {
        Ok(Self {
            hash: HashValue::from_stream(stream)?,
        })
    }

    /// Wraps a digest computed out-of-band.
    pub fn from_hash(hash: HashValue<H>) -> Self {
        Self { hash }
    }

    pub fn hash(&self) -> &HashValue<H> {
        &self.hash
    }
}

impl<H: Hasher> MerkleNode<H> for LeafNode<H> {
    fn hash(&self) -> Option<&HashValue<H>> {
        Some(&self.hash)
    }
}

/// A non-leaf node. Its digest is a function of its (up to two) children:
///
/// - two children: `H(left.digest ++ right.digest)`
/// - one child (either side): `H(child.digest)`
/// - no children: absent
///
/// The node itself is stable for the lifetime of its tree position; mutation
/// replaces the digest via [`update`](InternalNode::update), recomputing it
/// from scratch rather than patching it.
pub struct InternalNode<H: Hasher> {
    hash: Option<HashValue<H>>,
}

impl<H: Hasher> InternalNode<H> {
    pub fn from_children(left: Option<&HashValue<H>>, right: Option<&HashValue<H>>) -> Self {
        Self {
            hash: Self::combine(left, right),
        }
    }

    /// Recomputes this node's digest from the current state of its children.
    pub fn update(&mut self, left: Option<&HashValue<H>>, right: Option<&HashValue<H>>) {
        self.hash = Self::combine(left, right);
    }

    fn combine(
        left: Option<&HashValue<H>>,
        right: Option<&HashValue<H>>,
    ) -> Option<HashValue<H>> {
        match (left, right) {
            (None, None) => None,
            // A lone child is treated as the left child regardless of the
            // side it actually occupies.
            (Some(child), None) | (None, Some(child)) => {
                Some(HashValue::from_data(child.as_bytes()))
            }
            (Some(left), Some(right)) => Some(HashValue::from_data(left.concat(Some(right)))),
        }
    }
}

impl<H: Hasher> MerkleNode<H> for InternalNode<H> {
    fn hash(&self) -> Option<&HashValue<H>> {
        self.hash.as_ref()
    }
}

impl<H: Hasher> fmt::Debug for LeafNode<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LeafNode").field(&self.hash.to_hex()).finish()
    }
}

impl<H: Hasher> fmt::Debug for InternalNode<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("InternalNode")
            .field(&self.hash.as_ref().map(HashValue::to_hex))
            .finish()
    }
}
