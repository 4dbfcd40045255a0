use crate::hasher::{Hasher, Output};
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// A fixed-width digest produced by the tree's hashing capability `H`.
///
/// The width is `H::output_bytes()` and is uniform for every `HashValue`
/// sharing the same capability. Values are immutable once constructed.
pub struct HashValue<H: Hasher> {
    bytes: Output<H>,
}

#[derive(Debug, Clone, PartialEq, derive_more::Display)]
pub enum HashValueError {
    #[display(fmt = "expected a digest of {} bytes, got {}", expected, actual)]
    InvalidLength { expected: usize, actual: usize },

    #[display(fmt = "{}", _0)]
    InvalidHex(hex::FromHexError),
}

impl From<hex::FromHexError> for HashValueError {
    fn from(err: hex::FromHexError) -> Self {
        HashValueError::InvalidHex(err)
    }
}

impl<H: Hasher> HashValue<H> {
    /// Digests an in-memory byte sequence.
    pub fn from_data(data: impl AsRef<[u8]>) -> Self {
        Self {
            bytes: H::hash(data),
        }
    }

    /// Digests a readable byte stream to end-of-stream.
    #[cfg(feature = "std")]
    pub fn from_stream<R: std::io::Read>(stream: &mut R) -> std::io::Result<Self> {
        Ok(Self {
            bytes: H::hash_stream(stream)?,
        })
    }

    /// Wraps an already-computed digest. Fails if `bytes` is not exactly the
    /// capability's output width.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HashValueError> {
        if bytes.len() != H::output_bytes() {
            return Err(HashValueError::InvalidLength {
                expected: H::output_bytes(),
                actual: bytes.len(),
            });
        }
        Ok(Self {
            bytes: Output::<H>::clone_from_slice(bytes),
        })
    }

    /// Parses the canonical lowercase hex form. Fails on invalid hex or on a
    /// decoded length other than the capability's output width.
    pub fn from_hex(hex: &str) -> Result<Self, HashValueError> {
        let bytes = hex::decode(hex)?;
        Self::from_bytes(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Canonical encoding: lowercase hex, two characters per digest byte.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Concatenates this digest with `other`, producing a buffer of one or
    /// two digest widths. An absent `other` contributes nothing.
    pub fn concat(&self, other: Option<&Self>) -> Vec<u8> {
        let mut result = Vec::with_capacity(2 * H::output_bytes());
        result.extend_from_slice(self.as_bytes());
        if let Some(other) = other {
            result.extend_from_slice(other.as_bytes());
        }
        result
    }
}

// `H` is only reached through its associated output type, so the usual
// derives would put unwanted bounds on `H` itself.
impl<H: Hasher> Clone for HashValue<H> {
    fn clone(&self) -> Self {
        Self {
            bytes: self.bytes.clone(),
        }
    }
}

impl<H: Hasher> PartialEq for HashValue<H> {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl<H: Hasher> Eq for HashValue<H> {}

impl<H: Hasher> core::hash::Hash for HashValue<H> {
    fn hash<S: core::hash::Hasher>(&self, state: &mut S) {
        self.as_bytes().hash(state);
    }
}

impl<H: Hasher> fmt::Display for HashValue<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl<H: Hasher> fmt::Debug for HashValue<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HashValue").field(&self.to_hex()).finish()
    }
}
