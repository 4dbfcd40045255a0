use generic_array::{typenum::Unsigned, ArrayLength, GenericArray};

/// The raw digest buffer produced by a [`Hasher`].
pub type Output<H> = GenericArray<u8, <H as Hasher>::OutputSize>;

/// A hashing capability consumed by the tree.
///
/// Implementations wrap a concrete hash algorithm and expose it through the
/// incremental `new`/`update`/`finalize` primitives. The digest width is fixed
/// per implementation through `OutputSize`; all digests flowing through one
/// tree must come from the same implementation.
pub trait Hasher: Sized {
    type OutputSize: ArrayLength<u8>;

    fn new() -> Self;
    fn update(&mut self, input: impl AsRef<[u8]>);
    fn finalize(self) -> Output<Self>;

    /// Digests an in-memory byte sequence in one call.
    fn hash(data: impl AsRef<[u8]>) -> Output<Self> {
        let mut hasher = Self::new();
        hasher.update(data);
        hasher.finalize()
    }

    /// Digests a readable byte stream to end-of-stream.
    ///
    /// Read failures are propagated to the caller untouched; no partial
    /// digest is observable.
    #[cfg(feature = "std")]
    fn hash_stream<R: std::io::Read>(stream: &mut R) -> std::io::Result<Output<Self>> {
        let mut hasher = Self::new();
        let mut buffer = [0u8; 8192];
        loop {
            let read = stream.read(&mut buffer)?;
            if read == 0 {
                break;
            }
            hasher.update(&buffer[..read]);
        }
        Ok(hasher.finalize())
    }

    fn output_bytes() -> usize {
        Self::OutputSize::USIZE
    }

    fn output_bits() -> usize {
        Self::OutputSize::USIZE * 8
    }
}
