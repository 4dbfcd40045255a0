use crate::hasher::{Hasher, Output};
use generic_array::typenum;
use sha2::Digest as DigestImpl;
use sha2::Sha256 as Sha256Impl;
use sha2::Sha512_256 as Sha512_256Impl;

/// SHA-256 hashing capability.
pub struct Sha256 {
    internal: Sha256Impl,
}

impl Hasher for Sha256 {
    type OutputSize = typenum::U32;

    fn new() -> Self {
        Self {
            internal: Sha256Impl::new(),
        }
    }

    fn update(&mut self, input: impl AsRef<[u8]>) {
        DigestImpl::update(&mut self.internal, input.as_ref());
    }

    fn finalize(self) -> Output<Self> {
        self.internal.finalize()
    }
}

/// SHA-512/256 hashing capability. Same 256-bit output width as [`Sha256`],
/// different digests for the same input.
pub struct Sha512_256 {
    internal: Sha512_256Impl,
}

impl Hasher for Sha512_256 {
    type OutputSize = typenum::U32;

    fn new() -> Self {
        Self {
            internal: Sha512_256Impl::new(),
        }
    }

    fn update(&mut self, input: impl AsRef<[u8]>) {
        DigestImpl::update(&mut self.internal, input.as_ref());
    }

    fn finalize(self) -> Output<Self> {
        self.internal.finalize()
    }
}
