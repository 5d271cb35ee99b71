//! `FixedHasher` gives the same result for the same input on every run.
//! `NoOpHasher` forwards an already computed `u64`, as `TypeId` writes.

use core::hash::{BuildHasher, Hasher};

use foldhash::fast::{FixedState, FoldHasher};

// -----------------------------------------------------------------------------
// FixedHasher

const FIXED_HASH_STATE: FixedState = FixedState::with_seed(0x6C75_6D65_6E5F_7274);

/// Hasher produced by [`FixedHashState`].
pub type FixedHasher = FoldHasher<'static>;

/// Deterministic [`BuildHasher`] with a compile-time seed.
///
/// # Examples
///
/// ```
/// use core::hash::BuildHasher;
/// use lumen_utils::hash::FixedHashState;
///
/// let a = FixedHashState.hash_one("lumen::Object");
/// let b = FixedHashState.hash_one("lumen::Object");
/// assert_eq!(a, b);
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FixedHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        FIXED_HASH_STATE.build_hasher()
    }
}

// -----------------------------------------------------------------------------
// NoOpHasher

/// Hasher that keeps the last `u64` written to it.
///
/// Byte writes are read as little-endian words and folded together, which is
/// only meant as a fallback for keys that do not write a single `u64`.
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHasher {
    hash: u64,
}

impl Hasher for NoOpHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.hash
    }

    fn write(&mut self, bytes: &[u8]) {
        for chunk in bytes.chunks(8) {
            let mut word = [0_u8; 8];
            word[..chunk.len()].copy_from_slice(chunk);
            self.hash = self.hash.rotate_left(5) ^ u64::from_le_bytes(word);
        }
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.hash = i;
    }
}

/// [`BuildHasher`] for keys that are already well distributed, such as `TypeId`.
///
/// ```
/// use core::hash::{BuildHasher, Hash, Hasher};
/// use lumen_utils::hash::NoOpHashState;
///
/// let mut hasher = NoOpHashState.build_hasher();
/// 42_u64.hash(&mut hasher);
/// assert_eq!(hasher.finish(), 42);
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHashState;

impl BuildHasher for NoOpHashState {
    type Hasher = NoOpHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        NoOpHasher { hash: 0 }
    }
}

#[cfg(test)]
mod tests {
    use core::any::TypeId;
    use core::hash::{BuildHasher, Hasher};

    use super::{FixedHashState, NoOpHashState};

    #[test]
    fn no_op_keeps_words() {
        let mut hasher = NoOpHashState.build_hasher();
        hasher.write_u64(7);
        assert_eq!(hasher.finish(), 7);

        let mut hasher = NoOpHashState.build_hasher();
        hasher.write(&[1, 0, 0, 0]);
        assert_eq!(hasher.finish(), 1);

        let a = NoOpHashState.hash_one(TypeId::of::<u8>());
        let b = NoOpHashState.hash_one(TypeId::of::<u16>());
        assert_ne!(a, b);
    }

    #[test]
    fn fixed_state_ignores_the_instance() {
        let a = FixedHashState.hash_one("Count");
        let b = FixedHashState.hash_one("Count");
        assert_eq!(a, b);
        assert_ne!(a, FixedHashState.hash_one("Name"));
    }
}
