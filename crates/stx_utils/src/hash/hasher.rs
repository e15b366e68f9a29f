//! Hash states used by the `stx` maps.

use core::hash::{BuildHasher, Hasher};

use foldhash::fast::{FixedState, FoldHasher};

// -----------------------------------------------------------------------------
// FixedHashState

const SEED: u64 = 0x6A09_E667_F3BC_C908;

/// A [`foldhash`] hasher seeded with a constant.
pub type FixedHasher = FoldHasher<'static>;

/// Builds [`FixedHasher`]s that all start from the same seed.
///
/// Equal inputs hash equally across maps and runs, and the state can be
/// created in a `const` context, which the `static` registries need.
///
/// # Examples
///
/// ```
/// use core::hash::BuildHasher;
/// use stx_utils::hash::FixedHashState;
///
/// assert_eq!(FixedHashState.hash_one("void"), FixedHashState.hash_one("void"));
/// assert_ne!(FixedHashState.hash_one("void"), FixedHashState.hash_one("()"));
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FixedHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        FixedState::with_seed(SEED).build_hasher()
    }
}

// -----------------------------------------------------------------------------
// TypeIdHashState

/// Hashes a [`TypeId`](core::any::TypeId) key as the `u64` it writes.
///
/// A `TypeId` already is a hash of the type, so hashing it again only costs
/// time. Any other write is folded in through [`FixedHasher`].
#[derive(Copy, Clone, Default, Debug)]
pub struct TypeIdHasher(u64);

impl Hasher for TypeIdHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }

    #[inline]
    fn write_u64(&mut self, id: u64) {
        self.0 ^= id;
    }

    fn write(&mut self, bytes: &[u8]) {
        let mut hasher = FixedHashState.build_hasher();
        hasher.write_u64(self.0);
        hasher.write(bytes);
        self.0 = hasher.finish();
    }
}

/// Builds [`TypeIdHasher`]s.
///
/// # Examples
///
/// ```
/// use core::any::TypeId;
/// use core::hash::BuildHasher;
/// use stx_utils::hash::TypeIdHashState;
///
/// let a = TypeIdHashState.hash_one(TypeId::of::<u8>());
/// let b = TypeIdHashState.hash_one(TypeId::of::<u8>());
/// assert_eq!(a, b);
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct TypeIdHashState;

impl BuildHasher for TypeIdHashState {
    type Hasher = TypeIdHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        TypeIdHasher(0)
    }
}

// -----------------------------------------------------------------------------
// Tests
