use core::hash::BuildHasher;

use foldhash::fast::{FixedState, FoldHasher};

/// A fixed hash seed.
const FIXED_HASH_STATE: FixedState = FixedState::with_seed(0x5D1B_C4A7_30E2_9F61);

/// Hash state of [`AnySet`](super::AnySet) and [`AnyMap`](super::AnyMap).
///
/// Based on `foldhash` with a fixed seed, so iteration order (and with it
/// the order of encoded set and map entries) only depends on the contents.
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FoldHasher<'static>;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        FIXED_HASH_STATE.build_hasher()
    }
}

pub(crate) type HashMap<K, V> = hashbrown::HashMap<K, V, FixedHashState>;
pub(crate) type HashSet<T> = hashbrown::HashSet<T, FixedHashState>;
