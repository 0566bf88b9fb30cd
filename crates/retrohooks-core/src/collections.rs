//! Map and hasher used across the crate. The `std-hash` feature swaps in the
//! standard library versions; `cargo test -p retrohooks-core --features
//! std-hash` runs the tests below against that branch.

#[cfg(feature = "std-hash")]
pub mod map {
    pub use std::collections::HashMap;
}

#[cfg(not(feature = "std-hash"))]
pub mod map {
    pub use rustc_hash::FxHashMap as HashMap;
}

#[cfg(feature = "std-hash")]
pub mod hasher {
    pub use std::collections::hash_map::DefaultHasher as FingerprintHasher;

    #[inline]
    pub fn new() -> FingerprintHasher {
        FingerprintHasher::new()
    }
}

#[cfg(not(feature = "std-hash"))]
pub mod hasher {
    // fast branch
    pub use ahash::AHasher as FingerprintHasher;

    #[inline]
    pub fn new() -> FingerprintHasher {
        FingerprintHasher::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::hash::{Hash, Hasher};

    fn fingerprint(value: &str) -> u64 {
        let mut state = hasher::new();
        value.hash(&mut state);
        state.finish()
    }

    #[test]
    fn fresh_hashers_agree() {
        assert_eq!(fingerprint("retrohooks"), fingerprint("retrohooks"));
        assert_ne!(fingerprint("a"), fingerprint("b"));
    }

    #[test]
    fn map_stores_by_key() {
        let mut map: map::HashMap<u32, &str> = map::HashMap::default();
        map.insert(1, "one");
        assert_eq!(map.get(&1), Some(&"one"));
    }

    #[cfg(feature = "std-hash")]
    #[test]
    fn std_hash_selects_std_collections() {
        let map: std::collections::HashMap<u8, u8> = map::HashMap::new();
        assert!(map.is_empty());
        let _: std::collections::hash_map::DefaultHasher = hasher::new();
    }

    #[cfg(not(feature = "std-hash"))]
    #[test]
    fn default_build_selects_fast_collections() {
        let map: rustc_hash::FxHashMap<u8, u8> = map::HashMap::default();
        assert!(map.is_empty());
        let _: ahash::AHasher = hasher::new();
    }
}
