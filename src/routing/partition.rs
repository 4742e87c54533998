//! The global partition function.
//!
//! Every node in the tree must compute the same bucket for the same record,
//! on any host, in any build, or routing diverges and records are dropped or
//! duplicated. The runtime's default hasher gives no such guarantee, so the
//! hash here is pinned: 64-bit FNV-1a over the ASCII decimal digits of
//! `crash_date` immediately followed by the decimal digits of `crash_time`,
//! reduced modulo `total_partitions`.
//!
//! The constants below are a versioned contract for the whole tree. Changing
//! them (or the digit-concatenation scheme) changes the bucket of every
//! already-provisioned record and is a breaking protocol change.

/// FNV-1a 64-bit offset basis.
pub const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
/// FNV-1a 64-bit prime.
pub const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Plain FNV-1a over a byte sequence.
pub fn fnv1a_64(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for &byte in bytes {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Maps a record's two key fields to a bucket in `[0, total_partitions)`.
///
/// Pure and deterministic: identical keys and an identical `total_partitions`
/// always yield the identical bucket.
///
/// # Panics
/// Panics if `total_partitions` is zero. That is a caller contract violation
/// (partitioning modulo zero is undefined) and must fail fast rather than
/// route records arbitrarily.
pub fn partition(crash_date: i64, crash_time: i64, total_partitions: u32) -> u32 {
    assert!(total_partitions > 0, "total_partitions must be at least 1");
    let key = format!("{}{}", crash_date, crash_time);
    (fnv1a_64(key.as_bytes()) % u64::from(total_partitions)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_is_deterministic() {
        let p1 = partition(20230101, 800, 4);
        let p2 = partition(20230101, 800, 4);
        assert_eq!(p1, p2, "the same keys should yield the same bucket");
        assert!(p1 < 4);
    }

    #[test]
    fn hash_is_pinned_across_builds() {
        // Reference value for the documented FNV-1a contract. If this test
        // fails, the routing protocol of the whole tree has changed.
        assert_eq!(fnv1a_64(b"20230101800"), 14379779037338698068);
    }
}
