//! 64-bit non-cryptographic hash primitive (`spec.md` §4.A).
//!
//! Deterministic across runs and platforms: no per-process keying, fixed
//! seed. Grounded on `original_source/src/str.c`'s `MurmurHash64B(..., 0xc0ffee)`
//! calls — this is a from-scratch 64-bit variant of the MurmurHash2 mixing
//! step rather than a port, since the goal is a stable, portable Rust
//! implementation rather than a byte-for-byte translation.

/// Seed used for every hash in the engine, matching the original tool's
/// fixed `0xc0ffee` so hashes stay stable across re-implementations.
pub const SEED: u64 = 0xc0ffee;

const M: u64 = 0xc6a4_a793_5bd1_e995;
const R: u32 = 47;

/// Hash an arbitrary byte buffer with the engine's fixed seed.
pub fn hash_bytes(data: &[u8]) -> u64 {
    hash_bytes_seeded(data, SEED)
}

fn hash_bytes_seeded(data: &[u8], seed: u64) -> u64 {
    let mut h = seed ^ (data.len() as u64).wrapping_mul(M);

    let chunks = data.chunks_exact(8);
    let remainder = chunks.remainder();

    for chunk in chunks {
        let mut k = u64::from_le_bytes(chunk.try_into().unwrap());
        k = k.wrapping_mul(M);
        k ^= k >> R;
        k = k.wrapping_mul(M);

        h ^= k;
        h = h.wrapping_mul(M);
    }

    if !remainder.is_empty() {
        let mut buf = [0u8; 8];
        buf[..remainder.len()].copy_from_slice(remainder);
        h ^= u64::from_le_bytes(buf);
        h = h.wrapping_mul(M);
    }

    h ^= h >> R;
    h = h.wrapping_mul(M);
    h ^= h >> R;
    h
}

/// Hash a sequence of 64-bit tokens, treating them as their little-endian
/// byte representation (`spec.md` §4.B: "hashes the payload ... as a
/// 64-bit-element sequence when Tokens").
pub fn hash_tokens(tokens: &[u64]) -> u64 {
    let bytes: Vec<u8> = tokens.iter().flat_map(|t| t.to_le_bytes()).collect();
    hash_bytes(&bytes)
}

/// Combine two hashes symmetrically: `combine(a, b) == combine(b, a)`.
pub fn combine(a: u64, b: u64) -> u64 {
    a ^ b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_across_calls() {
        let a = hash_bytes(b"kitten");
        let b = hash_bytes(b"kitten");
        assert_eq!(a, b);
    }

    #[test]
    fn sensitive_to_content() {
        assert_ne!(hash_bytes(b"kitten"), hash_bytes(b"sitten"));
    }

    #[test]
    fn combine_is_symmetric() {
        let a = hash_bytes(b"foo");
        let b = hash_bytes(b"bar");
        assert_eq!(combine(a, b), combine(b, a));
    }

    #[test]
    fn hash_symmetry_over_random_strings() {
        use rand::{Rng, SeedableRng};
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);

        for _ in 0..1000 {
            let len_a = rng.gen_range(0..=64);
            let len_b = rng.gen_range(0..=64);
            let a: Vec<u8> = (0..len_a).map(|_| rng.gen()).collect();
            let b: Vec<u8> = (0..len_b).map(|_| rng.gen()).collect();

            let hash_a = hash_bytes(&a);
            let hash_b = hash_bytes(&b);
            assert_eq!(combine(hash_a, hash_b), combine(hash_b, hash_a));
        }
    }

    #[test]
    fn empty_buffer_is_stable() {
        assert_eq!(hash_bytes(b""), hash_bytes(b""));
    }
}
